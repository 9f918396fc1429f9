//! # User Repository
//!
//! Storage abstraction for accounts. Uniqueness of email and nickname is
//! enforced here so concurrent writers cannot both win.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::model::User;
use crate::auth::errors::{AuthError, AuthResult};

/// User repository trait
///
/// Abstracts storage operations for users.
pub trait UserRepository: Send + Sync {
    /// Find a user by their ID
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    /// Find a user by their (normalized) email
    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    fn email_exists(&self, email: &str) -> AuthResult<bool>;

    /// Check if a nickname is taken
    fn nickname_exists(&self, nickname: &str) -> AuthResult<bool>;

    /// Number of stored users
    fn count(&self) -> AuthResult<usize>;

    /// Users ordered by creation time, oldest first
    fn list(&self, skip: usize, limit: usize) -> AuthResult<Vec<User>>;

    /// Insert a new user
    fn create(&self, user: &User) -> AuthResult<()>;

    /// Insert a new user after `prepare` has seen, under the write lock,
    /// whether the store was empty
    fn create_with(&self, user: User, prepare: &mut dyn FnMut(&mut User, bool)) -> AuthResult<User>;

    /// Apply `change` to the stored user under the write lock and return the
    /// new record.
    ///
    /// If `change` fails or the result clashes with another user's email or
    /// nickname, the stored record is left as it was.
    fn modify(&self, id: Uuid, change: &mut dyn FnMut(&mut User) -> AuthResult<()>) -> AuthResult<User>;

    /// Delete a user
    fn delete(&self, id: Uuid) -> AuthResult<()>;
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AuthResult<RwLockReadGuard<'_, Vec<User>>> {
        self.users
            .read()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))
    }

    fn write(&self) -> AuthResult<RwLockWriteGuard<'_, Vec<User>>> {
        self.users
            .write()
            .map_err(|_| AuthError::StorageError("Lock poisoned".to_string()))
    }
}

/// Reject `candidate` if another stored user already holds its email or nickname
fn check_unique(users: &[User], candidate: &User) -> AuthResult<()> {
    for other in users.iter().filter(|u| u.id != candidate.id) {
        if other.email == candidate.email {
            return Err(AuthError::EmailAlreadyExists);
        }
        if other.nickname == candidate.nickname {
            return Err(AuthError::NicknameAlreadyExists);
        }
    }
    Ok(())
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        Ok(self.read()?.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self.read()?.iter().find(|u| u.email == email).cloned())
    }

    fn email_exists(&self, email: &str) -> AuthResult<bool> {
        Ok(self.read()?.iter().any(|u| u.email == email))
    }

    fn nickname_exists(&self, nickname: &str) -> AuthResult<bool> {
        Ok(self.read()?.iter().any(|u| u.nickname == nickname))
    }

    fn count(&self) -> AuthResult<usize> {
        Ok(self.read()?.len())
    }

    fn list(&self, skip: usize, limit: usize) -> AuthResult<Vec<User>> {
        Ok(self.read()?.iter().skip(skip).take(limit).cloned().collect())
    }

    fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.write()?;
        check_unique(&users, user)?;
        users.push(user.clone());
        Ok(())
    }

    fn create_with(&self, mut user: User, prepare: &mut dyn FnMut(&mut User, bool)) -> AuthResult<User> {
        let mut users = self.write()?;
        prepare(&mut user, users.is_empty());
        check_unique(&users, &user)?;
        users.push(user.clone());
        Ok(user)
    }

    fn modify(&self, id: Uuid, change: &mut dyn FnMut(&mut User) -> AuthResult<()>) -> AuthResult<User> {
        let mut users = self.write()?;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(AuthError::UserNotFound)?;

        let mut candidate = users[index].clone();
        change(&mut candidate)?;
        check_unique(&users, &candidate)?;

        users[index] = candidate.clone();
        Ok(candidate)
    }

    fn delete(&self, id: Uuid) -> AuthResult<()> {
        let mut users = self.write()?;

        let len_before = users.len();
        users.retain(|u| u.id != id);

        if users.len() == len_before {
            Err(AuthError::UserNotFound)
        } else {
            Ok(())
        }
    }
}
