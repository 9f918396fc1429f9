//! Random nickname generation for accounts registered without one.

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "clever", "jolly", "brave", "sly", "gentle", "swift", "quiet", "bold", "lucky", "witty",
];
const ANIMALS: &[&str] = &[
    "panda", "fox", "raccoon", "koala", "lion", "otter", "falcon", "badger", "heron", "lynx",
];

/// Generate a nickname of the form `adjective_animal_NNN`
pub fn generate_nickname() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("curious");
    let animal = ANIMALS.choose(&mut rng).copied().unwrap_or("cat");
    let number: u16 = rng.gen_range(0..1000);
    format!("{adjective}_{animal}_{number}")
}
