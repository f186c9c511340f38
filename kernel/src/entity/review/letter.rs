use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Superseded by [`ReviewRating`](super::ReviewRating); kept so older clients keep working.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ReviewLetter(String);

impl ReviewLetter {
    pub const CHOICES: [&'static str; 4] = ["a", "b", "c", "d"];

    pub fn new(letter: impl Into<String>) -> Self {
        Self(letter.into())
    }
}
