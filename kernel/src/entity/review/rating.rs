use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ReviewRating(i16);

impl ReviewRating {
    pub const MIN: i16 = 0;
    pub const MAX: i16 = 5;

    pub fn new(rating: impl Into<i16>) -> Self {
        Self(rating.into())
    }
}
