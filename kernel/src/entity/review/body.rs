use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ReviewBody(String);

impl ReviewBody {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }
}
