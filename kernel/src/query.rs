mod book;
mod review;

pub use self::{book::*, review::*};
