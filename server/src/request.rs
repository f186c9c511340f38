mod book;
mod collection;
mod review;

pub use self::{book::*, collection::*, review::*};
