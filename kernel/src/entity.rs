mod book;
mod common;
mod review;

pub use self::{book::*, common::*, review::*};
