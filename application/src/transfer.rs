mod book;
mod page;
mod review;

pub use self::{book::*, page::*, review::*};
