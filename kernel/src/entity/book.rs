mod id;
mod title;

pub use self::{id::*, title::*};
use crate::schema::{Constraint, FieldKind, FieldSchema, ResourceSchema};
use destructure::Destructure;
use vodca::References;

static BOOK_FIELDS: [FieldSchema; 1] = [FieldSchema::new(
    "title",
    FieldKind::Text,
    false,
    &[Constraint::NotBlank],
)];

pub static BOOK_SCHEMA: ResourceSchema = ResourceSchema::new("Book", &BOOK_FIELDS);

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    title: BookTitle,
}

impl Book {
    pub fn new(id: BookId, title: BookTitle) -> Self {
        Self { id, title }
    }
}
