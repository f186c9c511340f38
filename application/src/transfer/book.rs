use error_stack::Report;
use uuid::Uuid;

use kernel::prelude::entity::{Book, DestructBook, Pagination};
use kernel::prelude::schema::{FieldValue, Inspect};
use kernel::KernelError;

use crate::transfer::ReviewSummaryDto;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub reviews: Vec<ReviewSummaryDto>,
}

impl BookDto {
    pub fn new(book: Book, reviews: Vec<ReviewSummaryDto>) -> Self {
        let DestructBook { id, title } = book.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            reviews,
        }
    }
}

pub struct GetBookDto {
    pub id: Uuid,
}

pub struct GetBooksDto {
    pub pagination: Pagination,
}

#[derive(Debug, Default, Clone)]
pub struct CreateBookDto {
    pub title: Option<String>,
}

impl Inspect for CreateBookDto {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "title" => self.title.as_deref().into(),
            _ => FieldValue::Null,
        }
    }
}

impl CreateBookDto {
    pub(crate) fn into_title(self) -> Result<String, Report<KernelError>> {
        self.title.ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable("Validated book draft lacks title")
        })
    }
}

pub struct DeleteBookDto {
    pub id: Uuid,
}
