use application::transfer::{CreateBookDto, DeleteBookDto, GetBookDto, GetBooksDto};
use error_stack::Report;
use kernel::prelude::entity::BOOK_SCHEMA;
use kernel::prelude::schema::FieldSchema;
use kernel::KernelError;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::controller::{Intake, TryIntake};
use crate::request::CollectionQuery;

pub const BOOKS_PATH: &str = "/books";

/// Resolves `/books/{id}` or a bare id.
pub fn parse_book_iri(value: &str) -> error_stack::Result<Uuid, KernelError> {
    let id = value
        .strip_prefix(BOOKS_PATH)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(value);
    Uuid::parse_str(id).map_err(|_| {
        Report::new(KernelError::InvalidRequest)
            .attach_printable(format!("Invalid IRI \"{value}\"."))
    })
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: Uuid,
}

impl GetBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: Uuid,
}

impl DeleteBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct CreateBookRequest(Map<String, Value>);

impl CreateBookRequest {
    pub fn new(payload: Map<String, Value>) -> Self {
        Self(payload)
    }
}

pub struct BookTransformer {
    pagination: PaginationConfig,
}

impl BookTransformer {
    pub fn new(pagination: PaginationConfig) -> Self {
        Self { pagination }
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}

impl TryIntake<CollectionQuery> for BookTransformer {
    type To = GetBooksDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: CollectionQuery) -> Result<Self::To, Self::Error> {
        Ok(GetBooksDto {
            pagination: input.pagination(self.pagination)?,
        })
    }
}

impl TryIntake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: CreateBookRequest) -> Result<Self::To, Self::Error> {
        let title = match input.0.get("title") {
            None | Some(Value::Null) => None,
            Some(Value::String(title)) => Some(title.clone()),
            Some(_) => {
                BOOK_SCHEMA.reject(BOOK_SCHEMA.field("title").map(FieldSchema::type_violation))?;
                None
            }
        };
        Ok(CreateBookDto { title })
    }
}

#[cfg(test)]
mod test {
    use kernel::KernelError;
    use uuid::Uuid;

    use super::parse_book_iri;

    #[test]
    fn book_iri() -> error_stack::Result<(), KernelError> {
        let id = Uuid::new_v4();
        assert_eq!(parse_book_iri(&format!("/books/{id}"))?, id);
        assert_eq!(parse_book_iri(&id.to_string())?, id);
        for invalid in ["/books/", "/reviews/1", "/books/42", "not-an-iri"] {
            let report = parse_book_iri(invalid).unwrap_err();
            assert!(matches!(report.current_context(), KernelError::InvalidRequest));
        }
        Ok(())
    }
}
