use application::transfer::{
    DeleteReviewDto, GetBookReviewsDto, GetReviewDto, GetReviewsDto, PatchReviewDto,
    ReplaceReviewDto, ReviewDraft,
};
use error_stack::Report;
use kernel::prelude::entity::REVIEW_SCHEMA;
use kernel::prelude::schema::FieldSchema;
use kernel::{KernelError, Violation};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::controller::{Intake, TryIntake};
use crate::request::{parse_book_iri, CollectionQuery};

/// Submitted review members; `id` and unknown members are ignored.
#[derive(Debug, Default)]
pub struct ReviewPayload(Map<String, Value>);

impl ReviewPayload {
    pub fn new(payload: Map<String, Value>) -> Self {
        Self(payload)
    }
}

/// Each member is `None` when absent and `Some(None)` when explicitly null.
#[derive(Debug, Default)]
struct ReviewMembers {
    body: Option<Option<String>>,
    rating: Option<Option<i64>>,
    letter: Option<Option<String>>,
    book: Option<Option<Uuid>>,
    author: Option<Option<String>>,
    publication_date: Option<Option<OffsetDateTime>>,
    mistyped: Vec<Violation>,
}

struct Decoder<'a> {
    payload: &'a Map<String, Value>,
    violations: Vec<Violation>,
}

impl<'a> Decoder<'a> {
    fn member<T>(
        &mut self,
        name: &'static str,
        read: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Option<Option<T>> {
        match self.payload.get(name)? {
            Value::Null => Some(None),
            value => {
                let decoded = read(value);
                if decoded.is_none() {
                    self.violations
                        .extend(REVIEW_SCHEMA.field(name).map(FieldSchema::type_violation));
                }
                Some(decoded)
            }
        }
    }

    fn text(&mut self, name: &'static str) -> Option<Option<String>> {
        self.member(name, |value| value.as_str().map(ToString::to_string))
    }
}

impl TryFrom<ReviewPayload> for ReviewMembers {
    type Error = Report<KernelError>;
    fn try_from(value: ReviewPayload) -> Result<Self, Self::Error> {
        let mut decoder = Decoder {
            payload: &value.0,
            violations: Vec::new(),
        };
        let body = decoder.text("body");
        let rating = decoder.member("rating", Value::as_i64);
        let letter = decoder.text("letter");
        let book = decoder.member("book", Value::as_str);
        let author = decoder.text("author");
        let publication_date = decoder.member("publicationDate", |value| {
            value
                .as_str()
                .and_then(|date| OffsetDateTime::parse(date, &Rfc3339).ok())
        });
        let mistyped = decoder.violations;

        let book = match book {
            Some(Some(iri)) => Some(Some(parse_book_iri(iri)?)),
            Some(None) => Some(None),
            None => None,
        };
        Ok(Self {
            body,
            rating,
            letter,
            book,
            author,
            publication_date,
            mistyped,
        })
    }
}

impl From<ReviewMembers> for ReviewDraft {
    fn from(value: ReviewMembers) -> Self {
        Self {
            body: value.body.flatten(),
            rating: value.rating.flatten(),
            letter: value.letter.flatten(),
            book: value.book.flatten(),
            author: value.author.flatten(),
            publication_date: value.publication_date.flatten(),
            mistyped: value.mistyped,
        }
    }
}

#[derive(Debug)]
pub struct GetReviewRequest {
    id: Uuid,
}

impl GetReviewRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetBookReviewsRequest {
    book_id: Uuid,
    query: CollectionQuery,
}

impl GetBookReviewsRequest {
    pub fn new(book_id: Uuid, query: CollectionQuery) -> Self {
        Self { book_id, query }
    }
}

#[derive(Debug)]
pub struct ReplaceReviewRequest {
    id: Uuid,
    payload: ReviewPayload,
}

impl ReplaceReviewRequest {
    pub fn new(id: Uuid, payload: ReviewPayload) -> Self {
        Self { id, payload }
    }
}

#[derive(Debug)]
pub struct PatchReviewRequest {
    id: Uuid,
    payload: ReviewPayload,
}

impl PatchReviewRequest {
    pub fn new(id: Uuid, payload: ReviewPayload) -> Self {
        Self { id, payload }
    }
}

#[derive(Debug)]
pub struct DeleteReviewRequest {
    id: Uuid,
}

impl DeleteReviewRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct ReviewTransformer {
    pagination: PaginationConfig,
}

impl ReviewTransformer {
    pub fn new(pagination: PaginationConfig) -> Self {
        Self { pagination }
    }
}

impl Intake<GetReviewRequest> for ReviewTransformer {
    type To = GetReviewDto;
    fn emit(&self, input: GetReviewRequest) -> Self::To {
        GetReviewDto { id: input.id }
    }
}

impl Intake<DeleteReviewRequest> for ReviewTransformer {
    type To = DeleteReviewDto;
    fn emit(&self, input: DeleteReviewRequest) -> Self::To {
        DeleteReviewDto { id: input.id }
    }
}

impl TryIntake<CollectionQuery> for ReviewTransformer {
    type To = GetReviewsDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: CollectionQuery) -> Result<Self::To, Self::Error> {
        let book = input.get("book").map(parse_book_iri).transpose()?;
        Ok(GetReviewsDto {
            book,
            orders: input.review_orders(),
            pagination: input.pagination(self.pagination)?,
        })
    }
}

impl TryIntake<GetBookReviewsRequest> for ReviewTransformer {
    type To = GetBookReviewsDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: GetBookReviewsRequest) -> Result<Self::To, Self::Error> {
        Ok(GetBookReviewsDto {
            book_id: input.book_id,
            orders: input.query.review_orders(),
            pagination: input.query.pagination(self.pagination)?,
        })
    }
}

impl TryIntake<ReviewPayload> for ReviewTransformer {
    type To = ReviewDraft;
    type Error = Report<KernelError>;
    fn emit(&self, input: ReviewPayload) -> Result<Self::To, Self::Error> {
        Ok(ReviewMembers::try_from(input)?.into())
    }
}

impl TryIntake<ReplaceReviewRequest> for ReviewTransformer {
    type To = ReplaceReviewDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: ReplaceReviewRequest) -> Result<Self::To, Self::Error> {
        Ok(ReplaceReviewDto {
            id: input.id,
            draft: ReviewMembers::try_from(input.payload)?.into(),
        })
    }
}

impl TryIntake<PatchReviewRequest> for ReviewTransformer {
    type To = PatchReviewDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: PatchReviewRequest) -> Result<Self::To, Self::Error> {
        let members = ReviewMembers::try_from(input.payload)?;
        Ok(PatchReviewDto {
            id: input.id,
            body: members.body,
            rating: members.rating,
            letter: members.letter,
            book: members.book,
            author: members.author,
            publication_date: members.publication_date,
            mistyped: members.mistyped,
        })
    }
}

#[cfg(test)]
mod test {
    use kernel::{KernelError, Violation};
    use serde_json::json;
    use time::macros::datetime;
    use uuid::Uuid;

    use super::{PatchReviewRequest, ReviewPayload, ReviewTransformer};
    use crate::config::PaginationConfig;
    use crate::controller::TryIntake;

    fn payload(value: serde_json::Value) -> ReviewPayload {
        match value {
            serde_json::Value::Object(map) => ReviewPayload::new(map),
            _ => panic!("payload must be an object"),
        }
    }

    fn transformer() -> ReviewTransformer {
        ReviewTransformer::new(PaginationConfig::default())
    }

    #[test]
    fn decodes_members() -> error_stack::Result<(), KernelError> {
        let book = Uuid::new_v4();
        let draft = TryIntake::<ReviewPayload>::emit(
            &transformer(),
            payload(json!({
                "id": "ignored",
                "body": "Great read",
                "rating": 4,
                "book": format!("/books/{book}"),
                "publicationDate": "2024-03-01T10:00:00+00:00",
                "unknown": true
            })),
        )?;
        assert_eq!(draft.body.as_deref(), Some("Great read"));
        assert_eq!(draft.rating, Some(4));
        assert_eq!(draft.book, Some(book));
        assert_eq!(draft.letter, None);
        assert_eq!(draft.publication_date, Some(datetime!(2024-03-01 10:00 UTC)));
        Ok(())
    }

    #[test]
    fn wrong_types_become_mistyped_members() -> error_stack::Result<(), KernelError> {
        let draft = TryIntake::<ReviewPayload>::emit(
            &transformer(),
            payload(json!({
                "body": 3,
                "rating": "four",
                "author": "Kevin",
                "publicationDate": "yesterday"
            })),
        )?;
        assert_eq!(draft.body, None);
        assert_eq!(draft.rating, None);
        assert_eq!(draft.author.as_deref(), Some("Kevin"));
        let messages = draft
            .mistyped
            .iter()
            .map(Violation::to_string)
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                "body: This value should be of type string.",
                "rating: This value should be of type int.",
                "publicationDate: This value should be of type DateTimeInterface.",
            ]
        );
        Ok(())
    }

    #[test]
    fn mistyped_patch_member_clears_the_field() -> error_stack::Result<(), KernelError> {
        let dto = transformer().emit(PatchReviewRequest::new(
            Uuid::new_v4(),
            payload(json!({ "rating": "four" })),
        ))?;
        assert_eq!(dto.rating, Some(None));
        assert_eq!(dto.mistyped.len(), 1);
        assert_eq!(dto.mistyped[0].property_path(), "rating");
        Ok(())
    }

    #[test]
    fn malformed_book_iri_is_bad_request() {
        let report = TryIntake::<ReviewPayload>::emit(
            &transformer(),
            payload(json!({ "book": "/books/42" })),
        )
        .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::InvalidRequest));
    }

    #[test]
    fn patch_distinguishes_null_from_absent() -> error_stack::Result<(), KernelError> {
        let id = Uuid::new_v4();
        let dto = transformer().emit(PatchReviewRequest::new(
            id,
            payload(json!({ "author": null, "rating": 2 })),
        ))?;
        assert_eq!(dto.id, id);
        assert_eq!(dto.author, Some(None));
        assert_eq!(dto.rating, Some(Some(2)));
        assert_eq!(dto.body, None);
        Ok(())
    }
}
