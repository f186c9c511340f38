use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::ReviewOrder;
use kernel::prelude::entity::{
    BookId, DestructReview, Pagination, PublicationDate, Review, ReviewAuthor, ReviewBody,
    ReviewLetter, ReviewRating,
};
use kernel::prelude::schema::{FieldValue, Inspect};
use kernel::{KernelError, Violation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDto {
    pub id: Uuid,
    pub body: String,
    pub rating: i16,
    pub letter: Option<String>,
    pub book: Uuid,
    pub author: Option<String>,
    pub publication_date: Option<OffsetDateTime>,
}

impl From<Review> for ReviewDto {
    fn from(value: Review) -> Self {
        let DestructReview {
            id,
            body,
            rating,
            letter,
            book,
            author,
            publication_date,
        } = value.into_destruct();
        Self {
            id: id.into(),
            body: body.into(),
            rating: rating.into(),
            letter: letter.map(Into::into),
            book: book.into(),
            author: author.map(Into::into),
            publication_date: publication_date.map(Into::into),
        }
    }
}

/// The `id` and `body` of a review, as listed on its book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummaryDto {
    pub id: Uuid,
    pub body: String,
}

impl From<Review> for ReviewSummaryDto {
    fn from(value: Review) -> Self {
        let DestructReview { id, body, .. } = value.into_destruct();
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

/// Writable review fields as submitted, before validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub body: Option<String>,
    pub rating: Option<i64>,
    pub letter: Option<String>,
    pub book: Option<Uuid>,
    pub author: Option<String>,
    pub publication_date: Option<OffsetDateTime>,
    /// Members submitted with the wrong type; their field above stays `None`.
    pub mistyped: Vec<Violation>,
}

impl Inspect for ReviewDraft {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "body" => self.body.as_deref().into(),
            "rating" => self.rating.into(),
            "letter" => self.letter.as_deref().into(),
            "book" => self.book.as_ref().into(),
            "author" => self.author.as_deref().into(),
            "publicationDate" => self.publication_date.as_ref().into(),
            _ => FieldValue::Null,
        }
    }

    fn mistyped(&self) -> &[Violation] {
        &self.mistyped
    }
}

impl From<&Review> for ReviewDraft {
    fn from(value: &Review) -> Self {
        Self {
            body: Some(value.body().as_ref().clone()),
            rating: Some(i64::from(*value.rating().as_ref())),
            letter: value.letter().as_ref().map(|letter| letter.as_ref().clone()),
            book: Some(*value.book().as_ref()),
            author: value.author().as_ref().map(|author| author.as_ref().clone()),
            publication_date: value.publication_date().as_ref().map(|date| *date.as_ref()),
            mistyped: Vec::new(),
        }
    }
}

/// Typed values of a draft that passed validation.
#[derive(Debug)]
pub struct ReviewParts {
    pub body: ReviewBody,
    pub rating: ReviewRating,
    pub letter: Option<ReviewLetter>,
    pub book: BookId,
    pub author: Option<ReviewAuthor>,
    pub publication_date: Option<PublicationDate>,
}

impl TryFrom<ReviewDraft> for ReviewParts {
    type Error = Report<KernelError>;
    fn try_from(value: ReviewDraft) -> Result<Self, Self::Error> {
        let missing = |field: &str| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("Validated review draft lacks {field}"))
        };
        let body = value.body.ok_or_else(|| missing("body"))?;
        let rating = value.rating.ok_or_else(|| missing("rating"))?;
        let rating = i16::try_from(rating).map_err(|error| {
            Report::new(error)
                .change_context(KernelError::Internal)
                .attach_printable(format!("Rating {rating} does not fit in storage"))
        })?;
        let book = value.book.ok_or_else(|| missing("book"))?;
        Ok(Self {
            body: ReviewBody::new(body),
            rating: ReviewRating::new(rating),
            letter: value.letter.map(ReviewLetter::new),
            book: BookId::new(book),
            author: value.author.map(ReviewAuthor::new),
            publication_date: value.publication_date.map(PublicationDate::new),
        })
    }
}

pub struct GetReviewDto {
    pub id: Uuid,
}

pub struct GetReviewsDto {
    pub book: Option<Uuid>,
    pub orders: Vec<ReviewOrder>,
    pub pagination: Pagination,
}

pub struct GetBookReviewsDto {
    pub book_id: Uuid,
    pub orders: Vec<ReviewOrder>,
    pub pagination: Pagination,
}

pub struct ReplaceReviewDto {
    pub id: Uuid,
    pub draft: ReviewDraft,
}

/// Merge-patch: an outer `None` keeps the current value, `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct PatchReviewDto {
    pub id: Uuid,
    pub body: Option<Option<String>>,
    pub rating: Option<Option<i64>>,
    pub letter: Option<Option<String>>,
    pub book: Option<Option<Uuid>>,
    pub author: Option<Option<String>>,
    pub publication_date: Option<Option<OffsetDateTime>>,
    pub mistyped: Vec<Violation>,
}

impl PatchReviewDto {
    pub fn apply(self, draft: &mut ReviewDraft) {
        fn merge<T>(target: &mut Option<T>, patch: Option<Option<T>>) {
            if let Some(value) = patch {
                *target = value;
            }
        }
        merge(&mut draft.body, self.body);
        merge(&mut draft.rating, self.rating);
        merge(&mut draft.letter, self.letter);
        merge(&mut draft.book, self.book);
        merge(&mut draft.author, self.author);
        merge(&mut draft.publication_date, self.publication_date);
        draft.mistyped.extend(self.mistyped);
    }
}

pub struct DeleteReviewDto {
    pub id: Uuid,
}
