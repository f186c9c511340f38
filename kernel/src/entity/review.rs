mod author;
mod body;
mod id;
mod letter;
mod publication_date;
mod rating;

pub use self::{author::*, body::*, id::*, letter::*, publication_date::*, rating::*};
use crate::entity::BookId;
use crate::schema::{Constraint, FieldKind, FieldSchema, ResourceSchema};
use destructure::{Destructure, Mutation};
use vodca::References;

static REVIEW_FIELDS: [FieldSchema; 6] = [
    FieldSchema::new("body", FieldKind::Text, false, &[Constraint::NotBlank]),
    FieldSchema::new(
        "rating",
        FieldKind::Integer,
        false,
        &[
            Constraint::NotBlank,
            Constraint::Range {
                min: ReviewRating::MIN as i64,
                max: ReviewRating::MAX as i64,
            },
        ],
    ),
    FieldSchema::new(
        "letter",
        FieldKind::Text,
        true,
        &[Constraint::Choice(&ReviewLetter::CHOICES)],
    ),
    FieldSchema::new(
        "book",
        FieldKind::Reference("Book"),
        false,
        &[Constraint::NotNull],
    ),
    FieldSchema::new("author", FieldKind::Text, true, &[]),
    FieldSchema::new("publicationDate", FieldKind::DateTime, true, &[]),
];

pub static REVIEW_SCHEMA: ResourceSchema = ResourceSchema::new("Review", &REVIEW_FIELDS);

/// A rating and critique of a single [`Book`](crate::entity::Book).
///
/// The book is held by identifier only. A book's reviews are found by querying
/// reviews on this reference, so re-pointing a review never touches the book side.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Review {
    id: ReviewId,
    body: ReviewBody,
    rating: ReviewRating,
    letter: Option<ReviewLetter>,
    book: BookId,
    author: Option<ReviewAuthor>,
    publication_date: Option<PublicationDate>,
}

impl Review {
    pub fn new(
        id: ReviewId,
        body: ReviewBody,
        rating: ReviewRating,
        letter: Option<ReviewLetter>,
        book: BookId,
        author: Option<ReviewAuthor>,
        publication_date: Option<PublicationDate>,
    ) -> Self {
        Self {
            id,
            body,
            rating,
            letter,
            book,
            author,
            publication_date,
        }
    }

    pub fn set_book(&mut self, book: BookId) {
        self.book = book;
    }
}

#[cfg(test)]
mod test {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::{
        Review, ReviewBody, ReviewId, ReviewLetter, ReviewRating, REVIEW_SCHEMA,
    };
    use crate::entity::BookId;
    use crate::schema::{FieldValue, Inspect};
    use crate::{KernelError, Violation};

    #[derive(Default)]
    struct Draft {
        body: Option<String>,
        rating: Option<i64>,
        letter: Option<String>,
        book: Option<Uuid>,
        publication_date: Option<OffsetDateTime>,
    }

    impl Inspect for Draft {
        fn field(&self, name: &str) -> FieldValue<'_> {
            match name {
                "body" => self.body.as_deref().into(),
                "rating" => self.rating.into(),
                "letter" => self.letter.as_deref().into(),
                "book" => self.book.as_ref().into(),
                "publicationDate" => self.publication_date.as_ref().into(),
                _ => FieldValue::Null,
            }
        }
    }

    fn valid() -> Draft {
        Draft {
            body: Some("Great read".to_string()),
            rating: Some(4),
            book: Some(Uuid::new_v4()),
            ..Default::default()
        }
    }

    fn violated_paths(draft: &Draft) -> Vec<String> {
        match REVIEW_SCHEMA.validate(draft) {
            Ok(()) => Vec::new(),
            Err(report) => {
                assert!(matches!(report.current_context(), KernelError::Validation));
                Violation::collect(&report)
                    .into_iter()
                    .map(|v| v.property_path().to_string())
                    .collect()
            }
        }
    }

    #[test]
    fn set_book_repoints_review() {
        let first = BookId::new(Uuid::new_v4());
        let second = BookId::new(Uuid::new_v4());
        let mut review = Review::new(
            ReviewId::new(Uuid::new_v4()),
            ReviewBody::new("body"),
            ReviewRating::new(3i16),
            None,
            first.clone(),
            None,
            None,
        );
        assert_eq!(review.book(), &first);

        review.set_book(second.clone());
        assert_eq!(review.book(), &second);
    }

    #[test]
    fn rating_must_be_within_bounds() {
        for rating in -3..=8 {
            let draft = Draft {
                rating: Some(rating),
                ..valid()
            };
            let accepted = (0..=5).contains(&rating);
            assert_eq!(violated_paths(&draft).is_empty(), accepted, "rating {rating}");
        }
    }

    #[test]
    fn letter_must_be_a_known_choice() {
        for letter in ReviewLetter::CHOICES {
            let draft = Draft {
                letter: Some(letter.to_string()),
                ..valid()
            };
            assert!(violated_paths(&draft).is_empty());
        }
        for letter in ["e", "A", "", "ab"] {
            let draft = Draft {
                letter: Some(letter.to_string()),
                ..valid()
            };
            assert_eq!(violated_paths(&draft), vec!["letter".to_string()]);
        }
    }

    #[test]
    fn missing_required_fields_are_reported() {
        assert_eq!(
            violated_paths(&Draft::default()),
            vec!["body", "rating", "book"]
        );
        let blank = Draft {
            body: Some(String::new()),
            ..valid()
        };
        assert_eq!(violated_paths(&blank), vec!["body"]);
    }

    #[test]
    fn optional_fields_accept_values() {
        let draft = Draft {
            letter: Some("a".to_string()),
            publication_date: Some(OffsetDateTime::UNIX_EPOCH),
            ..valid()
        };
        assert!(violated_paths(&draft).is_empty());
    }
}
