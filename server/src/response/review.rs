use application::transfer::{PageDto, ReviewDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;
use crate::format::Format;
use crate::request::BOOKS_PATH;
use crate::response::{CollectionLinks, HydraCollection, Linked, Represented};

pub const REVIEWS_PATH: &str = "/reviews";
pub const REVIEW_CONTEXT: &str = "/contexts/Review";
pub const REVIEW_TYPE: &str = "https://schema.org/Review";

pub fn review_iri(id: &Uuid) -> String {
    format!("{REVIEWS_PATH}/{id}")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[serde(flatten)]
    linked: Option<Linked>,
    id: Uuid,
    body: String,
    rating: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    letter: Option<String>,
    book: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    publication_date: Option<OffsetDateTime>,
}

impl ReviewResponse {
    fn new(dto: ReviewDto, linked: Option<Linked>) -> Self {
        Self {
            linked,
            id: dto.id,
            body: dto.body,
            rating: dto.rating,
            letter: dto.letter,
            book: format!("{BOOKS_PATH}/{}", dto.book),
            author: dto.author,
            publication_date: dto.publication_date,
        }
    }

    pub fn document(dto: ReviewDto) -> Self {
        let linked = Linked::root(REVIEW_CONTEXT, review_iri(&dto.id), REVIEW_TYPE);
        Self::new(dto, Some(linked))
    }

    pub fn member(dto: ReviewDto) -> Self {
        let linked = Linked::nested(review_iri(&dto.id), REVIEW_TYPE);
        Self::new(dto, Some(linked))
    }

    pub fn plain(dto: ReviewDto) -> Self {
        Self::new(dto, None)
    }

    pub fn represent(format: Format, dto: ReviewDto) -> Self {
        match format {
            Format::JsonLd => Self::document(dto),
            Format::Json => Self::plain(dto),
        }
    }
}

pub struct ReviewPresenter {
    format: Format,
    status: StatusCode,
    links: Option<CollectionLinks>,
}

impl ReviewPresenter {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            status: StatusCode::OK,
            links: None,
        }
    }

    pub fn created(format: Format) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(format)
        }
    }

    pub fn collection(format: Format, links: CollectionLinks) -> Self {
        Self {
            links: Some(links),
            ..Self::new(format)
        }
    }
}

impl Exhaust<()> for ReviewPresenter {
    type To = StatusCode;
    fn emit(&self, _input: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<ReviewDto> for ReviewPresenter {
    type To = Response;
    fn emit(&self, input: ReviewDto) -> Self::To {
        let body = ReviewResponse::represent(self.format, input);
        Represented::new(self.format, self.status, body).into_response()
    }
}

impl Exhaust<PageDto<ReviewDto>> for ReviewPresenter {
    type To = Response;
    fn emit(&self, input: PageDto<ReviewDto>) -> Self::To {
        match (self.format, &self.links) {
            (Format::JsonLd, Some(links)) => {
                let collection =
                    HydraCollection::new(REVIEW_CONTEXT, links, input, ReviewResponse::member);
                Represented::ok(self.format, collection).into_response()
            }
            _ => {
                let items = input
                    .items
                    .into_iter()
                    .map(ReviewResponse::plain)
                    .collect::<Vec<_>>();
                Represented::ok(self.format, items).into_response()
            }
        }
    }
}
