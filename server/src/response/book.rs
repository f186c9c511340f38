use application::transfer::{BookDto, PageDto, ReviewSummaryDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::controller::Exhaust;
use crate::format::Format;
use crate::request::BOOKS_PATH;
use crate::response::{
    review_iri, CollectionLinks, HydraCollection, Linked, Represented, REVIEW_TYPE,
};

const BOOK_CONTEXT: &str = "/contexts/Book";
const BOOK_TYPE: &str = "Book";

pub fn book_iri(id: &Uuid) -> String {
    format!("{BOOKS_PATH}/{id}")
}

#[derive(Debug, Serialize)]
pub struct BookReviewResponse {
    #[serde(flatten)]
    linked: Option<Linked>,
    id: Uuid,
    body: String,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    #[serde(flatten)]
    linked: Option<Linked>,
    id: Uuid,
    title: String,
    reviews: Vec<BookReviewResponse>,
}

impl BookResponse {
    fn new(dto: BookDto, linked: Option<Linked>) -> Self {
        let linked_reviews = linked.is_some();
        let reviews = dto
            .reviews
            .into_iter()
            .map(|ReviewSummaryDto { id, body }| BookReviewResponse {
                linked: linked_reviews.then(|| Linked::nested(review_iri(&id), REVIEW_TYPE)),
                id,
                body,
            })
            .collect();
        Self {
            linked,
            id: dto.id,
            title: dto.title,
            reviews,
        }
    }

    fn document(dto: BookDto) -> Self {
        let linked = Linked::root(BOOK_CONTEXT, book_iri(&dto.id), BOOK_TYPE);
        Self::new(dto, Some(linked))
    }

    fn member(dto: BookDto) -> Self {
        let linked = Linked::nested(book_iri(&dto.id), BOOK_TYPE);
        Self::new(dto, Some(linked))
    }

    fn plain(dto: BookDto) -> Self {
        Self::new(dto, None)
    }
}

pub struct BookPresenter {
    format: Format,
    status: StatusCode,
    links: Option<CollectionLinks>,
}

impl BookPresenter {
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

impl Exhaust<()> for BookPresenter {
    type To = StatusCode;
    fn emit(&self, _input: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<BookDto> for BookPresenter {
    type To = Response;
    fn emit(&self, input: BookDto) -> Self::To {
        let body = match self.format {
            Format::JsonLd => BookResponse::document(input),
            Format::Json => BookResponse::plain(input),
        };
        Represented::new(self.format, self.status, body).into_response()
    }
}

impl Exhaust<PageDto<BookDto>> for BookPresenter {
    type To = Response;
    fn emit(&self, input: PageDto<BookDto>) -> Self::To {
        match (self.format, &self.links) {
            (Format::JsonLd, Some(links)) => {
                let collection = HydraCollection::new(BOOK_CONTEXT, links, input, BookResponse::member);
                Represented::ok(self.format, collection).into_response()
            }
            _ => {
                let items = input
                    .items
                    .into_iter()
                    .map(BookResponse::plain)
                    .collect::<Vec<_>>();
                Represented::ok(self.format, items).into_response()
            }
        }
    }
}
