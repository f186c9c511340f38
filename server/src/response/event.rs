use application::transfer::ReviewDto;
use axum::response::sse::Event;
use kernel::interface::event::ReviewEvent;
use serde::Serialize;

use crate::response::{review_iri, ReviewResponse};

#[derive(Debug, Serialize)]
struct DeletedResponse {
    #[serde(rename = "@id")]
    iri: String,
}

/// SSE frame for a committed review change. Deletions carry only the `@id`.
pub fn review_event(event: ReviewEvent) -> Result<Event, axum::Error> {
    match event {
        ReviewEvent::Created(review) => Event::default()
            .event("created")
            .json_data(ReviewResponse::document(ReviewDto::from(review))),
        ReviewEvent::Updated(review) => Event::default()
            .event("updated")
            .json_data(ReviewResponse::document(ReviewDto::from(review))),
        ReviewEvent::Deleted { id } => Event::default().event("deleted").json_data(DeletedResponse {
            iri: review_iri(id.as_ref()),
        }),
    }
}
