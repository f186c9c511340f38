use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::format::Format;

mod book;
mod collection;
mod event;
mod review;

pub use self::{book::*, collection::*, event::*, review::*};

/// `@id`/`@type` header of a JSON-LD node; `@context` only on the top-level node.
#[derive(Debug, Serialize)]
pub struct Linked {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    context: Option<&'static str>,
    #[serde(rename = "@id")]
    iri: String,
    #[serde(rename = "@type")]
    kind: &'static str,
}

impl Linked {
    pub fn root(context: &'static str, iri: String, kind: &'static str) -> Self {
        Self {
            context: Some(context),
            iri,
            kind,
        }
    }

    pub fn nested(iri: String, kind: &'static str) -> Self {
        Self {
            context: None,
            iri,
            kind,
        }
    }
}

/// A body serialized as JSON and labelled with the negotiated media type.
pub struct Represented<T> {
    format: Format,
    status: StatusCode,
    body: T,
}

impl<T: Serialize> Represented<T> {
    pub fn new(format: Format, status: StatusCode, body: T) -> Self {
        Self {
            format,
            status,
            body,
        }
    }

    pub fn ok(format: Format, body: T) -> Self {
        Self::new(format, StatusCode::OK, body)
    }
}

impl<T: Serialize> IntoResponse for Represented<T> {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(self.format.mime()));
        response
    }
}
