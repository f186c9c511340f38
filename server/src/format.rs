use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT;
use axum::http::request::Parts;

use crate::error::NotAcceptable;

pub const JSON_LD: &str = "application/ld+json";
pub const JSON: &str = "application/json";

/// Representation picked from the `Accept` header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    #[default]
    JsonLd,
    Json,
}

impl Format {
    pub fn mime(&self) -> &'static str {
        match self {
            Format::JsonLd => JSON_LD,
            Format::Json => JSON,
        }
    }

    /// Supported media range with the highest `q` wins, earlier ranges break ties.
    /// Ranges with `q=0` are refused; wildcards fall back to JSON-LD.
    pub fn negotiate(accept: &str) -> Option<Self> {
        let mut chosen: Option<(Self, f32)> = None;
        for range in accept.split(',') {
            let mut parameters = range.split(';');
            let media = parameters.next().unwrap_or_default().trim().to_ascii_lowercase();
            let format = match media.as_str() {
                JSON_LD | "*/*" | "application/*" => Format::JsonLd,
                JSON => Format::Json,
                _ => continue,
            };
            let quality = parameters
                .filter_map(|parameter| parameter.trim().strip_prefix("q="))
                .find_map(|value| value.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            if quality <= 0.0 {
                continue;
            }
            if chosen.map_or(true, |(_, best)| quality > best) {
                chosen = Some((format, quality));
            }
        }
        chosen.map(|(format, _)| format)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Format {
    type Rejection = NotAcceptable;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(accept) = parts.headers.get(ACCEPT) else {
            return Ok(Format::default());
        };
        let accept = accept
            .to_str()
            .map_err(|_| NotAcceptable("<non-ascii>".to_string()))?;
        if accept.trim().is_empty() {
            return Ok(Format::default());
        }
        Format::negotiate(accept).ok_or_else(|| NotAcceptable(accept.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::Format;

    #[test]
    fn negotiate() {
        assert_eq!(Format::negotiate("application/ld+json"), Some(Format::JsonLd));
        assert_eq!(Format::negotiate("application/json"), Some(Format::Json));
        assert_eq!(Format::negotiate("*/*"), Some(Format::JsonLd));
        assert_eq!(
            Format::negotiate("text/html, application/json;q=0.9"),
            Some(Format::Json)
        );
        assert_eq!(Format::negotiate("text/html"), None);
        assert_eq!(Format::negotiate("application/xml"), None);
    }

    #[test]
    fn quality_zero_is_refused() {
        assert_eq!(Format::negotiate("application/json;q=0"), None);
        assert_eq!(
            Format::negotiate("application/json;q=0, application/ld+json"),
            Some(Format::JsonLd)
        );
        assert_eq!(
            Format::negotiate("application/ld+json;q=0.5, application/json"),
            Some(Format::Json)
        );
    }
}
