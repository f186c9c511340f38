use axum::extract::State;
use axum::response::sse::{KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use driver::database::DatabaseDriver;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::handler::AppModule;
use crate::response::review_event;

pub trait UpdateRouter {
    fn route_update(self) -> Self;
}

impl<D: DatabaseDriver> UpdateRouter for Router<AppModule<D>> {
    fn route_update(self) -> Self {
        self.route(
            "/updates/reviews",
            get(|State(module): State<AppModule<D>>| async move {
                let stream = BroadcastStream::new(module.publisher().subscribe())
                    .filter_map(|received| match received {
                        Ok(event) => Some(event),
                        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                            tracing::warn!("Review update subscriber skipped {skipped} events");
                            None
                        }
                    })
                    .map(review_event);
                Sse::new(stream).keep_alive(KeepAlive::default())
            }),
        )
    }
}

#[cfg(test)]
mod test {
    use application::service::{CreateBookService, CreateReviewService};
    use application::transfer::{CreateBookDto, ReviewDraft};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tokio_stream::StreamExt;
    use tower::ServiceExt;

    use crate::config::PaginationConfig;
    use crate::handler::AppModule;
    use crate::route::app;

    #[tokio::test]
    async fn streams_created_reviews() {
        let module = AppModule::memory(PaginationConfig::default());
        let router = app(module.clone());

        let request = Request::builder()
            .uri("/updates/reviews")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );

        let book = module
            .create_book(CreateBookDto {
                title: Some("Dune".to_string()),
            })
            .await
            .unwrap();
        let review = module
            .create_review(ReviewDraft {
                body: Some("Spice".to_string()),
                rating: Some(5),
                book: Some(book.id),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut body = response.into_body().into_data_stream();
        let frame = body.next().await.unwrap().unwrap();
        let frame = String::from_utf8(frame.to_vec()).unwrap();
        assert!(frame.starts_with("event: created\n"));
        assert!(frame.contains(&format!("\"@id\":\"/reviews/{}\"", review.id)));
    }
}
