use application::service::{
    CreateReviewService, DeleteReviewService, GetBookReviewService, GetReviewService,
    UpdateReviewService,
};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use driver::database::DatabaseDriver;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::format::Format;
use crate::handler::AppModule;
use crate::request::{
    CollectionQuery, DeleteReviewRequest, GetBookReviewsRequest, GetReviewRequest,
    PatchReviewRequest, ReplaceReviewRequest, ReviewPayload, ReviewTransformer, BOOKS_PATH,
};
use crate::response::{CollectionLinks, ReviewPresenter, REVIEWS_PATH};

pub trait ReviewRouter {
    fn route_review(self) -> Self;
}

impl<D: DatabaseDriver> ReviewRouter for Router<AppModule<D>> {
    fn route_review(self) -> Self {
        self.route(
            "/reviews",
            get(
                |State(module): State<AppModule<D>>,
                 format: Format,
                 Query(query): Query<CollectionQuery>| async move {
                    let links = CollectionLinks::new(REVIEWS_PATH, query.without_page());
                    Controller::new(
                        ReviewTransformer::new(module.pagination()),
                        ReviewPresenter::collection(format, links),
                    )
                    .try_intake(query)?
                    .handle(|dto| async move { module.get_reviews(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule<D>>,
                 format: Format,
                 Json(payload): Json<Map<String, Value>>| async move {
                    Controller::new(
                        ReviewTransformer::new(module.pagination()),
                        ReviewPresenter::created(format),
                    )
                    .try_intake(ReviewPayload::new(payload))?
                    .handle(|draft| async move { module.create_review(draft).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/reviews/:id",
            get(
                |State(module): State<AppModule<D>>, format: Format, Path(id): Path<Uuid>| async move {
                    Controller::new(
                        ReviewTransformer::new(module.pagination()),
                        ReviewPresenter::new(format),
                    )
                    .intake(GetReviewRequest::new(id))
                    .handle(|dto| async move { module.get_review(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule<D>>,
                 format: Format,
                 Path(id): Path<Uuid>,
                 Json(payload): Json<Map<String, Value>>| async move {
                    Controller::new(
                        ReviewTransformer::new(module.pagination()),
                        ReviewPresenter::new(format),
                    )
                    .try_intake(ReplaceReviewRequest::new(id, ReviewPayload::new(payload)))?
                    .handle(|dto| async move { module.replace_review(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule<D>>,
                 format: Format,
                 Path(id): Path<Uuid>,
                 Json(payload): Json<Map<String, Value>>| async move {
                    Controller::new(
                        ReviewTransformer::new(module.pagination()),
                        ReviewPresenter::new(format),
                    )
                    .try_intake(PatchReviewRequest::new(id, ReviewPayload::new(payload)))?
                    .handle(|dto| async move { module.patch_review(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(
                        ReviewTransformer::new(module.pagination()),
                        ReviewPresenter::new(Format::default()),
                    )
                    .intake(DeleteReviewRequest::new(id))
                    .handle(|dto| async move { module.delete_review(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id/reviews",
            get(
                |State(module): State<AppModule<D>>,
                 format: Format,
                 Path(id): Path<Uuid>,
                 Query(query): Query<CollectionQuery>| async move {
                    let links = CollectionLinks::new(
                        format!("{BOOKS_PATH}/{id}{REVIEWS_PATH}"),
                        query.without_page(),
                    );
                    Controller::new(
                        ReviewTransformer::new(module.pagination()),
                        ReviewPresenter::collection(format, links),
                    )
                    .try_intake(GetBookReviewsRequest::new(id, query))?
                    .handle(|dto| async move { module.get_book_reviews(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
