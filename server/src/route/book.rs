use application::service::{CreateBookService, DeleteBookService, GetBookService};
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
    BookTransformer, CollectionQuery, CreateBookRequest, DeleteBookRequest, GetBookRequest,
    BOOKS_PATH,
};
use crate::response::{BookPresenter, CollectionLinks};

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl<D: DatabaseDriver> BookRouter for Router<AppModule<D>> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(
                |State(module): State<AppModule<D>>,
                 format: Format,
                 Query(query): Query<CollectionQuery>| async move {
                    let links = CollectionLinks::new(BOOKS_PATH, query.without_page());
                    Controller::new(
                        BookTransformer::new(module.pagination()),
                        BookPresenter::collection(format, links),
                    )
                    .try_intake(query)?
                    .handle(|dto| async move { module.get_books(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule<D>>,
                 format: Format,
                 Json(payload): Json<Map<String, Value>>| async move {
                    Controller::new(
                        BookTransformer::new(module.pagination()),
                        BookPresenter::created(format),
                    )
                    .try_intake(CreateBookRequest::new(payload))?
                    .handle(|dto| async move { module.create_book(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule<D>>, format: Format, Path(id): Path<Uuid>| async move {
                    Controller::new(
                        BookTransformer::new(module.pagination()),
                        BookPresenter::new(format),
                    )
                    .intake(GetBookRequest::new(id))
                    .handle(|dto| async move { module.get_book(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<D>>, Path(id): Path<Uuid>| async move {
                    Controller::new(
                        BookTransformer::new(module.pagination()),
                        BookPresenter::new(Format::default()),
                    )
                    .intake(DeleteBookRequest::new(id))
                    .handle(|dto| async move { module.delete_book(dto).await })
                    .await
                    .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
