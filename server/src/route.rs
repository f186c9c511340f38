use axum::Router;
use driver::database::DatabaseDriver;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::AppModule;

mod book;
mod review;
mod update;

pub use self::{book::*, review::*, update::*};

pub fn app<D: DatabaseDriver>(module: AppModule<D>) -> Router {
    Router::<AppModule<D>>::new()
        .route_book()
        .route_review()
        .route_update()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new())
        .with_state(module)
}
