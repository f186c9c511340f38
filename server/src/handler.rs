use driver::database::{DatabaseDriver, InMemoryDatabase, PostgresDatabase};
use driver::notify::BroadcastPublisher;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::event::DependOnReviewPublisher;
use kernel::interface::query::{DependOnBookQuery, DependOnReviewQuery};
use kernel::interface::update::{DependOnBookModifier, DependOnReviewModifier};
use kernel::KernelError;
use std::ops::Deref;
use std::sync::Arc;

use crate::config::PaginationConfig;

pub struct AppModule<D: DatabaseDriver>(Arc<Handler<D>>);

impl<D: DatabaseDriver> Clone for AppModule<D> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<D: DatabaseDriver> AppModule<D> {
    pub fn new(database: D, pagination: PaginationConfig) -> Self {
        Self(Arc::new(Handler::new(database, pagination)))
    }
}

impl AppModule<PostgresDatabase> {
    pub async fn postgres(pagination: PaginationConfig) -> error_stack::Result<Self, KernelError> {
        Ok(Self::new(PostgresDatabase::new().await?, pagination))
    }
}

impl AppModule<InMemoryDatabase> {
    pub fn memory(pagination: PaginationConfig) -> Self {
        Self::new(InMemoryDatabase::new(), pagination)
    }
}

impl<D: DatabaseDriver> Deref for AppModule<D> {
    type Target = Handler<D>;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler<D: DatabaseDriver> {
    database: D,
    books: D::BookRepository,
    reviews: D::ReviewRepository,
    publisher: BroadcastPublisher,
    pagination: PaginationConfig,
}

impl<D: DatabaseDriver> Handler<D> {
    pub fn new(database: D, pagination: PaginationConfig) -> Self {
        Self {
            database,
            books: D::BookRepository::default(),
            reviews: D::ReviewRepository::default(),
            publisher: BroadcastPublisher::default(),
            pagination,
        }
    }

    pub fn publisher(&self) -> &BroadcastPublisher {
        &self.publisher
    }

    pub fn pagination(&self) -> PaginationConfig {
        self.pagination
    }
}

impl<D: DatabaseDriver> DependOnDatabaseConnection for Handler<D> {
    type DatabaseConnection = D;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl<D: DatabaseDriver> DependOnBookQuery for Handler<D> {
    type BookQuery = D::BookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &self.books
    }
}

impl<D: DatabaseDriver> DependOnBookModifier for Handler<D> {
    type BookModifier = D::BookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &self.books
    }
}

impl<D: DatabaseDriver> DependOnReviewQuery for Handler<D> {
    type ReviewQuery = D::ReviewRepository;
    fn review_query(&self) -> &Self::ReviewQuery {
        &self.reviews
    }
}

impl<D: DatabaseDriver> DependOnReviewModifier for Handler<D> {
    type ReviewModifier = D::ReviewRepository;
    fn review_modifier(&self) -> &Self::ReviewModifier {
        &self.reviews
    }
}

impl<D: DatabaseDriver> DependOnReviewPublisher for Handler<D> {
    type ReviewPublisher = BroadcastPublisher;
    fn review_publisher(&self) -> &Self::ReviewPublisher {
        &self.publisher
    }
}
