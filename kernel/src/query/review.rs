use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, OrderDirection, Pagination, Review, ReviewId};
use crate::KernelError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReviewFilter {
    book: Option<BookId>,
}

impl ReviewFilter {
    pub fn new(book: Option<BookId>) -> Self {
        Self { book }
    }

    pub fn by_book(book: BookId) -> Self {
        Self { book: Some(book) }
    }

    pub fn book(&self) -> Option<&BookId> {
        self.book.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewOrderKey {
    Id,
    PublicationDate,
}

impl ReviewOrderKey {
    /// Resolves an API property name.
    pub fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(Self::Id),
            "publicationDate" => Some(Self::PublicationDate),
            _ => None,
        }
    }

    pub fn property(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::PublicationDate => "publicationDate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewOrder {
    key: ReviewOrderKey,
    direction: OrderDirection,
}

impl ReviewOrder {
    pub fn new(key: ReviewOrderKey, direction: OrderDirection) -> Self {
        Self { key, direction }
    }

    pub fn key(&self) -> ReviewOrderKey {
        self.key
    }

    pub fn direction(&self) -> OrderDirection {
        self.direction
    }
}

#[async_trait::async_trait]
pub trait ReviewQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &ReviewId,
    ) -> error_stack::Result<Option<Review>, KernelError>;
    /// Orders apply in sequence; ties (and an empty `orders`) fall back to ascending id.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        filter: &ReviewFilter,
        orders: &[ReviewOrder],
        pagination: &Pagination,
    ) -> error_stack::Result<Vec<Review>, KernelError>;
    async fn count(
        &self,
        con: &mut Self::Transaction,
        filter: &ReviewFilter,
    ) -> error_stack::Result<i64, KernelError>;
    async fn find_by_book(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Review>, KernelError>;
}

pub trait DependOnReviewQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ReviewQuery: ReviewQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn review_query(&self) -> &Self::ReviewQuery;
}
