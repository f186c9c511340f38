use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookId, BookTitle, Pagination};
use kernel::KernelError;

use crate::database::postgres::mapping::BOOK_MAPPING;
use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        pagination: &Pagination,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con, pagination).await
    }

    async fn count(&self, con: &mut PostgresTransaction) -> error_stack::Result<i64, KernelError> {
        PgBookInternal::count(con).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(BookId::new(value.id), BookTitle::new(value.title))
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let statement = format!("{} WHERE id = $1", BOOK_MAPPING.select());
        let row = sqlx::query_as::<_, BookRow>(&statement)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_all(
        con: &mut PgConnection,
        pagination: &Pagination,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let statement = format!(
            "{} ORDER BY id ASC LIMIT $1 OFFSET $2",
            BOOK_MAPPING.select()
        );
        let rows = sqlx::query_as::<_, BookRow>(&statement)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(con)
            .await
            .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn count(con: &mut PgConnection) -> error_stack::Result<i64, KernelError> {
        let statement = format!("SELECT COUNT(*) FROM {}", BOOK_MAPPING.table());
        sqlx::query_scalar::<_, i64>(&statement)
            .fetch_one(con)
            .await
            .convert_error()
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(&BOOK_MAPPING.insert())
            .bind(book.id().as_ref())
            .bind(book.title().as_ref())
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        let statement = format!("DELETE FROM {} WHERE id = $1", BOOK_MAPPING.table());
        let result = sqlx::query(&statement)
            .bind(book_id.as_ref())
            .execute(con)
            .await
            .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} does not exist", book_id.as_ref())));
        }
        Ok(())
    }
}
