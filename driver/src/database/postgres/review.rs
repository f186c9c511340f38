use error_stack::Report;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{ReviewFilter, ReviewOrder, ReviewQuery};
use kernel::interface::update::ReviewModifier;
use kernel::prelude::entity::{
    BookId, OrderDirection, Pagination, PublicationDate, Review, ReviewAuthor, ReviewBody,
    ReviewId, ReviewLetter, ReviewRating,
};
use kernel::KernelError;

use crate::database::postgres::mapping::REVIEW_MAPPING;
use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresReviewRepository;

#[async_trait::async_trait]
impl ReviewQuery for PostgresReviewRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ReviewId,
    ) -> error_stack::Result<Option<Review>, KernelError> {
        PgReviewInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        filter: &ReviewFilter,
        orders: &[ReviewOrder],
        pagination: &Pagination,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        PgReviewInternal::find_all(con, filter, orders, Some(pagination)).await
    }

    async fn count(
        &self,
        con: &mut PostgresTransaction,
        filter: &ReviewFilter,
    ) -> error_stack::Result<i64, KernelError> {
        PgReviewInternal::count(con, filter).await
    }

    async fn find_by_book(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        let filter = ReviewFilter::by_book(book_id.clone());
        PgReviewInternal::find_all(con, &filter, &[], None).await
    }
}

#[async_trait::async_trait]
impl ReviewModifier for PostgresReviewRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        PgReviewInternal::create(con, review).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        PgReviewInternal::update(con, review).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        review_id: &ReviewId,
    ) -> error_stack::Result<(), KernelError> {
        PgReviewInternal::delete(con, review_id).await
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    body: String,
    rating: i16,
    letter: Option<String>,
    book_id: Uuid,
    author: Option<String>,
    publication_date: Option<OffsetDateTime>,
}

impl From<ReviewRow> for Review {
    fn from(value: ReviewRow) -> Self {
        Review::new(
            ReviewId::new(value.id),
            ReviewBody::new(value.body),
            ReviewRating::new(value.rating),
            value.letter.map(ReviewLetter::new),
            BookId::new(value.book_id),
            value.author.map(ReviewAuthor::new),
            value.publication_date.map(PublicationDate::new),
        )
    }
}

fn column(field: &str) -> error_stack::Result<&'static str, KernelError> {
    REVIEW_MAPPING.column(field).ok_or_else(|| {
        Report::new(KernelError::Internal)
            .attach_printable(format!("No column is mapped for review field {field}"))
    })
}

fn push_filter(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &ReviewFilter,
) -> error_stack::Result<(), KernelError> {
    if let Some(book) = filter.book() {
        query
            .push(format!(" WHERE {} = ", column("book")?))
            .push_bind(*book.as_ref());
    }
    Ok(())
}

pub(in crate::database) struct PgReviewInternal;

impl PgReviewInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ReviewId,
    ) -> error_stack::Result<Option<Review>, KernelError> {
        let statement = format!("{} WHERE {} = $1", REVIEW_MAPPING.select(), column("id")?);
        let row = sqlx::query_as::<_, ReviewRow>(&statement)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        Ok(row.map(Review::from))
    }

    async fn find_all(
        con: &mut PgConnection,
        filter: &ReviewFilter,
        orders: &[ReviewOrder],
        pagination: Option<&Pagination>,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        let mut query = QueryBuilder::<Postgres>::new(REVIEW_MAPPING.select());
        push_filter(&mut query, filter)?;

        query.push(" ORDER BY ");
        let mut separated = query.separated(", ");
        for order in orders {
            let direction = match order.direction() {
                OrderDirection::Asc => "ASC",
                OrderDirection::Desc => "DESC",
            };
            separated.push(format!("{} {direction}", column(order.key().property())?));
        }
        separated.push(format!("{} ASC", column("id")?));

        if let Some(pagination) = pagination {
            query
                .push(" LIMIT ")
                .push_bind(pagination.limit())
                .push(" OFFSET ")
                .push_bind(pagination.offset());
        }

        let rows = query
            .build_query_as::<ReviewRow>()
            .fetch_all(con)
            .await
            .convert_error()?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn count(
        con: &mut PgConnection,
        filter: &ReviewFilter,
    ) -> error_stack::Result<i64, KernelError> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", REVIEW_MAPPING.table()));
        push_filter(&mut query, filter)?;
        query
            .build_query_scalar::<i64>()
            .fetch_one(con)
            .await
            .convert_error()
    }

    async fn create(con: &mut PgConnection, review: &Review) -> error_stack::Result<(), KernelError> {
        Self::bind_all(&REVIEW_MAPPING.insert(), con, review).await?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, review: &Review) -> error_stack::Result<(), KernelError> {
        let affected = Self::bind_all(&REVIEW_MAPPING.update(), con, review).await?;
        if affected == 0 {
            return Err(Report::new(KernelError::NotFound).attach_printable(format!(
                "Review {} does not exist",
                review.id().as_ref()
            )));
        }
        Ok(())
    }

    /// Binds every mapped column in mapping order.
    async fn bind_all(
        statement: &str,
        con: &mut PgConnection,
        review: &Review,
    ) -> error_stack::Result<u64, KernelError> {
        let result = sqlx::query(statement)
            .bind(review.id().as_ref())
            .bind(review.body().as_ref())
            .bind(review.rating().as_ref())
            .bind(review.letter().as_ref().map(AsRef::<String>::as_ref))
            .bind(review.book().as_ref())
            .bind(review.author().as_ref().map(AsRef::<String>::as_ref))
            .bind(
                review
                    .publication_date()
                    .as_ref()
                    .map(AsRef::<OffsetDateTime>::as_ref),
            )
            .execute(con)
            .await
            .convert_error()?;
        Ok(result.rows_affected())
    }

    async fn delete(
        con: &mut PgConnection,
        review_id: &ReviewId,
    ) -> error_stack::Result<(), KernelError> {
        let statement = format!(
            "DELETE FROM {} WHERE {} = $1",
            REVIEW_MAPPING.table(),
            column("id")?
        );
        let result = sqlx::query(&statement)
            .bind(review_id.as_ref())
            .execute(con)
            .await
            .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Review {} does not exist", review_id.as_ref())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{ReviewFilter, ReviewOrder, ReviewOrderKey, ReviewQuery};
    use kernel::interface::update::{BookModifier, ReviewModifier};
    use kernel::prelude::entity::{
        Book, BookId, BookTitle, ItemsPerPage, OrderDirection, Page, Pagination,
        PublicationDate, Review, ReviewBody, ReviewId, ReviewLetter, ReviewRating,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresReviewRepository,
    };

    fn review(book: &BookId, date: Option<PublicationDate>) -> Review {
        Review::new(
            ReviewId::new(uuid::Uuid::new_v4()),
            ReviewBody::new("body"),
            ReviewRating::new(3i16),
            Some(ReviewLetter::new("a")),
            book.clone(),
            None,
            date,
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book_id = BookId::new(uuid::Uuid::new_v4());
        let book = Book::new(book_id.clone(), BookTitle::new("title"));
        PostgresBookRepository.create(&mut con, &book).await?;

        let review = review(&book_id, None);
        PostgresReviewRepository.create(&mut con, &review).await?;
        let found = PostgresReviewRepository
            .find_by_id(&mut con, review.id())
            .await?;
        assert_eq!(found, Some(review.clone()));

        let mut changed = review.clone();
        changed.substitute(|review| *review.body = ReviewBody::new("changed"));
        PostgresReviewRepository.update(&mut con, &changed).await?;
        let found = PostgresReviewRepository
            .find_by_id(&mut con, review.id())
            .await?;
        assert_eq!(found, Some(changed));

        PostgresReviewRepository.delete(&mut con, review.id()).await?;
        let found = PostgresReviewRepository
            .find_by_id(&mut con, review.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn filter_order_and_page() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let book_id = BookId::new(uuid::Uuid::new_v4());
        let other_id = BookId::new(uuid::Uuid::new_v4());
        PostgresBookRepository
            .create(&mut con, &Book::new(book_id.clone(), BookTitle::new("one")))
            .await?;
        PostgresBookRepository
            .create(&mut con, &Book::new(other_id.clone(), BookTitle::new("two")))
            .await?;

        let undated = review(&book_id, None);
        let old = review(
            &book_id,
            Some(PublicationDate::new(datetime!(2020-01-01 0:00 UTC))),
        );
        let new = review(
            &book_id,
            Some(PublicationDate::new(datetime!(2024-01-01 0:00 UTC))),
        );
        let elsewhere = review(&other_id, None);
        for review in [&undated, &old, &new, &elsewhere] {
            PostgresReviewRepository.create(&mut con, review).await?;
        }

        let filter = ReviewFilter::by_book(book_id.clone());
        assert_eq!(PostgresReviewRepository.count(&mut con, &filter).await?, 3);

        let orders = [ReviewOrder::new(
            ReviewOrderKey::PublicationDate,
            OrderDirection::Desc,
        )];
        let found = PostgresReviewRepository
            .find_all(&mut con, &filter, &orders, &Pagination::default())
            .await?;
        assert_eq!(found, vec![undated.clone(), new.clone(), old.clone()]);

        let second = Pagination::new(Page::new(2), ItemsPerPage::new(2));
        let found = PostgresReviewRepository
            .find_all(&mut con, &filter, &orders, &second)
            .await?;
        assert_eq!(found, vec![old]);

        let by_book = PostgresReviewRepository
            .find_by_book(&mut con, &other_id)
            .await?;
        assert_eq!(by_book, vec![elsewhere]);

        PostgresBookRepository.delete(&mut con, &book_id).await?;
        assert_eq!(PostgresReviewRepository.count(&mut con, &filter).await?, 0);
        Ok(())
    }
}
