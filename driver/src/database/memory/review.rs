use std::cmp::Ordering;

use error_stack::Report;

use kernel::interface::query::{ReviewFilter, ReviewOrder, ReviewOrderKey, ReviewQuery};
use kernel::interface::update::ReviewModifier;
use kernel::prelude::entity::{BookId, OrderDirection, Pagination, Review, ReviewId};
use kernel::KernelError;

use crate::database::memory::{InMemoryTransaction, MemoryStore};

#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryReviewRepository;

/// Ascending order puts missing values last, descending puts them first.
fn compare(left: &Review, right: &Review, order: &ReviewOrder) -> Ordering {
    let ordering = match order.key() {
        ReviewOrderKey::Id => left.id().as_ref().cmp(right.id().as_ref()),
        ReviewOrderKey::PublicationDate => {
            match (left.publication_date(), right.publication_date()) {
                (Some(left), Some(right)) => left.as_ref().cmp(right.as_ref()),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
    };
    match order.direction() {
        OrderDirection::Asc => ordering,
        OrderDirection::Desc => ordering.reverse(),
    }
}

fn filtered<'a>(store: &'a MemoryStore, filter: &'a ReviewFilter) -> impl Iterator<Item = &'a Review> {
    store
        .reviews
        .values()
        .filter(move |review| filter.book().map_or(true, |book| review.book() == book))
}

#[async_trait::async_trait]
impl ReviewQuery for InMemoryReviewRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &ReviewId,
    ) -> error_stack::Result<Option<Review>, KernelError> {
        Ok(con.staged.reviews.get(id.as_ref()).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        filter: &ReviewFilter,
        orders: &[ReviewOrder],
        pagination: &Pagination,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        // The store iterates by id, so a stable sort keeps ascending id as the tie-breaker.
        let mut reviews = filtered(&con.staged, filter).collect::<Vec<_>>();
        reviews.sort_by(|left, right| {
            orders
                .iter()
                .map(|order| compare(left, right, order))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        let reviews = reviews
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit()).unwrap_or(0))
            .cloned()
            .collect();
        Ok(reviews)
    }

    async fn count(
        &self,
        con: &mut InMemoryTransaction,
        filter: &ReviewFilter,
    ) -> error_stack::Result<i64, KernelError> {
        Ok(filtered(&con.staged, filter).count() as i64)
    }

    async fn find_by_book(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<Review>, KernelError> {
        let filter = ReviewFilter::by_book(book_id.clone());
        Ok(filtered(&con.staged, &filter).cloned().collect())
    }
}

#[async_trait::async_trait]
impl ReviewModifier for InMemoryReviewRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        let id = *review.id().as_ref();
        if !con.staged.books.contains_key(review.book().as_ref()) {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "Book {} referenced by review {id} does not exist",
                review.book().as_ref()
            )));
        }
        if con.staged.reviews.contains_key(&id) {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("Review {id} already exists")));
        }
        con.staged.reviews.insert(id, review.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError> {
        let id = *review.id().as_ref();
        if !con.staged.books.contains_key(review.book().as_ref()) {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "Book {} referenced by review {id} does not exist",
                review.book().as_ref()
            )));
        }
        match con.staged.reviews.get_mut(&id) {
            Some(stored) => {
                *stored = review.clone();
                Ok(())
            }
            None => Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Review {id} does not exist"))),
        }
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        review_id: &ReviewId,
    ) -> error_stack::Result<(), KernelError> {
        match con.staged.reviews.remove(review_id.as_ref()) {
            Some(_) => Ok(()),
            None => Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Review {} does not exist", review_id.as_ref()))),
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::{ReviewFilter, ReviewOrder, ReviewOrderKey, ReviewQuery};
    use kernel::interface::update::{BookModifier, ReviewModifier};
    use kernel::prelude::entity::{
        Book, BookId, BookTitle, ItemsPerPage, OrderDirection, Page, Pagination,
        PublicationDate, Review, ReviewBody, ReviewId, ReviewRating,
    };
    use kernel::KernelError;

    use crate::database::{InMemoryBookRepository, InMemoryDatabase, InMemoryReviewRepository};

    fn review(book: &BookId, date: Option<PublicationDate>) -> Review {
        Review::new(
            ReviewId::new(uuid::Uuid::new_v4()),
            ReviewBody::new("body"),
            ReviewRating::new(2i16),
            None,
            book.clone(),
            None,
            date,
        )
    }

    async fn seeded() -> error_stack::Result<(InMemoryDatabase, BookId, Vec<Review>), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;
        let book_id = BookId::new(uuid::Uuid::new_v4());
        InMemoryBookRepository
            .create(&mut con, &Book::new(book_id.clone(), BookTitle::new("title")))
            .await?;
        let reviews = vec![
            review(&book_id, None),
            review(&book_id, Some(PublicationDate::new(datetime!(2020-01-01 0:00 UTC)))),
            review(&book_id, Some(PublicationDate::new(datetime!(2024-01-01 0:00 UTC)))),
        ];
        for review in &reviews {
            InMemoryReviewRepository.create(&mut con, review).await?;
        }
        con.commit().await?;
        Ok((db, book_id, reviews))
    }

    #[tokio::test]
    async fn default_order_is_ascending_id() -> error_stack::Result<(), KernelError> {
        let (db, book_id, mut reviews) = seeded().await?;
        let mut con = db.transact().await?;
        let found = InMemoryReviewRepository
            .find_all(
                &mut con,
                &ReviewFilter::by_book(book_id),
                &[],
                &Pagination::default(),
            )
            .await?;
        reviews.sort_by(|l, r| l.id().as_ref().cmp(r.id().as_ref()));
        assert_eq!(found, reviews);
        Ok(())
    }

    #[tokio::test]
    async fn missing_dates_sort_last_ascending_first_descending(
    ) -> error_stack::Result<(), KernelError> {
        let (db, book_id, reviews) = seeded().await?;
        let [undated, old, new] = <[Review; 3]>::try_from(reviews).expect("three reviews");
        let mut con = db.transact().await?;
        let filter = ReviewFilter::by_book(book_id);

        let asc = [ReviewOrder::new(ReviewOrderKey::PublicationDate, OrderDirection::Asc)];
        let found = InMemoryReviewRepository
            .find_all(&mut con, &filter, &asc, &Pagination::default())
            .await?;
        assert_eq!(found, vec![old.clone(), new.clone(), undated.clone()]);

        let desc = [ReviewOrder::new(ReviewOrderKey::PublicationDate, OrderDirection::Desc)];
        let found = InMemoryReviewRepository
            .find_all(&mut con, &filter, &desc, &Pagination::default())
            .await?;
        assert_eq!(found, vec![undated, new.clone(), old.clone()]);

        let page = Pagination::new(Page::new(2), ItemsPerPage::new(2));
        let found = InMemoryReviewRepository
            .find_all(&mut con, &filter, &desc, &page)
            .await?;
        assert_eq!(found, vec![old]);
        Ok(())
    }

    #[tokio::test]
    async fn deleting_book_removes_its_reviews() -> error_stack::Result<(), KernelError> {
        let (db, book_id, _) = seeded().await?;
        let mut con = db.transact().await?;
        let filter = ReviewFilter::by_book(book_id.clone());
        assert_eq!(InMemoryReviewRepository.count(&mut con, &filter).await?, 3);

        InMemoryBookRepository.delete(&mut con, &book_id).await?;
        assert_eq!(InMemoryReviewRepository.count(&mut con, &filter).await?, 0);
        assert!(InMemoryReviewRepository
            .find_by_book(&mut con, &book_id)
            .await?
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn review_requires_existing_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;
        let orphan = review(&BookId::new(uuid::Uuid::new_v4()), None);
        let report = InMemoryReviewRepository
            .create(&mut con, &orphan)
            .await
            .expect_err("book does not exist");
        assert!(matches!(report.current_context(), KernelError::Concurrency));
        Ok(())
    }
}
