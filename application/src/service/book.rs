use error_stack::Report;
use tracing::info;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::event::{DependOnReviewPublisher, ReviewEvent};
use kernel::interface::query::{BookQuery, DependOnBookQuery, DependOnReviewQuery, ReviewQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookId, BookTitle, BOOK_SCHEMA};
use kernel::KernelError;

use crate::service::review::publish;
use crate::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, GetBookDto, GetBooksDto, PageDto, ReviewSummaryDto,
};

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery + DependOnReviewQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = BookId::new(dto.id);
        let book = self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("Book {} not found", dto.id))
            })?;
        let reviews = self
            .review_query()
            .find_by_book(&mut connection, &id)
            .await?
            .into_iter()
            .map(ReviewSummaryDto::from)
            .collect();
        Ok(BookDto::new(book, reviews))
    }

    async fn get_books(&self, dto: GetBooksDto) -> error_stack::Result<PageDto<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let total_items = self.book_query().count(&mut connection).await?;
        let books = self
            .book_query()
            .find_all(&mut connection, &dto.pagination)
            .await?;

        let mut items = Vec::with_capacity(books.len());
        for book in books {
            let reviews = self
                .review_query()
                .find_by_book(&mut connection, book.id())
                .await?
                .into_iter()
                .map(ReviewSummaryDto::from)
                .collect();
            items.push(BookDto::new(book, reviews));
        }
        Ok(PageDto::new(items, total_items, &dto.pagination))
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery + DependOnReviewQuery {}

#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        BOOK_SCHEMA.validate(&dto)?;
        let title = dto.into_title()?;

        let mut connection = self.database_connection().transact().await?;
        let book = Book::new(BookId::new(Uuid::new_v4()), BookTitle::new(title));
        self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;

        info!("Created book {}", book.id().as_ref());
        Ok(BookDto::new(book, Vec::new()))
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnBookModifier + DependOnReviewQuery + DependOnReviewPublisher
{
    /// Removes the book together with its reviews and announces each removed review.
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = BookId::new(dto.id);
        let removed = self
            .review_query()
            .find_by_book(&mut connection, &id)
            .await?;
        self.book_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;

        info!("Deleted book {} with {} reviews", dto.id, removed.len());
        for review in removed {
            let id = review.id().clone();
            publish(self.review_publisher(), ReviewEvent::Deleted { id });
        }
        Ok(())
    }
}

impl<T> DeleteBookService for T where
    T: DependOnBookModifier + DependOnReviewQuery + DependOnReviewPublisher
{
}
