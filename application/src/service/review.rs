use error_stack::Report;
use tracing::{info, warn};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::event::{DependOnReviewPublisher, ReviewEvent, ReviewPublisher};
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnReviewQuery, ReviewFilter, ReviewOrder, ReviewQuery,
};
use kernel::interface::update::{DependOnReviewModifier, ReviewModifier};
use kernel::prelude::entity::{BookId, Pagination, Review, ReviewId, REVIEW_SCHEMA};
use kernel::{KernelError, ViolationReport};

use crate::transfer::{
    DeleteReviewDto, GetBookReviewsDto, GetReviewDto, GetReviewsDto, PageDto, PatchReviewDto,
    ReplaceReviewDto, ReviewDraft, ReviewDto, ReviewParts,
};

pub(crate) async fn find_review<Q: ReviewQuery + ?Sized>(
    query: &Q,
    con: &mut Q::Transaction,
    id: &ReviewId,
) -> error_stack::Result<Review, KernelError> {
    query.find_by_id(con, id).await?.ok_or_else(|| {
        Report::new(KernelError::NotFound)
            .attach_printable(format!("Review {} not found", id.as_ref()))
    })
}

async fn ensure_book_exists<Q: BookQuery + ?Sized>(
    query: &Q,
    con: &mut Q::Transaction,
    id: &BookId,
) -> error_stack::Result<(), KernelError> {
    match query.find_by_id(con, id).await? {
        Some(_) => Ok(()),
        None => Err(Report::violation(
            "book",
            format!("Item not found for \"/books/{}\".", id.as_ref()),
        )),
    }
}

async fn list_reviews<Q: ReviewQuery + ?Sized>(
    query: &Q,
    con: &mut Q::Transaction,
    filter: &ReviewFilter,
    orders: &[ReviewOrder],
    pagination: &Pagination,
) -> error_stack::Result<PageDto<ReviewDto>, KernelError> {
    let total_items = query.count(con, filter).await?;
    let reviews = query.find_all(con, filter, orders, pagination).await?;
    let items = reviews.into_iter().map(ReviewDto::from).collect();
    Ok(PageDto::new(items, total_items, pagination))
}

pub(crate) fn publish<P: ReviewPublisher + ?Sized>(publisher: &P, event: ReviewEvent) {
    if let Err(report) = publisher.publish(event) {
        warn!("{report:?}");
    }
}

#[async_trait::async_trait]
pub trait GetReviewService: 'static + Sync + Send + DependOnReviewQuery {
    async fn get_review(&self, dto: GetReviewDto) -> error_stack::Result<ReviewDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let review = find_review(self.review_query(), &mut connection, &ReviewId::new(dto.id)).await?;
        Ok(ReviewDto::from(review))
    }

    async fn get_reviews(
        &self,
        dto: GetReviewsDto,
    ) -> error_stack::Result<PageDto<ReviewDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let filter = ReviewFilter::new(dto.book.map(BookId::new));
        list_reviews(
            self.review_query(),
            &mut connection,
            &filter,
            &dto.orders,
            &dto.pagination,
        )
        .await
    }
}

impl<T> GetReviewService for T where T: DependOnReviewQuery {}

#[async_trait::async_trait]
pub trait GetBookReviewService:
    'static + Sync + Send + DependOnBookQuery + DependOnReviewQuery
{
    /// Fails with [`KernelError::NotFound`] when the book does not exist.
    async fn get_book_reviews(
        &self,
        dto: GetBookReviewsDto,
    ) -> error_stack::Result<PageDto<ReviewDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let book_id = BookId::new(dto.book_id);
        if self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?
            .is_none()
        {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} not found", dto.book_id)));
        }
        let filter = ReviewFilter::by_book(book_id);
        list_reviews(
            self.review_query(),
            &mut connection,
            &filter,
            &dto.orders,
            &dto.pagination,
        )
        .await
    }
}

impl<T> GetBookReviewService for T where T: DependOnBookQuery + DependOnReviewQuery {}

#[async_trait::async_trait]
pub trait CreateReviewService:
    'static + Sync + Send + DependOnBookQuery + DependOnReviewModifier + DependOnReviewPublisher
{
    async fn create_review(&self, draft: ReviewDraft) -> error_stack::Result<ReviewDto, KernelError> {
        REVIEW_SCHEMA.validate(&draft)?;
        let parts = ReviewParts::try_from(draft)?;

        let mut connection = self.database_connection().transact().await?;
        ensure_book_exists(self.book_query(), &mut connection, &parts.book).await?;

        let review = Review::new(
            ReviewId::new(Uuid::new_v4()),
            parts.body,
            parts.rating,
            parts.letter,
            parts.book,
            parts.author,
            parts.publication_date,
        );
        self.review_modifier()
            .create(&mut connection, &review)
            .await?;
        connection.commit().await?;

        info!("Created review {}", review.id().as_ref());
        publish(self.review_publisher(), ReviewEvent::Created(review.clone()));
        Ok(ReviewDto::from(review))
    }
}

impl<T> CreateReviewService for T where
    T: DependOnBookQuery + DependOnReviewModifier + DependOnReviewPublisher
{
}

async fn save_draft<S>(
    service: &S,
    mut connection: <S::DatabaseConnection as DatabaseConnection>::Transaction,
    mut review: Review,
    draft: ReviewDraft,
) -> error_stack::Result<ReviewDto, KernelError>
where
    S: DependOnBookQuery + DependOnReviewModifier + DependOnReviewPublisher + ?Sized,
{
    REVIEW_SCHEMA.validate(&draft)?;
    let ReviewParts {
        body,
        rating,
        letter,
        book,
        author,
        publication_date,
    } = ReviewParts::try_from(draft)?;
    ensure_book_exists(service.book_query(), &mut connection, &book).await?;

    review.substitute(|review| {
        *review.body = body;
        *review.rating = rating;
        *review.letter = letter;
        *review.author = author;
        *review.publication_date = publication_date;
    });
    review.set_book(book);

    service
        .review_modifier()
        .update(&mut connection, &review)
        .await?;
    connection.commit().await?;

    info!("Updated review {}", review.id().as_ref());
    publish(service.review_publisher(), ReviewEvent::Updated(review.clone()));
    Ok(ReviewDto::from(review))
}

#[async_trait::async_trait]
pub trait UpdateReviewService:
    'static
    + Sync
    + Send
    + DependOnBookQuery
    + DependOnReviewQuery
    + DependOnReviewModifier
    + DependOnReviewPublisher
{
    /// Replaces every writable field; fields missing from the draft become null.
    async fn replace_review(
        &self,
        dto: ReplaceReviewDto,
    ) -> error_stack::Result<ReviewDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let review = find_review(self.review_query(), &mut connection, &ReviewId::new(dto.id)).await?;
        save_draft(self, connection, review, dto.draft).await
    }

    async fn patch_review(&self, dto: PatchReviewDto) -> error_stack::Result<ReviewDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let review = find_review(self.review_query(), &mut connection, &ReviewId::new(dto.id)).await?;
        let mut draft = ReviewDraft::from(&review);
        dto.apply(&mut draft);
        save_draft(self, connection, review, draft).await
    }
}

impl<T> UpdateReviewService for T where
    T: DependOnBookQuery + DependOnReviewQuery + DependOnReviewModifier + DependOnReviewPublisher
{
}

#[async_trait::async_trait]
pub trait DeleteReviewService:
    'static + Sync + Send + DependOnReviewModifier + DependOnReviewPublisher
{
    async fn delete_review(&self, dto: DeleteReviewDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = ReviewId::new(dto.id);
        self.review_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;

        info!("Deleted review {}", dto.id);
        publish(self.review_publisher(), ReviewEvent::Deleted { id });
        Ok(())
    }
}

impl<T> DeleteReviewService for T where T: DependOnReviewModifier + DependOnReviewPublisher {}
