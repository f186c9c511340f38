use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Review, ReviewId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ReviewModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        review: &Review,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        review_id: &ReviewId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnReviewModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type ReviewModifier: ReviewModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn review_modifier(&self) -> &Self::ReviewModifier;
}
