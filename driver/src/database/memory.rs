use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{Book, Review};
use kernel::KernelError;

use crate::database::DatabaseDriver;

pub use self::{book::*, review::*};

mod book;
mod review;

#[derive(Debug, Default, Clone)]
pub(in crate::database) struct MemoryStore {
    books: BTreeMap<Uuid, Book>,
    reviews: BTreeMap<Uuid, Review>,
}

/// Process-local storage. Transactions run one at a time and work on a private copy
/// of the store that replaces the shared one on commit.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<MemoryStore>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.store).lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction { guard, staged })
    }
}

impl DatabaseDriver for InMemoryDatabase {
    type BookRepository = InMemoryBookRepository;
    type ReviewRepository = InMemoryReviewRepository;
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryStore>,
    staged: MemoryStore,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let InMemoryTransaction { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}
