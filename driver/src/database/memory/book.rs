use error_stack::Report;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookId, Pagination};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.staged.books.get(id.as_ref()).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        pagination: &Pagination,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let books = con
            .staged
            .books
            .values()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit()).unwrap_or(0))
            .cloned()
            .collect();
        Ok(books)
    }

    async fn count(&self, con: &mut InMemoryTransaction) -> error_stack::Result<i64, KernelError> {
        Ok(con.staged.books.len() as i64)
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        let id = *book.id().as_ref();
        if con.staged.books.contains_key(&id) {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("Book {id} already exists")));
        }
        con.staged.books.insert(id, book.clone());
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.books.remove(book_id.as_ref()).is_none() {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Book {} does not exist", book_id.as_ref())));
        }
        con.staged.reviews.retain(|_, review| review.book() != book_id);
        Ok(())
    }
}
