use kernel::interface::database::DatabaseConnection;
use kernel::interface::query::{BookQuery, ReviewQuery};
use kernel::interface::update::{BookModifier, ReviewModifier};

pub use self::{memory::*, postgres::*};

mod memory;
mod postgres;

/// A storage backend together with the repositories that operate on its transactions.
pub trait DatabaseDriver: DatabaseConnection + Clone {
    type BookRepository: Default
        + BookQuery<Transaction = <Self as DatabaseConnection>::Transaction>
        + BookModifier<Transaction = <Self as DatabaseConnection>::Transaction>;
    type ReviewRepository: Default
        + ReviewQuery<Transaction = <Self as DatabaseConnection>::Transaction>
        + ReviewModifier<Transaction = <Self as DatabaseConnection>::Transaction>;
}
