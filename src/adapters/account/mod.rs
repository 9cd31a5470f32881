//! Account reader adapters.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryAccountReader;
pub use postgres::PostgresAccountReader;
