//! Persisted job-posting stores (read-only lookups of stored analyses).

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryJobPostingStore;
pub use postgres::PostgresJobPostingStore;
