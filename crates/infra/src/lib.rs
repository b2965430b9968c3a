//! Infrastructure layer: analysis backend client, persisted-record stores, config.

pub mod backend;
pub mod config;
pub mod persisted;

pub use backend::HttpAnalysisClient;
pub use config::{ConfigError, Settings};
pub use persisted::{InMemoryJobPostingStore, PostgresJobPostingStore};
