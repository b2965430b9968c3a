//! `hirelens-core`: domain primitives shared by every hirelens crate.
//!
//! This crate contains **pure domain** types (no I/O, no runtime).

pub mod analysis;
pub mod error;
pub mod id;

pub use analysis::AnalysisResult;
pub use error::{DomainError, DomainResult};
pub use id::JobId;
