//! Analysis backend adapters.

pub mod http;

pub use http::HttpAnalysisClient;
