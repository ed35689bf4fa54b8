pub mod backend;
pub mod client;
pub mod error;

pub use backend::CatalogBackend;
pub use client::{CatalogApi, list_query_params};
pub use error::ApiError;
