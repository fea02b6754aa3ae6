//! Backend client handle for the Civil Codes catalog: models, the access-checked
//! data/auth API with a Postgres and an in-memory adapter, and the session store.

pub mod api;
pub mod auth;
pub mod client;
pub mod database;
pub mod error;
pub mod memory;
pub mod models;

#[cfg(test)]
mod tests;

pub use api::CatalogApi;
pub use client::BackendClient;
pub use error::{BackendError, ValidationError};
pub use memory::MemoryBackend;
