//! Roster Cache - cached, paginated data access for the volunteer portal
//!
//! Keeps recently read views of each collection in a TTL and memory bounded
//! cache, serializes writes through a FIFO queue, and debounces search.

pub mod access;
pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use access::{Page, PagedDataAccess, SearchSession, SearchState, WriteQueue};
pub use api::{create_router, AppState};
pub use backend::{Backend, JsonFileBackend, MemoryBackend};
pub use cache::CacheStore;
pub use config::Config;
pub use error::{DataError, Result};
