//! Data Access Module
//!
//! Cached, paginated reads and serialized writes over a [`Backend`](crate::backend::Backend).
//!
//! # Components
//! - `PagedDataAccess`: per-collection reads through a `CacheStore`
//! - `WriteQueue`: FIFO executor for mutations
//! - `Debouncer` / `SearchSession`: search-as-you-type

pub mod debounce;
pub mod page;
pub mod paged;
pub mod queue;
pub mod record;
pub mod search;

pub use debounce::{Debouncer, GenerationToken};
pub use page::Page;
pub use paged::PagedDataAccess;
pub use queue::WriteQueue;
pub use record::Record;
pub use search::{SearchSession, SearchState, DEFAULT_SEARCH_LIMIT};
