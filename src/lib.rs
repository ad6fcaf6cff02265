//! In-memory TF-IDF full-text search engine.
//!
//! Documents are indexed into a pair of cross-referencing frequency maps
//! (word -> document and document -> word). Queries support required and
//! excluded ("minus") words with stop-word filtering; hits are ranked by
//! TF-IDF relevance with rating tiebreaks. Search, removal, and matching can
//! run sequentially or data-parallel on rayon workers, with identical
//! results either way.
//!
//! ```
//! use memsearch::{DocumentStatus, ExecutionMode, SearchEngine};
//!
//! let mut engine = SearchEngine::new(["and"]).unwrap();
//! engine
//!     .add_document(0, "white cat and fancy collar", DocumentStatus::Actual, &[8, -3])
//!     .unwrap();
//! let hits = engine
//!     .find_top_documents("fancy cat", DocumentStatus::Actual, ExecutionMode::Sequential)
//!     .unwrap();
//! assert_eq!(hits[0].id, 0);
//! ```

pub mod concurrent_map;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod paginator;
pub mod process_queries;
pub mod query;
pub mod request_queue;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use document::{DocId, Document, DocumentStatus};
pub use error::SearchError;
pub use index::{EngineConfig, ExecutionMode, SearchEngine};
pub use paginator::paginate;
pub use process_queries::process_queries;
pub use query::Query;
pub use request_queue::RequestQueue;
