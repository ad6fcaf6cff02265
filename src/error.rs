use crate::document::DocId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Negative or duplicate document id, a word with control characters,
    /// or a malformed query word.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Match requested for an id that is not in the index.
    #[error("document {0} not found")]
    DocumentNotFound(DocId),
}
