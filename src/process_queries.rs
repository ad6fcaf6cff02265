use crate::document::{Document, DocumentStatus};
use crate::error::SearchError;
use crate::index::{ExecutionMode, SearchEngine};
use rayon::prelude::*;

/// Run `find_top_documents` once per query against actual documents.
///
/// Results come back in the caller's query order regardless of mode; Parallel
/// fans the independent searches out across rayon workers while each search
/// itself runs sequentially.
pub fn process_queries(
    engine: &SearchEngine,
    queries: &[String],
    mode: ExecutionMode,
) -> Result<Vec<Vec<Document>>, SearchError> {
    let find = |query: &String| {
        engine.find_top_documents(query, DocumentStatus::Actual, ExecutionMode::Sequential)
    };
    match mode {
        ExecutionMode::Sequential => queries.iter().map(find).collect(),
        ExecutionMode::Parallel => queries.par_iter().map(find).collect(),
    }
}
