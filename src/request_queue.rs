use crate::document::{DocId, Document, DocumentStatus};
use crate::error::SearchError;
use crate::index::{ExecutionMode, SearchEngine};
use std::collections::VecDeque;

/// Sliding window of the most recent search results.
///
/// Keeps up to `capacity` results in arrival order (default: one per minute
/// of a day), evicting the oldest when full, and tracks how many retained
/// results were empty. Failed queries record nothing.
pub struct RequestQueue<'a> {
    engine: &'a SearchEngine,
    requests: VecDeque<Vec<Document>>,
    capacity: usize,
    no_result_count: usize,
}

impl<'a> RequestQueue<'a> {
    pub const DEFAULT_CAPACITY: usize = 1440;

    pub fn new(engine: &'a SearchEngine) -> Self {
        Self::with_capacity(engine, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(engine: &'a SearchEngine, capacity: usize) -> Self {
        Self {
            engine,
            requests: VecDeque::new(),
            capacity,
            no_result_count: 0,
        }
    }

    /// Search by status filter and record the result.
    pub fn add_find_request(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        let results =
            self.engine
                .find_top_documents(raw_query, status, ExecutionMode::Sequential)?;
        self.push(results.clone());
        Ok(results)
    }

    /// Search with an arbitrary predicate and record the result.
    pub fn add_find_request_with<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let results = self.engine.find_top_documents_with(
            raw_query,
            ExecutionMode::Sequential,
            predicate,
        )?;
        self.push(results.clone());
        Ok(results)
    }

    /// How many retained requests produced no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_count
    }

    /// Number of currently retained requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn push(&mut self, results: Vec<Document>) {
        if self.capacity == 0 {
            return;
        }
        if self.requests.len() == self.capacity {
            if let Some(evicted) = self.requests.pop_front() {
                if evicted.is_empty() {
                    self.no_result_count -= 1;
                }
            }
        }
        if results.is_empty() {
            self.no_result_count += 1;
        }
        self.requests.push_back(results);
    }
}
