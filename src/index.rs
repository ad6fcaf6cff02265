//! The search engine core: document store, inverted index, TF-IDF scoring
//! and ranking.
//!
//! Two maps hold the same (word, document, frequency) edge set from both
//! directions. Words are interned as `Arc<str>` so the maps share one
//! allocation per distinct word and stay consistent without dangling
//! references into document text.

use crate::concurrent_map::ConcurrentMap;
use crate::document::{DocId, Document, DocumentStatus};
use crate::error::SearchError;
use crate::query::Query;
use crate::tokenizer::{is_valid_word, split_words};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Relevance differences below this are treated as ties and broken by rating.
const RELEVANCE_EPSILON: f64 = 1e-6;

/// Engine construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Maximum number of hits returned by `find_top_documents`.
    pub max_results: usize,
    /// Shard count of the accumulator used by parallel scoring.
    pub shard_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            shard_count: 16,
        }
    }
}

/// Strategy for find/remove/match. Both strategies produce the same results;
/// Parallel fans independent per-word work out across rayon workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Debug, Clone)]
struct DocumentEntry {
    rating: i32,
    status: DocumentStatus,
    text: String,
}

/// In-memory TF-IDF search engine over short text documents.
#[derive(Clone)]
pub struct SearchEngine {
    config: EngineConfig,
    stop_words: HashSet<String>,
    /// word -> document id -> term frequency
    word_to_docs: HashMap<Arc<str>, HashMap<DocId, f64>>,
    /// document id -> word -> term frequency
    doc_to_words: HashMap<DocId, HashMap<Arc<str>, f64>>,
    documents: HashMap<DocId, DocumentEntry>,
    document_ids: BTreeSet<DocId>,
}

impl SearchEngine {
    /// Build an engine with the default configuration. Fails if any stop word
    /// contains control characters; empty stop words are ignored.
    pub fn new<I, S>(stop_words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, EngineConfig::default())
    }

    /// Build an engine from a space-separated stop-word string.
    pub fn from_stop_words_text(text: &str) -> Result<Self, SearchError> {
        Self::new(split_words(text))
    }

    pub fn with_config<I, S>(stop_words: I, config: EngineConfig) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = HashSet::new();
        for word in stop_words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "stop word {word:?} contains control characters"
                )));
            }
            words.insert(word.to_string());
        }
        Ok(Self {
            config,
            stop_words: words,
            word_to_docs: HashMap::new(),
            doc_to_words: HashMap::new(),
            documents: HashMap::new(),
            document_ids: BTreeSet::new(),
        })
    }

    /// Index a document. The id must be non-negative and not already present;
    /// every word must be free of control characters. Validation happens
    /// before any mutation, so a failed call leaves the engine unchanged.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<(), SearchError> {
        if id < 0 {
            return Err(SearchError::InvalidArgument(format!(
                "document id {id} is negative"
            )));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::InvalidArgument(format!(
                "document id {id} already present"
            )));
        }
        let words = self.split_into_words_no_stop(text)?;

        let mut frequencies: HashMap<Arc<str>, f64> = HashMap::new();
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in words {
                let word = self.intern(word);
                *frequencies.entry(word).or_insert(0.0) += inv_word_count;
            }
        }
        for (word, &tf) in &frequencies {
            self.word_to_docs
                .entry(Arc::clone(word))
                .or_default()
                .insert(id, tf);
        }
        tracing::debug!(id, words = frequencies.len(), "indexed document");
        self.doc_to_words.insert(id, frequencies);
        self.documents.insert(
            id,
            DocumentEntry {
                rating: average_rating(ratings),
                status,
                text: text.to_string(),
            },
        );
        self.document_ids.insert(id);
        Ok(())
    }

    /// Delete a document and all its index entries. No-op when absent.
    pub fn remove_document(&mut self, id: DocId, mode: ExecutionMode) {
        if !self.document_ids.remove(&id) {
            return;
        }
        self.documents.remove(&id);
        let words = self.doc_to_words.remove(&id).unwrap_or_default();
        match mode {
            ExecutionMode::Sequential => {
                for word in words.keys() {
                    let emptied = match self.word_to_docs.get_mut(&**word) {
                        Some(postings) => {
                            postings.remove(&id);
                            postings.is_empty()
                        }
                        None => false,
                    };
                    if emptied {
                        self.word_to_docs.remove(&**word);
                    }
                }
            }
            ExecutionMode::Parallel => {
                // Posting maps are disjoint values, so rayon may visit them
                // concurrently; emptied words are swept afterwards.
                self.word_to_docs.par_iter_mut().for_each(|(_, postings)| {
                    postings.remove(&id);
                });
                self.word_to_docs.retain(|_, postings| !postings.is_empty());
            }
        }
        tracing::debug!(id, "removed document");
    }

    /// Top matches for a query, keeping only documents with the given status.
    pub fn find_top_documents(
        &self,
        raw_query: &str,
        status: DocumentStatus,
        mode: ExecutionMode,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_with(raw_query, mode, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top matches for a query, filtered by an arbitrary predicate over
    /// (id, status, rating). Results are sorted by relevance descending,
    /// ties (within 1e-6) broken by rating descending, and capped at
    /// `EngineConfig::max_results`.
    pub fn find_top_documents_with<P>(
        &self,
        raw_query: &str,
        mode: ExecutionMode,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let start = Instant::now();
        let query = self.parse_query(raw_query)?;
        let mut matched = match mode {
            ExecutionMode::Sequential => self.find_all_documents(&query, &predicate),
            ExecutionMode::Parallel => self.find_all_documents_par(&query, &predicate),
        };
        matched.sort_by(compare_documents);
        matched.truncate(self.config.max_results);
        tracing::debug!(
            hits = matched.len(),
            took_s = start.elapsed().as_secs_f64(),
            "query executed"
        );
        Ok(matched)
    }

    /// Which plus words of the query occur in the document, together with its
    /// status. Any minus word present disqualifies the whole document and the
    /// word list comes back empty. Unknown ids are an error.
    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocId,
        mode: ExecutionMode,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        let entry = self
            .documents
            .get(&id)
            .ok_or(SearchError::DocumentNotFound(id))?;
        let query = self.parse_query(raw_query)?;
        let Some(words) = self.doc_to_words.get(&id) else {
            return Ok((Vec::new(), entry.status));
        };
        let matched = match mode {
            ExecutionMode::Sequential => {
                if query
                    .minus_words
                    .iter()
                    .any(|word| words.contains_key(word.as_str()))
                {
                    Vec::new()
                } else {
                    query
                        .plus_words
                        .iter()
                        .filter(|word| words.contains_key(word.as_str()))
                        .cloned()
                        .collect()
                }
            }
            ExecutionMode::Parallel => {
                if query
                    .minus_words
                    .par_iter()
                    .any(|word| words.contains_key(word.as_str()))
                {
                    Vec::new()
                } else {
                    // Indexed parallel collect preserves the parser's sorted
                    // order, matching the sequential path.
                    query
                        .plus_words
                        .par_iter()
                        .filter(|word| words.contains_key(word.as_str()))
                        .cloned()
                        .collect()
                }
            }
        };
        Ok((matched, entry.status))
    }

    /// Word -> term-frequency map for one document; empty when the id is
    /// absent.
    pub fn word_frequencies(&self, id: DocId) -> HashMap<&str, f64> {
        self.doc_to_words
            .get(&id)
            .map(|words| words.iter().map(|(word, &tf)| (&**word, tf)).collect())
            .unwrap_or_default()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.document_ids.iter().copied()
    }

    /// The stored text of a document, if present.
    pub fn document_text(&self, id: DocId) -> Option<&str> {
        self.documents.get(&id).map(|entry| entry.text.as_str())
    }

    fn parse_query(&self, text: &str) -> Result<Query, SearchError> {
        Query::parse(text, |word| self.stop_words.contains(word))
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>, SearchError> {
        let mut words = Vec::new();
        for word in split_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "word {word:?} contains control characters"
                )));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    /// Reuse the interned allocation when the word is already indexed.
    fn intern(&self, word: &str) -> Arc<str> {
        match self.word_to_docs.get_key_value(word) {
            Some((interned, _)) => Arc::clone(interned),
            None => Arc::from(word),
        }
    }

    fn inverse_document_freq(&self, postings: &HashMap<DocId, f64>) -> f64 {
        (self.document_count() as f64 / postings.len() as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: HashMap<DocId, f64> = HashMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.word_to_docs.get(word.as_str()) else {
                continue;
            };
            let idf = self.inverse_document_freq(postings);
            for (&id, &tf) in postings {
                if let Some(entry) = self.documents.get(&id) {
                    if predicate(id, entry.status, entry.rating) {
                        *relevance.entry(id).or_insert(0.0) += tf * idf;
                    }
                }
            }
        }
        for word in &query.minus_words {
            if let Some(postings) = self.word_to_docs.get(word.as_str()) {
                for id in postings.keys() {
                    relevance.remove(id);
                }
            }
        }
        self.collect_matched(relevance)
    }

    fn find_all_documents_par<P>(&self, query: &Query, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let accumulator: ConcurrentMap<DocId, f64> =
            ConcurrentMap::new(self.config.shard_count);
        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.word_to_docs.get(word.as_str()) else {
                return;
            };
            let idf = self.inverse_document_freq(postings);
            for (&id, &tf) in postings {
                if let Some(entry) = self.documents.get(&id) {
                    if predicate(id, entry.status, entry.rating) {
                        *accumulator.access(id) += tf * idf;
                    }
                }
            }
        });
        // Minus words run strictly after plus accumulation so an excluded
        // document can never be re-added by a late plus contribution.
        query.minus_words.par_iter().for_each(|word| {
            if let Some(postings) = self.word_to_docs.get(word.as_str()) {
                for id in postings.keys() {
                    accumulator.erase(id);
                }
            }
        });
        self.collect_matched(accumulator.into_plain_map())
    }

    fn collect_matched(&self, relevance: HashMap<DocId, f64>) -> Vec<Document> {
        relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.documents.get(&id).map(|entry| Document {
                    id,
                    relevance,
                    rating: entry.rating,
                })
            })
            .collect()
    }
}

fn compare_documents(lhs: &Document, rhs: &Document) -> Ordering {
    if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
        // Rating desc, then id asc so ranking is deterministic across modes.
        rhs.rating.cmp(&lhs.rating).then(lhs.id.cmp(&rhs.id))
    } else {
        rhs.relevance.total_cmp(&lhs.relevance)
    }
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&rating| i64::from(rating)).sum();
    (sum / ratings.len() as i64) as i32
}
