use crate::document::DocId;
use crate::index::{ExecutionMode, SearchEngine};
use std::collections::{BTreeSet, HashSet};

/// Ids of documents whose word set exactly matches an earlier document's.
///
/// Word sets are compared ignoring frequencies, so "cat dog cat" duplicates
/// "dog cat". The first document with a given word set survives.
pub fn find_duplicates(engine: &SearchEngine) -> Vec<DocId> {
    let mut seen: HashSet<BTreeSet<String>> = HashSet::new();
    let mut duplicates = Vec::new();
    for id in engine.document_ids() {
        let words: BTreeSet<String> = engine
            .word_frequencies(id)
            .into_keys()
            .map(str::to_string)
            .collect();
        if !seen.insert(words) {
            duplicates.push(id);
        }
    }
    duplicates
}

/// Remove every later duplicate found by [`find_duplicates`]; returns the
/// removed ids in ascending order.
pub fn remove_duplicates(engine: &mut SearchEngine) -> Vec<DocId> {
    let duplicates = find_duplicates(engine);
    for &id in &duplicates {
        tracing::info!(id, "removing duplicate document");
        engine.remove_document(id, ExecutionMode::Sequential);
    }
    duplicates
}
