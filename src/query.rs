use crate::error::SearchError;
use crate::tokenizer::{is_valid_word, split_words};
use std::collections::BTreeSet;

/// A parsed query: deduplicated required words and excluded ("minus") words,
/// both in canonical sorted order.
#[derive(Debug, Default, Clone)]
pub struct Query {
    pub plus_words: Vec<String>,
    pub minus_words: Vec<String>,
}

impl Query {
    /// Parse a raw query string. A leading `-` marks a minus word; the suffix
    /// must be non-empty, must not start with another `-`, and must contain no
    /// control characters. Stop words are dropped after classification.
    pub fn parse<F>(text: &str, is_stop_word: F) -> Result<Query, SearchError>
    where
        F: Fn(&str) -> bool,
    {
        let mut plus_words = BTreeSet::new();
        let mut minus_words = BTreeSet::new();
        for raw in split_words(text) {
            let (word, is_minus) = match raw.strip_prefix('-') {
                Some(suffix) => (suffix, true),
                None => (raw, false),
            };
            if word.is_empty() || word.starts_with('-') || !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "malformed query word {raw:?}"
                )));
            }
            if is_stop_word(word) {
                continue;
            }
            if is_minus {
                minus_words.insert(word.to_string());
            } else {
                plus_words.insert(word.to_string());
            }
        }
        Ok(Query {
            plus_words: plus_words.into_iter().collect(),
            minus_words: minus_words.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_stop(_: &str) -> bool {
        false
    }

    #[test]
    fn classifies_plus_and_minus_words() {
        let query = Query::parse("fluffy -cat tail", no_stop).unwrap();
        assert_eq!(query.plus_words, vec!["fluffy", "tail"]);
        assert_eq!(query.minus_words, vec!["cat"]);
    }

    #[test]
    fn deduplicates_and_sorts() {
        let query = Query::parse("tail cat tail -dog -dog", no_stop).unwrap();
        assert_eq!(query.plus_words, vec!["cat", "tail"]);
        assert_eq!(query.minus_words, vec!["dog"]);
    }

    #[test]
    fn drops_stop_words_from_both_sets() {
        let query = Query::parse("in the cat -the", |w| w == "in" || w == "the").unwrap();
        assert_eq!(query.plus_words, vec!["cat"]);
        assert!(query.minus_words.is_empty());
    }

    #[test]
    fn rejects_bare_minus() {
        assert!(matches!(
            Query::parse("cat -", no_stop),
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_double_minus() {
        assert!(matches!(
            Query::parse("--cat", no_stop),
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_control_characters() {
        assert!(Query::parse("ca\u{2}t", no_stop).is_err());
        assert!(Query::parse("-ca\u{2}t", no_stop).is_err());
    }
}
