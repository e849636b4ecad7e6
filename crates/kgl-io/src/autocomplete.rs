//! Label prefix completion for interactive clients (spec §6).

use kgl_core::TripleStore;
use std::collections::BTreeSet;

const MAX_COMPLETIONS: usize = 5;
const MIN_PREFIX_LEN: usize = 2;

/// Returns up to [`MAX_COMPLETIONS`] labels starting with `prefix`
/// (case-insensitive), sorted for determinism. Prefixes shorter than
/// [`MIN_PREFIX_LEN`] always return an empty list.
pub fn complete(store: &TripleStore, namespace: &str, prefix: &str) -> Vec<String> {
    if prefix.chars().count() < MIN_PREFIX_LEN {
        return Vec::new();
    }
    let needle = prefix.to_lowercase();

    let matches: BTreeSet<String> = store
        .labels(namespace)
        .iter()
        .map(|label| label.as_str().to_string())
        .filter(|label| label.to_lowercase().starts_with(&needle))
        .collect();

    matches.into_iter().take(MAX_COMPLETIONS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgl_core::{RawTriple, StoreConfig, DEFAULT_NAMESPACE};

    fn dataset() -> TripleStore {
        let mut store = TripleStore::new(StoreConfig::default());
        store.add(RawTriple::new("james", "likes", "coffee"), DEFAULT_NAMESPACE).unwrap();
        store.add(RawTriple::new("jane", "likes", "tea"), DEFAULT_NAMESPACE).unwrap();
        store.add(RawTriple::new("anna", "likes", "coffee"), DEFAULT_NAMESPACE).unwrap();
        store
    }

    #[test]
    fn short_prefix_returns_empty() {
        let store = dataset();
        assert!(complete(&store, DEFAULT_NAMESPACE, "j").is_empty());
    }

    #[test]
    fn matches_are_case_insensitive_and_sorted() {
        let store = dataset();
        let completions = complete(&store, DEFAULT_NAMESPACE, "JA");
        assert_eq!(completions, vec!["james".to_string(), "jane".to_string()]);
    }

    #[test]
    fn caps_at_five_results() {
        let mut store = TripleStore::new(StoreConfig::default());
        for i in 0..10 {
            store
                .add(RawTriple::new(format!("label{i}"), "p", "o"), DEFAULT_NAMESPACE)
                .unwrap();
        }
        let completions = complete(&store, DEFAULT_NAMESPACE, "lab");
        assert_eq!(completions.len(), 5);
    }
}
