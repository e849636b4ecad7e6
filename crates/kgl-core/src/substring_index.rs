//! Substring/suffix-n-gram index over node labels (spec §4.2).

use crate::label::Label;
use std::collections::HashMap;

/// Maps each whitespace token and suffix n-gram of a subject label to the
/// subjects that contain it. Posting lists may contain duplicates; callers
/// deduplicate at read time.
#[derive(Debug, Default)]
pub struct SubstringIndex {
    postings: HashMap<Label, Vec<Label>>,
}

impl SubstringIndex {
    pub fn new() -> Self {
        SubstringIndex::default()
    }

    /// Indexes `subject` under every whitespace token and every suffix
    /// n-gram `subject[i:]` for `i` in `[1, word_count)`.
    pub fn index(&mut self, subject: &Label) {
        let words: Vec<&str> = subject.as_str().split_whitespace().collect();
        if words.is_empty() {
            return;
        }

        for word in &words {
            self.postings
                .entry(Label::from(*word))
                .or_default()
                .push(subject.clone());
        }

        for i in 1..words.len() {
            let ngram = words[i..].join(" ");
            self.postings
                .entry(Label::from(ngram.as_str()))
                .or_default()
                .push(subject.clone());
        }
    }

    pub fn lookup(&self, token: &Label) -> Vec<Label> {
        self.postings.get(token).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_tokens_and_suffix_ngrams() {
        let mut idx = SubstringIndex::new();
        idx.index(&Label::from("taylor swift eras"));

        assert_eq!(idx.lookup(&Label::from("taylor")), vec![Label::from("taylor swift eras")]);
        assert_eq!(idx.lookup(&Label::from("swift eras")), vec![Label::from("taylor swift eras")]);
        assert_eq!(idx.lookup(&Label::from("eras")), vec![Label::from("taylor swift eras")]);
    }

    #[test]
    fn duplicates_are_permitted() {
        let mut idx = SubstringIndex::new();
        idx.index(&Label::from("coffee"));
        idx.index(&Label::from("coffee"));
        assert_eq!(idx.lookup(&Label::from("coffee")).len(), 2);
    }
}
