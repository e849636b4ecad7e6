//! The triple store: triple log, symmetric adjacency, and per-namespace
//! derived indexes (spec §3, §4.1).

use crate::error::KglError;
use crate::label::Label;
use crate::ordered_set::OrderedSet;
use crate::similarity_index::SimilarityIndex;
use crate::substring_index::SubstringIndex;
use crate::triple::{ObjectValue, RawTriple, Triple};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Construction-time configuration for a [`TripleStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Enable the substring/suffix-n-gram index (spec §4.2).
    pub substring_search: bool,
    /// Enable the dense-vector similarity index (spec §4.3).
    pub similarity_index: bool,
    /// Dimensionality of similarity vectors when enabled.
    pub similarity_dims: usize,
    /// Reject invalid triples with [`KglError::InvalidTriple`] instead of
    /// silently skipping them.
    pub strict: bool,
    /// Seed for the RNG backing random-walk and exists-any queries.
    /// `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            substring_search: false,
            similarity_index: false,
            similarity_dims: 384,
            strict: false,
            seed: None,
        }
    }
}

#[derive(Debug, Default)]
struct Namespace {
    triples: Vec<Triple>,
    adjacency: HashMap<Label, HashMap<Label, OrderedSet<Label>>>,
    insertion_order: Vec<Label>,
}

impl Namespace {
    fn note_seen(&mut self, label: &Label) {
        if !self.insertion_order.contains(label) {
            self.insertion_order.push(label.clone());
        }
    }

    fn link(&mut self, a: &Label, predicate: &Label, b: &Label) {
        self.adjacency
            .entry(a.clone())
            .or_default()
            .entry(predicate.clone())
            .or_default()
            .insert(b.clone());
    }

    fn unlink(&mut self, a: &Label, predicate: &Label, b: &Label) {
        if let Some(preds) = self.adjacency.get_mut(a) {
            if let Some(set) = preds.get_mut(predicate) {
                set.remove(b);
                if set.is_empty() {
                    preds.remove(predicate);
                }
            }
            if preds.is_empty() {
                self.adjacency.remove(a);
            }
        }
    }
}

/// The in-memory knowledge-graph triple store (spec §3).
pub struct TripleStore {
    config: StoreConfig,
    namespaces: HashMap<String, Namespace>,
    substring_indexes: HashMap<String, SubstringIndex>,
    similarity_indexes: HashMap<String, SimilarityIndex>,
    rng: StdRng,
}

impl TripleStore {
    pub fn new(config: StoreConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        TripleStore {
            config,
            namespaces: HashMap::new(),
            substring_indexes: HashMap::new(),
            similarity_indexes: HashMap::new(),
            rng,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn namespace_mut(&mut self, namespace: &str) -> &mut Namespace {
        self.namespaces.entry(namespace.to_string()).or_default()
    }

    fn namespace(&self, namespace: &str) -> Option<&Namespace> {
        self.namespaces.get(namespace)
    }

    /// Adds a triple, returning the number of edges actually inserted (0 if
    /// the triple was invalid and silently skipped). A `List` object fans
    /// out into one independent edge per element, each sharing the same
    /// subject and predicate, so a successful list insert returns the list's
    /// length. Validation failures are skipped unless [`StoreConfig::strict`]
    /// is set, in which case they return `Err` instead.
    pub fn add(&mut self, raw: RawTriple, namespace: &str) -> Result<usize, KglError> {
        if let Err(e) = raw.validate() {
            if self.config.strict {
                return Err(e);
            }
            tracing::warn!(subject = %raw.subject, namespace, %e, "skipping invalid triple");
            return Ok(0);
        }

        let subject = Label::normalize(&raw.subject);
        let predicate = Label::normalize(&raw.predicate);
        let objects: Vec<Label> = match &raw.object {
            ObjectValue::Single(s) => vec![Label::normalize(s)],
            ObjectValue::List(items) => items.iter().map(|s| Label::normalize(s)).collect(),
        };

        let inserted = objects.len();
        for object in objects {
            self.add_edge(&subject, &predicate, &object, namespace);
        }
        Ok(inserted)
    }

    fn add_edge(&mut self, subject: &Label, predicate: &Label, object: &Label, namespace: &str) {
        let triple = Triple::new(subject.clone(), predicate.clone(), object.clone());

        if self.config.substring_search {
            self.substring_indexes
                .entry(namespace.to_string())
                .or_default()
                .index(subject);
        }

        if self.config.similarity_index {
            let dims = self.config.similarity_dims;
            self.similarity_indexes
                .entry(namespace.to_string())
                .or_insert_with(|| SimilarityIndex::new(dims))
                .push(object);
        }

        let ns = self.namespace_mut(namespace);
        ns.note_seen(subject);
        ns.note_seen(object);
        ns.link(subject, predicate, object);
        ns.link(object, predicate, subject);
        ns.triples.push(triple);
    }

    /// Removes every edge touching `label`. Does not scrub the substring or
    /// similarity indexes (known limitation, spec §9).
    pub fn remove(&mut self, label: &Label, namespace: &str) {
        let Some(ns) = self.namespaces.get_mut(namespace) else {
            return;
        };

        let touching: Vec<(Label, Label)> = ns
            .adjacency
            .get(label)
            .map(|preds| {
                preds
                    .iter()
                    .flat_map(|(p, neighbors)| neighbors.iter().map(move |n| (p.clone(), n.clone())))
                    .collect()
            })
            .unwrap_or_default();

        for (predicate, neighbor) in &touching {
            ns.unlink(neighbor, predicate, label);
        }
        ns.adjacency.remove(label);
        ns.triples
            .retain(|t| &t.subject != label && &t.object != label);
    }

    /// Per-predicate adjacency of `label`, or empty when absent.
    pub fn neighbors(&self, label: &Label, namespace: &str) -> HashMap<Label, OrderedSet<Label>> {
        self.namespace(namespace)
            .and_then(|ns| ns.adjacency.get(label))
            .cloned()
            .unwrap_or_default()
    }

    /// `adj[label][predicate]`; if that predicate is absent, falls back to
    /// the union of `label`'s neighbors across every predicate (spec §9).
    pub fn neighbors_by_predicate(
        &self,
        label: &Label,
        predicate: &Label,
        namespace: &str,
    ) -> OrderedSet<Label> {
        let Some(ns) = self.namespace(namespace) else {
            return OrderedSet::new();
        };
        let Some(preds) = ns.adjacency.get(label) else {
            return OrderedSet::new();
        };
        if let Some(set) = preds.get(predicate) {
            return set.clone();
        }
        let mut all = OrderedSet::new();
        for set in preds.values() {
            for neighbor in set {
                all.insert(neighbor.clone());
            }
        }
        all
    }

    /// The label with the largest number of distinct predicates, ties broken
    /// by first-insertion order.
    pub fn most_connected(&self, namespace: &str) -> Option<(Label, usize)> {
        let ns = self.namespace(namespace)?;
        let mut best: Option<(Label, usize)> = None;
        for label in &ns.insertion_order {
            let degree = ns.adjacency.get(label).map(|p| p.len()).unwrap_or(0);
            match &best {
                Some((_, best_degree)) if *best_degree >= degree => {}
                _ => best = Some((label.clone(), degree)),
            }
        }
        best
    }

    pub fn triples(&self, namespace: &str) -> &[Triple] {
        self.namespace(namespace).map(|ns| ns.triples.as_slice()).unwrap_or(&[])
    }

    pub fn labels(&self, namespace: &str) -> &[Label] {
        self.namespace(namespace)
            .map(|ns| ns.insertion_order.as_slice())
            .unwrap_or(&[])
    }

    pub fn namespace_names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(|s| s.as_str())
    }

    /// Uniformly samples a subject label from the triple log, for `RandomWalk`
    /// and `ExistsAny` evaluation.
    pub fn random_subject(&mut self, namespace: &str) -> Option<Label> {
        let len = self.namespace(namespace)?.triples.len();
        if len == 0 {
            return None;
        }
        let idx = self.rng.gen_range(0..len);
        self.namespace(namespace).map(|ns| ns.triples[idx].subject.clone())
    }

    pub fn substring_lookup(&self, token: &Label, namespace: &str) -> Vec<Label> {
        self.substring_indexes
            .get(namespace)
            .map(|idx| idx.lookup(token))
            .unwrap_or_default()
    }

    pub fn has_substring_index(&self, namespace: &str) -> bool {
        self.config.substring_search && self.substring_indexes.contains_key(namespace)
    }

    pub fn knn(&self, query: &Label, k: usize, namespace: &str) -> Vec<Label> {
        let Some(sim) = self.similarity_indexes.get(namespace) else {
            return Vec::new();
        };
        let Some(ns) = self.namespace(namespace) else {
            return Vec::new();
        };
        sim.knn(query, k, &ns.triples)
    }

    pub fn has_similarity_index(&self, _namespace: &str) -> bool {
        self.config.similarity_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TripleStore {
        TripleStore::new(StoreConfig {
            seed: Some(42),
            ..Default::default()
        })
    }

    #[test]
    fn add_is_symmetric_at_the_index_level() {
        let mut s = store();
        s.add(RawTriple::new("James", "Likes", "Coffee"), DEFAULT_NAMESPACE)
            .unwrap();

        let likes = Label::from("likes");
        let james = Label::from("james");
        let coffee = Label::from("coffee");

        assert!(s
            .neighbors(&james, DEFAULT_NAMESPACE)
            .get(&likes)
            .unwrap()
            .contains(&coffee));
        assert!(s
            .neighbors(&coffee, DEFAULT_NAMESPACE)
            .get(&likes)
            .unwrap()
            .contains(&james));
    }

    #[test]
    fn list_object_fans_out_into_independent_edges() {
        let mut s = store();
        s.add(
            RawTriple::new("james", "likes", vec!["coffee".to_string(), "tea".to_string()]),
            DEFAULT_NAMESPACE,
        )
        .unwrap();
        assert_eq!(s.triples(DEFAULT_NAMESPACE).len(), 2);
    }

    #[test]
    fn neighbors_by_predicate_falls_back_to_all_neighbors() {
        let mut s = store();
        s.add(RawTriple::new("james", "likes", "coffee"), DEFAULT_NAMESPACE)
            .unwrap();
        let james = Label::from("james");
        let missing_predicate = Label::from("dislikes");
        let result = s.neighbors_by_predicate(&james, &missing_predicate, DEFAULT_NAMESPACE);
        assert!(result.contains(&Label::from("coffee")));
    }

    #[test]
    fn remove_scrubs_back_references() {
        let mut s = store();
        s.add(RawTriple::new("james", "likes", "coffee"), DEFAULT_NAMESPACE)
            .unwrap();
        s.remove(&Label::from("james"), DEFAULT_NAMESPACE);

        let coffee = Label::from("coffee");
        assert!(s.neighbors(&coffee, DEFAULT_NAMESPACE).is_empty());
        assert!(s.triples(DEFAULT_NAMESPACE).is_empty());
    }

    #[test]
    fn most_connected_breaks_ties_by_insertion_order() {
        let mut s = store();
        s.add(RawTriple::new("a", "p1", "x"), DEFAULT_NAMESPACE).unwrap();
        s.add(RawTriple::new("b", "p1", "y"), DEFAULT_NAMESPACE).unwrap();
        let (label, degree) = s.most_connected(DEFAULT_NAMESPACE).unwrap();
        assert_eq!(label, Label::from("a"));
        assert_eq!(degree, 1);
    }

    #[test]
    fn invalid_triple_is_skipped_unless_strict() {
        let mut s = store();
        assert!(s.add(RawTriple::new("   ", "p", "o"), DEFAULT_NAMESPACE).is_ok());
        assert!(s.triples(DEFAULT_NAMESPACE).is_empty());

        let mut strict = TripleStore::new(StoreConfig {
            strict: true,
            ..Default::default()
        });
        assert!(strict.add(RawTriple::new("   ", "p", "o"), DEFAULT_NAMESPACE).is_err());
    }
}
