//! Shortest label-traversal path between two nodes (spec §4.5, redesign
//! note in §9: BFS rather than the original's unbounded DFS, but still the
//! lexicographically-first of the length-minimal paths).

use crate::label::Label;
use crate::store::TripleStore;
use std::collections::HashSet;

/// One hop of a path: the label reached, and the predicate that led there
/// (`None` only for the first, source step).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PathStep {
    pub label: Label,
    pub via_predicate: Option<Label>,
}

/// Computes the lexicographically-first shortest path from `a` to `b`,
/// visiting at most `max_visits` distinct labels. Edges are symmetric at the
/// index level, so the search is undirected.
pub fn shortest_path(
    store: &TripleStore,
    a: &Label,
    b: &Label,
    namespace: &str,
    max_visits: usize,
) -> Option<Vec<PathStep>> {
    if a == b {
        return Some(vec![PathStep {
            label: a.clone(),
            via_predicate: None,
        }]);
    }

    let mut visited: HashSet<Label> = HashSet::new();
    visited.insert(a.clone());

    let mut frontier: Vec<Vec<PathStep>> = vec![vec![PathStep {
        label: a.clone(),
        via_predicate: None,
    }]];

    while !frontier.is_empty() && visited.len() < max_visits {
        let mut next_frontier: Vec<Vec<PathStep>> = Vec::new();

        for path in &frontier {
            let current = &path.last().expect("path is never empty").label;
            let neighbors = store.neighbors(current, namespace);

            let mut candidates: Vec<(Label, Label)> = Vec::new();
            for (predicate, targets) in &neighbors {
                for target in targets {
                    candidates.push((target.clone(), predicate.clone()));
                }
            }
            candidates.sort();

            for (neighbor, predicate) in candidates {
                if &neighbor == b {
                    let mut found = path.clone();
                    found.push(PathStep {
                        label: neighbor,
                        via_predicate: Some(predicate),
                    });
                    return Some(found);
                }
                if visited.insert(neighbor.clone()) {
                    let mut extended = path.clone();
                    extended.push(PathStep {
                        label: neighbor,
                        via_predicate: Some(predicate),
                    });
                    next_frontier.push(extended);
                }
            }
        }

        next_frontier.sort();
        frontier = next_frontier;
    }

    None
}
