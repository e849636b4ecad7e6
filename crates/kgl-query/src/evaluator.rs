//! Recursive AST evaluator (spec §4.6).

use crate::ast::{Ast, Block, Comparator, Condition, Modifier, NodeFlag, Operand, Step};
use crate::error::QueryError;
use crate::parser;
use kgl_core::{shortest_path, Label, PathStep, StoreConfig, TripleStore};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// The default cap on total step invocations within one `evaluate` call
/// (spec §4.6, "Query depth limit").
pub const DEFAULT_DEPTH_CAP: usize = 50;

/// Rolling state carried through a single block's step list.
#[derive(Debug, Clone)]
enum Current {
    /// The root node's own neighbor dict, keyed by predicate.
    Root {
        label: Label,
        neighbors: HashMap<Label, Vec<Label>>,
    },
    /// A flat, order-preserving, deduplicated label collection.
    Flat(Vec<Label>),
    /// One `{label: neighbors(label)}` entry per matched label (subsequence
    /// results, or the output of an `!` expand).
    Subsequence(Vec<(Label, HashMap<Label, Vec<Label>>)>),
    Path(Vec<PathStep>),
}

/// The value produced by evaluating one `{...}` block, before pipeline-level
/// operand folding.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockResult {
    Dict(Label, HashMap<Label, Vec<Label>>),
    Labels(Vec<Label>),
    Expanded(Vec<(Label, HashMap<Label, Vec<Label>>)>),
    Path(Vec<PathStep>),
    Count(usize),
    Exists(bool),
    Empty,
}

/// The top-level shape returned by [`Evaluator::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum EvalResult {
    Empty,
    Blocks(Vec<BlockResult>),
    Count(usize),
    Exists(bool),
    MostConnected(Label, usize),
}

#[derive(Debug)]
pub struct EvalOutput {
    pub result: EvalResult,
    pub elapsed_seconds: f64,
    pub warnings: Vec<kgl_core::KglWarning>,
}

pub struct Evaluator {
    depth_cap: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator {
            depth_cap: DEFAULT_DEPTH_CAP,
        }
    }
}

impl Evaluator {
    pub fn new(depth_cap: usize) -> Self {
        Evaluator { depth_cap }
    }

    pub fn evaluate(
        &self,
        query: &str,
        store: &mut TripleStore,
        namespace: &str,
    ) -> Result<EvalOutput, QueryError> {
        let started = Instant::now();
        let ast = parser::parse(query)?;
        let mut ctx = Ctx {
            depth_cap: self.depth_cap,
            steps_taken: 0,
            warnings: Vec::new(),
        };
        let result = eval_ast(&ast, store, namespace, &mut ctx)?;
        Ok(EvalOutput {
            result,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            warnings: ctx.warnings,
        })
    }
}

struct Ctx {
    depth_cap: usize,
    steps_taken: usize,
    warnings: Vec<kgl_core::KglWarning>,
}

impl Ctx {
    fn tick(&mut self) -> Result<(), QueryError> {
        self.steps_taken += 1;
        if self.steps_taken > self.depth_cap {
            tracing::warn!(cap = self.depth_cap, "query depth cap exceeded");
            return Err(QueryError::QueryDepthExceeded {
                cap: self.depth_cap,
            });
        }
        Ok(())
    }
}

fn eval_ast(
    ast: &Ast,
    store: &mut TripleStore,
    namespace: &str,
    ctx: &mut Ctx,
) -> Result<EvalResult, QueryError> {
    match ast {
        Ast::Empty => Ok(EvalResult::Empty),

        Ast::RandomWalk(block) => {
            let Some(subject) = store.random_subject(namespace) else {
                return Ok(EvalResult::Empty);
            };
            let synthetic = Block {
                graph: block.graph.clone(),
                steps: vec![Step::Node {
                    label: subject,
                    flag: NodeFlag::None,
                    conditions: Vec::new(),
                }],
                modifier: block.modifier,
            };
            let result = eval_block(&synthetic, store, namespace, ctx)?;
            Ok(EvalResult::Blocks(vec![result]))
        }

        Ast::CountAll => {
            let total: usize = store
                .labels(namespace)
                .iter()
                .map(|label| store.neighbors(label, namespace).len())
                .sum();
            Ok(EvalResult::Count(total))
        }

        Ast::ExistsAny => {
            for _ in 0..1000 {
                let Some(a) = store.random_subject(namespace) else {
                    return Ok(EvalResult::Exists(false));
                };
                let Some(b) = store.random_subject(namespace) else {
                    return Ok(EvalResult::Exists(false));
                };
                if shortest_path(store, &a, &b, namespace, ctx.depth_cap).is_some() {
                    return Ok(EvalResult::Exists(true));
                }
            }
            Ok(EvalResult::Exists(false))
        }

        Ast::MostConnected => match store.most_connected(namespace) {
            Some((label, degree)) => Ok(EvalResult::MostConnected(label, degree)),
            None => Ok(EvalResult::Empty),
        },

        Ast::CommaTriple { s, p, o } => {
            store
                .add(kgl_core::RawTriple::new(s.as_str(), p.as_str(), o.as_str()), namespace)
                .map_err(|e| QueryError::InvalidQuery {
                    position: 0,
                    message: e.to_string(),
                })?;
            Ok(EvalResult::Empty)
        }

        Ast::Pipeline { blocks, ops } => {
            if blocks.len() == 1 {
                let result = eval_block(&blocks[0], store, namespace, ctx)?;
                return Ok(EvalResult::Blocks(vec![result]));
            }

            let mut sets: Vec<HashSet<Label>> = Vec::with_capacity(blocks.len());
            for block in blocks {
                let result = eval_block(block, store, namespace, ctx)?;
                sets.push(to_label_set(&result));
            }

            let mut acc = sets[0].clone();
            for (i, op) in ops.iter().enumerate() {
                let Some(next) = sets.get(i + 1) else { break };
                acc = match op {
                    Operand::Union => acc.union(next).cloned().collect(),
                    Operand::Difference => acc.difference(next).cloned().collect(),
                    Operand::Intersection => acc.intersection(next).cloned().collect(),
                };
            }

            let mut combined: Vec<Label> = acc.into_iter().collect();
            combined.sort();
            Ok(EvalResult::Blocks(vec![BlockResult::Labels(combined)]))
        }
    }
}

fn to_label_set(result: &BlockResult) -> HashSet<Label> {
    match result {
        BlockResult::Dict(_, d) => d.keys().cloned().collect(),
        BlockResult::Labels(v) => v.iter().cloned().collect(),
        BlockResult::Expanded(items) => items.iter().map(|(l, _)| l.clone()).collect(),
        BlockResult::Path(_) | BlockResult::Count(_) | BlockResult::Exists(_) | BlockResult::Empty => {
            HashSet::new()
        }
    }
}

fn eval_block(
    block: &Block,
    store: &mut TripleStore,
    namespace: &str,
    ctx: &mut Ctx,
) -> Result<BlockResult, QueryError> {
    let ns = block.graph.as_deref().unwrap_or(namespace);

    if block.is_empty_query() {
        let Some(subject) = store.random_subject(ns) else {
            return Ok(BlockResult::Empty);
        };
        let synthetic = vec![Step::Node {
            label: subject,
            flag: NodeFlag::None,
            conditions: Vec::new(),
        }];
        let current = walk_steps(&synthetic, store, ns, ctx)?;
        return Ok(apply_modifier(current, block.modifier, store, ns));
    }

    let current = walk_steps(&block.steps, store, ns, ctx)?;
    Ok(apply_modifier(current, block.modifier, store, ns))
}

fn walk_steps(
    steps: &[Step],
    store: &mut TripleStore,
    ns: &str,
    ctx: &mut Ctx,
) -> Result<Current, QueryError> {
    let mut current: Option<Current> = None;
    let mut i = 0;

    while i < steps.len() {
        ctx.tick()?;
        match &steps[i] {
            Step::Node {
                label,
                flag,
                conditions,
            } if current.is_none() => {
                let root = eval_root_node(label, *flag, store, ns, ctx);
                current = Some(apply_conditions(root, conditions, store, ns));
                i += 1;
            }
            Step::Node { .. } => {
                // Consumed as a predicate/endpoint label by the preceding
                // relation or interrelation step; nothing to do here.
                i += 1;
            }
            Step::Relation => {
                let predicate = match steps.get(i + 1) {
                    Some(Step::Node { label, .. }) => label.clone(),
                    _ => {
                        return Err(QueryError::InvalidQuery {
                            position: 0,
                            message: "relation missing a following property".to_string(),
                        })
                    }
                };
                let base = current.take().unwrap_or(Current::Flat(Vec::new()));
                current = Some(apply_relation(base, &predicate, store, ns)?);
                i += 2;
            }
            Step::Interrelation => {
                let first = match &current {
                    Some(Current::Root { label, .. }) => label.clone(),
                    Some(Current::Flat(labels)) => {
                        labels.first().cloned().unwrap_or_else(|| Label::from(""))
                    }
                    _ => Label::from(""),
                };
                let second = match steps.get(i + 1) {
                    Some(Step::Node { label, .. }) => label.clone(),
                    _ => {
                        return Err(QueryError::InvalidQuery {
                            position: 0,
                            message: "interrelation missing a following endpoint".to_string(),
                        })
                    }
                };
                let path = shortest_path(store, &first, &second, ns, ctx.depth_cap);
                current = Some(Current::Path(path.unwrap_or_default()));
                i += 2;
            }
        }
    }

    Ok(current.unwrap_or(Current::Flat(Vec::new())))
}

fn eval_root_node(
    label: &Label,
    flag: NodeFlag,
    store: &mut TripleStore,
    ns: &str,
    ctx: &mut Ctx,
) -> Current {
    match flag {
        NodeFlag::None => root_dict(store, label, ns),
        NodeFlag::Near => {
            if store.has_similarity_index(ns) {
                Current::Flat(store.knn(label, 3, ns))
            } else {
                tracing::debug!(%label, "near flag used without a similarity index; falling back to a plain lookup");
                ctx.warnings.push(kgl_core::KglWarning::NearWithoutSimilarityIndex);
                root_dict(store, label, ns)
            }
        }
        NodeFlag::Enumerate => {
            if store.has_substring_index(ns) {
                let mut seen = HashSet::new();
                let labels: Vec<Label> = store
                    .substring_lookup(label, ns)
                    .into_iter()
                    .filter(|l| seen.insert(l.clone()))
                    .collect();
                Current::Flat(labels)
            } else {
                tracing::debug!(%label, "substring flag used without a substring index; falling back to a plain lookup");
                ctx.warnings.push(kgl_core::KglWarning::SubstringSearchDisabled);
                root_dict(store, label, ns)
            }
        }
        NodeFlag::Subsequence => {
            if store.has_substring_index(ns) {
                let mut seen = HashSet::new();
                let matches: Vec<Label> = store
                    .substring_lookup(label, ns)
                    .into_iter()
                    .filter(|l| seen.insert(l.clone()))
                    .collect();
                let items = matches
                    .into_iter()
                    .map(|l| {
                        let dict = flatten_dict(store.neighbors(&l, ns));
                        (l, dict)
                    })
                    .collect();
                Current::Subsequence(items)
            } else {
                tracing::debug!(%label, "substring flag used without a substring index; falling back to a plain lookup");
                ctx.warnings.push(kgl_core::KglWarning::SubstringSearchDisabled);
                root_dict(store, label, ns)
            }
        }
    }
}

fn root_dict(store: &TripleStore, label: &Label, ns: &str) -> Current {
    Current::Root {
        label: label.clone(),
        neighbors: flatten_dict(store.neighbors(label, ns)),
    }
}

fn flatten_dict(
    dict: HashMap<Label, kgl_core::OrderedSet<Label>>,
) -> HashMap<Label, Vec<Label>> {
    dict.into_iter()
        .map(|(predicate, set)| (predicate, set.into_iter().collect()))
        .collect()
}

fn apply_relation(
    current: Current,
    predicate: &Label,
    store: &TripleStore,
    ns: &str,
) -> Result<Current, QueryError> {
    match current {
        Current::Root { neighbors, .. } => match neighbors.get(predicate) {
            Some(values) => Ok(Current::Flat(values.clone())),
            None => Err(QueryError::MissingProperty(predicate.to_string())),
        },
        Current::Flat(labels) => {
            let mut out = Vec::new();
            let mut seen = HashSet::new();
            for label in &labels {
                for neighbor in store.neighbors_by_predicate(label, predicate, ns) {
                    if seen.insert(neighbor.clone()) {
                        out.push(neighbor);
                    }
                }
            }
            Ok(Current::Flat(out))
        }
        Current::Subsequence(items) => {
            let mut out = Vec::new();
            let mut seen = HashSet::new();
            for (label, dict) in &items {
                let matches: Box<dyn Iterator<Item = Label>> = match dict.get(predicate) {
                    Some(values) => Box::new(values.clone().into_iter()),
                    None => Box::new(store.neighbors_by_predicate(label, predicate, ns).into_iter()),
                };
                for neighbor in matches {
                    if seen.insert(neighbor.clone()) {
                        out.push(neighbor);
                    }
                }
            }
            Ok(Current::Flat(out))
        }
        Current::Path(_) => Ok(Current::Flat(Vec::new())),
    }
}

fn apply_conditions(
    current: Current,
    conditions: &[Condition],
    store: &TripleStore,
    ns: &str,
) -> Current {
    if conditions.is_empty() {
        return current;
    }

    let holds = |candidate: &Label| conditions.iter().all(|c| condition_holds(store, ns, candidate, c));

    match current {
        Current::Root { label, neighbors } => {
            if holds(&label) {
                Current::Root { label, neighbors }
            } else {
                Current::Flat(Vec::new())
            }
        }
        Current::Flat(labels) => Current::Flat(labels.into_iter().filter(|l| holds(l)).collect()),
        Current::Subsequence(items) => {
            Current::Subsequence(items.into_iter().filter(|(l, _)| holds(l)).collect())
        }
        Current::Path(path) => Current::Path(path),
    }
}

fn condition_holds(store: &TripleStore, ns: &str, candidate: &Label, cond: &Condition) -> bool {
    let term1 = Label::normalize(&cond.term1);
    let neighbors = store.neighbors(candidate, ns);
    let Some(values) = neighbors.get(&term1) else {
        return false;
    };
    let Some(actual) = values.iter().next() else {
        return false;
    };
    let expected = cond.term2.as_str();
    match cond.comparator {
        Comparator::Eq => actual.as_str() == expected,
        Comparator::Neq => actual.as_str() != expected,
        Comparator::Gt => actual.as_str() > expected,
        Comparator::Lt => actual.as_str() < expected,
    }
}

fn apply_modifier(
    current: Current,
    modifier: Option<Modifier>,
    store: &TripleStore,
    ns: &str,
) -> BlockResult {
    let base = match current {
        Current::Root { label, neighbors } => BlockResult::Dict(label, neighbors),
        Current::Flat(labels) => BlockResult::Labels(labels),
        Current::Subsequence(items) => BlockResult::Expanded(items),
        Current::Path(path) => BlockResult::Path(path),
    };

    match modifier {
        None => base,
        Some(Modifier::Count) => BlockResult::Count(block_result_len(&base)),
        Some(Modifier::Exists) => BlockResult::Exists(block_result_len(&base) > 0),
        Some(Modifier::Expand) => expand(base, store, ns),
    }
}

fn block_result_len(result: &BlockResult) -> usize {
    match result {
        BlockResult::Dict(_, d) => d.len(),
        BlockResult::Labels(v) => v.len(),
        BlockResult::Expanded(v) => v.len(),
        BlockResult::Path(v) => v.len(),
        BlockResult::Count(n) => *n,
        BlockResult::Exists(b) => *b as usize,
        BlockResult::Empty => 0,
    }
}

fn expand(result: BlockResult, store: &TripleStore, ns: &str) -> BlockResult {
    match result {
        BlockResult::Dict(..) | BlockResult::Expanded(_) => result,
        BlockResult::Labels(labels) => {
            let mut items: Vec<(Label, HashMap<Label, Vec<Label>>)> = labels
                .into_iter()
                .filter_map(|label| {
                    let dict = flatten_dict(store.neighbors(&label, ns));
                    if dict.is_empty() {
                        None
                    } else {
                        Some((label, dict))
                    }
                })
                .collect();
            items.sort_by(|a, b| a.0.cmp(&b.0));
            BlockResult::Expanded(items)
        }
        other => other,
    }
}
