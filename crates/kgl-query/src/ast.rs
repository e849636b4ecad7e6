//! AST shapes produced by the parser (spec §4.4).

use kgl_core::Label;

/// Comparison operator inside a node `(term COMP term)` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Neq,
    Gt,
    Lt,
}

/// A `(term1 COMP term2)` condition attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub term1: String,
    pub comparator: Comparator,
    pub term2: String,
}

/// Node-level flag controlling which index a node step resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeFlag {
    #[default]
    None,
    Near,
    Enumerate,
    Subsequence,
}

/// One `{...}`-internal element: a labelled node, or one of the two relation
/// operators joining a pair of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Node {
        label: Label,
        flag: NodeFlag,
        conditions: Vec<Condition>,
    },
    Relation,
    Interrelation,
}

/// Post-block suffix: `!` expand, `?` exists, `#` count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Expand,
    Exists,
    Count,
}

/// The operator joining two blocks in a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Union,
    Difference,
    Intersection,
}

/// One `{...}` section of a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub graph: Option<String>,
    pub steps: Vec<Step>,
    pub modifier: Option<Modifier>,
}

impl Block {
    pub fn is_empty_query(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Top-level parsed shape of a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// Blank input: no blocks at all.
    Empty,
    /// A lone `{}` block, no operand chain: pick a random subject.
    RandomWalk(Block),
    /// `{s, p, o}` — inserts a triple and returns nothing.
    CommaTriple { s: String, p: String, o: String },
    /// Bare `*`.
    MostConnected,
    /// Bare `#`.
    CountAll,
    /// Bare `?`.
    ExistsAny,
    /// One or more `{...}` blocks joined by operands.
    Pipeline { blocks: Vec<Block>, ops: Vec<Operand> },
}
