//! Triple store, adjacency index, substring index, similarity index and
//! path finder for the KGL knowledge-graph query engine.

pub mod error;
pub mod label;
mod ordered_set;
pub mod path;
pub mod similarity_index;
pub mod store;
pub mod substring_index;
pub mod triple;

pub use error::{KglError, KglWarning};
pub use label::Label;
pub use ordered_set::OrderedSet;
pub use path::{shortest_path, PathStep};
pub use store::{StoreConfig, TripleStore, DEFAULT_NAMESPACE};
pub use triple::{ObjectValue, RawTriple, Triple};
