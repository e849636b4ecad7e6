//! CSV/TSV/JSON ingest and export, DOT rendering, and label autocomplete for
//! the KGL knowledge-graph engine.

mod autocomplete;
mod csv_adapter;
mod dot;
mod error;
mod json_adapter;

pub use autocomplete::complete;
pub use csv_adapter::{export as export_csv, ingest as ingest_csv, CSV_DELIMITER, TSV_DELIMITER};
pub use dot::to_dot;
pub use error::IoError;
pub use json_adapter::{dump_graph, ingest as ingest_json};
