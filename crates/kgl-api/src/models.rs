//! Request/response bodies for the HTTP API.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteRequest {
    pub query: String,
}
