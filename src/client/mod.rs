//! HTTP client for the Stockwise API, plus the client-side inventory list
//! and query flows used by the `stockwise` command-line tool.

pub mod http;
pub mod inventory_list;
pub mod query;

pub use http::ApiClient;
pub use inventory_list::{InventoryList, ProductCommand, ProductGateway};
pub use query::{QueryClient, QueryResult};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-2xx response, carrying the server's `error` and `details`
    #[error("{error}{}", detail_suffix(.details))]
    Server {
        status: u16,
        error: String,
        details: Option<String>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn detail_suffix(details: &Option<String>) -> String {
    details
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
