use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single probe did not succeed. Recorded on the result, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ProbeError {
    #[error("unreachable ({detail})")]
    Unreachable { detail: String },

    #[error("HTTP {status}")]
    Protocol { status: u16 },

    #[error("response missing '{field}'")]
    Shape { field: String },
}

impl ProbeError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ProbeError::Unreachable { .. })
    }
}

/// Errors that end a run early.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot reach API server at {url}: {detail}")]
    Unreachable { url: String, detail: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
