//! Error types for decoding plan and intent snapshots
//!
//! The scoring components are infallible; only the edges that turn external
//! bytes into snapshots can fail.

/// Errors while decoding recovery inputs
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Input was not valid JSON for the expected shape
    #[error("invalid {kind} json: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Create decode error for the named input kind
    pub fn decode(kind: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { kind, source }
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
