use thiserror::Error;

/// Errors raised while building or querying a similarity index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A caller broke an input contract: empty corpus, `top_n == 0`,
    /// or vectors that do not line up with the documents.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A snapshot decoded fine but its parts do not fit together.
    #[error("inconsistent snapshot: {0}")]
    Snapshot(String),

    /// CBOR encoding or decoding of a snapshot failed.
    #[error("snapshot codec error: {0}")]
    Cbor(#[from] serde_cbor::Error),

    /// A corpus file could not be parsed.
    #[error("corpus parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
