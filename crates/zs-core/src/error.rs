use std::path::PathBuf;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while loading or building a rule catalog.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The catalog document is not valid JSON.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The document is neither a record array nor a `{conditions, actions}` object.
    #[error("catalog must be an array of records or an object with `conditions`/`actions`")]
    UnexpectedShape,

    /// A record could not be read as a condition or action.
    #[error("malformed record #{index}: {reason}")]
    MalformedRecord {
        /// Zero-based position of the record in its list.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A record has an empty reference id.
    #[error("record #{index} has an empty reference id")]
    EmptyReference {
        /// Zero-based position of the record in its list.
        index: usize,
    },

    /// Two records share a reference id.
    #[error("duplicate reference id: \"{0}\"")]
    DuplicateReference(String),
}
