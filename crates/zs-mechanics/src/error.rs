//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
///
/// The engine itself degrades bad input to safe defaults; these errors are
/// only produced by the checked entry points that callers opt into.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A reference id was not found in the catalog.
    #[error("unknown condition: {0}")]
    UnknownReference(String),

    /// A requested level was negative, fractional, or not a number.
    #[error("invalid level: {0}")]
    InvalidLevel(String),

    /// A die name such as `d20` could not be parsed.
    #[error("invalid die: {0}")]
    InvalidDie(String),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bad_input() {
        let cases = [
            (MechError::UnknownReference("ghost".into()), "unknown condition: ghost"),
            (MechError::InvalidLevel("-1".into()), "invalid level: -1"),
            (MechError::InvalidDie("d1".into()), "invalid die: d1"),
        ];
        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
        }
    }
}
