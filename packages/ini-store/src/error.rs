//! Error types for the store layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised inside the store.
///
/// None of these escape the boolean façade of [`crate::Store`]; they exist
/// so the internals can use `?` and so callers that want the cause can ask
/// for it through the `try_*` methods.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, creating or writing the backing file failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store never opened successfully.
    #[error("store for {} is not valid", path.display())]
    Invalid { path: PathBuf },

    /// A section or key name was empty after trimming.
    #[error("empty section or key name")]
    EmptyName,

    /// A name or value cannot be written without changing its meaning on reload.
    #[error("{what} {text:?} cannot be represented in an INI file")]
    Unrepresentable { what: &'static str, text: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unrepresentable(what: &'static str, text: &str) -> Self {
        StoreError::Unrepresentable {
            what,
            text: text.to_string(),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn io_error_display_and_source() {
        let e = StoreError::io(
            "/tmp/cfg.ini",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let display = e.to_string();
        assert!(display.contains("/tmp/cfg.ini"));
        assert!(display.contains("denied"));
        assert!(StdError::source(&e).is_some());
    }

    #[test]
    fn unrepresentable_display() {
        let e = StoreError::unrepresentable("key", "a=b");
        assert_eq!(e.to_string(), "key \"a=b\" cannot be represented in an INI file");
        assert!(StdError::source(&e).is_none());
    }
}
