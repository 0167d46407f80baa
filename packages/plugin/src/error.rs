//! Error types for the plugin layer.

use pawn_ini_amx::{AmxError, Cell};
use pawn_ini_store::StoreError;
use thiserror::Error;

/// Errors that stop a native call.
///
/// Natives log these and return `0` to the script.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The handle was never issued or has been closed.
    #[error("invalid handle {0}")]
    InvalidHandle(Cell),

    /// `INI_Open` was given an empty path.
    #[error("empty path")]
    EmptyPath,

    /// The file could be neither read nor created.
    #[error("failed to open INI file at {path}")]
    OpenFailed { path: String },

    /// Every representable handle has been issued.
    #[error("handle space exhausted")]
    HandlesExhausted,

    /// The configured limit of live handles is reached.
    #[error("too many open INI files (limit {limit})")]
    TooManyOpen { limit: usize },

    /// An environment setting could not be parsed.
    #[error("invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },

    /// Argument or memory access failed.
    #[error(transparent)]
    Amx(#[from] AmxError),

    /// The store refused the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(PluginError::InvalidHandle(9999).to_string(), "invalid handle 9999");
        assert_eq!(
            PluginError::OpenFailed {
                path: "a/b.ini".to_string()
            }
            .to_string(),
            "failed to open INI file at a/b.ini"
        );
        assert_eq!(
            PluginError::TooManyOpen { limit: 2 }.to_string(),
            "too many open INI files (limit 2)"
        );
    }

    #[test]
    fn amx_error_converts_transparently() {
        let e: PluginError = AmxError::BadAddress(8).into();
        assert!(matches!(e, PluginError::Amx(_)));
        assert_eq!(e.to_string(), "address 0x8 is outside the data segment");
    }
}
