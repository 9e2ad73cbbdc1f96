//! Error types for Toonify.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Be serializable where they travel back to a caller as a soft notice
//! - Include actionable information (which style, what failed)
//! - Support error chaining for context

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for Toonify.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum ToonifyError {
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Gallery error: {0}")]
    Gallery(#[from] GalleryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Reasons a transform fell back to the original image.
///
/// None of these are ever returned as `Err` from the engine; they ride along
/// with the untouched input so the caller can show a notice.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransformError {
    #[error("Not a data URI")]
    MalformedDataUri,

    #[error("Unsupported media type '{mime}', expected an image")]
    NotAnImage { mime: String },

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Transform timed out after {after_ms} ms")]
    TimedOut { after_ms: u64 },

    #[error("Transform worker stopped unexpectedly: {0}")]
    WorkerFailed(String),
}

/// Errors raised by a storage port.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage quota exceeded: writing {requested} bytes with a limit of {limit} bytes")]
    QuotaExceeded { requested: usize, limit: usize },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from gallery mutations.
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Failed to encode gallery: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to persist gallery: {0}")]
    Storage(#[from] StorageError),
}

/// Errors building a style catalog.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogError {
    #[error("Style '{0}' is already registered")]
    DuplicateStyle(String),

    #[error("Style id cannot be empty")]
    EmptyId,

    #[error("Invalid filter recipe '{recipe}': {reason}")]
    InvalidRecipe { recipe: String, reason: String },
}

/// Errors loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {error}")]
    Read { path: String, error: std::io::Error },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

// ============================================================================
// Error Utilities
// ============================================================================

impl TransformError {
    /// Short user-facing notice for this fallback.
    pub fn user_message(&self) -> &'static str {
        match self {
            TransformError::TimedOut { .. } => "Transform took too long, showing the original",
            TransformError::Encode(_) | TransformError::WorkerFailed(_) => {
                "Failed to process image"
            }
            _ => "Failed to load image",
        }
    }

    /// Whether retrying the same input could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransformError::TimedOut { .. } | TransformError::WorkerFailed(_)
        )
    }
}

impl StorageError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            StorageError::QuotaExceeded { .. } => {
                Some("Delete some gallery items to free up space".to_string())
            }
            StorageError::InvalidKey(key) => Some(format!(
                "Use a key made of letters, digits, '-' or '_' instead of '{}'",
                key
            )),
            StorageError::Io(_) => None,
        }
    }
}

impl GalleryError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            GalleryError::Storage(e) => e.suggested_fix(),
            GalleryError::Serialization(_) => None,
        }
    }
}

impl ToonifyError {
    /// Check if this error is recoverable (operation can be retried).
    pub fn is_recoverable(&self) -> bool {
        match self {
            ToonifyError::Transform(e) => e.is_transient(),
            ToonifyError::Storage(StorageError::QuotaExceeded { .. }) => true,
            ToonifyError::Gallery(GalleryError::Storage(StorageError::QuotaExceeded { .. })) => {
                true
            }
            _ => false,
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ToonifyError::Storage(e) => e.suggested_fix(),
            ToonifyError::Gallery(e) => e.suggested_fix(),
            ToonifyError::Catalog(CatalogError::DuplicateStyle(id)) => {
                Some(format!("Choose a different id than '{}'", id))
            }
            ToonifyError::Config(ConfigError::Invalid { field, .. }) => {
                Some(format!("Check the '{}' entry of your config file", field))
            }
            _ => None,
        }
    }
}

/// Result type alias for Toonify operations.
pub type ToonifyResult<T> = Result<T, ToonifyError>;

/// Result type alias for gallery operations.
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_suggestion() {
        let error = StorageError::QuotaExceeded {
            requested: 10,
            limit: 5,
        };
        assert!(error.suggested_fix().unwrap().contains("Delete"));

        let wrapped = GalleryError::from(error);
        assert!(wrapped.suggested_fix().is_some());
    }

    #[test]
    fn test_transform_error_messages() {
        let timeout = TransformError::TimedOut { after_ms: 100 };
        assert!(timeout.is_transient());
        assert!(timeout.to_string().contains("100 ms"));

        let decode = TransformError::Decode("bad header".to_string());
        assert!(!decode.is_transient());
        assert_eq!(decode.user_message(), "Failed to load image");
    }

    #[test]
    fn test_top_level_conversion() {
        let err: ToonifyError = CatalogError::DuplicateStyle("anime".to_string()).into();
        assert!(matches!(err, ToonifyError::Catalog(_)));
        assert!(err.to_string().contains("anime"));
        assert!(!err.is_recoverable());
        assert!(err.suggested_fix().unwrap().contains("anime"));
    }

    #[test]
    fn test_recoverable() {
        let quota: ToonifyError = GalleryError::from(StorageError::QuotaExceeded {
            requested: 2,
            limit: 1,
        })
        .into();
        assert!(quota.is_recoverable());

        let timeout: ToonifyError = TransformError::TimedOut { after_ms: 5 }.into();
        assert!(timeout.is_recoverable());

        let bad_key: ToonifyError = StorageError::InvalidKey("a/b".to_string()).into();
        assert!(!bad_key.is_recoverable());
    }
}
