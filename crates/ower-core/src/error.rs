//! Error types and handling for ower-core operations.
//!
//! This module provides the error type shared by the cache, the fetcher and the
//! extraction pipeline. Errors are categorized for logging and carry a
//! recoverability hint for callers that want to retry.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: File system operations on the cache directory
//! - **Network Errors**: HTTP requests against the upstream service
//! - **Fetch Errors**: A failed (possibly shared) document fetch for one player
//! - **Storage Errors**: Cache entry persistence
//! - **Parameter Errors**: Unknown stat type keys or hero identifiers
//! - **Configuration Errors**: Invalid settings or config files
//!
//! Expected outcomes such as "player does not exist" or "hero never played on
//! this profile" are not errors; they are reported through
//! [`Outcome`](crate::Outcome).
//!
//! ```rust
//! use ower_core::Error;
//!
//! let err = Error::InvalidParameter("unknown stat type 'bogus-type'".into());
//! assert_eq!(err.category(), "invalid_parameter");
//! assert!(!err.is_recoverable());
//! ```

use std::sync::Arc;

use thiserror::Error;

/// The main error type for ower-core operations.
///
/// All fallible public functions return `Result<T, Error>`. The source chain is
/// preserved through `source()`, including for fetch failures shared between
/// several concurrent callers.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers raw file system operations such as enumerating or stat-ing the
    /// cache directory. The underlying `std::io::Error` is preserved.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers transport failures and non-success HTTP statuses returned by the
    /// career page or name search endpoints.
    ///
    /// ## Recoverability
    ///
    /// Connection and timeout errors are recoverable, HTTP status errors are not.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Retrieving the document for a player failed.
    ///
    /// Produced by the cache coordinator. The source is shared because a single
    /// upstream fetch may serve several concurrent callers.
    #[error("Failed to fetch profile for '{tag}': {source}")]
    Fetch {
        /// Player tag the fetch was made for.
        tag: String,
        /// The failure raised by the fetcher or by cache persistence.
        source: Arc<Error>,
    },

    /// Parsing operation failed.
    ///
    /// Used when an upstream payload (e.g. the name search JSON) does not have
    /// the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Cache storage operation failed.
    ///
    /// Covers writing, committing and removing cache entries after the storage
    /// directory has been provisioned.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-supplied parameter is not recognized.
    ///
    /// ## Common Causes
    ///
    /// - Stat type key missing from the catalog of the requested mode
    /// - Hero identifier missing from the hero catalog
    /// - Unknown platform or game mode name
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// URL is malformed or invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for timeouts, connection failures and interrupted I/O.
    /// Fetch errors defer to the error they wrap.
    ///
    /// ```rust
    /// use ower_core::Error;
    /// use std::io;
    ///
    /// assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "timeout")).is_recoverable());
    /// assert!(!Error::Config("missing field".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Fetch { source, .. } => source.is_recoverable(),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful for structured logging and for mapping errors onto response
    /// status codes in an outer layer.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Fetch { .. } => "fetch",
            Self::Parse(_) => "parse",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }

    /// Returns the innermost error for shared fetch failures, `self` otherwise.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Fetch { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
