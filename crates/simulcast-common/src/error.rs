//! Common error types used throughout simulcast.
//!
//! Schedule-specific failures ([`Error::InvalidTimeFormat`] and
//! [`Error::MalformedEntry`]) sit next to the persistence failures so every
//! crate can share one `Result` alias.

/// Common error type for simulcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A clock time did not parse as `HH:MM` integers.
    #[error("Invalid time format: '{0}'")]
    InvalidTimeFormat(String),

    /// A schedule entry is missing a required field or carries an
    /// out-of-range value.
    #[error("Malformed entry '{title}': {reason}")]
    MalformedEntry {
        /// Title of the offending entry (may be empty).
        title: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A timezone name could not be resolved.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new InvalidTimeFormat error.
    pub fn invalid_time_format<S: Into<String>>(time: S) -> Self {
        Self::InvalidTimeFormat(time.into())
    }

    /// Create a new MalformedEntry error.
    pub fn malformed<T: Into<String>, R: Into<String>>(title: T, reason: R) -> Self {
        Self::MalformedEntry {
            title: title.into(),
            reason: reason.into(),
        }
    }

    /// Create a new UnknownTimezone error.
    pub fn unknown_timezone<S: Into<String>>(zone: S) -> Self {
        Self::UnknownTimezone(zone.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error only affects a single schedule entry.
    ///
    /// Entry-level errors are skipped and reported; everything else aborts
    /// the aggregation pass.
    pub fn is_entry_level(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeFormat(_) | Self::MalformedEntry { .. } | Self::UnknownTimezone(_)
        )
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
