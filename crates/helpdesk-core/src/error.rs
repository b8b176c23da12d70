use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Machine-readable error codes for hosts that need stable identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    NotSignedIn,
    InvalidCredentials,
    DuplicateEmail,
    TicketNotFound,
    InvalidEnumValue,
    StorageCorrupt,
    StorageWriteFailed,
    LockContention,
    SuggestionUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::NotSignedIn => "E1002",
            Self::InvalidCredentials => "E1003",
            Self::DuplicateEmail => "E1004",
            Self::TicketNotFound => "E2001",
            Self::InvalidEnumValue => "E2002",
            Self::StorageCorrupt => "E3001",
            Self::StorageWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::SuggestionUnavailable => "E6001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::NotSignedIn => "No active session",
            Self::InvalidCredentials => "Invalid email or password",
            Self::DuplicateEmail => "An account with this email already exists",
            Self::TicketNotFound => "Ticket not found",
            Self::InvalidEnumValue => "Invalid priority/status/role value",
            Self::StorageCorrupt => "Stored data could not be parsed",
            Self::StorageWriteFailed => "Storage write failed",
            Self::LockContention => "Lock contention",
            Self::SuggestionUnavailable => "Department suggestion unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in config.toml and retry."),
            Self::NotSignedIn => Some("Run `hd signin` first."),
            Self::InvalidCredentials => Some("Check the email and password and try again."),
            Self::DuplicateEmail => Some("Sign in with the existing account instead."),
            Self::TicketNotFound => None,
            Self::InvalidEnumValue => Some(
                "Use low/medium/high, open/in-progress/resolved/closed, or client/agent/admin.",
            ),
            Self::StorageCorrupt => {
                Some("The raw data was quarantined under `<key>.corrupt` for inspection.")
            }
            Self::StorageWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `hd` process releases its lock."),
            Self::SuggestionUnavailable => Some("Pick a department manually."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures raised by a [`KeyValueStore`](crate::storage::KeyValueStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored value for key '{key}' is not valid UTF-8")]
    NotUtf8 {
        key: String,
        /// The content with invalid sequences replaced, for quarantine.
        lossy: String,
    },

    #[error("store locked after {waited:?} at {}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::LockTimeout { .. } => ErrorCode::LockContention,
            Self::NotUtf8 { .. } => ErrorCode::StorageCorrupt,
            Self::Encode { .. } => ErrorCode::InternalUnexpected,
            Self::Io { .. } | Self::Sqlite(_) => ErrorCode::StorageWriteFailed,
        }
    }
}

/// Top-level error for helpdesk operations.
#[derive(Debug, thiserror::Error)]
pub enum HelpdeskError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("ticket #{0} not found")]
    TicketNotFound(u64),

    #[error("an account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no active session")]
    NotSignedIn,

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidEnumValue(#[from] crate::model::ParseEnumError),
}

impl HelpdeskError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Storage(err) => err.code(),
            Self::TicketNotFound(_) => ErrorCode::TicketNotFound,
            Self::DuplicateEmail(_) => ErrorCode::DuplicateEmail,
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::NotSignedIn => ErrorCode::NotSignedIn,
            Self::Config(_) => ErrorCode::ConfigParseError,
            Self::InvalidEnumValue(_) => ErrorCode::InvalidEnumValue,
        }
    }

    /// Remediation text, falling back to the code's summary when no hint exists.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
