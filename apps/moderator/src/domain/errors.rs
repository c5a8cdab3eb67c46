use thiserror::Error;

/// Failure of a remote classifier call. Always degrades the check to a non-signal.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No usable credentials configured")]
    MissingCredentials,
    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token endpoint rejected the refresh: {status} - {message}")]
    Rejected { status: u16, message: String },
    #[error("Malformed token response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum HostingError {
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl HostingError {
    /// Authentication failures abort the whole run; everything else is per-item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

impl From<AuthError> for HostingError {
    fn from(err: AuthError) -> Self {
        Self::Authentication(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Ledger at {path} is not valid: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that abort a moderation run.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Authentication failure: {0}")]
    Authentication(String),
    #[error("Could not enumerate videos for channel {channel_id}: {source}")]
    VideoEnumeration {
        channel_id: String,
        #[source]
        source: HostingError,
    },
    #[error("Could not persist the processing ledger: {0}")]
    Persistence(#[from] LedgerError),
}
