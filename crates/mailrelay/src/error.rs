//! Error types for sending mail.

use crate::config::ConfigError;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a sender operation, tagged with the operation's name.
#[derive(Debug, thiserror::Error)]
#[error("{op}: {kind}")]
pub struct Error {
    op: &'static str,
    #[source]
    kind: ErrorKind,
}

/// What went wrong.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Missing credentials, detected before any I/O.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// STARTTLS completed but the session is not encrypted.
    #[error("security error: {0}")]
    Security(String),

    /// Connection, command, authentication or data transfer failure.
    #[error("transport error: {0}")]
    Transport(#[from] mailrelay_smtp::Error),
}

impl Error {
    /// Wraps `kind` with the name of the failing operation.
    #[must_use]
    pub fn new(op: &'static str, kind: impl Into<ErrorKind>) -> Self {
        Self {
            op,
            kind: kind.into(),
        }
    }

    /// Name of the operation that failed.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        self.op
    }

    /// The underlying failure.
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consumes the error, returning the underlying failure.
    #[must_use]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Returns true for missing credentials.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration(_))
    }

    /// Returns true when the session failed to become encrypted.
    #[must_use]
    pub const fn is_security(&self) -> bool {
        matches!(self.kind, ErrorKind::Security(_))
    }

    /// Returns true for connection and protocol failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// Returns the SMTP reply code when the relay rejected a command.
    #[must_use]
    pub const fn reply_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Transport(err) => err.reply_code(),
            _ => None,
        }
    }
}
