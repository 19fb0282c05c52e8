//! Error types for SMTP operations.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on the underlying socket.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS handshake or record-layer failure.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// The relay host cannot be used as a TLS server name.
    #[error("Invalid TLS server name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// Server answered a command with an unexpected reply.
    #[error("SMTP error {code}: {message}")]
    SmtpError {
        /// Reply code (e.g., 550).
        code: u16,
        /// Reply text from the server.
        message: String,
    },

    /// Malformed or unexpected protocol traffic.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Envelope address rejected before it reached the wire.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// A command argument contains CR or LF.
    #[error("A line must not contain CR or LF: {0:?}")]
    InvalidLine(String),

    /// Extension required for the operation was not advertised.
    #[error("Server does not support {0}")]
    NotSupported(String),

    /// Operation called out of order.
    #[error("Invalid state for operation: {0}")]
    InvalidState(String),

    /// Credentials were withheld from the server.
    #[error("Authentication refused: {0}")]
    AuthRefused(String),
}

impl Error {
    /// Creates an SMTP error from a reply code and message.
    #[must_use]
    pub fn smtp_error(code: u16, message: impl Into<String>) -> Self {
        Self::SmtpError {
            code,
            message: message.into(),
        }
    }

    /// Returns the server reply code, if this error carries one.
    #[must_use]
    pub const fn reply_code(&self) -> Option<u16> {
        match self {
            Self::SmtpError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::SmtpError { code, .. } if *code >= 500 && *code < 600)
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::SmtpError { code, .. } if *code >= 400 && *code < 500)
    }
}
