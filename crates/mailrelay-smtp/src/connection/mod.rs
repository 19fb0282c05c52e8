//! SMTP connection management.

mod client;
mod data;
mod stream;

pub use client::{Client, DEFAULT_LOCAL_NAME};
pub use data::DataWriter;
pub use stream::{SmtpStream, TlsConfig, TlsInfo};

use crate::types::{AuthMechanism, Extension};
use std::collections::HashSet;

/// Server capabilities from the greeting and EHLO response.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Server hostname from greeting.
    pub hostname: String,
    /// Supported extensions.
    pub extensions: HashSet<Extension>,
}

impl ServerInfo {
    /// Checks if the server supports an extension.
    #[must_use]
    pub fn supports(&self, ext: &Extension) -> bool {
        self.extensions.contains(ext)
    }

    /// Checks if STARTTLS is supported.
    #[must_use]
    pub fn supports_starttls(&self) -> bool {
        self.supports(&Extension::StartTls)
    }

    /// Returns the advertised authentication mechanisms, or `None` without AUTH.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Option<&[AuthMechanism]> {
        self.extensions.iter().find_map(|ext| match ext {
            Extension::Auth(mechanisms) => Some(mechanisms.as_slice()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(lines: &[&str]) -> ServerInfo {
        ServerInfo {
            hostname: "relay.example.org".into(),
            extensions: lines.iter().map(|line| Extension::parse(line)).collect(),
        }
    }

    #[test]
    fn test_supports_starttls() {
        assert!(info(&["STARTTLS", "8BITMIME"]).supports_starttls());
        assert!(!info(&["8BITMIME"]).supports_starttls());
    }

    #[test]
    fn test_auth_mechanisms() {
        let server = info(&["AUTH PLAIN LOGIN"]);
        assert_eq!(
            server.auth_mechanisms(),
            Some([AuthMechanism::Plain, AuthMechanism::Login].as_slice())
        );
        assert_eq!(info(&["STARTTLS"]).auth_mechanisms(), None);
    }
}
