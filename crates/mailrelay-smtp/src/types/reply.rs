//! SMTP reply types.

use crate::error::{Error, Result};

/// SMTP reply from server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply code (e.g., 250).
    pub code: ReplyCode,
    /// Reply text, one entry per line.
    pub message: Vec<String>,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec is not const-compatible
    pub fn new(code: ReplyCode, message: Vec<String>) -> Self {
        Self { code, message }
    }

    /// Returns the full message as a single string.
    #[must_use]
    pub fn message_text(&self) -> String {
        self.message.join("\n")
    }

    /// Accepts the reply if its code is one of `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SmtpError`] carrying the server's code and text otherwise.
    pub fn expect(self, expected: &[ReplyCode]) -> Result<Self> {
        if expected.contains(&self.code) {
            Ok(self)
        } else {
            Err(Error::smtp_error(self.code.as_u16(), self.message_text()))
        }
    }
}

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a success code (2xx).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is an intermediate reply (3xx).
    #[must_use]
    pub const fn is_intermediate(self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Codes the submission dialogue waits for
impl ReplyCode {
    /// 220 Service ready (greeting, STARTTLS go-ahead)
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 235 Authentication succeeded
    pub const AUTH_SUCCESS: Self = Self(235);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 251 User not local; will forward
    pub const FORWARD: Self = Self(251);
    /// 334 Server challenge during AUTH
    pub const AUTH_CONTINUE: Self = Self(334);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ReplyCode::OK.is_success());
        assert!(ReplyCode::CLOSING.is_success());
        assert!(ReplyCode::AUTH_CONTINUE.is_intermediate());
        assert!(ReplyCode::START_DATA.is_intermediate());
        assert!(!ReplyCode::new(550).is_success());
    }

    #[test]
    fn display() {
        assert_eq!(ReplyCode::AUTH_SUCCESS.to_string(), "235");
    }

    #[test]
    fn expect_accepts_listed_codes() {
        let reply = Reply::new(ReplyCode::FORWARD, vec!["forwarding".into()]);
        let reply = reply.expect(&[ReplyCode::OK, ReplyCode::FORWARD]).unwrap();
        assert_eq!(reply.code, ReplyCode::FORWARD);
    }

    #[test]
    fn expect_turns_other_codes_into_errors() {
        let reply = Reply::new(
            ReplyCode::new(550),
            vec!["5.1.1 no such user".into(), "see policy".into()],
        );
        match reply.expect(&[ReplyCode::OK]) {
            Err(Error::SmtpError { code, message }) => {
                assert_eq!(code, 550);
                assert_eq!(message, "5.1.1 no such user\nsee policy");
            }
            other => panic!("expected SmtpError, got {other:?}"),
        }
    }

    #[test]
    fn message_text_empty() {
        let reply = Reply::new(ReplyCode::OK, vec![]);
        assert_eq!(reply.message_text(), "");
    }
}
