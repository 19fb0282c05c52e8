//! Rendering of the outgoing message.

use std::fmt;

use mailrelay_smtp::Mailbox;

/// Plain-text message: `From`, `To` and `Subject` headers followed by the body.
///
/// Headers are kept in an ordered list so the rendered output is always
/// `From`, `To`, `Subject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl Message {
    /// Builds the message for one send.
    #[must_use]
    pub fn new(from: &Mailbox, to: &Mailbox, subject: &str, body: &str) -> Self {
        Self {
            headers: vec![
                ("From", from.to_string()),
                ("To", to.to_string()),
                ("Subject", subject.to_string()),
            ],
            body: body.to_string(),
        }
    }

    /// Header name/value pairs in rendering order.
    #[must_use]
    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    /// The raw body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            write!(f, "{name}: {value}\r\n")?;
        }
        f.write_str("\r\n")?;
        f.write_str(&self.body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mailbox(s: &str) -> Mailbox {
        s.parse().unwrap()
    }

    #[test]
    fn test_renders_headers_then_body() {
        let message = Message::new(&mailbox("A <a@x.com>"), &mailbox("B <b@y.com>"), "Hi", "Hello");
        assert_eq!(
            message.to_string(),
            "From: A <a@x.com>\r\nTo: B <b@y.com>\r\nSubject: Hi\r\n\r\nHello"
        );
    }

    #[test]
    fn test_header_order_is_fixed() {
        let message = Message::new(&mailbox("z@x.com"), &mailbox("a@y.com"), "", "");
        let names: Vec<_> = message.headers().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["From", "To", "Subject"]);
    }

    #[test]
    fn test_bare_addresses_and_empty_body() {
        let message = Message::new(&mailbox("a@x.com"), &mailbox("b@y.com"), "Report", "");
        assert_eq!(
            message.to_string(),
            "From: <a@x.com>\r\nTo: <b@y.com>\r\nSubject: Report\r\n\r\n"
        );
        assert_eq!(message.body(), "");
    }

    #[test]
    fn test_body_is_not_rewritten() {
        let body = "line one\n.line two\r\n";
        let message = Message::new(&mailbox("a@x.com"), &mailbox("b@y.com"), "s", body);
        assert!(message.to_string().ends_with("\r\n\r\nline one\n.line two\r\n"));
    }
}
