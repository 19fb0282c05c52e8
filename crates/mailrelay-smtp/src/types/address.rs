//! Envelope addresses and header mailboxes.

use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};

/// Email address for the SMTP envelope (`MAIL FROM` / `RCPT TO`).
///
/// Only what would corrupt the command line is rejected: empty input,
/// control characters (CR and LF among them) and angle brackets. Spaces
/// are allowed so quoted local parts like `"john doe"@example.com` pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Creates a new address from a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the address cannot be placed on a command line.
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        Self::validate(&addr)?;
        Ok(Self(addr))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(addr: &str) -> Result<()> {
        if addr.is_empty() {
            return Err(Error::InvalidAddress("Address cannot be empty".into()));
        }

        if addr.chars().any(char::is_control) {
            return Err(Error::InvalidAddress(format!(
                "Address must not contain control characters: {addr:?}"
            )));
        }

        if addr.contains(['<', '>']) {
            return Err(Error::InvalidAddress(format!(
                "Address must not contain angle brackets: {addr}"
            )));
        }

        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mailbox (optional display name + address), as used in `From:` and `To:` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name (optional).
    pub name: Option<String>,
    /// Email address.
    pub address: Address,
}

impl Mailbox {
    /// Creates a new mailbox with just an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: None,
            address: Address::new(address)?,
        })
    }

    /// Creates a new mailbox with a display name and address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: Some(name.into()),
            address: Address::new(address)?,
        })
    }
}

/// Renders the header form: `<addr>`, `Name <addr>`, `"Quoted, Name" <addr>`
/// or RFC 2047 encoded words for non-ASCII names.
impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => write!(f, "{} <{}>", display_name(name), self.address),
            None => write!(f, "<{}>", self.address),
        }
    }
}

/// Parses `Name <addr>`, `"Quoted Name" <addr>`, `<addr>` or a bare `addr`.
impl FromStr for Mailbox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (Some(open), Some(inner)) = (s.rfind('<'), s.strip_suffix('>')) else {
            return Self::new(s);
        };

        let address = Address::new(&inner[open + 1..])?;
        let name = unquote(s[..open].trim());
        Ok(Self {
            name: (!name.is_empty()).then_some(name),
            address,
        })
    }
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c)
}

fn display_name(name: &str) -> Cow<'_, str> {
    if name
        .split(' ')
        .all(|word| !word.is_empty() && word.chars().all(is_atext))
    {
        return Cow::Borrowed(name);
    }

    if name.chars().all(|c| c == '\t' || (' '..='~').contains(&c)) {
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push('"');
        for c in name.chars() {
            if c == '"' || c == '\\' {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push('"');
        return Cow::Owned(quoted);
    }

    // Specials are not allowed inside a Q-encoded display name.
    if name.contains(|c| "\"#$%&'(),.:;<>@[]^`{|}~".contains(c)) {
        Cow::Owned(b_encode(name))
    } else {
        Cow::Owned(q_encode(name))
    }
}

/// Longest encoded text that keeps a `=?utf-8?x?...?=` word within 75 characters.
const MAX_WORD_CONTENT: usize = 63;

/// Raw bytes per B word; their base64 form fills [`MAX_WORD_CONTENT`].
const MAX_WORD_BYTES: usize = 45;

fn q_encode(name: &str) -> String {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut buf = [0u8; 4];

    for c in name.chars() {
        let mut encoded = String::new();
        for &b in c.encode_utf8(&mut buf).as_bytes() {
            match b {
                b' ' => encoded.push('_'),
                b'!'..=b'~' if !matches!(b, b'=' | b'?' | b'_') => encoded.push(char::from(b)),
                _ => {
                    let _ = write!(encoded, "={b:02X}");
                }
            }
        }
        if !current.is_empty() && current.len() + encoded.len() > MAX_WORD_CONTENT {
            words.push(format!("=?utf-8?q?{current}?="));
            current.clear();
        }
        current.push_str(&encoded);
    }
    words.push(format!("=?utf-8?q?{current}?="));
    words.join(" ")
}

fn b_encode(name: &str) -> String {
    let mut words = Vec::new();
    let mut start = 0;

    for (i, c) in name.char_indices() {
        if i > start && i + c.len_utf8() - start > MAX_WORD_BYTES {
            words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(&name[start..i])));
            start = i;
        }
    }
    words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(&name[start..])));
    words.join(" ")
}

fn unquote(name: &str) -> String {
    let Some(inner) = name.strip_prefix('"').and_then(|n| n.strip_suffix('"')) else {
        return name.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
