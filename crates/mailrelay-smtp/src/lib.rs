//! # mailrelay-smtp
//!
//! SMTP submission client for a single mail transaction (RFC 5321).
//!
//! ## Features
//!
//! - **Lazy greeting**: EHLO with a configurable local name, HELO fallback
//! - **STARTTLS** via rustls with caller-supplied TLS parameters
//! - **AUTH PLAIN**, withheld on plaintext sessions to remote relays
//! - **DATA** with CRLF normalization and dot-stuffing
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailrelay_smtp::{Address, Client, TlsConfig};
//!
//! #[tokio::main]
//! async fn main() -> mailrelay_smtp::Result<()> {
//!     let client = Client::connect("smtp.example.com", 587).await?;
//!     let mut client = client.starttls(&TlsConfig::new()).await?;
//!     client.auth_plain("user@example.com", "password", "smtp.example.com").await?;
//!
//!     client.mail(&Address::new("sender@example.com")?).await?;
//!     client.rcpt(&Address::new("recipient@example.com")?).await?;
//!
//!     let mut data = client.data().await?;
//!     data.write(b"Subject: Test\r\n\r\nHello, World!").await?;
//!     data.close().await?;
//!
//!     client.quit().await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command serialization
//! - [`connection`]: Streams, TLS parameters and the session client
//! - [`parser`]: Reply parser
//! - [`types`]: Addresses, extensions, replies

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use connection::{
    Client, DEFAULT_LOCAL_NAME, DataWriter, ServerInfo, SmtpStream, TlsConfig, TlsInfo,
};
pub use error::{Error, Result};
pub use types::{Address, AuthMechanism, Extension, Mailbox, Reply, ReplyCode};
