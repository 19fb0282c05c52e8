//! SMTP submission client.

use std::collections::HashSet;
use std::io;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, trace, warn};

use super::data::DataWriter;
use super::{ServerInfo, SmtpStream, TlsConfig, TlsInfo};
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::types::{Address, AuthMechanism, Extension, Reply, ReplyCode};

/// Greeting identity used when the caller never calls [`Client::hello`].
pub const DEFAULT_LOCAL_NAME: &str = "localhost";

/// Upper bound on lines in one reply; a server streaming endless
/// continuation lines is treated as broken.
const MAX_REPLY_LINES: usize = 512;

/// SMTP client session over a plain or TLS stream.
///
/// The greeting is sent lazily: the first command that needs it issues EHLO
/// (falling back to HELO) with the configured local name. Dropping the client
/// closes the connection.
#[derive(Debug)]
pub struct Client<S = SmtpStream> {
    reader: BufReader<S>,
    host: String,
    local_name: String,
    did_hello: bool,
    server_info: ServerInfo,
    tls: Option<TlsInfo>,
}

impl Client<SmtpStream> {
    /// Connects to `host:port` and reads the server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or the server does not answer 220.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        debug!(host, port, "Connecting to SMTP server");
        let stream = SmtpStream::connect(host, port).await?;
        Self::from_stream(stream, host).await
    }

    /// Upgrades the session to TLS and repeats EHLO over the encrypted channel.
    ///
    /// # Errors
    ///
    /// Returns an error if STARTTLS is not advertised, is rejected, or the
    /// handshake fails.
    pub async fn starttls(mut self, tls: &TlsConfig) -> Result<Self> {
        self.greet().await?;
        if !self.server_info.supports_starttls() {
            return Err(Error::NotSupported("STARTTLS".into()));
        }

        self.command(&Command::StartTls)
            .await?
            .expect(&[ReplyCode::SERVICE_READY])?;

        // Anything already buffered arrived in plaintext after the go-ahead.
        if !self.reader.buffer().is_empty() {
            return Err(Error::Protocol(
                "Server sent data before the TLS handshake".into(),
            ));
        }

        let server_name = tls.resolve_server_name(&self.host)?;
        let stream = self
            .reader
            .into_inner()
            .upgrade_to_tls(tls, server_name)
            .await?;
        self.tls = stream.tls_info();
        self.reader = BufReader::new(stream);
        debug!(tls = ?self.tls, "TLS established");

        self.ehlo().await?;
        Ok(self)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Client<S> {
    /// Creates a client from an established stream and reads the greeting.
    ///
    /// `host` is the relay name the stream was opened against; it is used
    /// for TLS verification and checked by [`Client::auth_plain`].
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or the server does not answer 220.
    pub async fn from_stream(stream: S, host: impl Into<String>) -> Result<Self> {
        let mut reader = BufReader::new(stream);
        let greeting = read_reply(&mut reader)
            .await?
            .expect(&[ReplyCode::SERVICE_READY])?;

        let hostname = greeting
            .message
            .first()
            .and_then(|msg| msg.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            reader,
            host: host.into(),
            local_name: DEFAULT_LOCAL_NAME.to_string(),
            did_hello: false,
            server_info: ServerInfo {
                hostname,
                extensions: HashSet::new(),
            },
            tls: None,
        })
    }

    /// Returns what the server announced about itself.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Returns the negotiated TLS parameters, or `None` while unencrypted.
    #[must_use]
    pub const fn tls_info(&self) -> Option<TlsInfo> {
        self.tls
    }

    /// Returns the relay host this session was opened against.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Greets the server as `local_name` instead of [`DEFAULT_LOCAL_NAME`].
    ///
    /// # Errors
    ///
    /// Returns an error if a greeting was already sent, if `local_name`
    /// contains CR or LF, or if both EHLO and HELO are rejected.
    pub async fn hello(&mut self, local_name: &str) -> Result<()> {
        if local_name.contains(['\r', '\n']) {
            return Err(Error::InvalidLine(local_name.to_string()));
        }
        if self.did_hello {
            return Err(Error::InvalidState(
                "hello called after other commands".into(),
            ));
        }

        local_name.clone_into(&mut self.local_name);
        self.greet().await
    }

    /// Authenticates with the PLAIN mechanism.
    ///
    /// Credentials are only sent over TLS (or to a loopback relay), and only
    /// when `host` is the relay this session was opened against.
    ///
    /// # Errors
    ///
    /// Returns an error if AUTH is not advertised, the credentials are
    /// withheld, or the server rejects them.
    pub async fn auth_plain(&mut self, username: &str, password: &str, host: &str) -> Result<()> {
        self.greet().await?;
        if self.server_info.auth_mechanisms().is_none() {
            return Err(Error::NotSupported("AUTH".into()));
        }
        if self.tls.is_none() && !is_localhost(&self.host) {
            return Err(Error::AuthRefused("unencrypted connection".into()));
        }
        if host != self.host {
            return Err(Error::AuthRefused("wrong host name".into()));
        }

        let cmd = Command::Auth {
            mechanism: AuthMechanism::Plain,
            initial_response: Some(plain_response(username, password)),
        };
        let reply = self.command(&cmd).await?;

        // PLAIN carries everything in the initial response; a challenge means
        // the server wants something we cannot give.
        if reply.code == ReplyCode::AUTH_CONTINUE {
            let cancelled = self.command(&Command::AuthCancel).await?;
            debug!(code = cancelled.code.as_u16(), "AUTH exchange cancelled");
            return Err(Error::AuthRefused("unexpected server challenge".into()));
        }

        reply.expect(&[ReplyCode::AUTH_SUCCESS])?;
        Ok(())
    }

    /// Starts the mail transaction with `MAIL FROM`.
    ///
    /// `BODY=8BITMIME` and `SMTPUTF8` are added when the server advertises them.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the sender.
    pub async fn mail(&mut self, from: &Address) -> Result<()> {
        self.greet().await?;
        let cmd = Command::MailFrom {
            from: from.clone(),
            eight_bit_mime: self.server_info.supports(&Extension::EightBitMime),
            smtp_utf8: self.server_info.supports(&Extension::SmtpUtf8),
        };
        self.command(&cmd).await?.expect(&[ReplyCode::OK])?;
        Ok(())
    }

    /// Adds the recipient with `RCPT TO`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the recipient.
    pub async fn rcpt(&mut self, to: &Address) -> Result<()> {
        let cmd = Command::RcptTo { to: to.clone() };
        self.command(&cmd)
            .await?
            .expect(&[ReplyCode::OK, ReplyCode::FORWARD])?;
        Ok(())
    }

    /// Issues DATA and returns a writer for the message content.
    ///
    /// The transaction completes when [`DataWriter::close`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not answer 354.
    pub async fn data(&mut self) -> Result<DataWriter<'_, S>> {
        self.command(&Command::Data)
            .await?
            .expect(&[ReplyCode::START_DATA])?;
        Ok(DataWriter::new(self))
    }

    /// Sends QUIT and shuts the stream down.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not answer 221.
    pub async fn quit(&mut self) -> Result<()> {
        self.greet().await?;
        self.command(&Command::Quit)
            .await?
            .expect(&[ReplyCode::CLOSING])?;

        if let Err(e) = self.reader.get_mut().shutdown().await {
            debug!(error = %e, "Shutdown after QUIT failed");
        }
        Ok(())
    }

    pub(super) async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.reader.get_mut();
        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    pub(super) async fn read_reply(&mut self) -> Result<Reply> {
        read_reply(&mut self.reader).await
    }

    async fn command(&mut self, cmd: &Command) -> Result<Reply> {
        trace!(command = cmd.name(), "Sending command");
        self.write_all(&cmd.serialize()).await?;
        let reply = self.read_reply().await?;
        debug!(command = cmd.name(), code = reply.code.as_u16(), "Reply received");
        Ok(reply)
    }

    async fn greet(&mut self) -> Result<()> {
        if self.did_hello {
            return Ok(());
        }

        match self.ehlo().await {
            Ok(()) => {}
            Err(Error::SmtpError { code, message }) => {
                warn!(code, %message, "EHLO rejected, falling back to HELO");
                self.server_info.extensions.clear();
                let cmd = Command::Helo {
                    hostname: self.local_name.clone(),
                };
                self.command(&cmd).await?.expect(&[ReplyCode::OK])?;
            }
            Err(e) => return Err(e),
        }

        self.did_hello = true;
        Ok(())
    }

    async fn ehlo(&mut self) -> Result<()> {
        let cmd = Command::Ehlo {
            hostname: self.local_name.clone(),
        };
        let reply = self.command(&cmd).await?.expect(&[ReplyCode::OK])?;

        // First line is the server's greeting, the rest are extensions
        self.server_info.extensions = reply
            .message
            .iter()
            .skip(1)
            .map(|line| Extension::parse(line))
            .collect();
        Ok(())
    }
}

async fn read_reply<S: AsyncRead + Unpin>(reader: &mut BufReader<S>) -> Result<Reply> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by server",
            )));
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        let is_last = is_last_reply_line(line);
        lines.push(line.to_string());
        if is_last {
            break;
        }
        if lines.len() >= MAX_REPLY_LINES {
            return Err(Error::Protocol("Reply exceeds line limit".into()));
        }
    }

    parse_reply(&lines)
}

/// Builds the PLAIN initial response: base64 of `\0username\0password`.
fn plain_response(username: &str, password: &str) -> String {
    STANDARD.encode(format!("\0{username}\0{password}"))
}

fn is_localhost(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_response() {
        assert_eq!(plain_response("user", "pass"), "AHVzZXIAcGFzcw==");
    }

    #[test]
    fn test_is_localhost() {
        assert!(is_localhost("localhost"));
        assert!(is_localhost("127.0.0.1"));
        assert!(is_localhost("::1"));
        assert!(!is_localhost("smtp.example.com"));
        assert!(!is_localhost("localhost.example.com"));
    }

    #[tokio::test]
    async fn test_multiline_ehlo_reply_sets_extensions() {
        use tokio_test::io::Builder;

        let mock = Builder::new()
            .read(b"220 mx.example.org ESMTP\r\n")
            .write(b"EHLO localhost\r\n")
            .read(b"250-mx.example.org\r\n250-STARTTLS\r\n")
            .read(b"250 SMTPUTF8\r\n")
            .write(b"QUIT\r\n")
            .read(b"221 2.0.0 Bye\r\n")
            .build();

        let mut client = Client::from_stream(mock, "mx.example.org").await.unwrap();
        assert_eq!(client.server_info().hostname, "mx.example.org");

        client.quit().await.unwrap();
        assert!(client.server_info().supports_starttls());
        assert!(client.server_info().supports(&Extension::SmtpUtf8));
        assert!(client.tls_info().is_none());
    }
}
