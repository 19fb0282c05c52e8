//! Plain and TLS transports for an SMTP session.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use rustls::pki_types::ServerName;
use rustls::{CipherSuite, ClientConfig, ProtocolVersion, RootCertStore};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::error::{Error, Result};

/// TLS parameters used for the STARTTLS upgrade.
///
/// The verification name defaults to the relay host the session was opened
/// against; set [`TlsConfig::server_name`] when the certificate is issued
/// for a different name.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    client: Arc<ClientConfig>,
    server_name: Option<String>,
}

impl TlsConfig {
    /// Creates a configuration trusting the bundled web PKI roots.
    #[must_use]
    pub fn new() -> Self {
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self::with_client_config(Arc::new(config))
    }

    /// Wraps a caller-built rustls configuration (custom roots, client certificates).
    #[must_use]
    pub fn with_client_config(client: Arc<ClientConfig>) -> Self {
        Self {
            client,
            server_name: None,
        }
    }

    /// Overrides the name the server certificate is verified against.
    #[must_use]
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Returns the underlying rustls configuration.
    #[must_use]
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.client)
    }

    /// Resolves the verification name, falling back to `host`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDnsName`] if the name is neither a DNS name nor an IP address.
    pub fn resolve_server_name(&self, host: &str) -> Result<ServerName<'static>> {
        let name = self.server_name.as_deref().unwrap_or(host);
        Ok(ServerName::try_from(name.to_string())?)
    }
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Negotiated parameters of an encrypted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsInfo {
    /// Negotiated protocol version.
    pub protocol_version: Option<ProtocolVersion>,
    /// Negotiated cipher suite.
    pub cipher_suite: Option<CipherSuite>,
}

/// SMTP stream (TCP or TLS).
#[derive(Debug)]
pub enum SmtpStream {
    /// Plain TCP connection, before STARTTLS.
    Plain(TcpStream),
    /// TLS-encrypted connection (boxed to reduce enum size).
    Tls(Box<TlsStream<TcpStream>>),
}

impl SmtpStream {
    /// Opens a plain TCP connection to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let tcp = TcpStream::connect((host, port)).await?;
        Ok(Self::Plain(tcp))
    }

    /// Performs the TLS handshake over the existing TCP connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is already encrypted or the handshake fails.
    pub async fn upgrade_to_tls(
        self,
        tls: &TlsConfig,
        server_name: ServerName<'static>,
    ) -> Result<Self> {
        match self {
            Self::Plain(tcp) => {
                let connector = TlsConnector::from(tls.client_config());
                let stream = connector
                    .connect(server_name, tcp)
                    .await
                    .map_err(handshake_error)?;
                Ok(Self::Tls(Box::new(stream)))
            }
            Self::Tls(_) => Err(Error::InvalidState("Stream is already TLS".into())),
        }
    }

    /// Returns the negotiated TLS parameters, or `None` on a plaintext stream.
    #[must_use]
    pub fn tls_info(&self) -> Option<TlsInfo> {
        match self {
            Self::Plain(_) => None,
            Self::Tls(stream) => {
                let (_, conn) = stream.get_ref();
                Some(TlsInfo {
                    protocol_version: conn.protocol_version(),
                    cipher_suite: conn.negotiated_cipher_suite().map(|suite| suite.suite()),
                })
            }
        }
    }
}

/// Surfaces rustls failures wrapped in the handshake's `io::Error`.
fn handshake_error(err: io::Error) -> Error {
    match err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
    {
        Some(tls) => Error::Tls(tls.clone()),
        None => Error::Io(err),
    }
}

impl AsyncRead for SmtpStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Tls(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for SmtpStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Tls(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_flush(cx),
            Self::Tls(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Tls(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}
