//! The protocol seam the sender drives.
//!
//! [`Sender`](crate::Sender) only sees these traits; [`TcpConnector`] backs
//! them with a real [`Client`] over TCP.

use mailrelay_smtp::{Address, Client, Result, SmtpStream, TlsConfig, TlsInfo};

/// One SMTP session, closed when dropped.
#[allow(async_fn_in_trait)]
pub trait Session: Sized {
    /// Greets the server with an explicit local name.
    async fn hello(&mut self, local_name: &str) -> Result<()>;

    /// Upgrades the session with STARTTLS.
    async fn starttls(self, tls: &TlsConfig) -> Result<Self>;

    /// Negotiated TLS parameters; `None` means the session is plaintext.
    fn tls_info(&self) -> Option<TlsInfo>;

    /// AUTH PLAIN against `host`.
    async fn auth_plain(&mut self, username: &str, password: &str, host: &str) -> Result<()>;

    /// `MAIL FROM`.
    async fn mail(&mut self, from: &Address) -> Result<()>;

    /// `RCPT TO`.
    async fn rcpt(&mut self, to: &Address) -> Result<()>;

    /// DATA, the message bytes, and the terminating line.
    async fn send_data(&mut self, message: &[u8]) -> Result<()>;

    /// `QUIT`.
    async fn quit(&mut self) -> Result<()>;
}

/// Opens sessions.
#[allow(async_fn_in_trait)]
pub trait Connector {
    /// Session type produced by this connector.
    type Session: Session;

    /// Connects to `host:port` and reads the greeting.
    async fn connect(&self, host: &str, port: u16) -> Result<Self::Session>;
}

/// Connects over TCP with [`Client::connect`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Session = Client<SmtpStream>;

    async fn connect(&self, host: &str, port: u16) -> Result<Self::Session> {
        Client::connect(host, port).await
    }
}

impl Session for Client<SmtpStream> {
    async fn hello(&mut self, local_name: &str) -> Result<()> {
        Self::hello(self, local_name).await
    }

    async fn starttls(self, tls: &TlsConfig) -> Result<Self> {
        Self::starttls(self, tls).await
    }

    fn tls_info(&self) -> Option<TlsInfo> {
        Self::tls_info(self)
    }

    async fn auth_plain(&mut self, username: &str, password: &str, host: &str) -> Result<()> {
        Self::auth_plain(self, username, password, host).await
    }

    async fn mail(&mut self, from: &Address) -> Result<()> {
        Self::mail(self, from).await
    }

    async fn rcpt(&mut self, to: &Address) -> Result<()> {
        Self::rcpt(self, to).await
    }

    async fn send_data(&mut self, message: &[u8]) -> Result<()> {
        let mut data = self.data().await?;
        data.write(message).await?;
        data.close().await
    }

    async fn quit(&mut self) -> Result<()> {
        Self::quit(self).await
    }
}
