//! The one-shot mail sender.

use mailrelay_smtp::{Mailbox, TlsConfig};
use tracing::{debug, info};

use crate::config::SenderConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::message::Message;
use crate::session::{Connector, Session, TcpConnector};

const OPERATION: &str = "Sender::send";

fn wrap(kind: impl Into<ErrorKind>) -> Error {
    Error::new(OPERATION, kind)
}

/// Sends single messages through an authenticated STARTTLS relay.
///
/// Every call opens its own connection, so one sender can be shared across
/// tasks and threads.
#[derive(Debug, Clone)]
pub struct Sender {
    config: SenderConfig,
}

impl Sender {
    /// Creates a sender with the given credentials.
    #[must_use]
    pub const fn new(config: SenderConfig) -> Self {
        Self { config }
    }

    /// Returns the sender's configuration.
    #[must_use]
    pub const fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Sends one message through `host:port`.
    ///
    /// Connects, greets (with the configured local name if any), upgrades
    /// with STARTTLS, authenticates with PLAIN, runs one MAIL/RCPT/DATA
    /// transaction and quits. The connection is closed on every return path.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Configuration`] if username or password is empty; nothing is sent.
    /// - [`ErrorKind::Security`] if the session is not encrypted after STARTTLS.
    /// - [`ErrorKind::Transport`] for the first failing protocol step.
    #[allow(clippy::too_many_arguments)]
    pub async fn send(
        &self,
        host: &str,
        port: u16,
        tls: &TlsConfig,
        from: &Mailbox,
        to: &Mailbox,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        self.send_with(&TcpConnector, host, port, tls, from, to, subject, body)
            .await
    }

    /// Blocking form of [`Sender::send`], run on a private current-thread runtime.
    ///
    /// # Errors
    ///
    /// Same as [`Sender::send`]; failure to build the runtime is a transport error.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    #[allow(clippy::too_many_arguments)]
    pub fn send_blocking(
        &self,
        host: &str,
        port: u16,
        tls: &TlsConfig,
        from: &Mailbox,
        to: &Mailbox,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        self.config.validate().map_err(wrap)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| wrap(mailrelay_smtp::Error::Io(e)))?;
        runtime.block_on(self.send(host, port, tls, from, to, subject, body))
    }

    /// Runs the send sequence over sessions opened by `connector`.
    ///
    /// # Errors
    ///
    /// Same as [`Sender::send`].
    #[allow(clippy::too_many_arguments)]
    pub async fn send_with<C: Connector>(
        &self,
        connector: &C,
        host: &str,
        port: u16,
        tls: &TlsConfig,
        from: &Mailbox,
        to: &Mailbox,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        self.config.validate().map_err(wrap)?;
        let message = Message::new(from, to, subject, body);

        debug!(host, port, "Connecting to relay");
        let mut session = connector.connect(host, port).await.map_err(wrap)?;

        if let Some(local_name) = self.config.local_name() {
            session.hello(local_name).await.map_err(wrap)?;
        }

        let mut session = session.starttls(tls).await.map_err(wrap)?;
        let Some(tls_info) = session.tls_info() else {
            return Err(wrap(ErrorKind::Security("TLS is not ok".into())));
        };
        debug!(
            version = ?tls_info.protocol_version,
            cipher = ?tls_info.cipher_suite,
            "Session encrypted"
        );

        session
            .auth_plain(self.config.username(), self.config.password(), host)
            .await
            .map_err(wrap)?;
        session.mail(&from.address).await.map_err(wrap)?;
        session.rcpt(&to.address).await.map_err(wrap)?;
        session
            .send_data(message.to_string().as_bytes())
            .await
            .map_err(wrap)?;
        session.quit().await.map_err(wrap)?;

        info!(host, port, to = %to.address, "Message handed to relay");
        Ok(())
    }
}
