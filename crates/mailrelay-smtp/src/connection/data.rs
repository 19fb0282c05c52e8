//! Message content transfer after DATA.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::Client;
use crate::error::Result;
use crate::types::ReplyCode;

/// Writer for message content between DATA and the terminating `.` line.
///
/// Bare LF line endings are sent as CRLF and lines starting with `.` are
/// dot-stuffed. The transaction is only committed by [`DataWriter::close`].
#[derive(Debug)]
pub struct DataWriter<'a, S> {
    client: &'a mut Client<S>,
    encoder: DotStuffer,
}

impl<'a, S: AsyncRead + AsyncWrite + Unpin> DataWriter<'a, S> {
    pub(super) fn new(client: &'a mut Client<S>) -> Self {
        Self {
            client,
            encoder: DotStuffer::default(),
        }
    }

    /// Writes a chunk of message content.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write(&mut self, content: &[u8]) -> Result<()> {
        let mut buf = Vec::with_capacity(content.len() + content.len() / 32 + 2);
        self.encoder.encode(content, &mut buf);
        self.client.write_all(&buf).await
    }

    /// Terminates the content and waits for the server to accept the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the server does not answer 250.
    pub async fn close(self) -> Result<()> {
        let mut buf = Vec::with_capacity(5);
        self.encoder.finish(&mut buf);
        self.client.write_all(&buf).await?;

        let reply = self.client.read_reply().await?.expect(&[ReplyCode::OK])?;
        debug!(reply = %reply.message_text(), "Message accepted");
        Ok(())
    }
}

/// Streaming CRLF normalization and dot-stuffing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DotStuffer {
    at_line_start: bool,
    after_cr: bool,
}

impl Default for DotStuffer {
    fn default() -> Self {
        Self {
            at_line_start: true,
            after_cr: false,
        }
    }
}

impl DotStuffer {
    pub(crate) fn encode(&mut self, input: &[u8], out: &mut Vec<u8>) {
        for &byte in input {
            match byte {
                b'\n' => {
                    if !self.after_cr {
                        out.push(b'\r');
                    }
                    out.push(b'\n');
                    self.at_line_start = true;
                }
                _ => {
                    if self.at_line_start && byte == b'.' {
                        out.push(b'.');
                    }
                    out.push(byte);
                    self.at_line_start = false;
                }
            }
            self.after_cr = byte == b'\r';
        }
    }

    /// Ends the last line if needed and appends the `.` terminator.
    pub(crate) fn finish(self, out: &mut Vec<u8>) {
        if self.after_cr {
            out.push(b'\n');
        } else if !self.at_line_start {
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b".\r\n");
    }
}
