//! Socket-or-stdout delivery of framed envelopes.

use std::{
    fmt,
    io::{self, Write},
    net::TcpStream,
};

use crate::protocol::{Envelope, ProtocolError, encode_frame};

/// Host the viewer listens on.
pub const DEFAULT_HOST: &str = "localhost";

/// Outcome of a channel activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Output now goes to the socket.
    Connected,
    /// Nothing listening; output stays on the fallback path.
    Refused,
}

/// Transport error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("Channel write failed: {0}")]
    Channel(#[source] io::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Delivers framed envelopes over at most one socket, falling back to a
/// plain writer (stdout by default) when no socket is connected.
pub struct Transport {
    host: String,
    channel: Option<TcpStream>,
    fallback: Box<dyn Write + Send>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("host", &self.host)
            .field("connected", &self.channel.is_some())
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Create a transport whose fallback path is process stdout.
    #[must_use]
    pub fn stdout(host: impl Into<String>) -> Self {
        Self::new(host, io::stdout())
    }

    /// Create a transport with a custom fallback writer.
    #[must_use]
    pub fn new(host: impl Into<String>, fallback: impl Write + Send + 'static) -> Self {
        Self {
            host: host.into(),
            channel: None,
            fallback: Box::new(fallback),
        }
    }

    /// Host used for activation.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether a socket channel is active.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// Connect to the viewer on `port`, replacing any existing channel.
    ///
    /// On success the viewer is cleared and a confirmation is written to the
    /// fallback path. A refused connection is reported on the fallback path
    /// and leaves no channel active.
    ///
    /// # Errors
    /// Returns error for connection failures other than refusal, or if the
    /// confirmation cannot be written.
    pub fn activate(&mut self, port: u16) -> Result<Activation, TransportError> {
        self.channel = None;
        match TcpStream::connect((self.host.as_str(), port)) {
            Ok(stream) => {
                tracing::debug!(host = %self.host, port, "viewer channel connected");
                self.channel = Some(stream);
                self.send(&Envelope::Clear)?;
                self.announce(&format!("vizprint: sending output to port {port}"))?;
                Ok(Activation::Connected)
            }
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                tracing::warn!(host = %self.host, port, "viewer connection refused");
                self.announce(&format!(
                    "vizprint: connection refused on port {port}. using stdout."
                ))?;
                Ok(Activation::Refused)
            }
            Err(source) => Err(TransportError::Connect {
                host: self.host.clone(),
                port,
                source,
            }),
        }
    }

    /// Drop the active channel, if any.
    pub fn deactivate(&mut self) {
        if self.channel.take().is_some() {
            tracing::debug!("viewer channel closed");
        }
    }

    /// Send one envelope over the channel, or the fallback path if none.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails. A broken channel is
    /// reported and left in place.
    pub fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError> {
        let frame = encode_frame(envelope)?;
        if let Some(channel) = self.channel.as_mut() {
            channel
                .write_all(frame.as_bytes())
                .map_err(TransportError::Channel)?;
        } else {
            self.fallback.write_all(frame.as_bytes())?;
            self.fallback.flush()?;
        }
        Ok(())
    }

    /// Write unframed text to the fallback path.
    ///
    /// # Errors
    /// Returns error if the write fails.
    pub fn write_plain(&mut self, text: &str) -> Result<(), TransportError> {
        self.fallback.write_all(text.as_bytes())?;
        self.fallback.flush()?;
        Ok(())
    }

    fn announce(&mut self, line: &str) -> Result<(), TransportError> {
        writeln!(self.fallback, "{line}")?;
        self.fallback.flush()?;
        Ok(())
    }
}
