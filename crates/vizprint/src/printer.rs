//! The print entry point.

use std::{io, panic::Location};

use serde_json::Value;
use vizprint_core::{
    ContentError, Payload, PayloadKind, PrintOptions, Printable, dispatch, entry_id,
    expand_entries, render_plain,
};
use vizprint_transport::{Activation, Envelope, Transport, TransportError};

use crate::PrinterConfig;

/// Print error.
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Owns the output channel and turns print calls into envelopes.
///
/// Construct one per process and pass it to call sites; it holds at most one
/// viewer channel at a time.
#[derive(Debug)]
pub struct Printer {
    config: PrinterConfig,
    transport: Transport,
    requested: bool,
}

impl Printer {
    /// Create a printer writing to stdout.
    #[must_use]
    pub fn new(config: PrinterConfig) -> Self {
        let transport = Transport::stdout(config.host.clone());
        Self::with_transport(config, transport)
    }

    /// Create a printer whose fallback path is `fallback` instead of stdout.
    #[must_use]
    pub fn with_fallback(config: PrinterConfig, fallback: impl io::Write + Send + 'static) -> Self {
        let transport = Transport::new(config.host.clone(), fallback);
        Self::with_transport(config, transport)
    }

    /// Create a stdout printer configured from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(PrinterConfig::from_env())
    }

    fn with_transport(config: PrinterConfig, transport: Transport) -> Self {
        Self {
            config,
            transport,
            requested: false,
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Whether print calls emit envelopes rather than plain text.
    ///
    /// True when the activation variable was present, or after `activate`
    /// until `deactivate`.
    #[must_use]
    pub const fn is_redirecting(&self) -> bool {
        self.config.env_active || self.requested
    }

    /// Whether a socket channel to the viewer is active.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Send output to the viewer listening on `port`.
    ///
    /// A refused connection is not an error: output continues as framed JSON
    /// on stdout.
    ///
    /// # Errors
    /// Returns error for other connection failures.
    pub fn activate(&mut self, port: u16) -> Result<Activation, PrintError> {
        let activation = self.transport.activate(port)?;
        self.requested = true;
        Ok(activation)
    }

    /// Drop the viewer channel and stop redirecting, unless the activation
    /// variable is set.
    pub fn deactivate(&mut self) {
        self.transport.deactivate();
        self.requested = false;
    }

    /// Activate on `Some(port)`, deactivate on `None`.
    ///
    /// # Errors
    /// Returns error for connection failures other than refusal.
    pub fn vizport(&mut self, port: Option<u16>) -> Result<Option<Activation>, PrintError> {
        match port {
            Some(port) => self.activate(port).map(Some),
            None => {
                self.deactivate();
                Ok(None)
            }
        }
    }

    /// Clear the viewer.
    ///
    /// # Errors
    /// Returns error if the envelope cannot be delivered.
    pub fn clear(&mut self) -> Result<(), PrintError> {
        self.transport.send(&Envelope::Clear)?;
        Ok(())
    }

    /// Print `values`.
    ///
    /// With a `file` option, or when not redirecting, this is an ordinary
    /// textual print. Otherwise each value, separator and the terminator is
    /// encoded and sent as its own envelope.
    ///
    /// # Errors
    /// Returns error on invalid options, a failing capability, or a failed
    /// write.
    pub fn print(
        &mut self,
        values: &[&dyn Printable],
        options: PrintOptions<'_>,
    ) -> Result<(), PrintError> {
        options.validate()?;
        let PrintOptions {
            sep,
            end,
            id,
            format,
            attrs,
            file,
        } = options;

        if let Some(file) = file {
            file.write_all(render_plain(values, &sep, &end)?.as_bytes())?;
            return Ok(());
        }
        if !self.is_redirecting() {
            let text = render_plain(values, &sep, &end)?;
            self.transport.write_plain(&text)?;
            return Ok(());
        }

        let entries = expand_entries(values, &sep, &end)?;
        tracing::trace!(entries = entries.len(), id = ?id, "printing");
        for (index, entry) in entries.iter().enumerate() {
            let Payload { kind, data } = dispatch(entry, &format)?;
            let mut attrs = attrs.clone();
            if let Some(slot) = entry_id(id.as_deref(), index) {
                attrs.insert("id".to_string(), Value::String(slot));
            }
            let envelope = match kind {
                PayloadKind::Html => Envelope::Html { data, attrs },
                PayloadKind::Str => Envelope::Str { data, attrs },
                PayloadKind::Block => Envelope::Block { data, attrs },
            };
            self.transport.send(&envelope)?;
        }
        Ok(())
    }

    /// Print the caller's source location as `file:line`.
    ///
    /// # Errors
    /// Returns error if the write fails.
    #[track_caller]
    pub fn tick(&mut self) -> Result<(), PrintError> {
        let location = Location::caller();
        let line = format!("{}:{}", location.file(), location.line());
        self.print(&[&line], PrintOptions::default())
    }
}

/// Print values through a [`Printer`].
///
/// Options follow a `;` as `name = value` pairs naming [`PrintOptions`]
/// builder methods:
///
/// ```ignore
/// vprint!(printer, "a plot:", Content::figure(&fig); id = "plot", width = 40)?;
/// ```
#[macro_export]
macro_rules! vprint {
    ($printer:expr $(, $value:expr)* $(; $($option:ident = $setting:expr),+ $(,)?)?) => {
        $printer.print(
            &[$(&$value as &dyn $crate::Printable),*],
            $crate::PrintOptions::default()$($(.$option($setting))+)?,
        )
    };
}
