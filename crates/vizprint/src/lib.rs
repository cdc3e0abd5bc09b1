//! Print redirector for the vizterm viewer.
//!
//! When output is redirected, each printed value becomes a JSON envelope
//! (`html`, `str` or `block`) sent to the viewer over a local socket, or
//! written to stdout for a viewer reading the process output. Otherwise
//! printing behaves like an ordinary textual print.
//!
//! Provides:
//! - `Printer` - Owns the output channel and the print entry point
//! - `PrinterConfig` - Host and environment activation
//! - `vprint!` - Variadic print with keyword-style options

pub mod config;
pub mod printer;

pub use config::{ACTIVATION_VAR, PrinterConfig};
pub use printer::{PrintError, Printer};
pub use vizprint_core::{
    Content, ContentError, Figure, FormatOptions, HtmlRepr, PrintOptions, Printable,
    RasterImage, Structure,
};
pub use vizprint_transport::{Activation, Envelope, TransportError, decode_frame, encode_frame};
