//! Core building blocks for vizprint.
//!
//! This crate provides:
//! - `Content` - Closed set of printable content kinds
//! - `Printable` - Conversion of caller values into `Content`
//! - `PrintOptions` / `FormatOptions` - Recognized print options
//! - `pformat` - Width-aware structural pretty-printer
//! - `dispatch` - Fixed-priority encoder chain producing wire payloads

pub mod content;
pub mod encode;
pub mod options;
pub mod pretty;

pub use content::{Content, ContentError, Figure, HtmlRepr, Printable, RasterImage, Structure};
pub use encode::{Payload, PayloadKind, dispatch, entry_id, expand_entries, render_plain};
pub use options::{FormatOptions, PrintOptions};
pub use pretty::{format_structure, pformat, repr};
