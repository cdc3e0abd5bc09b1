//! Transport layer for vizprint output.
//!
//! Provides:
//! - Wire protocol (`json <object>` lines)
//! - Socket-or-stdout transport with a single optional channel

pub mod channel;
pub mod protocol;

pub use channel::{Activation, DEFAULT_HOST, Transport, TransportError};
pub use protocol::{Envelope, FRAME_PREFIX, ProtocolError, decode_frame, encode_frame};
