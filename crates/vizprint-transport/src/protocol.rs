//! Wire protocol between the printing program and the viewer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix of every framed line.
pub const FRAME_PREFIX: &str = "json ";

/// Protocol error.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Not a frame: {0}")]
    MissingPrefix(String),
}

/// One unit of rendered output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Clear previously displayed output.
    Clear,
    /// Pre-rendered HTML, including inline images.
    Html {
        data: String,
        #[serde(flatten)]
        attrs: Map<String, Value>,
    },
    /// Single-line string.
    Str {
        data: String,
        #[serde(flatten)]
        attrs: Map<String, Value>,
    },
    /// Multi-line block.
    Block {
        data: String,
        #[serde(flatten)]
        attrs: Map<String, Value>,
    },
}

impl Envelope {
    /// Wire name of this envelope's type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Html { .. } => "html",
            Self::Str { .. } => "str",
            Self::Block { .. } => "block",
        }
    }

    /// Payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        match self {
            Self::Clear => None,
            Self::Html { data, .. } | Self::Str { data, .. } | Self::Block { data, .. } => {
                Some(data)
            }
        }
    }

    /// Pass-through attributes, if any.
    #[must_use]
    pub const fn attrs(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Clear => None,
            Self::Html { attrs, .. } | Self::Str { attrs, .. } | Self::Block { attrs, .. } => {
                Some(attrs)
            }
        }
    }

    /// The `id` attribute, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs()?.get("id")?.as_str()
    }
}

/// Frame an envelope as one newline-terminated line.
///
/// # Errors
/// Returns error if serialization fails.
pub fn encode_frame(envelope: &Envelope) -> Result<String, ProtocolError> {
    Ok(format!("{FRAME_PREFIX}{}\n", serde_json::to_string(envelope)?))
}

/// Parse one framed line back into an envelope.
///
/// # Errors
/// Returns error if the line lacks the frame prefix or holds invalid JSON.
pub fn decode_frame(line: &str) -> Result<Envelope, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let body = line
        .strip_prefix(FRAME_PREFIX)
        .ok_or_else(|| ProtocolError::MissingPrefix(line.to_string()))?;
    Ok(serde_json::from_str(body)?)
}
