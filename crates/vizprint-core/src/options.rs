//! Recognized print options.

use std::{borrow::Cow, fmt, io};

use serde_json::{Map, Value};

use crate::ContentError;

/// Attribute keys owned by the envelope itself.
const RESERVED_ATTRS: [&str; 2] = ["type", "data"];

/// Pretty-printer formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Extra indentation per nesting level.
    pub indent: usize,
    /// Target line width.
    pub width: usize,
    /// Maximum container nesting shown before eliding.
    pub depth: Option<usize>,
    /// Pack sequence items onto shared lines.
    pub compact: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: 1,
            width: 80,
            depth: None,
            compact: false,
        }
    }
}

impl FormatOptions {
    /// Check option values.
    ///
    /// # Errors
    /// Returns error if `width` or `depth` is zero.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.width == 0 {
            return Err(ContentError::InvalidFormat("width must be > 0".to_string()));
        }
        if self.depth == Some(0) {
            return Err(ContentError::InvalidFormat("depth must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Options for one print call.
///
/// Any `attrs` are merged into every envelope the call emits.
pub struct PrintOptions<'a> {
    /// Separator between values.
    pub sep: Cow<'a, str>,
    /// Terminator after the last value.
    pub end: Cow<'a, str>,
    /// Output slot identifier for in-place updates.
    pub id: Option<String>,
    /// Pretty-printer options.
    pub format: FormatOptions,
    /// Pass-through envelope attributes.
    pub attrs: Map<String, Value>,
    /// Plain-text destination; bypasses redirection when set.
    pub file: Option<&'a mut dyn io::Write>,
}

impl Default for PrintOptions<'_> {
    fn default() -> Self {
        Self {
            sep: Cow::Borrowed(" "),
            end: Cow::Borrowed("\n"),
            id: None,
            format: FormatOptions::default(),
            attrs: Map::new(),
            file: None,
        }
    }
}

impl fmt::Debug for PrintOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintOptions")
            .field("sep", &self.sep)
            .field("end", &self.end)
            .field("id", &self.id)
            .field("format", &self.format)
            .field("attrs", &self.attrs)
            .field("file", &self.file.is_some())
            .finish()
    }
}

impl<'a> PrintOptions<'a> {
    /// Set the separator.
    #[must_use]
    pub fn sep(mut self, sep: impl Into<Cow<'a, str>>) -> Self {
        self.sep = sep.into();
        self
    }

    /// Set the terminator.
    #[must_use]
    pub fn end(mut self, end: impl Into<Cow<'a, str>>) -> Self {
        self.end = end.into();
        self
    }

    /// Set the output slot identifier.
    #[must_use]
    pub fn id(mut self, id: impl fmt::Display) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Set pretty-printer indentation.
    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        self.format.indent = indent;
        self
    }

    /// Set pretty-printer width.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.format.width = width;
        self
    }

    /// Set pretty-printer depth limit.
    #[must_use]
    pub fn depth(mut self, depth: usize) -> Self {
        self.format.depth = Some(depth);
        self
    }

    /// Set compact sequence packing.
    #[must_use]
    pub fn compact(mut self, compact: bool) -> Self {
        self.format.compact = compact;
        self
    }

    /// Add a pass-through attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Print plain text to `file` instead of emitting envelopes.
    #[must_use]
    pub fn file(mut self, file: &'a mut dyn io::Write) -> Self {
        self.file = Some(file);
        self
    }

    /// Check attributes and formatting options.
    ///
    /// # Errors
    /// Returns error on a reserved attribute key or invalid format option.
    pub fn validate(&self) -> Result<(), ContentError> {
        if let Some(key) = RESERVED_ATTRS.iter().find(|key| self.attrs.contains_key(**key)) {
            return Err(ContentError::ReservedAttribute((*key).to_string()));
        }
        self.format.validate()
    }
}
