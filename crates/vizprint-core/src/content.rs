//! Printable content kinds and the capabilities behind them.

use std::{
    any::type_name,
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    fmt, io,
};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::pretty;

/// Content error.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to render {label}: {source}")]
    Render {
        label: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Reserved attribute: {0}")]
    ReservedAttribute(String),
    #[error("Invalid format option: {0}")]
    InvalidFormat(String),
}

/// A raster image that can encode itself as JPEG.
pub trait RasterImage {
    /// Write the image as JPEG bytes.
    ///
    /// # Errors
    /// Returns error if encoding fails.
    fn write_jpeg(&self, buf: &mut Vec<u8>) -> io::Result<()>;
}

/// A plotted figure that can encode itself as PNG.
pub trait Figure {
    /// Write the figure as PNG bytes.
    ///
    /// # Errors
    /// Returns error if encoding fails.
    fn write_png(&self, buf: &mut Vec<u8>) -> io::Result<()>;
}

/// A value with its own HTML representation.
pub trait HtmlRepr {
    /// Render the value as an HTML fragment.
    fn to_html(&self) -> String;
}

/// Structural payload rendered through the pretty-printer.
#[derive(Debug, Clone, PartialEq)]
pub enum Structure {
    /// Any serializable value.
    Json(Value),
    /// A `Debug`-only value, pre-rendered in both layouts.
    Debug { flat: String, expanded: String },
}

/// One unit of printable content.
///
/// Variants are listed in dispatch priority order.
#[derive(Clone)]
pub enum Content<'a> {
    Image {
        source: &'a dyn RasterImage,
        label: &'static str,
    },
    Figure {
        source: &'a dyn Figure,
        label: &'static str,
    },
    Rich {
        source: &'a dyn HtmlRepr,
        label: &'static str,
    },
    Text(Cow<'a, str>),
    Structural(Structure),
}

impl<'a> Content<'a> {
    /// Wrap a raster image.
    #[must_use]
    pub fn image<T: RasterImage>(source: &'a T) -> Self {
        Self::Image {
            source,
            label: type_name::<T>(),
        }
    }

    /// Wrap a plotted figure.
    #[must_use]
    pub fn figure<T: Figure>(source: &'a T) -> Self {
        Self::Figure {
            source,
            label: type_name::<T>(),
        }
    }

    /// Wrap a value with an HTML representation.
    #[must_use]
    pub fn html<T: HtmlRepr>(source: &'a T) -> Self {
        Self::Rich {
            source,
            label: type_name::<T>(),
        }
    }

    /// Plain text.
    #[must_use]
    pub fn text(text: impl Into<Cow<'a, str>>) -> Self {
        Self::Text(text.into())
    }

    /// Any serializable value, rendered structurally.
    ///
    /// # Errors
    /// Returns error if the value cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ContentError> {
        Ok(Self::Structural(Structure::Json(serde_json::to_value(value)?)))
    }

    /// A `Debug`-only value.
    #[must_use]
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::Structural(Structure::Debug {
            flat: format!("{value:?}"),
            expanded: format!("{value:#?}"),
        })
    }

    /// Materialize an iterator into an ordered sequence.
    ///
    /// # Errors
    /// Returns error if any item cannot be represented as JSON.
    pub fn seq<I>(items: I) -> Result<Self, ContentError>
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        let items = items
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Structural(Structure::Json(Value::Array(items))))
    }

    /// Ordinary textual rendering, used when output is not redirected.
    #[must_use]
    pub fn plain(&self) -> Cow<'_, str> {
        match self {
            Self::Image { label, .. } => Cow::Owned(format!("<image {label}>")),
            Self::Figure { label, .. } => Cow::Owned(format!("<figure {label}>")),
            Self::Rich { label, .. } => Cow::Owned(format!("<html {label}>")),
            Self::Text(text) => Cow::Borrowed(text),
            Self::Structural(Structure::Json(value)) => Cow::Owned(pretty::repr(value, None)),
            Self::Structural(Structure::Debug { flat, .. }) => Cow::Borrowed(flat),
        }
    }
}

impl fmt::Debug for Content<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image { label, .. } => f.debug_tuple("Image").field(label).finish(),
            Self::Figure { label, .. } => f.debug_tuple("Figure").field(label).finish(),
            Self::Rich { label, .. } => f.debug_tuple("Rich").field(label).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Structural(structure) => f.debug_tuple("Structural").field(structure).finish(),
        }
    }
}

/// Conversion of a caller value into printable content.
pub trait Printable {
    /// Produce the content for this value.
    ///
    /// # Errors
    /// Returns error if the value cannot be represented.
    fn content(&self) -> Result<Content<'_>, ContentError>;
}

impl Printable for Content<'_> {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Ok(self.clone())
    }
}

impl<T: Printable + ?Sized> Printable for &T {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        (**self).content()
    }
}

impl Printable for str {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Ok(Content::Text(Cow::Borrowed(self)))
    }
}

impl Printable for String {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Ok(Content::Text(Cow::Borrowed(self)))
    }
}

impl Printable for Cow<'_, str> {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Ok(Content::Text(Cow::Borrowed(self)))
    }
}

impl Printable for char {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Ok(Content::Text(Cow::Owned(self.to_string())))
    }
}

impl Printable for Value {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        // A JSON string is still a string.
        match self {
            Self::String(text) => Ok(Content::Text(Cow::Borrowed(text))),
            other => Ok(Content::Structural(Structure::Json(other.clone()))),
        }
    }
}

macro_rules! structural_printable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Printable for $ty {
                fn content(&self) -> Result<Content<'_>, ContentError> {
                    Content::json(self)
                }
            }
        )*
    };
}

structural_printable!(
    bool, (), i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T: Serialize> Printable for [T] {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Content::json(self)
    }
}

impl<T: Serialize> Printable for Vec<T> {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Content::json(self)
    }
}

impl<T: Serialize> Printable for Option<T> {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Content::json(self)
    }
}

impl<K: Serialize, V: Serialize> Printable for BTreeMap<K, V> {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Content::json(self)
    }
}

impl<K: Serialize, V: Serialize, S> Printable for HashMap<K, V, S> {
    fn content(&self) -> Result<Content<'_>, ContentError> {
        Content::json(self)
    }
}
