//! Encoder chain: picks the wire representation for each print entry.

use std::borrow::Cow;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use crate::{Content, ContentError, FormatOptions, Printable, pretty};

/// Wire message kind of an encoded entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Html,
    Str,
    Block,
}

/// Encoded entry, ready to be wrapped in an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub kind: PayloadKind,
    pub data: String,
}

impl Payload {
    fn html(data: String) -> Self {
        Self {
            kind: PayloadKind::Html,
            data,
        }
    }

    /// Text payload; `block` when the text spans several lines.
    fn rendered(data: String) -> Self {
        let kind = if data.contains('\n') {
            PayloadKind::Block
        } else {
            PayloadKind::Str
        };
        Self { kind, data }
    }
}

type Encoder = fn(&Content<'_>, &FormatOptions) -> Result<Option<Payload>, ContentError>;

/// Capability encoders in priority order. The structural encoder runs last
/// and always matches.
const CHAIN: [(&str, Encoder); 4] = [
    ("image", encode_image),
    ("figure", encode_figure),
    ("rich", encode_rich),
    ("text", encode_text),
];

/// Encode one entry, trying each encoder until one matches.
///
/// # Errors
/// Returns error if a matching capability fails to render.
pub fn dispatch(content: &Content<'_>, format: &FormatOptions) -> Result<Payload, ContentError> {
    for (name, encoder) in CHAIN {
        if let Some(payload) = encoder(content, format)? {
            tracing::trace!(encoder = name, "entry encoded");
            return Ok(payload);
        }
    }
    tracing::trace!(encoder = "structural", "entry encoded");
    Ok(encode_structural(content, format))
}

fn img_tag(mime: &str, bytes: &[u8]) -> String {
    format!("<img src=\"data:{mime};base64,{}\">", BASE64.encode(bytes))
}

fn encode_image(content: &Content<'_>, _: &FormatOptions) -> Result<Option<Payload>, ContentError> {
    let Content::Image { source, label } = content else {
        return Ok(None);
    };
    let mut buf = Vec::new();
    source
        .write_jpeg(&mut buf)
        .map_err(|source| ContentError::Render {
            label: *label,
            source,
        })?;
    Ok(Some(Payload::html(img_tag("image/jpeg", &buf))))
}

fn encode_figure(content: &Content<'_>, _: &FormatOptions) -> Result<Option<Payload>, ContentError> {
    let Content::Figure { source, label } = content else {
        return Ok(None);
    };
    let mut buf = Vec::new();
    source
        .write_png(&mut buf)
        .map_err(|source| ContentError::Render {
            label: *label,
            source,
        })?;
    Ok(Some(Payload::html(img_tag("image/png", &buf))))
}

fn encode_rich(content: &Content<'_>, _: &FormatOptions) -> Result<Option<Payload>, ContentError> {
    let Content::Rich { source, .. } = content else {
        return Ok(None);
    };
    Ok(Some(Payload::html(source.to_html())))
}

fn encode_text(content: &Content<'_>, _: &FormatOptions) -> Result<Option<Payload>, ContentError> {
    let Content::Text(text) = content else {
        return Ok(None);
    };
    Ok(Some(Payload {
        kind: PayloadKind::Str,
        data: text.to_string(),
    }))
}

fn encode_structural(content: &Content<'_>, format: &FormatOptions) -> Payload {
    // Text and capability values are claimed by the chain first.
    let rendered = match content {
        Content::Structural(structure) => pretty::format_structure(structure, format),
        other => other.plain().into_owned(),
    };
    Payload::rendered(rendered)
}

/// Expand values into entries: each value followed by the separator, with
/// the final separator replaced by the terminator.
///
/// # Errors
/// Returns error if a value cannot produce its content.
pub fn expand_entries<'a>(
    values: &[&'a dyn Printable],
    sep: &'a str,
    end: &'a str,
) -> Result<Vec<Content<'a>>, ContentError> {
    let mut entries = Vec::with_capacity(values.len() * 2);
    for &value in values {
        entries.push(value.content()?);
        entries.push(Content::Text(Cow::Borrowed(sep)));
    }
    match entries.last_mut() {
        Some(last) => *last = Content::Text(Cow::Borrowed(end)),
        None => entries.push(Content::Text(Cow::Borrowed(end))),
    }
    Ok(entries)
}

/// Per-entry identifier `"<id>:<index>"`. Empty identifiers count as absent.
#[must_use]
pub fn entry_id(id: Option<&str>, index: usize) -> Option<String> {
    id.filter(|id| !id.is_empty())
        .map(|id| format!("{id}:{index}"))
}

/// Ordinary textual rendering of a whole print call.
///
/// # Errors
/// Returns error if a value cannot produce its content.
pub fn render_plain(values: &[&dyn Printable], sep: &str, end: &str) -> Result<String, ContentError> {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(&value.content()?.plain());
    }
    out.push_str(end);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io;

    use serde_json::json;

    use super::*;
    use crate::{Figure, HtmlRepr, RasterImage};

    struct Pixel;

    impl RasterImage for Pixel {
        fn write_jpeg(&self, buf: &mut Vec<u8>) -> io::Result<()> {
            buf.extend_from_slice(b"jpeg");
            Ok(())
        }
    }

    struct Plot;

    impl Figure for Plot {
        fn write_png(&self, buf: &mut Vec<u8>) -> io::Result<()> {
            buf.extend_from_slice(b"png");
            Ok(())
        }
    }

    struct Broken;

    impl Figure for Broken {
        fn write_png(&self, _: &mut Vec<u8>) -> io::Result<()> {
            Err(io::Error::other("no backend"))
        }
    }

    struct Table;

    impl HtmlRepr for Table {
        fn to_html(&self) -> String {
            "<table></table>".to_string()
        }
    }

    fn format() -> FormatOptions {
        FormatOptions::default()
    }

    #[test]
    fn test_image_encodes_jpeg_data_uri() {
        let payload = dispatch(&Content::image(&Pixel), &format()).unwrap();
        assert_eq!(payload.kind, PayloadKind::Html);
        assert_eq!(payload.data, "<img src=\"data:image/jpeg;base64,anBlZw==\">");
    }

    #[test]
    fn test_figure_encodes_png_data_uri() {
        let payload = dispatch(&Content::figure(&Plot), &format()).unwrap();
        assert_eq!(payload.kind, PayloadKind::Html);
        assert_eq!(payload.data, "<img src=\"data:image/png;base64,cG5n\">");
    }

    #[test]
    fn test_render_failure_propagates() {
        let err = dispatch(&Content::figure(&Broken), &format()).unwrap_err();
        assert!(matches!(err, ContentError::Render { .. }));
        assert!(err.to_string().contains("no backend"));
    }

    #[test]
    fn test_rich_emits_html_verbatim() {
        let payload = dispatch(&Content::html(&Table), &format()).unwrap();
        assert_eq!(payload, Payload::html("<table></table>".to_string()));
    }

    #[test]
    fn test_text_is_str_even_with_newlines() {
        let payload = dispatch(&Content::text("a\nb"), &format()).unwrap();
        assert_eq!(payload.kind, PayloadKind::Str);
        assert_eq!(payload.data, "a\nb");
    }

    #[test]
    fn test_structural_single_line_is_str() {
        let payload = dispatch(&Content::json(&json!({"a": 1})).unwrap(), &format()).unwrap();
        assert_eq!(payload.kind, PayloadKind::Str);
        assert_eq!(payload.data, "{\"a\": 1}");
    }

    #[test]
    fn test_structural_multi_line_is_block() {
        let value: Vec<u32> = (0..40).collect();
        let payload = dispatch(&Content::json(&value).unwrap(), &format()).unwrap();
        assert_eq!(payload.kind, PayloadKind::Block);
        assert!(payload.data.starts_with("[0,\n 1,"));
    }

    #[test]
    fn test_structural_honors_width() {
        let content = Content::json(&json!([1, 2, 3])).unwrap();
        let narrow = FormatOptions { width: 5, ..format() };
        assert_eq!(dispatch(&content, &narrow).unwrap().kind, PayloadKind::Block);
    }

    #[test]
    fn test_structural_encoder_falls_back_to_plain() {
        let payload = encode_structural(&Content::debug(&(1, "two")), &format());
        assert_eq!(payload, Payload::rendered("(1, \"two\")".to_string()));
        let payload = encode_structural(&Content::figure(&Plot), &format());
        assert_eq!(payload.kind, PayloadKind::Str);
        assert!(payload.data.starts_with("<figure "));
    }

    #[test]
    fn test_expand_entries_interleaves_separator() {
        let a = "a";
        let b = 2_u8;
        let entries = expand_entries(&[&a, &b], ",", "!").unwrap();
        let plain: Vec<_> = entries.iter().map(|e| e.plain().into_owned()).collect();
        assert_eq!(plain, ["a", ",", "2", "!"]);
    }

    #[test]
    fn test_expand_entries_empty_is_terminator() {
        let entries = expand_entries(&[], " ", "\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(matches!(&entries[0], Content::Text(t) if t == "\n"));
    }

    #[test]
    fn test_entry_id() {
        assert_eq!(entry_id(Some("etc"), 3).as_deref(), Some("etc:3"));
        assert_eq!(entry_id(Some(""), 0), None);
        assert_eq!(entry_id(None, 0), None);
    }

    #[test]
    fn test_render_plain() {
        let values: [&dyn Printable; 3] = [&"n =", &5_i32, &vec![1, 2]];
        assert_eq!(render_plain(&values, " ", "\n").unwrap(), "n = 5 [1, 2]\n");
        assert_eq!(render_plain(&[], " ", "\n").unwrap(), "\n");
    }
}
