//! Width-aware structural pretty-printer.
//!
//! Values whose single-line form fits the remaining width stay on one line.
//! Containers that do not fit are broken one item per line, with the first
//! item following the opening bracket and later items aligned beneath it.

use serde_json::{Map, Value};

use crate::{FormatOptions, Structure};

/// Render a structure with the given options.
#[must_use]
pub fn format_structure(structure: &Structure, options: &FormatOptions) -> String {
    match structure {
        Structure::Json(value) => pformat(value, options),
        Structure::Debug { flat, expanded } => {
            if options.compact || flat.chars().count() <= options.width {
                flat.clone()
            } else {
                expanded.clone()
            }
        }
    }
}

/// Pretty-print a JSON value.
#[must_use]
pub fn pformat(value: &Value, options: &FormatOptions) -> String {
    let mut printer = PrettyPrinter {
        options,
        out: String::new(),
    };
    printer.format(value, 0, 0, 1);
    printer.out
}

/// Single-line representation, eliding containers nested beyond `depth`.
#[must_use]
pub fn repr(value: &Value, depth: Option<usize>) -> String {
    let mut out = String::new();
    write_repr(value, depth, 1, &mut out);
    out
}

fn write_repr(value: &Value, depth: Option<usize>, level: usize, out: &mut String) {
    match value {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(_) if is_elided(depth, level) => out.push_str("[...]"),
        Value::Object(_) if is_elided(depth, level) => out.push_str("{...}"),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(item, depth, level + 1, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quote(key));
                out.push_str(": ");
                write_repr(item, depth, level + 1, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn is_elided(depth: Option<usize>, level: usize) -> bool {
    depth.is_some_and(|depth| level > depth)
}

fn quote(key: &str) -> String {
    Value::from(key).to_string()
}

fn width_of(text: &str) -> usize {
    text.chars().count()
}

struct PrettyPrinter<'o> {
    options: &'o FormatOptions,
    out: String,
}

impl PrettyPrinter<'_> {
    fn format(&mut self, value: &Value, col: usize, allowance: usize, level: usize) {
        let rep = repr_at(value, self.options.depth, level);
        let available = self.options.width.saturating_sub(col + allowance);
        if width_of(&rep) <= available || !self.is_expandable(value, level) {
            self.out.push_str(&rep);
            return;
        }
        match value {
            Value::Array(items) => self.format_items(items, col, allowance, level),
            Value::Object(map) => self.format_map(map, col, allowance, level),
            _ => self.out.push_str(&rep),
        }
    }

    fn is_expandable(&self, value: &Value, level: usize) -> bool {
        let populated = match value {
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => false,
        };
        populated && !is_elided(self.options.depth, level)
    }

    fn open(&mut self, bracket: char, col: usize) -> (usize, String) {
        let indent = self.options.indent;
        self.out.push(bracket);
        self.out.push_str(&" ".repeat(indent.saturating_sub(1)));
        let item_col = col + indent;
        (item_col, format!(",\n{}", " ".repeat(item_col)))
    }

    fn format_items(&mut self, items: &[Value], col: usize, allowance: usize, level: usize) {
        let (item_col, delimiter) = self.open('[', col);
        let available = self.options.width.saturating_sub(item_col);
        let mut line = 0;

        for (i, item) in items.iter().enumerate() {
            let trailing = if i + 1 == items.len() { allowance + 1 } else { 1 };
            let rep = repr_at(item, self.options.depth, level + 1);
            let len = width_of(&rep);

            if self.options.compact && len + trailing <= available {
                if i == 0 {
                    line = len;
                } else if line + 2 + len + trailing <= available {
                    self.out.push_str(", ");
                    line += 2 + len;
                } else {
                    self.out.push_str(&delimiter);
                    line = len;
                }
                self.out.push_str(&rep);
                continue;
            }

            if i > 0 {
                self.out.push_str(&delimiter);
            }
            self.format(item, item_col, trailing, level + 1);
            // Whatever follows an expanded item starts a fresh line.
            line = available;
        }
        self.out.push(']');
    }

    fn format_map(&mut self, map: &Map<String, Value>, col: usize, allowance: usize, level: usize) {
        let (item_col, delimiter) = self.open('{', col);

        for (i, (key, item)) in map.iter().enumerate() {
            let trailing = if i + 1 == map.len() { allowance + 1 } else { 1 };
            if i > 0 {
                self.out.push_str(&delimiter);
            }
            let key = quote(key);
            self.out.push_str(&key);
            self.out.push_str(": ");
            self.format(item, item_col + width_of(&key) + 2, trailing, level + 1);
        }
        self.out.push('}');
    }
}

fn repr_at(value: &Value, depth: Option<usize>, level: usize) -> String {
    let mut out = String::new();
    write_repr(value, depth, level, &mut out);
    out
}
