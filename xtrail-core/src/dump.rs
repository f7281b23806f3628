//! Structural trace of a document, built only on the public cursor contract.
//!
//! The dump is a deterministic, whitespace-insensitive fingerprint of a
//! document's structure: one line per element enter and exit, indentation
//! proportional to depth, attribute counts and text lengths instead of
//! attribute values and text. Two documents with the same structure dump
//! identically, which makes this the canonical oracle for cursor tests.
//!
//! ```
//! use xtrail_core::{Cursor, Dumper};
//!
//! let mut cursor = Cursor::from_str(r#"<r a="1"><c>hi</c></r>"#).unwrap();
//! let trace = Dumper::new().dump_to_string(&mut cursor).unwrap();
//! assert_eq!(trace, "<r a=\"1\">\n <c>2</c>\n</r>\n");
//! ```

use std::io::Write;

use crate::cursor::Cursor;
use crate::error::Error;
use crate::source::EventSource;

/// Renders a depth-indented structural trace of a whole document.
///
/// A pure consumer of the cursor's public operations: it keeps its own stack
/// of entered names rather than peeking at cursor internals. Elements with
/// text show the text's length; elements with neither text nor children
/// render as a single self-closing line.
#[derive(Debug, Clone)]
pub struct Dumper {
    margin: String,
}

impl Default for Dumper {
    fn default() -> Self {
        Dumper { margin: " ".into() }
    }
}

impl Dumper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the per-level indentation unit (default: one space).
    pub fn margin(mut self, margin: impl Into<String>) -> Self {
        self.margin = margin.into();
        self
    }

    /// Walk the rest of the document, writing the trace to `out`.
    pub fn dump<S, W>(&self, cursor: &mut Cursor<S>, out: &mut W) -> Result<(), Error>
    where
        S: EventSource,
        W: Write,
    {
        let mut open: Vec<String> = Vec::new();
        while cursor.has_more() {
            let name = match cursor.step()? {
                Some(name) => name.to_owned(),
                None => {
                    // An enclosing element closed.
                    let closed = open.pop().unwrap_or_default();
                    self.indent(out, cursor.depth())?;
                    writeln!(out, "</{closed}>")?;
                    continue;
                }
            };
            self.open_tag(out, cursor.depth(), &name, cursor.attribute_count())?;
            open.push(name);
            loop {
                match cursor.read_text()? {
                    None => {
                        // The element has children; keep descending.
                        writeln!(out, ">")?;
                        let child = cursor.name().unwrap_or_default().to_owned();
                        self.open_tag(out, cursor.depth(), &child, cursor.attribute_count())?;
                        open.push(child);
                    }
                    Some(text) => {
                        let closed = open.pop().unwrap_or_default();
                        if text.is_empty() {
                            writeln!(out, "/>")?;
                        } else {
                            writeln!(out, ">{}</{}>", text.len(), closed)?;
                        }
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Dump into a string.
    pub fn dump_to_string<S: EventSource>(&self, cursor: &mut Cursor<S>) -> Result<String, Error> {
        let mut out = Vec::new();
        self.dump(cursor, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn open_tag<W: Write>(
        &self,
        out: &mut W,
        depth: usize,
        name: &str,
        attributes: usize,
    ) -> Result<(), Error> {
        self.indent(out, depth.saturating_sub(1))?;
        write!(out, "<{name}")?;
        if attributes > 0 {
            write!(out, " a=\"{attributes}\"")?;
        }
        Ok(())
    }

    fn indent<W: Write>(&self, out: &mut W, levels: usize) -> Result<(), Error> {
        for _ in 0..levels {
            out.write_all(self.margin.as_bytes())?;
        }
        Ok(())
    }
}
