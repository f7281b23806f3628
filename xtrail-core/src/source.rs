//! Event source layer: the four-event stream model and the quick-xml adapter.
//!
//! The cursor only ever sees four kinds of event: an element opens, an
//! element closes, character data, end of input. Everything else the
//! tokenizer produces (declarations, comments, processing instructions,
//! doctypes) is structural noise at this layer and is passed over.
//!
//! ## Event sequences
//!
//! `<a x="1"><b/>text</a>` flattens to:
//! ```text
//! Start { name: "a", attributes: 1 }
//! Start { name: "b", attributes: 0 }
//! End
//! Text("text")
//! End
//! Eof
//! ```
//!
//! Self-closing elements always yield a balanced `Start`/`End` pair, so
//! consumers never need a special case for `<b/>`.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;

use crate::error::Error;

/// A flattened parse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An element opened: its name and declared attribute count.
    Start { name: String, attributes: usize },
    /// The innermost open element closed.
    End,
    /// Character data (entity references already expanded).
    Text(String),
    /// End of input. Repeatable: reading past the end yields `Eof` again.
    Eof,
}

/// A forward-only supplier of parse events.
///
/// The cursor owns exactly one source for exactly one pass; there is no
/// rewind and no pushback. Implementations must keep returning [`Event::Eof`]
/// once the input is spent.
pub trait EventSource {
    fn next_event(&mut self) -> Result<Event, Error>;
}

/// Reader options, owned by the caller and fixed at construction.
///
/// There is deliberately no process-wide default reader factory; every
/// source carries its own configuration.
#[derive(Debug, Clone, Copy)]
pub struct SourceConfig {
    /// Trim surrounding whitespace from text events. Whitespace-only text
    /// between elements is then suppressed entirely.
    pub trim_text: bool,
    /// Report element names verbatim (`ns:name`) instead of the local part.
    pub qualified_names: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            trim_text: true,
            qualified_names: false,
        }
    }
}

/// [`EventSource`] backed by a `quick_xml::Reader`.
pub struct XmlSource<R: BufRead> {
    reader: Reader<R>,
    config: SourceConfig,
    buf: Vec<u8>,
    /// A self-closing element was just reported as `Start`; its synthetic
    /// `End` is owed before the reader is consulted again.
    queued_end: bool,
}

impl<'a> XmlSource<&'a [u8]> {
    /// Source over an in-memory document with the default configuration.
    pub fn from_str(input: &'a str) -> Self {
        Self::configure(Reader::from_str(input), SourceConfig::default())
    }
}

impl<R: BufRead> XmlSource<R> {
    /// Source over a buffered reader with the default configuration.
    pub fn from_reader(reader: R) -> Self {
        Self::with_config(reader, SourceConfig::default())
    }

    /// Source over a buffered reader with explicit options.
    pub fn with_config(reader: R, config: SourceConfig) -> Self {
        Self::configure(Reader::from_reader(reader), config)
    }

    fn configure(mut reader: Reader<R>, config: SourceConfig) -> Self {
        reader.config_mut().trim_text(config.trim_text);
        XmlSource {
            reader,
            config,
            buf: Vec::new(),
            queued_end: false,
        }
    }

    /// Hand back the underlying reader.
    pub fn into_inner(self) -> Reader<R> {
        self.reader
    }
}

impl<R: BufRead> EventSource for XmlSource<R> {
    fn next_event(&mut self) -> Result<Event, Error> {
        if self.queued_end {
            self.queued_end = false;
            return Ok(Event::End);
        }
        let qualified = self.config.qualified_names;
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                XmlEvent::Start(e) => {
                    return Ok(Event::Start {
                        name: element_name(qualified, &e),
                        attributes: e.attributes().count(),
                    })
                }
                XmlEvent::Empty(e) => {
                    self.queued_end = true;
                    return Ok(Event::Start {
                        name: element_name(qualified, &e),
                        attributes: e.attributes().count(),
                    });
                }
                XmlEvent::End(_) => return Ok(Event::End),
                XmlEvent::Text(e) => return Ok(Event::Text(e.unescape()?.into_owned())),
                XmlEvent::CData(e) => {
                    return Ok(Event::Text(
                        String::from_utf8_lossy(&e.into_inner()).into_owned(),
                    ))
                }
                XmlEvent::Eof => return Ok(Event::Eof),
                // Decl, Comment, PI, DocType: not structure, not content.
                _ => {}
            }
        }
    }
}

fn element_name(qualified: bool, e: &BytesStart<'_>) -> String {
    let name = if qualified {
        e.name().into_inner()
    } else {
        e.local_name().into_inner()
    };
    String::from_utf8_lossy(name).into_owned()
}
