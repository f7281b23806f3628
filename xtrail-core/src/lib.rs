//! Xtrail Core
//!
//! Stateful navigation cursor over a forward-only XML pull-parsing event
//! stream. Descend into a named child, skip sibling subtrees wholesale, read
//! leaf text, ascend several levels, search repeated elements - without
//! building a DOM and without re-implementing depth bookkeeping at every
//! call site. Seeking backward is only ever simulated by fast-forwarding to
//! the matching close events.
//!
//! # Architecture
//!
//! - **source.rs** - four-event stream model, quick-xml adapter, SourceConfig
//! - **cursor.rs** - the cursor engine: path stack, depth, move state
//! - **dump.rs** - structural trace renderer (the canonical test oracle)
//! - **error.rs** - stream errors vs. contract violations
//!
//! # Example
//!
//! ```
//! use xtrail_core::Cursor;
//!
//! let mut cursor = Cursor::from_str("<a><b>1</b><c>2</c></a>").unwrap();
//! cursor.step().unwrap();                                   // into <a>
//! assert_eq!(cursor.step_into("c").unwrap(), Some("c"));    // skips <b>
//! assert_eq!(cursor.read_text().unwrap().as_deref(), Some("2"));
//! ```

pub mod cursor;
pub mod dump;
pub mod error;
pub mod source;

pub use cursor::{Cursor, Move};
pub use dump::Dumper;
pub use error::Error;
pub use source::{Event, EventSource, SourceConfig, XmlSource};
