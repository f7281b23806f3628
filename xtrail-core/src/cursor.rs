//! The navigation cursor: stateful traversal over a forward-only event stream.
//!
//! A [`Cursor`] owns an [`EventSource`] and tracks three things: the chain of
//! open element names (the path), how many of them are open (the depth), and
//! which way the last operation moved. Every operation advances the stream;
//! nothing is buffered beyond a single event of lookahead taken at
//! construction, and "going back" is only ever simulated by fast-forwarding
//! to the matching close events.
//!
//! The path is an arena indexed by depth: ascending never truncates it, and
//! the slots past the current depth are stale until the next descent
//! overwrites them. Only `path()[..depth()]` is ever meaningful.

use std::io::BufRead;

use tracing::trace;

use crate::error::Error;
use crate::source::{Event, EventSource, SourceConfig, XmlSource};

/// The cursor's most recent transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// No operation has moved the cursor yet.
    None,
    /// The last operation opened a child element.
    Descended,
    /// The last operation closed this many enclosing elements at once.
    AscendedBy(usize),
    /// The root element has closed; nothing remains to read.
    Exhausted,
}

/// Stateful navigation over one forward pass of a document.
///
/// Valid for exactly one pass: there is no rewind, no copy, and no sharing.
/// The source is dropped with the cursor (or recovered via
/// [`Cursor::into_inner`]).
pub struct Cursor<S> {
    source: S,
    /// Lookahead taken at construction so emptiness is observable before the
    /// first move. Filled exactly once; this is not pushback.
    pending: Option<Event>,
    /// Name arena indexed by depth; only `path[..depth]` is live.
    path: Vec<String>,
    depth: usize,
    last: Move,
    /// Declared attribute count of the element most recently descended into.
    attributes: usize,
}

impl<'a> Cursor<XmlSource<&'a [u8]>> {
    /// Cursor over an in-memory document with the default configuration.
    pub fn from_str(input: &'a str) -> Result<Self, Error> {
        Self::new(XmlSource::from_str(input))
    }
}

impl<R: BufRead> Cursor<XmlSource<R>> {
    /// Cursor over a buffered reader with the default configuration.
    pub fn from_reader(reader: R) -> Result<Self, Error> {
        Self::new(XmlSource::from_reader(reader))
    }

    /// Cursor over a buffered reader with explicit options.
    pub fn with_config(reader: R, config: SourceConfig) -> Result<Self, Error> {
        Self::new(XmlSource::with_config(reader, config))
    }
}

impl<S: EventSource> Cursor<S> {
    /// Bind a cursor to an event source for one forward pass.
    ///
    /// Reads one event of lookahead: a cursor over an empty document starts
    /// out exhausted, with [`Cursor::has_more`] false, before anything else
    /// is consumed.
    pub fn new(mut source: S) -> Result<Self, Error> {
        let (pending, last) = match source.next_event()? {
            Event::Eof => (None, Move::Exhausted),
            first => (Some(first), Move::None),
        };
        Ok(Cursor {
            source,
            pending,
            path: Vec::new(),
            depth: 0,
            last,
            attributes: 0,
        })
    }

    // ========== Primitive moves ==========

    /// Move to the next element boundary.
    ///
    /// Consumes events until either a child element opens (returns its name,
    /// depth grows by one) or the enclosing element closes (returns `None`,
    /// depth shrinks by one). Text along the way is passed over. At the
    /// exhausted state this returns `None` without consuming anything.
    pub fn step(&mut self) -> Result<Option<&str>, Error> {
        if !self.has_more() {
            return Ok(None);
        }
        loop {
            match self.next()? {
                Event::Start { name, attributes } => {
                    return Ok(Some(self.enter(name, attributes)))
                }
                Event::End => {
                    self.leave(1);
                    return Ok(None);
                }
                Event::Text(_) => {}
                Event::Eof => return Err(self.truncated()),
            }
        }
    }

    /// Move to the next sibling element named `name` (ASCII case-insensitive)
    /// and descend into it.
    ///
    /// Siblings with other names are skipped wholesale: their entire subtrees
    /// are consumed without ever surfacing, leaving depth and path untouched.
    /// Returns `None` when the enclosing element closes first (depth shrinks
    /// by one, as with [`Cursor::step`]).
    ///
    /// Called at depth 0 the only candidate is the root element itself; if
    /// its name does not match there is no sibling to try, so the cursor goes
    /// straight to the exhausted state.
    pub fn step_into(&mut self, name: &str) -> Result<Option<&str>, Error> {
        if !self.has_more() {
            return Ok(None);
        }
        let at_root = self.depth == 0;
        loop {
            match self.next()? {
                Event::Start { name: candidate, attributes } => {
                    if candidate.eq_ignore_ascii_case(name) {
                        return Ok(Some(self.enter(candidate, attributes)));
                    }
                    trace!(depth = self.depth, skipped = %candidate, "skip subtree");
                    self.skip_balanced(1)?;
                    if at_root {
                        self.last = Move::Exhausted;
                        return Ok(None);
                    }
                }
                Event::End => {
                    self.leave(1);
                    return Ok(None);
                }
                Event::Text(_) => {}
                Event::Eof => return Err(self.truncated()),
            }
        }
    }

    /// Read the current element's text, or descend if it has children.
    ///
    /// Accumulates character data until the element closes, then ascends one
    /// level and returns the text. If a child element opens first, descends
    /// into it and returns `None`: the element has structure, and whatever
    /// text preceded the child is mixed-content noise and is dropped.
    pub fn read_text(&mut self) -> Result<Option<String>, Error> {
        if !self.has_more() {
            return Ok(None);
        }
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(chunk) => text.push_str(&chunk),
                Event::End => {
                    self.leave(1);
                    return Ok(Some(text));
                }
                Event::Start { name, attributes } => {
                    self.enter(name, attributes);
                    return Ok(None);
                }
                Event::Eof => return Err(self.truncated()),
            }
        }
    }

    /// Rise `levels` levels by consuming the remainder of that many enclosing
    /// subtrees.
    ///
    /// Clamped at the root: asking for more levels than are open closes out
    /// exactly the open ones. `levels == 0` is a contract violation, and at
    /// the exhausted state the call is a no-op.
    pub fn ascend(&mut self, levels: usize) -> Result<(), Error> {
        if levels == 0 {
            return Err(Error::InvalidArgument("ascend requires at least one level"));
        }
        if !self.has_more() {
            return Ok(());
        }
        let levels = levels.min(self.depth);
        if levels == 0 {
            return Ok(());
        }
        self.skip_balanced(levels)?;
        self.leave(levels);
        Ok(())
    }

    /// Rise to an absolute depth: `ascend(depth() - target)`.
    pub fn ascend_to(&mut self, target: usize) -> Result<(), Error> {
        if target >= self.depth {
            return Err(Error::InvalidArgument(
                "ascend target must be shallower than the current depth",
            ));
        }
        self.ascend(self.depth - target)
    }

    // ========== Search and sequence matching ==========

    /// Search forward for an element named `name`, bounded by the current
    /// depth.
    ///
    /// Equivalent to [`Cursor::scan_from`] with the floor captured here. On
    /// a match the returned floor feeds the next `scan_from` call, which is
    /// the repeated-element iteration pattern:
    ///
    /// ```
    /// # use xtrail_core::Cursor;
    /// let mut cursor = Cursor::from_str("<r><x/><x/></r>").unwrap();
    /// cursor.step().unwrap();
    /// let mut hits = 0;
    /// let mut floor = cursor.scan("x").unwrap();
    /// while let Some(at) = floor {
    ///     hits += 1;
    ///     floor = cursor.scan_from("x", at).unwrap();
    /// }
    /// assert_eq!(hits, 2);
    /// ```
    pub fn scan(&mut self, name: &str) -> Result<Option<usize>, Error> {
        let floor = self.depth;
        self.scan_from(name, floor)
    }

    /// Search forward for an element named `name` in document order,
    /// stopping once depth drops below `floor`.
    ///
    /// Descends through every intervening element, so matches may be found
    /// at any depth at or below the floor's subtree ([`Cursor::depth`] tells
    /// where). Returns the floor itself on a match, for reuse in the next
    /// call; `floor == 0` scans to the end of the stream.
    pub fn scan_from(&mut self, name: &str, floor: usize) -> Result<Option<usize>, Error> {
        loop {
            if self.depth < floor || !self.has_more() {
                return Ok(None);
            }
            if let Some(found) = self.step()? {
                if found.eq_ignore_ascii_case(name) {
                    return Ok(Some(floor));
                }
            }
        }
    }

    /// Match a chain of nested descents, one name per level, starting with
    /// the root element.
    ///
    /// `"*"` accepts any single element at its position. On success the
    /// cursor is inside the final element and its depth is returned. The
    /// search backtracks: when a level runs out of matching children it
    /// resumes one level up, at the parent's next sibling, most recently
    /// abandoned level first. Returns `None` once the root has been
    /// exhausted without a full match.
    pub fn find_path(&mut self, names: &[&str]) -> Result<Option<usize>, Error> {
        if names.is_empty() {
            return Err(Error::InvalidArgument("path must name at least one element"));
        }
        self.match_tail(names, 0)
    }

    /// Resume a path match to step through repeated occurrences.
    ///
    /// `from_depth` is the depth a previous [`Cursor::find_path`] returned.
    /// The cursor first rises to `from_depth - 1` (the matched element's
    /// parent) if it sits deeper, then resumes the backtracking search at
    /// the final name. Returns `None` if the cursor has already risen above
    /// the parent - the matched region is behind it.
    pub fn find_path_from(
        &mut self,
        names: &[&str],
        from_depth: usize,
    ) -> Result<Option<usize>, Error> {
        if names.is_empty() {
            return Err(Error::InvalidArgument("path must name at least one element"));
        }
        if from_depth == 0 {
            return Err(Error::InvalidArgument("resume depth starts at one"));
        }
        let parent = from_depth - 1;
        if self.depth < parent {
            return Ok(None);
        }
        if self.depth > parent {
            self.ascend(self.depth - parent)?;
        }
        self.match_tail(names, names.len() - 1)
    }

    /// The backtracking descent shared by the path operations.
    fn match_tail(&mut self, names: &[&str], start: usize) -> Result<Option<usize>, Error> {
        let mut i = start;
        loop {
            let matched = if names[i] == "*" {
                self.step()?.is_some()
            } else {
                self.step_into(names[i])?.is_some()
            };
            if matched {
                i += 1;
                if i == names.len() {
                    return Ok(Some(self.depth));
                }
            } else if i == 0 {
                return Ok(None);
            } else {
                i -= 1;
            }
        }
    }

    // ========== Accessors ==========

    /// Number of currently open elements.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The open-element name chain, root-most first.
    #[inline]
    pub fn path(&self) -> &[String] {
        &self.path[..self.depth]
    }

    /// Name of the innermost open element, or `None` at depth 0.
    pub fn name(&self) -> Option<&str> {
        if self.depth == 0 {
            None
        } else {
            Some(&self.path[self.depth - 1])
        }
    }

    /// Which way the last operation moved.
    #[inline]
    pub fn last_move(&self) -> Move {
        self.last
    }

    /// Whether anything remains to read.
    #[inline]
    pub fn has_more(&self) -> bool {
        self.last != Move::Exhausted
    }

    /// Declared attribute count of the element most recently descended into.
    /// Meaningful immediately after a descent only.
    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attributes
    }

    /// Release the cursor and recover the event source.
    pub fn into_inner(self) -> S {
        self.source
    }

    // ========== Internals ==========

    fn next(&mut self) -> Result<Event, Error> {
        match self.pending.take() {
            Some(event) => Ok(event),
            None => self.source.next_event(),
        }
    }

    /// Record a descent into `name` at the current depth.
    fn enter(&mut self, name: String, attributes: usize) -> &str {
        if self.path.len() == self.depth {
            self.path.push(name);
        } else {
            self.path[self.depth] = name;
        }
        self.depth += 1;
        self.last = Move::Descended;
        self.attributes = attributes;
        trace!(depth = self.depth, name = %self.path[self.depth - 1], "descend");
        &self.path[self.depth - 1]
    }

    /// Record an ascent of `levels`. Landing on depth 0 means the root has
    /// closed: the cursor is exhausted.
    fn leave(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
        self.last = if self.depth == 0 {
            Move::Exhausted
        } else {
            Move::AscendedBy(levels)
        };
        trace!(depth = self.depth, levels, "ascend");
    }

    /// Consume events until `levels` more closes than opens have been seen.
    fn skip_balanced(&mut self, levels: usize) -> Result<(), Error> {
        let mut balance = levels as isize;
        while balance > 0 {
            match self.next()? {
                Event::Start { .. } => balance += 1,
                Event::End => balance -= 1,
                Event::Text(_) => {}
                Event::Eof => return Err(self.truncated()),
            }
        }
        Ok(())
    }

    fn truncated(&self) -> Error {
        Error::UnexpectedEof { depth: self.depth }
    }
}
