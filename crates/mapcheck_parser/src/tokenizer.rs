//! Block tokenizer.
//!
//! Turns the raw line stream of a map or catalog file into typed events.
//! The four file kinds share one set of rules and differ only in the
//! keyword that opens a block and in whether blocks nest:
//!
//! ```text
//! arch map            BlockOpen("map")
//! width 24            Attribute("width", "24")
//! msg                 TextBlockOpen
//! Created: 2014-...   TextBlockLine("Created: 2014-...")
//! endmsg              TextBlockClose
//! end                 BlockClose
//! ```

use std::iter::Enumerate;
use std::str::Lines;

use tracing::debug;

/// Line that closes the innermost open block.
pub const BLOCK_CLOSE: &str = "end";
/// Line that opens a multi-line text block.
pub const TEXT_OPEN: &str = "msg";
/// Line that closes a multi-line text block.
pub const TEXT_CLOSE: &str = "endmsg";
/// Required first line of a map file.
pub const MAP_HEADER: &str = "arch map";

/// The four block-structured file kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// A map: a header block followed by nested object blocks.
    Map,
    /// The archetypes catalog.
    Archetypes,
    /// The artifacts catalog.
    Artifacts,
    /// The regions catalog.
    Regions,
}

impl Grammar {
    /// Prefix of a block-open line. The rest of the line is the header.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Map => "arch ",
            Self::Archetypes => "Object ",
            Self::Artifacts => "artifact ",
            Self::Regions => "region ",
        }
    }

    /// Whether blocks may contain blocks.
    #[must_use]
    pub const fn is_nested(self) -> bool {
        matches!(self, Self::Map)
    }
}

/// What a line means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind<'src> {
    /// `name value`, with the value still raw.
    Attribute {
        /// Text before the first space.
        name: &'src str,
        /// Text after the first space (empty if there is none).
        raw: &'src str,
    },
    /// A block opened with the grammar's keyword.
    BlockOpen {
        /// The rest of the line after the keyword.
        header: &'src str,
    },
    /// `end`
    BlockClose,
    /// `msg`
    TextBlockOpen,
    /// A verbatim line inside a text block.
    TextBlockLine(&'src str),
    /// `endmsg`
    TextBlockClose,
}

/// An event and the 1-based line it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event<'src> {
    /// What the line means.
    pub kind: EventKind<'src>,
    /// 1-based line number.
    pub line: usize,
}

impl<'src> Event<'src> {
    const fn new(kind: EventKind<'src>, line: usize) -> Self {
        Self { kind, line }
    }
}

/// Lazily tokenizes one file.
///
/// A map whose first line is not `arch map` is malformed: the tokenizer
/// yields nothing and [`BlockTokenizer::is_malformed`] returns true.
pub struct BlockTokenizer<'src> {
    grammar: Grammar,
    lines: Enumerate<Lines<'src>>,
    depth: usize,
    in_text: bool,
    started: bool,
    malformed: bool,
    pending: Option<Event<'src>>,
}

impl<'src> BlockTokenizer<'src> {
    /// Creates a tokenizer over `source`.
    #[must_use]
    pub fn new(source: &'src str, grammar: Grammar) -> Self {
        Self {
            grammar,
            lines: source.lines().enumerate(),
            depth: 0,
            in_text: false,
            started: false,
            malformed: false,
            pending: None,
        }
    }

    /// The grammar being tokenized.
    #[must_use]
    pub const fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Number of currently open blocks.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true if the input did not start with the required header.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        self.malformed
    }

    fn classify(&mut self, line: &'src str, number: usize) -> Option<EventKind<'src>> {
        if self.in_text {
            if line == TEXT_CLOSE {
                self.in_text = false;
                return Some(EventKind::TextBlockClose);
            }
            return Some(EventKind::TextBlockLine(line));
        }

        if let Some(header) = line.strip_prefix(self.grammar.keyword()) {
            let open = EventKind::BlockOpen { header };
            if self.grammar.is_nested() || self.depth == 0 {
                self.depth += 1;
                return Some(open);
            }
            // Flat grammars: a new block implicitly ends the open one
            self.pending = Some(Event::new(open, number));
            return Some(EventKind::BlockClose);
        }

        if self.depth == 0 {
            return None;
        }

        match line {
            BLOCK_CLOSE => {
                self.depth -= 1;
                Some(EventKind::BlockClose)
            }
            TEXT_OPEN => {
                self.in_text = true;
                Some(EventKind::TextBlockOpen)
            }
            "" => None,
            _ => {
                let (name, raw) = line.split_once(' ').unwrap_or((line, ""));
                Some(EventKind::Attribute { name, raw })
            }
        }
    }
}

impl<'src> Iterator for BlockTokenizer<'src> {
    type Item = Event<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }
        if self.malformed {
            return None;
        }

        loop {
            let Some((index, line)) = self.lines.next() else {
                if !self.started && self.grammar == Grammar::Map {
                    debug!("empty input is not a map");
                    self.malformed = true;
                }
                self.started = true;
                return None;
            };

            if !self.started {
                self.started = true;
                if self.grammar == Grammar::Map && line != MAP_HEADER {
                    debug!(first_line = line, "input does not start with '{MAP_HEADER}'");
                    self.malformed = true;
                    return None;
                }
            }

            let number = index + 1;
            if let Some(kind) = self.classify(line, number) {
                return Some(Event::new(kind, number));
            }
        }
    }
}
