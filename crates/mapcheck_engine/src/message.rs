//! Dialog and message text checks.
//!
//! NPC dialogs are written as blocks introduced by `@match PATTERN` lines.
//! Every dialog needs a `^hello$` entry point, and patterns are expected
//! to be anchored regular expressions.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?[a-z_]+)([^>]*)>").expect("markup tag pattern is valid"));

static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\^~|].*[\^~|]").expect("control char pattern is valid"));

const MATCH_PREFIX: &str = "@match ";
const HELLO: &str = "^hello$";

/// Problems found in one message body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MessageIssues {
    /// `[` or `]` outside of markup tags.
    pub unescaped_markup: bool,
    /// A `@match` line mentions `^hello$` alongside other patterns.
    pub invalid_hello: bool,
    /// A `@match` alternative is not anchored with `^` and `$`.
    pub suspicious_regex: bool,
    /// A dialog line contains a link tag.
    pub link_in_msg: bool,
    /// A line uses the deprecated `^`, `~` or `|` markup.
    pub control_chars: bool,
    /// No `@match ^hello$` line.
    pub missing_hello: bool,
}

impl MessageIssues {
    /// Scans a message body.
    #[must_use]
    pub fn scan(msg: &str) -> Self {
        let mut issues = Self::default();

        let stripped = MARKUP_TAG.replace_all(msg, "$1$2");
        issues.unescaped_markup = stripped.contains(['[', ']']);

        let mut has_hello = false;
        for line in msg.split('\n') {
            if let Some(pattern) = line.strip_prefix(MATCH_PREFIX) {
                if pattern == HELLO {
                    has_hello = true;
                } else if pattern.contains(HELLO) {
                    issues.invalid_hello = true;
                }
                let unanchored = pattern
                    .split('|')
                    .filter(|part| *part != "*")
                    .any(|part| !part.starts_with('^') || !part.ends_with('$'));
                if unanchored {
                    issues.suspicious_regex = true;
                }
            } else {
                if line.contains("<a") {
                    issues.link_in_msg = true;
                }
                if CONTROL_CHARS.is_match(line) {
                    issues.control_chars = true;
                }
            }
        }
        issues.missing_hello = !has_hello;
        issues
    }
}
