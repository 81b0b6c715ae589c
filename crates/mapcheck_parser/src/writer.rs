//! Block writer.
//!
//! Renders records back into the line grammar the tokenizer reads, so a
//! written block parses to the same record.

use mapcheck_foundation::{AttributeRecord, Value};

use crate::tokenizer::{BLOCK_CLOSE, Grammar, TEXT_CLOSE, TEXT_OPEN};

/// Formats one attribute line. Empty values are written as the bare name.
#[must_use]
pub fn format_attribute(name: &str, value: &Value) -> String {
    let text = value.to_string();
    if text.is_empty() {
        name.to_string()
    } else {
        format!("{name} {text}")
    }
}

/// Writes a complete block: open line, attributes in name order, an
/// optional `msg` text block and the closing `end`.
///
/// Attributes named `archname` are implied by the header and skipped.
#[must_use]
pub fn write_block(grammar: Grammar, header: &str, record: &AttributeRecord) -> String {
    let mut lines = vec![format!("{}{header}", grammar.keyword())];
    for (name, value) in record.iter() {
        if name == "archname" || name == TEXT_OPEN {
            continue;
        }
        lines.push(format_attribute(name, value));
    }
    if let Some(msg) = record.get(TEXT_OPEN) {
        lines.push(TEXT_OPEN.to_string());
        let body = msg.to_string();
        if !body.is_empty() {
            lines.push(body);
        }
        lines.push(TEXT_CLOSE.to_string());
    }
    lines.push(BLOCK_CLOSE.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
