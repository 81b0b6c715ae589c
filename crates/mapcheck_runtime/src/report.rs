//! Rendering results.
//!
//! Three formats: the terminal listing (optionally without ANSI styling,
//! in a compact `x y SEVERITY message` layout), JSON, and a flat report
//! file with one `source: SEVERITY: message (x, y)` line per finding.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use mapcheck_foundation::{
    Diagnostic, DiagnosticAggregator, DiagnosticGroup, Error, ErrorKind, Result, Severity,
    SeverityFilter, SourceId,
};
use serde::Serialize;

const BOLD: &str = "\x1b[1m";
const UNDERSCORE: &str = "\x1b[4m";
const RESET: &str = "\x1b[0m";

/// ANSI color for a severity label.
#[must_use]
pub const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "\x1b[30m",
        Severity::Low => "\x1b[35m",
        Severity::Medium => "\x1b[36m",
        Severity::High => "\x1b[34m",
        Severity::Critical => "\x1b[31m",
    }
}

/// Terminal listing options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Plain layout with no escape sequences.
    pub text_only: bool,
    /// Only one map was checked, so map headings are left out.
    pub single_map: bool,
}

/// Writes the terminal listing: map groups sorted by source, then the
/// catalog groups. Groups with nothing visible are left out.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_text<W: Write>(
    out: &mut W,
    diagnostics: &DiagnosticAggregator,
    filter: &SeverityFilter,
    options: TextOptions,
) -> io::Result<()> {
    let style = |code: &'static str| if options.text_only { "" } else { code };

    if !options.single_map {
        writeln!(
            out,
            "{}{}Scan complete. Results:\n{}",
            style(BOLD),
            style(UNDERSCORE),
            style(RESET)
        )?;
    }

    for group in diagnostics.sorted_groups() {
        let mut visible = group.visible(filter).peekable();
        if visible.peek().is_none() {
            continue;
        }
        let is_map = !group.source.is_catalog();
        if !is_map || !options.single_map {
            writeln!(out, "{}{}:{}", style(BOLD), group.source, style(RESET))?;
        }
        for diagnostic in visible {
            write_line(out, diagnostic, is_map, options)?;
        }
    }
    Ok(())
}

fn write_line<W: Write>(
    out: &mut W,
    diagnostic: &Diagnostic,
    is_map: bool,
    options: TextOptions,
) -> io::Result<()> {
    let position = diagnostic.position.filter(|_| is_map);
    let label = diagnostic.severity.label();

    if options.text_only {
        if let Some(pos) = position {
            write!(out, "{} {} ", pos.x, pos.y)?;
        }
        return writeln!(out, "{label} {}", diagnostic.message);
    }

    write!(
        out,
        "  {}{label}{RESET}: ",
        severity_color(diagnostic.severity)
    )?;
    if let Some(pos) = position {
        write!(out, "{pos}: ")?;
    }
    writeln!(out, "{}", diagnostic.message)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    groups: Vec<JsonGroup<'a>>,
    counts: BTreeMap<&'static str, usize>,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    source: &'a SourceId,
    diagnostics: Vec<&'a Diagnostic>,
}

impl<'a> JsonGroup<'a> {
    fn new(group: &'a DiagnosticGroup, filter: &'a SeverityFilter) -> Self {
        Self {
            source: &group.source,
            diagnostics: group.visible(filter).collect(),
        }
    }
}

/// Writes visible diagnostics as pretty-printed JSON, grouped by source in
/// reporting order, with per-severity totals.
///
/// # Errors
///
/// Returns an `Internal` error if serialization or writing fails.
pub fn write_json<W: Write>(
    out: W,
    diagnostics: &DiagnosticAggregator,
    filter: &SeverityFilter,
) -> Result<()> {
    let groups: Vec<_> = diagnostics
        .sorted_groups()
        .into_iter()
        .map(|group| JsonGroup::new(group, filter))
        .filter(|group| !group.diagnostics.is_empty())
        .collect();
    let counts = Severity::ALL
        .into_iter()
        .filter(|s| filter.allows(*s))
        .map(|s| (s.key(), diagnostics.count(s)))
        .collect();

    serde_json::to_writer_pretty(out, &JsonReport { groups, counts })
        .map_err(|err| Error::new(ErrorKind::Internal(err.to_string())))
}

/// Writes the flat report file.
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be written.
pub fn write_report_file(
    path: &Path,
    diagnostics: &DiagnosticAggregator,
    filter: &SeverityFilter,
) -> Result<()> {
    let io_error = |err: io::Error| Error::io(path, &err);
    let mut out = BufWriter::new(File::create(path).map_err(io_error)?);
    diagnostics
        .try_for_each(filter, |diagnostic| writeln!(out, "{diagnostic}"))
        .map_err(io_error)?;
    out.flush().map_err(io_error)
}
