//! Catalog parsing.
//!
//! The archetype, artifact and region files share the flat block grammar.
//! Each block becomes one [`AttributeRecord`] keyed by its header token.
//! Artifacts may pull in a base record with `def_arch`.

use mapcheck_foundation::{AttributeRecord, DiagnosticAggregator, Severity, SourceId, Value};
use mapcheck_storage::Catalog;
use tracing::debug;

use crate::tokenizer::{BlockTokenizer, EventKind, Grammar};

/// Attribute that makes an artifact inherit from another definition.
pub const DEF_ARCH: &str = "def_arch";

/// Parses the archetypes catalog.
///
/// Archetypes without a `name` are given their archname.
pub fn parse_archetypes(text: &str, diagnostics: &mut DiagnosticAggregator) -> Catalog {
    let mut catalog = FlatParser::new(Grammar::Archetypes, None).parse(text, diagnostics);
    for record in catalog.records_mut() {
        if !record.contains("name") {
            if let Some(archname) = record.get("archname").cloned() {
                record.set("name", archname);
            }
        }
    }
    catalog
}

/// Parses the artifacts catalog, resolving `def_arch` against `archetypes`
/// and the artifacts defined earlier in the same file.
pub fn parse_artifacts(
    text: &str,
    archetypes: &Catalog,
    diagnostics: &mut DiagnosticAggregator,
) -> Catalog {
    FlatParser::new(Grammar::Artifacts, Some(archetypes)).parse(text, diagnostics)
}

/// Parses the regions catalog.
pub fn parse_regions(text: &str, diagnostics: &mut DiagnosticAggregator) -> Catalog {
    FlatParser::new(Grammar::Regions, None).parse(text, diagnostics)
}

/// The block currently being filled.
struct Entry {
    name: String,
    record: AttributeRecord,
}

struct FlatParser<'a> {
    grammar: Grammar,
    source: SourceId,
    label: &'static str,
    archetypes: Option<&'a Catalog>,
}

impl<'a> FlatParser<'a> {
    fn new(grammar: Grammar, archetypes: Option<&'a Catalog>) -> Self {
        let (source, label) = match grammar {
            Grammar::Artifacts => (SourceId::Artifacts, "Artifact"),
            Grammar::Regions => (SourceId::Regions, "Region"),
            Grammar::Archetypes | Grammar::Map => (SourceId::Archetypes, "Archetype"),
        };
        Self {
            grammar,
            source,
            label,
            archetypes,
        }
    }

    fn parse(&self, text: &str, diagnostics: &mut DiagnosticAggregator) -> Catalog {
        let mut catalog = Catalog::new();
        let mut current: Option<Entry> = None;
        let mut text_block: Option<Vec<&str>> = None;

        for event in BlockTokenizer::new(text, self.grammar) {
            match event.kind {
                EventKind::BlockOpen { header } => {
                    let mut record = AttributeRecord::new();
                    if self.grammar != Grammar::Regions {
                        record.set("archname", Value::text(header));
                    }
                    current = Some(Entry {
                        name: header.to_string(),
                        record,
                    });
                }
                EventKind::BlockClose => {
                    if let Some(entry) = current.take() {
                        self.insert(&mut catalog, entry, diagnostics);
                    }
                }
                EventKind::TextBlockOpen => text_block = Some(Vec::new()),
                EventKind::TextBlockLine(line) => {
                    if let Some(lines) = text_block.as_mut() {
                        lines.push(line);
                    }
                }
                EventKind::TextBlockClose => {
                    if let (Some(lines), Some(entry)) = (text_block.take(), current.as_mut()) {
                        entry.record.set("msg", Value::text(&lines.join("\n")));
                    }
                }
                EventKind::Attribute { name, raw } => {
                    let Some(entry) = current.as_mut() else {
                        continue;
                    };
                    if self.grammar == Grammar::Artifacts && name == DEF_ARCH {
                        self.inherit(&catalog, entry, raw, event.line, diagnostics);
                    } else {
                        entry.record.set(name, Value::parse(raw));
                    }
                }
            }
        }

        if let Some(entry) = current.take() {
            self.insert(&mut catalog, entry, diagnostics);
        }

        debug!(source = %self.source, entries = catalog.len(), "parsed catalog");
        catalog
    }

    fn inherit(
        &self,
        artifacts: &Catalog,
        entry: &mut Entry,
        base_name: &str,
        line: usize,
        diagnostics: &mut DiagnosticAggregator,
    ) {
        let base = self
            .archetypes
            .and_then(|archetypes| archetypes.get(base_name))
            .or_else(|| artifacts.get(base_name));

        match base {
            Some(base) => {
                let mut record = entry.record.overlaid_on(base);
                record.set("archname", Value::text(&entry.name));
                entry.record = record;
            }
            None => {
                let message = format!(
                    "Artifact '{}': Could not find archetype '{base_name}' for def_arch command (line: {line}).",
                    entry.name
                );
                diagnostics.record(&self.source, message, Severity::Critical, None);
            }
        }
    }

    fn insert(&self, catalog: &mut Catalog, entry: Entry, diagnostics: &mut DiagnosticAggregator) {
        let name = entry.name;
        if catalog.insert(name.clone(), entry.record).is_some() {
            let message = format!("{} '{name}' is defined more than once.", self.label);
            diagnostics.record(&self.source, message, Severity::High, None);
        }
    }
}
