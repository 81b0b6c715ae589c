//! Object tree builder for maps.
//!
//! Consumes [`BlockTokenizer`] events for the map grammar and builds a
//! [`MapDocument`]: the header record, an arena of object instances and
//! the tile grid. Instances are seeded with their archetype's defaults
//! before their own attribute lines are applied one at a time.

use std::collections::HashSet;

use mapcheck_foundation::{
    AttributeRecord, Diagnostic, DiagnosticAggregator, Error, ErrorContext, Result, Severity,
    SourceId, Value,
};
use mapcheck_storage::{CatalogIndex, MapDocument, ObjectId, ObjectInstance};
use tracing::debug;

use crate::tokenizer::{BlockTokenizer, EventKind, Grammar};

/// Attributes expected to differ between placements of one archetype.
///
/// Setting anything else on an instance marks it as a modified artifact.
pub const DEFAULT_VARYING_ATTRIBUTES: &[&str] = &[
    "x",
    "y",
    "identified",
    "unpaid",
    "no_pick",
    "level",
    "nrof",
    "value",
    "can_stack",
    "layer",
    "sub_layer",
    "z",
    "zoom",
    "zoom_x",
    "zoom_y",
    "alpha",
    "align",
];

/// An open block on the builder stack.
#[derive(Clone, Copy)]
enum Frame<'c> {
    Header,
    Object {
        id: ObjectId,
        defaults: Option<&'c AttributeRecord>,
    },
}

/// Builds map documents against a catalog index.
pub struct MapBuilder<'c> {
    catalog: &'c CatalogIndex,
    varying: HashSet<String>,
}

impl<'c> MapBuilder<'c> {
    /// Creates a builder using [`DEFAULT_VARYING_ATTRIBUTES`].
    #[must_use]
    pub fn new(catalog: &'c CatalogIndex) -> Self {
        Self {
            catalog,
            varying: DEFAULT_VARYING_ATTRIBUTES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Adds names to the varying-attribute allow-list.
    #[must_use]
    pub fn with_varying_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.varying.extend(names.into_iter().map(Into::into));
        self
    }

    /// Returns true if `name` is on the varying-attribute allow-list.
    #[must_use]
    pub fn is_varying(&self, name: &str) -> bool {
        self.varying.contains(name)
    }

    /// Parses a map file.
    ///
    /// Unknown archetypes are recorded as diagnostics and the instance is
    /// still built with no defaults. Nothing is recorded for input that
    /// turns out not to be a map.
    ///
    /// # Errors
    ///
    /// Returns a recoverable `NotADocument` error if the text does not
    /// start with `arch map` or the header block is never closed. The
    /// error context names the source and the line where reading stopped.
    pub fn build(
        &self,
        source: SourceId,
        text: &str,
        diagnostics: &mut DiagnosticAggregator,
    ) -> Result<MapDocument> {
        let mut tokens = BlockTokenizer::new(text, Grammar::Map);
        let mut doc = MapDocument::new(source, AttributeRecord::new());
        let mut stack: Vec<Frame<'c>> = Vec::new();
        let mut header_done = false;
        let mut text_block: Option<Vec<&str>> = None;
        let mut pending: Vec<Diagnostic> = Vec::new();
        let mut last_line = 0;

        for event in &mut tokens {
            last_line = event.line;
            match event.kind {
                EventKind::BlockOpen { header } => {
                    if !header_done && stack.is_empty() {
                        stack.push(Frame::Header);
                        continue;
                    }
                    let parent = match stack.last() {
                        Some(Frame::Object { id, .. }) => Some(*id),
                        Some(Frame::Header) => {
                            // Header lines are plain attributes, `arch` included
                            doc.header.set("arch", Value::parse(header));
                            continue;
                        }
                        None => None,
                    };
                    stack.push(self.open_object(&mut doc, header, parent));
                }
                EventKind::BlockClose => match stack.pop() {
                    Some(Frame::Header) => header_done = true,
                    Some(Frame::Object { id, .. }) => close_object(&mut doc, id, &mut pending),
                    None => {}
                },
                EventKind::TextBlockOpen => text_block = Some(Vec::new()),
                EventKind::TextBlockLine(line) => {
                    if let Some(lines) = text_block.as_mut() {
                        lines.push(line);
                    }
                }
                EventKind::TextBlockClose => {
                    if let (Some(lines), Some(frame)) = (text_block.take(), stack.last()) {
                        self.assign(&mut doc, *frame, "msg", Value::text(&lines.join("\n")));
                    }
                }
                EventKind::Attribute { name, raw } => {
                    if let Some(frame) = stack.last() {
                        self.assign(&mut doc, *frame, name, Value::parse(raw));
                    }
                }
            }
        }

        if tokens.is_malformed() {
            return Err(Error::not_a_document("missing 'arch map' header")
                .with_context(ErrorContext::new().with_source(doc.source.name()).with_line(1)));
        }
        if !header_done {
            return Err(Error::not_a_document("map header is never closed").with_context(
                ErrorContext::new()
                    .with_source(doc.source.name())
                    .with_line(last_line),
            ));
        }

        // Blocks left open at end of input close implicitly
        while let Some(Frame::Object { id, .. }) = stack.pop() {
            close_object(&mut doc, id, &mut pending);
        }
        for diagnostic in pending {
            diagnostics.push(diagnostic);
        }

        debug!(
            source = %doc.source,
            objects = doc.object_count(),
            "built map document"
        );
        Ok(doc)
    }

    fn open_object(
        &self,
        doc: &mut MapDocument,
        archetype_name: &str,
        parent: Option<ObjectId>,
    ) -> Frame<'c> {
        let defaults = self.catalog.find_archetype(archetype_name);
        let mut object = ObjectInstance::new(archetype_name, defaults.cloned().unwrap_or_default());
        object.resolved = defaults.is_some();
        object.attributes.set("archname", Value::text(archetype_name));
        if parent.is_none() {
            object.attributes.set("x", 0);
            object.attributes.set("y", 0);
        }

        let id = doc.allocate(object);
        if let Some(parent) = parent {
            doc.insert_into(parent, id);
        }
        Frame::Object { id, defaults }
    }

    fn assign(&self, doc: &mut MapDocument, frame: Frame<'c>, name: &str, value: Value) {
        let Frame::Object { id, defaults } = frame else {
            doc.header.set(name, value);
            return;
        };

        let object = doc.object_mut(id);
        if let Some(defaults) = defaults {
            if !self.is_varying(name) {
                object.modified_artifact = true;
            }
            let default = defaults.get(name);
            if default == Some(&value) || (value.is_zero() && default.is_none()) {
                object.redundant_attribute = true;
            }
        }
        object.attributes.set(name, value);
    }
}

fn close_object(doc: &mut MapDocument, id: ObjectId, pending: &mut Vec<Diagnostic>) {
    let object = doc.object(id);
    if !object.resolved {
        let message = format!("Invalid archetype '{}' found.", object.archetype_name);
        let position = doc.position_of(id);
        pending.push(Diagnostic::new(
            doc.source.clone(),
            message,
            Severity::Critical,
            Some(position),
        ));
    }
    if doc.object(id).is_root() {
        doc.place(id);
    }
}
