//! Parsed map documents.
//!
//! Objects live in an arena owned by the [`MapDocument`] and refer to
//! each other by [`ObjectId`]. An object placed directly on a tile has no
//! environment; an object inside another object's inventory points back
//! at its container.

// Object counts per map fit comfortably in u32
#![allow(clippy::cast_possible_truncation)]

use std::collections::BTreeMap;

use mapcheck_foundation::{AttributeRecord, Position, SourceId};

/// Index of an object in its document's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A concrete object placed on a map.
#[derive(Clone, Debug)]
pub struct ObjectInstance {
    /// Archetype name from the block-open line.
    pub archetype_name: String,
    /// Archetype defaults overlaid with the instance's own lines.
    pub attributes: AttributeRecord,
    /// Objects contained in this one, in file order.
    pub inventory: Vec<ObjectId>,
    /// The containing object, or `None` when placed on a tile.
    pub environment: Option<ObjectId>,
    /// An attribute outside the varying allow-list was set.
    pub modified_artifact: bool,
    /// An attribute was set to its archetype default.
    pub redundant_attribute: bool,
    /// The archetype name resolved in the catalog.
    pub resolved: bool,
}

impl ObjectInstance {
    /// Creates an instance seeded with `defaults`.
    #[must_use]
    pub fn new(archetype_name: impl Into<String>, defaults: AttributeRecord) -> Self {
        Self {
            archetype_name: archetype_name.into(),
            attributes: defaults,
            inventory: Vec::new(),
            environment: None,
            modified_artifact: false,
            redundant_attribute: false,
            resolved: false,
        }
    }

    /// The object's `type` number, if set.
    #[must_use]
    pub fn object_type(&self) -> Option<i64> {
        self.attributes.int("type")
    }

    /// Returns true if the object sits directly on a tile.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.environment.is_none()
    }

    /// The object's own x/y, defaulting missing coordinates to 0.
    #[must_use]
    pub fn own_position(&self) -> Position {
        Position::new(
            self.attributes.int("x").unwrap_or(0),
            self.attributes.int("y").unwrap_or(0),
        )
    }
}

/// A parsed map file.
#[derive(Clone, Debug)]
pub struct MapDocument {
    /// Where the map came from.
    pub source: SourceId,
    /// The `arch map` header block.
    pub header: AttributeRecord,
    objects: Vec<ObjectInstance>,
    tiles: BTreeMap<Position, Vec<ObjectId>>,
}

impl MapDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new(source: SourceId, header: AttributeRecord) -> Self {
        Self {
            source,
            header,
            objects: Vec::new(),
            tiles: BTreeMap::new(),
        }
    }

    /// Number of objects, including inventories.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Adds an object to the arena without placing it.
    pub fn allocate(&mut self, object: ObjectInstance) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    /// Places a root object on the tile given by its own x/y.
    pub fn place(&mut self, id: ObjectId) {
        let pos = self.objects[id.index()].own_position();
        self.tiles.entry(pos).or_default().push(id);
    }

    /// Appends `child` to `parent`'s inventory and links its environment.
    pub fn insert_into(&mut self, parent: ObjectId, child: ObjectId) {
        self.objects[child.index()].environment = Some(parent);
        self.objects[parent.index()].inventory.push(child);
    }

    /// Gets an object.
    ///
    /// # Panics
    /// Panics if the id did not come from this document.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> &ObjectInstance {
        &self.objects[id.index()]
    }

    /// Gets an object mutably.
    ///
    /// # Panics
    /// Panics if the id did not come from this document.
    pub fn object_mut(&mut self, id: ObjectId) -> &mut ObjectInstance {
        &mut self.objects[id.index()]
    }

    /// Walks environment links up to the object placed on the tile.
    #[must_use]
    pub fn root_of(&self, mut id: ObjectId) -> ObjectId {
        while let Some(env) = self.object(id).environment {
            id = env;
        }
        id
    }

    /// The tile position an object (or its outermost container) sits on.
    #[must_use]
    pub fn position_of(&self, id: ObjectId) -> Position {
        self.object(self.root_of(id)).own_position()
    }

    /// The direct container of an object, if any.
    #[must_use]
    pub fn parent(&self, id: ObjectId) -> Option<&ObjectInstance> {
        self.object(id).environment.map(|env| self.object(env))
    }

    /// Iterates over an object's inventory.
    pub fn inventory(&self, id: ObjectId) -> impl Iterator<Item = (ObjectId, &ObjectInstance)> {
        self.object(id)
            .inventory
            .iter()
            .map(move |&child| (child, self.object(child)))
    }

    /// Occupied tiles in x-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &[ObjectId])> {
        self.tiles.iter().map(|(pos, ids)| (*pos, ids.as_slice()))
    }

    /// Root objects on one tile.
    #[must_use]
    pub fn tile(&self, pos: Position) -> &[ObjectId] {
        self.tiles.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over every object in allocation order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &ObjectInstance)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }

    /// The header's `name` attribute, if it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.header.str("name")
    }

    /// Declared `(width, height)` when both are integers.
    #[must_use]
    pub fn dimensions(&self) -> Option<(i64, i64)> {
        Some((self.header.int("width")?, self.header.int("height")?))
    }
}
