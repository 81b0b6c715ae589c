//! Attribute records.
//!
//! Every parsed entity (map header, object instance, archetype, artifact,
//! region) is an [`AttributeRecord`]. Records are backed by `im`'s
//! persistent ordered map, so seeding an instance with its archetype's
//! defaults is an O(1) copy that shares structure with the catalog.

use std::fmt;
use std::iter::FromIterator;

use crate::value::Value;

/// A mapping from attribute name to [`Value`].
///
/// Names are unique; setting a name that is already present replaces its
/// value. Iteration is ordered by name.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AttributeRecord(im::OrdMap<String, Value>);

impl AttributeRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self(im::OrdMap::new())
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns true if the attribute is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Gets an integer value by name.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// Gets a string value by name.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns true if the attribute is exactly `1`.
    ///
    /// Boolean flags in the format are written as `name 1`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.int(name) == Some(1)
    }

    /// Returns true if the attribute is set to a truthy value.
    #[must_use]
    pub fn truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_truthy)
    }

    /// Returns the attribute rendered as text, if set.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }

    /// Sets an attribute, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Removes an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Returns a record with `self` overlaid on `defaults`.
    ///
    /// Attributes present in `self` win.
    #[must_use]
    pub fn overlaid_on(&self, defaults: &Self) -> Self {
        Self(self.0.clone().union(defaults.0.clone()))
    }

    /// Iterates over `(name, value)` pairs, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over attribute names starting with `prefix`.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.iter().filter(move |(k, _)| k.starts_with(prefix))
    }
}

impl fmt::Debug for AttributeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AttributeRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AttributeRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
