//! Catalog index and map document storage for mapcheck.
//!
//! This crate provides:
//! - [`Catalog`] - A name-keyed table of attribute records
//! - [`CatalogIndex`] - Archetypes, artifacts and regions for lookup
//! - [`MapDocument`] - A parsed map: header, object arena and tile grid
//! - [`ObjectInstance`] - A placed object with inventory and environment

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod document;

pub use catalog::{Catalog, CatalogIndex};
pub use document::{MapDocument, ObjectId, ObjectInstance};
