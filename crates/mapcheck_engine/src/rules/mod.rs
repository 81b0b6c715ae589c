//! Rule lists.
//!
//! Each list is an ordered slice of `(name, rule)` pairs. The validator
//! runs them in order, so diagnostic order is stable.

pub mod catalog;
pub mod header;
pub mod object;
pub mod tile;

pub use catalog::{CATALOG_RULES, CatalogCheck, CatalogRule};
pub use header::{HEADER_RULES, HeaderCheck, HeaderRule};
pub use object::{OBJECT_RULES, ObjectCheck, ObjectRule};
pub use tile::{TILE_RULES, TileCheck, TileRule, TileSummary};
