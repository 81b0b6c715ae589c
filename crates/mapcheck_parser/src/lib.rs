//! Parsing for map and catalog files.
//!
//! # Architecture
//!
//! ```text
//! file text
//!     │
//!     ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → BlockOpen / Attribute / TextBlock* / BlockClose
//! └─────────────────┘
//!     │                     │
//!     ▼                     ▼
//! ┌─────────────────┐  ┌─────────────────┐
//! │ MAP BUILDER     │  │ CATALOG PARSER  │
//! │ (nested tree)   │  │ (flat records)  │
//! └─────────────────┘  └─────────────────┘
//!     │                     │
//!     ▼                     ▼
//!  MapDocument           Catalog
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`] - Line classification for the four grammars
//! - [`builder`] - Map object tree construction
//! - [`catalog`] - Archetype, artifact and region tables
//! - [`writer`] - Rendering records back to block text

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod catalog;
pub mod tokenizer;
pub mod writer;

pub use builder::{DEFAULT_VARYING_ATTRIBUTES, MapBuilder};
pub use catalog::{parse_archetypes, parse_artifacts, parse_regions};
pub use tokenizer::{BlockTokenizer, Event, EventKind, Grammar};
pub use writer::{format_attribute, write_block};
