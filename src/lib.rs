//! mapcheck - Validator for block-structured map, archetype, artifact and
//! region files.
//!
//! This crate re-exports all layers of the mapcheck system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: mapcheck_runtime    - Settings, scanning, reporting, CLI
//! Layer 3: mapcheck_engine     - Rule engine over maps and catalogs
//! Layer 2: mapcheck_parser     - Tokenizer, tree builder, catalog parsing
//! Layer 1: mapcheck_storage    - Map documents and the catalog index
//! Layer 0: mapcheck_foundation - Values, records, diagnostics, errors
//! ```

pub use mapcheck_engine as engine;
pub use mapcheck_foundation as foundation;
pub use mapcheck_parser as parser;
pub use mapcheck_runtime as runtime;
pub use mapcheck_storage as storage;
