//! Integration tests for Layer 3: Engine
//!
//! Whole maps and catalogs run through the parser and the rule engine.

mod header;
mod objects;
mod properties;
