//! Scanning, configuration, reporting and CLI for mapcheck.
//!
//! This crate provides:
//! - [`Session`] - Catalog loading, map checking and rescans
//! - [`settings`] - INI settings layered over built-in defaults
//! - [`scan`] - Map directory discovery
//! - [`report`] - Text, JSON and report-file output
//! - [`locate`] - Finding the `.arc`/`.art` file behind a definition

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod locate;
pub mod report;
pub mod scan;
pub mod session;
pub mod settings;

pub use locate::{DefinitionKind, find_definition, locate};
pub use report::{TextOptions, write_json, write_report_file, write_text};
pub use scan::{ScanOptions, candidate_files};
pub use session::{Session, SessionPaths};
pub use settings::{Loader, Settings, load_settings};
