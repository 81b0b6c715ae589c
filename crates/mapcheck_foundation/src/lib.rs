//! Core values, attribute records, diagnostics and errors for mapcheck.
//!
//! This crate provides:
//! - [`Value`] - An attribute value (integer or string)
//! - [`AttributeRecord`] - Name to value mapping with cheap copies
//! - [`Diagnostic`] and [`DiagnosticAggregator`] - Grouped validation output
//! - [`Severity`] and [`SeverityFilter`] - Ordered severities and suppression
//! - [`Error`] - Error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diagnostic;
pub mod error;
pub mod record;
pub mod value;

pub use diagnostic::{
    Diagnostic, DiagnosticAggregator, DiagnosticGroup, Position, Severity, SeverityFilter,
    SourceId,
};
pub use error::{Error, ErrorContext, ErrorKind};
pub use record::AttributeRecord;
pub use value::Value;

/// Result type for mapcheck operations.
pub type Result<T> = std::result::Result<T, Error>;
