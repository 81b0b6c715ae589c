//! Validation rules for maps and catalogs.
//!
//! This crate provides:
//! - [`Validator`] - Runs the rule lists over a map or the catalogs
//! - [`RuleConfig`] and [`Category`] - Switchable checks and suppression
//! - [`ScanState`] - Uniqueness tracking across one scan
//! - [`RuleSink`] - Where rules write their diagnostics
//! - [`MessageIssues`] - Dialog and message text checks

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod message;
pub mod rules;
pub mod sink;
pub mod state;
pub mod types;
pub mod validator;

pub use config::{Category, RuleConfig};
pub use message::MessageIssues;
pub use sink::RuleSink;
pub use state::ScanState;
pub use validator::Validator;
