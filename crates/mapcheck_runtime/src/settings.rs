//! User settings.
//!
//! Settings come from an embedded INI file layered with an optional user
//! file of the same shape:
//!
//! ```ini
//! [Suppress]
//! low = on
//!
//! [Errors]
//! map_no_music = on
//!
//! [Ignore]
//! ignore_events = off
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mapcheck_engine::{Category, RuleConfig};
use mapcheck_foundation::{Error, Result, Severity, SeverityFilter};
use serde::Deserialize;
use tracing::warn;

const DEFAULT_INI: &str = include_str!("../defaults/mapcheck.default.ini");

/// Name of the user settings file looked up in the working directory.
pub const USER_CONFIG_FILE: &str = "config.cfg";

/// Deserialized settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Severities hidden from output.
    #[serde(rename = "Suppress", alias = "suppress", default)]
    pub suppress: SuppressSettings,
    /// Optional check categories by name.
    #[serde(rename = "Errors", alias = "errors", default)]
    pub errors: BTreeMap<String, bool>,
    /// Scan exclusions.
    #[serde(rename = "Ignore", alias = "ignore", default)]
    pub ignore: IgnoreSettings,
}

/// The `[Suppress]` section.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct SuppressSettings {
    /// Hide warnings.
    #[serde(default)]
    pub warning: bool,
    /// Hide low severity.
    #[serde(default)]
    pub low: bool,
    /// Hide medium severity.
    #[serde(default)]
    pub medium: bool,
    /// Hide high severity.
    #[serde(default)]
    pub high: bool,
    /// Hide critical severity.
    #[serde(default)]
    pub critical: bool,
}

/// The `[Ignore]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IgnoreSettings {
    /// Skip directories named `events` during a scan.
    #[serde(default = "default_true")]
    pub ignore_events: bool,
}

impl Default for IgnoreSettings {
    fn default() -> Self {
        Self {
            ignore_events: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

impl Settings {
    /// The severity filter described by `[Suppress]`.
    #[must_use]
    pub fn severity_filter(&self) -> SeverityFilter {
        let s = self.suppress;
        SeverityFilter::none()
            .with(Severity::Warning, s.warning)
            .with(Severity::Low, s.low)
            .with(Severity::Medium, s.medium)
            .with(Severity::High, s.high)
            .with(Severity::Critical, s.critical)
    }

    /// The rule configuration described by `[Errors]` and `[Suppress]`.
    ///
    /// Unknown category names are logged and ignored.
    #[must_use]
    pub fn rule_config(&self) -> RuleConfig {
        let mut config = RuleConfig::new().with_suppress(self.severity_filter());
        for (name, &enabled) in &self.errors {
            match Category::from_name(name) {
                Some(category) => config.set(category, enabled),
                None => warn!(name = %name, "ignoring unknown check category"),
            }
        }
        config
    }
}

/// Layers setting sources over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Starts from the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_INI, FileFormat::Ini));
        Self { builder }
    }

    /// Adds a settings file that must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Ini)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Adds a settings file that is used only if it exists.
    #[must_use]
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Ini)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Overrides one key, e.g. `Errors.map_no_music`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the key is malformed.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value).map_err(config_error)?;
        Ok(self)
    }

    /// Merges every source and deserializes the result.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if a required file is missing or a value
    /// has the wrong shape.
    pub fn build(self) -> Result<Settings> {
        self.builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::needless_pass_by_value)]
fn config_error(err: ConfigError) -> Error {
    Error::config(err.to_string())
}

/// Loads the defaults layered with `config.cfg` from the working directory.
///
/// # Errors
///
/// Returns a `Config` error if `config.cfg` exists but cannot be parsed.
pub fn load_settings() -> Result<Settings> {
    Loader::new().with_optional_file(USER_CONFIG_FILE).build()
}
