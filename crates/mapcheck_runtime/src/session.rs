//! A checking session.
//!
//! The session owns the catalogs, the rule configuration and everything
//! accumulated over a scan. Catalogs are loaded once up front; maps can
//! then be checked one at a time or by scanning the maps directory, and
//! the scan can be repeated without reloading.

use std::fs;
use std::path::{Path, PathBuf};

use mapcheck_engine::{RuleConfig, ScanState, Validator};
use mapcheck_foundation::{DiagnosticAggregator, Error, Result, SourceId};
use mapcheck_parser::{MapBuilder, parse_archetypes, parse_artifacts, parse_regions};
use mapcheck_storage::CatalogIndex;
use tracing::{debug, info, warn};

use crate::scan::{ScanOptions, candidate_files};

/// File name of the archetypes catalog inside the arch directory.
pub const ARCHETYPES_FILE: &str = "archetypes";
/// File name of the artifacts catalog inside the arch directory.
pub const ARTIFACTS_FILE: &str = "artifacts";

/// Where a session finds its inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionPaths {
    /// Root of the maps tree.
    pub maps: PathBuf,
    /// Directory holding the `archetypes` and `artifacts` files.
    pub arch: PathBuf,
    /// The regions catalog.
    pub regions: PathBuf,
}

impl Default for SessionPaths {
    fn default() -> Self {
        Self {
            maps: PathBuf::from("../../maps"),
            arch: PathBuf::from("../../arch"),
            regions: PathBuf::from("../../maps/regions.reg"),
        }
    }
}

impl SessionPaths {
    /// Paths with the given maps root and the regions file inside it.
    #[must_use]
    pub fn new(maps: impl Into<PathBuf>, arch: impl Into<PathBuf>) -> Self {
        let maps = maps.into();
        let regions = maps.join("regions.reg");
        Self {
            maps,
            arch: arch.into(),
            regions,
        }
    }

    /// Overrides the regions file.
    #[must_use]
    pub fn with_regions(mut self, regions: impl Into<PathBuf>) -> Self {
        self.regions = regions.into();
        self
    }
}

/// Catalogs, configuration and accumulated results.
pub struct Session {
    paths: SessionPaths,
    config: RuleConfig,
    options: ScanOptions,
    catalog: CatalogIndex,
    scan: ScanState,
    diagnostics: DiagnosticAggregator,
}

impl Session {
    /// Loads the catalogs and checks their definitions.
    ///
    /// Event script paths are resolved against the maps root unless the
    /// configuration names another directory.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if a catalog file cannot be read.
    pub fn open(paths: SessionPaths, mut config: RuleConfig, options: ScanOptions) -> Result<Self> {
        if config.script_root.is_none() {
            config.script_root = Some(paths.maps.clone());
        }
        let mut session = Self {
            paths,
            config,
            options,
            catalog: CatalogIndex::default(),
            scan: ScanState::new(),
            diagnostics: DiagnosticAggregator::new(),
        };
        session.reload_catalogs()?;
        Ok(session)
    }

    /// Re-reads all three catalogs and re-runs the catalog rules.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if a catalog file cannot be read. The old
    /// catalogs are kept in that case.
    pub fn reload_catalogs(&mut self) -> Result<()> {
        let archetypes_text = read_catalog(&self.paths.arch.join(ARCHETYPES_FILE))?;
        let artifacts_text = read_catalog(&self.paths.arch.join(ARTIFACTS_FILE))?;
        let regions_text = read_catalog(&self.paths.regions)?;

        for source in [SourceId::Archetypes, SourceId::Artifacts, SourceId::Regions] {
            self.diagnostics.clear_catalog(&source);
        }

        let archetypes = parse_archetypes(&archetypes_text, &mut self.diagnostics);
        let artifacts = parse_artifacts(&artifacts_text, &archetypes, &mut self.diagnostics);
        let regions = parse_regions(&regions_text, &mut self.diagnostics);
        info!(
            archetypes = archetypes.len(),
            artifacts = artifacts.len(),
            regions = regions.len(),
            "loaded catalogs"
        );
        self.catalog = CatalogIndex::new(archetypes, artifacts, regions);

        Validator::new(&self.catalog, &self.config).validate_catalogs(&mut self.diagnostics);
        Ok(())
    }

    /// Checks one file.
    ///
    /// Returns false if the file is not a map.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the file cannot be read.
    pub fn check_file(&mut self, path: &Path) -> Result<bool> {
        let bytes = fs::read(path).map_err(|err| Error::io(path, &err))?;
        let text = String::from_utf8_lossy(&bytes);
        let source = self.source_id(path);

        let builder = MapBuilder::new(&self.catalog);
        let doc = match builder.build(source, &text, &mut self.diagnostics) {
            Ok(doc) => doc,
            Err(err) if err.is_recoverable() => {
                let line = err.context.as_ref().and_then(|ctx| ctx.line).unwrap_or(0);
                debug!(path = %path.display(), line, reason = %err, "not a map");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        Validator::new(&self.catalog, &self.config).validate_map(
            &doc,
            &mut self.scan,
            &mut self.diagnostics,
        );
        Ok(true)
    }

    /// Checks every map under the maps root. Returns the number of maps
    /// checked; unreadable files are logged and skipped.
    pub fn scan(&mut self) -> usize {
        let root = self.paths.maps.clone();
        info!(root = %root.display(), "scanning maps");

        let mut checked = 0;
        for path in candidate_files(&root, self.options) {
            match self.check_file(&path) {
                Ok(true) => checked += 1,
                Ok(false) => {}
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable file"),
            }
        }
        info!(maps = checked, diagnostics = self.diagnostics.len(), "scan complete");
        checked
    }

    /// Forgets map results and beacon names, then scans again.
    pub fn rescan(&mut self) -> usize {
        self.clear_maps();
        self.scan()
    }

    /// Forgets map results and beacon names, keeping catalog results.
    pub fn clear_maps(&mut self) {
        self.diagnostics.clear_maps();
        self.scan.clear();
    }

    /// Everything recorded so far.
    #[must_use]
    pub const fn diagnostics(&self) -> &DiagnosticAggregator {
        &self.diagnostics
    }

    /// The loaded catalogs.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    /// The rule configuration.
    #[must_use]
    pub const fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// The input paths.
    #[must_use]
    pub const fn paths(&self) -> &SessionPaths {
        &self.paths
    }

    /// Source id for a map: its path below the maps root with a leading
    /// `/`, or the path as given when it lies elsewhere.
    fn source_id(&self, path: &Path) -> SourceId {
        let Ok(relative) = path.strip_prefix(&self.paths.maps) else {
            return SourceId::map(&path.to_string_lossy());
        };
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        SourceId::map(&format!("/{}", parts.join("/")))
    }
}

fn read_catalog(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| Error::io(path, &err))
}
