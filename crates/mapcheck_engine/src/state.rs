//! State that lives for one scan across many maps.

use std::collections::HashSet;

/// Names that must be unique across every map in a scan.
#[derive(Clone, Debug, Default)]
pub struct ScanState {
    beacons: HashSet<String>,
}

impl ScanState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a beacon name. Returns false if it was already seen.
    pub fn claim_beacon(&mut self, name: &str) -> bool {
        if self.beacons.contains(name) {
            return false;
        }
        self.beacons.insert(name.to_string());
        true
    }

    /// Number of beacon names seen.
    #[must_use]
    pub fn beacon_count(&self) -> usize {
        self.beacons.len()
    }

    /// Forgets everything, for a fresh scan.
    pub fn clear(&mut self) {
        self.beacons.clear();
    }
}
