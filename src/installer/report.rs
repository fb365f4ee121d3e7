//! Pending-update and status reports
//!
//! Both reports keep updaters in the order the manager visited them. Version
//! maps are ordered numerically and serialize with string keys, e.g.
//! `{"Foo": {"-1": "Installation", "1": "add table"}}`.

use crate::database::UNINSTALLED;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Description of the pseudo-update standing for an updater's installation
pub const INSTALLATION: &str = "Installation";

/// Pending updates per updater: version to description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PendingUpdates(IndexMap<String, BTreeMap<i64, String>>);

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pending entry for an updater
    pub fn push(&mut self, updater: &str, version: i64, description: impl Into<String>) {
        self.0
            .entry(updater.to_string())
            .or_default()
            .insert(version, description.into());
    }

    /// Pending versions of one updater; `None` when nothing is pending
    pub fn get(&self, updater: &str) -> Option<&BTreeMap<i64, String>> {
        self.0.get(updater)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<i64, String>)> {
        self.0.iter()
    }

    /// Number of updaters with pending work
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten into table rows, naming the updater on its first row only
    pub fn rows(&self) -> Vec<PendingRow> {
        let mut rows = Vec::new();
        for (name, updates) in &self.0 {
            for (i, (version, description)) in updates.iter().enumerate() {
                rows.push(PendingRow {
                    updater: if i == 0 { name.clone() } else { String::new() },
                    pending: version.to_string(),
                    description: description.clone(),
                });
            }
        }
        rows
    }
}

/// One row of the pending-updates table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct PendingRow {
    #[cfg_attr(feature = "display", tabled(rename = "Updater"))]
    pub updater: String,
    #[cfg_attr(feature = "display", tabled(rename = "Pending"))]
    pub pending: String,
    #[cfg_attr(feature = "display", tabled(rename = "Description"))]
    pub description: String,
}

/// Installation state derived from an updater's status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdaterState {
    NotInstalled,
    UpdatesPending,
    UpToDate,
}

impl fmt::Display for UpdaterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdaterState::NotInstalled => write!(f, "not installed"),
            UpdaterState::UpdatesPending => write!(f, "updates pending"),
            UpdaterState::UpToDate => write!(f, "up to date"),
        }
    }
}

/// Current version and number of pending updates of one updater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdaterStatus {
    pub version: i64,
    pub missing: usize,
}

impl UpdaterStatus {
    pub fn new(version: i64, missing: usize) -> Self {
        Self { version, missing }
    }

    pub fn state(&self) -> UpdaterState {
        if self.version == UNINSTALLED {
            UpdaterState::NotInstalled
        } else if self.missing > 0 {
            UpdaterState::UpdatesPending
        } else {
            UpdaterState::UpToDate
        }
    }
}

/// Status of every registered updater
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusReport(IndexMap<String, UpdaterStatus>);

impl StatusReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, updater: &str, status: UpdaterStatus) {
        self.0.insert(updater.to_string(), status);
    }

    pub fn get(&self, updater: &str) -> Option<&UpdaterStatus> {
        self.0.get(updater)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UpdaterStatus)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rows(&self) -> Vec<StatusRow> {
        self.0
            .iter()
            .map(|(name, status)| StatusRow {
                updater: name.clone(),
                status: status.state().to_string(),
                version: status.version,
                missing: status.missing,
            })
            .collect()
    }
}

/// One row of the updater status table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct StatusRow {
    #[cfg_attr(feature = "display", tabled(rename = "Updater"))]
    pub updater: String,
    #[cfg_attr(feature = "display", tabled(rename = "Status"))]
    pub status: String,
    #[cfg_attr(feature = "display", tabled(rename = "Version"))]
    pub version: i64,
    #[cfg_attr(feature = "display", tabled(rename = "Missing"))]
    pub missing: usize,
}
