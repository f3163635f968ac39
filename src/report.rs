//! Structured result of an organize run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What happened to a single directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// The entry was moved into its extension folder.
    Moved {
        from: PathBuf,
        to: PathBuf,
        folder: String,
    },
    /// Dry run: the entry would have been moved.
    WouldMove {
        from: PathBuf,
        to: PathBuf,
        folder: String,
    },
    /// A same-named entry already exists in the destination folder.
    Conflict { path: PathBuf, existing: PathBuf },
    /// The entry could not be moved.
    Failed { path: PathBuf, reason: String },
    /// The entry was deliberately left in place.
    Skipped { path: PathBuf, reason: String },
}

impl EntryOutcome {
    /// Path of the entry in the target directory.
    pub fn source(&self) -> &PathBuf {
        match self {
            Self::Moved { from, .. } | Self::WouldMove { from, .. } => from,
            Self::Conflict { path, .. } | Self::Failed { path, .. } | Self::Skipped { path, .. } => {
                path
            }
        }
    }
}

/// Outcome of organizing one directory.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    /// The directory that was organized.
    pub base_path: PathBuf,
    /// Whether the run was a preview.
    pub dry_run: bool,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// One outcome per entry, in listing order.
    pub entries: Vec<EntryOutcome>,
}

impl OrganizeReport {
    pub(crate) fn new(base_path: PathBuf, dry_run: bool) -> Self {
        Self {
            base_path,
            dry_run,
            finished_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: EntryOutcome) {
        self.entries.push(outcome);
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// Number of entries moved (or that would be moved in a dry run).
    pub fn moved(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Moved { .. } | EntryOutcome::WouldMove { .. }))
            .count()
    }

    /// Number of entries left in place because of a name conflict.
    pub fn conflicts(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Conflict { .. }))
            .count()
    }

    /// Number of entries that failed to move.
    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Failed { .. }))
            .count()
    }

    /// Number of entries skipped by filters or entry kind.
    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Skipped { .. }))
            .count()
    }

    /// Returns true if no entry failed. Conflicts do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Moved entries per destination folder, sorted by folder name.
    pub fn counts_by_folder(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            if let EntryOutcome::Moved { folder, .. } | EntryOutcome::WouldMove { folder, .. } =
                entry
            {
                *counts.entry(folder.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}
