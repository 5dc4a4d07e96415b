//! Reports produced by sync runs

use pack_fs::NormalizedPath;

use super::{Direction, SyncState};

/// What happened to one pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
    /// Converted; carries the record count the codec reported
    Converted { records: usize },
    /// Not attempted: unresolvable type, wrong file kind or unsafe name
    Skipped { reason: String },
    /// The codec (or per-pack directory creation) failed
    Failed { error: String },
}

/// Outcome of one pack within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    pub name: String,
    pub outcome: PackOutcome,
}

impl PackReport {
    pub fn is_converted(&self) -> bool {
        matches!(self.outcome, PackOutcome::Converted { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, PackOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, PackOutcome::Failed { .. })
    }
}

/// Report of a completed run, packs listed in manifest (or entry) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub direction: Direction,
    pub source_root: NormalizedPath,
    pub target_root: NormalizedPath,
    pub packs: Vec<PackReport>,
    /// Manifest written at the end of the run, if the direction writes one
    pub manifest_written: Option<NormalizedPath>,
    pub states: Vec<SyncState>,
}

impl SyncReport {
    pub fn converted(&self) -> impl Iterator<Item = &PackReport> {
        self.packs.iter().filter(|p| p.is_converted())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &PackReport> {
        self.packs.iter().filter(|p| p.is_skipped())
    }

    pub fn failed(&self) -> impl Iterator<Item = &PackReport> {
        self.packs.iter().filter(|p| p.is_failed())
    }

    pub fn pack(&self, name: &str) -> Option<&PackReport> {
        self.packs.iter().find(|p| p.name == name)
    }

    /// A run succeeds when no pack failed; `strict` also fails on skips.
    pub fn success(&self, strict: bool) -> bool {
        self.failed().next().is_none() && (!strict || self.skipped().next().is_none())
    }
}

/// Result of [`SyncEngine::run`](super::SyncEngine::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The user declined the confirmation prompt; nothing was touched
    Cancelled,
    Completed(SyncReport),
}

impl SyncOutcome {
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Cancelled => None,
            Self::Completed(report) => Some(report),
        }
    }
}
