//! Run states of the sync engine

use std::fmt;

use tracing::debug;

/// State of a sync run.
///
/// `Idle → ConfirmPending → Validating → Replacing → Converting →
/// RewritingManifest → Persisting → Done`, with `Aborted` reachable from
/// confirmation, validation and replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    ConfirmPending,
    Validating,
    Replacing,
    Converting { index: usize, total: usize },
    RewritingManifest,
    Persisting,
    Done,
    Aborted,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ConfirmPending => write!(f, "confirm-pending"),
            Self::Validating => write!(f, "validating"),
            Self::Replacing => write!(f, "replacing"),
            Self::Converting { index, total } => write!(f, "converting {}/{}", index + 1, total),
            Self::RewritingManifest => write!(f, "rewriting-manifest"),
            Self::Persisting => write!(f, "persisting"),
            Self::Done => write!(f, "done"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Ordered record of the states a run passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateLog {
    states: Vec<SyncState>,
}

impl StateLog {
    pub(crate) fn new() -> Self {
        Self {
            states: vec![SyncState::Idle],
        }
    }

    pub(crate) fn enter(&mut self, state: SyncState) {
        debug!(%state, "Sync state");
        self.states.push(state);
    }

    pub(crate) fn into_states(self) -> Vec<SyncState> {
        self.states
    }
}
