//! SyncEngine for converting packs between data form and source form
//!
//! This module provides:
//! - **direction**: the per-direction rules table (extract, compile, legacy extract)
//! - **engine**: the shared run state machine
//! - **report**: per-pack outcomes of a run
//! - **state**: the states a run passes through

mod direction;
mod engine;
mod report;
mod state;

pub use direction::{CodecOperation, Direction, DirectionRules, PackSource};
pub use engine::{SyncEngine, SyncOptions};
pub use report::{PackOutcome, PackReport, SyncOutcome, SyncReport};
pub use state::SyncState;
