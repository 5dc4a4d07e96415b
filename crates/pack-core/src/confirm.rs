//! Confirmation seam for destructive runs
//!
//! The engine never prompts on its own: callers hand it a [`Confirm`]
//! implementation, so tests and unattended runs need no terminal.

use crate::Result;

/// Asks the user whether a destructive run may proceed.
pub trait Confirm {
    /// Returns `Ok(false)` when the user declines.
    fn ask(&self, message: &str) -> Result<bool>;
}

/// Accepts every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn ask(&self, _message: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Declines every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Decline;

impl Confirm for Decline {
    fn ask(&self, _message: &str) -> Result<bool> {
        Ok(false)
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn ask(&self, message: &str) -> Result<bool> {
        Ok(self(message))
    }
}
