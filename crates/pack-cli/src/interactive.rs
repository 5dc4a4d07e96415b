//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for the confirmation shown before a destructive run.

use dialoguer::Confirm as Prompt;

/// Terminal confirmation backed by dialoguer; defaults to "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerConfirm;

impl pack_core::Confirm for DialoguerConfirm {
    fn ask(&self, message: &str) -> pack_core::Result<bool> {
        Prompt::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| pack_core::Error::Prompt {
                message: e.to_string(),
            })
    }
}
