//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user to confirm discarding records with absent attribute values
pub fn confirm_drop_records(record_count: usize, total: usize) -> Result<bool> {
    let message = format!(
        "Drop {} of {} record(s) with missing attribute values?",
        record_count, total
    );
    confirm_step(&message)
}
