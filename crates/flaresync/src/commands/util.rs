//! Shared helpers for command handlers.

use std::io::IsTerminal;

use flaresync_core::{ALL_RECORD_TYPES, RecordType};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, the answer is "no".
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Parse `--type` values. Empty means "not given"; `all` expands to every
/// supported type.
pub fn parse_types(raw: &[String]) -> Result<Option<Vec<RecordType>>, CliError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.iter().any(|t| t.trim().eq_ignore_ascii_case("all")) {
        return Ok(Some(ALL_RECORD_TYPES.to_vec()));
    }

    let mut types = Vec::with_capacity(raw.len());
    for t in raw {
        let parsed = RecordType::from(t.as_str());
        if parsed.is_empty() {
            return Err(CliError::Validation {
                field: "type".into(),
                reason: "record type cannot be empty".into(),
            });
        }
        if !types.contains(&parsed) {
            types.push(parsed);
        }
    }
    Ok(Some(types))
}
