//! Label admission rules.
//!
//! The external system accepts colliding labels without complaint, and once
//! two spaces share a label there is no way to tell which one a label
//! selector will pick. Uniqueness therefore has to be enforced here, before
//! the relabel command is sent. This module is the only enforcement point.

use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::space::all_spaces;

/// Selector keywords that can never be used as labels.
pub const RESERVED_LABELS: [&str; 6] = ["prev", "next", "first", "last", "recent", "mouse"];

/// Check the parts of label validity that need no live state.
///
/// Comparison happens on the trimmed, lowercased form; the label is applied
/// as given.
pub fn validate_label_syntax(label: &str) -> Result<()> {
    let candidate = label.trim().to_lowercase();
    if candidate.is_empty() {
        return Err(Error::InvalidLabel("label cannot be empty".to_string()));
    }
    if RESERVED_LABELS.contains(&candidate.as_str()) {
        return Err(Error::InvalidLabel(format!(
            "'{candidate}' is a reserved selector keyword"
        )));
    }
    if candidate.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidLabel(format!(
            "'{candidate}' would collide with index selectors"
        )));
    }
    Ok(())
}

/// Check that `label` may be applied to a space.
///
/// On top of the syntax rules, the label must not already be held by a live
/// space other than `relabeling` (pass the id of the space about to be
/// relabeled so keeping its current label is allowed). Violations fail with
/// `InvalidLabel` before any mutation is sent.
pub fn check_label(gw: &dyn Gateway, label: &str, relabeling: Option<u64>) -> Result<()> {
    validate_label_syntax(label)?;
    let candidate = label.trim().to_lowercase();
    let holder = all_spaces(gw)?
        .into_iter()
        .find(|p| p.label.to_lowercase() == candidate && Some(p.id) != relabeling);
    if let Some(holder) = holder {
        return Err(Error::InvalidLabel(format!(
            "'{label}' is already held by space {}",
            holder.id
        )));
    }
    Ok(())
}
