//! Applying a user's choices to the conflicts of a merge.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TaxomergeError};
use crate::merge::Conflict;
use crate::store::Store;

/// The side whose statements win a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Local,
    Remote,
}

/// Returns a copy of `merged` where, for every conflict, the statements of
/// its (subject, predicate) are exactly those of the chosen side.
///
/// `choices` maps conflict indexes to sides and must cover every conflict.
pub fn apply_resolutions(
    merged: &Store,
    conflicts: &[Conflict],
    choices: &HashMap<usize, Side>,
) -> Result<Store> {
    let missing: Vec<usize> = (0..conflicts.len())
        .filter(|i| !choices.contains_key(i))
        .collect();
    if !missing.is_empty() {
        return Err(TaxomergeError::UnresolvedConflicts { missing });
    }
    let mut resolved = merged.clone();
    for (i, conflict) in conflicts.iter().enumerate() {
        let Some(&side) = choices.get(&i) else {
            continue;
        };
        let stale: Vec<_> = resolved
            .matching(Some(&conflict.subject), Some(&conflict.predicate), None, None)
            .cloned()
            .collect();
        for statement in &stale {
            resolved.remove(statement);
        }
        let chosen = match side {
            Side::Local => &conflict.local_statements,
            Side::Remote => &conflict.remote_statements,
        };
        resolved.extend(chosen.iter().cloned());
        debug!(conflict = i, side = ?side, subject = %conflict.subject, "resolved");
    }
    Ok(resolved)
}
