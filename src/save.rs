//! Saving an edited store back to its repository.
//!
//! The editor works on a store decoded from some earlier text of the
//! resource (the base). When saving, the current remote text is fetched
//! first. If nobody else committed in the meantime the local store is
//! written as is; otherwise base, local and remote are merged and the
//! result is committed when the merge is clean. Conflicting merges are
//! handed back untouched so a user can pick a side for every conflict.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::codec::TextCodec;
use crate::error::{Result, TaxomergeError};
use crate::merge::{Conflict, MergePolicy, merge_with_policy};
use crate::repository::Repository;
use crate::resolve::{Side, apply_resolutions};
use crate::store::Store;

/// A merge that needs a decision before it can be committed.
#[derive(Debug, Clone)]
pub struct PendingMerge {
    pub conflicts: Vec<Conflict>,
    pub base_text: String,
    pub remote_text: String,
    pub merged: Store,
}

#[derive(Debug, Clone)]
pub enum SaveOutcome {
    /// A new version was committed; `auto_merged` tells whether remote
    /// changes had to be merged in first.
    Committed { auto_merged: bool },
    /// Nothing was committed.
    ConflictsPending(PendingMerge),
}

pub struct Saver<R, C> {
    repository: R,
    codec: C,
    policy: MergePolicy,
}

impl<R: Repository, C: TextCodec> Saver<R, C> {
    pub fn new(repository: R, codec: C) -> Self {
        Self::with_policy(repository, codec, MergePolicy::default())
    }
    pub fn with_policy(repository: R, codec: C, policy: MergePolicy) -> Self {
        Self {
            repository,
            codec,
            policy,
        }
    }
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn decode(&self, text: &str) -> Result<Store> {
        Ok(self.codec.decode(text)?.into_iter().collect())
    }

    /// Commits `local`, merging in whatever was committed since `base_text`.
    pub async fn attempt_save(
        &self,
        resource: &str,
        local: &Store,
        base_text: &str,
        message: &str,
    ) -> Result<SaveOutcome> {
        let remote_text = self.repository.fetch_current_text(resource).await?;
        if remote_text == base_text {
            let text = self.codec.encode(local.iter());
            self.repository.commit(resource, &text, message).await?;
            info!(resource, statements = local.len(), "saved");
            return Ok(SaveOutcome::Committed { auto_merged: false });
        }

        let base = self.decode(base_text)?;
        let remote = self.decode(&remote_text)?;
        let result = merge_with_policy(&base, local, &remote, &self.policy);
        if result.auto_merged {
            let text = self.codec.encode(result.merged.iter());
            let message = format!("{message} (auto-merged with remote changes)");
            self.repository.commit(resource, &text, &message).await?;
            info!(resource, statements = result.merged.len(), "saved after merging remote changes");
            return Ok(SaveOutcome::Committed { auto_merged: true });
        }

        warn!(resource, conflicts = result.conflicts.len(), "save blocked by conflicts");
        Ok(SaveOutcome::ConflictsPending(PendingMerge {
            conflicts: result.conflicts,
            base_text: base_text.to_string(),
            remote_text,
            merged: result.merged,
        }))
    }

    /// Commits a pending merge once every conflict has a chosen side.
    ///
    /// Fails with [`TaxomergeError::RemoteChanged`] when the remote moved
    /// on since the merge was computed; the caller then starts over with
    /// [`Saver::attempt_save`]. Returns the committed store.
    pub async fn commit_resolved(
        &self,
        resource: &str,
        pending: &PendingMerge,
        choices: &HashMap<usize, Side>,
        message: &str,
    ) -> Result<Store> {
        let resolved = apply_resolutions(&pending.merged, &pending.conflicts, choices)?;
        let remote_text = self.repository.fetch_current_text(resource).await?;
        if remote_text != pending.remote_text {
            return Err(TaxomergeError::RemoteChanged(resource.to_string()));
        }
        let text = self.codec.encode(resolved.iter());
        let message = format!("{message} (conflicts resolved)");
        self.repository.commit(resource, &text, &message).await?;
        info!(resource, conflicts = pending.conflicts.len(), "saved with resolved conflicts");
        Ok(resolved)
    }
}
