//! Where taxonomy documents live between edits.
//!
//! A [`Repository`] hands out the current text of a resource and accepts new
//! versions of it together with a commit message. Failures are reported to
//! the caller as they happen; nothing here retries.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Result, TaxomergeError};

#[async_trait]
pub trait Repository: Send + Sync {
    /// The current text of `resource`.
    async fn fetch_current_text(&self, resource: &str) -> Result<String>;
    /// Stores `text` as the new version of `resource`.
    async fn commit(&self, resource: &str, text: &str, message: &str) -> Result<()>;
}

// ------------- Files -------------
/// Resources are files below a root directory.
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    fn path(&self, resource: &str) -> Result<PathBuf> {
        let relative = Path::new(resource);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(TaxomergeError::NotFound(format!(
                "{resource} is not a resource below {}",
                self.root.display()
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn fetch_current_text(&self, resource: &str) -> Result<String> {
        let path = self.path(resource)?;
        debug!(path = %path.display(), "fetching");
        Ok(tokio::fs::read_to_string(&path).await?)
    }

    async fn commit(&self, resource: &str, text: &str, message: &str) -> Result<()> {
        let path = self.path(resource)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TaxomergeError::Commit(e.to_string()))?;
        }
        // written next to the resource, then moved over it in one step
        let staged = staging_path(&path);
        let written = match tokio::fs::write(&staged, text).await {
            Ok(()) => tokio::fs::rename(&staged, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(TaxomergeError::Commit(e.to_string()));
        }
        info!(resource, message, bytes = text.len(), "committed");
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".staged");
    path.with_file_name(name)
}

// ------------- Memory -------------
/// One accepted commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub resource: String,
    pub message: String,
    pub text: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Versions {
    texts: HashMap<String, String>,
    commits: Vec<CommitRecord>,
    refuse_commits: bool,
}

/// Keeps every resource in memory. Other writers can be simulated with
/// [`MemoryRepository::put`], which changes a text without a commit.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    versions: Mutex<Versions>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
    pub async fn put(&self, resource: impl Into<String>, text: impl Into<String>) {
        self.versions.lock().await.texts.insert(resource.into(), text.into());
    }
    pub async fn text(&self, resource: &str) -> Option<String> {
        self.versions.lock().await.texts.get(resource).cloned()
    }
    /// Every accepted commit, oldest first.
    pub async fn commits(&self) -> Vec<CommitRecord> {
        self.versions.lock().await.commits.clone()
    }
    /// Makes later commits fail until called again with `false`.
    pub async fn refuse_commits(&self, refuse: bool) {
        self.versions.lock().await.refuse_commits = refuse;
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn fetch_current_text(&self, resource: &str) -> Result<String> {
        self.text(resource)
            .await
            .ok_or_else(|| TaxomergeError::NotFound(resource.to_string()))
    }

    async fn commit(&self, resource: &str, text: &str, message: &str) -> Result<()> {
        let mut versions = self.versions.lock().await;
        if versions.refuse_commits {
            return Err(TaxomergeError::Commit(format!("{resource}: commits are refused")));
        }
        versions.texts.insert(resource.to_string(), text.to_string());
        versions.commits.push(CommitRecord {
            resource: resource.to_string(),
            message: message.to_string(),
            text: text.to_string(),
            at: Utc::now(),
        });
        debug!(resource, message, "committed in memory");
        Ok(())
    }
}
