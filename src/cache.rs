//! The process-wide taxonomy used for browsing.
//!
//! Loading a taxonomy means reading and decoding every configured file, so
//! it is done once and shared. [`StoreCache`] coordinates concurrent callers
//! with a small state machine: the first caller to find the cache empty
//! starts a load task, every caller (the first included) waits on a oneshot
//! channel, and all of them receive the same `Arc` when the task finishes.
//! A failed load is handed to every waiter and leaves the cache empty, so
//! the next call tries again.
//!
//! The load runs in its own task, so a caller that gives up waiting does not
//! leave the cache stuck in the loading state.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use crate::codec::TextCodec;
use crate::error::{Result, TaxomergeError};
use crate::store::Store;

/// Produces a fresh store, typically by reading files.
#[async_trait]
pub trait StoreLoader: Send + Sync {
    async fn load(&self) -> Result<Store>;
}

// ------------- Directory loader -------------
/// Reads the configured statement files from one directory.
///
/// Missing files are skipped with a warning; unreadable or malformed ones
/// fail the whole load.
#[derive(Debug, Clone)]
pub struct DirectoryLoader<C> {
    data_dir: PathBuf,
    files: Vec<String>,
    codec: C,
}

impl<C: TextCodec> DirectoryLoader<C> {
    pub fn new(data_dir: impl Into<PathBuf>, files: Vec<String>, codec: C) -> Self {
        Self {
            data_dir: data_dir.into(),
            files,
            codec,
        }
    }
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

#[async_trait]
impl<C: TextCodec + Send + Sync> StoreLoader for DirectoryLoader<C> {
    async fn load(&self) -> Result<Store> {
        info!(data_dir = %self.data_dir.display(), "loading taxonomy");
        let mut store = Store::new();
        for file in &self.files {
            let path = self.data_dir.join(file);
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), "file not found, skipping");
                    continue;
                }
                Err(e) => return Err(TaxomergeError::Load(format!("{}: {e}", path.display()))),
            };
            let statements = self
                .codec
                .decode(&text)
                .map_err(|e| TaxomergeError::Load(format!("{}: {e}", path.display())))?;
            debug!(file, statements = statements.len(), "parsed");
            store.extend(statements);
        }
        info!(size = store.len(), "taxonomy loaded");
        Ok(store)
    }
}

// ------------- Cache -------------
/// A loaded store and when it was loaded.
#[derive(Debug)]
pub struct Taxonomy {
    pub store: Store,
    pub loaded_at: DateTime<Utc>,
}

impl Taxonomy {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            loaded_at: Utc::now(),
        }
    }
}

type Waiter = oneshot::Sender<Result<Arc<Taxonomy>>>;

enum LoadState {
    Empty,
    Loading { generation: u64, waiters: Vec<Waiter> },
    Ready(Arc<Taxonomy>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
}

pub struct StoreCache<L> {
    loader: Arc<L>,
    state: Arc<Mutex<LoadState>>,
    generations: AtomicU64,
}

impl<L: StoreLoader + 'static> StoreCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            state: Arc::new(Mutex::new(LoadState::Empty)),
            generations: AtomicU64::new(0),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The cached taxonomy, loading it first if necessary.
    pub async fn get(&self) -> Result<Arc<Taxonomy>> {
        loop {
            let waiting = {
                let mut state = self.state.lock().await;
                match &mut *state {
                    LoadState::Ready(taxonomy) => return Ok(Arc::clone(taxonomy)),
                    LoadState::Loading { waiters, .. } => {
                        let (tx, rx) = oneshot::channel();
                        waiters.push(tx);
                        rx
                    }
                    LoadState::Empty => {
                        let (tx, rx) = oneshot::channel();
                        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
                        *state = LoadState::Loading {
                            generation,
                            waiters: vec![tx],
                        };
                        self.spawn_load(generation);
                        rx
                    }
                }
            };
            match waiting.await {
                Ok(result) => return result,
                // the cache was invalidated while loading
                Err(_) => debug!("load abandoned, starting over"),
            }
        }
    }

    /// The cached taxonomy if one is ready; never starts a load.
    pub async fn current(&self) -> Option<Arc<Taxonomy>> {
        match &*self.state.lock().await {
            LoadState::Ready(taxonomy) => Some(Arc::clone(taxonomy)),
            _ => None,
        }
    }

    /// Drops the cached taxonomy. Callers waiting on a load in progress
    /// start a new one.
    pub async fn invalidate(&self) {
        *self.state.lock().await = LoadState::Empty;
        debug!("taxonomy cache invalidated");
    }

    pub async fn reload(&self) -> Result<Arc<Taxonomy>> {
        self.invalidate().await;
        self.get().await
    }

    pub async fn status(&self) -> CacheStatus {
        match &*self.state.lock().await {
            LoadState::Empty => CacheStatus {
                state: "empty",
                statements: None,
                loaded_at: None,
            },
            LoadState::Loading { .. } => CacheStatus {
                state: "loading",
                statements: None,
                loaded_at: None,
            },
            LoadState::Ready(taxonomy) => CacheStatus {
                state: "ready",
                statements: Some(taxonomy.store.len()),
                loaded_at: Some(taxonomy.loaded_at),
            },
        }
    }

    fn spawn_load(&self, generation: u64) {
        let loader = Arc::clone(&self.loader);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let result = loader.load().await.map(|store| Arc::new(Taxonomy::new(store)));
            let mut state = state.lock().await;
            match &*state {
                LoadState::Loading { generation: current, .. } if *current == generation => {}
                _ => {
                    debug!(generation, "discarding load of an invalidated cache");
                    return;
                }
            }
            let LoadState::Loading { waiters, .. } = std::mem::replace(&mut *state, LoadState::Empty) else {
                return;
            };
            match &result {
                Ok(taxonomy) => *state = LoadState::Ready(Arc::clone(taxonomy)),
                Err(e) => warn!(error = %e, waiters = waiters.len(), "taxonomy load failed"),
            }
            for waiter in waiters {
                let _ = waiter.send(result.clone());
            }
        });
    }
}
