use crate::core::{ConfigProvider, HistoryEntry, HistoryLog, Storage};
use crate::utils::error::{BalancerError, Result};
use std::collections::HashMap;
use std::path::{Component, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::sync::{Mutex, MutexGuard};

/// 預設保留的歷史筆數
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// 同一路徑在整個行程內共用一把鎖
static HISTORY_LOCKS: OnceLock<std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    OnceLock::new();

fn lock_key(path: &str) -> PathBuf {
    // "./a.json" 與 "a.json" 視為同一份紀錄
    std::path::Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn shared_lock(path: &str) -> Arc<Mutex<()>> {
    let registry = HISTORY_LOCKS.get_or_init(Default::default);
    let mut locks = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(lock_key(path)).or_default())
}

/// Size-bounded, newest-first log of past groupings kept in a single JSON document.
///
/// Reads never fail: a missing, unreadable or malformed document is treated
/// as an empty log. Writes go through [`HistoryStore::lock`], which hands out
/// one mutex per history path for the whole process, so separate stores on
/// the same file cannot interleave their read-modify-write.
pub struct HistoryStore<S: Storage> {
    storage: S,
    path: String,
    limit: usize,
    lock: Arc<Mutex<()>>,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S, path: impl Into<String>, limit: usize) -> Self {
        let path = path.into();
        Self {
            lock: shared_lock(&path),
            storage,
            path,
            limit,
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, config: &C) -> Self {
        Self::new(storage, config.history_path(), config.history_limit())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Takes the process-wide history lock. Hold the guard across
    /// load → search → append to keep the whole round serialized.
    pub async fn lock(&self) -> HistoryGuard<'_, S> {
        HistoryGuard {
            store: self,
            _guard: self.lock.lock().await,
        }
    }

    pub async fn load(&self) -> HistoryLog {
        self.read_log().await
    }

    pub async fn append(&self, entry: HistoryEntry) -> Result<HistoryLog> {
        self.lock().await.append(entry).await
    }

    async fn read_log(&self) -> HistoryLog {
        let bytes = match self.storage.read_file(&self.path).await {
            Ok(bytes) => bytes,
            Err(BalancerError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history at {}, starting fresh", self.path);
                return HistoryLog::new();
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not read history {}: {}; using empty history", self.path, e);
                return HistoryLog::new();
            }
        };

        match serde_json::from_slice::<HistoryLog>(&bytes) {
            Ok(mut log) => {
                log.truncate(self.limit);
                tracing::debug!("Loaded {} history entries from {}", log.len(), self.path);
                log
            }
            Err(e) => {
                tracing::warn!("⚠️ History {} is not valid: {}; using empty history", self.path, e);
                HistoryLog::new()
            }
        }
    }

    async fn write_log(&self, log: &HistoryLog) -> Result<()> {
        let json = serde_json::to_string_pretty(log)?;
        self.storage
            .write_file(&self.path, json.as_bytes())
            .await
            .map_err(|e| match e {
                BalancerError::IoError(source) => BalancerError::HistoryCommitError {
                    path: self.path.clone(),
                    source,
                },
                other => other,
            })
    }
}

/// Exclusive access to the history for the lifetime of the guard.
pub struct HistoryGuard<'a, S: Storage> {
    store: &'a HistoryStore<S>,
    _guard: MutexGuard<'a, ()>,
}

impl<S: Storage> HistoryGuard<'_, S> {
    pub async fn load(&self) -> HistoryLog {
        self.store.read_log().await
    }

    /// 讀取 → 插到最前面 → 截斷 → 整份寫回
    pub async fn append(&self, entry: HistoryEntry) -> Result<HistoryLog> {
        let mut log = self.store.read_log().await;
        log.prepend(entry, self.store.limit);
        self.store.write_log(&log).await?;
        tracing::debug!("History now holds {} entries", log.len());
        Ok(log)
    }
}
