//! In-process entry store
//!
//! Keeps every entry in memory and evaluates `FilterCriteria` directly.
//! When opened with a snapshot path, the full entry list is written as JSON
//! after each insert and reloaded on open.

use crate::backend::{BackendResult, MoodBackend};
use crate::entries::{EntryPage, FilterCriteria, MoodEntry, NewMoodEntry};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

const SNAPSHOT_VERSION: u32 = 1;

/// Serialization format for JSON snapshots
#[derive(Serialize, Deserialize)]
struct SnapshotData {
    version: u32,
    entries: Vec<MoodEntry>,
}

/// In-memory [`MoodBackend`]
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: RwLock<Vec<MoodEntry>>,
    snapshot: Option<PathBuf>,
}

impl EntryStore {
    /// Create an empty store without persistence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with entries, without persistence
    pub fn with_entries(entries: Vec<MoodEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            snapshot: None,
        }
    }

    /// Open a store persisted at `path`, loading it if present
    pub async fn open(path: impl AsRef<Path>) -> BackendResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            let data: SnapshotData = serde_json::from_str(&content)?;
            tracing::info!(
                path = %path.display(),
                entries = data.entries.len(),
                "Loaded entry snapshot"
            );
            data.entries
        } else {
            Vec::new()
        };

        Ok(Self {
            entries: RwLock::new(entries),
            snapshot: Some(path),
        })
    }

    /// Add an already-built entry
    ///
    /// The entry is held in memory only once the snapshot write succeeded.
    pub async fn insert(&self, entry: MoodEntry) -> BackendResult<()> {
        let mut entries = self.entries.write().await;

        let mut updated = entries.clone();
        updated.push(entry);
        self.persist(&updated).await?;

        *entries = updated;
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn persist(&self, entries: &[MoodEntry]) -> BackendResult<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = SnapshotData {
            version: SNAPSHOT_VERSION,
            entries: entries.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&data)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;

        Ok(())
    }
}

#[async_trait]
impl MoodBackend for EntryStore {
    async fn query(&self, criteria: &FilterCriteria) -> BackendResult<EntryPage> {
        criteria.validate()?;

        let entries = self.entries.read().await;
        let page = criteria.apply(entries.iter(), Utc::now());

        tracing::debug!(
            user_id = %criteria.user_id,
            total = page.total,
            returned = page.entries.len(),
            "Query executed"
        );

        Ok(page)
    }

    async fn create_entry(&self, entry: NewMoodEntry) -> BackendResult<MoodEntry> {
        entry.validate()?;

        let stored = entry.into_entry(uuid::Uuid::new_v4().to_string(), Utc::now());
        self.insert(stored.clone()).await?;

        tracing::info!(id = %stored.id, user_id = %stored.user_id, "Mood entry recorded");
        Ok(stored)
    }
}
