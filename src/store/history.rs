//! Bounded, most-recent-first history of composed commits.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::commit::CommitSpec;
use crate::error::StoreError;

/// Number of entries kept when the config does not say otherwise.
pub const DEFAULT_HISTORY_SIZE: usize = 15;

/// A committed spec together with where it was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitHistoryEntry {
    #[serde(flatten)]
    pub spec: CommitSpec,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub branch_name: String,
    pub committed_at: DateTime<Utc>,
}

impl CommitHistoryEntry {
    pub fn new(spec: CommitSpec, repo_url: Option<String>, branch_name: impl Into<String>) -> Self {
        Self {
            spec,
            repo_url,
            branch_name: branch_name.into(),
            committed_at: Utc::now(),
        }
    }
}

/// FIFO of past commits persisted as a JSON array.
#[derive(Debug)]
pub struct HistoryCache {
    path: PathBuf,
    capacity: usize,
    entries: VecDeque<CommitHistoryEntry>,
}

impl HistoryCache {
    /// Load the cache. Never fails: a missing or corrupt file gives an empty cache.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let capacity = capacity.max(1);

        let mut entries = read_entries(&path);
        entries.truncate(capacity);
        debug!("Loaded {} history entries from {}", entries.len(), path.display());

        Self {
            path,
            capacity,
            entries,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry, the only one consulted for reuse.
    pub fn latest(&self) -> Option<&CommitHistoryEntry> {
        self.entries.front()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommitHistoryEntry> {
        self.entries.iter()
    }

    /// Prepend `entry`, evicting the oldest entries once full, then persist.
    ///
    /// The in-memory cache is updated even when the write fails.
    pub fn record(&mut self, entry: CommitHistoryEntry) -> Result<(), StoreError> {
        while self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
        self.save()
    }

    fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&self.entries).map_err(|e| StoreError::Serialize {
            what: "commit history",
            reason: e.to_string(),
        })?;
        super::write_atomic(&self.path, &json)
    }
}

fn read_entries(path: &Path) -> VecDeque<CommitHistoryEntry> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not read history file {}: {}", path.display(), e);
            }
            return VecDeque::new();
        }
    };

    match serde_json::from_slice(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Ignoring unparsable history file {}: {}", path.display(), e);
            VecDeque::new()
        }
    }
}
