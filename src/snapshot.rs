/// Timestamped JSON snapshots of selected videos
use crate::error::StorageError;
use crate::storage::{read_text, write_atomic};
use crate::video::VideoEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Selected videos for one category plus generation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub videos: Vec<VideoEntry>,
    pub updated: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(videos: Vec<VideoEntry>, updated: DateTime<Utc>) -> Self {
        Self { videos, updated }
    }

    /// Snapshot stamped with the current time
    pub fn now(videos: Vec<VideoEntry>) -> Self {
        Self::new(videos, Utc::now())
    }

    pub fn to_json_pretty(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reads and writes snapshot files inside a data directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Overwrite the snapshot file, creating the data directory if needed
    pub fn write(&self, file_name: &str, snapshot: &Snapshot) -> Result<PathBuf, StorageError> {
        let path = self.path_for(file_name);
        let mut json = snapshot.to_json_pretty()?;
        json.push('\n');
        write_atomic(&path, json.as_bytes())?;
        debug!("💾 Saved {} videos to {}", snapshot.videos.len(), path.display());
        Ok(path)
    }

    pub fn load(&self, file_name: &str) -> Result<Snapshot, StorageError> {
        let path = self.path_for(file_name);
        let content = read_text(&path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        info!("📚 Loaded {} videos from {}", snapshot.videos.len(), path.display());
        Ok(snapshot)
    }
}
