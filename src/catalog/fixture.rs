/// Fixed in-memory catalog
use super::{Catalog, RawEntry};
use crate::error::CatalogError;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

/// Catalog serving a fixed set of channels, collections and durations
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    uploads: HashMap<String, String>,
    collections: HashMap<String, Vec<RawEntry>>,
    durations: HashMap<String, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel whose uploads live in `collection_id`
    pub fn with_channel(mut self, channel_id: &str, collection_id: &str, entries: Vec<RawEntry>) -> Self {
        self.uploads.insert(channel_id.to_string(), collection_id.to_string());
        self.collections.insert(collection_id.to_string(), entries);
        self
    }

    pub fn with_duration(mut self, video_id: &str, token: &str) -> Self {
        self.durations.insert(video_id.to_string(), token.to_string());
        self
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn resolve_upload_collection(&self, channel_id: &str) -> Result<Option<String>, CatalogError> {
        Ok(self.uploads.get(channel_id).cloned())
    }

    async fn list_recent_items(&self, collection_id: &str, limit: usize) -> Result<Vec<RawEntry>, CatalogError> {
        Ok(self
            .collections
            .get(collection_id)
            .map(|entries| entries.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_durations(&self, ids: &BTreeSet<String>) -> Result<HashMap<String, String>, CatalogError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.durations.get(id).map(|token| (id.clone(), token.clone())))
            .collect())
    }
}
