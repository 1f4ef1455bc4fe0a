/// Video catalog access
///
/// The pipeline only needs three read-only queries from the catalog: resolve a
/// channel's uploads collection, list its recent items, and look up durations
/// for a batch of video ids. They sit behind the [`Catalog`] trait so a run can
/// be driven by the YouTube Data API or by a fixed in-memory catalog.

pub mod youtube;
pub mod fixture;

pub use fixture::StaticCatalog;
pub use youtube::YouTubeClient;

use crate::error::CatalogError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A single thumbnail variant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Thumbnail {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
        }
    }
}

/// Thumbnail variants keyed by resolution name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub standard: Option<Thumbnail>,
    #[serde(default)]
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// Preferred thumbnail URL: `high`, then `default`, then whatever else exists.
    /// Empty when the entry carries no thumbnails at all.
    pub fn preferred_url(&self) -> String {
        [
            &self.high,
            &self.default,
            &self.medium,
            &self.standard,
            &self.maxres,
        ]
        .into_iter()
        .flatten()
        .map(|thumb| thumb.url.clone())
        .next()
        .unwrap_or_default()
    }
}

/// An upload entry as listed by the catalog, before selection
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub id: String,
    pub title: String,
    pub thumbnails: Thumbnails,
    pub channel: Option<String>,
    pub published: Option<String>,
}

/// Read-only queries against a video catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve the uploads collection of a channel, `None` if the channel is unknown
    async fn resolve_upload_collection(&self, channel_id: &str) -> Result<Option<String>, CatalogError>;

    /// List at most `limit` items of a collection in catalog order
    async fn list_recent_items(&self, collection_id: &str, limit: usize) -> Result<Vec<RawEntry>, CatalogError>;

    /// Raw duration tokens for the given ids. Unknown ids are absent from the map.
    async fn fetch_durations(&self, ids: &BTreeSet<String>) -> Result<HashMap<String, String>, CatalogError>;
}
