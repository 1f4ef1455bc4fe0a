/// Channel Carousel
///
/// Fetches a curated subset of a YouTube channel's uploads, splits them into
/// keyword categories and publishes them as JSON snapshots or as card
/// carousels spliced into a static page.

pub mod catalog;
pub mod config;
pub mod duration;
pub mod error;
pub mod patcher;
pub mod pipeline;
pub mod render;
pub mod selector;
pub mod snapshot;
pub mod storage;
pub mod video;

// Re-export main types for easy access
pub use crate::catalog::{Catalog, RawEntry, StaticCatalog, YouTubeClient};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::duration::normalize_duration;
pub use crate::error::{CatalogError, PatchError, StorageError};
pub use crate::patcher::{PagePatcher, PatchReport, Region, RegionOutcome};
pub use crate::pipeline::{CategoryVideos, Pipeline};
pub use crate::render::{render_fragment, CardVariant};
pub use crate::selector::{select_entries, KeywordFilter};
pub use crate::snapshot::{Snapshot, SnapshotStore};
pub use crate::video::VideoEntry;
