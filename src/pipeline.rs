use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::catalog::youtube::MAX_PAGE_SIZE;
use crate::catalog::{Catalog, RawEntry};
use crate::config::{CategoryConfig, Config};
use crate::patcher::{PagePatcher, PatchReport};
use crate::render::render_fragment;
use crate::selector::{apply_durations, select_entries, selected_ids, KeywordFilter};
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::storage::{read_text, write_atomic};
use crate::video::VideoEntry;

/// Videos selected for one category
#[derive(Debug, Clone)]
pub struct CategoryVideos {
    pub name: String,
    pub videos: Vec<VideoEntry>,
}

/// Outcome of a snapshot run
#[derive(Debug, Clone, Default)]
pub struct SnapshotSummary {
    pub written: Vec<(String, usize, PathBuf)>,
}

/// One run of the fetch, filter and enrich pipeline against a catalog
pub struct Pipeline<'a> {
    catalog: &'a dyn Catalog,
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(catalog: &'a dyn Catalog, config: &'a Config) -> Self {
        Self { catalog, config }
    }

    /// Recent uploads of the configured channel, empty if the channel is unknown
    pub async fn fetch_uploads(&self) -> Result<Vec<RawEntry>> {
        let channel_id = &self.config.catalog.channel_id;

        let collection = self
            .catalog
            .resolve_upload_collection(channel_id)
            .await
            .with_context(|| format!("Failed to resolve uploads for channel {}", channel_id))?;

        let collection = match collection {
            Some(collection) => collection,
            None => {
                warn!("⚠️ Channel {} has no uploads collection", channel_id);
                return Ok(Vec::new());
            }
        };

        let entries = self
            .catalog
            .list_recent_items(&collection, MAX_PAGE_SIZE)
            .await
            .with_context(|| format!("Failed to list uploads collection {}", collection))?;

        info!("📺 Listed {} recent uploads from {}", entries.len(), collection);
        Ok(entries)
    }

    /// Select and enrich the videos of one category from listed uploads
    pub async fn select_category(&self, uploads: &[RawEntry], category: &CategoryConfig) -> Result<CategoryVideos> {
        let filter = KeywordFilter::new(&category.keywords);
        let mut videos = select_entries(uploads, &filter, category.max_results);

        if !videos.is_empty() {
            let durations = self
                .catalog
                .fetch_durations(&selected_ids(&videos))
                .await
                .with_context(|| format!("Failed to fetch durations for {}", category.name))?;
            apply_durations(&mut videos, &durations);
        }

        info!("🎬 Got {} {}", videos.len(), category.name);
        Ok(CategoryVideos {
            name: category.name.clone(),
            videos,
        })
    }

    /// Fetch every configured category. Nothing is written here.
    pub async fn fetch_all(&self) -> Result<Vec<CategoryVideos>> {
        let uploads = self.fetch_uploads().await?;

        let mut results = Vec::new();
        for category in self.config.categories.all() {
            results.push(self.select_category(&uploads, category).await?);
        }
        Ok(results)
    }

    /// Fetch all categories, then overwrite their snapshot files
    pub async fn run_snapshots(&self) -> Result<SnapshotSummary> {
        let results = self.fetch_all().await?;
        write_snapshots(self.config, results)
    }

    /// Fetch all categories, then patch the page document with fresh cards
    pub async fn run_page_build(&self) -> Result<PatchReport> {
        let results = self.fetch_all().await?;
        patch_page(self.config, &results)
    }
}

/// Write one snapshot per category, all stamped with the same time
pub fn write_snapshots(config: &Config, results: Vec<CategoryVideos>) -> Result<SnapshotSummary> {
    let store = SnapshotStore::new(&config.output.data_dir);
    let updated = chrono::Utc::now();
    let mut summary = SnapshotSummary::default();

    for (category, result) in config.categories.all().into_iter().zip(results) {
        let count = result.videos.len();
        let path = store
            .write(&category.snapshot_file, &Snapshot::new(result.videos, updated))
            .with_context(|| format!("Failed to write {} snapshot", category.name))?;
        summary.written.push((category.name.clone(), count, path));
    }

    Ok(summary)
}

/// Load the saved snapshots of every category
pub fn load_snapshots(config: &Config) -> Result<Vec<CategoryVideos>> {
    let store = SnapshotStore::new(&config.output.data_dir);

    config
        .categories
        .all()
        .into_iter()
        .map(|category| -> Result<CategoryVideos> {
            let snapshot = store
                .load(&category.snapshot_file)
                .with_context(|| format!("Failed to load {} snapshot", category.name))?;
            Ok(CategoryVideos {
                name: category.name.clone(),
                videos: snapshot.videos,
            })
        })
        .collect()
}

/// Render each category into its page region and write the page back in place
pub fn patch_page(config: &Config, results: &[CategoryVideos]) -> Result<PatchReport> {
    let page_path: &Path = &config.output.page_path;
    let page = read_text(page_path).context("Failed to read page document")?;

    let fragments: Vec<(&CategoryConfig, String)> = config
        .categories
        .all()
        .into_iter()
        .zip(results)
        .map(|(category, result)| (category, render_fragment(&result.videos, category.variant)))
        .collect();

    let replacements: Vec<_> = fragments
        .iter()
        .map(|(category, fragment)| (&category.region, fragment.as_str()))
        .collect();

    let patcher = PagePatcher::new(config.output.strict_markers);
    let (patched, report) = patcher
        .patch(&page, &replacements)
        .with_context(|| format!("Failed to patch {}", page_path.display()))?;

    write_atomic(page_path, patched.as_bytes()).context("Failed to write page document")?;
    info!("📝 Updated {}", page_path.display());

    Ok(report)
}
