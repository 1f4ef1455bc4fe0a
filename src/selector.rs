/// Keyword selection of catalog entries
use crate::catalog::RawEntry;
use crate::duration::normalize_duration;
use crate::video::{watch_url, VideoEntry};
use std::collections::{BTreeSet, HashMap};

/// Default cap on selected videos per category
pub const DEFAULT_MAX_RESULTS: usize = 6;

/// Lowercase title keywords. An empty filter selects everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self { keywords: normalized }
    }

    /// Filter that selects every title
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when any keyword is a substring of the lowercased title
    pub fn matches(&self, title: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let title = title.to_lowercase();
        self.keywords.iter().any(|keyword| title.contains(keyword.as_str()))
    }
}

/// Keep entries whose titles match, in input order, up to `max_results`.
/// Durations are left empty until [`apply_durations`] runs.
pub fn select_entries(entries: &[RawEntry], filter: &KeywordFilter, max_results: usize) -> Vec<VideoEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches(&entry.title))
        .take(max_results)
        .map(|entry| VideoEntry {
            id: entry.id.clone(),
            title: entry.title.clone(),
            thumbnail: entry.thumbnails.preferred_url(),
            channel: entry.channel.clone(),
            published: entry.published.clone(),
            duration: String::new(),
            url: watch_url(&entry.id),
        })
        .collect()
}

/// Ids to look up in the duration batch
pub fn selected_ids(videos: &[VideoEntry]) -> BTreeSet<String> {
    videos.iter().map(|video| video.id.clone()).collect()
}

/// Fill display durations from raw tokens. Ids without a token get an empty duration.
pub fn apply_durations(videos: &mut [VideoEntry], tokens: &HashMap<String, String>) {
    for video in videos.iter_mut() {
        video.duration = tokens
            .get(&video.id)
            .map(|token| normalize_duration(token))
            .unwrap_or_default();
    }
}
