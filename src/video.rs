use serde::{Deserialize, Serialize};

/// Host used for canonical watch URLs
pub const WATCH_HOST: &str = "www.youtube.com";

/// A selected video, enriched for publishing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoEntry {
    /// Catalog video id
    pub id: String,

    /// Title as published
    pub title: String,

    /// Thumbnail URL
    pub thumbnail: String,

    /// Channel display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Publish timestamp as reported by the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,

    /// Display duration (`H:MM:SS` / `M:SS`), empty when unknown
    #[serde(default)]
    pub duration: String,

    /// Canonical watch URL
    pub url: String,
}

/// Canonical watch URL for a video id
pub fn watch_url(id: &str) -> String {
    format!("https://{}/watch?v={}", WATCH_HOST, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let entry = VideoEntry {
            id: "abc".to_string(),
            title: "Fastest lap ever".to_string(),
            thumbnail: "https://i.ytimg.com/vi/abc/hqdefault.jpg".to_string(),
            channel: None,
            published: None,
            duration: "1:23".to_string(),
            url: watch_url("abc"),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("channel").is_none());
        assert!(json.get("published").is_none());
        assert_eq!(json["duration"], "1:23");
        assert_eq!(json["url"], "https://www.youtube.com/watch?v=abc");
    }
}
