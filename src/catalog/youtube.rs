/// YouTube Data API v3 catalog client
use super::{Catalog, RawEntry, Thumbnails};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Largest page the API returns for list and batch queries
pub const MAX_PAGE_SIZE: usize = 50;

/// Catalog backed by the YouTube Data API
pub struct YouTubeClient {
    client: Client,
    api_base: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    channel_title: Option<String>,
    published_at: Option<String>,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl YouTubeClient {
    /// Build a client from catalog settings. The API key must be present.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CatalogError::MissingApiKey)?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint_url(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&format!("{}/{}", self.api_base, resource))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().copied())
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T, CatalogError> {
        let url = self.endpoint_url(resource, params)?;
        debug!("GET {}/{} {:?}", self.api_base, resource, params);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(format!("{}: {}", resource, e)))
    }
}

/// Pull the human-readable message out of an API error body, falling back to the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|err| err.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn into_raw_entry(item: PlaylistItem) -> Option<RawEntry> {
    let snippet = item.snippet;
    // Deleted and private uploads come back without a video id
    let id = snippet.resource_id.video_id?;
    Some(RawEntry {
        id,
        title: snippet.title,
        thumbnails: snippet.thumbnails,
        channel: snippet.channel_title,
        published: snippet.published_at,
    })
}

#[async_trait]
impl Catalog for YouTubeClient {
    async fn resolve_upload_collection(&self, channel_id: &str) -> Result<Option<String>, CatalogError> {
        let response: ChannelListResponse = self
            .get_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.content_details.related_playlists.uploads))
    }

    async fn list_recent_items(&self, collection_id: &str, limit: usize) -> Result<Vec<RawEntry>, CatalogError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let page_size = limit.min(MAX_PAGE_SIZE).to_string();
        let response: PlaylistItemListResponse = self
            .get_json(
                "playlistItems",
                &[("part", "snippet"), ("playlistId", collection_id), ("maxResults", page_size.as_str())],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(into_raw_entry)
            .take(limit)
            .collect())
    }

    async fn fetch_durations(&self, ids: &BTreeSet<String>) -> Result<HashMap<String, String>, CatalogError> {
        let mut durations = HashMap::new();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        for batch in ids.chunks(MAX_PAGE_SIZE) {
            let joined = batch.join(",");
            let response: VideoListResponse = self
                .get_json("videos", &[("part", "contentDetails"), ("id", joined.as_str())])
                .await?;

            for item in response.items {
                if let Some(duration) = item.content_details.and_then(|details| details.duration) {
                    durations.insert(item.id, duration);
                }
            }
        }

        Ok(durations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    fn test_config() -> CatalogConfig {
        CatalogConfig {
            api_key: Some("test-key".to_string()),
            ..CatalogConfig::default()
        }
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = CatalogConfig {
            api_key: None,
            ..CatalogConfig::default()
        };
        assert!(matches!(YouTubeClient::new(&config), Err(CatalogError::MissingApiKey)));

        let blank = CatalogConfig {
            api_key: Some("  ".to_string()),
            ..CatalogConfig::default()
        };
        assert!(matches!(YouTubeClient::new(&blank), Err(CatalogError::MissingApiKey)));
    }

    #[test]
    fn test_endpoint_url_encodes_params() {
        let client = YouTubeClient::new(&test_config()).unwrap();
        let url = client
            .endpoint_url("videos", &[("part", "contentDetails"), ("id", "a,b")])
            .unwrap();

        assert_eq!(url.path(), "/youtube/v3/videos");
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["id"], "a,b");
        assert_eq!(pairs["part"], "contentDetails");
        assert_eq!(pairs["key"], "test-key");
    }

    #[test]
    fn test_decode_channel_response() {
        let body = r#"{"items":[{"id":"UC1","contentDetails":{"relatedPlaylists":{"likes":"","uploads":"UU1"}}}]}"#;
        let response: ChannelListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.items[0].content_details.related_playlists.uploads.as_deref(),
            Some("UU1")
        );

        let empty: ChannelListResponse = serde_json::from_str(r#"{"pageInfo":{"totalResults":0}}"#).unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_decode_playlist_items() {
        let body = r#"{
            "items": [
                {"snippet": {
                    "publishedAt": "2026-03-01T10:00:00Z",
                    "channelTitle": "FORMULA 1",
                    "title": "Driver reacts to Q3",
                    "thumbnails": {
                        "default": {"url": "https://i.ytimg.com/vi/abc/default.jpg", "width": 120, "height": 90},
                        "high": {"url": "https://i.ytimg.com/vi/abc/hqdefault.jpg", "width": 480, "height": 360}
                    },
                    "resourceId": {"kind": "youtube#video", "videoId": "abc"}
                }},
                {"snippet": {
                    "title": "Deleted video",
                    "thumbnails": {},
                    "resourceId": {"kind": "youtube#video"}
                }}
            ]
        }"#;
        let response: PlaylistItemListResponse = serde_json::from_str(body).unwrap();
        let entries: Vec<RawEntry> = response.items.into_iter().filter_map(into_raw_entry).collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "abc");
        assert_eq!(entries[0].channel.as_deref(), Some("FORMULA 1"));
        assert_eq!(entries[0].thumbnails.preferred_url(), "https://i.ytimg.com/vi/abc/hqdefault.jpg");
    }

    #[test]
    fn test_decode_video_durations() {
        let body = r#"{"items":[{"id":"abc","contentDetails":{"duration":"PT4M13S"}},{"id":"def"}]}"#;
        let response: VideoListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.items.len(), 2);
        assert!(response.items[1].content_details.is_none());
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":403,"message":"API key not valid.","errors":[]}}"#;
        assert_eq!(api_error_message(body), "API key not valid.");
        assert_eq!(api_error_message("  gateway timeout \n"), "gateway timeout");
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        // Nothing listens on the discard port
        let config = ConfigBuilder::new()
            .with_api_key("SECRET-KEY-123")
            .with_api_base("http://127.0.0.1:9/youtube/v3")
            .build();
        let client = YouTubeClient::new(&config.catalog).unwrap();

        let err = client.resolve_upload_collection("UC1").await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));

        let chain = format!("{:?}", anyhow::Error::from(err));
        assert!(!chain.contains("SECRET-KEY-123"), "key leaked: {}", chain);
        assert!(!chain.contains("key="));
    }
}
