//! HTTP client for the YouTube Data v3 and Analytics v2 REST endpoints

use async_trait::async_trait;
use governor::{Quota, RateLimiter as GovRateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use tracing::debug;

use super::{AnalyticsApi, CommentThread, DataApi, Page, PlaylistItem, Report, ReportQuery, VideoItem};
use crate::config::ApiConfig;
use crate::error::{Error, Result};

const VIDEO_PARTS: &str = "snippet,contentDetails,statistics";
const PLAYLIST_PAGE_SIZE: &str = "50";
const COMMENT_PAGE_SIZE: &str = "100";

/// Authenticated client shared read-only by every fetcher.
///
/// Requests go out one at a time, paced by a direct rate limiter.
pub struct YouTubeClient {
    client: Client,
    rate_limiter: GovRateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>,
    data_base_url: String,
    analytics_base_url: String,
    access_token: Option<String>,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .user_agent(concat!("yt-insights/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = GovRateLimiter::direct(Quota::per_second(per_second));

        Ok(Self {
            client,
            rate_limiter,
            data_base_url: config.data_base_url.trim_end_matches('/').to_string(),
            analytics_base_url: config.analytics_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        base: &str,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/{}", base, endpoint);
        debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(ref token) = self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl DataApi for YouTubeClient {
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>> {
        // videos.list takes no maxResults alongside an id filter
        let query = [("part", VIDEO_PARTS.to_string()), ("id", ids.join(","))];
        let page: Page<VideoItem> = self.get_json(&self.data_base_url, "videos", &query).await?;
        Ok(page.items)
    }

    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>> {
        let query = [
            ("part", "contentDetails".to_string()),
            ("id", channel_id.to_string()),
        ];
        let page: Page<ChannelItem> = self.get_json(&self.data_base_url, "channels", &query).await?;
        Ok(page
            .items
            .into_iter()
            .next()
            .and_then(|c| c.content_details.related_playlists.uploads))
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>> {
        let mut query = vec![
            ("part", "contentDetails".to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", PLAYLIST_PAGE_SIZE.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        self.get_json(&self.data_base_url, "playlistItems", &query).await
    }

    async fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<CommentThread>> {
        let mut query = vec![
            ("part", "snippet,replies".to_string()),
            ("videoId", video_id.to_string()),
            ("maxResults", COMMENT_PAGE_SIZE.to_string()),
            ("textFormat", "plainText".to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        self.get_json(&self.data_base_url, "commentThreads", &query).await
    }
}

#[async_trait]
impl AnalyticsApi for YouTubeClient {
    async fn query(&self, query: &ReportQuery) -> Result<Report> {
        let mut params = vec![
            ("ids", query.ids.clone()),
            ("startDate", query.start_date.format("%Y-%m-%d").to_string()),
            ("endDate", query.end_date.format("%Y-%m-%d").to_string()),
            ("metrics", query.metrics.clone()),
        ];
        if let Some(ref dimensions) = query.dimensions {
            params.push(("dimensions", dimensions.clone()));
        }
        if let Some(ref filters) = query.filters {
            params.push(("filters", filters.clone()));
        }
        self.get_json(&self.analytics_base_url, "reports", &params).await
    }
}

// === channels.list response ===

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
    #[serde(default)]
    uploads: Option<String>,
}
