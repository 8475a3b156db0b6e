//! YouTube Data and Analytics API surface
//!
//! The fetchers only talk to the platform through [`DataApi`] and [`AnalyticsApi`],
//! so a single authenticated [`YouTubeClient`] can be passed by reference into
//! every component and tests can swap in fakes.

mod client;

pub use client::YouTubeClient;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// Data API v3 lookups
#[async_trait]
pub trait DataApi: Send + Sync {
    /// `videos.list` with snippet, contentDetails and statistics for up to 50 ids
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>>;

    /// `channels.list` resolving the channel's uploads playlist
    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>>;

    /// One page of `playlistItems.list`
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>>;

    /// One page of `commentThreads.list` including attached replies
    async fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<CommentThread>>;
}

/// Analytics API v2 reports
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn query(&self, query: &ReportQuery) -> Result<Report>;
}

/// One page of a list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: Option<&str>) -> Self {
        Self {
            items,
            next_page_token: next_page_token.map(str::to_string),
        }
    }
}

// === Data API resources ===

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    pub content_details: VideoContentDetails,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoContentDetails {
    pub duration: String,
}

/// Counters arrive as decimal strings; hidden ones are missing entirely
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub dislike_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub comment_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub content_details: PlaylistItemDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemDetails {
    pub video_id: String,
    /// Missing for private or deleted videos
    #[serde(default)]
    pub video_published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    pub id: String,
    pub snippet: CommentThreadSnippet,
    #[serde(default)]
    pub replies: Option<CommentReplies>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: CommentResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentReplies {
    #[serde(default)]
    pub comments: Vec<CommentResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentResource {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub author_display_name: String,
    pub published_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_count")]
    pub like_count: u64,
    pub text_display: String,
}

// === Analytics API ===

/// Parameters of a `reports.query` call
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    /// e.g. `channel==MINE`
    pub ids: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub metrics: String,
    pub dimensions: Option<String>,
    pub filters: Option<String>,
}

/// Report rows; dimension columns come first, then metrics in request order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub rows: Option<Vec<Vec<serde_json::Value>>>,
}

impl Report {
    pub fn from_rows(rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { rows: Some(rows) }
    }

    /// First row, if the report has any
    pub fn first_row(&self) -> Option<&[serde_json::Value]> {
        self.rows
            .as_ref()
            .and_then(|rows| rows.first())
            .map(Vec::as_slice)
    }
}

/// Read a non-negative counter from a report cell
pub fn cell_count(row: &[serde_json::Value], column: usize) -> Option<u64> {
    let cell = row.get(column)?;
    cell.as_u64()
        .or_else(|| cell.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .or_else(|| cell.as_str().and_then(|s| s.parse().ok()))
}

fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_video_item_string_counters() {
        let item: VideoItem = serde_json::from_value(json!({
            "id": "abc",
            "snippet": {"title": "Open dag", "publishedAt": "2025-03-01T10:00:00Z"},
            "contentDetails": {"duration": "PT4M2S"},
            "statistics": {"viewCount": "1200", "likeCount": "40", "commentCount": "3"}
        }))
        .unwrap();
        assert_eq!(item.statistics.view_count, 1200);
        assert_eq!(item.statistics.like_count, 40);
        assert_eq!(item.statistics.dislike_count, 0);
        assert_eq!(item.statistics.comment_count, 3);
    }

    #[test]
    fn test_video_item_without_statistics() {
        let item: VideoItem = serde_json::from_value(json!({
            "id": "abc",
            "snippet": {"title": "t", "publishedAt": "2025-03-01T10:00:00Z"},
            "contentDetails": {"duration": "PT1S"}
        }))
        .unwrap();
        assert_eq!(item.statistics.view_count, 0);
    }

    #[test]
    fn test_page_without_token() {
        let page: Page<PlaylistItem> = serde_json::from_value(json!({
            "items": [{"contentDetails": {"videoId": "v1"}}]
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.items[0].content_details.video_published_at.is_none());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_report_cells() {
        let report: Report = serde_json::from_value(json!({
            "columnHeaders": [{"name": "video"}, {"name": "shares"}],
            "rows": [["abc", 17]]
        }))
        .unwrap();
        let row = report.first_row().unwrap();
        assert_eq!(cell_count(row, 1), Some(17));
        assert_eq!(cell_count(row, 0), None);
        assert_eq!(cell_count(row, 5), None);

        let empty: Report = serde_json::from_value(json!({"kind": "youtubeAnalytics#resultTable"})).unwrap();
        assert!(empty.first_row().is_none());
    }
}
