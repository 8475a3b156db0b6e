//! In-memory stand-ins for the API traits used by unit tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{
    AnalyticsApi, CommentReplies, CommentResource, CommentSnippet, CommentThread,
    CommentThreadSnippet, DataApi, Page, PlaylistItem, PlaylistItemDetails, Report, ReportQuery,
    VideoContentDetails, VideoItem, VideoSnippet, VideoStatistics,
};
use crate::error::{Error, Result};

pub fn fake_error(endpoint: &str) -> Error {
    Error::Api {
        endpoint: endpoint.to_string(),
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: "backend error".to_string(),
    }
}

pub fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub fn video_item(id: &str, published_at: &str, views: u64, likes: u64, comments: u64) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        snippet: VideoSnippet {
            title: format!("Video {}", id),
            published_at: ts(published_at),
        },
        content_details: VideoContentDetails {
            duration: "PT3M7S".to_string(),
        },
        statistics: VideoStatistics {
            view_count: views,
            like_count: likes,
            dislike_count: 0,
            comment_count: comments,
        },
    }
}

pub fn comment(id: &str, author: &str, text: &str) -> CommentResource {
    CommentResource {
        id: id.to_string(),
        snippet: CommentSnippet {
            author_display_name: author.to_string(),
            published_at: ts("2025-01-02T10:00:00Z"),
            like_count: 1,
            text_display: text.to_string(),
        },
    }
}

pub fn thread(top: CommentResource, replies: Vec<CommentResource>) -> CommentThread {
    CommentThread {
        id: top.id.clone(),
        snippet: CommentThreadSnippet {
            top_level_comment: top,
        },
        replies: if replies.is_empty() {
            None
        } else {
            Some(CommentReplies { comments: replies })
        },
    }
}

pub fn playlist_item(video_id: &str, published_at: Option<&str>) -> PlaylistItem {
    PlaylistItem {
        content_details: PlaylistItemDetails {
            video_id: video_id.to_string(),
            video_published_at: published_at.map(ts),
        },
    }
}

/// Data API fake. Pages are keyed by continuation token, `""` for the first page;
/// a page that isn't registered fails.
#[derive(Default)]
pub struct FakeData {
    pub videos: Vec<VideoItem>,
    /// 0-based `list_videos` calls that fail
    pub failing_video_calls: Vec<usize>,
    pub uploads: Option<String>,
    pub fail_uploads: bool,
    pub playlist_pages: HashMap<String, Page<PlaylistItem>>,
    pub comment_pages: HashMap<(String, String), Page<CommentThread>>,
    pub video_batches: Mutex<Vec<Vec<String>>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeData {
    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl DataApi for FakeData {
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>> {
        let call = {
            let mut batches = self.video_batches.lock().unwrap();
            batches.push(ids.to_vec());
            batches.len() - 1
        };
        self.record(format!("videos#{}", call));
        if self.failing_video_calls.contains(&call) {
            return Err(fake_error("videos"));
        }
        Ok(self
            .videos
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>> {
        self.record(format!("channels:{}", channel_id));
        if self.fail_uploads {
            return Err(fake_error("channels"));
        }
        Ok(self.uploads.clone())
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>> {
        let token = page_token.unwrap_or_default().to_string();
        self.record(format!("playlistItems:{}:{}", playlist_id, token));
        self.playlist_pages
            .get(&token)
            .cloned()
            .ok_or_else(|| fake_error("playlistItems"))
    }

    async fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<CommentThread>> {
        let token = page_token.unwrap_or_default().to_string();
        self.record(format!("commentThreads:{}:{}", video_id, token));
        self.comment_pages
            .get(&(video_id.to_string(), token))
            .cloned()
            .ok_or_else(|| fake_error("commentThreads"))
    }
}

type Responder = Box<dyn Fn(&ReportQuery) -> Result<Report> + Send + Sync>;

/// Analytics fake answering through a closure and recording every query
pub struct FakeAnalytics {
    respond: Responder,
    pub queries: Mutex<Vec<ReportQuery>>,
}

impl FakeAnalytics {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&ReportQuery) -> Result<Report> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query comes back with no rows
    pub fn empty() -> Self {
        Self::new(|_| Ok(Report::default()))
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalyticsApi for FakeAnalytics {
    async fn query(&self, query: &ReportQuery) -> Result<Report> {
        self.queries.lock().unwrap().push(query.clone());
        (self.respond)(query)
    }
}
