//! Video metadata in batches, joined with analytics share counts

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::api::{cell_count, AnalyticsApi, DataApi, ReportQuery, VideoItem};
use crate::duration::parse_duration;
use crate::engagement::engagement_rate;
use crate::model::{Video, VideoTable};

/// `videos.list` accepts at most this many ids per request
pub const VIDEO_BATCH_SIZE: usize = 50;

/// Fetch metadata for `ids`, with shares counted up to today.
pub async fn fetch_videos(data: &dyn DataApi, analytics: &dyn AnalyticsApi, ids: &[String]) -> VideoTable {
    fetch_videos_as_of(data, analytics, ids, Utc::now().date_naive()).await
}

/// Fetch metadata for `ids` in batches of [`VIDEO_BATCH_SIZE`].
///
/// A batch that fails is logged and skipped; its videos are missing from the result.
pub async fn fetch_videos_as_of(
    data: &dyn DataApi,
    analytics: &dyn AnalyticsApi,
    ids: &[String],
    today: NaiveDate,
) -> VideoTable {
    let mut table = VideoTable::new();

    if ids.is_empty() {
        warn!("No video ids given, nothing to fetch");
        return table;
    }

    let batch_count = ids.len().div_ceil(VIDEO_BATCH_SIZE);
    for (n, batch) in ids.chunks(VIDEO_BATCH_SIZE).enumerate() {
        debug!("Fetching video batch {}/{} ({} ids)", n + 1, batch_count, batch.len());

        let items = match data.list_videos(batch).await {
            Ok(items) => items,
            Err(e) => {
                error!(
                    "Error fetching video batch {}/{} ({} .. {}): {}",
                    n + 1,
                    batch_count,
                    batch[0],
                    batch[batch.len() - 1],
                    e
                );
                continue;
            }
        };

        if items.is_empty() {
            warn!("No data found for video batch {}/{}", n + 1, batch_count);
            continue;
        }

        for item in items {
            let publish_day = item.snippet.published_at.date_naive();
            let shares = fetch_shares_as_of(analytics, &item.id, publish_day, today).await;
            let video = assemble_video(item, shares);
            table.insert(video.id.clone(), video);
        }
    }

    info!("Fetched metadata for {}/{} videos", table.len(), ids.len());
    table
}

/// Total shares from the publish date through today.
pub async fn fetch_shares(analytics: &dyn AnalyticsApi, video_id: &str, publish_date: NaiveDate) -> Option<u64> {
    fetch_shares_as_of(analytics, video_id, publish_date, Utc::now().date_naive()).await
}

/// Total shares in `[publish_date, today]`; `None` when the report is empty or fails.
pub async fn fetch_shares_as_of(
    analytics: &dyn AnalyticsApi,
    video_id: &str,
    publish_date: NaiveDate,
    today: NaiveDate,
) -> Option<u64> {
    let query = ReportQuery {
        ids: "channel==MINE".to_string(),
        start_date: publish_date,
        end_date: today,
        metrics: "shares".to_string(),
        dimensions: Some("video".to_string()),
        filters: Some(format!("video=={}", video_id)),
    };

    match analytics.query(&query).await {
        // dimension column first, shares second
        Ok(report) => match report.first_row().and_then(|row| cell_count(row, 1)) {
            Some(shares) => Some(shares),
            None => {
                warn!("No share data found for video {}", video_id);
                None
            }
        },
        Err(e) => {
            error!("Error fetching shares for video {} since {}: {}", video_id, publish_date, e);
            None
        }
    }
}

fn assemble_video(item: VideoItem, shares: Option<u64>) -> Video {
    let stats = &item.statistics;
    let engagement = engagement_rate(
        shares.unwrap_or(0),
        stats.comment_count,
        stats.like_count,
        stats.dislike_count,
        stats.view_count,
    );

    Video {
        duration: parse_duration(&item.content_details.duration),
        views: stats.view_count,
        likes: stats.like_count,
        dislikes: stats.dislike_count,
        comments: stats.comment_count,
        shares,
        engagement,
        title: item.snippet.title,
        publish_date: item.snippet.published_at,
        id: item.id,
    }
}
