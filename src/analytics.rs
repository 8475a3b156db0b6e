//! Cumulative metrics at fixed offsets from each video's publish date
//!
//! Every video becomes one wide [`AnalyticsRow`]. For each [`Interval`] the window
//! `[publish date, publish date + offset]` is queried once; intervals that haven't
//! elapsed yet are marked [`Snapshot::NotReached`] without a request, and failed or
//! empty reports become [`Snapshot::Unavailable`].

use chrono::{Days, NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::api::{cell_count, AnalyticsApi, ReportQuery};
use crate::engagement::engagement_rate;
use crate::model::{AnalyticsRow, Interval, IntervalMetrics, Snapshot, VideoTable};

const INTERVAL_METRICS: &str = "views,likes,dislikes,shares,comments";

/// Reshape analytics for every video in `videos`, evaluated against today.
pub async fn fetch_metrics_over_time(
    analytics: &dyn AnalyticsApi,
    channel_id: Option<&str>,
    videos: &VideoTable,
) -> Vec<AnalyticsRow> {
    fetch_metrics_over_time_as_of(analytics, channel_id, videos, Utc::now().date_naive()).await
}

pub async fn fetch_metrics_over_time_as_of(
    analytics: &dyn AnalyticsApi,
    channel_id: Option<&str>,
    videos: &VideoTable,
    today: NaiveDate,
) -> Vec<AnalyticsRow> {
    let ids = match channel_id {
        Some(id) if !id.trim().is_empty() => format!("channel=={}", id),
        _ => "channel==MINE".to_string(),
    };

    let mut rows = Vec::with_capacity(videos.len());
    for video in videos.values() {
        let publish_day = video.publish_date.date_naive();
        let mut intervals = [IntervalMetrics::not_reached(); 6];

        for (slot, interval) in intervals.iter_mut().zip(Interval::ALL) {
            *slot = fetch_interval(analytics, &ids, &video.id, publish_day, interval, today).await;
        }

        rows.push(AnalyticsRow {
            id: video.id.clone(),
            publish_date: video.publish_date,
            intervals,
        });
    }

    info!("Built analytics snapshots for {} videos", rows.len());
    rows
}

async fn fetch_interval(
    analytics: &dyn AnalyticsApi,
    ids: &str,
    video_id: &str,
    publish_day: NaiveDate,
    interval: Interval,
    today: NaiveDate,
) -> IntervalMetrics {
    let Some(end_date) = publish_day.checked_add_days(Days::new(interval.days() as u64)) else {
        return IntervalMetrics::not_reached();
    };

    if end_date > today {
        debug!("Interval {} for {} not reached until {}", interval.label(), video_id, end_date);
        return IntervalMetrics::not_reached();
    }

    let query = ReportQuery {
        ids: ids.to_string(),
        start_date: publish_day,
        end_date,
        metrics: INTERVAL_METRICS.to_string(),
        dimensions: None,
        filters: Some(format!("video=={}", video_id)),
    };

    let report = match analytics.query(&query).await {
        Ok(report) => report,
        Err(e) => {
            error!("Error fetching analytics for video {} on {}: {}", video_id, end_date, e);
            return IntervalMetrics::unavailable();
        }
    };

    let Some(row) = report.first_row() else {
        warn!("No analytics rows for video {} on {}", video_id, end_date);
        return IntervalMetrics::unavailable();
    };

    let counters: Option<Vec<u64>> = (0..5).map(|col| cell_count(row, col)).collect();
    let Some(c) = counters else {
        warn!("Incomplete analytics row for video {} on {}: {:?}", video_id, end_date, row);
        return IntervalMetrics::unavailable();
    };

    let (views, likes, dislikes, shares, comments) = (c[0], c[1], c[2], c[3], c[4]);
    IntervalMetrics {
        views: Snapshot::Value(views),
        likes: Snapshot::Value(likes),
        dislikes: Snapshot::Value(dislikes),
        shares: Snapshot::Value(shares),
        comments: Snapshot::Value(comments),
        engagement_rate: Snapshot::Value(engagement_rate(shares, comments, likes, dislikes, views)),
    }
}
