//! Output records: videos, analytics snapshots and comments

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Public metadata for one video, totals as of the fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub publish_date: DateTime<Utc>,
    pub duration: String,
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
    /// `None` when the analytics share lookup returned nothing
    pub shares: Option<u64>,
    pub comments: u64,
    pub engagement: f64,
}

/// Videos keyed by id
pub type VideoTable = BTreeMap<String, Video>;

/// Snapshot offsets from a video's publish date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Day,
    Week,
    TwoWeeks,
    Month,
    TwoMonths,
    ThreeMonths,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Interval::Day,
        Interval::Week,
        Interval::TwoWeeks,
        Interval::Month,
        Interval::TwoMonths,
        Interval::ThreeMonths,
    ];

    pub fn days(self) -> i64 {
        match self {
            Interval::Day => 1,
            Interval::Week => 7,
            Interval::TwoWeeks => 14,
            Interval::Month => 30,
            Interval::TwoMonths => 60,
            Interval::ThreeMonths => 90,
        }
    }

    /// Column suffix
    pub fn label(self) -> &'static str {
        match self {
            Interval::Day => "24h",
            Interval::Week => "1w",
            Interval::TwoWeeks => "2w",
            Interval::Month => "1m",
            Interval::TwoMonths => "2m",
            Interval::ThreeMonths => "3m",
        }
    }
}

/// A metric cell that may not have a value.
///
/// `NotReached` and `Unavailable` are both absent, but kept apart so callers can
/// tell "too early" from "the request failed or came back empty". Neither is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snapshot<T> {
    Value(T),
    /// publish date + interval is still in the future
    NotReached,
    /// request failed or returned no rows
    Unavailable,
}

impl<T: Copy> Snapshot<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Snapshot::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        !matches!(self, Snapshot::Value(_))
    }
}

impl<T: Serialize> Serialize for Snapshot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Snapshot::Value(v) => v.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

/// The six cells recorded for one interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalMetrics {
    pub views: Snapshot<u64>,
    pub likes: Snapshot<u64>,
    pub dislikes: Snapshot<u64>,
    pub shares: Snapshot<u64>,
    pub comments: Snapshot<u64>,
    pub engagement_rate: Snapshot<f64>,
}

impl IntervalMetrics {
    pub fn not_reached() -> Self {
        Self::filled(Snapshot::NotReached, Snapshot::NotReached)
    }

    pub fn unavailable() -> Self {
        Self::filled(Snapshot::Unavailable, Snapshot::Unavailable)
    }

    fn filled(counter: Snapshot<u64>, rate: Snapshot<f64>) -> Self {
        Self {
            views: counter,
            likes: counter,
            dislikes: counter,
            shares: counter,
            comments: counter,
            engagement_rate: rate,
        }
    }
}

/// Metric groups in output column order
const COUNTER_GROUPS: [&str; 5] = ["views", "likes", "dislikes", "shares", "comments"];
const RATE_GROUP: &str = "engagement_rate";

/// One wide row per video: every metric at every interval
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRow {
    pub id: String,
    pub publish_date: DateTime<Utc>,
    /// Indexed in [`Interval::ALL`] order
    pub intervals: [IntervalMetrics; 6],
}

impl AnalyticsRow {
    pub fn interval(&self, interval: Interval) -> &IntervalMetrics {
        &self.intervals[Self::index(interval)]
    }

    fn index(interval: Interval) -> usize {
        Interval::ALL
            .iter()
            .position(|i| *i == interval)
            .unwrap_or_default()
    }

    /// Column names, grouped by metric then interval
    pub fn columns() -> Vec<String> {
        let mut columns = vec!["id".to_string(), "publish_date".to_string()];
        for group in COUNTER_GROUPS.iter().chain(std::iter::once(&RATE_GROUP)) {
            for interval in Interval::ALL {
                columns.push(format!("{}_{}", group, interval.label()));
            }
        }
        columns
    }

    fn counter(&self, group: usize, idx: usize) -> Snapshot<u64> {
        let m = &self.intervals[idx];
        match group {
            0 => m.views,
            1 => m.likes,
            2 => m.dislikes,
            3 => m.shares,
            _ => m.comments,
        }
    }
}

impl Serialize for AnalyticsRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + 6 * 6))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("publish_date", &self.publish_date)?;
        for (group_idx, group) in COUNTER_GROUPS.iter().enumerate() {
            for (idx, interval) in Interval::ALL.iter().enumerate() {
                let key = format!("{}_{}", group, interval.label());
                map.serialize_entry(&key, &self.counter(group_idx, idx))?;
            }
        }
        for (idx, interval) in Interval::ALL.iter().enumerate() {
            let key = format!("{}_{}", RATE_GROUP, interval.label());
            map.serialize_entry(&key, &self.intervals[idx].engagement_rate)?;
        }
        map.end()
    }
}

/// A top-level comment or a reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub video_id: String,
    pub comment_id: String,
    /// Set on replies, pointing at the top-level comment of the same video
    pub parent_comment_id: Option<String>,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub like_count: u64,
    /// Original-language text
    pub text: String,
    pub text_translated: Option<String>,
    pub is_reply: bool,
    /// Set once the author and mentions have been replaced by pseudonyms
    #[serde(skip)]
    pub(crate) anonymized: bool,
}
