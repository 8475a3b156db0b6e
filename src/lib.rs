//! yt-insights
//!
//! Collects public video metadata, private analytics snapshots and comments for
//! a YouTube channel, and prepares them for reporting.

pub mod analytics;
pub mod anonymize;
pub mod api;
pub mod comments;
pub mod config;
pub mod duration;
pub mod engagement;
pub mod error;
pub mod model;
pub mod playlist;
pub mod translate;
pub mod videos;

#[cfg(test)]
mod testing;

pub use anonymize::{AnonymizedComments, Anonymizer, AuthorMap};
pub use api::{AnalyticsApi, DataApi, YouTubeClient};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{AnalyticsRow, Comment, Interval, IntervalMetrics, Snapshot, Video, VideoTable};
