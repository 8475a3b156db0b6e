//! Channel upload enumeration and publish-date filtering

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

use crate::api::DataApi;
use crate::error::{Error, Result};

/// Every uploaded video id with its publish timestamp
pub type VideoUniverse = BTreeMap<String, DateTime<Utc>>;

/// Enumerate all uploads of `channel_id`.
///
/// A missing channel id is a configuration error and fails before any request.
/// Network failures stop the enumeration and return what was collected.
pub async fn fetch_video_universe(data: &dyn DataApi, channel_id: Option<&str>) -> Result<VideoUniverse> {
    let channel_id = channel_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(Error::MissingChannelId)?;

    let mut universe = VideoUniverse::new();

    let playlist_id = match data.uploads_playlist_id(channel_id).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            warn!("Channel {} has no uploads playlist", channel_id);
            return Ok(universe);
        }
        Err(e) => {
            error!("Error resolving uploads playlist for channel {}: {}", channel_id, e);
            return Ok(universe);
        }
    };

    let mut page_token: Option<String> = None;
    let mut pages = 0;
    loop {
        let page = match data.list_playlist_items(&playlist_id, page_token.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                error!(
                    "Error fetching page {} of playlist {}: {}",
                    pages + 1,
                    playlist_id,
                    e
                );
                break;
            }
        };
        pages += 1;

        for item in page.items {
            let details = item.content_details;
            match details.video_published_at {
                Some(published_at) => {
                    universe.entry(details.video_id).or_insert(published_at);
                }
                None => debug!("Skipping {} without publish date", details.video_id),
            }
        }

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    info!(
        "Found {} videos in {} pages of playlist {}",
        universe.len(),
        pages,
        playlist_id
    );
    Ok(universe)
}

/// Ids published within `[start, end]`.
///
/// Both bounds are calendar dates taken at midnight UTC; the full publish
/// timestamp is compared against them.
pub fn video_ids_in_period(universe: &VideoUniverse, start: NaiveDate, end: NaiveDate) -> Vec<String> {
    let lower = start.and_time(NaiveTime::MIN).and_utc();
    let upper = end.and_time(NaiveTime::MIN).and_utc();

    universe
        .iter()
        .filter(|(_, published)| **published >= lower && **published <= upper)
        .map(|(id, _)| id.clone())
        .collect()
}

/// Enumerate the channel and keep only videos published within `[start, end]`.
pub async fn fetch_video_ids_in_period(
    data: &dyn DataApi,
    channel_id: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<String>> {
    let universe = fetch_video_universe(data, channel_id).await?;
    let ids = video_ids_in_period(&universe, start, end);
    info!("{} of {} videos published between {} and {}", ids.len(), universe.len(), start, end);
    Ok(ids)
}
