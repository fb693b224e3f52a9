//! The batch jobs: fetch events, fetch videos, match, export.
//!
//! Each job is a free function over injected clients and stores, so tests
//! run them against mocks with no network or fixed paths. Jobs are
//! sequential by design — the workload is a few thousand records processed
//! a few times ever — with a courtesy delay between external calls.

use std::time::Duration;

use gm_match::{Adjudicator, CongressEvent, MatchReport, Matcher, VideoRecord};

use crate::config::Config;
use crate::congress::{CongressApiClient, EventCollector};
use crate::progress::ProgressStore;
use crate::report;
use crate::youtube::api::VIDEOS_BATCH_SIZE;
use crate::youtube::feed::{livestream_confidence, FeedClient};
use crate::youtube::types::VideoItem;
use crate::youtube::YouTubeApiClient;

/// Fetch, filter, and persist the committee-meeting event set.
///
/// # Errors
/// Returns an error when the checkpoint store or the output file fails;
/// individual fetch failures only reduce the dataset.
pub async fn fetch_events(
    config: &Config,
    client: &dyn CongressApiClient,
    store: &dyn ProgressStore,
) -> anyhow::Result<Vec<CongressEvent>> {
    let collector = EventCollector::new(client, store, &config.congress, &config.fetch);
    let events = collector.collect().await?;

    let path = config.storage.events_path();
    report::write_json_file(&events, &path)?;
    store.clear()?;
    tracing::info!(path = %path.display(), total = events.len(), "events written");
    Ok(events)
}

/// Fetch videos for every configured channel and persist them.
///
/// Uses the Data API when a client is provided (authoritative live-stream
/// dates), channel feeds otherwise. A failing channel is logged and
/// skipped; the run continues with a reduced dataset.
///
/// # Errors
/// Returns an error only when the output file cannot be written.
pub async fn fetch_videos(
    config: &Config,
    api: Option<&dyn YouTubeApiClient>,
    feed: &FeedClient,
) -> anyhow::Result<Vec<VideoRecord>> {
    let mut videos: Vec<VideoRecord> = Vec::new();

    for channel in &config.youtube.channels {
        let channel_videos = match api {
            Some(api) => fetch_channel_via_api(config, api, channel).await,
            None => fetch_channel_via_feed(feed, channel).await,
        };
        tracing::info!(channel = %channel, videos = channel_videos.len(), "channel fetched");
        videos.extend(channel_videos);
        throttle(config.fetch.throttle_ms).await;
    }

    dedupe_videos(&mut videos);
    sort_videos_newest_first(&mut videos);

    let path = config.storage.videos_path();
    report::write_json_file(&videos, &path)?;
    tracing::info!(path = %path.display(), total = videos.len(), "videos written");
    Ok(videos)
}

async fn fetch_channel_via_feed(feed: &FeedClient, channel: &str) -> Vec<VideoRecord> {
    let entries = match feed.fetch(channel).await {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(channel = %channel, error = %error, "feed fetch failed, skipping channel");
            return Vec::new();
        }
    };

    let total = entries.len();
    let kept: Vec<VideoRecord> = entries
        .into_iter()
        .filter(|e| livestream_confidence(&e.title).is_some())
        .map(|e| VideoRecord {
            video_id: e.video_id.clone(),
            title: e.title.clone(),
            date: e.published,
            url: e.url(),
        })
        .collect();
    tracing::debug!(
        channel = %channel,
        kept = kept.len(),
        skipped = total - kept.len(),
        "feed entries filtered by livestream heuristic"
    );
    kept
}

async fn fetch_channel_via_api(
    config: &Config,
    api: &dyn YouTubeApiClient,
    channel: &str,
) -> Vec<VideoRecord> {
    let max_results = config.youtube.max_results as usize;
    let mut ids: Vec<String> = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        match api.completed_livestreams(channel, page_token.as_deref()).await {
            Ok(page) => {
                ids.extend(page.items.into_iter().filter_map(|i| i.id.video_id));
                page_token = page.next_page_token;
                if page_token.is_none() || ids.len() >= max_results {
                    break;
                }
            }
            Err(error) => {
                tracing::warn!(channel = %channel, error = %error, "search failed, keeping partial list");
                break;
            }
        }
        throttle(config.fetch.throttle_ms).await;
    }
    ids.truncate(max_results);

    let mut videos = Vec::new();
    for chunk in ids.chunks(VIDEOS_BATCH_SIZE) {
        match api.video_details(chunk).await {
            Ok(items) => videos.extend(
                items
                    .into_iter()
                    // Completed search results occasionally include plain
                    // uploads; only actual live broadcasts are proceedings.
                    .filter(|i| i.live_streaming_details.is_some())
                    .map(VideoItem::into_record),
            ),
            Err(error) => {
                tracing::warn!(channel = %channel, error = %error, "detail fetch failed for a batch");
            }
        }
        throttle(config.fetch.throttle_ms).await;
    }
    videos
}

/// Match the persisted videos against the persisted events and write the
/// report (JSON + CSV).
///
/// # Errors
/// Returns an error when a dataset cannot be read or the report cannot be
/// written.
pub async fn run_match(
    config: &Config,
    adjudicator: Option<&dyn Adjudicator>,
) -> anyhow::Result<MatchReport> {
    let events: Vec<CongressEvent> = report::read_json_file(&config.storage.events_path())?;
    let mut videos: Vec<VideoRecord> = report::read_json_file(&config.storage.videos_path())?;
    sort_videos_newest_first(&mut videos);

    tracing::info!(
        videos = videos.len(),
        events = events.len(),
        adjudicator = adjudicator.is_some(),
        "starting match run"
    );

    let matcher = Matcher::new(config.matcher.weights.clone(), config.matcher.policy.clone());
    let match_report = matcher.run(&videos, &events, adjudicator).await;

    report::write_json_file(&match_report, &config.storage.matches_path())?;
    report::write_csv(&match_report, &config.storage.csv_path())?;
    Ok(match_report)
}

/// Re-export the persisted match report as CSV.
///
/// # Errors
/// Returns an error when the report cannot be read or the CSV written.
pub fn export_csv(config: &Config) -> anyhow::Result<()> {
    let match_report: MatchReport = report::read_json_file(&config.storage.matches_path())?;
    let path = config.storage.csv_path();
    report::write_csv(&match_report, &path)?;
    tracing::info!(
        path = %path.display(),
        rows = match_report.matches.len() + match_report.unmatched.len(),
        "CSV exported"
    );
    Ok(())
}

fn dedupe_videos(videos: &mut Vec<VideoRecord>) {
    let mut seen = std::collections::HashSet::new();
    videos.retain(|v| seen.insert(v.video_id.clone()));
}

/// Newest first; undated videos sink to the end. Processing order is part
/// of the output contract, so this must stay stable.
fn sort_videos_newest_first(videos: &mut [VideoRecord]) {
    videos.sort_by(|a, b| b.date.cmp(&a.date));
}

async fn throttle(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn video(id: &str, d: Option<&str>) -> VideoRecord {
        VideoRecord {
            video_id: id.into(),
            title: "Hearing".into(),
            date: d.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()),
            url: format!("https://www.youtube.com/watch?v={id}"),
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let mut videos = vec![
            video("a", Some("2024-03-05")),
            video("b", Some("2024-03-06")),
            video("a", Some("2024-03-07")),
        ];
        dedupe_videos(&mut videos);
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].date, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn sort_is_reverse_chronological_with_undated_last() {
        let mut videos = vec![
            video("old", Some("2023-01-01")),
            video("undated", None),
            video("new", Some("2024-03-05")),
        ];
        sort_videos_newest_first(&mut videos);
        let ids: Vec<&str> = videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
    }
}
