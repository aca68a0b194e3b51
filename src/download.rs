//! Segment downloader
//!
//! Fetches the segment files of a DASH subtitle representation. The stream
//! end is not advertised anywhere, so it is probed by stepping the segment
//! index until a request fails.

use crate::config::DownloadConfig;
use crate::error::Result;

/// Hard ceiling on the probe, matching the segment-index width used in the
/// downloaded file names.
const MAX_SEGMENT_INDEX: u64 = 1_000_000_000;

/// Download every segment of the configured representation.
///
/// Segments are written as `<index:08>.mp4` inside the output directory,
/// which is created if absent.
pub async fn download_segments(config: &DownloadConfig) -> Result<()> {
    let client = reqwest::Client::new();

    let url = regex::Regex::new(r"qsm=\d+-")
        .unwrap()
        .replace(&config.stream_url, format!("qsm={}-", config.segment_size))
        .into_owned();

    std::fs::create_dir_all(&config.output_dir)?;

    tracing::info!("probing segment range of {}", url);
    let end = probe_segment_range(&client, &url, config.segment_step).await;
    tracing::info!(
        "downloading {} segments to {}",
        end / config.segment_step.max(1),
        config.output_dir.display()
    );

    let mut index = 0;
    while index < end {
        let segment_url = segment_url(&url, index);
        let data = client
            .get(&segment_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let path = config.output_dir.join(format!("{:08}.mp4", index));
        tokio::fs::write(&path, &data).await?;
        tracing::debug!("fetched {} ({} bytes)", segment_url, data.len());
        index += config.segment_step;
    }

    Ok(())
}

/// Substitute a segment index into the `-0.dash` position of the URL.
fn segment_url(url: &str, index: u64) -> String {
    url.replace("-0.dash", &format!("-{}.dash", index))
}

/// Step the segment index until a request fails; the failing index is the
/// exclusive upper bound of the stream.
async fn probe_segment_range(client: &reqwest::Client, url: &str, step: u64) -> u64 {
    let step = step.max(1);
    let mut index = 0;
    while index <= MAX_SEGMENT_INDEX {
        let available = match client.get(segment_url(url, index)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        };
        if !available {
            return index;
        }
        index += step;
    }
    tracing::warn!("segment probe hit the index ceiling at {}", index);
    index
}
