//! DASH WebVTT extractor
//!
//! Downloads the subtitle representation of a DASH stream as fMP4 segment
//! files and merges them into a single WebVTT document: box decoding,
//! per-fragment cue slicing, timeline reconstruction and cross-segment
//! deduplication.

mod config;
mod download;
mod error;
mod extract;
mod mp4;
mod segment;
mod vtt;

#[cfg(test)]
mod integration;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::DownloadConfig;
use crate::error::{Result, VttError};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "dashvtt";

#[derive(Debug, Parser)]
#[command(name = APP_NAME, version, about = "Extract WebVTT subtitles from DASH segment streams")]
struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge a folder of downloaded segments into one .vtt file
    Extract {
        /// Folder holding the segment files
        #[arg(short, long, default_value = "dash")]
        input: PathBuf,

        /// Output file; ".vtt" is appended when no extension is given
        output: PathBuf,
    },
    /// Download the segment files of a subtitle representation
    Download {
        /// URL of any one segment of the representation
        url: Option<String>,

        /// TOML configuration file; the URL argument overrides its stream_url
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory the segments are written to
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Index step between consecutive segments
        #[arg(long)]
        segment_step: Option<u64>,

        /// Value substituted into the qsm= quality selector
        #[arg(long)]
        segment_size: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!("{} v{} starting", APP_NAME, VERSION);

    match cli.command {
        Command::Extract { input, output } => {
            let output = normalize_output(output);
            extract::extract_vtt_from_dash(&input, &output)?;
        }
        Command::Download {
            url,
            config,
            out_dir,
            segment_step,
            segment_size,
        } => {
            let mut config = match (config, url) {
                (Some(path), url) => {
                    let mut loaded = DownloadConfig::from_file(&path)?;
                    if let Some(url) = url {
                        loaded.stream_url = url;
                    }
                    loaded
                }
                (None, Some(url)) => DownloadConfig::for_url(url),
                (None, None) => {
                    return Err(VttError::Config(
                        "either a segment URL or a --config file is required".into(),
                    ));
                }
            };
            if let Some(out_dir) = out_dir {
                config.output_dir = out_dir;
            }
            if let Some(step) = segment_step {
                config.segment_step = step;
            }
            if let Some(size) = segment_size {
                config.segment_size = size;
            }
            download::download_segments(&config).await?;
        }
    }

    Ok(())
}

/// Make sure the output file carries a `.vtt` suffix.
fn normalize_output(output: PathBuf) -> PathBuf {
    match output.extension() {
        None => output.with_extension("vtt"),
        Some(ext) if ext != "vtt" => {
            tracing::warn!("output file {} has a non-vtt extension", output.display());
            output
        }
        Some(_) => output,
    }
}

/// Initialize logging with tracing
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "dashvtt=warn",
        1 => "dashvtt=info",
        _ => "dashvtt=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
