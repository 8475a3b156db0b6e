//! yt-insights
//!
//! Collects video metadata, analytics snapshots and comments for one channel
//! and writes them as JSON tables.
//!
//! Usage:
//!   yt-insights videos                           # every upload of YT_CHANNEL_ID
//!   yt-insights videos --from 2025-01-01 --to 2025-03-31
//!   yt-insights analytics ID1 ID2                # snapshots for specific videos
//!   yt-insights comments --translate             # comments, anonymized and translated
//!   yt-insights all --no-anonymize

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use yt_insights::model::Comment;
use yt_insights::{analytics, comments, playlist, translate, videos};
use yt_insights::{Anonymizer, Config, VideoTable, YouTubeClient};

#[derive(Debug, Parser)]
#[command(name = "yt-insights", version, about = "YouTube channel metrics and comment collection")]
struct Cli {
    /// TOML configuration file (environment variables override it)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory the JSON tables are written to
    #[arg(long, default_value = "output")]
    out: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Video metadata table
    Videos(Selection),
    /// Per-interval analytics snapshots
    Analytics(Selection),
    /// Comment and reply table
    Comments {
        #[command(flatten)]
        selection: Selection,
        #[command(flatten)]
        options: CommentOptions,
    },
    /// Everything above
    All {
        #[command(flatten)]
        selection: Selection,
        #[command(flatten)]
        options: CommentOptions,
    },
}

/// Which videos to process. Without ids the channel's uploads are enumerated.
#[derive(Debug, Args)]
struct Selection {
    /// Explicit video ids
    ids: Vec<String>,
    /// Only videos published on or after this date (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    /// Only videos published up to this date (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct CommentOptions {
    /// Translate comment text (source/target languages from config)
    #[arg(long)]
    translate: bool,
    /// Keep original author names
    #[arg(long)]
    no_anonymize: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenv::dotenv().ok();
    let config = Config::from_sources(cli.config.as_deref())?;
    info!("Loaded configuration");

    let client = YouTubeClient::new(&config.api)?;

    match &cli.command {
        Command::Videos(selection) => {
            let table = run_videos(&client, &config, selection).await?;
            write_table(&cli.out, "videos", &table.values().collect::<Vec<_>>())?;
        }
        Command::Analytics(selection) => {
            let table = run_videos(&client, &config, selection).await?;
            run_analytics(&client, &config, &table, &cli.out).await?;
        }
        Command::Comments { selection, options } => {
            let ids = select_ids(&client, &config, selection).await?;
            run_comments(&client, &config, &ids, options, &cli.out).await?;
        }
        Command::All { selection, options } => {
            let table = run_videos(&client, &config, selection).await?;
            write_table(&cli.out, "videos", &table.values().collect::<Vec<_>>())?;
            run_analytics(&client, &config, &table, &cli.out).await?;
            let ids: Vec<String> = table.keys().cloned().collect();
            run_comments(&client, &config, &ids, options, &cli.out).await?;
        }
    }

    Ok(())
}

/// Resolve the ids to work on
async fn select_ids(client: &YouTubeClient, config: &Config, selection: &Selection) -> Result<Vec<String>> {
    if !selection.ids.is_empty() {
        return Ok(selection.ids.clone());
    }

    let channel_id = config.channel.id.as_deref();
    let ids = match (selection.from, selection.to) {
        (Some(from), Some(to)) => {
            if from > to {
                bail!("--from {} is after --to {}", from, to);
            }
            playlist::fetch_video_ids_in_period(client, channel_id, from, to).await?
        }
        _ => playlist::fetch_video_universe(client, channel_id)
            .await?
            .into_keys()
            .collect(),
    };
    Ok(ids)
}

async fn run_videos(client: &YouTubeClient, config: &Config, selection: &Selection) -> Result<VideoTable> {
    let ids = select_ids(client, config, selection).await?;
    info!("Fetching metadata for {} videos", ids.len());
    Ok(videos::fetch_videos(client, client, &ids).await)
}

async fn run_analytics(client: &YouTubeClient, config: &Config, table: &VideoTable, out: &Path) -> Result<()> {
    let rows = analytics::fetch_metrics_over_time(client, config.channel.id.as_deref(), table).await;
    write_table(out, "analytics", &rows)
}

async fn run_comments(
    client: &YouTubeClient,
    config: &Config,
    ids: &[String],
    options: &CommentOptions,
    out: &Path,
) -> Result<()> {
    let fetched = comments::fetch_comments(client, ids).await;

    let mut rows: Vec<Comment> = if options.no_anonymize {
        fetched
    } else {
        let anonymized = Anonymizer::new(config.anonymize.exempt_author.clone()).anonymize(fetched)?;
        let (rows, authors) = anonymized.into_parts();
        info!("Replaced {} author names", authors.len());
        rows
    };

    if options.translate {
        let translator = translate::from_config(&config.translation)?;
        let t = &config.translation;
        translate::translate_comments(translator.as_ref(), &mut rows, &t.source_lang, &t.target_lang).await;
    }

    write_table(out, "comments", &rows)
}

fn write_table<T: Serialize>(dir: &Path, name: &str, rows: &T) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{}.json", name));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows)?;
    info!("Wrote {}", path.display());
    Ok(())
}
