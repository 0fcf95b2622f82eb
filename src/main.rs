//! Command-line entry point for postmedia-dl

use clap::Parser;
use postmedia_dl::{Config, Error, Event, PostDownloader, input};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Download the images of social-media posts through a headless browser session
#[derive(Parser, Debug)]
#[command(name = "postmedia-dl", version, about)]
struct Cli {
    /// Text file containing links to posts
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// A single post link
    #[arg(long)]
    url: Option<String>,

    /// Output directory for downloaded images
    #[arg(short, long)]
    output: PathBuf,

    /// Base URL of the rendering service
    #[arg(long)]
    renderer_url: Option<String>,

    /// Maximum posts processed simultaneously
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> postmedia_dl::Result<()> {
    input::ensure_output_dir(&cli.output)?;

    let posts: Vec<Url> = if let Some(file) = &cli.file {
        input::read_post_links(file)?
    } else if let Some(link) = &cli.url {
        vec![input::parse_post_link(link)?]
    } else {
        return Err(Error::Config {
            message: "either --url or --file must be provided".to_string(),
            key: None,
        });
    };
    println!("{} post links found.", posts.len());

    let mut config = Config::default();
    if let Some(base_url) = cli.renderer_url {
        config.renderer.base_url = base_url;
    }
    if let Some(concurrency) = cli.concurrency {
        config.download.max_concurrent_posts = concurrency;
    }

    let downloader = PostDownloader::new(config)?;

    let cancel = downloader.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("cancelling, draining posts in flight...");
            cancel.cancel();
        }
    });

    let mut events = downloader.subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::MediaFound {
                    index,
                    url,
                    images,
                    videos,
                } => println!("[{index}] Found {images} images, {videos} videos in {url}."),
                Event::PostCompleted {
                    index,
                    url,
                    unhandled_videos: 0,
                } => println!("✅ [{index}] Finished {url}."),
                Event::PostCompleted {
                    index,
                    url,
                    unhandled_videos,
                } => println!(
                    "✅ [{index}] Finished {url} ({unhandled_videos} videos left for other tools)."
                ),
                Event::PostFailed { index, url, error } => {
                    println!("❌ [{index}] {url}: {error}");
                }
                _ => {}
            }
        }
    });

    let report = downloader.run(posts, &cli.output).await?;
    progress.abort();

    println!("✅ Finished. {} failed.", report.failed_posts.len());
    let written = report.write_reports(&cli.output)?;
    if let Some(path) = written.failed {
        println!("See {} for posts that failed.", path.display());
    }
    if let Some(path) = written.videos {
        println!(
            "See {} for video links. You will need other tools to download them.",
            path.display()
        );
    }
    Ok(())
}
