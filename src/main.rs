use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use serp_tracker::{
    info_time, EngineKind, Tracker, TrackerConfig, TrackingRequest, DEFAULT_RESULT_LIMIT,
};
use tracing_subscriber::EnvFilter;

/// Track the position of a site in search results for a list of keywords.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Keywords to search for
    #[arg(required = true)]
    keywords: Vec<String>,

    /// Site to look for, as displayed in the results (e.g. en.wikipedia.org)
    #[arg(short, long)]
    site: String,

    /// Number of results to search through
    #[arg(short, long, default_value_t = DEFAULT_RESULT_LIMIT)]
    limit: usize,

    /// Newline-delimited list of proxies; one is picked at random
    #[arg(long, env = "SERP_PROXY_FILE")]
    proxy_file: Option<PathBuf>,

    /// Custom URL template with {keyword} and {position} slots, instead of Google
    #[arg(long)]
    template: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_configuration() => {
            tracing::error!("configuration error: {e}");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> serp_tracker::Result<()> {
    let start_time = Local::now();

    let request = TrackingRequest::new(args.keywords, args.site, args.limit)?;
    let mut config = TrackerConfig::new(request);
    if let Some(template) = args.template {
        config = config.with_engine(EngineKind::Template(template));
    }
    if let Some(path) = args.proxy_file {
        config = config.with_proxy_file(path);
    }

    let tracker = Tracker::from_config(config)?;
    let report = tracker.run().await;

    for keyword in tracker.request().keywords() {
        match (report.found.get(keyword), report.elapsed_secs(keyword)) {
            (Some(position), Some(secs)) => println!("{keyword:<30} {position:>5} {secs:>8.3}s"),
            _ => println!("{keyword:<30} {:>5}", "-"),
        }
    }
    info_time!(start_time, "Full program time:");

    Ok(())
}
