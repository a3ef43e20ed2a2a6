use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*, TraceLevel};
use dotenv::dotenv;
use tracing::{debug, error, info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

use bist_daily::config::Config;
use bist_daily::endp::{gemini, is_yatirim, telegram, yahoo_finance as yf};
use bist_daily::report;

mod cli;

fn preprocess(trace_level: Level) {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level);
    trace!("Command line input recorded: {cli:#?}");

    let cfg = Config::from_env();
    let http_client = reqwest::ClientBuilder::new()
        .user_agent(&cfg.user_agent)
        .build()?;

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // cli framework:
    // "> bist-daily <COMMAND>"
    match &cli.command {
        // "> bist-daily run"
        // the full daily pass; every stage degrades rather than aborting
        Run => run_daily(&http_client, &cfg).await,

        // "> bist-daily tickers"
        // print the scraped constituent list (or the fallback)
        Tickers => {
            let tickers = is_yatirim::list_tickers(&http_client).await;
            for ticker in &tickers {
                println!("{ticker}");
            }
        }

        // "> bist-daily rm [reports]"
        // remove generated directories
        Rm { directories } => {
            use cli::RmArgs::*;

            if directories.contains(&Reports) {
                trace!("Removing directory: {}", cfg.reports_dir.display());
                tokio::fs::remove_dir_all(&cfg.reports_dir).await?;
            }

            debug!("Removed directories: {directories:#?}");
        }
    }

    Ok(())
}

async fn run_daily(http_client: &reqwest::Client, cfg: &Config) {
    info!("Scraping BIST 100 constituents");
    let tickers = is_yatirim::list_tickers(http_client).await;

    info!("Fetching price data ({} tickers)", tickers.len());
    let (table, fetch_report) = yf::fetch_quotes(http_client, &tickers).await;
    debug!(
        "{}/{} tickers fetched, {} skipped",
        fetch_report.fetched,
        fetch_report.requested,
        fetch_report.skipped.len()
    );

    if table.is_empty() {
        error!("no price data fetched; nothing to report");
        return;
    }

    info!("Summarizing the close ({} rows)", table.len());
    let summary = gemini::summarize(http_client, cfg, &table).await;

    let today = chrono::Local::now().date_naive();
    match report::save_report(cfg, today, &summary, &table).await {
        Ok(path) => info!("Report saved: {}", path.display()),
        Err(e) => error!("Report save failed: {e}"),
    }

    telegram::notify(http_client, cfg, &summary).await;
}
