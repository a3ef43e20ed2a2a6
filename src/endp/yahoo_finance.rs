use crate::schema::{FetchReport, Quote, RankedTable};
use crate::ui;
use anyhow::Result;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, trace, warn};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Prices from Yahoo Finance, per ticker
//
////////////////////////////////////////////////////////////////////////////////////////////////////

fn url(ticker: &str, interval: &str, range: &str) -> String {
    let tckr = ticker.to_uppercase();
    format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{tckr}?symbol={tckr}&interval={interval}&range={range}",
    )
}

/// Fetch the trailing two sessions for every ticker and rank the survivors by
/// percent change.
///
/// Failure isolation is per-ticker: a fetch or parse error, or a history of
/// fewer than 2 closes, drops that ticker into the [`FetchReport`] and the run
/// moves on. An all-fail input simply yields an empty table.
pub async fn fetch_quotes(client: &Client, tickers: &[String]) -> (RankedTable, FetchReport) {
    let pb = ui::single_pb(tickers.len() as u64);

    let results: Vec<(String, Result<Vec<f64>>)> = futures::stream::iter(tickers.to_vec())
        .map(|ticker| {
            let client = client.clone();
            let pb = pb.clone();
            async move {
                let closes = fetch_closes(&client, &ticker).await;
                pb.inc(1);
                (ticker, closes)
            }
        })
        .buffer_unordered(num_cpus::get())
        .collect()
        .await;
    pb.finish_and_clear();

    let mut report = FetchReport {
        requested: tickers.len(),
        ..Default::default()
    };
    let mut quotes = Vec::with_capacity(results.len());
    for (ticker, outcome) in results {
        match outcome {
            Ok(closes) => match Quote::from_closes(&ticker, &closes) {
                Some(quote) => {
                    trace!("[{ticker}] {:+.2}%", quote.percent_change);
                    quotes.push(quote);
                    report.fetched += 1;
                }
                None => report.skip(&ticker, "fewer than 2 closing prices"),
            },
            Err(e) => report.skip(&ticker, e.to_string()),
        }
    }

    (RankedTable::from_quotes(quotes), report)
}

/// Closing prices of a single stock, oldest first.
async fn fetch_closes(client: &Client, ticker: &str) -> Result<Vec<f64>> {
    let url = url(ticker, "1d", "2d");
    trace!("[{ticker}] fetching price data from Yahoo Finance");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| {
            error!("[{ticker}] price fetching error: {e}\nURL: {url}");
            e
        })?
        .error_for_status()?;

    let history: PriceHistory = response.json().await.map_err(|e| {
        error!("[{ticker}] deserialization error: {e}\nURL: {url}");
        e
    })?;

    Ok(closes(ticker, history))
}

fn closes(ticker: &str, history: PriceHistory) -> Vec<f64> {
    match history
        .chart
        .result
        .and_then(|data| data.into_iter().next())
    {
        Some(base) => base
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|series| series.close)
            .unwrap_or_default(),
        None => {
            warn!("[{ticker}] contained no \"chart.result\" object");
            vec![]
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Debug)]
pub struct PriceHistory {
    pub chart: PriceResponse,
}

#[derive(Deserialize, Debug)]
pub struct PriceResponse {
    pub result: Option<Vec<PriceCategories>>,
}

#[derive(Deserialize, Debug)]
pub struct PriceCategories {
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    pub quote: Vec<CloseSeries>,
}

#[derive(Deserialize, Debug)]
pub struct CloseSeries {
    pub close: Vec<f64>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
