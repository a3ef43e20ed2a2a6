use anyhow::{anyhow, bail, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// BIST 100 constituents, scraped from the İş Yatırım fundamentals page
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub static INDEX_URL: &str =
    "https://www.isyatirim.com.tr/tr-tr/analiz/hisse/Sayfalar/Temel-Degerler-Ve-Oranlar.aspx?endeks=01";

/// Used whenever the scrape fails; a handful of the heaviest index members.
pub static FALLBACK_TICKERS: [&str; 4] = ["THYAO.IS", "GARAN.IS", "AKBNK.IS", "ASELS.IS"];

/// Exchange-suffixed constituent tickers, e.g. `"THYAO.IS"`.
///
/// Always returns something: any failure (network, missing table, empty
/// table) logs the condition and substitutes [`FALLBACK_TICKERS`].
pub async fn list_tickers(client: &Client) -> Vec<String> {
    match scrape_index(client).await {
        Ok(tickers) => {
            debug!("BIST 100 index scraped: {} tickers", tickers.len());
            tickers
        }
        Err(e) => {
            warn!("constituent scrape failed, falling back to fixed list: {e}");
            FALLBACK_TICKERS.iter().map(|t| t.to_string()).collect()
        }
    }
}

async fn scrape_index(client: &Client) -> Result<Vec<String>> {
    let body = client
        .get(INDEX_URL)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let tickers =
        parse_first_table(&body).ok_or_else(|| anyhow!("no ticker table in response"))?;
    if tickers.is_empty() {
        bail!("ticker table had no rows");
    }
    Ok(tickers)
}

/// First `<table>` of the document; the first cell of each body row holds the
/// stock code, which is mapped to `"{code}.IS"`. Header rows carry no `<td>`
/// and drop out naturally.
fn parse_first_table(html: &str) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table").ok()?;
    let row_sel = Selector::parse("tr").ok()?;
    let cell_sel = Selector::parse("td").ok()?;

    let table = document.select(&table_sel).next()?;
    let tickers = table
        .select(&row_sel)
        .filter_map(|row| {
            let cell = row.select(&cell_sel).next()?;
            let code = cell.text().collect::<String>().trim().to_string();
            (!code.is_empty()).then(|| format!("{code}.IS"))
        })
        .collect();
    Some(tickers)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
