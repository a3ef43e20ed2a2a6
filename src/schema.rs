use serde::Serialize;
use tracing::warn;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Quote records & the ranked daily table
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Day-over-day movement of a single stock; one per successfully fetched ticker.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub percent_change: f64,
}

impl Quote {
    /// Build a quote from a closing-price series, oldest first.
    ///
    /// Requires at least 2 data points; anything less returns `None` (the
    /// ticker is skipped, not errored). Both the price and the percentage are
    /// rounded to 2 decimal places, and the `.IS` exchange suffix is stripped
    /// from the symbol.
    pub fn from_closes(ticker: &str, closes: &[f64]) -> Option<Self> {
        if closes.len() < 2 {
            return None;
        }
        let latest = closes[closes.len() - 1];
        let previous = closes[closes.len() - 2];
        let percent_change = (latest - previous) / previous * 100.0;

        Some(Self {
            symbol: ticker.strip_suffix(".IS").unwrap_or(ticker).to_string(),
            price: round2(latest),
            percent_change: round2(percent_change),
        })
    }
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// -------------------------------------------------------------------------------------------------

/// The day's quotes, sorted by percent change, best performer first.
#[derive(Debug, Default)]
pub struct RankedTable(pub Vec<Quote>);

impl RankedTable {
    pub fn from_quotes(mut quotes: Vec<Quote>) -> Self {
        quotes.sort_by(|a, b| {
            b.percent_change
                .partial_cmp(&a.percent_change)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self(quotes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mean percent change across the whole table; 0.0 for an empty table.
    pub fn mean_change(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.0.iter().map(|q| q.percent_change).sum();
        sum / self.0.len() as f64
    }

    pub fn sentiment(&self) -> Sentiment {
        if self.mean_change() > 0.0 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    /// Best `n` rows. May be fewer on a short table.
    pub fn head(&self, n: usize) -> &[Quote] {
        &self.0[..n.min(self.0.len())]
    }

    /// Last `n` rows of the sorted order, i.e. the worst performers.
    ///
    /// On a table of `n * 2` rows or fewer this overlaps with [`head`]; that
    /// matches the upstream report behaviour and is left as-is.
    ///
    /// [`head`]: #method.head
    pub fn tail(&self, n: usize) -> &[Quote] {
        &self.0[self.0.len() - n.min(self.0.len())..]
    }

    /// Render the full table as a markdown table, ranked order preserved.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("| Kod | Fiyat | Degisim |\n|---|---:|---:|\n");
        for quote in &self.0 {
            out.push_str(&format!(
                "| {} | {:.2} | {:.2} |\n",
                quote.symbol, quote.price, quote.percent_change
            ));
        }
        out
    }
}

/// Coarse classification of the table's mean percent change. Strictly above
/// zero counts as positive; zero and below as negative. No neutral band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POZİTİF 🟢",
            Sentiment::Negative => "NEGATİF 🔴",
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Per-run accounting of the fetch stage, so skipped tickers are observable
/// instead of silently vanishing.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub requested: usize,
    pub fetched: usize,
    pub skipped: Vec<Skip>,
}

#[derive(Debug)]
pub struct Skip {
    pub ticker: String,
    pub reason: String,
}

impl FetchReport {
    pub fn skip(&mut self, ticker: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("[{ticker}] skipped: {reason}");
        self.skipped.push(Skip {
            ticker: ticker.to_string(),
            reason,
        });
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
