use crate::config::Config;
use crate::schema::{Quote, RankedTable};
use anyhow::{anyhow, bail, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, trace, warn};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Daily close commentary from the Gemini generateContent API
//
////////////////////////////////////////////////////////////////////////////////////////////////////

static MODEL: &str = "gemini-1.5-flash";

/// Returned verbatim when no API key is configured.
pub static MISSING_KEY: &str = "API Key eksik.";

/// Natural-language commentary on the ranked table.
///
/// Never fails: an unset key returns [`MISSING_KEY`] without touching the
/// network, and any request failure comes back as readable error text that
/// flows into the report and the notification as-is.
pub async fn summarize(client: &Client, cfg: &Config, table: &RankedTable) -> String {
    let Some(api_key) = cfg.gemini_api_key.as_deref() else {
        warn!("GEMINI_API_KEY unset; skipping AI summary");
        return MISSING_KEY.to_string();
    };

    let prompt = build_prompt(table);
    trace!("prompting {MODEL} with {} chars", prompt.len());
    match generate(client, api_key, &prompt).await {
        Ok(text) => text,
        Err(e) => {
            error!("Gemini request failed: {e}");
            format!("AI Hatası: {e}")
        }
    }
}

/// Fixed-shape prompt: overall sentiment with the mean, the 5 best rows, and
/// the last 5 rows of the ranked order. On a table of 10 rows or fewer the
/// two sections overlap; that mirrors the report this replaces.
fn build_prompt(table: &RankedTable) -> String {
    format!(
        "BIST 100 Günlük Kapanış Analizi Hazırla.\n\
         \n\
         GENEL DURUM: {} (Ort: %{:.2})\n\
         \n\
         YÜKSELENLER:\n{}\n\
         \n\
         DÜŞENLER:\n{}\n",
        table.sentiment().label(),
        table.mean_change(),
        rows(table.head(5)),
        rows(table.tail(5)),
    )
}

fn rows(quotes: &[Quote]) -> String {
    quotes
        .iter()
        .map(|q| format!("{:<8} {:>10.2} {:>8.2}", q.symbol, q.price, q.percent_change))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn generate(client: &Client, api_key: &str, prompt: &str) -> Result<String> {
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent?key={api_key}"
    );
    let request = GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
    };

    let response = client.post(&url).json(&request).send().await?;
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        bail!("API error ({}): {detail}", status.as_u16());
    }

    let body: GenerateContentResponse = response.json().await?;
    if let Some(err) = body.error {
        bail!("API error: {}", err.message);
    }

    body.candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| anyhow!("empty response"))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// (De)serialization
//
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize, Debug)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Debug)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Quote;

    fn table(rows: &[(&str, f64, f64)]) -> RankedTable {
        RankedTable::from_quotes(
            rows.iter()
                .map(|(symbol, price, pc)| Quote {
                    symbol: symbol.to_string(),
                    price: *price,
                    percent_change: *pc,
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn missing_key_returns_placeholder_without_request() {
        let cfg = Config::unconfigured();
        let client = Client::new();
        let table = table(&[("AAA", 11.0, 10.0)]);
        // offline-safe: the key check short-circuits before any I/O
        assert_eq!(summarize(&client, &cfg, &table).await, MISSING_KEY);
    }

    #[test]
    fn prompt_carries_sentiment_and_sections() {
        let prompt = build_prompt(&table(&[("AAA", 11.0, 10.0), ("BBB", 19.0, -5.0)]));
        assert!(prompt.contains("POZİTİF"));
        assert!(prompt.contains("(Ort: %2.50)"));
        assert!(prompt.contains("YÜKSELENLER:"));
        assert!(prompt.contains("DÜŞENLER:"));
        assert!(prompt.contains("AAA"));
        assert!(prompt.contains("BBB"));
    }

    #[test]
    fn prompt_sections_overlap_on_short_tables() {
        let prompt = build_prompt(&table(&[("AAA", 11.0, 10.0)]));
        // a 1-row table shows the same symbol as gainer and loser
        assert_eq!(prompt.matches("AAA").count(), 2);
    }

    #[test]
    fn prompt_survives_empty_table() {
        let prompt = build_prompt(&RankedTable::default());
        assert!(prompt.contains("NEGATİF"));
        assert!(prompt.contains("(Ort: %0.00)"));
        assert!(prompt.contains("YÜKSELENLER:\n\n"));
    }

    #[test]
    fn response_text_extraction() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Bugün piyasa pozitifti."}]},
                "finishReason": "STOP"
            }]
        }"#;
        let body: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text = body
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text);
        assert_eq!(text.as_deref(), Some("Bugün piyasa pozitifti."));
    }
}
