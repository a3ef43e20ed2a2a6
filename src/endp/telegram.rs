use crate::config::Config;
use reqwest::Client;
use tracing::{error, info, warn};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Chat notification via the Telegram Bot API
//
////////////////////////////////////////////////////////////////////////////////////////////////////

fn api_url(token: &str, method: &str) -> String {
    format!("https://api.telegram.org/bot{token}/{method}")
}

/// Post `text` to the configured chat. Best effort: unset credentials skip
/// the call with a log line, and a failed delivery is logged without
/// propagating. One POST, no retry.
pub async fn notify(client: &Client, cfg: &Config, text: &str) {
    let (Some(token), Some(chat_id)) = (cfg.telegram_token.as_deref(), cfg.telegram_chat_id.as_deref())
    else {
        warn!("Telegram credentials unset; notification skipped");
        return;
    };

    let body = serde_json::json!({
        "chat_id": chat_id,
        "text": text,
    });

    match client
        .post(api_url(token, "sendMessage"))
        .json(&body)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => {
            info!("Telegram notification sent");
        }
        Ok(response) => {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!("Telegram sendMessage failed ({status}): {detail}");
        }
        Err(e) => error!("Telegram connection failed: {e}"),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
