use std::env;
use std::path::PathBuf;

/// Browser-like default; the constituent page refuses the reqwest default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Runtime configuration, read once from the environment and passed into each
/// stage. Missing credentials degrade the owning feature to a no-op; they
/// never abort a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub reports_dir: PathBuf,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            telegram_token: non_empty_var("TELEGRAM_TOKEN"),
            telegram_chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
            reports_dir: env::var("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("reports")),
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// A config with every credential unset; used to exercise the degraded paths.
    #[cfg(test)]
    pub(crate) fn unconfigured() -> Self {
        Self {
            gemini_api_key: None,
            telegram_token: None,
            telegram_chat_id: None,
            reports_dir: PathBuf::from("reports"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
