use crate::error::ConfigError;
use crate::types::QuoteSet;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_USER_AGENT: &str = "pradon-bot";
pub const DEFAULT_SUBREDDIT: &str = "quotes";
pub const DEFAULT_OPT_OUT_MARKER: &str = "!nopost";
pub const DEFAULT_DATABASE_PATH: &str = "comments.db";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

pub const DEFAULT_KEYWORDS: [&str; 7] = [
    "reality", "soul", "wisdom", "life", "human", "freedom", "power",
];

pub const DEFAULT_QUOTES: [&str; 10] = [
    "We are the creators of our own reality, the architects of our own destiny.",
    "The soul, like the mind, is never truly free until it has reconciled itself with the uncertainties of existence.",
    "In every moment, we must choose between despair and hope, for it is only through choice that we find meaning.",
    "The true path to wisdom is not through reason alone, but through the balance of emotion and intellect.",
    "Life does not follow the rules of logic; it unfolds in mysterious and unpredictable ways, challenging us to adapt.",
    "To be human is to be constantly in conflict with the world, yet also to find beauty within that struggle.",
    "It is not enough to seek answers; we must embrace the questions that lead us to deeper understanding.",
    "Freedom is not given to us, it is something we must claim for ourselves.",
    "We are all part of a greater story, one that transcends our individual lives and connects us to something far more profound.",
    "True power lies in the ability to shape the world around us, but even more so in the capacity to shape our own thoughts.",
];

/// Runtime configuration, resolved once at startup and passed by reference
/// into everything that needs it.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub subreddit: String,
    pub keywords: Vec<String>,
    pub opt_out_marker: String,
    pub quotes: QuoteSet,
    pub database_path: String,
    pub poll_interval: Duration,
    pub restart_delay: Duration,
}

impl BotConfig {
    /// Loads configuration from the process environment, reading a `.env`
    /// file first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_err() {
            warn!("No .env file found, using process environment only");
        }

        let keywords = match env::var("KEYWORDS") {
            Ok(raw) => parse_keywords(&raw)?,
            Err(_) => DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        };

        let quotes = match env::var("QUOTES_FILE") {
            Ok(path) => load_quotes(&path)?,
            Err(_) => QuoteSet::new(DEFAULT_QUOTES.iter().map(|q| q.to_string()).collect())?,
        };

        let poll_interval_secs: u64 = env_var_or("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "POLL_INTERVAL_SECS".to_string(),
                value: "0".to_string(),
            });
        }
        let restart_delay_ms: u64 = env_var_or("RESTART_DELAY_MS", 0)?;

        Ok(Self {
            client_id: require_env("CLIENT_ID")?,
            client_secret: require_env("CLIENT_SECRET")?,
            username: require_env("USERNAME")?,
            password: require_env("PASSWORD")?,
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            subreddit: env::var("SUBREDDIT").unwrap_or_else(|_| DEFAULT_SUBREDDIT.to_string()),
            keywords,
            opt_out_marker: env::var("OPT_OUT_MARKER")
                .unwrap_or_else(|_| DEFAULT_OPT_OUT_MARKER.to_string()),
            quotes,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
            poll_interval: Duration::from_secs(poll_interval_secs),
            restart_delay: Duration::from_millis(restart_delay_ms),
        })
    }
}

fn require_env(var_name: &str) -> Result<String, ConfigError> {
    match env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvironmentVariable {
            var_name: var_name.to_string(),
        }),
    }
}

fn env_var_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: key.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

fn parse_keywords(raw: &str) -> Result<Vec<String>, ConfigError> {
    let keywords: Vec<String> = raw
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "KEYWORDS".to_string(),
            value: raw.to_string(),
        });
    }
    Ok(keywords)
}

fn load_quotes(path: &str) -> Result<QuoteSet, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_string(),
    })?;
    let quotes: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    if quotes.is_empty() {
        return Err(ConfigError::ValidationFailed {
            reason: format!("quotes file {} contains no quotes", path),
        });
    }
    QuoteSet::new(quotes)
}
