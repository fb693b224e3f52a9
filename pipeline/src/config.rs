use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use gm_match::{DecisionPolicy, ScoreWeights};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with GM_ prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub congress: CongressConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub adjudicator: AdjudicatorConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CongressConfig {
    /// Congress.gov API key (required for `fetch-events` — no compiled-in
    /// default).
    #[serde(default)]
    pub api_key: String,

    /// API base URL.
    #[serde(default = "default_congress_base_url")]
    pub base_url: String,

    /// Legislative sessions to fetch.
    #[serde(default = "default_congresses")]
    pub congresses: Vec<u16>,

    /// Chambers to fetch. Accepts either an array or a comma-separated
    /// string.
    #[serde(
        default = "default_chambers",
        deserialize_with = "deserialize_string_list"
    )]
    pub chambers: Vec<String>,

    /// Words that must all appear in a committee name for its events to be
    /// kept ("Energy", "Commerce"). Empty keeps every committee.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub committee_filter: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YouTubeConfig {
    /// YouTube Data API key. Empty means feed-only fetching.
    #[serde(default)]
    pub api_key: String,

    /// Data API base URL.
    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,

    /// Channel feed base URL.
    #[serde(default = "default_feed_base_url")]
    pub feed_base_url: String,

    /// Committee channel IDs to fetch. Accepts either an array or a
    /// comma-separated string.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub channels: Vec<String>,

    /// Maximum videos fetched per channel through the Data API.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// Matching weights and decision thresholds.
///
/// The defaults were never calibrated against a labeled validation set;
/// treat them as starting points and calibrate before relying on the
/// output in production.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub policy: DecisionPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdjudicatorConfig {
    /// Refer ambiguous matches to the language-model adjudicator.
    #[serde(default)]
    pub enabled: bool,

    /// Chat-completions base URL.
    #[serde(default = "default_adjudicator_base_url")]
    pub base_url: String,

    /// API key (required when `enabled` — no compiled-in default).
    #[serde(default)]
    pub api_key: String,

    /// Model identifier.
    #[serde(default = "default_adjudicator_model")]
    pub model: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Courtesy delay between external calls, in milliseconds.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Save a checkpoint every N detail fetches.
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: usize,

    /// Retries per item on rate limiting.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Wait between rate-limit retries, in seconds.
    #[serde(default = "default_retry_wait_secs")]
    pub retry_wait_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory for fetched datasets and reports.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_events_file")]
    pub events_file: String,

    #[serde(default = "default_videos_file")]
    pub videos_file: String,

    #[serde(default = "default_matches_file")]
    pub matches_file: String,

    #[serde(default = "default_csv_file")]
    pub csv_file: String,

    #[serde(default = "default_checkpoint_file")]
    pub checkpoint_file: String,
}

impl StorageConfig {
    #[must_use]
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(&self.events_file)
    }

    #[must_use]
    pub fn videos_path(&self) -> PathBuf {
        self.data_dir.join(&self.videos_file)
    }

    #[must_use]
    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(&self.matches_file)
    }

    #[must_use]
    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join(&self.csv_file)
    }

    #[must_use]
    pub fn checkpoint_path(&self) -> PathBuf {
        self.data_dir.join(&self.checkpoint_file)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Deserialize a list from a comma-separated string or array, filtering
/// empty values.
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(values.into_iter().filter(|s| !s.is_empty()).collect())
}

fn default_congress_base_url() -> String {
    "https://api.congress.gov/v3".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_congresses() -> Vec<u16> {
    vec![118, 119]
}

fn default_chambers() -> Vec<String> {
    vec!["House".to_string()]
}

fn default_youtube_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_feed_base_url() -> String {
    "https://www.youtube.com/feeds/videos.xml".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_results() -> u32 {
    500
}

fn default_adjudicator_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_adjudicator_model() -> String {
    "gpt-4o-mini".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_throttle_ms() -> u64 {
    100
}

#[allow(clippy::missing_const_for_fn)]
fn default_checkpoint_every() -> usize {
    100
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_retries() -> u32 {
    3
}

#[allow(clippy::missing_const_for_fn)]
fn default_retry_wait_secs() -> u64 {
    60
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_events_file() -> String {
    "congress_events.json".to_string()
}

fn default_videos_file() -> String {
    "videos.json".to_string()
}

fn default_matches_file() -> String {
    "matches.json".to_string()
}

fn default_csv_file() -> String {
    "matches.csv".to_string()
}

fn default_checkpoint_file() -> String {
    ".checkpoint_events.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CongressConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_congress_base_url(),
            congresses: default_congresses(),
            chambers: default_chambers(),
            committee_filter: Vec::new(),
        }
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_youtube_base_url(),
            feed_base_url: default_feed_base_url(),
            channels: Vec::new(),
            max_results: default_max_results(),
        }
    }
}

impl Default for AdjudicatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_adjudicator_base_url(),
            api_key: String::new(),
            model: default_adjudicator_model(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            checkpoint_every: default_checkpoint_every(),
            max_retries: default_max_retries(),
            retry_wait_secs: default_retry_wait_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            events_file: default_events_file(),
            videos_file: default_videos_file(),
            matches_file: default_matches_file(),
            csv_file: default_csv_file(),
            checkpoint_file: default_checkpoint_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            congress: CongressConfig::default(),
            youtube: YouTubeConfig::default(),
            matcher: MatcherConfig::default(),
            adjudicator: AdjudicatorConfig::default(),
            fetch: FetchConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with GM_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path.as_ref()))
            .merge(Env::prefixed("GM_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("congress.base_url", &self.congress.base_url),
            ("youtube.base_url", &self.youtube.base_url),
            ("youtube.feed_base_url", &self.youtube.feed_base_url),
            ("adjudicator.base_url", &self.adjudicator.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "{name} must start with http:// or https://, got: '{url}'"
                )));
            }
        }

        if self.congress.congresses.is_empty() {
            return Err(ConfigError::Validation(
                "congress.congresses cannot be empty".into(),
            ));
        }

        for chamber in &self.congress.chambers {
            if chamber != "House" && chamber != "Senate" {
                return Err(ConfigError::Validation(format!(
                    "congress.chambers must contain only 'House' or 'Senate', got: '{chamber}'"
                )));
            }
        }

        let policy = &self.matcher.policy;
        if policy.low_threshold > policy.high_threshold {
            return Err(ConfigError::Validation(format!(
                "matcher.policy.low_threshold ({}) cannot exceed high_threshold ({})",
                policy.low_threshold, policy.high_threshold
            )));
        }
        if policy.refer_limit == 0 {
            return Err(ConfigError::Validation(
                "matcher.policy.refer_limit cannot be 0".into(),
            ));
        }

        if self.fetch.checkpoint_every == 0 {
            return Err(ConfigError::Validation(
                "fetch.checkpoint_every cannot be 0".into(),
            ));
        }

        if self.adjudicator.enabled && self.adjudicator.api_key.is_empty() {
            return Err(ConfigError::Validation(
                "adjudicator.api_key is required when adjudicator.enabled is true. \
                 Set GM_ADJUDICATOR__API_KEY or configure in config.yaml."
                    .into(),
            ));
        }

        Ok(())
    }
}
