use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{CandidatePolicy, CompatibilityEngine, MINIMUM_MATCH_SCORE};
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Candidate loading and paging limits
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Upper bound on candidates loaded per ranking call
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u32,
    #[serde(default = "default_page_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_page_limit")]
    pub max_limit: u16,
    /// Candidates per parallel scoring shard
    #[serde(default = "default_shard_size")]
    pub shard_size: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            default_limit: default_page_limit(),
            max_limit: default_max_page_limit(),
            shard_size: default_shard_size(),
        }
    }
}

fn default_max_candidates() -> u32 { 5000 }
fn default_page_limit() -> u16 { 20 }
fn default_max_page_limit() -> u16 { 100 }
fn default_shard_size() -> usize { 512 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default = "default_minimum_score")]
    pub minimum_score: u32,
    #[serde(default)]
    pub candidate_policy: CandidatePolicy,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            minimum_score: default_minimum_score(),
            candidate_policy: CandidatePolicy::default(),
        }
    }
}

fn default_minimum_score() -> u32 { MINIMUM_MATCH_SCORE }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ESTATE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ESTATE__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Engine configured from the scoring section
    pub fn engine(&self) -> CompatibilityEngine {
        CompatibilityEngine::new(self.scoring.weights)
            .with_minimum_score(self.scoring.minimum_score)
            .with_candidate_policy(self.scoring.candidate_policy)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("ESTATE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// `DATABASE_URL` wins over anything set in files
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
