use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::cli::Cli;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the estimate backend, without a trailing path
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout for backend calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// File that receives the tracing output while the terminal is in use
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_log_file() -> String {
    "estimate_ledger.log".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if one exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Command-line flags win over the environment
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_base_url {
            self.api_base_url = url.clone();
        }
        if let Some(path) = &cli.log_file {
            self.log_file = path.clone();
        }
    }
}

/// Load the environment and apply command-line overrides
pub fn init(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    config.apply_overrides(cli);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.log_file, "estimate_ledger.log");
    }

    #[test]
    fn reads_environment() {
        let config: Config = envy::from_iter(vars(&[
            ("API_BASE_URL", "https://estimates.example.com"),
            ("REQUEST_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://estimates.example.com");
        assert_eq!(config.request_timeout_secs, 3);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let result = envy::from_iter::<_, Config>(vars(&[("REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::parse_from(["estimate-ledger", "--api-base-url", "http://10.0.0.5:8080"]);
        let mut config = Config::default();
        config.apply_overrides(&cli);
        assert_eq!(config.api_base_url, "http://10.0.0.5:8080");
        assert_eq!(config.log_file, "estimate_ledger.log");
    }
}
