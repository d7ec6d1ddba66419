use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sparql: SparqlConfig,
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub explore: ExploreConfig,
    /// Extra prefix aliases merged over the built-in defaults (alias -> IRI)
    #[serde(default)]
    pub prefixes: HashMap<String, String>,
}

/// SPARQL endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlConfig {
    /// Query endpoint URL, e.g. "http://localhost:3030/ds/sparql"
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Embeddings configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    pub batch_size: usize,
    pub dimensions: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

/// Path exploration defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ExploreConfig {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    #[serde(default = "default_max_depth")]
    pub default_max_depth: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            default_max_depth: default_max_depth(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_top_n() -> usize {
    20
}

fn default_max_depth() -> usize {
    5
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in ONTOPATH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("ONTOPATH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml_str(&config_str)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        // Endpoint must be a well-formed absolute URL
        url::Url::parse(&self.sparql.endpoint)
            .with_context(|| format!("sparql.endpoint is not a valid URL: {}", self.sparql.endpoint))?;

        std::env::var(&self.embeddings.api_key_env)
            .with_context(|| {
                format!(
                    "Environment variable {} not set. Set it in your .env file or as an environment variable with your API key.",
                    self.embeddings.api_key_env
                )
            })?;

        if self.embeddings.batch_size == 0 {
            anyhow::bail!("embeddings.batch_size must be greater than 0");
        }

        if self.embeddings.dimensions == 0 {
            anyhow::bail!("embeddings.dimensions must be greater than 0");
        }

        if self.explore.default_top_n == 0 {
            anyhow::bail!("explore.default_top_n must be greater than 0");
        }

        if self.explore.default_max_depth == 0 {
            anyhow::bail!("explore.default_max_depth must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_toml() -> &'static str {
        r#"
[sparql]
endpoint = "http://localhost:3030/ds/sparql"

[embeddings]
provider = "openai"
model = "text-embedding-3-small"
api_key_env = "ONTOPATH_TEST_API_KEY"
batch_size = 100
dimensions = 1536

[explore]
default_top_n = 10
default_max_depth = 3

[prefixes]
ex = "http://example.org/"
"#
    }

    #[test]
    fn test_config_parse_valid() {
        std::env::set_var("ONTOPATH_TEST_API_KEY", "test-key");
        let config = Config::from_toml_str(valid_toml()).unwrap();

        assert_eq!(config.sparql.endpoint, "http://localhost:3030/ds/sparql");
        assert_eq!(config.sparql.request_timeout_secs, 30); // default
        assert_eq!(config.embeddings.model, "text-embedding-3-small");
        assert_eq!(config.explore.default_top_n, 10);
        assert_eq!(config.explore.default_max_depth, 3);
        assert_eq!(config.prefixes.get("ex").unwrap(), "http://example.org/");
    }

    #[test]
    fn test_config_explore_defaults() {
        std::env::set_var("ONTOPATH_TEST_API_KEY", "test-key");
        let toml = valid_toml().replace(
            "[explore]\ndefault_top_n = 10\ndefault_max_depth = 3\n",
            "",
        );
        let config = Config::from_toml_str(&toml).unwrap();

        assert_eq!(config.explore.default_top_n, 20);
        assert_eq!(config.explore.default_max_depth, 5);
    }

    #[test]
    fn test_config_rejects_bad_endpoint() {
        std::env::set_var("ONTOPATH_TEST_API_KEY", "test-key");
        let toml = valid_toml().replace("http://localhost:3030/ds/sparql", "not a url");
        let result = Config::from_toml_str(&toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_rejects_zero_max_depth() {
        std::env::set_var("ONTOPATH_TEST_API_KEY", "test-key");
        let toml = valid_toml().replace("default_max_depth = 3", "default_max_depth = 0");
        let result = Config::from_toml_str(&toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        std::env::set_var("ONTOPATH_TEST_API_KEY", "test-key");
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, valid_toml()).unwrap();
        std::env::set_var("ONTOPATH_CONFIG", &path);

        let config = Config::load().unwrap();
        assert_eq!(config.embeddings.batch_size, 100);

        std::env::remove_var("ONTOPATH_CONFIG");
    }
}
