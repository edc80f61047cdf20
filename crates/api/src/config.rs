use serde::Serialize;
use std::fmt;
use thiserror::Error;

use query::llm::{DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL};

pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} not set in .env")]
    Missing(&'static str),

    #[error("{key} must be a whole number, got {value:?}")]
    NotANumber { key: &'static str, value: String },
}

/// Settings read from the environment (and `.env`) once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub neo4j_uri: Option<String>,
    pub neo4j_user: String,
    pub neo4j_password: Option<String>,
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    /// Read for parity with the batch tools; nothing is embedded at runtime.
    pub embedding_model: String,
    pub chat_model: String,
    pub sample_size: usize,
    pub data_dir: String,
    pub bind_addr: String,
    parse_errors: Vec<ConfigError>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // A missing .env is fine; the process environment still applies.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut parse_errors = Vec::new();

        let sample_size = match get("SAMPLE_SIZE") {
            None => DEFAULT_SAMPLE_SIZE,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                parse_errors.push(ConfigError::NotANumber {
                    key: "SAMPLE_SIZE",
                    value: raw.clone(),
                });
                DEFAULT_SAMPLE_SIZE
            }),
        };

        Self {
            neo4j_uri: get("NEO4J_URI"),
            neo4j_user: get("NEO4J_USER").unwrap_or_else(|| DEFAULT_NEO4J_USER.to_string()),
            neo4j_password: get("NEO4J_PASSWORD"),
            groq_api_key: get("GROQ_API_KEY"),
            groq_base_url: get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            sample_size,
            data_dir: get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            parse_errors,
        }
    }

    /// Every problem found, in a fixed order. Empty means the config is usable.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.neo4j_uri.is_none() {
            errors.push(ConfigError::Missing("NEO4J_URI"));
        }
        if self.neo4j_password.is_none() {
            errors.push(ConfigError::Missing("NEO4J_PASSWORD"));
        }
        if self.groq_api_key.is_none() {
            errors.push(ConfigError::Missing("GROQ_API_KEY"));
        }
        errors.extend(self.parse_errors.iter().cloned());

        errors
    }
}

/// Outcome of constructing a backend client at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Connection {
    Connected,
    Disconnected(String),
}

impl Connection {
    pub fn is_connected(&self) -> bool {
        matches!(self, Connection::Connected)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Connected => f.write_str("Connected"),
            Connection::Disconnected(_) => f.write_str("Disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.neo4j_user, "neo4j");
        assert_eq!(config.chat_model, "llama-3.3-70b-versatile");
        assert_eq!(config.embedding_model, "llama-3.3-70b-versatile");
        assert_eq!(config.sample_size, 1000);
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.groq_base_url, "https://api.groq.com");
    }

    #[test]
    fn test_missing_values_are_enumerated() {
        let errors = config(&[("NEO4J_PASSWORD", "  ")]).validate();
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "NEO4J_URI not set in .env",
                "NEO4J_PASSWORD not set in .env",
                "GROQ_API_KEY not set in .env",
            ]
        );
    }

    #[test]
    fn test_complete_config_is_valid() {
        let config = config(&[
            ("NEO4J_URI", "bolt://localhost:7687"),
            ("NEO4J_PASSWORD", "secret"),
            ("GROQ_API_KEY", "gsk_test"),
            ("SAMPLE_SIZE", "250"),
            ("CHAT_MODEL", "llama-3.1-8b-instant"),
        ]);
        assert!(config.validate().is_empty());
        assert_eq!(config.sample_size, 250);
        assert_eq!(config.chat_model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_bad_sample_size_falls_back() {
        let config = config(&[("SAMPLE_SIZE", "lots")]);
        assert_eq!(config.sample_size, 1000);
        assert!(config.validate().contains(&ConfigError::NotANumber {
            key: "SAMPLE_SIZE",
            value: "lots".to_string(),
        }));
    }

    #[test]
    fn test_connection_json() {
        let json = serde_json::to_value(Connection::Disconnected("refused".into())).unwrap();
        assert_eq!(json["status"], "disconnected");
        assert_eq!(json["reason"], "refused");
        assert_eq!(serde_json::to_value(Connection::Connected).unwrap()["status"], "connected");
    }
}
