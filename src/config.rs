//! Configuration for the backend and the terminal client, read from the
//! environment (a `.env` file is loaded by the binaries first).

use std::str::FromStr;
use std::time::Duration;

use shayli_session::DEFAULT_CHAT_URL;

use crate::errors::AppError;

/// Settings for the assistant backend server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Base URL of the Ollama daemon.
    pub ollama_base_url: String,
    pub model: String,
    /// Allowed browser origins; `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let cors_origins = lookup("SHAYLI_CORS_ORIGINS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            port: parse_or(&lookup, "PORT", 8000)?,
            ollama_base_url: lookup("OLLAMA_API_BASE_URL")
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
            model: lookup("SHAYLI_MODEL").unwrap_or_else(|| "llama3.2".to_string()),
            cors_origins: cors_origins.filter(|origins| !origins.is_empty()),
        })
    }
}

/// Settings for clients of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub chat_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chat_url: DEFAULT_CHAT_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        Ok(Self {
            chat_url: lookup("SHAYLI_CHAT_URL").unwrap_or(defaults.chat_url),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SHAYLI_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| AppError::InvalidConfig {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn server_defaults() {
        let cfg = ServerConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.ollama_base_url, "http://localhost:11434");
        assert_eq!(cfg.model, "llama3.2");
        assert_eq!(cfg.cors_origins, None);
    }

    #[test]
    fn server_overrides() {
        let cfg = ServerConfig::from_lookup(env(&[
            ("PORT", "9001"),
            ("SHAYLI_MODEL", "qwen2.5"),
            ("SHAYLI_CORS_ORIGINS", "http://localhost:8080, http://127.0.0.1:8080,"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.model, "qwen2.5");
        assert_eq!(
            cfg.cors_origins,
            Some(vec!["http://localhost:8080".to_string(), "http://127.0.0.1:8080".to_string()])
        );
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = ServerConfig::from_lookup(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn client_defaults_and_overrides() {
        let cfg = ClientConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.chat_url, "http://localhost:8000/api/v1/chat");

        let cfg = ClientConfig::from_lookup(env(&[
            ("SHAYLI_CHAT_URL", "http://10.0.0.2:8000/api/v1/chat"),
            ("SHAYLI_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.chat_url, "http://10.0.0.2:8000/api/v1/chat");
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
    }
}
