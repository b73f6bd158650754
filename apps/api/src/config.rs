use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;

const DEFAULT_SKILLS_DB_PATH: &str = "data/skills_db.json";

/// Which `Embedder` backs the skill index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Hashing,
    FastEmbed,
}

impl EmbeddingBackend {
    /// Sentence embeddings when compiled in, otherwise the hashing backend.
    pub fn compiled_default() -> Self {
        if cfg!(feature = "embeddings") {
            EmbeddingBackend::FastEmbed
        } else {
            EmbeddingBackend::Hashing
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(EmbeddingBackend::Hashing),
            "fastembed" => Ok(EmbeddingBackend::FastEmbed),
            other => bail!("EMBEDDING_BACKEND must be 'hashing' or 'fastembed', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values; everything has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset disables the generative path entirely.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub skills_db_path: String,
    /// Unset means the embedding backend's own threshold.
    pub skill_threshold: Option<f32>,
    pub embedding_backend: EmbeddingBackend,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let skill_threshold = var("SKILL_THRESHOLD")
            .map(|raw| parse_threshold(&raw))
            .transpose()?;

        Ok(Config {
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            skills_db_path: var("SKILLS_DB_PATH")
                .unwrap_or_else(|| DEFAULT_SKILLS_DB_PATH.to_string()),
            skill_threshold,
            embedding_backend: match var("EMBEDDING_BACKEND") {
                Some(raw) => EmbeddingBackend::parse(&raw)?,
                None => EmbeddingBackend::compiled_default(),
            },
            port: var("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_threshold(raw: &str) -> Result<f32> {
    let threshold = raw
        .trim()
        .parse::<f32>()
        .with_context(|| format!("SKILL_THRESHOLD must be a number, got '{raw}'"))?;
    if !(0.0..1.0).contains(&threshold) {
        bail!("SKILL_THRESHOLD must be in [0, 1), got {threshold}");
    }
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, "gemini-2.5-flash-lite");
        assert_eq!(config.skills_db_path, "data/skills_db.json");
        assert_eq!(config.skill_threshold, None);
        assert_eq!(config.embedding_backend, EmbeddingBackend::compiled_default());
        assert_eq!(config.port, 8000);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_default_backend_follows_features() {
        let expected = if cfg!(feature = "embeddings") {
            EmbeddingBackend::FastEmbed
        } else {
            EmbeddingBackend::Hashing
        };
        assert_eq!(EmbeddingBackend::compiled_default(), expected);
        let config = config_from(&[("EMBEDDING_BACKEND", "hashing")]).unwrap();
        assert_eq!(config.embedding_backend, EmbeddingBackend::Hashing);
    }

    #[test]
    fn test_blank_api_key_counts_as_unset() {
        let config = config_from(&[("GEMINI_API_KEY", "  ")]).unwrap();
        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "k"),
            ("SKILL_THRESHOLD", "0.4"),
            ("EMBEDDING_BACKEND", "FastEmbed"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("k"));
        assert_eq!(config.skill_threshold, Some(0.4));
        assert_eq!(config.embedding_backend, EmbeddingBackend::FastEmbed);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_values_are_fatal() {
        assert!(config_from(&[("SKILL_THRESHOLD", "1.0")]).is_err());
        assert!(config_from(&[("SKILL_THRESHOLD", "-0.1")]).is_err());
        assert!(config_from(&[("SKILL_THRESHOLD", "high")]).is_err());
        assert!(config_from(&[("EMBEDDING_BACKEND", "openai")]).is_err());
        assert!(config_from(&[("PORT", "http")]).is_err());
    }
}
