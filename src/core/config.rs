use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;

pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-1.5-flash-8b";
pub const DEFAULT_SCHEDULE_MODEL: &str = "gemini-2.0-flash-001";
pub const DEFAULT_TIMEZONE: &str = "US/Eastern";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gemini_api_hostname: String,
    pub gemini_api_key: String,
    pub chat_model: String,
    pub schedule_model: String,
    pub timezone: Tz,
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Reads the config from the environment after loading a `.env`
    /// file from the current directory if there is one.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup so it can be constructed
    /// without touching the process environment.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = var("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(anyhow!("Missing env var GEMINI_API_KEY"))?;
        let gemini_api_hostname =
            var("DAYPLAN_GEMINI_HOST").unwrap_or_else(|| DEFAULT_GEMINI_HOST.to_string());
        let chat_model =
            var("DAYPLAN_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let schedule_model =
            var("DAYPLAN_SCHEDULE_MODEL").unwrap_or_else(|| DEFAULT_SCHEDULE_MODEL.to_string());
        let timezone_name = var("DAYPLAN_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = parse_timezone(&timezone_name)
            .with_context(|| "Invalid env var DAYPLAN_TIMEZONE")?;
        let output_dir = PathBuf::from(var("DAYPLAN_OUTPUT_DIR").unwrap_or("./".to_string()));

        Ok(Self {
            gemini_api_hostname,
            gemini_api_key,
            chat_model,
            schedule_model,
            timezone,
            output_dir,
        })
    }
}

/// Parses an IANA timezone name such as `US/Eastern` or
/// `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow!("Unknown timezone {}: {}", name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(config.gemini_api_key, "secret");
        assert_eq!(config.gemini_api_hostname, DEFAULT_GEMINI_HOST);
        assert_eq!(config.chat_model, "gemini-1.5-flash-8b");
        assert_eq!(config.schedule_model, "gemini-2.0-flash-001");
        assert_eq!(config.timezone, chrono_tz::US::Eastern);
        assert_eq!(config.output_dir, PathBuf::from("./"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_vars(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("DAYPLAN_GEMINI_HOST", "http://localhost:8080"),
            ("DAYPLAN_SCHEDULE_MODEL", "gemini-test"),
            ("DAYPLAN_TIMEZONE", "Europe/Berlin"),
            ("DAYPLAN_OUTPUT_DIR", "/tmp/plans"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_api_hostname, "http://localhost:8080");
        assert_eq!(config.schedule_model, "gemini-test");
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/plans"));
    }

    #[test]
    fn test_missing_api_key() {
        let err = AppConfig::from_vars(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_invalid_timezone() {
        let result = AppConfig::from_vars(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("DAYPLAN_TIMEZONE", "Mars/Olympus_Mons"),
        ]));
        assert!(result.is_err());
    }
}
