use std::{collections::BTreeMap, env, fmt::Debug, fs, path::Path, path::PathBuf};

use anyhow::Context;
use chrono_tz::Tz;
use log::debug;
use serde::Deserialize;

use crate::{extract::ExtractionStrategy, Age, Seconds};

pub const SENDER_EMAIL_VAR: &str = "SENDER_EMAIL";
pub const SENDER_PASSWORD_VAR: &str = "SENDER_PASSWORD";
pub const RECEIVER_EMAIL_VAR: &str = "RECEIVER_EMAIL";

const DEFAULT_URL: &str = "https://www.sodiwseries.com/en-gb/drivers/2017/peter-fabian-50265.html";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Page that holds the age
    pub url: String,

    /// Sent with the request so the site treats us like a browser
    pub headers: BTreeMap<String, String>,

    /// Upper bound on the whole request
    pub timeout: Seconds,

    /// Age that triggers the notification
    pub age_threshold: Age,

    pub smtp: SmtpConfig,

    /// How to locate the age in the page
    pub extraction: ExtractionStrategy,

    /// Folder for the rolling log file, `null` to only log to stdout
    pub log_dir: Option<PathBuf>,

    /// IANA zone the check time is reported in
    pub timezone: Tz,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SmtpConfig {
    pub server: String,
    /// Must be a STARTTLS port
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let headers = [
            (
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36",
            ),
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
            ("Accept-Language", "en-US,en;q=0.5"),
            ("Connection", "keep-alive"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            url: DEFAULT_URL.to_string(),
            headers,
            timeout: 10.into(),
            age_threshold: 21.into(),
            smtp: Default::default(),
            extraction: Default::default(),
            log_dir: Some(PathBuf::from("log")),
            timezone: chrono_tz::Europe::Budapest,
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: "smtp.gmail.com".to_string(),
            port: 587,
        }
    }
}

impl Config {
    pub fn load_from(config_path: &Path) -> anyhow::Result<Config> {
        let file_contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read contents of {config_path:?}"))?;
        let result = serde_json::from_str(&file_contents)
            .with_context(|| format!("Failed to parse contents of {config_path:?}"))?;
        Ok(result)
    }

    /// Uses the file if one is given otherwise the built in defaults
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Config> {
        match config_path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }
}

/// Email account details. Each is optional here, a missing value only becomes
/// an error when an email actually needs to be sent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EmailCredentials {
    pub sender: Option<String>,
    pub password: Option<String>,
    pub receiver: Option<String>,
}

impl EmailCredentials {
    /// Reads from the process environment after loading `.env` if present.
    /// Variables already set in the environment are not overridden by the file.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {path:?}"),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => debug!("Ignoring .env file: {e}"),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            sender: non_empty(SENDER_EMAIL_VAR),
            password: non_empty(SENDER_PASSWORD_VAR),
            receiver: non_empty(RECEIVER_EMAIL_VAR),
        }
    }
}

impl Debug for EmailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("receiver", &self.receiver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    #[test]
    fn defaults_match_original_target() {
        let config = Config::default();
        assert_eq!(config.timeout, Seconds::from(10));
        assert_eq!(config.age_threshold, Age::from(21));
        assert_eq!(config.smtp.server, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.headers.len(), 4);
        assert_eq!(config.headers["Accept-Language"], "en-US,en;q=0.5");
        assert_eq!(config.timezone, chrono_tz::Europe::Budapest);
    }

    #[test]
    fn timezone_from_name() {
        let actual: Config = serde_json::from_str(r#"{"timezone": "Europe/London"}"#).unwrap();
        assert_eq!(actual.timezone, chrono_tz::Europe::London);
        assert!(serde_json::from_str::<Config>(r#"{"timezone": "Mars/Olympus"}"#).is_err());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        // Arrange
        let path = std::env::temp_dir().join(format!("age_mon_cfg_{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"age_threshold": 30, "smtp": {{"port": 2525}}, "log_dir": null}}"#
        )
        .unwrap();

        // Act
        let actual = Config::load(Some(path.as_path())).unwrap();
        fs::remove_file(&path).unwrap();

        // Assert
        let expected = Config {
            age_threshold: 30.into(),
            smtp: SmtpConfig {
                server: "smtp.gmail.com".to_string(),
                port: 2525,
            },
            log_dir: None,
            ..Config::default()
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn missing_file_is_error() {
        let path = Path::new("definitely/not/here.json");
        let err = Config::load(Some(path)).unwrap_err();
        assert!(format!("{err:?}").contains("Failed to read contents"));
    }

    #[test]
    fn credentials_from_lookup() {
        // Arrange
        let vars: HashMap<&str, &str> = [
            (SENDER_EMAIL_VAR, "me@example.com"),
            (SENDER_PASSWORD_VAR, "hunter2"),
            (RECEIVER_EMAIL_VAR, "  "),
        ]
        .into_iter()
        .collect();

        // Act
        let actual = EmailCredentials::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        // Assert
        assert_eq!(actual.sender.as_deref(), Some("me@example.com"));
        assert_eq!(actual.password.as_deref(), Some("hunter2"));
        assert_eq!(actual.receiver, None);
        assert!(!format!("{actual:?}").contains("hunter2"));
    }
}
