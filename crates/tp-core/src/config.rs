use std::env;

use crate::{domain::MemberId, errors::Error, Result};

/// Typed configuration for the bot.
///
/// Everything comes from the environment (optionally seeded from `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub database_url: String,
    pub admin_id: MemberId,

    // Telegram limits
    pub telegram_message_limit: usize,
    pub button_label_max_length: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Existing environment wins over `.env`; a missing file is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .or_else(|| lookup("BOT_TOKEN").and_then(non_empty))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;

        let database_url = lookup("DATABASE_URL").and_then(non_empty).ok_or_else(|| {
            Error::Config("DATABASE_URL environment variable is required".to_string())
        })?;

        let admin_raw = lookup("ADMIN_ID")
            .and_then(non_empty)
            .ok_or_else(|| Error::Config("ADMIN_ID environment variable is required".to_string()))?;
        let admin_id = admin_raw
            .trim()
            .parse::<i64>()
            .map(MemberId)
            .map_err(|_| Error::Config(format!("ADMIN_ID must be a numeric id, got {admin_raw:?}")))?;

        let telegram_message_limit =
            parse_usize(lookup("TELEGRAM_MESSAGE_LIMIT")).unwrap_or(4096);
        let button_label_max_length =
            parse_usize(lookup("BUTTON_LABEL_MAX_LENGTH")).unwrap_or(30);

        Ok(Self {
            telegram_bot_token,
            database_url,
            admin_id,
            telegram_message_limit,
            button_label_max_length,
        })
    }

    /// Filesystem path (or `:memory:`) extracted from `DATABASE_URL`.
    pub fn database_path(&self) -> &str {
        sqlite_path(&self.database_url)
    }
}

/// Accepts `sqlite://path`, `sqlite:path` or a bare path.
pub fn sqlite_path(url: &str) -> &str {
    let url = url.trim();
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

fn parse_usize(v: Option<String>) -> Option<usize> {
    v.and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn loads_required_values_and_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("DATABASE_URL", "sqlite://data/tp.db"),
            ("ADMIN_ID", " 1125355606 "),
        ]))
        .unwrap();

        assert_eq!(cfg.telegram_bot_token, "123:abc");
        assert_eq!(cfg.admin_id, MemberId(1125355606));
        assert_eq!(cfg.database_path(), "data/tp.db");
        assert_eq!(cfg.telegram_message_limit, 4096);
        assert_eq!(cfg.button_label_max_length, 30);
    }

    #[test]
    fn accepts_legacy_bot_token_name() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "t"),
            ("DATABASE_URL", "tp.db"),
            ("ADMIN_ID", "7"),
        ]))
        .unwrap();
        assert_eq!(cfg.telegram_bot_token, "t");
        assert_eq!(cfg.database_path(), "tp.db");
    }

    #[test]
    fn missing_values_are_fatal() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "x"), ("ADMIN_ID", "1")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(m) if m.contains("TELEGRAM_BOT_TOKEN")));

        let err = Config::from_lookup(lookup_from(&[("BOT_TOKEN", "t"), ("ADMIN_ID", "1")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(m) if m.contains("DATABASE_URL")));

        let err = Config::from_lookup(lookup_from(&[
            ("BOT_TOKEN", "t"),
            ("DATABASE_URL", "x"),
            ("ADMIN_ID", "admin"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(m) if m.contains("ADMIN_ID")));
    }

    #[test]
    fn sqlite_url_forms() {
        assert_eq!(sqlite_path("sqlite::memory:"), ":memory:");
        assert_eq!(sqlite_path("sqlite:///var/lib/tp.db"), "/var/lib/tp.db");
        assert_eq!(sqlite_path("/var/lib/tp.db"), "/var/lib/tp.db");
    }
}
