//! Configuration for a todo session.
//!
//! Loads configuration from environment variables with sensible defaults:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `TODO_LOCALE` | `ko`, `en` | `ko` |
//! | `TODO_UTC_OFFSET_MINUTES` | minutes east of UTC | the machine's local offset |
//! | `TODO_BROADCAST_CAPACITY` | positive integer | 16 |

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todolist_runtime::StoreConfig;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The locale is not one the views can render
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// A variable was set to a value that does not parse
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Value as found
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

/// Language used by the views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Korean (`2026년 10월 18일`, `일요일`, `할 일 2 개 남음`)
    #[default]
    Ko,
    /// English (`October 18, 2026`, `Sunday`, `2 tasks left`)
    En,
}

impl std::str::FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "ko" | "ko-kr" => Ok(Self::Ko),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            _ => Err(ConfigError::UnsupportedLocale(s.to_string())),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Language used by the views
    pub locale: Locale,
    /// Time zone for the header date; `None` uses the machine's local zone
    pub utc_offset: Option<FixedOffset>,
    /// Number of actions buffered for action observers
    pub broadcast_capacity: usize,
}

impl TodoConfig {
    /// Environment variable for [`TodoConfig::locale`]
    pub const LOCALE_VAR: &'static str = "TODO_LOCALE";
    /// Environment variable for [`TodoConfig::utc_offset`]
    pub const UTC_OFFSET_VAR: &'static str = "TODO_UTC_OFFSET_MINUTES";
    /// Environment variable for [`TodoConfig::broadcast_capacity`]
    pub const BROADCAST_CAPACITY_VAR: &'static str = "TODO_BROADCAST_CAPACITY";

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    ///
    /// Unset keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a key is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(locale) = lookup(Self::LOCALE_VAR) {
            config.locale = locale.parse()?;
        }

        if let Some(raw) = lookup(Self::UTC_OFFSET_VAR) {
            let invalid = |reason| ConfigError::InvalidValue {
                key: Self::UTC_OFFSET_VAR,
                value: raw.clone(),
                reason,
            };
            let minutes: i32 = raw
                .trim()
                .parse()
                .map_err(|_| invalid("expected whole minutes"))?;
            let offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| invalid("offset must be within ±24 hours"))?;
            config.utc_offset = Some(offset);
        }

        if let Some(raw) = lookup(Self::BROADCAST_CAPACITY_VAR) {
            config.broadcast_capacity = match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: Self::BROADCAST_CAPACITY_VAR,
                        value: raw,
                        reason: "expected a positive integer",
                    });
                }
            };
        }

        tracing::debug!(
            locale = ?config.locale,
            utc_offset = ?config.utc_offset,
            broadcast_capacity = config.broadcast_capacity,
            "Loaded todo configuration"
        );

        Ok(config)
    }

    /// Set the locale
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set a fixed time zone for the header date
    #[must_use]
    pub const fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    /// Store configuration derived from this session configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity)
    }
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            utc_offset: None,
            broadcast_capacity: StoreConfig::DEFAULT_BROADCAST_CAPACITY,
        }
    }
}
