//! Settings for one tracked rotation group.

use chrono_tz::Tz;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::i18n::Language;

/// Default refresh interval (15 minutes).
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 15 * 60;

/// Minimum refresh interval; shorter values are clamped.
pub const MIN_UPDATE_INTERVAL_SECS: u64 = 60;

/// Timezone the utility publishes wall-clock times in.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Kyiv;

/// Errors for missing required configuration.
///
/// The engine cannot run without a fully specified group, so these are
/// construction-time failures, not recoverable conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Region configuration is required")]
    MissingRegion,
    #[error("Provider configuration is required")]
    MissingProvider,
    #[error("Group configuration is required")]
    MissingGroup,
}

/// Complete configuration for tracking one (region, provider, group).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Region name as published by the utility.
    pub region: String,
    /// Provider (DSO) name within the region.
    pub provider: String,
    /// Rotation group identifier (e.g. "1.1").
    pub group: String,
    /// How often the refresh daemon re-fetches the schedule.
    pub update_interval: Duration,
    /// Display language for countdown strings and event names.
    pub language: Language,
    /// Timezone for calendar-day and HH:MM projections.
    pub timezone: Tz,
}

impl Settings {
    /// Creates settings for a group, validating the required names.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when region, provider, or group is empty.
    pub fn new(
        region: impl Into<String>,
        provider: impl Into<String>,
        group: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let region = region.into();
        let provider = provider.into();
        let group = group.into();

        if region.trim().is_empty() {
            return Err(ConfigError::MissingRegion);
        }
        if provider.trim().is_empty() {
            return Err(ConfigError::MissingProvider);
        }
        if group.trim().is_empty() {
            return Err(ConfigError::MissingGroup);
        }

        Ok(Self {
            region,
            provider,
            group,
            update_interval: Duration::from_secs(DEFAULT_UPDATE_INTERVAL_SECS),
            language: Language::default(),
            timezone: DEFAULT_TIMEZONE,
        })
    }

    /// Sets a custom refresh interval, clamped to the minimum.
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        let min = Duration::from_secs(MIN_UPDATE_INTERVAL_SECS);
        if interval < min {
            warn!(
                requested_secs = interval.as_secs(),
                min_secs = MIN_UPDATE_INTERVAL_SECS,
                "update interval below minimum, clamping"
            );
            self.update_interval = min;
        } else {
            self.update_interval = interval;
        }
        self
    }

    /// Sets the display language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the projection timezone.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}
