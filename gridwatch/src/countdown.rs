//! Countdown rendering: duration → "XдXчXм"-style string.

use chrono::Duration;

use crate::i18n::{TranslationKey, Translations};

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * 60;
const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Renders a duration as non-zero day/hour/minute components with
/// localized unit suffixes, space-separated.
///
/// Hours are always shown alongside days, even at zero, so "1д 0ч 30м"
/// never collapses into the more ambiguous "1д 30м". Minutes are dropped
/// only when a larger unit is present and the minute count is zero.
/// Anything under one minute renders as the localized "less than a
/// minute" phrase instead of "0м".
pub fn format_countdown(duration: Duration, translations: &Translations) -> String {
    let total_seconds = duration.num_seconds();
    if total_seconds < SECS_PER_MINUTE {
        return translations.get(TranslationKey::LessThanMinute).to_string();
    }

    let days = total_seconds / SECS_PER_DAY;
    let hours = (total_seconds % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total_seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{}{}", days, translations.get(TranslationKey::DaySuffix)));
        parts.push(format!("{}{}", hours, translations.get(TranslationKey::HourSuffix)));
    } else if hours > 0 {
        parts.push(format!("{}{}", hours, translations.get(TranslationKey::HourSuffix)));
    }

    if minutes > 0 || (days == 0 && hours == 0) {
        parts.push(format!(
            "{}{}",
            minutes,
            translations.get(TranslationKey::MinuteSuffix)
        ));
    }

    parts.join(" ")
}
