//! Localized strings for countdown suffixes and event names.
//!
//! Translations are static tables keyed by [`TranslationKey`]; any key
//! missing from a language falls back to the hardcoded English string, so
//! a lookup can never fail.

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Ukrainian (default; matches the utility's own publications).
    #[default]
    Ukrainian,
    /// English.
    English,
}

impl Language {
    /// Two-letter language code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ukrainian => "uk",
            Language::English => "en",
        }
    }
}

/// Keys into the translation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationKey {
    /// Unit suffix appended to a day count.
    DaySuffix,
    /// Unit suffix appended to an hour count.
    HourSuffix,
    /// Unit suffix appended to a minute count.
    MinuteSuffix,
    /// Phrase rendered for durations under one minute.
    LessThanMinute,
    /// Display name for a planned outage event.
    PlannedOutageEvent,
    /// Display name for an emergency outage event.
    EmergencyOutageEvent,
}

/// Resolved translation table for one language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translations {
    language: Language,
}

impl Translations {
    /// Creates a table for the given language.
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// The language this table resolves to.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Looks up a localized string, falling back to English.
    pub fn get(&self, key: TranslationKey) -> &'static str {
        match self.language {
            Language::Ukrainian => ukrainian(key).unwrap_or_else(|| english(key)),
            Language::English => english(key),
        }
    }
}

fn ukrainian(key: TranslationKey) -> Option<&'static str> {
    let s = match key {
        TranslationKey::DaySuffix => "д",
        TranslationKey::HourSuffix => "ч",
        TranslationKey::MinuteSuffix => "м",
        TranslationKey::LessThanMinute => "менше хвилини",
        TranslationKey::PlannedOutageEvent => "Планове відключення",
        TranslationKey::EmergencyOutageEvent => "Аварійне відключення",
    };
    Some(s)
}

fn english(key: TranslationKey) -> &'static str {
    match key {
        TranslationKey::DaySuffix => "d",
        TranslationKey::HourSuffix => "h",
        TranslationKey::MinuteSuffix => "m",
        TranslationKey::LessThanMinute => "less than a minute",
        TranslationKey::PlannedOutageEvent => "Planned outage",
        TranslationKey::EmergencyOutageEvent => "Emergency outage",
    }
}
