//! Core types shared across the catalog.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CategoryId: stable identifier of a category node
pub type CategoryId = String;

/// ProductId: stable identifier of a product record
pub type ProductId = String;

/// UserId: stable identifier of a catalog user
pub type UserId = String;

/// Generate a fresh identifier for a new record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Content language. Every translatable field carries one text per language.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    #[default]
    En,
    Zh,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Ru, Language::En, Language::Zh];

    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(ApiError::ValidationError(format!(
                "Invalid language: {}. Must be ru, en or zh",
                other
            ))),
        }
    }
}

/// A text value carried in all three content languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub ru: String,
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub zh: String,
}

impl LocalizedText {
    pub fn new(ru: impl Into<String>, en: impl Into<String>, zh: impl Into<String>) -> Self {
        Self {
            ru: ru.into(),
            en: en.into(),
            zh: zh.into(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Ru => &self.ru,
            Language::En => &self.en,
            Language::Zh => &self.zh,
        }
    }

    pub fn set(&mut self, language: Language, text: impl Into<String>) {
        let slot = match language {
            Language::Ru => &mut self.ru,
            Language::En => &mut self.en,
            Language::Zh => &mut self.zh,
        };
        *slot = text.into();
    }

    /// True when no language carries non-blank text.
    pub fn is_blank(&self) -> bool {
        Language::ALL
            .iter()
            .all(|lang| self.get(*lang).trim().is_empty())
    }

    /// Text in `language`, falling back to the first non-blank translation
    /// in `en`, `ru`, `zh` order.
    pub fn display(&self, language: Language) -> &str {
        let preferred = self.get(language);
        if !preferred.trim().is_empty() {
            return preferred;
        }
        [Language::En, Language::Ru, Language::Zh]
            .iter()
            .map(|lang| self.get(*lang))
            .find(|text| !text.trim().is_empty())
            .unwrap_or("")
    }

    /// Case-insensitive substring match against any translation.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        Language::ALL
            .iter()
            .any(|lang| self.get(*lang).to_lowercase().contains(&needle))
    }
}
