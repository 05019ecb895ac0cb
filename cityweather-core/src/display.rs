use serde::{Deserialize, Serialize};

use crate::model::WeatherResult;

/// Coarse weather category used to pick a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmojiCategory {
    Clear,
    Cloud,
    Rain,
    Snow,
    Thunderstorm,
    Mist,
    Unknown,
}

/// First match wins.
const KEYWORDS: &[(&str, EmojiCategory)] = &[
    ("clear", EmojiCategory::Clear),
    ("cloud", EmojiCategory::Cloud),
    ("rain", EmojiCategory::Rain),
    ("snow", EmojiCategory::Snow),
    ("thunderstorm", EmojiCategory::Thunderstorm),
    ("mist", EmojiCategory::Mist),
    ("fog", EmojiCategory::Mist),
];

impl EmojiCategory {
    /// Case-insensitive substring match against a provider description.
    pub fn classify(description: &str) -> Self {
        let lower = description.to_lowercase();

        KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or(EmojiCategory::Unknown)
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            EmojiCategory::Clear => "☀️",
            EmojiCategory::Cloud => "☁️",
            EmojiCategory::Rain => "🌧️",
            EmojiCategory::Snow => "❄️",
            EmojiCategory::Thunderstorm => "⛈️",
            EmojiCategory::Mist => "🌫️",
            EmojiCategory::Unknown => "🌈",
        }
    }
}

/// Presentation-ready values for one result. Unit suffixes are left to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub temperature_text: String,
    pub humidity_text: String,
    pub description_text: String,
    pub emoji: EmojiCategory,
}

pub fn derive(result: &WeatherResult) -> DisplayModel {
    DisplayModel {
        temperature_text: format!("{:.1}", result.temperature),
        humidity_text: format!("Humidity: {}%", result.humidity_pct),
        description_text: result.description.clone(),
        emoji: EmojiCategory::classify(&result.description),
    }
}
