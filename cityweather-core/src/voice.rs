//! Spoken-command handling.
//!
//! Speech-to-text itself lives behind [`Transcriber`]; this module only turns a
//! transcript into a city with a keyword heuristic. It is not a parser.

use async_trait::async_trait;

use crate::error::RecognitionError;

/// Phrases that mark a transcript as a weather request.
pub const INTENT_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "forecast",
    "climate",
    "how hot",
    "how cold",
    "is it raining",
    "is it snowing",
    "is it sunny",
];

/// Produces a transcript from the user's speech. Blocks until speech ends or fails.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self) -> Result<String, RecognitionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCommand {
    /// No weather intent; callers treat this as a no-op.
    NoCommand,
    /// Weather intent without a usable location.
    NoLocation,
    City(String),
}

pub fn parse_command(transcript: &str) -> VoiceCommand {
    let lower = transcript.to_lowercase();

    if !INTENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return VoiceCommand::NoCommand;
    }

    let words: Vec<&str> = transcript.split_whitespace().collect();

    let Some(last_in) = words.iter().rposition(|w| w.eq_ignore_ascii_case("in")) else {
        return VoiceCommand::NoLocation;
    };

    let city = words[last_in + 1..]
        .join(" ")
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string();

    if city.is_empty() {
        VoiceCommand::NoLocation
    } else {
        VoiceCommand::City(city)
    }
}

/// City named in `transcript`, if it is a weather request with a location.
pub fn extract_city(transcript: &str) -> Option<String> {
    match parse_command(transcript) {
        VoiceCommand::City(city) => Some(city),
        VoiceCommand::NoCommand | VoiceCommand::NoLocation => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_city_after_in() {
        assert_eq!(
            parse_command("what is the weather in Tokyo"),
            VoiceCommand::City("Tokyo".into())
        );
    }

    #[test]
    fn keeps_multi_word_city_and_casing() {
        assert_eq!(
            extract_city("What's the temperature in New York City?"),
            Some("New York City".into())
        );
    }

    #[test]
    fn uses_last_in() {
        assert_eq!(
            extract_city("weather in a minute in Rio de Janeiro"),
            Some("Rio de Janeiro".into())
        );
    }

    #[test]
    fn in_is_matched_as_a_word() {
        // "Berlin" contains "in" but is not the preposition.
        assert_eq!(parse_command("Berlin weather"), VoiceCommand::NoLocation);
        assert_eq!(extract_city("forecast IN berlin"), Some("berlin".into()));
    }

    #[test]
    fn no_intent_is_no_command() {
        assert_eq!(parse_command("play music"), VoiceCommand::NoCommand);
        assert_eq!(extract_city("play music"), None);
        assert_eq!(parse_command("play music in the kitchen"), VoiceCommand::NoCommand);
    }

    #[test]
    fn nothing_after_in_is_no_location() {
        assert_eq!(parse_command("weather in"), VoiceCommand::NoLocation);
        assert_eq!(parse_command("weather in ?"), VoiceCommand::NoLocation);
    }

    #[test]
    fn phrasal_intents_are_detected() {
        assert_eq!(
            parse_command("How cold is it in Oslo"),
            VoiceCommand::City("Oslo".into())
        );
        assert_eq!(
            parse_command("is it raining in London."),
            VoiceCommand::City("London".into())
        );
    }

    #[test]
    fn empty_transcript_is_no_command() {
        assert_eq!(parse_command(""), VoiceCommand::NoCommand);
    }
}
