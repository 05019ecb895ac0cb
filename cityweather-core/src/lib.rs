//! Core library for the `cityweather` app.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The weather client and its failure taxonomy
//! - Presentation mapping (display strings, emoji category)
//! - The voice-command heuristic
//! - A controller that connects a rendering surface to the pipeline
//!
//! It is used by `cityweather-cli`, but any other shell (GUI, bot) can drive
//! it through [`WeatherView`] and [`FetchController`].

pub mod client;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod model;
pub mod voice;

pub use client::{OpenWeatherClient, WeatherSource};
pub use config::Config;
pub use controller::{FetchController, FetchOutcome, WeatherView};
pub use display::{DisplayModel, EmojiCategory, derive};
pub use error::{ConfigError, FetchError, RecognitionError};
pub use model::{Units, WeatherQuery, WeatherResult};
pub use voice::{Transcriber, VoiceCommand, extract_city, parse_command};
