use tokio::sync::Mutex;

use crate::{
    client::WeatherSource,
    display::{DisplayModel, derive},
    model::{Units, WeatherQuery},
    voice::{Transcriber, VoiceCommand, parse_command},
};

/// Rendering surface driven by [`FetchController`]. Implemented by the shell.
pub trait WeatherView {
    fn on_fetch_succeeded(&mut self, display: &DisplayModel, country: Option<&str>);

    fn on_fetch_failed(&mut self, message: &str);

    /// Non-fatal progress or recognition messages.
    fn on_status(&mut self, _message: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Displayed,
    Failed,
    /// Another fetch was already in flight.
    Ignored,
    NoCommand,
    NoLocation,
    RecognitionFailed,
}

/// Adapter between a shell's events and the fetch/derive pipeline.
///
/// At most one request runs at a time; a request arriving while another is
/// outstanding is dropped rather than queued.
#[derive(Debug)]
pub struct FetchController<S> {
    source: S,
    units: Units,
    in_flight: Mutex<()>,
}

impl<S: WeatherSource> FetchController<S> {
    pub fn new(source: S) -> Self {
        let units = source.default_units();
        Self { source, units, in_flight: Mutex::new(()) }
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub async fn on_fetch_requested<V>(&self, city: &str, view: &mut V) -> FetchOutcome
    where
        V: WeatherView + ?Sized,
    {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!(city, "fetch already in flight; ignoring request");
            return FetchOutcome::Ignored;
        };

        self.run_fetch(city, view).await
    }

    pub async fn on_voice_requested<T, V>(&self, transcriber: &T, view: &mut V) -> FetchOutcome
    where
        T: Transcriber + ?Sized,
        V: WeatherView + ?Sized,
    {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("fetch already in flight; ignoring voice request");
            return FetchOutcome::Ignored;
        };

        view.on_status("Listening...");

        let transcript = match transcriber.transcribe().await {
            Ok(text) => text,
            Err(err) => {
                tracing::info!(error = %err, "speech recognition failed");
                view.on_status(&err.to_string());
                return FetchOutcome::RecognitionFailed;
            }
        };

        tracing::debug!(transcript = %transcript, "received transcript");

        match parse_command(&transcript) {
            VoiceCommand::NoCommand => {
                view.on_status("No weather command detected");
                FetchOutcome::NoCommand
            }
            VoiceCommand::NoLocation => {
                view.on_status("No location specified");
                FetchOutcome::NoLocation
            }
            VoiceCommand::City(city) => {
                view.on_status(&format!("Getting weather for {city}"));
                self.run_fetch(&city, view).await
            }
        }
    }

    async fn run_fetch<V>(&self, city: &str, view: &mut V) -> FetchOutcome
    where
        V: WeatherView + ?Sized,
    {
        let query = WeatherQuery::new(city, self.units);

        match self.source.fetch(&query).await {
            Ok(result) => {
                let display = derive(&result);
                view.on_fetch_succeeded(&display, result.country_code.as_deref());
                FetchOutcome::Displayed
            }
            Err(err) => {
                view.on_fetch_failed(&err.to_string());
                FetchOutcome::Failed
            }
        }
    }
}
