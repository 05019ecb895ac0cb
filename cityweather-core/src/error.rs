use thiserror::Error;

/// Why a single fetch did not produce a [`crate::WeatherResult`].
///
/// The `Display` text is what the user sees; no variant carries retry state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Bad request. Please check input")]
    BadRequest,
    #[error("API key is invalid")]
    InvalidCredential,
    #[error("Access to the API is forbidden")]
    Forbidden,
    #[error("City not found")]
    NotFound,
    #[error("Internal server error, try again later")]
    ServerError,
    #[error("Bad gateway")]
    BadGateway,
    #[error("Service unavailable")]
    ServiceUnavailable,
    #[error("Gateway timeout")]
    GatewayTimeout,
    #[error("A connection error occurred")]
    ConnectionFailure,
    #[error("The request timed out")]
    Timeout,
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("An error occurred: {0}")]
    Other(String),
}

impl FetchError {
    /// Maps an HTTP status to its failure variant. Returns `None` for 2xx.
    pub fn from_status(code: u16) -> Option<Self> {
        let err = match code {
            200..=299 => return None,
            400 => FetchError::BadRequest,
            401 => FetchError::InvalidCredential,
            403 => FetchError::Forbidden,
            404 => FetchError::NotFound,
            500 => FetchError::ServerError,
            502 => FetchError::BadGateway,
            503 => FetchError::ServiceUnavailable,
            504 => FetchError::GatewayTimeout,
            other => FetchError::Other(format!("HTTP status {other}")),
        };
        Some(err)
    }
}

/// Startup-time configuration problems. These are fatal for the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No API key configured.\n\
         Hint: set WEATHER_API_KEY or run `cityweather configure`."
    )]
    MissingCredential,
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Speech transcription failures. Non-fatal: the user can type the city instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("Speech recognition is unavailable: {0}")]
    Unavailable(String),
    #[error("No speech was detected")]
    NoSpeech,
    #[error("Could not understand audio: {0}")]
    Failed(String),
}
