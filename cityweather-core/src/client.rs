use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::{
    config::Config,
    error::{ConfigError, FetchError},
    model::{Units, WeatherQuery, WeatherResult},
};

/// Provider's documented "OK" value for the `cod` field.
const OK_CODE: u16 = 200;

/// Anything that can answer "current conditions for this city".
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResult, FetchError>;

    /// Unit system used when the caller only supplies a city.
    fn default_units(&self) -> Units {
        Units::default()
    }
}

/// Client for OpenWeather's current-conditions-by-city endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoint: String,
    units: Units,
    http: Client,
}

impl OpenWeatherClient {
    /// Fails when no API key is configured.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?.to_owned();

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            api_key,
            endpoint: config.endpoint.clone(),
            units: config.units,
            http,
        })
    }

    pub async fn fetch_city(&self, city: &str) -> Result<WeatherResult, FetchError> {
        self.fetch(&WeatherQuery::new(city, self.units)).await
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResult, FetchError> {
        tracing::debug!(city = %query.city, units = %query.units, "fetching current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query.city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", query.units.as_str()),
            ])
            .send()
            .await
            .map_err(classify_transport)?;

        let status = res.status();
        if let Some(err) = FetchError::from_status(status.as_u16()) {
            tracing::warn!(city = %query.city, %status, "weather request rejected");
            return Err(err);
        }

        let body = res.text().await.map_err(classify_transport)?;

        parse_current(&body).inspect_err(|err| {
            tracing::warn!(city = %query.city, error = %err, "unusable weather response");
        })
    }

    fn default_units(&self) -> Units {
        self.units
    }
}

/// Maps a transport-level failure to a [`FetchError`].
///
/// Checked in order: HTTP status, connect, timeout, redirect, anything else.
fn classify_transport(err: reqwest::Error) -> FetchError {
    let by_status = err.status().and_then(|s| FetchError::from_status(s.as_u16()));

    let fetch_err = if let Some(mapped) = by_status {
        mapped
    } else if err.is_connect() {
        FetchError::ConnectionFailure
    } else if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_redirect() {
        FetchError::TooManyRedirects
    } else {
        // The URL carries the API key; keep it out of user-facing text.
        FetchError::Other(err.without_url().to_string())
    };

    tracing::warn!(error = %fetch_err, "weather request failed");
    fetch_err
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCod {
    Number(u16),
    Text(String),
}

impl OwCod {
    fn value(&self) -> Option<u16> {
        match self {
            OwCod::Number(n) => Some(*n),
            OwCod::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    cod: OwCod,
    main: OwMain,
    weather: Vec<OwWeather>,
    #[serde(default)]
    sys: OwSys,
}

fn parse_error(detail: impl std::fmt::Display) -> FetchError {
    FetchError::Other(format!("Failed to parse weather response: {detail}"))
}

/// Extracts a [`WeatherResult`] from a current-conditions body.
pub fn parse_current(body: &str) -> Result<WeatherResult, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(parse_error)?;

    match parsed.cod.value() {
        Some(OK_CODE) => {}
        Some(code) => {
            return Err(FetchError::Other(format!("provider returned code {code}")));
        }
        None => return Err(parse_error("unrecognized `cod` field")),
    }

    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| parse_error("`weather` list is empty"))?;

    Ok(WeatherResult {
        temperature: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        description,
        country_code: parsed.sys.country.filter(|c| !c.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ok_body() {
        let body = r#"{
            "cod": 200,
            "name": "Paris",
            "main": {"temp": 59.0, "humidity": 80, "pressure": 1012},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
            "sys": {"country": "FR"}
        }"#;

        let result = parse_current(body).expect("body should parse");
        assert_eq!(result.temperature, 59.0);
        assert_eq!(result.humidity_pct, 80);
        assert_eq!(result.description, "light rain");
        assert_eq!(result.country_code.as_deref(), Some("FR"));
    }

    #[test]
    fn accepts_string_cod() {
        let body = r#"{"cod":"200","main":{"temp":1.5,"humidity":3},"weather":[{"description":"mist"}]}"#;

        let result = parse_current(body).expect("body should parse");
        assert_eq!(result.country_code, None);
    }

    #[test]
    fn non_ok_cod_is_other() {
        let body = r#"{"cod":401,"main":{"temp":1.5,"humidity":3},"weather":[{"description":"mist"}]}"#;

        match parse_current(body) {
            Err(FetchError::Other(msg)) => assert!(msg.contains("401")),
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[test]
    fn missing_main_is_parse_failure() {
        let body = r#"{"cod":200,"weather":[{"description":"mist"}]}"#;

        match parse_current(body) {
            Err(FetchError::Other(msg)) => assert!(msg.contains("Failed to parse weather response")),
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[test]
    fn empty_weather_list_is_parse_failure() {
        let body = r#"{"cod":200,"main":{"temp":1.5,"humidity":3},"weather":[]}"#;

        assert!(matches!(parse_current(body), Err(FetchError::Other(_))));
    }

    #[test]
    fn non_json_body_is_parse_failure() {
        assert!(matches!(parse_current("<html>"), Err(FetchError::Other(_))));
    }

    #[test]
    fn client_requires_api_key() {
        let err = OpenWeatherClient::new(&Config::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential));
    }

    #[test]
    fn client_uses_configured_units() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.units = Units::Metric;

        let client = OpenWeatherClient::new(&cfg).expect("client");
        assert_eq!(client.default_units(), Units::Metric);
    }
}
