//! OpenWeatherMap current-weather client

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ProviderSettings;
use crate::state::{Coordinates, WeatherReport};

/// Failure of a single provider request
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("provider reported city not found")]
    NotFound,
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("could not decode weather payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("weather payload is malformed: {0}")]
    Malformed(&'static str),
}

/// What to ask the provider for
#[derive(Clone, Debug, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates(Coordinates),
}

// ============================================================================
// Payload
// ============================================================================

/// `cod` comes back as a number on success and as a string on errors.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
enum StatusCode {
    Number(i64),
    Text(String),
}

impl StatusCode {
    fn is_not_found(&self) -> bool {
        match self {
            StatusCode::Number(code) => *code == 404,
            StatusCode::Text(code) => code == "404",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    cod: Option<StatusCode>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    weather: Vec<Condition>,
    main: MainReadings,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(default)]
    id: Option<u16>,
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl CurrentWeatherResponse {
    fn into_report(self) -> Result<WeatherReport, ApiError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or(ApiError::Malformed("no weather conditions"))?;

        Ok(WeatherReport {
            location_name: self.name,
            condition_description: condition.description,
            temperature_celsius: self.main.temp,
            humidity_percent: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            condition_id: condition.id,
        })
    }
}

/// Classify a provider body: not-found signal, report, or malformed.
pub fn parse_weather_body(body: &str) -> Result<WeatherReport, ApiError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if envelope.cod.as_ref().is_some_and(StatusCode::is_not_found) {
        return Err(ApiError::NotFound);
    }

    let payload: CurrentWeatherResponse = serde_json::from_str(body)?;
    payload.into_report()
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(http: Client, settings: &ProviderSettings) -> Self {
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    /// Full request URL, metric units.
    pub fn url_for(&self, query: &WeatherQuery) -> String {
        let location = match query {
            WeatherQuery::City(city) => format!("q={}", urlencoding::encode(city)),
            WeatherQuery::Coordinates(coords) => {
                format!("lat={}&lon={}", coords.latitude, coords.longitude)
            }
        };
        format!(
            "{}/weather?{}&appid={}&units=metric",
            self.base_url,
            location,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Single attempt; the body is classified regardless of HTTP status.
    pub async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, ApiError> {
        debug!(?query, "requesting current weather");

        let response = self.http.get(self.url_for(query)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match parse_weather_body(&body) {
            Ok(report) => {
                debug!(location = %report.location_name, "weather loaded");
                Ok(report)
            }
            Err(err) => {
                warn!(%status, error = %err, "weather request rejected");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LONDON: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 14.2, "feels_like": 13.6, "humidity": 77, "pressure": 1012},
        "wind": {"speed": 4.63, "deg": 240},
        "name": "London",
        "cod": 200
    }"#;

    fn client() -> WeatherClient {
        WeatherClient::new(
            Client::new(),
            &ProviderSettings {
                base_url: "https://api.example.test/data/2.5/".into(),
                api_key: "k3y".into(),
            },
        )
    }

    #[test]
    fn test_parse_success_payload() {
        let report = parse_weather_body(LONDON).unwrap();
        assert_eq!(
            report,
            WeatherReport {
                location_name: "London".into(),
                condition_description: "broken clouds".into(),
                temperature_celsius: 14.2,
                humidity_percent: 77,
                wind_speed_mps: 4.63,
                condition_id: Some(803),
            }
        );
    }

    #[test]
    fn test_parse_string_not_found() {
        let body = r#"{"cod": "404", "message": "city not found"}"#;
        assert!(matches!(parse_weather_body(body), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_parse_numeric_not_found() {
        let body = r#"{"cod": 404, "message": "city not found"}"#;
        assert!(matches!(parse_weather_body(body), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_parse_other_error_is_decode_failure() {
        let body = r#"{"cod": 401, "message": "Invalid API key"}"#;
        assert!(matches!(parse_weather_body(body), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_parse_missing_conditions() {
        let body = r#"{"cod": 200, "name": "Nowhere", "weather": [],
            "main": {"temp": 1.0, "humidity": 10}, "wind": {"speed": 0.0}}"#;
        assert!(matches!(
            parse_weather_body(body),
            Err(ApiError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_weather_body("<html>bad gateway</html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_url_for_city_is_encoded() {
        let url = client().url_for(&WeatherQuery::City("São Paulo".into()));
        assert_eq!(
            url,
            "https://api.example.test/data/2.5/weather?q=S%C3%A3o%20Paulo&appid=k3y&units=metric"
        );
    }

    #[test]
    fn test_url_for_coordinates() {
        let url = client().url_for(&WeatherQuery::Coordinates(Coordinates {
            latitude: 50.45,
            longitude: 30.52,
        }));
        assert_eq!(
            url,
            "https://api.example.test/data/2.5/weather?lat=50.45&lon=30.52&appid=k3y&units=metric"
        );
    }
}
