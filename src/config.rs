//! Runtime configuration, resolved once at startup

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::{Client, Url};
use thiserror::Error;

use crate::geolocation::Geolocator;
use crate::state::Coordinates;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_IP_LOCATE_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no OpenWeather API key given (use --api-key or OPENWEATHER_API_KEY)")]
    MissingApiKey,
    #[error("--geolocation fixed needs both --lat and --lon")]
    MissingCoordinates,
    #[error("coordinates out of range: lat {latitude}, lon {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("{name} is not a usable URL ({reason}), got {value:?}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Where "Use My Location" gets its position from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LocationSource {
    /// Location search is reported as unsupported
    Off,
    /// Use the --lat/--lon pair
    Fixed,
    /// Approximate position of the public IP address
    #[default]
    Ip,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LocationSettings {
    Off,
    Fixed(Coordinates),
    Ip { endpoint: String },
}

/// Unvalidated values as they arrive from the command line / environment
#[derive(Clone, Debug, Default)]
pub struct RawSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub geolocation: LocationSource,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub ip_locate_url: String,
    pub timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub location: LocationSettings,
    pub timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(raw: RawSettings) -> Result<Self, ConfigError> {
        let api_key = raw
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = check_url("--base-url", &raw.base_url)?;
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(ConfigError::InvalidUrl {
                name: "--base-url",
                value: raw.base_url,
                reason: "query and fragment are added per request".into(),
            });
        }
        let base_url = base_url.as_str().trim_end_matches('/').to_string();

        let location = match raw.geolocation {
            LocationSource::Off => LocationSettings::Off,
            LocationSource::Fixed => {
                let (Some(latitude), Some(longitude)) = (raw.lat, raw.lon) else {
                    return Err(ConfigError::MissingCoordinates);
                };
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    return Err(ConfigError::InvalidCoordinates {
                        latitude,
                        longitude,
                    });
                }
                LocationSettings::Fixed(Coordinates {
                    latitude,
                    longitude,
                })
            }
            LocationSource::Ip => LocationSettings::Ip {
                endpoint: check_url("--ip-locate-url", &raw.ip_locate_url)?.into(),
            },
        };

        Ok(Self {
            provider: ProviderSettings { base_url, api_key },
            location,
            timeout: Duration::from_secs(raw.timeout_secs.max(1)),
            log_file: raw.log_file,
        })
    }

    /// Shared HTTP client honoring the configured timeout.
    pub fn http_client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .user_agent(concat!("skywatch/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
    }

    pub fn geolocator(&self, http: Client) -> Geolocator {
        match &self.location {
            LocationSettings::Off => Geolocator::Unavailable,
            LocationSettings::Fixed(coords) => Geolocator::Fixed(*coords),
            LocationSettings::Ip { endpoint } => Geolocator::IpLookup {
                http,
                endpoint: endpoint.clone(),
            },
        }
    }
}

/// Parses `value` as an absolute http(s) URL with a host.
fn check_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("scheme must be http or https, got {}", url.scheme())));
    }
    if url.host().is_none() {
        return Err(invalid("missing host".into()));
    }
    Ok(url)
}
