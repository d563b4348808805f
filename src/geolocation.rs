//! Device location capability

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::state::Coordinates;

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("geolocation is not available on this host")]
    Unsupported,
    #[error("position lookup failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("position lookup refused: {0}")]
    Refused(String),
}

/// ip-api.com compatible response
#[derive(Debug, Deserialize)]
struct IpLocateResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpLocateResponse {
    fn into_coordinates(self) -> Result<Coordinates, GeolocationError> {
        if self.status != "success" {
            return Err(GeolocationError::Refused(
                self.message.unwrap_or(self.status),
            ));
        }
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(GeolocationError::Refused("response without coordinates".into())),
        }
    }
}

/// How the current position is obtained
#[derive(Clone, Debug)]
pub enum Geolocator {
    /// No location capability
    Unavailable,
    /// Always reports the configured point
    Fixed(Coordinates),
    /// One-shot lookup of the public IP's approximate position
    IpLookup { http: Client, endpoint: String },
}

impl Geolocator {
    pub fn is_supported(&self) -> bool {
        !matches!(self, Geolocator::Unavailable)
    }

    /// Request the current position once. No continuous tracking.
    pub async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            Geolocator::Unavailable => Err(GeolocationError::Unsupported),
            Geolocator::Fixed(coords) => Ok(*coords),
            Geolocator::IpLookup { http, endpoint } => {
                debug!(%endpoint, "looking up position");
                let response: IpLocateResponse = http.get(endpoint).send().await?.json().await?;
                let result = response.into_coordinates();
                if let Err(err) = &result {
                    warn!(error = %err, "position lookup rejected");
                }
                result
            }
        }
    }
}
