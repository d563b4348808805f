//! User-facing error taxonomy
//!
//! Each variant's `Display` is the exact text shown in the input slot.
//! The `String` payloads keep the underlying cause for logs and debug
//! snapshots; they are never rendered.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiError;
use crate::geolocation::GeolocationError;

pub const CITY_NOT_FOUND: &str = "City not found — please try again!";
pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation not supported!";
pub const LOCATION_DENIED: &str = "Location access denied!";
pub const LOCATION_FETCH_FAILED: &str = "Unable to fetch weather for your location!";

#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum AppError {
    /// Provider could not resolve the city name
    #[error("{}", CITY_NOT_FOUND)]
    NotFound,

    /// Network or payload failure on the name-search path
    #[error("{}", CITY_NOT_FOUND)]
    TransportFailure(String),

    /// No location capability configured
    #[error("{}", GEOLOCATION_UNSUPPORTED)]
    GeolocationUnsupported,

    /// Position lookup refused or failed
    #[error("{}", LOCATION_DENIED)]
    GeolocationDenied(String),

    /// Coordinates resolved but the weather request failed
    #[error("{}", LOCATION_FETCH_FAILED)]
    LocationFetchFailure(String),
}

impl AppError {
    /// Classify a failure of the search-by-name request.
    pub fn from_city_lookup(err: &ApiError) -> Self {
        match err {
            ApiError::NotFound => AppError::NotFound,
            other => AppError::TransportFailure(other.to_string()),
        }
    }

    /// Classify a failure of the search-by-coordinates request.
    ///
    /// A provider "not found" here is still a location fetch failure.
    pub fn from_location_lookup(err: &ApiError) -> Self {
        AppError::LocationFetchFailure(err.to_string())
    }

    pub fn from_geolocation(err: &GeolocationError) -> Self {
        match err {
            GeolocationError::Unsupported => AppError::GeolocationUnsupported,
            other => AppError::GeolocationDenied(other.to_string()),
        }
    }
}
