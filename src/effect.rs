//! Effects - side effects declared by the reducer

use crate::action::Action;
use crate::api::{WeatherClient, WeatherQuery};
use crate::error::AppError;
use crate::geolocation::Geolocator;
use crate::state::Coordinates;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Current weather by city name
    FetchCityWeather { seq: u64, city: String },
    /// Ask the location capability for the current position
    LocateDevice { seq: u64 },
    /// Current weather at a resolved position
    FetchCoordinatesWeather { seq: u64, coords: Coordinates },
}

/// Outbound capabilities the effects run against
#[derive(Clone, Debug)]
pub struct Services {
    pub weather: WeatherClient,
    pub geolocator: Geolocator,
}

impl Services {
    /// Run one effect to completion and describe the outcome as an action.
    ///
    /// Failures never escape: every path ends in a result action.
    pub async fn run(&self, effect: Effect) -> Action {
        match effect {
            Effect::FetchCityWeather { seq, city } => {
                match self.weather.current_weather(&WeatherQuery::City(city)).await {
                    Ok(report) => Action::CitySearchDidLoad { seq, report },
                    Err(err) => Action::CitySearchDidError {
                        seq,
                        error: AppError::from_city_lookup(&err),
                    },
                }
            }
            Effect::LocateDevice { seq } => match self.geolocator.current_position().await {
                Ok(coords) => Action::LocationDidResolve { seq, coords },
                Err(err) => Action::LocationDidDeny {
                    seq,
                    error: AppError::from_geolocation(&err),
                },
            },
            Effect::FetchCoordinatesWeather { seq, coords } => {
                match self
                    .weather
                    .current_weather(&WeatherQuery::Coordinates(coords))
                    .await
                {
                    Ok(report) => Action::LocationWeatherDidLoad { seq, report },
                    Err(err) => Action::LocationWeatherDidError {
                        seq,
                        error: AppError::from_location_lookup(&err),
                    },
                }
            }
        }
    }
}
