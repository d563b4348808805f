//! Actions: user intents and async results

use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::{Coordinates, WeatherReport};

/// Application actions with automatic category inference
///
/// Result actions carry the `seq` of the fetch they answer; the reducer
/// ignores any whose seq is no longer current.
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Clock =====
    /// Wall-clock tick from the 1s subscription
    ClockTick(DateTime<Local>),

    // ===== City input =====
    /// Field contents edited (full new value)
    CityInputChange(String),

    // ===== Search by name =====
    /// Intent: fetch weather for the typed city
    CitySearch,

    /// Result: provider returned a report
    CitySearchDidLoad { seq: u64, report: WeatherReport },

    /// Result: not found or transport failure
    CitySearchDidError { seq: u64, error: AppError },

    // ===== Search by location =====
    /// Intent: fetch weather for the device position
    LocationSearch,

    /// Result: position obtained, weather request follows
    LocationDidResolve { seq: u64, coords: Coordinates },

    /// Result: position refused or unavailable
    LocationDidDeny { seq: u64, error: AppError },

    /// Result: weather for the position loaded
    LocationWeatherDidLoad { seq: u64, report: WeatherReport },

    /// Result: weather request for the position failed
    LocationWeatherDidError { seq: u64, error: AppError },

    // ===== UI category =====
    /// Focus entered the city field (Tab onto it or click)
    UiFocusCityInput,

    /// Move focus to the next control
    UiFocusNext,

    /// Move focus to the previous control
    UiFocusPrev,

    // ===== Uncategorized (global) =====
    /// Force a re-render (cursor movement, resize)
    Render,

    /// Exit the application
    Quit,
}
