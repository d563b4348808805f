//! Application state - single source of truth

use chrono::{DateTime, Local, Timelike};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Clock refresh period.
pub const CLOCK_TICK_MS: u64 = 1000;

/// First hour (inclusive) drawn with the day backdrop.
pub const DAY_START_HOUR: u32 = 6;
/// First hour (inclusive) drawn with the night backdrop.
pub const NIGHT_START_HOUR: u32 = 18;

/// Display-ready subset of a provider response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherReport {
    pub location_name: String,
    pub condition_description: String,
    pub temperature_celsius: f64,
    pub humidity_percent: u8,
    pub wind_speed_mps: f64,
    /// OpenWeather condition id (2xx thunderstorm .. 8xx clouds)
    pub condition_id: Option<u16>,
}

/// A point reported by the device location capability
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Which control receives keyboard input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    CityInput,
    SearchButton,
    LocationButton,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::CityInput => Focus::SearchButton,
            Focus::SearchButton => Focus::LocationButton,
            Focus::LocationButton => Focus::CityInput,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::CityInput => Focus::LocationButton,
            Focus::SearchButton => Focus::CityInput,
            Focus::LocationButton => Focus::SearchButton,
        }
    }
}

/// The two fixed backgrounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    Day,
    Night,
}

/// Day spans `[DAY_START_HOUR, NIGHT_START_HOUR)` on the local 24h clock.
pub fn is_day_time<T: Timelike>(time: &T) -> bool {
    (DAY_START_HOUR..NIGHT_START_HOUR).contains(&time.hour())
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Search input ---
    /// Text typed into the city field. Never overwritten by error text.
    #[debug(section = "Input", label = "City")]
    pub city_input: String,

    #[debug(section = "Input", label = "Focus", debug_fmt)]
    pub focus: Focus,

    // --- Fetch lifecycle ---
    /// Last successful report, replaced wholesale on every fetch
    #[debug(section = "Weather", label = "Report", debug_fmt)]
    pub weather: Option<WeatherReport>,

    /// Last error, shown in place of the city text while set
    #[debug(section = "Weather", label = "Error", debug_fmt)]
    pub error: Option<AppError>,

    #[debug(section = "Weather", label = "Loading")]
    pub is_loading: bool,

    /// Sequence number of the most recently issued fetch
    #[debug(section = "Weather", label = "Request #")]
    pub request_seq: u64,

    // --- Environment ---
    #[debug(section = "Clock", label = "Now")]
    pub now: DateTime<Local>,

    #[debug(skip)]
    pub geolocation_supported: bool,
}

impl AppState {
    pub fn new(now: DateTime<Local>, geolocation_supported: bool) -> Self {
        Self {
            city_input: String::new(),
            focus: Focus::default(),
            weather: None,
            error: None,
            is_loading: false,
            request_seq: 0,
            now,
            geolocation_supported,
        }
    }

    pub fn is_day_time(&self) -> bool {
        is_day_time(&self.now)
    }

    pub fn backdrop(&self) -> Backdrop {
        if self.is_day_time() {
            Backdrop::Day
        } else {
            Backdrop::Night
        }
    }

    /// Text of the current error, exactly as displayed
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// The result panel is hidden while a fetch is pending.
    pub fn visible_report(&self) -> Option<&WeatherReport> {
        if self.is_loading {
            None
        } else {
            self.weather.as_ref()
        }
    }

    /// Start a new fetch and return its sequence number.
    pub fn begin_request(&mut self) -> u64 {
        self.request_seq = self.request_seq.wrapping_add(1);
        self.is_loading = true;
        self.request_seq
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.request_seq
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Local::now(), true)
    }
}
