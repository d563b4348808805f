//! Reducer - pure function: (state, action) -> DispatchResult

use tracing::debug;
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::error::AppError;
use crate::state::{AppState, Focus, WeatherReport};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Clock =====
        Action::ClockTick(now) => {
            state.now = now;
            DispatchResult::changed()
        }

        // ===== City input =====
        Action::CityInputChange(value) => {
            state.error = None;
            state.city_input = value;
            DispatchResult::changed()
        }

        // ===== Search by name =====
        Action::CitySearch => {
            let seq = state.begin_request();
            DispatchResult::changed_with(Effect::FetchCityWeather {
                seq,
                city: state.city_input.clone(),
            })
        }

        Action::CitySearchDidLoad { seq, report } => {
            if !accept(state, seq) {
                return DispatchResult::unchanged();
            }
            show_report(state, report);
            DispatchResult::changed()
        }

        Action::CitySearchDidError { seq, error } => {
            if !accept(state, seq) {
                return DispatchResult::unchanged();
            }
            show_error(state, error);
            DispatchResult::changed()
        }

        // ===== Search by location =====
        Action::LocationSearch => {
            if !state.geolocation_supported {
                state.error = Some(AppError::GeolocationUnsupported);
                return DispatchResult::changed();
            }
            let seq = state.begin_request();
            DispatchResult::changed_with(Effect::LocateDevice { seq })
        }

        Action::LocationDidResolve { seq, coords } => {
            if !accept(state, seq) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(Effect::FetchCoordinatesWeather { seq, coords })
        }

        Action::LocationDidDeny { seq, error } => {
            if !accept(state, seq) {
                return DispatchResult::unchanged();
            }
            // The previous report stays on screen.
            state.error = Some(error);
            state.is_loading = false;
            DispatchResult::changed()
        }

        Action::LocationWeatherDidLoad { seq, report } => {
            if !accept(state, seq) {
                return DispatchResult::unchanged();
            }
            show_report(state, report);
            DispatchResult::changed()
        }

        Action::LocationWeatherDidError { seq, error } => {
            if !accept(state, seq) {
                return DispatchResult::unchanged();
            }
            show_error(state, error);
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::UiFocusCityInput => {
            if focus_city_input(state) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::UiFocusNext => {
            move_focus(state, state.focus.next());
            DispatchResult::changed()
        }

        Action::UiFocusPrev => {
            move_focus(state, state.focus.prev());
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global =====
        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Whether a result action answers the latest fetch.
fn accept(state: &AppState, seq: u64) -> bool {
    if state.is_current(seq) {
        true
    } else {
        debug!(seq, current = state.request_seq, "dropping stale result");
        false
    }
}

fn show_report(state: &mut AppState, report: WeatherReport) {
    state.weather = Some(report);
    state.error = None;
    state.is_loading = false;
}

fn show_error(state: &mut AppState, error: AppError) {
    state.weather = None;
    state.error = Some(error);
    state.is_loading = false;
}

fn move_focus(state: &mut AppState, target: Focus) {
    if target == Focus::CityInput {
        focus_city_input(state);
    } else {
        state.focus = target;
    }
}

/// Entering the field while an error is shown discards the error and the
/// text typed before it. Returns whether anything changed.
fn focus_city_input(state: &mut AppState) -> bool {
    let moved = state.focus != Focus::CityInput;
    state.focus = Focus::CityInput;
    if state.error.take().is_some() {
        state.city_input.clear();
        return true;
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{
        CITY_NOT_FOUND, GEOLOCATION_UNSUPPORTED, LOCATION_DENIED, LOCATION_FETCH_FAILED,
    };
    use crate::state::Coordinates;

    fn report(name: &str) -> WeatherReport {
        WeatherReport {
            location_name: name.into(),
            condition_description: "light rain".into(),
            temperature_celsius: 11.3,
            humidity_percent: 81,
            wind_speed_mps: 5.1,
            condition_id: Some(500),
        }
    }

    #[test]
    fn test_city_search_sets_loading_and_emits_fetch() {
        let mut state = AppState {
            city_input: "Oslo".into(),
            ..Default::default()
        };

        let result = reducer(&mut state, Action::CitySearch);

        assert!(result.changed);
        assert!(state.is_loading);
        assert_eq!(result.effects.len(), 1);
        assert_eq!(
            result.effects[0],
            Effect::FetchCityWeather {
                seq: 1,
                city: "Oslo".into()
            }
        );
    }

    #[test]
    fn test_city_search_did_load_replaces_report() {
        let mut state = AppState {
            weather: Some(report("Bergen")),
            error: Some(AppError::NotFound),
            ..Default::default()
        };
        let seq = state.begin_request();

        reducer(
            &mut state,
            Action::CitySearchDidLoad {
                seq,
                report: report("Oslo"),
            },
        );

        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.weather, Some(report("Oslo")));
    }

    #[test]
    fn test_city_not_found_clears_report() {
        let mut state = AppState {
            weather: Some(report("Oslo")),
            ..Default::default()
        };
        let seq = state.begin_request();

        reducer(
            &mut state,
            Action::CitySearchDidError {
                seq,
                error: AppError::NotFound,
            },
        );

        assert!(!state.is_loading);
        assert!(state.weather.is_none());
        assert_eq!(state.error_message().as_deref(), Some(CITY_NOT_FOUND));
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut state = AppState::default();
        let first = state.begin_request();
        let second = state.begin_request();

        let result = reducer(
            &mut state,
            Action::CitySearchDidLoad {
                seq: first,
                report: report("Old"),
            },
        );
        assert!(!result.changed);
        assert!(state.is_loading);
        assert!(state.weather.is_none());

        reducer(
            &mut state,
            Action::CitySearchDidLoad {
                seq: second,
                report: report("New"),
            },
        );
        assert!(!state.is_loading);
        assert_eq!(state.weather.unwrap().location_name, "New");
    }

    #[test]
    fn test_location_unsupported_sets_error_without_effect() {
        let mut state = AppState {
            geolocation_supported: false,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::LocationSearch);

        assert!(result.effects.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.request_seq, 0);
        assert_eq!(
            state.error_message().as_deref(),
            Some(GEOLOCATION_UNSUPPORTED)
        );
    }

    #[test]
    fn test_location_flow_resolves_then_fetches() {
        let mut state = AppState::default();
        let coords = Coordinates {
            latitude: 59.91,
            longitude: 10.75,
        };

        let result = reducer(&mut state, Action::LocationSearch);
        assert_eq!(result.effects.len(), 1);
        assert_eq!(result.effects[0], Effect::LocateDevice { seq: 1 });

        let result = reducer(&mut state, Action::LocationDidResolve { seq: 1, coords });
        assert!(state.is_loading);
        assert_eq!(result.effects.len(), 1);
        assert_eq!(
            result.effects[0],
            Effect::FetchCoordinatesWeather { seq: 1, coords }
        );

        reducer(
            &mut state,
            Action::LocationWeatherDidLoad {
                seq: 1,
                report: report("Oslo"),
            },
        );
        assert!(!state.is_loading);
        assert_eq!(state.weather, Some(report("Oslo")));
    }

    #[test]
    fn test_location_denied_keeps_previous_report() {
        let mut state = AppState {
            weather: Some(report("Oslo")),
            ..Default::default()
        };
        reducer(&mut state, Action::LocationSearch);

        reducer(
            &mut state,
            Action::LocationDidDeny {
                seq: 1,
                error: AppError::GeolocationDenied("refused".into()),
            },
        );

        assert!(!state.is_loading);
        assert_eq!(state.weather, Some(report("Oslo")));
        assert_eq!(state.error_message().as_deref(), Some(LOCATION_DENIED));
    }

    #[test]
    fn test_location_fetch_failure_clears_report() {
        let mut state = AppState {
            weather: Some(report("Oslo")),
            ..Default::default()
        };
        let coords = Coordinates {
            latitude: 59.91,
            longitude: 10.75,
        };
        reducer(&mut state, Action::LocationSearch);
        reducer(&mut state, Action::LocationDidResolve { seq: 1, coords });

        let result = reducer(
            &mut state,
            Action::LocationWeatherDidError {
                seq: 1,
                error: AppError::LocationFetchFailure("502 Bad Gateway".into()),
            },
        );

        assert!(result.changed);
        assert!(!state.is_loading);
        assert!(state.weather.is_none());
        assert_eq!(
            state.error_message().as_deref(),
            Some(LOCATION_FETCH_FAILED)
        );
    }

    #[test]
    fn test_stale_location_fetch_failure_is_ignored() {
        let mut state = AppState {
            weather: Some(report("Oslo")),
            ..Default::default()
        };
        reducer(&mut state, Action::LocationSearch);
        reducer(&mut state, Action::CitySearch);

        let result = reducer(
            &mut state,
            Action::LocationWeatherDidError {
                seq: 1,
                error: AppError::LocationFetchFailure("502 Bad Gateway".into()),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.request_seq, 2);
        assert!(state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.weather, Some(report("Oslo")));
    }

    #[test]
    fn test_typing_clears_error() {
        let mut state = AppState {
            city_input: "Osl".into(),
            error: Some(AppError::NotFound),
            ..Default::default()
        };

        reducer(&mut state, Action::CityInputChange("Oslo".into()));

        assert!(state.error.is_none());
        assert_eq!(state.city_input, "Oslo");
    }

    #[test]
    fn test_focus_with_error_clears_input() {
        let mut state = AppState {
            city_input: "Atlantis".into(),
            error: Some(AppError::NotFound),
            focus: Focus::SearchButton,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::UiFocusCityInput);

        assert!(result.changed);
        assert_eq!(state.focus, Focus::CityInput);
        assert!(state.error.is_none());
        assert!(state.city_input.is_empty());
    }

    #[test]
    fn test_focus_without_error_keeps_input() {
        let mut state = AppState {
            city_input: "Oslo".into(),
            ..Default::default()
        };

        let result = reducer(&mut state, Action::UiFocusCityInput);

        assert!(!result.changed);
        assert_eq!(state.city_input, "Oslo");
    }

    #[test]
    fn test_tab_onto_field_counts_as_focus() {
        let mut state = AppState {
            city_input: "Atlantis".into(),
            error: Some(AppError::NotFound),
            focus: Focus::LocationButton,
            ..Default::default()
        };

        reducer(&mut state, Action::UiFocusNext);

        assert_eq!(state.focus, Focus::CityInput);
        assert!(state.error.is_none());
        assert!(state.city_input.is_empty());
    }

    #[test]
    fn test_tab_between_buttons_keeps_error() {
        let mut state = AppState {
            error: Some(AppError::NotFound),
            focus: Focus::SearchButton,
            ..Default::default()
        };

        reducer(&mut state, Action::UiFocusNext);

        assert_eq!(state.focus, Focus::LocationButton);
        assert!(state.error.is_some());
    }

    #[test]
    fn test_clock_tick_updates_now() {
        let mut state = AppState::default();
        let later = state.now + chrono::Duration::seconds(1);

        let result = reducer(&mut state, Action::ClockTick(later));

        assert!(result.changed);
        assert_eq!(state.now, later);
    }
}
