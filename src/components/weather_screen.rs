use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::report_panel::REPORT_PANEL_HEIGHT;
use super::search_bar::SEARCH_BAR_HEIGHT;
use super::{
    BackdropLayer, BackdropProps, ClockBanner, ClockBannerProps, Component, Palette, ReportPanel,
    ReportPanelProps, SearchBar, SearchBarProps,
};
use crate::action::Action;
use crate::state::AppState;

pub const TITLE: &str = "Weather App";
pub const LOADING_TEXT: &str = "Loading...";

const CONTENT_WIDTH: u16 = 72;
const CLOCK_HEIGHT: u16 = 8;

/// Props for WeatherScreen - read-only view of state
pub struct WeatherScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole screen: backdrop, clock, search row, result
#[derive(Default)]
pub struct WeatherScreen {
    search: SearchBar,
}

impl WeatherScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn search_props<'a>(
        state: &'a AppState,
        error: Option<&'a str>,
        is_focused: bool,
    ) -> SearchBarProps<'a> {
        SearchBarProps {
            city_input: &state.city_input,
            error,
            focus: state.focus,
            backdrop: state.backdrop(),
            is_focused,
        }
    }
}

impl Component<Action> for WeatherScreen {
    type Props<'a> = WeatherScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        if let EventKind::Key(key) = event {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return vec![Action::Quit];
            }
            match key.code {
                KeyCode::Esc => return vec![Action::Quit],
                KeyCode::Tab => return vec![Action::UiFocusNext],
                KeyCode::BackTab => return vec![Action::UiFocusPrev],
                _ => {}
            }
        }

        let error = props.state.error_message();
        self.search
            .handle_event(
                event,
                Self::search_props(props.state, error.as_deref(), true),
            )
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let backdrop = state.backdrop();
        let palette = Palette::for_backdrop(backdrop);

        BackdropLayer.render(frame, area, BackdropProps { backdrop });

        let rows = Layout::vertical([
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let [column] = Layout::horizontal([Constraint::Max(CONTENT_WIDTH)])
            .flex(Flex::Center)
            .areas(rows[0]);

        let chunks = Layout::vertical([
            Constraint::Max(CLOCK_HEIGHT),
            Constraint::Length(1), // Title
            Constraint::Length(1), // blank
            Constraint::Length(SEARCH_BAR_HEIGHT),
            Constraint::Length(1), // Loading
            Constraint::Length(REPORT_PANEL_HEIGHT),
        ])
        .flex(Flex::Center)
        .split(column);

        ClockBanner.render(
            frame,
            chunks[0],
            ClockBannerProps {
                now: &state.now,
                backdrop,
            },
        );

        let title = Line::styled(
            TITLE,
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )
        .centered();
        frame.render_widget(Paragraph::new(title), chunks[1]);

        let error = state.error_message();
        self.search.render(
            frame,
            chunks[3],
            Self::search_props(state, error.as_deref(), props.is_focused),
        );

        if state.is_loading {
            let loading = Line::styled(LOADING_TEXT, Style::default().fg(palette.dim)).centered();
            frame.render_widget(Paragraph::new(loading), chunks[4]);
        }

        if let Some(report) = state.visible_report() {
            let [panel] = Layout::horizontal([Constraint::Max(44)])
                .flex(Flex::Center)
                .areas(chunks[5]);
            ReportPanel.render(frame, panel, ReportPanelProps { report, backdrop });
        }

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            rows[1],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("tab", "focus"),
                    StatusBarHint::new("enter", "search"),
                    StatusBarHint::new("esc", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::state::{Focus, WeatherReport};
    use tui_dispatch::testing::*;

    fn handle(screen: &mut WeatherScreen, state: &AppState, keys: &str) -> Vec<Action> {
        screen
            .handle_event(
                &EventKind::Key(key(keys)),
                WeatherScreenProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    #[test]
    fn test_esc_quits() {
        let mut screen = WeatherScreen::new();
        let state = AppState::default();
        let actions = handle(&mut screen, &state, "esc");
        actions.assert_first(Action::Quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut screen = WeatherScreen::new();
        let state = AppState::default();
        let actions = handle(&mut screen, &state, "ctrl+c");
        actions.assert_first(Action::Quit);
    }

    #[test]
    fn test_q_is_typed_not_quit() {
        let mut screen = WeatherScreen::new();
        let state = AppState::default();
        let actions = handle(&mut screen, &state, "q");
        actions.assert_first(Action::CityInputChange("q".into()));
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut screen = WeatherScreen::new();
        let state = AppState::default();
        handle(&mut screen, &state, "tab").assert_first(Action::UiFocusNext);
        handle(&mut screen, &state, "backtab").assert_first(Action::UiFocusPrev);
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut screen = WeatherScreen::new();
        let state = AppState::default();
        let actions: Vec<_> = screen
            .handle_event(
                &EventKind::Key(key("esc")),
                WeatherScreenProps {
                    state: &state,
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_idle() {
        let mut render = RenderHarness::new(80, 30);
        let mut screen = WeatherScreen::new();
        let state = AppState::default();

        let output = render.render_to_string_plain(|frame| {
            screen.render(
                frame,
                frame.area(),
                WeatherScreenProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains(TITLE));
        assert!(output.contains("Enter City Name"));
        assert!(!output.contains(LOADING_TEXT));
        assert!(!output.contains("Temperature:"));
    }

    #[test]
    fn test_render_loading_hides_report() {
        let mut render = RenderHarness::new(80, 30);
        let mut screen = WeatherScreen::new();
        let state = AppState {
            weather: Some(WeatherReport {
                location_name: "Quito".into(),
                ..Default::default()
            }),
            is_loading: true,
            focus: Focus::SearchButton,
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            screen.render(
                frame,
                frame.area(),
                WeatherScreenProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains(LOADING_TEXT));
        assert!(!output.contains("Quito"));
    }

    #[test]
    fn test_render_error_in_field() {
        let mut render = RenderHarness::new(80, 30);
        let mut screen = WeatherScreen::new();
        let state = AppState {
            city_input: "Atlantis".into(),
            error: Some(AppError::NotFound),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            screen.render(
                frame,
                frame.area(),
                WeatherScreenProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("City not found"));
        assert!(!output.contains("Atlantis"));
    }
}
