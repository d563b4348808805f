use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::backdrop::ERROR_RED;
use super::{Component, Palette};
use crate::action::Action;
use crate::state::{Backdrop, Focus};

pub const INPUT_PLACEHOLDER: &str = "Enter City Name";
pub const SEARCH_LABEL: &str = "[ Search ]";
pub const LOCATION_LABEL: &str = "[ Use My Location ]";

/// Height of the input row, borders included.
pub const SEARCH_BAR_HEIGHT: u16 = 3;

/// City field plus the two search buttons
#[derive(Default)]
pub struct SearchBar {
    input: TextInput,
    /// Where the field was last drawn, for click hit-testing
    input_area: Rect,
}

pub struct SearchBarProps<'a> {
    pub city_input: &'a str,
    /// Shown in place of the city text while set
    pub error: Option<&'a str>,
    pub focus: Focus,
    pub backdrop: Backdrop,
    pub is_focused: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    fn input_props<'a>(value: &'a str, is_focused: bool, bg: Color) -> TextInputProps<'a, Action> {
        TextInputProps {
            value,
            placeholder: INPUT_PLACEHOLDER,
            is_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::default(),
                    bg: Some(bg),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: Action::CityInputChange,
            on_submit: |_| Action::CitySearch,
            on_cursor_move: Some(|_| Action::Render),
        }
    }

    fn split(area: Rect) -> [Rect; 3] {
        let chunks = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(SEARCH_LABEL.len() as u16 + 2),
            Constraint::Length(LOCATION_LABEL.len() as u16 + 2),
        ])
        .spacing(1)
        .split(area);
        [chunks[0], chunks[1], chunks[2]]
    }
}

fn button<'a>(label: &'a str, is_focused: bool, palette: &Palette) -> Paragraph<'a> {
    let (style, border) = if is_focused {
        (
            Style::default()
                .bg(palette.accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(palette.accent),
        )
    } else {
        (
            Style::default().fg(palette.text),
            Style::default().fg(palette.dim),
        )
    };
    Paragraph::new(Line::from(label).centered())
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border),
        )
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if let EventKind::Mouse(mouse) = event {
            // Clicking a field that already has focus is not a new focus
            if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                && props.focus != Focus::CityInput
                && self.input_area.contains(Position::new(mouse.column, mouse.row))
            {
                return vec![Action::UiFocusCityInput];
            }
            return Vec::new();
        }

        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match props.focus {
            Focus::CityInput => {
                let palette = Palette::for_backdrop(props.backdrop);
                self.input
                    .handle_event(
                        event,
                        Self::input_props(props.city_input, true, palette.panel_bg),
                    )
                    .into_iter()
                    .collect()
            }
            Focus::SearchButton => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => vec![Action::CitySearch],
                _ => Vec::new(),
            },
            Focus::LocationButton => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => vec![Action::LocationSearch],
                _ => Vec::new(),
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let palette = Palette::for_backdrop(props.backdrop);
        let [field, search, locate] = Self::split(area);
        self.input_area = field;

        let field_focused = props.is_focused && props.focus == Focus::CityInput;
        let border = match (props.error, field_focused) {
            (Some(_), _) => Style::default().fg(ERROR_RED),
            (None, true) => Style::default().fg(palette.accent),
            (None, false) => Style::default().fg(palette.dim),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(Style::default().bg(palette.panel_bg));
        let inner = block.inner(field);
        frame.render_widget(block, field);

        match props.error {
            Some(message) => {
                let text = Paragraph::new(Line::from(message)).style(
                    Style::default()
                        .fg(ERROR_RED)
                        .bg(palette.panel_bg)
                        .add_modifier(Modifier::BOLD),
                );
                frame.render_widget(text, inner);
            }
            None => {
                self.input.render(
                    frame,
                    inner,
                    Self::input_props(props.city_input, field_focused, palette.panel_bg),
                );
            }
        }

        frame.render_widget(
            button(
                SEARCH_LABEL,
                props.is_focused && props.focus == Focus::SearchButton,
                &palette,
            ),
            search,
        );
        frame.render_widget(
            button(
                LOCATION_LABEL,
                props.is_focused && props.focus == Focus::LocationButton,
                &palette,
            ),
            locate,
        );
    }
}
