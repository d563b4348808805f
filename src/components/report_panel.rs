use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::{Component, Palette};
use crate::action::Action;
use crate::state::{Backdrop, WeatherReport};

/// Rows the panel needs, borders included.
pub const REPORT_PANEL_HEIGHT: u16 = 9;

pub struct ReportPanel;

pub struct ReportPanelProps<'a> {
    pub report: &'a WeatherReport,
    pub backdrop: Backdrop,
}

/// Glyph for an OpenWeather condition id.
///
/// Groups: 2xx thunderstorm, 3xx drizzle, 5xx rain, 6xx snow,
/// 7xx atmosphere, 800 clear, 80x clouds.
pub fn condition_glyph(id: Option<u16>, backdrop: Backdrop) -> &'static str {
    match id {
        Some(200..=299) => "\u{26c8}\u{fe0f}",
        Some(300..=399) => "\u{1f326}\u{fe0f}",
        Some(500..=599) => "\u{1f327}\u{fe0f}",
        Some(600..=699) => "\u{2744}\u{fe0f}",
        Some(700..=799) => "\u{1f32b}\u{fe0f}",
        Some(800) => match backdrop {
            Backdrop::Day => "\u{2600}\u{fe0f}",
            Backdrop::Night => "\u{1f319}",
        },
        Some(801..=802) => "\u{26c5}",
        Some(803..=899) => "\u{2601}\u{fe0f}",
        _ => "\u{1f321}\u{fe0f}",
    }
}

pub fn temperature_line(celsius: f64) -> String {
    format!("Temperature: {celsius} °C")
}

pub fn humidity_line(percent: u8) -> String {
    format!("Humidity: {percent}%")
}

pub fn wind_line(mps: f64) -> String {
    format!("Wind: {mps} m/s")
}

impl Component<Action> for ReportPanel {
    type Props<'a> = ReportPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let palette = Palette::for_backdrop(props.backdrop);
        let report = props.report;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.dim))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(palette.panel_bg).fg(palette.panel_text));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Glyph
            Constraint::Length(1), // Name
            Constraint::Length(1), // Description
            Constraint::Length(1), // blank
            Constraint::Length(1), // Temperature
            Constraint::Length(1), // Humidity
            Constraint::Length(1), // Wind
        ])
        .split(inner);

        let glyph = condition_glyph(report.condition_id, props.backdrop);
        frame.render_widget(Paragraph::new(Line::from(glyph).centered()), chunks[0]);
        frame.render_widget(
            Paragraph::new(Line::from(report.location_name.as_str()).bold().centered()),
            chunks[1],
        );
        frame.render_widget(
            Paragraph::new(Line::from(report.condition_description.as_str()).italic().centered()),
            chunks[2],
        );

        let rows = [
            temperature_line(report.temperature_celsius),
            humidity_line(report.humidity_percent),
            wind_line(report.wind_speed_mps),
        ];
        for (row, text) in chunks[4..].iter().zip(rows) {
            frame.render_widget(
                Paragraph::new(Line::from(vec![Span::raw(text)]).centered()),
                *row,
            );
        }
    }
}
