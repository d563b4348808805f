use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
};

use super::{Component, Palette};
use crate::action::Action;
use crate::state::Backdrop;

pub const CLOCK_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%A, %-d %B";

/// Below this height the FIGlet time is skipped in favour of one plain line.
const MIN_ART_HEIGHT: u16 = 3;

/// Wall clock rendered as large text
pub struct ClockBanner;

pub struct ClockBannerProps<'a> {
    pub now: &'a DateTime<Local>,
    pub backdrop: Backdrop,
}

fn font_stack() -> Vec<artbox::Font> {
    fonts::stack(&["terminus", "miniwi"])
}

fn gradient(backdrop: Backdrop) -> Fill {
    let (start, end) = match backdrop {
        Backdrop::Day => (ArtColor::rgb(255, 236, 150), ArtColor::rgb(255, 160, 60)),
        Backdrop::Night => (ArtColor::rgb(170, 180, 255), ArtColor::rgb(230, 210, 255)),
    };
    Fill::Linear(LinearGradient::horizontal(start, end))
}

impl Component<Action> for ClockBanner {
    type Props<'a> = ClockBannerProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let palette = Palette::for_backdrop(props.backdrop);
        let time = props.now.format(CLOCK_FORMAT).to_string();

        if area.height < MIN_ART_HEIGHT {
            let line = Line::from(time).fg(palette.text).bold().centered();
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet time
            Constraint::Length(1), // Date
        ])
        .split(area);

        let renderer = Renderer::new(font_stack())
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(gradient(props.backdrop));
        frame.render_widget(ArtBox::new(&renderer, &time), chunks[0]);

        let date = Line::styled(
            props.now.format(DATE_FORMAT).to_string(),
            Style::default().fg(palette.dim),
        )
        .centered();
        frame.render_widget(Paragraph::new(date), chunks[1]);
    }
}
