use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph},
};

use super::Component;
use crate::action::Action;
use crate::state::Backdrop;

/// Colors for one backdrop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub sky: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub panel_bg: Color,
    pub panel_text: Color,
    pub glyph: Color,
}

/// Button orange shared by both backdrops
pub const ACCENT: Color = Color::Rgb(255, 140, 0);
pub const ERROR_RED: Color = Color::Rgb(230, 60, 60);

const DAY: Palette = Palette {
    sky: Color::Rgb(74, 144, 217),
    text: Color::White,
    dim: Color::Rgb(210, 228, 245),
    accent: ACCENT,
    panel_bg: Color::Rgb(236, 243, 250),
    panel_text: Color::Rgb(30, 36, 48),
    glyph: Color::Rgb(255, 214, 90),
};

const NIGHT: Palette = Palette {
    sky: Color::Rgb(16, 20, 40),
    text: Color::Rgb(228, 232, 245),
    dim: Color::Rgb(120, 128, 160),
    accent: ACCENT,
    panel_bg: Color::Rgb(40, 46, 72),
    panel_text: Color::Rgb(228, 232, 245),
    glyph: Color::Rgb(220, 225, 240),
};

const SUN: [&str; 3] = [r"  \ | /  ", r" -- O -- ", r"  / | \  "];
const MOON: [&str; 3] = [r" *  .--. ", r"   (   ( ", r"  * '--' "];

impl Palette {
    pub fn for_backdrop(backdrop: Backdrop) -> Self {
        match backdrop {
            Backdrop::Day => DAY,
            Backdrop::Night => NIGHT,
        }
    }
}

fn glyph_lines(backdrop: Backdrop) -> &'static [&'static str; 3] {
    match backdrop {
        Backdrop::Day => &SUN,
        Backdrop::Night => &MOON,
    }
}

/// Full-screen background with a sun or moon in the corner
pub struct BackdropLayer;

pub struct BackdropProps {
    pub backdrop: Backdrop,
}

impl Component<Action> for BackdropLayer {
    type Props<'a> = BackdropProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let palette = Palette::for_backdrop(props.backdrop);
        frame.render_widget(Block::default().style(Style::default().bg(palette.sky)), area);

        let art = glyph_lines(props.backdrop);
        let width = art[0].chars().count() as u16;
        let height = art.len() as u16;
        if area.width < width + 2 || area.height < height + 1 {
            return;
        }

        let corner = Rect::new(area.right() - width - 1, area.y + 1, width, height);
        let text: Text = art
            .iter()
            .map(|row| Line::from(Span::styled(*row, Style::default().fg(palette.glyph))))
            .collect::<Vec<_>>()
            .into();
        frame.render_widget(Paragraph::new(text), corner);
    }
}
