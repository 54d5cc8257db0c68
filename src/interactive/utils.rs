//! Styling helpers for the interactive UI

use ratatui::style::{Color, Style};

use super::messages::MessageType;
use crate::theme::Theme;

/// Terminal colors for one theme, derived from the SVG palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuiColors {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub pass: Color,
    pub fail: Color,
}

impl TuiColors {
    pub fn for_theme(theme: Theme) -> Self {
        let palette = theme.palette();
        TuiColors {
            background: hex_color(palette.background).unwrap_or(Color::Reset),
            text: hex_color(palette.text).unwrap_or(Color::Reset),
            muted: hex_color(palette.muted).unwrap_or(Color::Gray),
            accent: match theme {
                Theme::Light => Color::Blue,
                Theme::Dark => Color::Cyan,
            },
            pass: hex_color(palette.pass).unwrap_or(Color::Green),
            fail: hex_color(palette.fail).unwrap_or(Color::Red),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.accent)
    }
}

/// `#rrggbb` to an RGB terminal color
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

pub fn get_message_style(message_type: MessageType) -> Style {
    match message_type {
        MessageType::Info => Style::default().fg(Color::Cyan),
        MessageType::Success => Style::default().fg(Color::Green),
        MessageType::Warning => Style::default().fg(Color::Yellow),
        MessageType::Error => Style::default().fg(Color::Red),
    }
}
