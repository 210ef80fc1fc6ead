//! Colors and styles.

use ratatui::style::{Color, Modifier, Style};

pub const LINK_GRAY: Color = Color::Rgb(128, 128, 128);
pub const HOST_LINK_GREEN: Color = Color::Rgb(144, 238, 144);
pub const SWITCH_BLUE: Color = Color::Rgb(70, 130, 230);
pub const HOST_GREEN: Color = Color::Rgb(80, 200, 120);
pub const WARN_RED: Color = Color::Rgb(255, 99, 99);
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207);
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164);

pub fn title_style() -> Style {
    Style::default()
        .fg(SWITCH_BLUE)
        .add_modifier(Modifier::BOLD)
}

pub fn border() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(HOST_GREEN).add_modifier(Modifier::BOLD)
}
