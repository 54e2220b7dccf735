//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::store::types::AvailabilityStatus;

/// Which palette to use. `System` picks dark or light from the terminal's
/// background color at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    Light,
    #[default]
    System,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            "system" => Some(Theme::System),
            _ => None,
        }
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Status colors (shared by calendar cells and overlays)
    pub available: Color,
    pub maybe: Color,
    pub unavailable: Color,
    pub unknown: Color,

    // Calendar colors
    pub today: Style,
    pub selected: Style,
    pub weekday_header: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            available: Color::Green,
            maybe: Color::Yellow,
            unavailable: Color::Red,
            unknown: Color::DarkGray,
            today: Style::new().bold().underlined(),
            selected: Style::new().reversed(),
            weekday_header: Style::new().bold(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            available: Color::Indexed(28),
            maybe: Color::Indexed(130),
            unavailable: Color::Indexed(124),
            unknown: Color::Indexed(248),
            today: Style::new().bold().underlined(),
            selected: Style::new().reversed(),
            weekday_header: Style::new().bold(),
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Indexed(28),
            flash_error: Color::Indexed(124),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a status cell.
    pub fn status_color(&self, status: AvailabilityStatus) -> Color {
        match status {
            AvailabilityStatus::Available => self.available,
            AvailabilityStatus::Maybe => self.maybe,
            AvailabilityStatus::Unavailable => self.unavailable,
            AvailabilityStatus::Unknown => self.unknown,
        }
    }
}

/// Resolve a theme choice into a palette. `System` queries the terminal
/// background luma; anything brighter than 0.6 counts as a light terminal.
/// Query failures (pipes, unsupported terminals) fall back to dark.
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::System => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("system"), Some(Theme::System));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn test_status_colors_distinct_in_dark_palette() {
        let colors = ThemeColors::dark();
        let all = [
            colors.status_color(AvailabilityStatus::Available),
            colors.status_color(AvailabilityStatus::Maybe),
            colors.status_color(AvailabilityStatus::Unavailable),
            colors.status_color(AvailabilityStatus::Unknown),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
