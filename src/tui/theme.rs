//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::scoring::RiskTier;

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Pick from the terminal background
    Auto,
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tier colors (traffic light plus orange)
    pub tier_low: Color,
    pub tier_moderate: Color,
    pub tier_high: Color,
    pub tier_extreme: Color,

    // Styles
    pub title_style: Style,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,
    pub value_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Chart and map
    pub chart_primary: Color,
    pub chart_reference: Color,
    pub axis_color: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    /// Dark theme palette
    pub fn dark() -> Self {
        Self {
            tier_low: Color::Green,
            tier_moderate: Color::Yellow,
            tier_high: Color::Rgb(249, 115, 22),
            tier_extreme: Color::Red,
            title_style: Style::new().bold(),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            value_color: Color::White,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            chart_primary: Color::Rgb(239, 68, 68),
            chart_reference: Color::Rgb(59, 130, 246),
            axis_color: Color::DarkGray,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    /// Light theme palette: darker hues so text stays readable on white
    pub fn light() -> Self {
        Self {
            tier_low: Color::Rgb(21, 128, 61),
            tier_moderate: Color::Rgb(161, 98, 7),
            tier_high: Color::Rgb(194, 65, 12),
            tier_extreme: Color::Rgb(185, 28, 28),
            title_style: Style::new().bold(),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            value_color: Color::Black,
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Gray),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(21, 128, 61),
            flash_error: Color::Rgb(185, 28, 28),
            chart_primary: Color::Rgb(220, 38, 38),
            chart_reference: Color::Rgb(37, 99, 235),
            axis_color: Color::Gray,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
        }
    }

    pub fn tier_color(&self, tier: RiskTier) -> Color {
        match tier {
            RiskTier::Low => self.tier_low,
            RiskTier::Moderate => self.tier_moderate,
            RiskTier::High => self.tier_high,
            RiskTier::Extreme => self.tier_extreme,
        }
    }
}

/// Resolve a theme preference to a palette.
///
/// `Auto` asks the terminal for its background luminance and falls back to
/// the dark palette when the terminal doesn't answer.
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}
