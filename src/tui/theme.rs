//! Color palettes for the scorecard form

use ratatui::prelude::*;

use crate::config::ThemeConfig;
use crate::scoring::Band;

/// Resolved theme (auto detection already applied)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Resolve the configured theme. `Auto` asks the terminal for its background
/// luma; must run before the terminal enters raw mode.
pub fn resolve_theme(config: ThemeConfig) -> Theme {
    match config {
        ThemeConfig::Dark => Theme::Dark,
        ThemeConfig::Light => Theme::Light,
        ThemeConfig::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Theme::Light,
            _ => Theme::Dark,
        },
    }
}

/// Complete color palette for the form
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Band colors
    pub band_elite: Color,
    pub band_strong: Color,
    pub band_solid: Color,
    pub band_developing: Color,
    pub band_at_risk: Color,

    pub bar_empty: Color,

    // Form table
    pub label_color: Color,
    pub value_color: Color,
    pub row_selected: Style,
    pub header_style: Style,

    // General
    pub muted: Color,
    pub title_color: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            band_elite: Color::Green,
            band_strong: Color::LightGreen,
            band_solid: Color::Cyan,
            band_developing: Color::Yellow,
            band_at_risk: Color::Red,
            bar_empty: Color::DarkGray,
            label_color: Color::Gray,
            value_color: Color::White,
            row_selected: Style::new().reversed(),
            header_style: Style::new().bold(),
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
            band_elite: Color::Rgb(0, 128, 0),
            band_strong: Color::Rgb(40, 140, 60),
            band_solid: Color::Rgb(0, 110, 140),
            band_developing: Color::Rgb(170, 110, 0),
            band_at_risk: Color::Rgb(190, 20, 20),
            bar_empty: Color::Indexed(250),
            label_color: Color::Indexed(240),
            value_color: Color::Black,
            row_selected: Style::new().reversed(),
            header_style: Style::new().bold(),
            muted: Color::Indexed(243),
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Rgb(190, 20, 20),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn band_color(&self, band: Band) -> Color {
        match band {
            Band::Elite => self.band_elite,
            Band::Strong => self.band_strong,
            Band::Solid => self.band_solid,
            Band::Developing => self.band_developing,
            Band::AtRisk => self.band_at_risk,
        }
    }

    /// Color for a sub-score on the 0-5 scale
    pub fn subscore_color(&self, score: f64) -> Color {
        if score >= 4.0 {
            self.band_elite
        } else if score >= 2.5 {
            self.band_developing
        } else {
            self.band_at_risk
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_theme_skips_detection() {
        assert_eq!(resolve_theme(ThemeConfig::Dark), Theme::Dark);
        assert_eq!(resolve_theme(ThemeConfig::Light), Theme::Light);
    }

    #[test]
    fn test_band_colors_distinct() {
        let colors = ThemeColors::dark();
        assert_eq!(colors.band_color(Band::Elite), Color::Green);
        assert_eq!(colors.band_color(Band::AtRisk), Color::Red);
        assert_ne!(colors.band_color(Band::Solid), colors.band_color(Band::Developing));
    }

    #[test]
    fn test_subscore_color_thresholds() {
        let colors = ThemeColors::light();
        assert_eq!(colors.subscore_color(5.0), colors.band_elite);
        assert_eq!(colors.subscore_color(3.0), colors.band_developing);
        assert_eq!(colors.subscore_color(0.0), colors.band_at_risk);
    }
}
