use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Page-wide colour scheme. Owned by the page and handed to renderers as a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Glyph shown on the nav bar toggle: the theme you would switch to.
    pub fn toggle_glyph(self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: GRAY_900,
                text: Color::White,
                muted: GRAY_300,
                surface: GRAY_800,
                card: GRAY_700,
                accent: BLUE_500,
                highlight: YELLOW_500,
                dot_active: Color::White,
                dot_inactive: GRAY_600,
                control: GRAY_800,
                control_inert: GRAY_600,
                toggle_bg: Color::White,
                toggle_fg: GRAY_900,
            },
            Theme::Light => Palette {
                background: Color::White,
                text: GRAY_900,
                muted: GRAY_600,
                surface: Color::White,
                card: GRAY_100,
                accent: BLUE_500,
                highlight: YELLOW_500,
                dot_active: GRAY_800,
                dot_inactive: GRAY_300,
                control: Color::White,
                control_inert: GRAY_300,
                toggle_bg: GRAY_900,
                toggle_fg: Color::White,
            },
        }
    }
}

/// Read-only colour set derived from a [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    /// Secondary text (descriptions, years).
    pub muted: Color,
    /// Section panels and the footer.
    pub surface: Color,
    /// Cards nested inside a surface.
    pub card: Color,
    pub accent: Color,
    pub highlight: Color,
    pub dot_active: Color,
    pub dot_inactive: Color,
    pub control: Color,
    /// Carousel control with nothing left to scroll to.
    pub control_inert: Color,
    pub toggle_bg: Color,
    pub toggle_fg: Color,
}

const GRAY_100: Color = Color::Rgb(243, 244, 246);
const GRAY_300: Color = Color::Rgb(209, 213, 219);
const GRAY_600: Color = Color::Rgb(75, 85, 99);
const GRAY_700: Color = Color::Rgb(55, 65, 81);
const GRAY_800: Color = Color::Rgb(31, 41, 55);
const GRAY_900: Color = Color::Rgb(17, 24, 39);
const BLUE_500: Color = Color::Rgb(59, 130, 246);
const YELLOW_500: Color = Color::Rgb(234, 179, 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_palettes_swap_dot_contrast() {
        let dark = Theme::Dark.palette();
        let light = Theme::Light.palette();
        assert_eq!(dark.dot_active, Color::White);
        assert_eq!(light.dot_active, GRAY_800);
        assert_ne!(dark.card, light.card);
    }

    #[test]
    fn test_theme_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            theme: Theme,
        }
        let parsed: Wrapper = toml::from_str("theme = \"light\"").unwrap();
        assert_eq!(parsed.theme, Theme::Light);
    }
}
