//! Color theme definitions for the UI.
//!
//! Provides 6 built-in themes: default, dracula, monochrome, nord, gruvbox,
//! solarized. Themes can be selected via the `--theme` CLI flag or cycled
//! at runtime.

use ratatui::style::Color;
use std::borrow::Cow;

/// All themeable colors in the application
#[derive(Clone, Debug)]
pub struct Theme {
    name: Cow<'static, str>,

    // UI chrome
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub text_dim: Color,
    pub highlight_bg: Color,

    // Status indicators
    pub success: Color, // SUCCESS rows, celebration
    pub warning: Color, // pending, missing results
    pub error: Color,   // failed rows, errors

    // Accents
    pub shortcut: Color, // keyboard hints
    pub header: Color,   // title text
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: Cow::Borrowed("default"),

            border: Color::Gray,
            border_focused: Color::Cyan,
            text: Color::White,
            text_dim: Color::Gray,
            highlight_bg: Color::DarkGray,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,

            shortcut: Color::Yellow,
            header: Color::Cyan,
        }
    }

    /// Dracula theme - popular dark theme
    pub fn dracula() -> Self {
        Self {
            name: Cow::Borrowed("dracula"),

            border: Color::Rgb(98, 114, 164),         // Comment
            border_focused: Color::Rgb(189, 147, 249), // Purple
            text: Color::Rgb(248, 248, 242),          // Foreground
            text_dim: Color::Rgb(98, 114, 164),       // Comment
            highlight_bg: Color::Rgb(68, 71, 90),     // Current line

            success: Color::Rgb(80, 250, 123),        // Green
            warning: Color::Rgb(255, 184, 108),       // Orange
            error: Color::Rgb(255, 85, 85),           // Red

            shortcut: Color::Rgb(241, 250, 140),      // Yellow
            header: Color::Rgb(255, 121, 198),        // Pink
        }
    }

    /// Monochrome theme - grayscale only
    pub fn monochrome() -> Self {
        Self {
            name: Cow::Borrowed("monochrome"),

            border: Color::Rgb(120, 120, 120),
            border_focused: Color::Rgb(255, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(120, 120, 120),
            highlight_bg: Color::Rgb(50, 50, 50),

            success: Color::Rgb(200, 200, 200),
            warning: Color::Rgb(170, 170, 170),
            error: Color::Rgb(255, 255, 255),

            shortcut: Color::Rgb(200, 200, 200),
            header: Color::Rgb(255, 255, 255),
        }
    }

    /// Nord theme - arctic, north-bluish colors
    pub fn nord() -> Self {
        Self {
            name: Cow::Borrowed("nord"),

            border: Color::Rgb(76, 86, 106),          // Nord3
            border_focused: Color::Rgb(136, 192, 208), // Nord8 cyan
            text: Color::Rgb(236, 239, 244),          // Nord6
            text_dim: Color::Rgb(76, 86, 106),        // Nord3
            highlight_bg: Color::Rgb(59, 66, 82),     // Nord1

            success: Color::Rgb(163, 190, 140),       // Nord14 green
            warning: Color::Rgb(235, 203, 139),       // Nord13 yellow
            error: Color::Rgb(191, 97, 106),          // Nord11 red

            shortcut: Color::Rgb(235, 203, 139),
            header: Color::Rgb(136, 192, 208),
        }
    }

    /// Gruvbox theme - retro groove colors
    pub fn gruvbox() -> Self {
        Self {
            name: Cow::Borrowed("gruvbox"),

            border: Color::Rgb(146, 131, 116),        // Gray
            border_focused: Color::Rgb(254, 128, 25), // Orange
            text: Color::Rgb(235, 219, 178),          // fg
            text_dim: Color::Rgb(146, 131, 116),
            highlight_bg: Color::Rgb(80, 73, 69),     // bg2

            success: Color::Rgb(184, 187, 38),
            warning: Color::Rgb(250, 189, 47),
            error: Color::Rgb(251, 73, 52),

            shortcut: Color::Rgb(250, 189, 47),
            header: Color::Rgb(254, 128, 25),
        }
    }

    /// Solarized Dark theme
    pub fn solarized() -> Self {
        Self {
            name: Cow::Borrowed("solarized"),

            border: Color::Rgb(88, 110, 117),         // base01
            border_focused: Color::Rgb(42, 161, 152), // Cyan
            text: Color::Rgb(131, 148, 150),          // base0
            text_dim: Color::Rgb(88, 110, 117),
            highlight_bg: Color::Rgb(7, 54, 66),      // base02

            success: Color::Rgb(133, 153, 0),
            warning: Color::Rgb(181, 137, 0),
            error: Color::Rgb(220, 50, 47),

            shortcut: Color::Rgb(181, 137, 0),
            header: Color::Rgb(203, 75, 22),          // Orange
        }
    }

    /// Get a theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "monochrome" | "mono" => Self::monochrome(),
            "nord" => Self::nord(),
            "gruvbox" => Self::gruvbox(),
            "solarized" => Self::solarized(),
            _ => Self::default_theme(),
        }
    }

    /// Get the theme name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List all available theme names
    pub fn list() -> &'static [&'static str] {
        &["default", "dracula", "monochrome", "nord", "gruvbox", "solarized"]
    }

    /// Position of `name` in [`Theme::list`], falling back to the default
    pub fn index_of(name: &str) -> usize {
        let resolved = Self::by_name(name);
        Self::list()
            .iter()
            .position(|&n| n == resolved.name())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_default() {
        let theme = Theme::by_name("default");
        assert_eq!(theme.name(), "default");
        assert_eq!(theme.border_focused, Color::Cyan);
    }

    #[test]
    fn test_by_name_unknown_returns_default() {
        assert_eq!(Theme::by_name("unknown_theme").name(), "default");
    }

    #[test]
    fn test_by_name_case_insensitive() {
        assert_eq!(Theme::by_name("NORD").name(), "nord");
        assert_eq!(Theme::by_name("mono").name(), "monochrome");
    }

    #[test]
    fn test_index_of() {
        assert_eq!(Theme::index_of("default"), 0);
        assert_eq!(Theme::index_of("Gruvbox"), 4);
        assert_eq!(Theme::index_of("nonexistent"), 0);
    }

    #[test]
    fn test_all_themes_have_distinct_colors() {
        for name in Theme::list() {
            let theme = Theme::by_name(name);
            assert_eq!(theme.name(), *name);
            assert_ne!(
                format!("{:?}", theme.success),
                format!("{:?}", theme.error),
                "{} has same success and error colors",
                name
            );
            assert_ne!(
                format!("{:?}", theme.border),
                format!("{:?}", theme.border_focused),
                "{} cannot show focus",
                name
            );
        }
    }
}
