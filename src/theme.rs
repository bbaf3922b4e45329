//! Light and night themes
//!
//! A single flag selects everything that changes with the theme: the window
//! palette, the four widget styles (editor, toolbar, menu bar, status bar)
//! and the CSS embedded in preview pages. All values are fixed; there are
//! no intermediate states.

use serde::{Deserialize, Serialize};

/// Which theme is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_night_mode(night_mode: bool) -> Self {
        if night_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph for the night mode toolbar toggle
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                Some(Self::new(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::new(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0`
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

const fn hex(value: u32) -> Rgb {
    Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

/// Window palette roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub window: Rgb,
    pub window_text: Rgb,
    pub base: Rgb,
    pub alternate_base: Rgb,
    pub tooltip_base: Rgb,
    pub tooltip_text: Rgb,
    pub text: Rgb,
    pub button: Rgb,
    pub button_text: Rgb,
    pub bright_text: Rgb,
    pub link: Rgb,
    pub highlight: Rgb,
    pub highlighted_text: Rgb,
    /// Conversion errors in the preview, matching the error page
    pub error: Rgb,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            window: hex(0xefefef),
            window_text: hex(0x000000),
            base: hex(0xffffff),
            alternate_base: hex(0xf7f7f7),
            tooltip_base: hex(0xffffdc),
            tooltip_text: hex(0x000000),
            text: hex(0x000000),
            button: hex(0xefefef),
            button_text: hex(0x000000),
            bright_text: hex(0xffffff),
            link: hex(0x0000ff),
            highlight: hex(0x308cc6),
            highlighted_text: hex(0xffffff),
            error: hex(0xd73a49),
        }
    }

    pub fn dark() -> Self {
        let white = hex(0xffffff);
        Self {
            window: Rgb::new(45, 45, 48),
            window_text: white,
            base: Rgb::new(30, 30, 30),
            alternate_base: Rgb::new(45, 45, 48),
            tooltip_base: white,
            tooltip_text: white,
            text: white,
            button: Rgb::new(45, 45, 48),
            button_text: white,
            bright_text: hex(0xff0000),
            link: Rgb::new(42, 130, 218),
            highlight: Rgb::new(42, 130, 218),
            highlighted_text: hex(0x000000),
            error: hex(0xf85149),
        }
    }
}

/// Colours of one styled widget; unused roles are `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetStyle {
    pub background: Rgb,
    pub foreground: Rgb,
    pub border: Option<Rgb>,
    pub hover: Option<Rgb>,
    /// Selection background for the editor, checked state for buttons
    pub accent: Option<Rgb>,
    pub accent_text: Option<Rgb>,
}

impl WidgetStyle {
    const fn plain(background: Rgb, foreground: Rgb) -> Self {
        Self {
            background,
            foreground,
            border: None,
            hover: None,
            accent: None,
            accent_text: None,
        }
    }
}

/// Every style derived from the active theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyles {
    pub theme: Theme,
    pub palette: Palette,
    pub editor: WidgetStyle,
    pub toolbar: WidgetStyle,
    pub menubar: WidgetStyle,
    pub statusbar: WidgetStyle,
}

impl ThemeStyles {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    fn light() -> Self {
        let chrome = hex(0xf5f5f5);
        let ink = hex(0x333333);
        let border = hex(0xdddddd);
        let hover = hex(0xe0e0e0);
        let accent = hex(0x3399ff);

        Self {
            theme: Theme::Light,
            palette: Palette::light(),
            editor: WidgetStyle {
                border: Some(border),
                accent: Some(accent),
                ..WidgetStyle::plain(hex(0xffffff), ink)
            },
            toolbar: WidgetStyle {
                border: Some(border),
                hover: Some(hover),
                accent: Some(accent),
                accent_text: Some(hex(0xffffff)),
                ..WidgetStyle::plain(chrome, ink)
            },
            menubar: WidgetStyle {
                hover: Some(hover),
                ..WidgetStyle::plain(chrome, ink)
            },
            statusbar: WidgetStyle::plain(chrome, ink),
        }
    }

    fn dark() -> Self {
        let chrome = hex(0x3e3e42);
        let ink = hex(0xf1f1f1);
        let hover = hex(0x555555);
        let accent = hex(0x264f78);

        Self {
            theme: Theme::Dark,
            palette: Palette::dark(),
            editor: WidgetStyle {
                border: Some(chrome),
                accent: Some(accent),
                ..WidgetStyle::plain(hex(0x2d2d30), ink)
            },
            toolbar: WidgetStyle {
                border: Some(hover),
                hover: Some(hover),
                accent: Some(accent),
                accent_text: Some(ink),
                ..WidgetStyle::plain(chrome, ink)
            },
            menubar: WidgetStyle {
                hover: Some(hover),
                ..WidgetStyle::plain(chrome, ink)
            },
            statusbar: WidgetStyle::plain(chrome, ink),
        }
    }
}

/// Owns the night mode flag
#[derive(Debug, Clone)]
pub struct ThemeManager {
    theme: Theme,
}

impl ThemeManager {
    pub fn new(night_mode: bool) -> Self {
        Self {
            theme: Theme::from_night_mode(night_mode),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_night_mode(&self) -> bool {
        self.theme.is_dark()
    }

    /// Flip the flag and return the new theme
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        log::debug!("Theme switched to {:?}", self.theme);
        self.theme
    }

    pub fn styles(&self) -> ThemeStyles {
        ThemeStyles::for_theme(self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_light() {
        let mut manager = ThemeManager::new(false);
        let before = manager.styles();
        assert_eq!(manager.toggle(), Theme::Dark);
        assert_ne!(manager.styles(), before);
        assert_eq!(manager.toggle(), Theme::Light);
        assert_eq!(manager.styles(), before);
    }

    #[test]
    fn test_dark_values() {
        let styles = ThemeManager::new(true).styles();
        assert_eq!(styles.editor.background.to_hex(), "#2d2d30");
        assert_eq!(styles.editor.accent, Some(Rgb::new(0x26, 0x4f, 0x78)));
        assert_eq!(styles.toolbar.background.to_hex(), "#3e3e42");
        assert_eq!(styles.palette.window, Rgb::new(45, 45, 48));
        assert_eq!(styles.palette.highlight, Rgb::new(42, 130, 218));
    }

    #[test]
    fn test_light_values() {
        let styles = ThemeStyles::for_theme(Theme::Light);
        assert_eq!(styles.editor.background.to_hex(), "#ffffff");
        assert_eq!(styles.editor.foreground.to_hex(), "#333333");
        assert_eq!(styles.statusbar.background.to_hex(), "#f5f5f5");
        assert_eq!(styles.toolbar.hover, Some(hex(0xe0e0e0)));
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#ddd"), Some(Rgb::new(0xdd, 0xdd, 0xdd)));
        assert_eq!(Rgb::from_hex("#264f78"), Some(Rgb::new(0x26, 0x4f, 0x78)));
        assert_eq!(Rgb::from_hex("264f78"), None);
        assert_eq!(Rgb::from_hex("#12"), None);
    }

    #[test]
    fn test_toggle_icon() {
        assert_eq!(Theme::Light.toggle_icon(), "🌙");
        assert_eq!(Theme::Dark.toggle_icon(), "☀️");
    }
}
