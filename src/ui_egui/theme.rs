//! Theme module for the Flowstate calendar
//!
//! Defines the base CalendarTheme (light/dark) and the per-category card
//! palette used by the timeline.

use egui::Color32;

use crate::models::category::ColorKey;
use crate::models::settings::ThemePreference;

/// Colors used across the application
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarTheme {
    /// Whether this is a dark theme (affects base egui::Visuals)
    pub is_dark: bool,

    /// Application background color
    pub app_background: Color32,

    /// Timeline background color
    pub calendar_background: Color32,

    /// Hour grid line color
    pub grid_line: Color32,

    /// Accent for the selected day and the current-time line
    pub primary: Color32,

    /// Primary text color (headings, dates)
    pub text_primary: Color32,

    /// Secondary text color (hour labels, meta text)
    pub text_secondary: Color32,
}

impl CalendarTheme {
    /// Create the default Light theme
    pub fn light() -> Self {
        Self {
            is_dark: false,
            app_background: Color32::from_rgb(246, 247, 248),
            calendar_background: Color32::from_rgb(255, 255, 255),
            grid_line: Color32::from_rgb(241, 245, 249),
            primary: Color32::from_rgb(19, 127, 236),
            text_primary: Color32::from_rgb(15, 23, 42),
            text_secondary: Color32::from_rgb(148, 163, 184),
        }
    }

    /// Create the default Dark theme
    pub fn dark() -> Self {
        Self {
            is_dark: true,
            app_background: Color32::from_rgb(16, 25, 34),
            calendar_background: Color32::from_rgb(16, 25, 34),
            grid_line: Color32::from_rgb(30, 41, 59),
            primary: Color32::from_rgb(19, 127, 236),
            text_primary: Color32::from_rgb(255, 255, 255),
            text_secondary: Color32::from_rgb(71, 85, 105),
        }
    }

    /// Pick the theme for a preference, asking the OS when set to system.
    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Light => Self::light(),
            ThemePreference::Dark => Self::dark(),
            ThemePreference::System => match dark_light::detect() {
                dark_light::Mode::Dark => Self::dark(),
                dark_light::Mode::Light | dark_light::Mode::Default => Self::light(),
            },
        }
    }

    /// Apply this theme to an egui context
    pub fn apply_to_context(&self, ctx: &egui::Context) {
        let mut visuals = if self.is_dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        visuals.window_fill = self.app_background;
        visuals.panel_fill = self.app_background;
        visuals.selection.bg_fill = self.primary;
        visuals.override_text_color = Some(self.text_primary);

        ctx.set_visuals(visuals);
    }
}

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn scale(color: Color32, factor: f32) -> Color32 {
    let channel = |c: u8| -> u8 { (c as f32 * factor).round().clamp(0.0, 255.0) as u8 };
    Color32::from_rgb(channel(color.r()), channel(color.g()), channel(color.b()))
}

fn lighten(color: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c: u8| -> u8 { (c as f32 + (255.0 - c as f32) * t).round() as u8 };
    Color32::from_rgb(lerp(color.r()), lerp(color.g()), lerp(color.b()))
}

/// Card colors for one [`ColorKey`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPalette {
    pub background: Color32,
    pub border: Color32,
    pub text: Color32,
    pub sub_text: Color32,
}

impl EventPalette {
    pub fn for_key(key: ColorKey, is_dark: bool) -> Self {
        let (r, g, b) = key.rgb();
        let base = Color32::from_rgb(r, g, b);
        Self {
            background: with_alpha(base, 26),
            border: base,
            text: if is_dark {
                lighten(base, 0.3)
            } else {
                scale(base, 0.8)
            },
            sub_text: lighten(base, 0.35),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_theme() {
        let theme = CalendarTheme::light();
        assert!(!theme.is_dark);
        assert_eq!(CalendarTheme::for_preference(ThemePreference::Light), theme);
    }

    #[test]
    fn test_dark_theme() {
        let theme = CalendarTheme::dark();
        assert!(theme.is_dark);
        assert_eq!(CalendarTheme::for_preference(ThemePreference::Dark), theme);
    }

    #[test]
    fn test_palette_border_is_key_color() {
        for key in ColorKey::ALL {
            let (r, g, b) = key.rgb();
            let palette = EventPalette::for_key(key, false);
            assert_eq!(palette.border, Color32::from_rgb(r, g, b));
            assert!(palette.background.a() < 255);
        }
    }

    #[test]
    fn test_dark_text_is_lighter() {
        let light = EventPalette::for_key(ColorKey::Indigo, false);
        let dark = EventPalette::for_key(ColorKey::Indigo, true);
        assert!(dark.text.r() > light.text.r());
    }
}
