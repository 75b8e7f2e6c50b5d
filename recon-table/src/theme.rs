//! Colours, text attributes and the theme used to paint a table.
//!
//! Colours are declared in Oklch (perceptual lightness/chroma/hue) or
//! plain RGB and converted to terminal RGB with `palette` at paint time.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Oklch { l: f32, c: f32, h: f32 },
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Color {
    pub const fn oklch(l: f32, c: f32, h: f32) -> Self {
        Self::Oklch { l, c, h }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb { r, g, b }
    }

    pub fn to_rgb(&self) -> Rgb {
        match *self {
            Self::Rgb { r, g, b } => Rgb::new(r, g, b),
            Self::Oklch { l, c, h } => oklch_to_rgb(l, c, h),
        }
    }
}

fn oklch_to_rgb(l: f32, c: f32, h: f32) -> Rgb {
    use palette::{Clamp, IntoColor, Oklch, Srgb};

    let oklch = Oklch::new(l, c, h);
    let srgb: Srgb = oklch.into_color();
    // Out-of-gamut colours come back slightly outside 0..=1.
    let (r, g, b) = srgb.clamp().into_format::<u8>().into_components();

    Rgb::new(r, g, b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub dim: bool,
}

impl TextStyle {
    pub const fn new() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            dim: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }
}

/// A theme provides named colours.
///
/// Besides the fixed role names the table asks for (`background`,
/// `foreground`, `muted`, `border`, `header`, `cursor`, `cursor_text`,
/// `accent`), a theme is also asked to resolve every row's `style_hint`.
/// The table never interprets a hint itself: whatever colour the theme
/// returns is painted as the row's left accent bar, and `None` paints
/// nothing.
pub trait Theme {
    /// Resolve a colour name or style hint to a concrete colour.
    fn resolve(&self, name: &str) -> Option<Color>;

    /// Resolve a role name, falling back to `fallback` when undefined.
    fn color_or(&self, name: &str, fallback: Color) -> Color {
        self.resolve(name).unwrap_or(fallback)
    }
}

/// Dark default theme with an overridable table of extra names.
///
/// Hosts register their style hints with [`DefaultTheme::with`].
#[derive(Debug, Clone)]
pub struct DefaultTheme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub header: Color,
    pub cursor: Color,
    pub cursor_text: Color,
    pub accent: Color,
    extra: HashMap<String, Color>,
}

impl DefaultTheme {
    pub fn new() -> Self {
        Self {
            background: Color::oklch(0.18, 0.0, 0.0),
            foreground: Color::oklch(0.93, 0.0, 0.0),
            muted: Color::oklch(0.6, 0.0, 0.0),
            border: Color::oklch(0.38, 0.0, 0.0),
            header: Color::oklch(0.85, 0.05, 250.0),
            cursor: Color::rgb(0xA2, 0x77, 0xFF),
            cursor_text: Color::oklch(0.18, 0.0, 0.0),
            accent: Color::oklch(0.72, 0.15, 250.0),
            extra: HashMap::new(),
        }
    }

    /// Register an extra colour name, typically a row style hint.
    pub fn with(mut self, name: impl Into<String>, color: Color) -> Self {
        self.extra.insert(name.into(), color);
        self
    }
}

impl Default for DefaultTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for DefaultTheme {
    fn resolve(&self, name: &str) -> Option<Color> {
        match name {
            "background" => Some(self.background),
            "foreground" => Some(self.foreground),
            "muted" => Some(self.muted),
            "border" => Some(self.border),
            "header" => Some(self.header),
            "cursor" => Some(self.cursor),
            "cursor_text" => Some(self.cursor_text),
            "accent" => Some(self.accent),
            other => self.extra.get(other).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_passes_through() {
        assert_eq!(Color::rgb(1, 2, 3).to_rgb(), Rgb::new(1, 2, 3));
    }

    #[test]
    fn oklch_extremes_map_to_black_and_white() {
        assert_eq!(Color::oklch(0.0, 0.0, 0.0).to_rgb(), Rgb::new(0, 0, 0));
        let white = Color::oklch(1.0, 0.0, 0.0).to_rgb();
        assert!(white.r >= 254 && white.g >= 254 && white.b >= 254);
    }

    #[test]
    fn extra_names_resolve() {
        let theme = DefaultTheme::new().with("border-l-warning", Color::rgb(200, 150, 0));
        assert_eq!(theme.resolve("border-l-warning"), Some(Color::rgb(200, 150, 0)));
        assert_eq!(theme.resolve("unknown"), None);
    }
}
