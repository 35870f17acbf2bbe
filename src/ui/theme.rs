//! TMDB-inspired theme for LMDB
//!
//! Dark navy background with the TMDB teal and green as the main accents.

use ratatui::style::{Color, Modifier, Style};

/// Color palette and style helpers
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0d253f (TMDB navy)
    pub const BACKGROUND: Color = Color::Rgb(0x0d, 0x25, 0x3f);

    /// Primary: #01b4e4 (TMDB light blue)
    pub const PRIMARY: Color = Color::Rgb(0x01, 0xb4, 0xe4);

    /// Secondary: #90cea1 (TMDB green)
    pub const SECONDARY: Color = Color::Rgb(0x90, 0xce, 0xa1);

    /// Accent: #f5c518 (gold)
    pub const ACCENT: Color = Color::Rgb(0xf5, 0xc5, 0x18);

    /// Text: #e6edf3
    pub const TEXT: Color = Color::Rgb(0xe6, 0xed, 0xf3);

    /// Dim: #7a8ca3
    pub const DIM: Color = Color::Rgb(0x7a, 0x8c, 0xa3);

    /// Rating ring colors
    pub const RATING_HIGH: Color = Color::Rgb(0x21, 0xd0, 0x7a);
    pub const RATING_MID: Color = Color::Rgb(0xd2, 0xd5, 0x31);
    pub const RATING_LOW: Color = Color::Rgb(0xdb, 0x23, 0x60);

    /// Error: #ff5c7a
    pub const ERROR: Color = Color::Rgb(0xff, 0x5c, 0x7a);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panels and the status bar
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x16, 0x33, 0x52);

    /// Unfocused borders
    pub const BORDER: Color = Color::Rgb(0x2f, 0x5a, 0x80);

    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Inverted with the primary color
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn list_item_selected() -> Style {
        Self::highlighted()
    }

    /// Media kind badge ([MOVIE], [TV], [PERSON])
    pub fn badge() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// "Load More" / "Loading..." / "No more results" row under a list
    pub fn footer() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Active tab label
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Vote average out of 10, colored like the TMDB score ring
    pub fn rating(score: f32) -> Style {
        let color = if score >= 7.0 {
            Self::RATING_HIGH
        } else if score >= 4.0 {
            Self::RATING_MID
        } else {
            Self::RATING_LOW
        };
        Style::default().fg(color)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance of a color.
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same color) to 21 (black/white).
/// WCAG AA requires >= 4.5:1 for normal text, >= 3:1 for large text.
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// RGB tuple of a ratatui Color (only the Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
