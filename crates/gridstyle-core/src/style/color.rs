//! Color representation

use std::fmt;

/// Color of a font, background, pattern or border line
///
/// Automatic colors come in two flavours: [`Color::Auto`] is what callers
/// build, [`Color::AutoRgb`] is what the pool stores once the style has been
/// linked to a sheet and the automatic color has been resolved against the
/// sheet's auto-pattern color. Both report `is_auto() == true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic color, not yet resolved against a sheet
    #[default]
    Auto,

    /// Automatic color resolved against a sheet
    AutoRgb { r: u8, g: u8, b: u8 },

    /// Explicit RGB color
    Rgb { r: u8, g: u8, b: u8 },

    /// Theme color with tint (-100..=100 percent)
    Theme { index: u8, tint: i8 },

    /// Indexed color (legacy 56 entry palette)
    Indexed(u8),
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create a theme color
    pub const fn theme(index: u8, tint: i8) -> Self {
        Color::Theme { index, tint }
    }

    /// Create from a hex string (e.g., "#FF0000" or "FF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb { r, g, b })
    }

    /// Convert to hex string (without # prefix)
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        format!("{r:02X}{g:02X}{b:02X}")
    }

    /// Convert to RGB tuple; an unresolved automatic color renders black
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        match *self {
            Color::Auto => (0, 0, 0),
            Color::AutoRgb { r, g, b } | Color::Rgb { r, g, b } => (r, g, b),
            Color::Theme { index, tint } => Self::apply_tint(Self::theme_to_rgb(index), tint),
            Color::Indexed(i) => Self::indexed_to_rgb(i),
        }
    }

    /// Check if color is automatic (resolved or not)
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto | Color::AutoRgb { .. })
    }

    /// Resolve an automatic color against a sheet's auto-pattern color.
    ///
    /// Explicit colors are returned unchanged.
    pub fn resolve_auto(self, sheet_auto: Color) -> Color {
        if !self.is_auto() {
            return self;
        }
        let (r, g, b) = sheet_auto.to_rgb();
        Color::AutoRgb { r, g, b }
    }

    /// Forget any sheet resolution of an automatic color
    pub fn unresolved(self) -> Color {
        if self.is_auto() {
            Color::Auto
        } else {
            self
        }
    }

    fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
        #[rustfmt::skip]
        const PALETTE: [(u8, u8, u8); 56] = [
            (0, 0, 0), (255, 255, 255), (255, 0, 0), (0, 255, 0),
            (0, 0, 255), (255, 255, 0), (255, 0, 255), (0, 255, 255),
            (0, 0, 0), (255, 255, 255), (255, 0, 0), (0, 255, 0),
            (0, 0, 255), (255, 255, 0), (255, 0, 255), (0, 255, 255),
            (128, 0, 0), (0, 128, 0), (0, 0, 128), (128, 128, 0),
            (128, 0, 128), (0, 128, 128), (192, 192, 192), (128, 128, 128),
            (153, 153, 255), (153, 51, 102), (255, 255, 204), (204, 255, 255),
            (102, 0, 102), (255, 128, 128), (0, 102, 204), (204, 204, 255),
            (0, 0, 128), (255, 0, 255), (255, 255, 0), (0, 255, 255),
            (128, 0, 128), (128, 0, 0), (0, 128, 128), (0, 0, 255),
            (0, 204, 255), (204, 255, 255), (204, 255, 204), (255, 255, 153),
            (153, 204, 255), (255, 153, 204), (204, 153, 255), (255, 204, 153),
            (51, 102, 255), (51, 204, 204), (153, 204, 0), (255, 204, 0),
            (255, 153, 0), (255, 102, 0), (102, 102, 153), (150, 150, 150),
        ];

        PALETTE.get(index as usize).copied().unwrap_or((0, 0, 0))
    }

    fn theme_to_rgb(index: u8) -> (u8, u8, u8) {
        match index {
            0 => (255, 255, 255),
            1 => (0, 0, 0),
            2 => (238, 236, 225),
            3 => (31, 73, 125),
            4 => (79, 129, 189),
            5 => (192, 80, 77),
            6 => (155, 187, 89),
            7 => (128, 100, 162),
            8 => (75, 172, 198),
            9 => (247, 150, 70),
            _ => (0, 0, 0),
        }
    }

    fn apply_tint(color: (u8, u8, u8), tint: i8) -> (u8, u8, u8) {
        let tint = tint as f64 / 100.0;

        let apply = |c: u8| -> u8 {
            let c = c as f64;
            let result = if tint < 0.0 {
                c * (1.0 + tint)
            } else {
                c + (255.0 - c) * tint
            };
            result.clamp(0.0, 255.0) as u8
        };

        (apply(color.0), apply(color.1), apply(color.2))
    }

    pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
    pub const RED: Color = Color::Rgb { r: 255, g: 0, b: 0 };
    pub const GREEN: Color = Color::Rgb { r: 0, g: 255, b: 0 };
    pub const BLUE: Color = Color::Rgb { r: 0, g: 0, b: 255 };
    pub const YELLOW: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 0,
    };
    /// Default grid line color
    pub const GRID: Color = Color::Rgb {
        r: 199,
        g: 199,
        b: 199,
    };
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::AutoRgb { r, g, b } => write!(f, "auto(#{r:02X}{g:02X}{b:02X})"),
            Color::Rgb { r, g, b } => write!(f, "#{r:02X}{g:02X}{b:02X}"),
            Color::Theme { index, tint } => write!(f, "theme({index}, {tint}%)"),
            Color::Indexed(i) => write!(f, "indexed({i})"),
        }
    }
}
