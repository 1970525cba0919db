//! Border line types

use super::Color;

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Border {
    /// Line style
    pub line: BorderLineStyle,
    /// Line color; automatic colors follow the sheet's auto-pattern color
    pub color: Color,
}

impl Border {
    /// The "no border" edge. Renders as a grid line unless suppressed.
    pub const NONE: Border = Border {
        line: BorderLineStyle::None,
        color: Color::Auto,
    };

    /// Create a new border edge
    pub const fn new(line: BorderLineStyle, color: Color) -> Self {
        Self { line, color }
    }

    /// A thin line in the automatic color
    pub const fn thin() -> Self {
        Self::new(BorderLineStyle::Thin, Color::Auto)
    }

    /// A medium line in the automatic color
    pub const fn medium() -> Self {
        Self::new(BorderLineStyle::Medium, Color::Auto)
    }

    /// A thick line in the automatic color
    pub const fn thick() -> Self {
        Self::new(BorderLineStyle::Thick, Color::Auto)
    }

    /// Whether anything other than the grid would be drawn
    pub fn is_visible(&self) -> bool {
        self.line != BorderLineStyle::None
    }

    /// Pick the border that wins when two cells share an edge.
    ///
    /// The heavier line wins; on a tie `neighbor` wins.
    pub fn stronger(own: Border, neighbor: Border) -> Border {
        if own.line.weight() > neighbor.line.weight() {
            own
        } else {
            neighbor
        }
    }

    pub(crate) fn resolve_auto(self, sheet_auto: Color) -> Border {
        Border {
            line: self.line,
            color: self.color.resolve_auto(sheet_auto),
        }
    }
}

/// Border line styles, in their traditional numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum BorderLineStyle {
    #[default]
    None = 0,
    Thin = 1,
    Medium = 2,
    Dashed = 3,
    Dotted = 4,
    Thick = 5,
    Double = 6,
    Hair = 7,
    MediumDash = 8,
    DashDot = 9,
    MediumDashDot = 10,
    DashDotDot = 11,
    MediumDashDotDot = 12,
    SlantedDashDot = 13,
}

impl BorderLineStyle {
    /// All line styles, `None` first
    pub const ALL: [BorderLineStyle; 14] = [
        BorderLineStyle::None,
        BorderLineStyle::Thin,
        BorderLineStyle::Medium,
        BorderLineStyle::Dashed,
        BorderLineStyle::Dotted,
        BorderLineStyle::Thick,
        BorderLineStyle::Double,
        BorderLineStyle::Hair,
        BorderLineStyle::MediumDash,
        BorderLineStyle::DashDot,
        BorderLineStyle::MediumDashDot,
        BorderLineStyle::DashDotDot,
        BorderLineStyle::MediumDashDotDot,
        BorderLineStyle::SlantedDashDot,
    ];

    /// Pen width in pixels; 0 means a hairline pen (thin and double lines)
    pub fn width(self) -> u8 {
        match self {
            BorderLineStyle::None | BorderLineStyle::Thin | BorderLineStyle::Double => 0,
            BorderLineStyle::Dashed
            | BorderLineStyle::Dotted
            | BorderLineStyle::Hair
            | BorderLineStyle::DashDot
            | BorderLineStyle::DashDotDot => 1,
            BorderLineStyle::Medium
            | BorderLineStyle::MediumDash
            | BorderLineStyle::MediumDashDot
            | BorderLineStyle::MediumDashDotDot
            | BorderLineStyle::SlantedDashDot => 2,
            BorderLineStyle::Thick => 3,
        }
    }

    /// Visual weight used to pick between two lines on a shared edge
    pub fn weight(self) -> u8 {
        match self {
            BorderLineStyle::None => 0,
            BorderLineStyle::Hair => 1,
            BorderLineStyle::Dotted => 2,
            BorderLineStyle::DashDotDot => 3,
            BorderLineStyle::DashDot => 4,
            BorderLineStyle::Dashed => 5,
            BorderLineStyle::Thin => 6,
            BorderLineStyle::MediumDashDotDot => 7,
            BorderLineStyle::SlantedDashDot => 8,
            BorderLineStyle::MediumDashDot => 9,
            BorderLineStyle::MediumDash => 10,
            BorderLineStyle::Medium => 11,
            BorderLineStyle::Thick => 12,
            BorderLineStyle::Double => 13,
        }
    }
}

/// Where a border sits relative to a cell or a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderLocation {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
    /// Top-left to bottom-right
    RevDiagonal = 4,
    /// Bottom-left to top-right
    Diagonal = 5,
    /// Inner horizontal lines of a range
    Horizontal = 6,
    /// Inner vertical lines of a range
    Vertical = 7,
}

impl BorderLocation {
    pub const ALL: [BorderLocation; 8] = [
        BorderLocation::Top,
        BorderLocation::Bottom,
        BorderLocation::Left,
        BorderLocation::Right,
        BorderLocation::RevDiagonal,
        BorderLocation::Diagonal,
        BorderLocation::Horizontal,
        BorderLocation::Vertical,
    ];

    pub fn orientation(self) -> BorderOrientation {
        match self {
            BorderLocation::Left | BorderLocation::Right | BorderLocation::Vertical => {
                BorderOrientation::Vertical
            }
            BorderLocation::Diagonal | BorderLocation::RevDiagonal => BorderOrientation::Diagonal,
            BorderLocation::Top | BorderLocation::Bottom | BorderLocation::Horizontal => {
                BorderOrientation::Horizontal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderOrientation {
    Horizontal,
    Vertical,
    Diagonal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_follow_line_table() {
        assert_eq!(BorderLineStyle::None.width(), 0);
        assert_eq!(BorderLineStyle::Medium.width(), 2);
        assert_eq!(BorderLineStyle::Thick.width(), 3);
        assert_eq!(BorderLineStyle::Hair.width(), 1);
        assert_eq!(BorderLineStyle::SlantedDashDot.width(), 2);
    }

    #[test]
    fn test_weights_are_distinct() {
        let mut weights: Vec<u8> = BorderLineStyle::ALL.iter().map(|l| l.weight()).collect();
        weights.sort_unstable();
        weights.dedup();
        assert_eq!(weights.len(), BorderLineStyle::ALL.len());
    }

    #[test]
    fn test_stronger() {
        let thin = Border::new(BorderLineStyle::Thin, Color::RED);
        let thick = Border::new(BorderLineStyle::Thick, Color::BLUE);
        assert_eq!(Border::stronger(thin, thick), thick);
        assert_eq!(Border::stronger(thick, thin), thick);
        assert_eq!(Border::stronger(Border::NONE, thin), thin);

        // tie goes to the neighbor
        let other_thin = Border::new(BorderLineStyle::Thin, Color::GREEN);
        assert_eq!(Border::stronger(thin, other_thin), other_thin);
    }

    #[test]
    fn test_orientation() {
        assert_eq!(
            BorderLocation::Left.orientation(),
            BorderOrientation::Vertical
        );
        assert_eq!(
            BorderLocation::Bottom.orientation(),
            BorderOrientation::Horizontal
        );
        assert_eq!(
            BorderLocation::RevDiagonal.orientation(),
            BorderOrientation::Diagonal
        );
    }
}
