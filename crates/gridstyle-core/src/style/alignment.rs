//! Text alignment types

/// Horizontal alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// General alignment (text left, numbers right)
    #[default]
    General,
    /// Left aligned
    Left,
    /// Right aligned
    Right,
    /// Center aligned
    Center,
    /// Fill (repeat content to fill cell width)
    Fill,
    /// Justify (stretch to fit width)
    Justify,
    /// Center across selection
    CenterAcrossSelection,
    /// Distributed (like justify, but for East Asian text)
    Distributed,
}

impl HorizontalAlignment {
    /// Alignments whose text may spill into or span neighbouring cells
    pub fn spans(self) -> bool {
        matches!(
            self,
            HorizontalAlignment::CenterAcrossSelection | HorizontalAlignment::Fill
        )
    }
}

/// Vertical alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    /// Top aligned
    Top,
    /// Bottom aligned (default)
    #[default]
    Bottom,
    /// Center aligned
    Center,
    /// Justify
    Justify,
    /// Distributed
    Distributed,
}

/// Text direction (reading order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    /// Context dependent
    #[default]
    Context,
    /// Right to left
    RightToLeft,
    /// Left to right
    LeftToRight,
}
