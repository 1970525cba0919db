//! Font attribute types

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    /// No underline
    #[default]
    None,
    /// Single underline
    Single,
    /// Double underline
    Double,
    /// Single underline placed low (accounting)
    SingleLow,
    /// Double underline placed low (accounting)
    DoubleLow,
}

impl Underline {
    pub fn is_underlined(self) -> bool {
        self != Underline::None
    }
}

/// Superscript/subscript placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontScript {
    /// Subscript
    Sub,
    /// Normal baseline
    #[default]
    Standard,
    /// Superscript
    Super,
}

/// Font size in points
///
/// Compared and hashed bit-for-bit so it can live inside a hash-consed style.
#[derive(Debug, Clone, Copy, PartialOrd)]
pub struct FontSize(f64);

impl FontSize {
    pub fn new(points: f64) -> Self {
        // -0.0 and 0.0 must intern to the same style
        FontSize(if points == 0.0 { 0.0 } else { points })
    }

    pub fn points(self) -> f64 {
        self.0
    }
}

impl From<f64> for FontSize {
    fn from(points: f64) -> Self {
        FontSize::new(points)
    }
}

impl PartialEq for FontSize {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FontSize {}

impl std::hash::Hash for FontSize {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}
