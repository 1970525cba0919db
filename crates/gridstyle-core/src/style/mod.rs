//! Cell styling types
//!
//! A [`Style`] is a sparse attribute set: every [`StyleElement`] is either
//! set to a value or unset. Full styles (every presentational element set)
//! live in the grid; partial styles are merged onto them.
//!
//! - [`Style`] - the attribute set
//! - [`StylePool`] / [`SharedStyle`] - hash-consed, immutable shared styles
//! - [`Color`], [`Border`] - color and border line values
//! - [`NumberFormat`] - opaque number format handle

mod alignment;
mod border;
mod color;
mod font;
mod number_format;
mod pool;

pub use alignment::{HorizontalAlignment, TextDirection, VerticalAlignment};
pub use border::{Border, BorderLineStyle, BorderLocation, BorderOrientation};
pub use color::Color;
pub use font::{FontScript, FontSize, Underline};
pub use number_format::NumberFormat;
pub use pool::{PoolStats, SharedStyle, SheetLink, StylePool};

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::conditions::StyleConditions;
use crate::handle::Handle;
use crate::hyperlink::Hyperlink;
use crate::validation::{InputMessage, Validation};

macro_rules! element_accessors {
    (val $get:ident $with:ident $set:ident $field:ident $ty:ty) => {
        pub fn $get(&self) -> Option<$ty> {
            self.$field
        }

        pub fn $with(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }

        pub fn $set(&mut self, value: $ty) -> &mut Self {
            self.$field = Some(value);
            self
        }
    };
    (into $get:ident $with:ident $set:ident $field:ident $ty:ty) => {
        pub fn $get(&self) -> Option<$ty> {
            self.$field
        }

        pub fn $with(mut self, value: impl Into<$ty>) -> Self {
            self.$field = Some(value.into());
            self
        }

        pub fn $set(&mut self, value: impl Into<$ty>) -> &mut Self {
            self.$field = Some(value.into());
            self
        }
    };
    (borrow $get:ident $with:ident $set:ident $field:ident $ty:ty) => {
        pub fn $get(&self) -> Option<&$ty> {
            self.$field.as_ref()
        }

        pub fn $with(mut self, value: impl Into<$ty>) -> Self {
            self.$field = Some(value.into());
            self
        }

        pub fn $set(&mut self, value: impl Into<$ty>) -> &mut Self {
            self.$field = Some(value.into());
            self
        }
    };
}

macro_rules! style_elements {
    ($(
        $(#[$meta:meta])*
        $elem:ident => $field:ident: $ty:ty, $kind:ident $with:ident $set:ident;
    )*) => {
        /// Individual attributes of a [`Style`]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum StyleElement {
            $( $(#[$meta])* $elem, )*
        }

        impl StyleElement {
            /// Every element, in declaration order
            pub const ALL: &'static [StyleElement] = &[$(StyleElement::$elem),*];

            pub fn name(self) -> &'static str {
                match self {
                    $( StyleElement::$elem => stringify!($elem), )*
                }
            }
        }

        /// A sparse cell attribute set
        ///
        /// Styles are plain values while they are being built. Once handed to
        /// a [`StylePool`] they become [`SharedStyle`]s and can no longer be
        /// mutated.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct Style {
            $( $field: Option<$ty>, )*
        }

        impl Style {
            $( element_accessors!($kind $field $with $set $field $ty); )*

            /// Whether `elem` carries a value
            pub fn is_element_set(&self, elem: StyleElement) -> bool {
                match elem {
                    $( StyleElement::$elem => self.$field.is_some(), )*
                }
            }

            /// Clear `elem`
            pub fn unset_element(&mut self, elem: StyleElement) {
                match elem {
                    $( StyleElement::$elem => self.$field = None, )*
                }
            }

            /// Copy `elem` from `src` if `src` has it set
            pub fn merge_element(&mut self, src: &Style, elem: StyleElement) {
                match elem {
                    $(
                        StyleElement::$elem => {
                            if let Some(value) = &src.$field {
                                self.$field = Some(value.clone());
                            }
                        }
                    )*
                }
            }

            /// Whether `elem` holds the same value (or is unset) in both styles
            pub fn element_eq(&self, other: &Style, elem: StyleElement) -> bool {
                match elem {
                    $( StyleElement::$elem => self.$field == other.$field, )*
                }
            }
        }
    };
}

style_elements! {
    BackColor => back_color: Color, val with_back_color set_back_color;
    PatternColor => pattern_color: Color, val with_pattern_color set_pattern_color;
    BorderTop => border_top: Border, val with_border_top set_border_top;
    BorderBottom => border_bottom: Border, val with_border_bottom set_border_bottom;
    BorderLeft => border_left: Border, val with_border_left set_border_left;
    BorderRight => border_right: Border, val with_border_right set_border_right;
    /// Top-left to bottom-right
    BorderRevDiagonal => border_rev_diagonal: Border,
        val with_border_rev_diagonal set_border_rev_diagonal;
    /// Bottom-left to top-right
    BorderDiagonal => border_diagonal: Border, val with_border_diagonal set_border_diagonal;
    /// Fill pattern index, 0 is "no fill", 1 is solid
    Pattern => pattern: u8, val with_pattern set_pattern;
    FontColor => font_color: Color, val with_font_color set_font_color;
    FontName => font_name: Arc<str>, borrow with_font_name set_font_name;
    FontBold => font_bold: bool, val with_bold set_bold;
    FontItalic => font_italic: bool, val with_italic set_italic;
    FontUnderline => font_underline: Underline, val with_underline set_underline;
    FontStrike => font_strike: bool, val with_strike set_strike;
    FontScript => font_script: FontScript, val with_script set_script;
    FontSize => font_size: FontSize, into with_font_size set_font_size;
    Format => format: NumberFormat, borrow with_format set_format;
    AlignV => align_v: VerticalAlignment, val with_align_v set_align_v;
    AlignH => align_h: HorizontalAlignment, val with_align_h set_align_h;
    Indent => indent: u8, val with_indent set_indent;
    /// Degrees counter-clockwise, -1 for stacked vertical text
    Rotation => rotation: i16, val with_rotation set_rotation;
    TextDir => text_dir: TextDirection, val with_text_dir set_text_dir;
    WrapText => wrap_text: bool, val with_wrap_text set_wrap_text;
    ShrinkToFit => shrink_to_fit: bool, val with_shrink_to_fit set_shrink_to_fit;
    ContentsLocked => contents_locked: bool, val with_locked set_locked;
    ContentsHidden => contents_hidden: bool, val with_hidden set_hidden;
    Validation => validation: Handle<Validation>, borrow with_validation set_validation;
    Hlink => hlink: Handle<Hyperlink>, borrow with_hlink set_hlink;
    InputMsg => input_msg: Handle<InputMessage>, borrow with_input_msg set_input_msg;
    Conditions => conditions: Handle<StyleConditions>, borrow with_conditions set_conditions;
}

impl StyleElement {
    /// The six per-cell border elements, indexed like [`BorderLocation`]
    pub const BORDERS: [StyleElement; 6] = [
        StyleElement::BorderTop,
        StyleElement::BorderBottom,
        StyleElement::BorderLeft,
        StyleElement::BorderRight,
        StyleElement::BorderRevDiagonal,
        StyleElement::BorderDiagonal,
    ];

    /// Elements that reference shared non-visual objects
    pub fn is_handle(self) -> bool {
        matches!(
            self,
            StyleElement::Validation
                | StyleElement::Hlink
                | StyleElement::InputMsg
                | StyleElement::Conditions
        )
    }

    pub fn is_border(self) -> bool {
        self.border_location().is_some()
    }

    /// Elements whose change invalidates the text layout (spans) of a cell
    pub fn affects_layout(self) -> bool {
        matches!(
            self,
            StyleElement::FontName
                | StyleElement::FontBold
                | StyleElement::FontItalic
                | StyleElement::FontUnderline
                | StyleElement::FontStrike
                | StyleElement::FontScript
                | StyleElement::FontSize
                | StyleElement::Format
                | StyleElement::AlignV
                | StyleElement::AlignH
                | StyleElement::Indent
                | StyleElement::Rotation
                | StyleElement::TextDir
                | StyleElement::WrapText
                | StyleElement::ShrinkToFit
        )
    }

    pub fn from_border_location(loc: BorderLocation) -> Option<StyleElement> {
        match loc {
            BorderLocation::Top => Some(StyleElement::BorderTop),
            BorderLocation::Bottom => Some(StyleElement::BorderBottom),
            BorderLocation::Left => Some(StyleElement::BorderLeft),
            BorderLocation::Right => Some(StyleElement::BorderRight),
            BorderLocation::RevDiagonal => Some(StyleElement::BorderRevDiagonal),
            BorderLocation::Diagonal => Some(StyleElement::BorderDiagonal),
            BorderLocation::Horizontal | BorderLocation::Vertical => None,
        }
    }

    pub fn border_location(self) -> Option<BorderLocation> {
        match self {
            StyleElement::BorderTop => Some(BorderLocation::Top),
            StyleElement::BorderBottom => Some(BorderLocation::Bottom),
            StyleElement::BorderLeft => Some(BorderLocation::Left),
            StyleElement::BorderRight => Some(BorderLocation::Right),
            StyleElement::BorderRevDiagonal => Some(BorderLocation::RevDiagonal),
            StyleElement::BorderDiagonal => Some(BorderLocation::Diagonal),
            _ => None,
        }
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl Style {
    /// Create an empty (fully unset) style
    pub fn new() -> Self {
        Self::default()
    }

    /// The style a fresh sheet is filled with.
    ///
    /// Every element except the four handles is set.
    pub fn default_sheet_style() -> Self {
        let mut style = Style::new()
            .with_back_color(Color::Auto)
            .with_pattern_color(Color::Auto)
            .with_pattern(0)
            .with_font_color(Color::Auto)
            .with_font_name("Sans")
            .with_bold(false)
            .with_italic(false)
            .with_underline(Underline::None)
            .with_strike(false)
            .with_script(FontScript::Standard)
            .with_font_size(10.0)
            .with_format(NumberFormat::General)
            .with_align_v(VerticalAlignment::Bottom)
            .with_align_h(HorizontalAlignment::General)
            .with_indent(0)
            .with_rotation(0)
            .with_text_dir(TextDirection::Context)
            .with_wrap_text(false)
            .with_shrink_to_fit(false)
            .with_locked(true)
            .with_hidden(false);
        for loc in BorderLocation::ALL {
            style.set_border(loc, Border::NONE);
        }
        style
    }

    /// Whether no element is set
    pub fn is_empty(&self) -> bool {
        self.elements().next().is_none()
    }

    /// Iterate over the set elements
    pub fn elements(&self) -> impl Iterator<Item = StyleElement> + '_ {
        StyleElement::ALL
            .iter()
            .copied()
            .filter(move |&elem| self.is_element_set(elem))
    }

    /// Border at a per-cell location; the inner locations never carry one
    pub fn border(&self, loc: BorderLocation) -> Option<Border> {
        match loc {
            BorderLocation::Top => self.border_top,
            BorderLocation::Bottom => self.border_bottom,
            BorderLocation::Left => self.border_left,
            BorderLocation::Right => self.border_right,
            BorderLocation::RevDiagonal => self.border_rev_diagonal,
            BorderLocation::Diagonal => self.border_diagonal,
            BorderLocation::Horizontal | BorderLocation::Vertical => None,
        }
    }

    /// Set the border at a per-cell location. Inner locations are ignored.
    pub fn set_border(&mut self, loc: BorderLocation, border: Border) -> &mut Self {
        let slot = match loc {
            BorderLocation::Top => &mut self.border_top,
            BorderLocation::Bottom => &mut self.border_bottom,
            BorderLocation::Left => &mut self.border_left,
            BorderLocation::Right => &mut self.border_right,
            BorderLocation::RevDiagonal => &mut self.border_rev_diagonal,
            BorderLocation::Diagonal => &mut self.border_diagonal,
            BorderLocation::Horizontal | BorderLocation::Vertical => return self,
        };
        *slot = Some(border);
        self
    }

    pub fn with_border(mut self, loc: BorderLocation, border: Border) -> Self {
        self.set_border(loc, border);
        self
    }

    /// Overwrite every element set in `partial`, leave the rest alone
    pub fn merge(&mut self, partial: &Style) {
        for elem in partial.elements() {
            self.merge_element(partial, elem);
        }
    }

    /// Copy of `self` with `partial` merged on top
    pub fn merged(&self, partial: &Style) -> Style {
        let mut out = self.clone();
        out.merge(partial);
        out
    }

    /// Pool equality: every element matches, unset elements included
    pub fn equal(&self, other: &Style) -> bool {
        self == other
    }

    /// Equality of everything that is drawn; handles are ignored
    pub fn equal_for_rendering(&self, other: &Style) -> bool {
        StyleElement::ALL
            .iter()
            .filter(|elem| !elem.is_handle())
            .all(|&elem| self.element_eq(other, elem))
    }

    /// Equality where every automatic color matches every other one
    pub fn equal_unlinked(&self, other: &Style) -> bool {
        self.unlinked() == other.unlinked()
    }

    /// Whether a cell with this style shows anything even when empty
    pub fn visible_in_blank(&self) -> bool {
        self.pattern.unwrap_or(0) > 0
            || StyleElement::BORDERS
                .iter()
                .filter_map(|elem| elem.border_location())
                .any(|loc| self.border(loc).map_or(false, |b| b.is_visible()))
    }

    /// Whether applying this (partial) style can change the layout of text
    pub fn required_respan(&self) -> bool {
        self.elements().any(StyleElement::affects_layout)
    }

    /// Whether two styles lay text out identically
    pub fn layout_equal(&self, other: &Style) -> bool {
        StyleElement::ALL
            .iter()
            .filter(|elem| elem.affects_layout())
            .all(|&elem| self.element_eq(other, elem))
    }

    /// Copy with every automatic color back in its unresolved form
    pub fn unlinked(&self) -> Style {
        let mut out = self.clone();
        out.map_colors(Color::unresolved);
        out
    }

    /// Resolve the pattern color and every border color that is automatic
    /// against the sheet's auto-pattern color.
    pub(crate) fn linked(mut self, sheet_auto: Color) -> Style {
        self.pattern_color = self.pattern_color.map(|c| c.resolve_auto(sheet_auto));
        for elem in StyleElement::BORDERS {
            if let Some(loc) = elem.border_location() {
                if let Some(border) = self.border(loc) {
                    self.set_border(loc, border.resolve_auto(sheet_auto));
                }
            }
        }
        self
    }

    fn map_colors(&mut self, f: impl Fn(Color) -> Color) {
        self.back_color = self.back_color.map(&f);
        self.pattern_color = self.pattern_color.map(&f);
        self.font_color = self.font_color.map(&f);
        for elem in StyleElement::BORDERS {
            if let Some(loc) = elem.border_location() {
                if let Some(border) = self.border(loc) {
                    self.set_border(loc, Border::new(border.line, f(border.color)));
                }
            }
        }
    }

    /// Narrow `self` to what it has in common with `other`.
    ///
    /// Elements that differ are unset in `self` and recorded in `conflicts`;
    /// elements already in `conflicts` are left alone.
    pub fn accumulate_conflicts(&mut self, other: &Style, conflicts: &mut StyleConflicts) {
        for &elem in StyleElement::ALL {
            if conflicts.contains(elem) {
                continue;
            }
            if !self.element_eq(other, elem) {
                self.unset_element(elem);
                conflicts.insert(elem);
            }
        }
    }

    /// Structural hash used by the pool
    pub fn hash_value(&self) -> u64 {
        let mut hasher = ahash::AHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Set of [`StyleElement`]s whose values differ across a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleConflicts(u32);

impl StyleConflicts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, elem: StyleElement) {
        self.0 |= elem.bit();
    }

    pub fn contains(&self, elem: StyleElement) -> bool {
        self.0 & elem.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = StyleElement> + '_ {
        StyleElement::ALL
            .iter()
            .copied()
            .filter(move |&elem| self.contains(elem))
    }
}

impl FromIterator<StyleElement> for StyleConflicts {
    fn from_iter<I: IntoIterator<Item = StyleElement>>(iter: I) -> Self {
        let mut set = StyleConflicts::new();
        for elem in iter {
            set.insert(elem);
        }
        set
    }
}
