//! # gridstyle-core
//!
//! Value types for the gridstyle sheet style engine.
//!
//! - [`Style`] - sparse cell attribute set and its [`StyleElement`]s
//! - [`StylePool`] and [`SharedStyle`] - hash-consed, immutable shared styles
//! - [`CellAddress`] and [`CellRange`] - cell addressing and ranges
//! - [`Validation`], [`Hyperlink`], [`InputMessage`], [`StyleConditions`] -
//!   objects a style can carry by [`Handle`]
//!
//! ## Example
//!
//! ```rust
//! use gridstyle_core::{SheetLink, Style, StylePool};
//!
//! let mut pool = StylePool::new();
//! let link = SheetLink::default();
//!
//! let a = pool.intern(Style::new().with_bold(true), &link);
//! let b = pool.intern(Style::new().with_bold(true), &link);
//! assert!(a.ptr_eq(&b));
//! ```

pub mod address;
pub mod conditions;
pub mod error;
pub mod handle;
pub mod hyperlink;
pub mod style;
pub mod validation;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use conditions::{CondOp, Condition, StyleConditions};
pub use error::{Error, Result};
pub use handle::Handle;
pub use hyperlink::{Hyperlink, HyperlinkTarget};
pub use validation::{
    InputMessage, Validation, ValidationErrorStyle, ValidationKind, ValidationOperator,
};

pub use style::{
    Border, BorderLineStyle, BorderLocation, BorderOrientation, Color, FontScript, FontSize,
    HorizontalAlignment, NumberFormat, PoolStats, SharedStyle, SheetLink, Style,
    StyleConflicts, StyleElement, StylePool, TextDirection, Underline, VerticalAlignment,
};

/// Maximum number of columns in a sheet
pub const MAX_COLS: u32 = 16_384;

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Default number of columns of a new sheet
pub const DEFAULT_COLS: u32 = 256;

/// Default number of rows of a new sheet
pub const DEFAULT_ROWS: u32 = 65_536;
