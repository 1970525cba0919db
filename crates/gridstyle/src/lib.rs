//! # gridstyle
//!
//! Style storage for spreadsheet sheets.
//!
//! Every cell of a sheet has a style, but real sheets use a handful of
//! styles over large rectangles. [`SheetStyles`] keeps them in a tree of
//! fixed-size tiles that only splits where the styles actually differ, so
//! styling a whole column or the whole sheet stays cheap.
//!
//! ## Features
//!
//! - Range and single-cell writes, either replacing styles or merging a
//!   partial style onto what is there
//! - Border drawing with outline and inner edges
//! - Per-row style and border resolution for renderers ([`StyleRow`])
//! - Extraction of disjoint uniform-style rectangles ([`StyleList`]), used for
//!   copy and paste, inventories and saving
//! - Column and row insertion and deletion, sheet resizing
//!
//! ## Example
//!
//! ```rust
//! use gridstyle::prelude::*;
//!
//! let mut sheet = SheetStyles::new(256, 65_536).unwrap();
//!
//! // Bold column B
//! let column = CellRange::from_indices(1, 0, 1, 65_535);
//! sheet.apply_partial_style_to_range(&column, &Style::new().with_bold(true));
//!
//! assert_eq!(sheet.style_at(1, 1000).font_bold(), Some(true));
//! assert!(sheet.style_at(2, 1000).ptr_eq(sheet.default_style()));
//!
//! // The column and the rest of the sheet
//! assert_eq!(sheet.style_regions(None).len(), 3);
//! ```

mod apply;
mod borders;
mod optimize;
pub mod prelude;
mod query;
pub mod region;
mod resize;
pub mod row;
pub mod settings;
pub mod sheet;
pub mod tile;

pub use apply::ApplyReport;
pub use region::{StyleEq, StyleFilter, StyleList, StyleRegion};
pub use row::{RowWalker, StyleRow};
pub use settings::StyleSettings;
pub use sheet::SheetStyles;
pub use tile::{TileKind, TileSnapshot, TileStats, TILE_SIZE_COL, TILE_SIZE_ROW};

// Re-export core types
pub use gridstyle_core::{
    Border, BorderLineStyle, BorderLocation, CellAddress, CellRange, Color, Error, Handle,
    Hyperlink, InputMessage, PoolStats, Result, SharedStyle, SheetLink, Style, StyleConditions,
    StyleConflicts, StyleElement, StylePool, Validation, DEFAULT_COLS, DEFAULT_ROWS, MAX_COLS,
    MAX_ROWS,
};
