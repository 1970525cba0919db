//! Prelude module - common imports for gridstyle users
//!
//! ```rust
//! use gridstyle::prelude::*;
//! ```

pub use crate::{
    ApplyReport,
    // Styles
    Border,
    BorderLineStyle,
    BorderLocation,
    // Addressing
    CellAddress,
    CellRange,
    Color,
    Error,
    Handle,
    Hyperlink,
    Result,
    SharedStyle,
    // Sheet storage
    SheetStyles,
    Style,
    StyleList,
    StyleRegion,
    StyleRow,
    StyleSettings,
};
