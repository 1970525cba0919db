//! Per-sheet engine settings

/// Options controlling how a [`SheetStyles`](crate::SheetStyles) maintains its tile tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSettings {
    /// Collapse tiles whose children agree after every write (default: true)
    pub optimize: bool,
    /// Check that every collapse leaves all style queries unchanged and panic
    /// on a mismatch (default: false)
    pub verify: bool,
    /// Resolve "no border" edges to no line instead of a grid line when
    /// building style rows (default: false)
    pub hide_grid: bool,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            optimize: true,
            verify: false,
            hide_grid: false,
        }
    }
}

impl StyleSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_hide_grid(mut self, hide_grid: bool) -> Self {
        self.hide_grid = hide_grid;
        self
    }
}
