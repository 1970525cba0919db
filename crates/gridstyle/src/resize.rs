//! Column and row insertion, deletion and sheet resizing
//!
//! All of these go through region lists: the affected part of the sheet is
//! extracted, moved, and written back.

use gridstyle_core::{CellAddress, CellRange, Result};

use crate::apply::ApplyReport;
use crate::region::{StyleList, StyleRegion};
use crate::sheet::{check_size, SheetStyles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Cols,
    Rows,
}

impl Axis {
    /// The cells whose index along the axis is in `lo..=hi`
    fn stripes(self, sheet: &SheetStyles, lo: u32, hi: u32) -> CellRange {
        match self {
            Axis::Cols => CellRange::from_indices(lo, 0, hi, sheet.rows() - 1),
            Axis::Rows => CellRange::from_indices(0, lo, sheet.cols() - 1, hi),
        }
    }

    fn len(self, sheet: &SheetStyles) -> u32 {
        match self {
            Axis::Cols => sheet.cols(),
            Axis::Rows => sheet.rows(),
        }
    }

    fn origin(self, at: u32) -> CellAddress {
        match self {
            Axis::Cols => CellAddress::new(at, 0),
            Axis::Rows => CellAddress::new(0, at),
        }
    }

    /// Stretch a region of a one-stripe list to `count` stripes
    fn widen(self, range: CellRange, count: u32) -> CellRange {
        match self {
            Axis::Cols => CellRange::from_indices(0, range.start.row, count - 1, range.end.row),
            Axis::Rows => CellRange::from_indices(range.start.col, 0, range.end.col, count - 1),
        }
    }
}

impl SheetStyles {
    /// Insert `count` columns before column `at`.
    ///
    /// The new columns copy the styles of column `at - 1` (the default at
    /// column 0); columns pushed past the last one are lost.
    pub fn insert_cols(&mut self, at: u32, count: u32) -> ApplyReport {
        self.insert_stripes(Axis::Cols, at, count)
    }

    /// Delete `count` columns starting at column `at`; the columns freed at
    /// the end get the default style
    pub fn delete_cols(&mut self, at: u32, count: u32) -> ApplyReport {
        self.delete_stripes(Axis::Cols, at, count)
    }

    /// Insert `count` rows before row `at`, copying row `at - 1`
    pub fn insert_rows(&mut self, at: u32, count: u32) -> ApplyReport {
        self.insert_stripes(Axis::Rows, at, count)
    }

    /// Delete `count` rows starting at row `at`
    pub fn delete_rows(&mut self, at: u32, count: u32) -> ApplyReport {
        self.delete_stripes(Axis::Rows, at, count)
    }

    fn insert_stripes(&mut self, axis: Axis, at: u32, count: u32) -> ApplyReport {
        let len = axis.len(self);
        assert!(at < len, "insert position {at} out of bounds ({axis:?}: {len})");
        let count = count.min(len - at);
        if count == 0 {
            return ApplyReport::default();
        }
        log::debug!("insert {count} {axis:?} at {at}");

        let moved = (at + count < len).then(|| self.get_range(&axis.stripes(self, at, len - 1 - count)));
        let fill: StyleList = if at > 0 {
            self.get_range(&axis.stripes(self, at - 1, at - 1))
                .into_iter()
                .map(|region| StyleRegion::new(axis.widen(region.range, count), region.style))
                .collect()
        } else {
            let default = self.default_style().clone();
            let whole = axis.stripes(self, 0, count - 1);
            std::iter::once(StyleRegion::new(whole, default)).collect()
        };

        let mut report = ApplyReport::default();
        if let Some(moved) = moved {
            report.absorb(self.set_list(axis.origin(at + count), &moved, None));
        }
        report.absorb(self.set_list(axis.origin(at), &fill, None));
        report
    }

    fn delete_stripes(&mut self, axis: Axis, at: u32, count: u32) -> ApplyReport {
        let len = axis.len(self);
        assert!(at < len, "delete position {at} out of bounds ({axis:?}: {len})");
        let count = count.min(len - at);
        if count == 0 {
            return ApplyReport::default();
        }
        log::debug!("delete {count} {axis:?} at {at}");

        let mut report = ApplyReport::default();
        if at + count < len {
            let moved = self.get_range(&axis.stripes(self, at + count, len - 1));
            report.absorb(self.set_list(axis.origin(at), &moved, None));
        }
        let vacated = axis.stripes(self, len - count, len - 1);
        let default = self.default_style().clone();
        report.absorb(self.set_shared(&vacated, default));
        report
    }

    /// Change the sheet size.
    ///
    /// A new tree is built holding the styles of the part of the sheet both
    /// sizes share, the rest default; the old tree is only dropped once the
    /// new one is complete.
    pub fn resize(&mut self, cols: u32, rows: u32) -> Result<()> {
        check_size(cols, rows)?;
        if cols == self.cols() && rows == self.rows() {
            return Ok(());
        }
        let kept = CellRange::from_indices(0, 0, cols.min(self.cols()) - 1, rows.min(self.rows()) - 1);
        let list = self.style_regions(Some(&kept));

        if cols < self.cols() || rows < self.rows() {
            let lost = self
                .style_regions(None)
                .iter()
                .filter(|region| !region.style.ptr_eq(self.default_style()))
                .any(|region| !kept.contains_range(&region.range));
            if lost {
                log::warn!("resize to {cols}x{rows} discards styled cells outside {kept}");
            }
        }

        let (level, root) = self.build_tree(cols, rows, &list);
        let (old_cols, old_rows, old_level) = (self.cols, self.rows, self.level);
        log::debug!("resize {old_cols}x{old_rows} -> {cols}x{rows}, top level {old_level} -> {level}");
        self.cols = cols;
        self.rows = rows;
        self.level = level;
        self.root = root;
        self.pool.purge();
        Ok(())
    }
}
