//! Range applicator
//!
//! Pushes a style change into the tile tree. Tiles are split only as finely
//! as the target's alignment requires: a target that covers whole columns of
//! a tile's entries turns a simple tile into a `Col` tile rather than 128
//! sub-tiles, and a target covering the whole tile is a bulk replace.

use ahash::AHashMap;
use gridstyle_core::{CellRange, SharedStyle, SheetLink, Style, StylePool};

use crate::optimize;
use crate::settings::StyleSettings;
use crate::tile::{block_range, index, sub_height, sub_width, Tile, TileKind};

/// What a range write did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Blocks whose style changed
    pub changed: Vec<CellRange>,
    /// Whether any change can affect text layout, so spans must be recomputed
    pub respan: bool,
}

impl ApplyReport {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Number of cells whose style changed
    pub fn changed_cells(&self) -> u64 {
        self.changed.iter().map(CellRange::cell_count).sum()
    }

    /// Smallest range holding every change
    pub fn bounds(&self) -> Option<CellRange> {
        let mut ranges = self.changed.iter();
        let first = *ranges.next()?;
        Some(ranges.fold(first, |acc, r| acc.union(r)))
    }

    /// Fold another report into this one
    pub fn absorb(&mut self, other: ApplyReport) {
        self.changed.extend(other.changed);
        self.respan |= other.respan;
    }

    pub(crate) fn clip(mut self, sheet: &CellRange) -> ApplyReport {
        self.changed = self
            .changed
            .iter()
            .filter_map(|r| r.intersect(sheet))
            .collect();
        self
    }
}

/// How a write turns a cell's old style into its new one
pub(crate) enum ApplyPolicy<'a> {
    /// Store this pooled style
    Replace(SharedStyle),
    /// Merge the set elements of this partial style onto the old style
    Merge(&'a Style),
}

pub(crate) struct Applicator<'a> {
    pool: &'a mut StylePool,
    link: SheetLink,
    policy: ApplyPolicy<'a>,
    settings: StyleSettings,
    /// Merge results by old style address; the old style is kept alive so
    /// its address cannot be reused for another style during the write.
    memo: AHashMap<usize, (SharedStyle, SharedStyle)>,
    report: ApplyReport,
}

impl<'a> Applicator<'a> {
    pub(crate) fn new(
        pool: &'a mut StylePool,
        link: SheetLink,
        policy: ApplyPolicy<'a>,
        settings: StyleSettings,
    ) -> Self {
        Self {
            pool,
            link,
            policy,
            settings,
            memo: AHashMap::new(),
            report: ApplyReport::default(),
        }
    }

    pub(crate) fn finish(self) -> ApplyReport {
        self.report
    }

    /// The style a cell currently styled `old` ends up with
    fn resolve(&mut self, old: &SharedStyle) -> SharedStyle {
        match &self.policy {
            ApplyPolicy::Replace(style) => style.clone(),
            ApplyPolicy::Merge(partial) => {
                if let Some((_, merged)) = self.memo.get(&old.addr()) {
                    return merged.clone();
                }
                let merged = self.pool.intern(old.merged(partial), &self.link);
                self.memo
                    .insert(old.addr(), (old.clone(), merged.clone()));
                merged
            }
        }
    }

    /// Rewrite one stored reference covering `block`
    fn replace_entry(&mut self, slot: &mut SharedStyle, block: CellRange) {
        let new = self.resolve(slot);
        if new.ptr_eq(slot) {
            return;
        }
        if !self.report.respan && !new.layout_equal(slot) {
            self.report.respan = true;
        }
        self.report.changed.push(block);
        *slot = new;
    }

    fn optimize(&mut self, tile: &mut Tile, level: usize) {
        if !self.settings.optimize {
            return;
        }
        if self.settings.verify {
            let before = optimize::entries(tile);
            optimize::optimize_tile(tile, level);
            optimize::verify(&before, tile, level);
        } else {
            optimize::optimize_tile(tile, level);
        }
    }

    /// Apply the policy to every cell of `target` inside the tile at `level`
    /// whose top-left cell is `(col0, row0)`.
    pub(crate) fn apply_range(
        &mut self,
        tile: &mut Tile,
        level: usize,
        col0: u32,
        row0: u32,
        target: &CellRange,
    ) {
        let block = block_range(level, col0, row0);
        debug_assert!(block.overlaps(target));

        if let (Tile::Simple(current), ApplyPolicy::Replace(style)) = (&*tile, &self.policy) {
            if current.ptr_eq(style) {
                return;
            }
        }

        let (cw, rh) = (sub_width(level), sub_height(level));
        let entry_range = |ci: usize, ri: usize| {
            let c = col0 + ci as u32 * cw;
            let r = row0 + ri as u32 * rh;
            CellRange::from_indices(c, r, c + cw - 1, r + rh - 1)
        };
        let col_range = |ci: usize| {
            let c = col0 + ci as u32 * cw;
            CellRange::from_indices(c, block.start.row, c + cw - 1, block.end.row)
        };
        let row_range = |ri: usize| {
            let r = row0 + ri as u32 * rh;
            CellRange::from_indices(block.start.col, r, block.end.col, r + rh - 1)
        };

        if target.contains_range(&block) {
            match tile {
                Tile::Simple(style) => {
                    self.replace_entry(style, block);
                    return;
                }
                Tile::Col(styles) => {
                    for (ci, slot) in styles.iter_mut().enumerate() {
                        self.replace_entry(slot, col_range(ci));
                    }
                }
                Tile::Row(styles) => {
                    for (ri, slot) in styles.iter_mut().enumerate() {
                        self.replace_entry(slot, row_range(ri));
                    }
                }
                Tile::Matrix(styles) => {
                    for (i, slot) in styles.iter_mut().enumerate() {
                        self.replace_entry(slot, entry_range(i % 8, i / 8));
                    }
                }
                Tile::PtrMatrix(_) => {}
            }
            if tile.kind() != TileKind::PtrMatrix {
                self.optimize(tile, level);
                return;
            }
        }

        if let Tile::Simple(current) = &*tile {
            // a merge that leaves the style unchanged needs no split
            if self.resolve(current).ptr_eq(current) {
                return;
            }
        }

        let full_width = target.start.col <= block.start.col && target.end.col >= block.end.col;
        let full_height = target.start.row <= block.start.row && target.end.row >= block.end.row;
        let cols_aligned = level == 0
            || (aligned_start(target.start.col, block.start.col, cw)
                && aligned_end(target.end.col, block.start.col, block.end.col, cw));
        let rows_aligned = level == 0
            || (aligned_start(target.start.row, block.start.row, rh)
                && aligned_end(target.end.row, block.start.row, block.end.row, rh));

        let needed = if full_height && cols_aligned {
            TileKind::Col
        } else if full_width && rows_aligned {
            TileKind::Row
        } else if cols_aligned && rows_aligned {
            TileKind::Matrix
        } else {
            TileKind::PtrMatrix
        };
        tile.expand(tile.kind().join(needed), level);

        let ci_lo = ((target.start.col.max(block.start.col) - col0) / cw) as usize;
        let ci_hi = ((target.end.col.min(block.end.col) - col0) / cw) as usize;
        let ri_lo = ((target.start.row.max(block.start.row) - row0) / rh) as usize;
        let ri_hi = ((target.end.row.min(block.end.row) - row0) / rh) as usize;

        match tile {
            Tile::Simple(_) => unreachable!("expanded tile is never simple"),
            Tile::Col(styles) => {
                for ci in ci_lo..=ci_hi {
                    self.replace_entry(&mut styles[ci], col_range(ci));
                }
            }
            Tile::Row(styles) => {
                for ri in ri_lo..=ri_hi {
                    self.replace_entry(&mut styles[ri], row_range(ri));
                }
            }
            Tile::Matrix(styles) => {
                for ri in ri_lo..=ri_hi {
                    for ci in ci_lo..=ci_hi {
                        self.replace_entry(&mut styles[index(ci, ri)], entry_range(ci, ri));
                    }
                }
            }
            Tile::PtrMatrix(children) => {
                for ri in ri_lo..=ri_hi {
                    for ci in ci_lo..=ci_hi {
                        let sub = entry_range(ci, ri);
                        self.apply_range(
                            &mut children[index(ci, ri)],
                            level - 1,
                            sub.start.col,
                            sub.start.row,
                            target,
                        );
                    }
                }
            }
        }
        self.optimize(tile, level);
    }

    /// Apply the policy to the single cell `(col, row)`.
    ///
    /// Alignment never matters for one cell, so this descends straight to a
    /// level 0 `Matrix`.
    pub(crate) fn apply_cell(
        &mut self,
        tile: &mut Tile,
        level: usize,
        col0: u32,
        row0: u32,
        col: u32,
        row: u32,
    ) {
        let current = tile.style_at(level, col - col0, row - row0).clone();
        let new = self.resolve(&current);
        if new.ptr_eq(&current) {
            return;
        }
        if !new.layout_equal(&current) {
            self.report.respan = true;
        }
        self.report.changed.push(CellRange::from_indices(col, row, col, row));
        self.store_cell(tile, level, col0, row0, col, row, new);
    }

    #[allow(clippy::too_many_arguments)]
    fn store_cell(
        &mut self,
        tile: &mut Tile,
        level: usize,
        col0: u32,
        row0: u32,
        col: u32,
        row: u32,
        style: SharedStyle,
    ) {
        let (cw, rh) = (sub_width(level), sub_height(level));
        let ci = ((col - col0) / cw) as usize;
        let ri = ((row - row0) / rh) as usize;

        if level == 0 {
            tile.expand(TileKind::Matrix, 0);
            if let Tile::Matrix(styles) = tile {
                styles[index(ci, ri)] = style;
            }
        } else {
            tile.expand(TileKind::PtrMatrix, level);
            if let Tile::PtrMatrix(children) = tile {
                self.store_cell(
                    &mut children[index(ci, ri)],
                    level - 1,
                    col0 + ci as u32 * cw,
                    row0 + ri as u32 * rh,
                    col,
                    row,
                    style,
                );
            }
        }
        self.optimize(tile, level);
    }
}

#[inline]
fn aligned_start(start: u32, block_start: u32, size: u32) -> bool {
    start <= block_start || (start - block_start) % size == 0
}

#[inline]
fn aligned_end(end: u32, block_start: u32, block_end: u32, size: u32) -> bool {
    end >= block_end || (end + 1 - block_start) % size == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileStats;

    struct Fixture {
        pool: StylePool,
        link: SheetLink,
        base: SharedStyle,
        root: Tile,
    }

    // one level 1 tile: 64 columns by 256 rows
    fn fixture() -> Fixture {
        let mut pool = StylePool::new();
        let link = SheetLink::default();
        let base = pool.intern(Style::default_sheet_style(), &link);
        let root = Tile::Simple(base.clone());
        Fixture {
            pool,
            link,
            base,
            root,
        }
    }

    impl Fixture {
        fn set(&mut self, range: CellRange, style: Style) -> ApplyReport {
            let style = self.pool.intern(style, &self.link);
            let mut app = Applicator::new(
                &mut self.pool,
                self.link,
                ApplyPolicy::Replace(style),
                StyleSettings::default().with_verify(true),
            );
            app.apply_range(&mut self.root, 1, 0, 0, &range);
            app.finish()
        }

        fn merge(&mut self, range: CellRange, partial: &Style) -> ApplyReport {
            let mut app = Applicator::new(
                &mut self.pool,
                self.link,
                ApplyPolicy::Merge(partial),
                StyleSettings::default().with_verify(true),
            );
            app.apply_range(&mut self.root, 1, 0, 0, &range);
            app.finish()
        }

        fn stats(&self) -> TileStats {
            let mut stats = TileStats::default();
            self.root.collect_stats(1, 0, &mut stats);
            stats
        }
    }

    #[test]
    fn test_full_cover_is_bulk_replace() {
        let mut fx = fixture();
        let report = fx.set(CellRange::from_indices(0, 0, 63, 255), Style::new().with_bold(true));
        assert_eq!(fx.root.kind(), TileKind::Simple);
        assert_eq!(report.changed, vec![CellRange::from_indices(0, 0, 63, 255)]);
        assert!(report.respan);
    }

    #[test]
    fn test_aligned_columns_make_col_tile() {
        let mut fx = fixture();
        // columns 8..24 are entries 1 and 2, all rows
        fx.set(CellRange::from_indices(8, 0, 23, 255), Style::new().with_bold(true));
        assert_eq!(fx.root.kind(), TileKind::Col);
        assert_eq!(fx.stats().total(), 1);
        assert!(fx.root.style_at(1, 7, 100).ptr_eq(&fx.base));
        assert_eq!(fx.root.style_at(1, 8, 100).font_bold(), Some(true));
        assert_eq!(fx.root.style_at(1, 23, 0).font_bold(), Some(true));
        assert!(fx.root.style_at(1, 24, 0).ptr_eq(&fx.base));
    }

    #[test]
    fn test_aligned_rows_make_row_tile() {
        let mut fx = fixture();
        fx.set(CellRange::from_indices(0, 16, 63, 47), Style::new().with_italic(true));
        assert_eq!(fx.root.kind(), TileKind::Row);
    }

    #[test]
    fn test_aligned_block_makes_matrix() {
        let mut fx = fixture();
        fx.set(CellRange::from_indices(8, 16, 15, 31), Style::new().with_italic(true));
        assert_eq!(fx.root.kind(), TileKind::Matrix);
    }

    #[test]
    fn test_unaligned_target_splits() {
        let mut fx = fixture();
        fx.set(CellRange::from_indices(3, 5, 10, 20), Style::new().with_italic(true));
        assert_eq!(fx.root.kind(), TileKind::PtrMatrix);
        for col in 0..64 {
            for row in 0..40 {
                let inside = (3..=10).contains(&col) && (5..=20).contains(&row);
                let style = fx.root.style_at(1, col, row);
                assert_eq!(style.font_italic() == Some(true), inside, "({col}, {row})");
            }
        }
    }

    #[test]
    fn test_same_style_is_noop() {
        let mut fx = fixture();
        let base = fx.base.to_style();
        let report = fx.set(CellRange::from_indices(3, 5, 10, 20), base);
        assert!(report.is_empty());
        assert_eq!(fx.root.kind(), TileKind::Simple);
    }

    #[test]
    fn test_merge_that_changes_nothing_does_not_split() {
        let mut fx = fixture();
        let report = fx.merge(CellRange::from_indices(3, 5, 10, 20), &Style::new().with_bold(false));
        assert!(report.is_empty());
        assert_eq!(fx.root.kind(), TileKind::Simple);
    }

    #[test]
    fn test_merge_keeps_other_elements() {
        let mut fx = fixture();
        fx.set(
            CellRange::from_indices(0, 0, 7, 15),
            Style::default_sheet_style().with_indent(4),
        );
        fx.merge(CellRange::from_indices(4, 0, 11, 15), &Style::new().with_bold(true));

        let left = fx.root.style_at(1, 5, 3);
        assert_eq!(left.indent(), Some(4));
        assert_eq!(left.font_bold(), Some(true));
        let right = fx.root.style_at(1, 9, 3);
        assert_eq!(right.indent(), Some(0));
        assert_eq!(right.font_bold(), Some(true));
        let untouched = fx.root.style_at(1, 2, 3);
        assert_eq!(untouched.font_bold(), Some(false));
    }

    #[test]
    fn test_merge_memo_shares_results() {
        let mut fx = fixture();
        fx.merge(CellRange::from_indices(1, 1, 30, 30), &Style::new().with_strike(true));
        let a = fx.root.style_at(1, 1, 1).clone();
        let b = fx.root.style_at(1, 30, 30).clone();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_writes_collapse_back() {
        let mut fx = fixture();
        let range = CellRange::from_indices(3, 5, 10, 20);
        fx.set(range, Style::new().with_italic(true));
        fx.set(range, Style::default_sheet_style());
        assert_eq!(fx.root, Tile::Simple(fx.base.clone()));
    }

    #[test]
    fn test_apply_cell() {
        let mut fx = fixture();
        let style = fx.pool.intern(fx.base.to_style().with_hidden(true), &fx.link);
        let mut app = Applicator::new(
            &mut fx.pool,
            fx.link,
            ApplyPolicy::Replace(style.clone()),
            StyleSettings::default(),
        );
        app.apply_cell(&mut fx.root, 1, 0, 0, 12, 40);
        let report = app.finish();

        assert_eq!(report.changed, vec![CellRange::from_indices(12, 40, 12, 40)]);
        assert!(!report.respan);
        assert!(fx.root.style_at(1, 12, 40).ptr_eq(&style));
        assert!(fx.root.style_at(1, 13, 40).ptr_eq(&fx.base));
        assert_eq!(fx.stats().matrix, 1);
    }
}
