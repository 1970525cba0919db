//! Per-sheet style storage

use std::fmt;

use gridstyle_core::{
    CellAddress, CellRange, Color, Error, PoolStats, Result, SharedStyle, SheetLink, Style,
    StylePool, MAX_COLS, MAX_ROWS,
};

use crate::apply::{Applicator, ApplyPolicy, ApplyReport};
use crate::region::{self, StyleEq, StyleFilter, StyleList};
use crate::row::{RowSource, RowWalker, StyleRow};
use crate::settings::StyleSettings;
use crate::tile::{block_range, top_level_for, Tile, TileSnapshot, TileStats};

/// The styles of every cell of one sheet
///
/// Owns the tile tree, the style pool the tree's styles are interned in, the
/// sheet's default style and its auto-pattern color.
pub struct SheetStyles {
    pub(crate) cols: u32,
    pub(crate) rows: u32,
    /// Level of the root tile
    pub(crate) level: usize,
    pub(crate) root: Tile,
    pub(crate) pool: StylePool,
    pub(crate) default_style: SharedStyle,
    pub(crate) link: SheetLink,
    pub(crate) settings: StyleSettings,
}

pub(crate) fn check_size(cols: u32, rows: u32) -> Result<()> {
    if cols == 0 || rows == 0 || cols > MAX_COLS || rows > MAX_ROWS {
        return Err(Error::InvalidSheetSize {
            cols,
            rows,
            max_cols: MAX_COLS,
            max_rows: MAX_ROWS,
        });
    }
    Ok(())
}

/// Stretch a range that reaches the last sheet column or row to the edge of
/// the tree, so whole-column and whole-row writes cover whole tiles.
fn to_tree(range: &CellRange, cols: u32, rows: u32, level: usize) -> CellRange {
    let extent = block_range(level, 0, 0);
    let mut out = *range;
    if out.end.col == cols - 1 {
        out.end.col = extent.end.col;
    }
    if out.end.row == rows - 1 {
        out.end.row = extent.end.row;
    }
    out
}

impl SheetStyles {
    /// Create the styles of a `cols` x `rows` sheet filled with
    /// [`Style::default_sheet_style`]
    pub fn new(cols: u32, rows: u32) -> Result<Self> {
        Self::with_settings(cols, rows, StyleSettings::default())
    }

    pub fn with_settings(cols: u32, rows: u32, settings: StyleSettings) -> Result<Self> {
        Self::with_default(cols, rows, Style::default_sheet_style(), settings)
    }

    /// Create a sheet filled with `default_style`
    pub fn with_default(
        cols: u32,
        rows: u32,
        default_style: Style,
        settings: StyleSettings,
    ) -> Result<Self> {
        check_size(cols, rows)?;
        let mut pool = StylePool::new();
        let link = SheetLink::default();
        let default_style = pool.intern(default_style, &link);
        let level = top_level_for(cols, rows);
        log::debug!("new {cols}x{rows} sheet, top level {level}");
        Ok(Self {
            cols,
            rows,
            level,
            root: Tile::Simple(default_style.clone()),
            pool,
            default_style,
            link,
            settings,
        })
    }

    /// Number of columns
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Level of the root tile
    pub fn top_level(&self) -> usize {
        self.level
    }

    /// The range covering the whole sheet
    pub fn extent(&self) -> CellRange {
        CellRange::sheet(self.cols, self.rows)
    }

    pub fn settings(&self) -> StyleSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: StyleSettings) {
        self.settings = settings;
    }

    /// The style new and vacated cells get
    pub fn default_style(&self) -> &SharedStyle {
        &self.default_style
    }

    pub fn link(&self) -> SheetLink {
        self.link
    }

    /// Intern `style` in this sheet's pool
    pub fn intern(&mut self, style: Style) -> SharedStyle {
        self.pool.intern(style, &self.link)
    }

    pub fn pool(&self) -> &StylePool {
        &self.pool
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Tile counts by shape
    pub fn tile_stats(&self) -> TileStats {
        let mut stats = TileStats::default();
        self.root.collect_stats(self.level, 0, &mut stats);
        stats
    }

    /// Copy of the tile tree, for comparing tree shapes
    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot(self.root.clone())
    }

    pub(crate) fn check_cell(&self, col: u32, row: u32) {
        let (cols, rows) = (self.cols, self.rows);
        assert!(col < cols, "column {col} out of bounds ({cols} columns)");
        assert!(row < rows, "row {row} out of bounds ({rows} rows)");
    }

    pub(crate) fn check_range(&self, range: &CellRange) {
        self.check_cell(range.start.col, range.start.row);
        self.check_cell(range.end.col, range.end.row);
    }

    /// Style of the cell at `(col, row)`
    ///
    /// # Panics
    /// If the cell is outside the sheet.
    pub fn style_at(&self, col: u32, row: u32) -> &SharedStyle {
        self.check_cell(col, row);
        self.root.style_at(self.level, col, row)
    }

    fn apply(&mut self, range: &CellRange, policy: ApplyPolicy<'_>) -> ApplyReport {
        self.check_range(range);
        let target = to_tree(range, self.cols, self.rows, self.level);
        let mut applicator = Applicator::new(&mut self.pool, self.link, policy, self.settings);
        applicator.apply_range(&mut self.root, self.level, 0, 0, &target);
        let report = applicator.finish().clip(&self.extent());
        log::debug!(
            "apply {range}: {} blocks changed, respan {}",
            report.changed.len(),
            report.respan
        );
        report
    }

    fn apply_cell(&mut self, col: u32, row: u32, policy: ApplyPolicy<'_>) -> ApplyReport {
        self.check_cell(col, row);
        let mut applicator = Applicator::new(&mut self.pool, self.link, policy, self.settings);
        applicator.apply_cell(&mut self.root, self.level, 0, 0, col, row);
        applicator.finish()
    }

    /// Give every cell of `range` the style `style`
    pub fn apply_style_to_range(&mut self, range: &CellRange, style: Style) -> ApplyReport {
        let style = self.intern(style);
        self.set_shared(range, style)
    }

    /// Give every cell of `range` an already interned style
    pub fn set_shared(&mut self, range: &CellRange, style: SharedStyle) -> ApplyReport {
        debug_assert!(self.pool.contains(&style), "style is not interned in this sheet");
        self.apply(range, ApplyPolicy::Replace(style))
    }

    /// Merge the set elements of `partial` onto every cell of `range`
    pub fn apply_partial_style_to_range(&mut self, range: &CellRange, partial: &Style) -> ApplyReport {
        if partial.is_empty() {
            return ApplyReport::default();
        }
        self.apply(range, ApplyPolicy::Merge(partial))
    }

    /// Give the cell at `(col, row)` the style `style`
    pub fn set_pos(&mut self, col: u32, row: u32, style: Style) -> ApplyReport {
        let style = self.intern(style);
        self.apply_cell(col, row, ApplyPolicy::Replace(style))
    }

    /// Merge the set elements of `partial` onto the cell at `(col, row)`
    pub fn apply_pos(&mut self, col: u32, row: u32, partial: &Style) -> ApplyReport {
        if partial.is_empty() {
            return ApplyReport::default();
        }
        self.apply_cell(col, row, ApplyPolicy::Merge(partial))
    }

    fn rows_source(&self) -> RowSource<'_> {
        RowSource {
            root: &self.root,
            level: self.level,
            cols: self.cols,
            rows: self.rows,
            hide_grid: self.settings.hide_grid,
        }
    }

    /// Styles and resolved borders of `row`, columns `start_col..=end_col`
    pub fn row_styles(&self, row: u32, start_col: u32, end_col: u32) -> StyleRow {
        self.rows_source().resolve(row, start_col, end_col)
    }

    /// Walk the rows of `range`, resolving each like [`row_styles`](Self::row_styles)
    pub fn walk_rows(&self, range: &CellRange) -> RowWalker<'_> {
        self.rows_source()
            .walk(range.start.row, range.end.row, range.start.col, range.end.col)
    }

    /// Disjoint rectangles of uniform style covering `range` (or the sheet)
    ///
    /// Regions merge when `eq` says their styles are equal; only styles
    /// accepted by `filter` are listed.
    pub fn extract_style_regions(
        &self,
        range: Option<&CellRange>,
        eq: StyleEq<'_>,
        filter: Option<StyleFilter<'_>>,
    ) -> StyleList {
        let clip = match range {
            Some(range) => {
                self.check_range(range);
                *range
            }
            None => self.extent(),
        };
        region::extract(&self.root, self.level, &clip, eq, filter)
    }

    /// Regions of `range` (or the sheet) by style identity
    pub fn style_regions(&self, range: Option<&CellRange>) -> StyleList {
        self.extract_style_regions(range, &Style::equal, None)
    }

    /// Regions of `range` with coordinates relative to its top-left cell
    pub fn get_range(&self, range: &CellRange) -> StyleList {
        self.style_regions(Some(range))
            .translate(-(range.start.col as i64), -(range.start.row as i64))
    }

    /// Apply a relative region list with its origin at `origin`.
    ///
    /// Parts falling outside `clip` (when given) or outside the sheet are
    /// dropped. Styles from another sheet are interned here first.
    pub fn set_list(
        &mut self,
        origin: CellAddress,
        list: &StyleList,
        clip: Option<&CellRange>,
    ) -> ApplyReport {
        let bounds = match clip {
            Some(clip) => match clip.intersect(&self.extent()) {
                Some(bounds) => bounds,
                None => return ApplyReport::default(),
            },
            None => self.extent(),
        };
        let mut report = ApplyReport::default();
        for region in list {
            let placed = region
                .range
                .translate(origin.col as i64, origin.row as i64);
            let Some(target) = placed.intersect(&bounds) else {
                continue;
            };
            let style = if self.pool.contains(&region.style) {
                region.style.clone()
            } else {
                self.intern(region.style.to_style())
            };
            report.absorb(self.set_shared(&target, style));
        }
        report
    }

    /// Replace the default style, repainting every cell that held the old one
    pub fn set_default_style(&mut self, style: Style) -> ApplyReport {
        let new = self.intern(style);
        if new.ptr_eq(&self.default_style) {
            return ApplyReport::default();
        }
        let old = std::mem::replace(&mut self.default_style, new.clone());

        // repaint the whole tree, not just the sheet, so tiles beyond the
        // last row and column stay collapsible
        let extent = block_range(self.level, 0, 0);
        let is_old: StyleFilter<'_> = &|s: &Style| std::ptr::eq(s, &*old);
        let regions = region::extract(&self.root, self.level, &extent, &Style::equal, Some(is_old));

        let mut report = ApplyReport::default();
        for region in regions {
            let mut applicator = Applicator::new(
                &mut self.pool,
                self.link,
                ApplyPolicy::Replace(new.clone()),
                self.settings,
            );
            applicator.apply_range(&mut self.root, self.level, 0, 0, &region.range);
            report.absorb(applicator.finish());
        }
        drop(old);
        self.pool.purge();
        report.clip(&self.extent())
    }

    /// Color automatic pattern and border colors resolve to
    pub fn auto_pattern_color(&self) -> Color {
        self.link.auto_pattern_color()
    }

    /// Change the auto-pattern color.
    ///
    /// The default style is relinked immediately; other styles pick up the
    /// new color the next time they are written.
    pub fn set_auto_pattern_color(&mut self, color: Color) -> ApplyReport {
        if color == self.link.auto_pattern_color() {
            return ApplyReport::default();
        }
        self.link = SheetLink::new(color);
        let relinked = self.default_style.unlinked();
        self.set_default_style(relinked)
    }

    /// Color of the grid lines
    pub fn grid_color(&self) -> Color {
        match self.link.auto_pattern_color().to_rgb() {
            (0, 0, 0) => Color::GRID,
            _ => self.link.auto_pattern_color(),
        }
    }

    /// Build a tree for a `cols` x `rows` sheet holding `list`, everything
    /// else default
    pub(crate) fn build_tree(&mut self, cols: u32, rows: u32, list: &StyleList) -> (usize, Tile) {
        let level = top_level_for(cols, rows);
        let mut root = Tile::Simple(self.default_style.clone());
        for region in list {
            let target = to_tree(&region.range, cols, rows, level);
            let mut applicator = Applicator::new(
                &mut self.pool,
                self.link,
                ApplyPolicy::Replace(region.style.clone()),
                self.settings,
            );
            applicator.apply_range(&mut root, level, 0, 0, &target);
        }
        (level, root)
    }
}

impl fmt::Debug for SheetStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetStyles")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("level", &self.level)
            .field("tiles", &self.tile_stats())
            .field("pool", &self.pool.stats())
            .field("link", &self.link)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstyle_core::{Border, DEFAULT_COLS, DEFAULT_ROWS};

    fn sheet() -> SheetStyles {
        SheetStyles::with_settings(DEFAULT_COLS, DEFAULT_ROWS, StyleSettings::new().with_verify(true))
            .unwrap()
    }

    #[test]
    fn test_new_sheet_is_one_tile() {
        let sheet = sheet();
        assert_eq!(sheet.top_level(), 3);
        assert_eq!(sheet.tile_stats().total(), 1);
        assert!(sheet.style_at(255, 65_535).ptr_eq(sheet.default_style()));
        assert_eq!(sheet.pool_stats().live, 1);
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            SheetStyles::new(0, 10),
            Err(Error::InvalidSheetSize { cols: 0, rows: 10, .. })
        ));
        assert!(SheetStyles::new(MAX_COLS + 1, 10).is_err());
        assert!(SheetStyles::new(MAX_COLS, MAX_ROWS).is_ok());
    }

    #[test]
    fn test_whole_columns_stay_coarse() {
        let mut sheet = sheet();
        let bold = Style::default_sheet_style().with_bold(true);
        sheet.apply_style_to_range(&CellRange::from_indices(0, 0, 255, 65_535), bold);
        assert_eq!(sheet.tile_stats().total(), 1);

        let report = sheet.apply_partial_style_to_range(
            &CellRange::from_indices(64, 0, 127, 65_535),
            &Style::new().with_italic(true),
        );
        assert!(report.respan);
        assert_eq!(report.changed_cells(), 64 * 65_536);
        // a column split at level 2 below the root
        assert!(sheet.tile_stats().total() < 300);
    }

    #[test]
    fn test_report_is_clipped_to_sheet() {
        let mut sheet = sheet();
        let report = sheet.apply_style_to_range(
            &CellRange::from_indices(200, 0, 255, 9),
            Style::new().with_hidden(true),
        );
        let bounds = report.bounds().unwrap();
        assert_eq!(bounds, CellRange::from_indices(200, 0, 255, 9));
        assert_eq!(report.changed_cells(), 56 * 10);
    }

    #[test]
    fn test_pos_writes() {
        let mut sheet = sheet();
        sheet.set_pos(3, 4, Style::default_sheet_style().with_indent(2));
        sheet.apply_pos(3, 4, &Style::new().with_bold(true));
        let style = sheet.style_at(3, 4);
        assert_eq!(style.indent(), Some(2));
        assert_eq!(style.font_bold(), Some(true));
        assert!(sheet.style_at(4, 4).ptr_eq(sheet.default_style()));

        let report = sheet.apply_pos(3, 4, &Style::new().with_bold(true));
        assert!(report.is_empty());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_style_at_out_of_bounds() {
        sheet().style_at(256, 0);
    }

    #[test]
    fn test_get_range_and_set_list() {
        let mut sheet = sheet();
        sheet.apply_partial_style_to_range(
            &CellRange::from_indices(2, 2, 3, 3),
            &Style::new().with_strike(true),
        );
        let copy = sheet.get_range(&CellRange::from_indices(2, 2, 4, 4));
        assert_eq!(copy.bounds(), Some(CellRange::from_indices(0, 0, 2, 2)));

        sheet.set_list(CellAddress::new(10, 20), &copy, None);
        assert_eq!(sheet.style_at(10, 20).font_strike(), Some(true));
        assert_eq!(sheet.style_at(11, 21).font_strike(), Some(true));
        assert_eq!(sheet.style_at(12, 22).font_strike(), Some(false));

        // a clip keeps the paste inside
        let clip = CellRange::from_indices(100, 100, 100, 100);
        sheet.set_list(CellAddress::new(100, 100), &copy, Some(&clip));
        assert_eq!(sheet.style_at(100, 100).font_strike(), Some(true));
        assert_eq!(sheet.style_at(101, 100).font_strike(), Some(false));
    }

    #[test]
    fn test_set_list_interns_foreign_styles() {
        let mut source = sheet();
        source.apply_partial_style_to_range(
            &CellRange::from_indices(0, 0, 1, 1),
            &Style::new().with_indent(7),
        );
        let list = source.get_range(&CellRange::from_indices(0, 0, 1, 1));

        let mut target = sheet();
        target.set_list(CellAddress::new(5, 5), &list, None);
        let pasted = target.style_at(5, 5).clone();
        assert_eq!(pasted.indent(), Some(7));
        assert!(target.pool().contains(&pasted));
    }

    #[test]
    fn test_set_default_style_repaints() {
        let mut sheet = sheet();
        sheet.apply_partial_style_to_range(
            &CellRange::from_indices(0, 0, 9, 9),
            &Style::new().with_bold(true),
        );
        sheet.set_default_style(Style::default_sheet_style().with_font_size(12.0));

        assert_eq!(sheet.style_at(50, 50).font_size().map(|s| s.points()), Some(12.0));
        assert!(sheet.style_at(50, 50).ptr_eq(sheet.default_style()));
        // cells with their own style keep it
        assert_eq!(sheet.style_at(5, 5).font_size().map(|s| s.points()), Some(10.0));
        assert_eq!(sheet.pool_stats().live, 2);
    }

    #[test]
    fn test_auto_pattern_color() {
        let mut sheet = sheet();
        assert_eq!(sheet.grid_color(), Color::GRID);

        sheet.set_auto_pattern_color(Color::BLUE);
        assert_eq!(sheet.grid_color(), Color::BLUE);
        let top = sheet.style_at(0, 0).border_top().unwrap();
        assert_eq!(top.color, Color::AutoRgb { r: 0, g: 0, b: 255 });

        // styles written afterwards link against the new color too
        sheet.apply_partial_style_to_range(
            &CellRange::from_indices(1, 1, 1, 1),
            &Style::new().with_border_left(Border::thin()),
        );
        let left = sheet.style_at(1, 1).border_left().unwrap();
        assert_eq!(left.color, Color::AutoRgb { r: 0, g: 0, b: 255 });
        assert_eq!(sheet.tile_stats().total(), 1 + 128 * 3);
    }
}
