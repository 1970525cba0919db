//! Row resolver
//!
//! Resolves the styles of one row span together with the borders a renderer
//! should draw around each cell. An edge shared by two cells resolves to the
//! same value whichever cell asks: the heavier of the two borders wins, and a
//! cell with a fill pattern suppresses the grid line on its edges.
//!
//! Edges are `Option<Border>`: `None` draws nothing, `Some(Border::NONE)`
//! draws the grid, anything else draws that border.

use gridstyle_core::{Border, BorderLocation, SharedStyle};

use crate::tile::Tile;

/// Styles and resolved borders of one row span
#[derive(Debug, Clone)]
pub struct StyleRow {
    row: u32,
    start_col: u32,
    end_col: u32,
    hide_grid: bool,
    styles: Vec<SharedStyle>,
    top: Vec<Option<Border>>,
    bottom: Vec<Option<Border>>,
    /// `vertical[i]` is the edge left of column `start_col + i`
    vertical: Vec<Option<Border>>,
}

impl StyleRow {
    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn start_col(&self) -> u32 {
        self.start_col
    }

    pub fn end_col(&self) -> u32 {
        self.end_col
    }

    /// Whether "no border" edges were resolved against a hidden grid
    pub fn hide_grid(&self) -> bool {
        self.hide_grid
    }

    /// Number of columns in the span
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Styles in column order
    pub fn styles(&self) -> &[SharedStyle] {
        &self.styles
    }

    /// Style of `col`
    ///
    /// # Panics
    /// If `col` is outside the span.
    pub fn style(&self, col: u32) -> &SharedStyle {
        &self.styles[self.offset(col)]
    }

    pub fn top(&self, col: u32) -> Option<Border> {
        self.top[self.offset(col)]
    }

    pub fn bottom(&self, col: u32) -> Option<Border> {
        self.bottom[self.offset(col)]
    }

    pub fn left(&self, col: u32) -> Option<Border> {
        self.vertical[self.offset(col)]
    }

    pub fn right(&self, col: u32) -> Option<Border> {
        self.vertical[self.offset(col) + 1]
    }

    pub fn top_edges(&self) -> &[Option<Border>] {
        &self.top
    }

    pub fn bottom_edges(&self) -> &[Option<Border>] {
        &self.bottom
    }

    /// The `len() + 1` vertical edges, leftmost first
    pub fn vertical_edges(&self) -> &[Option<Border>] {
        &self.vertical
    }

    fn offset(&self, col: u32) -> usize {
        assert!(
            (self.start_col..=self.end_col).contains(&col),
            "column {col} outside row span {}..={}",
            self.start_col,
            self.end_col
        );
        (col - self.start_col) as usize
    }
}

/// The edge a cell contributes on its `loc` side
fn own_edge(style: &SharedStyle, loc: BorderLocation, hide_grid: bool) -> Option<Border> {
    let border = style.border(loc).unwrap_or(Border::NONE);
    if !border.is_visible() && (hide_grid || style.pattern().unwrap_or(0) > 0) {
        None
    } else {
        Some(border)
    }
}

/// Edge contributed by a cell beyond the sheet
fn missing_edge(hide_grid: bool) -> Option<Border> {
    if hide_grid {
        None
    } else {
        Some(Border::NONE)
    }
}

/// Combine the contributions of the two cells sharing an edge
pub(crate) fn merge_edge(own: Option<Border>, neighbor: Option<Border>) -> Option<Border> {
    match (own, neighbor) {
        (Some(a), Some(b)) if a.is_visible() || b.is_visible() => Some(Border::stronger(a, b)),
        (Some(a), None) if a.is_visible() => Some(a),
        (None, Some(b)) if b.is_visible() => Some(b),
        (Some(_), Some(_)) => Some(Border::NONE),
        _ => None,
    }
}

/// Read access to the rows of a tile tree
#[derive(Clone, Copy)]
pub(crate) struct RowSource<'a> {
    pub(crate) root: &'a Tile,
    pub(crate) level: usize,
    pub(crate) cols: u32,
    pub(crate) rows: u32,
    pub(crate) hide_grid: bool,
}

impl<'a> RowSource<'a> {
    fn fetch(&self, row: u32, lo: u32, hi: u32) -> Vec<SharedStyle> {
        let mut out = Vec::with_capacity((hi - lo + 1) as usize);
        self.root.fill_row(self.level, 0, 0, row, lo, hi, &mut out);
        out
    }

    /// Columns fetched for a span: one extra on each side where the sheet has one
    fn extended(&self, start_col: u32, end_col: u32) -> (u32, u32) {
        (start_col.saturating_sub(1), (end_col + 1).min(self.cols - 1))
    }

    fn check_span(&self, row: u32, start_col: u32, end_col: u32) {
        let (cols, rows) = (self.cols, self.rows);
        assert!(row < rows, "row {row} out of bounds ({rows} rows)");
        assert!(
            start_col <= end_col && end_col < cols,
            "column span {start_col}..={end_col} out of bounds ({cols} columns)"
        );
    }

    pub(crate) fn resolve(&self, row: u32, start_col: u32, end_col: u32) -> StyleRow {
        self.check_span(row, start_col, end_col);
        let (lo, hi) = self.extended(start_col, end_col);
        let above = (row > 0).then(|| self.fetch(row - 1, lo, hi));
        let current = self.fetch(row, lo, hi);
        let below = (row + 1 < self.rows).then(|| self.fetch(row + 1, lo, hi));
        self.build(row, start_col, end_col, lo, above.as_deref(), &current, below.as_deref())
    }

    pub(crate) fn walk(self, start_row: u32, end_row: u32, start_col: u32, end_col: u32) -> RowWalker<'a> {
        self.check_span(start_row, start_col, end_col);
        assert!(
            start_row <= end_row && end_row < self.rows,
            "row span {start_row}..={end_row} out of bounds ({} rows)",
            self.rows
        );
        let (lo, hi) = self.extended(start_col, end_col);
        RowWalker {
            source: self,
            next_row: start_row,
            end_row,
            start_col,
            end_col,
            lo,
            hi,
            above: None,
            current: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        row: u32,
        start_col: u32,
        end_col: u32,
        lo: u32,
        above: Option<&[SharedStyle]>,
        current: &[SharedStyle],
        below: Option<&[SharedStyle]>,
    ) -> StyleRow {
        let hide = self.hide_grid;
        let missing = missing_edge(hide);
        let first = (start_col - lo) as usize;
        let last = (end_col - lo) as usize;

        let top = (first..=last)
            .map(|i| {
                let upper = above.map_or(missing, |a| own_edge(&a[i], BorderLocation::Bottom, hide));
                merge_edge(own_edge(&current[i], BorderLocation::Top, hide), upper)
            })
            .collect();
        let bottom = (first..=last)
            .map(|i| {
                let lower = below.map_or(missing, |b| own_edge(&b[i], BorderLocation::Top, hide));
                merge_edge(lower, own_edge(&current[i], BorderLocation::Bottom, hide))
            })
            .collect();
        let vertical = (first..=last + 1)
            .map(|i| {
                let right = current
                    .get(i)
                    .map_or(missing, |s| own_edge(s, BorderLocation::Left, hide));
                let left = match i.checked_sub(1) {
                    Some(j) => own_edge(&current[j], BorderLocation::Right, hide),
                    None => missing,
                };
                merge_edge(right, left)
            })
            .collect();

        StyleRow {
            row,
            start_col,
            end_col,
            hide_grid: hide,
            styles: current[first..=last].to_vec(),
            top,
            bottom,
            vertical,
        }
    }
}

/// Iterator over consecutive resolved rows, fetching each row of styles once
pub struct RowWalker<'a> {
    source: RowSource<'a>,
    next_row: u32,
    end_row: u32,
    start_col: u32,
    end_col: u32,
    lo: u32,
    hi: u32,
    above: Option<Vec<SharedStyle>>,
    current: Option<Vec<SharedStyle>>,
}

impl<'a> Iterator for RowWalker<'a> {
    type Item = StyleRow;

    fn next(&mut self) -> Option<StyleRow> {
        if self.next_row > self.end_row {
            return None;
        }
        let row = self.next_row;
        let source = self.source;

        if self.current.is_none() {
            self.above = (row > 0).then(|| source.fetch(row - 1, self.lo, self.hi));
            self.current = Some(source.fetch(row, self.lo, self.hi));
        }
        let below = (row + 1 < source.rows).then(|| source.fetch(row + 1, self.lo, self.hi));
        let current = self.current.take().unwrap_or_default();

        let resolved = source.build(
            row,
            self.start_col,
            self.end_col,
            self.lo,
            self.above.as_deref(),
            &current,
            below.as_deref(),
        );

        self.above = Some(current);
        self.current = below;
        self.next_row += 1;
        Some(resolved)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.end_row + 1).saturating_sub(self.next_row) as usize;
        (left, Some(left))
    }
}

impl<'a> ExactSizeIterator for RowWalker<'a> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::{ApplyPolicy, Applicator};
    use crate::settings::StyleSettings;
    use gridstyle_core::{BorderLineStyle, CellRange, Color, SheetLink, Style, StylePool};

    // a 20x30 sheet in a single level 1 tile
    struct Grid {
        pool: StylePool,
        link: SheetLink,
        root: Tile,
    }

    impl Grid {
        fn new() -> Self {
            let mut pool = StylePool::new();
            let link = SheetLink::default();
            let base = pool.intern(Style::default_sheet_style(), &link);
            Self {
                pool,
                link,
                root: Tile::Simple(base),
            }
        }

        fn apply(&mut self, col: u32, row: u32, partial: Style) {
            let mut app = Applicator::new(
                &mut self.pool,
                self.link,
                ApplyPolicy::Merge(&partial),
                StyleSettings::default(),
            );
            app.apply_range(&mut self.root, 1, 0, 0, &CellRange::from_indices(col, row, col, row));
        }

        fn source(&self, hide_grid: bool) -> RowSource<'_> {
            RowSource {
                root: &self.root,
                level: 1,
                cols: 20,
                rows: 30,
                hide_grid,
            }
        }
    }

    fn thick() -> Border {
        Border::thick()
    }

    #[test]
    fn test_default_sheet_draws_grid() {
        let grid = Grid::new();
        let row = grid.source(false).resolve(0, 0, 19);
        assert_eq!(row.len(), 20);
        assert!(row.top_edges().iter().all(|e| *e == Some(Border::NONE)));
        assert!(row.vertical_edges().iter().all(|e| *e == Some(Border::NONE)));
        assert_eq!(row.vertical_edges().len(), 21);

        let hidden = grid.source(true).resolve(0, 0, 19);
        assert!(hidden.top_edges().iter().all(Option::is_none));
        assert!(hidden.bottom_edges().iter().all(Option::is_none));
    }

    #[test]
    fn test_shared_edge_resolves_from_both_sides() {
        let mut grid = Grid::new();
        grid.apply(3, 5, Style::new().with_border_bottom(thick()));

        let source = grid.source(false);
        let upper = source.resolve(5, 0, 10);
        let lower = source.resolve(6, 0, 10);
        let expected = Some(Border::new(BorderLineStyle::Thick, Color::AutoRgb { r: 0, g: 0, b: 0 }));
        assert_eq!(upper.bottom(3), expected);
        assert_eq!(lower.top(3), expected);
        assert_eq!(lower.top(4), Some(Border::NONE));
    }

    #[test]
    fn test_heavier_border_wins() {
        let mut grid = Grid::new();
        grid.apply(2, 2, Style::new().with_border_right(Border::thin()));
        grid.apply(3, 2, Style::new().with_border_left(Border::medium()));

        let row = grid.source(false).resolve(2, 2, 3);
        let edge = row.right(2).map(|b| b.line);
        assert_eq!(edge, Some(BorderLineStyle::Medium));
        assert_eq!(row.left(3), row.right(2));
    }

    #[test]
    fn test_pattern_suppresses_grid() {
        let mut grid = Grid::new();
        grid.apply(4, 5, Style::new().with_pattern(1));

        let row = grid.source(false).resolve(5, 3, 5);
        assert_eq!(row.top(4), None);
        assert_eq!(row.bottom(4), None);
        assert_eq!(row.left(4), None);
        assert_eq!(row.right(4), None);
        assert_eq!(row.top(3), Some(Border::NONE));
    }

    #[test]
    fn test_pattern_keeps_visible_border() {
        let mut grid = Grid::new();
        grid.apply(4, 5, Style::new().with_pattern(1));
        grid.apply(4, 4, Style::new().with_border_bottom(thick()));

        let row = grid.source(false).resolve(5, 4, 4);
        assert_eq!(row.top(4).map(|b| b.line), Some(BorderLineStyle::Thick));
    }

    #[test]
    fn test_span_inside_sheet_sees_neighbours() {
        let mut grid = Grid::new();
        grid.apply(4, 7, Style::new().with_border_right(thick()));

        // the span starts at column 5, the border lives in column 4
        let row = grid.source(false).resolve(7, 5, 8);
        assert_eq!(row.left(5).map(|b| b.line), Some(BorderLineStyle::Thick));
    }

    #[test]
    fn test_walker_rolls_rows() {
        let mut grid = Grid::new();
        grid.apply(1, 10, Style::new().with_border_top(thick()));
        grid.apply(2, 12, Style::new().with_border_bottom(Border::thin()));

        let source = grid.source(false);
        let rows: Vec<StyleRow> = source.walk(8, 14, 0, 5).collect();
        assert_eq!(rows.len(), 7);
        for pair in rows.windows(2) {
            assert_eq!(pair[0].bottom_edges(), pair[1].top_edges());
        }
        for row in &rows {
            let direct = source.resolve(row.row(), 0, 5);
            assert_eq!(row.top_edges(), direct.top_edges());
            assert_eq!(row.vertical_edges(), direct.vertical_edges());
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_row_out_of_bounds() {
        let grid = Grid::new();
        grid.source(false).resolve(30, 0, 1);
    }
}
