//! Range border application

use gridstyle_core::{Border, BorderLocation, CellRange, Style};

use crate::apply::ApplyReport;
use crate::sheet::SheetStyles;

impl SheetStyles {
    /// Draw borders around and inside `range`.
    ///
    /// `borders` is indexed by [`BorderLocation`]; `None` leaves that location
    /// alone. Top, bottom, left and right apply to the outline, and the facing
    /// border of the cells just outside the range is cleared so the outline is
    /// the only line on that edge. Horizontal and vertical apply to the inner
    /// edges, the diagonals to every cell.
    pub fn apply_border(
        &mut self,
        range: &CellRange,
        borders: &[Option<Border>; 8],
    ) -> ApplyReport {
        let border = |loc: BorderLocation| borders[loc as usize];
        let (c0, r0, c1, r1) = (range.start.col, range.start.row, range.end.col, range.end.row);
        let mut report = ApplyReport::default();

        if let Some(b) = border(BorderLocation::Top) {
            report.absorb(self.set_edge(CellRange::from_indices(c0, r0, c1, r0), BorderLocation::Top, b));
            if r0 > 0 {
                let above = CellRange::from_indices(c0, r0 - 1, c1, r0 - 1);
                report.absorb(self.set_edge(above, BorderLocation::Bottom, Border::NONE));
            }
        }
        if let Some(b) = border(BorderLocation::Bottom) {
            report.absorb(self.set_edge(CellRange::from_indices(c0, r1, c1, r1), BorderLocation::Bottom, b));
            if r1 + 1 < self.rows() {
                let below = CellRange::from_indices(c0, r1 + 1, c1, r1 + 1);
                report.absorb(self.set_edge(below, BorderLocation::Top, Border::NONE));
            }
        }
        if let Some(b) = border(BorderLocation::Left) {
            report.absorb(self.set_edge(CellRange::from_indices(c0, r0, c0, r1), BorderLocation::Left, b));
            if c0 > 0 {
                let left = CellRange::from_indices(c0 - 1, r0, c0 - 1, r1);
                report.absorb(self.set_edge(left, BorderLocation::Right, Border::NONE));
            }
        }
        if let Some(b) = border(BorderLocation::Right) {
            report.absorb(self.set_edge(CellRange::from_indices(c1, r0, c1, r1), BorderLocation::Right, b));
            if c1 + 1 < self.cols() {
                let right = CellRange::from_indices(c1 + 1, r0, c1 + 1, r1);
                report.absorb(self.set_edge(right, BorderLocation::Left, Border::NONE));
            }
        }

        if let Some(b) = border(BorderLocation::Horizontal) {
            if r1 > r0 {
                report.absorb(self.set_edge(CellRange::from_indices(c0, r0 + 1, c1, r1), BorderLocation::Top, b));
                report.absorb(self.set_edge(CellRange::from_indices(c0, r0, c1, r1 - 1), BorderLocation::Bottom, b));
            }
        }
        if let Some(b) = border(BorderLocation::Vertical) {
            if c1 > c0 {
                report.absorb(self.set_edge(CellRange::from_indices(c0 + 1, r0, c1, r1), BorderLocation::Left, b));
                report.absorb(self.set_edge(CellRange::from_indices(c0, r0, c1 - 1, r1), BorderLocation::Right, b));
            }
        }

        for loc in [BorderLocation::RevDiagonal, BorderLocation::Diagonal] {
            if let Some(b) = border(loc) {
                report.absorb(self.set_edge(*range, loc, b));
            }
        }
        report
    }

    fn set_edge(&mut self, range: CellRange, loc: BorderLocation, border: Border) -> ApplyReport {
        self.apply_partial_style_to_range(&range, &Style::new().with_border(loc, border))
    }
}
