//! Read-only queries over a sheet's styles

use ahash::AHashMap;
use gridstyle_core::{CellRange, Handle, Hyperlink, SharedStyle, Style, StyleConflicts};

use crate::region::StyleList;
use crate::sheet::SheetStyles;

impl SheetStyles {
    fn for_each_span(&self, clip: &CellRange, f: &mut dyn FnMut(CellRange, &SharedStyle)) {
        self.root.for_each_leaf(self.level, 0, 0, clip, f);
    }

    /// The style common to every cell of `range`.
    ///
    /// Elements that differ somewhere in the range are left unset in the
    /// returned style and flagged in the conflict set.
    pub fn find_conflicts(&self, range: &CellRange) -> (Style, StyleConflicts) {
        self.check_range(range);
        let mut common = self.style_at(range.start.col, range.start.row).to_style();
        let mut conflicts = StyleConflicts::new();
        let mut last: Option<SharedStyle> = None;
        self.for_each_span(range, &mut |_, style| {
            if last.as_ref().map_or(false, |l| l.ptr_eq(style)) {
                return;
            }
            common.accumulate_conflicts(style, &mut conflicts);
            last = Some(style.clone());
        });
        (common, conflicts)
    }

    /// The style covering the most cells of column `col`.
    ///
    /// Ties go to the style met first from the top.
    pub fn most_common_in_col(&self, col: u32) -> SharedStyle {
        self.check_cell(col, 0);
        let clip = CellRange::from_indices(col, 0, col, self.rows - 1);
        let mut index: AHashMap<usize, usize> = AHashMap::new();
        let mut counts: Vec<(SharedStyle, u64)> = Vec::new();
        self.for_each_span(&clip, &mut |range, style| {
            let cells = range.cell_count();
            match index.get(&style.addr()) {
                Some(&i) => counts[i].1 += cells,
                None => {
                    index.insert(style.addr(), counts.len());
                    counts.push((style.clone(), cells));
                }
            }
        });
        counts
            .into_iter()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
            .map(|(style, _)| style)
            .unwrap_or_else(|| self.default_style.clone())
    }

    /// Smallest range holding every cell of `range` whose style is not the
    /// default, if any
    pub fn nondefault_extent(&self, range: &CellRange) -> Option<CellRange> {
        self.check_range(range);
        let mut extent: Option<CellRange> = None;
        let default = &self.default_style;
        self.for_each_span(range, &mut |span, style| {
            if !style.ptr_eq(default) {
                extent = Some(extent.map_or(span, |e| e.union(&span)));
            }
        });
        extent
    }

    /// For every row, whether any of its cells has a non-default style
    pub fn nondefault_rows(&self) -> Vec<bool> {
        let mut rows = vec![false; self.rows as usize];
        let default = &self.default_style;
        self.for_each_span(&self.extent(), &mut |span, style| {
            if !style.ptr_eq(default) {
                rows[span.start.row as usize..=span.end.row as usize].fill(true);
            }
        });
        rows
    }

    /// Regions carrying a hyperlink, merged by link
    pub fn collect_hyperlinks(&self, range: Option<&CellRange>) -> StyleList {
        self.extract_style_regions(
            range,
            &|a: &Style, b: &Style| a.hlink() == b.hlink(),
            Some(&|s: &Style| s.hlink().is_some()),
        )
    }

    /// Regions carrying a validation or an input message, merged by both
    pub fn collect_validations(&self, range: Option<&CellRange>) -> StyleList {
        self.extract_style_regions(
            range,
            &|a: &Style, b: &Style| a.validation() == b.validation() && a.input_msg() == b.input_msg(),
            Some(&|s: &Style| s.validation().is_some() || s.input_msg().is_some()),
        )
    }

    /// Regions carrying conditional formats, merged by condition set
    pub fn collect_conditions(&self, range: Option<&CellRange>) -> StyleList {
        self.extract_style_regions(
            range,
            &|a: &Style, b: &Style| a.conditions() == b.conditions(),
            Some(&|s: &Style| s.conditions().is_some()),
        )
    }

    /// The first hyperlink found in `range`, top to bottom
    pub fn region_contains_link(&self, range: &CellRange) -> Option<Handle<Hyperlink>> {
        self.collect_hyperlinks(Some(range))
            .iter()
            .find_map(|region| region.style.hlink().cloned())
    }
}
