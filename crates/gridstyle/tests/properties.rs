//! Random apply sequences checked against a per-cell model of the sheet

use gridstyle::prelude::*;
use gridstyle_core::HorizontalAlignment;
use proptest::prelude::*;

const COLS: u32 = 40;
const ROWS: u32 = 70;

#[derive(Debug, Clone)]
enum Op {
    Set(CellRange, usize),
    Merge(CellRange, usize),
    Pos(u32, u32, usize),
}

fn palette() -> Vec<Style> {
    let base = Style::default_sheet_style();
    vec![
        base.clone().with_bold(true),
        base.clone().with_pattern(1).with_back_color(Color::RED),
        base.clone().with_border_top(Border::thin()),
        base.clone().with_font_size(14.0),
        base.with_indent(2),
    ]
}

fn partials() -> Vec<Style> {
    vec![
        Style::new().with_italic(true),
        Style::new().with_bold(false),
        Style::new().with_border_left(Border::medium()),
        Style::new().with_align_h(HorizontalAlignment::Center),
        Style::new().with_pattern(0),
    ]
}

fn range_strategy() -> impl Strategy<Value = CellRange> {
    (0..COLS, 0..ROWS, 0..COLS, 0..ROWS).prop_map(|(c0, r0, c1, r1)| CellRange::from_indices(c0, r0, c1, r1))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (range_strategy(), 0..5usize).prop_map(|(r, s)| Op::Set(r, s)),
        (range_strategy(), 0..5usize).prop_map(|(r, s)| Op::Merge(r, s)),
        (0..COLS, 0..ROWS, 0..5usize).prop_map(|(c, r, s)| Op::Pos(c, r, s)),
    ]
}

/// Plain per-cell grid of owned styles
struct Model {
    cells: Vec<Style>,
}

impl Model {
    fn new() -> Self {
        Self {
            cells: vec![Style::default_sheet_style(); (COLS * ROWS) as usize],
        }
    }

    fn cell_mut(&mut self, col: u32, row: u32) -> &mut Style {
        &mut self.cells[(row * COLS + col) as usize]
    }

    fn get(&self, col: u32, row: u32) -> &Style {
        &self.cells[(row * COLS + col) as usize]
    }

    fn apply(&mut self, op: &Op) {
        let (palette, partials) = (palette(), partials());
        match op {
            Op::Set(range, s) => {
                for cell in range.cells() {
                    *self.cell_mut(cell.col, cell.row) = palette[*s].clone();
                }
            }
            Op::Merge(range, p) => {
                for cell in range.cells() {
                    self.cell_mut(cell.col, cell.row).merge(&partials[*p]);
                }
            }
            Op::Pos(col, row, s) => *self.cell_mut(*col, *row) = palette[*s].clone(),
        }
    }
}

fn run(sheet: &mut SheetStyles, op: &Op) {
    match op {
        Op::Set(range, s) => {
            sheet.apply_style_to_range(range, palette()[*s].clone());
        }
        Op::Merge(range, p) => {
            sheet.apply_partial_style_to_range(range, &partials()[*p]);
        }
        Op::Pos(col, row, s) => {
            sheet.set_pos(*col, *row, palette()[*s].clone());
        }
    }
}

fn verifying() -> SheetStyles {
    SheetStyles::with_settings(COLS, ROWS, StyleSettings::new().with_verify(true)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every cell reads back what the model holds, partial merges included
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(op_strategy(), 1..12)) {
        let mut sheet = verifying();
        let mut model = Model::new();
        for op in &ops {
            run(&mut sheet, op);
            model.apply(op);
        }
        for row in 0..ROWS {
            for col in 0..COLS {
                let got = sheet.style_at(col, row);
                let want = model.get(col, row);
                prop_assert!(
                    got.equal_unlinked(want),
                    "cell ({col}, {row}) differs: {got:?} vs {want:?}"
                );
            }
        }
    }

    /// Compaction never changes what a cell reads
    #[test]
    fn prop_optimizer_transparent(ops in prop::collection::vec(op_strategy(), 1..12)) {
        let mut compact = verifying();
        let mut raw = SheetStyles::with_settings(COLS, ROWS, StyleSettings::new().with_optimize(false)).unwrap();
        for op in &ops {
            run(&mut compact, op);
            run(&mut raw, op);
        }
        for row in 0..ROWS {
            for col in 0..COLS {
                prop_assert_eq!(compact.style_at(col, row), raw.style_at(col, row));
            }
        }
        prop_assert!(compact.tile_stats().total() <= raw.tile_stats().total());
    }

    /// Extracted regions partition the queried range, each holding one style
    #[test]
    fn prop_regions_partition(
        ops in prop::collection::vec(op_strategy(), 1..12),
        clip in range_strategy(),
    ) {
        let mut sheet = verifying();
        for op in &ops {
            run(&mut sheet, op);
        }
        let regions = sheet.style_regions(Some(&clip));
        prop_assert_eq!(regions.cell_count(), clip.cell_count());
        for (i, a) in regions.iter().enumerate() {
            prop_assert!(clip.contains_range(&a.range));
            for b in regions.iter().skip(i + 1) {
                prop_assert!(!a.range.overlaps(&b.range), "{} overlaps {}", a.range, b.range);
            }
            for cell in a.range.cells() {
                prop_assert!(sheet.style_at(cell.col, cell.row).ptr_eq(&a.style));
            }
        }
    }

    /// A relative copy pasted elsewhere reproduces the source cells
    #[test]
    fn prop_copy_paste(
        ops in prop::collection::vec(op_strategy(), 1..8),
        (c0, r0, w, h) in (0..20u32, 0..35u32, 1..20u32, 1..35u32),
    ) {
        let mut sheet = verifying();
        for op in &ops {
            run(&mut sheet, op);
        }
        let source = CellRange::from_indices(c0, r0, c0 + w - 1, r0 + h - 1);
        let copy = sheet.get_range(&source);
        let mut target = verifying();
        target.set_list(CellAddress::new(COLS - w, ROWS - h), &copy, None);
        for cell in source.cells() {
            let moved = target.style_at(cell.col - c0 + COLS - w, cell.row - r0 + ROWS - h);
            prop_assert_eq!(moved, sheet.style_at(cell.col, cell.row));
        }
    }

    /// On a sheet several tile levels deep, cells around every write and a
    /// random sample read back what replaying the writes gives
    #[test]
    fn prop_deep_sheet_sampled(
        ops in prop::collection::vec(deep_op_strategy(), 1..10),
        samples in prop::collection::vec((0..DEEP_COLS, 0..DEEP_ROWS), 32),
    ) {
        let mut sheet =
            SheetStyles::with_settings(DEEP_COLS, DEEP_ROWS, StyleSettings::new().with_verify(true)).unwrap();
        prop_assert!(sheet.top_level() >= 2);
        for op in &ops {
            run(&mut sheet, op);
        }

        let mut points = samples;
        for op in &ops {
            if let Op::Set(range, _) | Op::Merge(range, _) = op {
                points.extend(edge_points(range));
            }
        }
        for (col, row) in points {
            let want = replay(&ops, col, row);
            let got = sheet.style_at(col, row);
            prop_assert!(
                got.equal_unlinked(&want),
                "cell ({col}, {row}) differs: {got:?} vs {want:?}"
            );
        }
    }
}

const DEEP_COLS: u32 = 700;
const DEEP_ROWS: u32 = 9000;

fn deep_range_strategy() -> impl Strategy<Value = CellRange> {
    // spans from a single cell up to the whole sheet, edges included
    (0..DEEP_COLS, 0..DEEP_ROWS, 0..4u32, 0..4u32).prop_map(|(c0, r0, wscale, hscale)| {
        let w = [1, 9, 130, DEEP_COLS][wscale as usize];
        let h = [1, 17, 300, DEEP_ROWS][hscale as usize];
        CellRange::from_indices(
            c0,
            r0,
            (c0 + w - 1).min(DEEP_COLS - 1),
            (r0 + h - 1).min(DEEP_ROWS - 1),
        )
    })
}

fn deep_op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (deep_range_strategy(), 0..5usize).prop_map(|(r, s)| Op::Set(r, s)),
        (deep_range_strategy(), 0..5usize).prop_map(|(r, s)| Op::Merge(r, s)),
        (0..DEEP_COLS, 0..DEEP_ROWS, 0..5usize).prop_map(|(c, r, s)| Op::Pos(c, r, s)),
    ]
}

/// Corners of `range` and the cells just outside them
fn edge_points(range: &CellRange) -> Vec<(u32, u32)> {
    let cols = [range.start.col.checked_sub(1), Some(range.start.col), Some(range.end.col), Some(range.end.col + 1)];
    let rows = [range.start.row.checked_sub(1), Some(range.start.row), Some(range.end.row), Some(range.end.row + 1)];
    cols.iter()
        .flatten()
        .flat_map(|&c| rows.iter().flatten().map(move |&r| (c, r)))
        .filter(|&(c, r)| c < DEEP_COLS && r < DEEP_ROWS)
        .collect()
}

/// Style of one cell after running `ops` on a fresh sheet
fn replay(ops: &[Op], col: u32, row: u32) -> Style {
    let (palette, partials) = (palette(), partials());
    let mut style = Style::default_sheet_style();
    for op in ops {
        match op {
            Op::Set(range, s) if range.contains(col, row) => style = palette[*s].clone(),
            Op::Merge(range, p) if range.contains(col, row) => style.merge(&partials[*p]),
            Op::Pos(c, r, s) if (*c, *r) == (col, row) => style = palette[*s].clone(),
            _ => {}
        }
    }
    style
}
