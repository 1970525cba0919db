//! Tree shape, pool size and structural edits

use gridstyle::prelude::*;
use gridstyle::{DEFAULT_COLS, DEFAULT_ROWS};
use pretty_assertions::assert_eq;

fn range(c0: u32, r0: u32, c1: u32, r1: u32) -> CellRange {
    CellRange::from_indices(c0, r0, c1, r1)
}

fn sheet() -> SheetStyles {
    SheetStyles::with_settings(
        DEFAULT_COLS,
        DEFAULT_ROWS,
        StyleSettings::new().with_verify(true),
    )
    .unwrap()
}

#[test]
fn test_idempotent_apply() {
    let mut sheet = sheet();
    let bold = Style::default_sheet_style().with_bold(true);
    let target = range(3, 17, 40, 333);

    let first = sheet.apply_style_to_range(&target, bold.clone());
    assert!(!first.is_empty());
    let shape = sheet.snapshot();
    let pool = sheet.pool_stats();

    let second = sheet.apply_style_to_range(&target, bold);
    assert!(second.is_empty());
    assert_eq!(sheet.snapshot(), shape);
    assert_eq!(sheet.pool_stats(), pool);
}

#[test]
fn test_idempotent_partial() {
    let mut sheet = sheet();
    let partial = Style::new().with_pattern(1).with_back_color(Color::YELLOW);
    sheet.apply_partial_style_to_range(&range(0, 0, 100, 100), &partial);
    let shape = sheet.snapshot();

    let again = sheet.apply_partial_style_to_range(&range(0, 0, 100, 100), &partial);
    assert!(again.is_empty());
    assert_eq!(sheet.snapshot(), shape);
}

#[test]
fn test_whole_sheet_leaves_one_style() {
    let mut sheet = sheet();
    sheet.apply_partial_style_to_range(&range(5, 5, 50, 500), &Style::new().with_bold(true));
    sheet.apply_partial_style_to_range(&range(7, 7, 9, 9), &Style::new().with_indent(4));
    assert!(sheet.pool_stats().live >= 3);

    let everything = sheet.extent();
    sheet.apply_style_to_range(&everything, Style::default_sheet_style().with_font_size(9.0));
    assert_eq!(sheet.tile_stats().total(), 1);
    // the new style and the sheet default
    assert_eq!(sheet.pool_stats().live, 2);

    sheet.set_default_style(Style::default_sheet_style().with_font_size(9.0));
    assert_eq!(sheet.pool_stats().live, 1);
    assert_eq!(sheet.pool_stats().entries, 1);
}

#[test]
fn test_report_describes_change() {
    let mut sheet = sheet();
    let report = sheet.apply_partial_style_to_range(&range(2, 2, 4, 4), &Style::new().with_wrap_text(true));
    assert!(report.respan);
    assert_eq!(report.changed_cells(), 9);
    assert_eq!(report.bounds(), Some(range(2, 2, 4, 4)));

    let report = sheet.apply_partial_style_to_range(&range(2, 2, 4, 4), &Style::new().with_pattern(1));
    assert!(!report.respan);
}

#[test]
fn test_insert_and_delete_round_trip() {
    let mut sheet = sheet();
    sheet.apply_partial_style_to_range(&range(10, 10, 12, 12), &Style::new().with_bold(true));
    let before = sheet.style_regions(None);

    sheet.insert_rows(5, 3);
    sheet.insert_cols(0, 2);
    assert_eq!(sheet.style_at(12, 13).font_bold(), Some(true));
    assert!(sheet.style_at(11, 13).ptr_eq(sheet.default_style()));

    sheet.delete_cols(0, 2);
    sheet.delete_rows(5, 3);
    assert_eq!(sheet.style_regions(None), before);
}

#[test]
fn test_resize_round_trip() {
    let mut sheet = sheet();
    sheet.apply_partial_style_to_range(&range(1, 1, 3, 3), &Style::new().with_strike(true));
    sheet.resize(16, 32).unwrap();
    assert_eq!(sheet.top_level(), 1);
    sheet.resize(DEFAULT_COLS, DEFAULT_ROWS).unwrap();
    assert_eq!(sheet.top_level(), 3);

    let strike: Vec<CellRange> = sheet
        .style_regions(None)
        .iter()
        .filter(|r| r.style.font_strike() == Some(true))
        .map(|r| r.range)
        .collect();
    assert_eq!(strike, vec![range(1, 1, 3, 3)]);
}

#[test]
fn test_borders_and_conflicts() {
    let mut sheet = sheet();
    let mut borders = [None; 8];
    borders[BorderLocation::Top as usize] = Some(Border::thick());
    borders[BorderLocation::Horizontal as usize] = Some(Border::thin());
    sheet.apply_border(&range(0, 0, 3, 3), &borders);

    let (common, conflicts) = sheet.find_conflicts(&range(0, 0, 3, 3));
    assert_eq!(common.border_left().map(|b| b.line), Some(BorderLineStyle::None));
    assert!(common.border_top().is_none());
    assert!(!conflicts.is_empty());
}
