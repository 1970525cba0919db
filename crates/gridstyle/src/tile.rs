//! The tile tree
//!
//! A sheet's styles live in a fixed-fanout tree. Every tile covers a block of
//! `8^(level+1)` columns by `16^(level+1)` rows and splits it into an 8x16
//! grid of entries, each one level down. Level 0 entries are single cells.
//!
//! The five tile shapes only differ in how many distinct entries they store;
//! whatever the shape, a tile answers [`Tile::style_at`] the same way for
//! every cell of its block.

use std::array;
use std::fmt;
use std::ops::RangeInclusive;

use gridstyle_core::{CellRange, SharedStyle};

/// Entries per tile along a row
pub const TILE_SIZE_COL: u32 = 8;
/// Entries per tile along a column
pub const TILE_SIZE_ROW: u32 = 16;
/// Entries per tile
pub const TILE_CELLS: usize = (TILE_SIZE_COL * TILE_SIZE_ROW) as usize;

const COLS: usize = TILE_SIZE_COL as usize;
const ROWS: usize = TILE_SIZE_ROW as usize;

/// Width in cells of one entry of a tile at `level`
#[inline]
pub(crate) const fn sub_width(level: usize) -> u32 {
    TILE_SIZE_COL.pow(level as u32)
}

/// Height in cells of one entry of a tile at `level`
#[inline]
pub(crate) const fn sub_height(level: usize) -> u32 {
    TILE_SIZE_ROW.pow(level as u32)
}

/// Width in cells of a whole tile at `level`
#[inline]
pub(crate) const fn block_width(level: usize) -> u32 {
    sub_width(level + 1)
}

/// Height in cells of a whole tile at `level`
#[inline]
pub(crate) const fn block_height(level: usize) -> u32 {
    sub_height(level + 1)
}

/// Smallest top level whose root block covers `cols` x `rows`
pub(crate) fn top_level_for(cols: u32, rows: u32) -> usize {
    let mut level = 0;
    while block_width(level) < cols || block_height(level) < rows {
        level += 1;
    }
    level
}

/// The block covered by the tile at `level` whose top-left cell is `(col, row)`
#[inline]
pub(crate) fn block_range(level: usize, col: u32, row: u32) -> CellRange {
    CellRange::from_indices(
        col,
        row,
        col + block_width(level) - 1,
        row + block_height(level) - 1,
    )
}

/// Entry indices `lo..=hi` of a block starting at `origin` with entries of `size` cells
#[inline]
fn touched(lo: u32, hi: u32, origin: u32, size: u32) -> RangeInclusive<usize> {
    ((lo - origin) / size) as usize..=((hi - origin) / size) as usize
}

#[inline]
pub(crate) fn index(ci: usize, ri: usize) -> usize {
    ri * COLS + ci
}

/// Tile shapes, from coarsest to finest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileKind {
    /// One style for the whole block
    Simple,
    /// One style per column of entries
    Col,
    /// One style per row of entries
    Row,
    /// One style per entry
    Matrix,
    /// One sub-tile per entry
    PtrMatrix,
}

impl TileKind {
    /// The coarsest shape able to represent both `self` and `other`
    pub(crate) fn join(self, other: TileKind) -> TileKind {
        use TileKind::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Simple, x) | (x, Simple) => x,
            (PtrMatrix, _) | (_, PtrMatrix) => PtrMatrix,
            _ => Matrix,
        }
    }
}

/// A node of the tile tree
#[derive(Clone)]
pub(crate) enum Tile {
    Simple(SharedStyle),
    Col(Box<[SharedStyle; COLS]>),
    Row(Box<[SharedStyle; ROWS]>),
    Matrix(Box<[SharedStyle; TILE_CELLS]>),
    PtrMatrix(Box<[Tile; TILE_CELLS]>),
}

impl Tile {
    pub(crate) fn kind(&self) -> TileKind {
        match self {
            Tile::Simple(_) => TileKind::Simple,
            Tile::Col(_) => TileKind::Col,
            Tile::Row(_) => TileKind::Row,
            Tile::Matrix(_) => TileKind::Matrix,
            Tile::PtrMatrix(_) => TileKind::PtrMatrix,
        }
    }

    /// The style of entry `(ci, ri)` of a leaf-shaped tile
    ///
    /// # Panics
    /// On a `PtrMatrix`, whose entries are tiles.
    fn leaf_entry(&self, ci: usize, ri: usize) -> &SharedStyle {
        match self {
            Tile::Simple(style) => style,
            Tile::Col(styles) => &styles[ci],
            Tile::Row(styles) => &styles[ri],
            Tile::Matrix(styles) => &styles[index(ci, ri)],
            Tile::PtrMatrix(_) => panic!("PtrMatrix has no leaf entries"),
        }
    }

    /// The uniform style of entry `(ci, ri)`, if it has one
    pub(crate) fn entry(&self, ci: usize, ri: usize) -> Option<&SharedStyle> {
        match self {
            Tile::PtrMatrix(children) => match &children[index(ci, ri)] {
                Tile::Simple(style) => Some(style),
                _ => None,
            },
            leaf => Some(leaf.leaf_entry(ci, ri)),
        }
    }

    /// The style of a simple tile
    pub(crate) fn as_simple(&self) -> Option<&SharedStyle> {
        match self {
            Tile::Simple(style) => Some(style),
            _ => None,
        }
    }

    /// Reshape to `kind` without changing what any cell resolves to.
    ///
    /// `kind` must be at least as fine as the current shape.
    pub(crate) fn expand(&mut self, kind: TileKind, level: usize) {
        let current = self.kind();
        if current == kind {
            return;
        }
        debug_assert_eq!(current.join(kind), kind, "cannot expand {current:?} to {kind:?}");
        assert!(
            kind != TileKind::PtrMatrix || level > 0,
            "level 0 tiles cannot hold sub-tiles"
        );
        log::trace!("split level {level} tile {current:?} -> {kind:?}");

        let expanded = match kind {
            TileKind::Simple => return,
            TileKind::Col => Tile::Col(Box::new(array::from_fn(|ci| self.leaf_entry(ci, 0).clone()))),
            TileKind::Row => Tile::Row(Box::new(array::from_fn(|ri| self.leaf_entry(0, ri).clone()))),
            TileKind::Matrix => Tile::Matrix(Box::new(array::from_fn(|i| {
                self.leaf_entry(i % COLS, i / COLS).clone()
            }))),
            TileKind::PtrMatrix => Tile::PtrMatrix(Box::new(array::from_fn(|i| {
                Tile::Simple(self.leaf_entry(i % COLS, i / COLS).clone())
            }))),
        };
        *self = expanded;
    }

    /// Style of the cell `(col, row)`, relative to this tile's corner
    pub(crate) fn style_at(&self, level: usize, col: u32, row: u32) -> &SharedStyle {
        let mut tile = self;
        let (mut level, mut col, mut row) = (level, col, row);
        loop {
            let (cw, rh) = (sub_width(level), sub_height(level));
            let (ci, ri) = ((col / cw) as usize, (row / rh) as usize);
            match tile {
                Tile::PtrMatrix(children) => {
                    tile = &children[index(ci, ri)];
                    col -= ci as u32 * cw;
                    row -= ri as u32 * rh;
                    level -= 1;
                }
                leaf => return leaf.leaf_entry(ci, ri),
            }
        }
    }

    /// Call `f` for every uniform leaf span of the tile, clipped to `clip`.
    ///
    /// Spans come out row-major within each tile.
    pub(crate) fn for_each_leaf(
        &self,
        level: usize,
        col0: u32,
        row0: u32,
        clip: &CellRange,
        f: &mut dyn FnMut(CellRange, &SharedStyle),
    ) {
        let block = block_range(level, col0, row0);
        let Some(visible) = block.intersect(clip) else {
            return;
        };
        let (cw, rh) = (sub_width(level), sub_height(level));
        let cols = touched(visible.start.col, visible.end.col, col0, cw);
        let rows = touched(visible.start.row, visible.end.row, row0, rh);
        let entry = |ci: usize, ri: usize| {
            let c = col0 + ci as u32 * cw;
            let r = row0 + ri as u32 * rh;
            CellRange::from_indices(c, r, c + cw - 1, r + rh - 1)
        };

        match self {
            Tile::Simple(style) => f(visible, style),
            Tile::Col(styles) => {
                for ci in cols {
                    let mut span = entry(ci, 0);
                    span.start.row = visible.start.row;
                    span.end.row = visible.end.row;
                    if let Some(span) = span.intersect(&visible) {
                        f(span, &styles[ci]);
                    }
                }
            }
            Tile::Row(styles) => {
                for ri in rows {
                    let mut span = entry(0, ri);
                    span.start.col = visible.start.col;
                    span.end.col = visible.end.col;
                    if let Some(span) = span.intersect(&visible) {
                        f(span, &styles[ri]);
                    }
                }
            }
            Tile::Matrix(styles) => {
                for ri in rows {
                    for ci in cols.clone() {
                        if let Some(span) = entry(ci, ri).intersect(&visible) {
                            f(span, &styles[index(ci, ri)]);
                        }
                    }
                }
            }
            Tile::PtrMatrix(children) => {
                for ri in rows {
                    for ci in cols.clone() {
                        let span = entry(ci, ri);
                        children[index(ci, ri)].for_each_leaf(
                            level - 1,
                            span.start.col,
                            span.start.row,
                            clip,
                            f,
                        );
                    }
                }
            }
        }
    }

    /// Append the styles of `row`, columns `lo..=hi`, to `out` in column order
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn fill_row(
        &self,
        level: usize,
        col0: u32,
        row0: u32,
        row: u32,
        lo: u32,
        hi: u32,
        out: &mut Vec<SharedStyle>,
    ) {
        let block_end = col0 + block_width(level) - 1;
        let (lo, hi) = (lo.max(col0), hi.min(block_end));
        if lo > hi {
            return;
        }
        let (cw, rh) = (sub_width(level), sub_height(level));
        let ri = ((row - row0) / rh) as usize;
        let span_of = |ci: usize| {
            let start = (col0 + ci as u32 * cw).max(lo);
            let end = (col0 + (ci as u32 + 1) * cw - 1).min(hi);
            (end - start + 1) as usize
        };

        match self {
            Tile::Simple(style) => push_n(out, style, (hi - lo + 1) as usize),
            Tile::Row(styles) => push_n(out, &styles[ri], (hi - lo + 1) as usize),
            Tile::Col(styles) => {
                for ci in touched(lo, hi, col0, cw) {
                    push_n(out, &styles[ci], span_of(ci));
                }
            }
            Tile::Matrix(styles) => {
                for ci in touched(lo, hi, col0, cw) {
                    push_n(out, &styles[index(ci, ri)], span_of(ci));
                }
            }
            Tile::PtrMatrix(children) => {
                for ci in touched(lo, hi, col0, cw) {
                    children[index(ci, ri)].fill_row(
                        level - 1,
                        col0 + ci as u32 * cw,
                        row0 + ri as u32 * rh,
                        row,
                        lo,
                        hi,
                        out,
                    );
                }
            }
        }
    }

    /// Call `f` for every stored style reference of the tile and its sub-tiles
    pub(crate) fn for_each_style(&self, f: &mut dyn FnMut(&SharedStyle)) {
        let styles: &[SharedStyle] = match self {
            Tile::Simple(style) => std::slice::from_ref(style),
            Tile::Col(styles) => &styles[..],
            Tile::Row(styles) => &styles[..],
            Tile::Matrix(styles) => &styles[..],
            Tile::PtrMatrix(children) => {
                for child in children.iter() {
                    child.for_each_style(f);
                }
                return;
            }
        };
        for style in styles {
            f(style);
        }
    }

    pub(crate) fn collect_stats(&self, level: usize, depth: usize, stats: &mut TileStats) {
        stats.depth = stats.depth.max(depth);
        match self {
            Tile::Simple(_) => stats.simple += 1,
            Tile::Col(_) => stats.col += 1,
            Tile::Row(_) => stats.row += 1,
            Tile::Matrix(_) => stats.matrix += 1,
            Tile::PtrMatrix(children) => {
                stats.ptr_matrix += 1;
                for child in children.iter() {
                    child.collect_stats(level - 1, depth + 1, stats);
                }
            }
        }
    }
}

fn push_n(out: &mut Vec<SharedStyle>, style: &SharedStyle, n: usize) {
    out.extend(std::iter::repeat(style).take(n).cloned());
}

/// Two tiles are equal when they have the same shape and hold the very same
/// pooled styles.
impl PartialEq for Tile {
    fn eq(&self, other: &Tile) -> bool {
        fn same(a: &[SharedStyle], b: &[SharedStyle]) -> bool {
            a.iter().zip(b).all(|(x, y)| x.ptr_eq(y))
        }
        match (self, other) {
            (Tile::Simple(a), Tile::Simple(b)) => a.ptr_eq(b),
            (Tile::Col(a), Tile::Col(b)) => same(&a[..], &b[..]),
            (Tile::Row(a), Tile::Row(b)) => same(&a[..], &b[..]),
            (Tile::Matrix(a), Tile::Matrix(b)) => same(&a[..], &b[..]),
            (Tile::PtrMatrix(a), Tile::PtrMatrix(b)) => a.iter().zip(b.iter()).all(|(x, y)| x == y),
            _ => false,
        }
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tile::Simple(style) => write!(f, "Simple({:#x})", style.addr()),
            Tile::PtrMatrix(children) => f.debug_list().entries(children.iter()).finish(),
            leaf => {
                let mut addrs = Vec::new();
                leaf.for_each_style(&mut |style| addrs.push(format!("{:#x}", style.addr())));
                write!(f, "{:?}[{}]", leaf.kind(), addrs.join(" "))
            }
        }
    }
}

/// Tile counts by shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileStats {
    pub simple: usize,
    pub col: usize,
    pub row: usize,
    pub matrix: usize,
    pub ptr_matrix: usize,
    /// Deepest tile below the root (0 when the root is a leaf shape)
    pub depth: usize,
}

impl TileStats {
    /// Total number of tiles
    pub fn total(&self) -> usize {
        self.simple + self.col + self.row + self.matrix + self.ptr_matrix
    }
}

/// An opaque copy of a tile tree, comparable by shape and style identity
#[derive(Debug, Clone, PartialEq)]
pub struct TileSnapshot(pub(crate) Tile);
