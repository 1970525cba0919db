//! Region extraction
//!
//! Turns the tile tree into a short list of disjoint rectangles of uniform
//! style. The tile walk yields one span per uniform leaf, glued to the region
//! directly above or to the left when they line up exactly. A stripe merge
//! then lets each region swallow the run of equal-style regions along one of
//! its edges, in all four directions, until nothing changes.

use std::slice;
use std::vec;

use ahash::AHashMap;
use gridstyle_core::{CellRange, SharedStyle, Style};

use crate::tile::Tile;

/// Equality used to decide whether two regions may merge
pub type StyleEq<'a> = &'a dyn Fn(&Style, &Style) -> bool;

/// Predicate selecting the styles a region list should contain
pub type StyleFilter<'a> = &'a dyn Fn(&Style) -> bool;

/// A rectangle of cells sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRegion {
    pub range: CellRange,
    pub style: SharedStyle,
}

impl StyleRegion {
    pub fn new(range: CellRange, style: SharedStyle) -> Self {
        Self { range, style }
    }
}

/// Disjoint style regions, sorted by top row then left column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleList(Vec<StyleRegion>);

impl StyleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, StyleRegion> {
        self.0.iter()
    }

    pub fn push(&mut self, region: StyleRegion) {
        self.0.push(region);
    }

    pub fn regions(&self) -> &[StyleRegion] {
        &self.0
    }

    /// Style of the region holding `(col, row)`
    pub fn style_at(&self, col: u32, row: u32) -> Option<&SharedStyle> {
        self.0
            .iter()
            .find(|region| region.range.contains(col, row))
            .map(|region| &region.style)
    }

    /// Smallest range covering every region
    pub fn bounds(&self) -> Option<CellRange> {
        let mut regions = self.0.iter();
        let first = regions.next()?.range;
        Some(regions.fold(first, |acc, region| acc.union(&region.range)))
    }

    /// Copy of the list moved by `(dcol, drow)`
    pub fn translate(&self, dcol: i64, drow: i64) -> StyleList {
        self.0
            .iter()
            .map(|region| StyleRegion::new(region.range.translate(dcol, drow), region.style.clone()))
            .collect()
    }

    /// Total number of cells covered
    pub fn cell_count(&self) -> u64 {
        self.0.iter().map(|region| region.range.cell_count()).sum()
    }
}

impl FromIterator<StyleRegion> for StyleList {
    fn from_iter<I: IntoIterator<Item = StyleRegion>>(iter: I) -> Self {
        StyleList(iter.into_iter().collect())
    }
}

impl IntoIterator for StyleList {
    type Item = StyleRegion;
    type IntoIter = vec::IntoIter<StyleRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StyleList {
    type Item = &'a StyleRegion;
    type IntoIter = slice::Iter<'a, StyleRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn same_style(a: &SharedStyle, b: &SharedStyle, eq: StyleEq<'_>) -> bool {
    a.ptr_eq(b) || eq(&**a, &**b)
}

/// Extract the regions of the tree clipped to `clip`
pub(crate) fn extract(
    root: &Tile,
    level: usize,
    clip: &CellRange,
    eq: StyleEq<'_>,
    filter: Option<StyleFilter<'_>>,
) -> StyleList {
    let mut builder = RegionBuilder::new(eq);
    let mut spans = 0usize;
    root.for_each_leaf(level, 0, 0, clip, &mut |range, style| {
        spans += 1;
        if filter.map_or(true, |keep| keep(&**style)) {
            builder.add(range, style.clone());
        }
    });

    let regions = stripe_merge(builder.finish(), eq);
    log::debug!("extracted {} regions from {spans} leaf spans in {clip}", regions.len());
    regions
}

/// Glues each new span to exactly matching neighbours above and to the left
struct RegionBuilder<'a> {
    regions: Vec<Option<StyleRegion>>,
    /// `(start col, end col, row below)` to region
    by_bottom: AHashMap<(u32, u32, u32), usize>,
    /// `(start row, end row, column right of)` to region
    by_right: AHashMap<(u32, u32, u32), usize>,
    eq: StyleEq<'a>,
}

impl<'a> RegionBuilder<'a> {
    fn new(eq: StyleEq<'a>) -> Self {
        Self {
            regions: Vec::new(),
            by_bottom: AHashMap::new(),
            by_right: AHashMap::new(),
            eq,
        }
    }

    fn add(&mut self, mut range: CellRange, mut style: SharedStyle) {
        loop {
            let above = (range.start.col, range.end.col, range.start.row);
            let left = (range.start.row, range.end.row, range.start.col);
            let neighbor = [self.by_bottom.get(&above), self.by_right.get(&left)]
                .into_iter()
                .flatten()
                .copied()
                .find(|&i| {
                    self.regions[i]
                        .as_ref()
                        .map_or(false, |r| same_style(&r.style, &style, self.eq))
                });
            let Some(region) = neighbor.and_then(|i| self.take(i)) else {
                break;
            };
            range = range.union(&region.range);
            style = region.style;
        }

        let index = self.regions.len();
        self.by_bottom
            .insert((range.start.col, range.end.col, range.end.row + 1), index);
        self.by_right
            .insert((range.start.row, range.end.row, range.end.col + 1), index);
        self.regions.push(Some(StyleRegion::new(range, style)));
    }

    fn take(&mut self, index: usize) -> Option<StyleRegion> {
        let region = self.regions[index].take()?;
        let r = region.range;
        self.by_bottom.remove(&(r.start.col, r.end.col, r.end.row + 1));
        self.by_right.remove(&(r.start.row, r.end.row, r.end.col + 1));
        Some(region)
    }

    fn finish(self) -> Vec<StyleRegion> {
        self.regions.into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    c0: i64,
    r0: i64,
    c1: i64,
    r1: i64,
}

impl Rect {
    fn from_corners((a, b): (i64, i64), (c, d): (i64, i64)) -> Rect {
        Rect {
            c0: a.min(c),
            r0: b.min(d),
            c1: a.max(c),
            r1: b.max(d),
        }
    }
}

/// The four views under which "grow downwards" covers every direction
#[derive(Debug, Clone, Copy)]
enum Orientation {
    Identity,
    Transpose,
    FlipRows,
    FlipTranspose,
}

impl Orientation {
    const ALL: [Orientation; 4] = [
        Orientation::Identity,
        Orientation::Transpose,
        Orientation::FlipRows,
        Orientation::FlipTranspose,
    ];

    fn forward(self, c: i64, r: i64) -> (i64, i64) {
        match self {
            Orientation::Identity => (c, r),
            Orientation::Transpose => (r, c),
            Orientation::FlipRows => (c, -r),
            Orientation::FlipTranspose => (r, -c),
        }
    }

    fn inverse(self, x: i64, y: i64) -> (i64, i64) {
        match self {
            Orientation::Identity => (x, y),
            Orientation::Transpose => (y, x),
            Orientation::FlipRows => (x, -y),
            Orientation::FlipTranspose => (-y, x),
        }
    }

    fn to_view(self, range: &CellRange) -> Rect {
        let a = self.forward(range.start.col as i64, range.start.row as i64);
        let b = self.forward(range.end.col as i64, range.end.row as i64);
        Rect::from_corners(a, b)
    }

    fn from_view(self, rect: Rect) -> CellRange {
        let a = self.inverse(rect.c0, rect.r0);
        let b = self.inverse(rect.c1, rect.r1);
        let r = Rect::from_corners(a, b);
        CellRange::from_indices(r.c0 as u32, r.r0 as u32, r.c1 as u32, r.r1 as u32)
    }
}

struct Piece {
    rect: Rect,
    style: SharedStyle,
}

/// Merge regions along shared edges until no direction makes progress,
/// then sort by top row and left column.
fn stripe_merge(mut regions: Vec<StyleRegion>, eq: StyleEq<'_>) -> StyleList {
    loop {
        let mut merged = false;
        for orientation in Orientation::ALL {
            let (next, changed) = grow_pass(regions, orientation, eq);
            regions = next;
            merged |= changed;
        }
        if !merged {
            break;
        }
    }
    regions.sort_by_key(|region| (region.range.start.row, region.range.start.col));
    StyleList(regions)
}

/// One pass growing every region downwards in the given view.
///
/// A region absorbs the regions below it when their top edges line up along
/// its whole bottom edge. It grows down to the shortest of them; the longer
/// ones keep what is left below.
fn grow_pass(
    regions: Vec<StyleRegion>,
    orientation: Orientation,
    eq: StyleEq<'_>,
) -> (Vec<StyleRegion>, bool) {
    let mut work: Vec<Option<Piece>> = regions
        .into_iter()
        .map(|region| {
            Some(Piece {
                rect: orientation.to_view(&region.range),
                style: region.style,
            })
        })
        .collect();
    work.sort_by_key(|piece| piece.as_ref().map(|p| (p.rect.r0, p.rect.c0)));

    let mut corners: AHashMap<(i64, i64), usize> = work
        .iter()
        .enumerate()
        .filter_map(|(i, piece)| piece.as_ref().map(|p| ((p.rect.c0, p.rect.r0), i)))
        .collect();

    let mut merged = false;
    for head in 0..work.len() {
        while let Some(chain) = chain_below(&work, &corners, head, eq) {
            let Some(bottom) = chain
                .iter()
                .filter_map(|&i| work[i].as_ref())
                .map(|p| p.rect.r1)
                .min()
            else {
                break;
            };
            for &i in &chain {
                let Some(piece) = work[i].as_mut() else {
                    continue;
                };
                corners.remove(&(piece.rect.c0, piece.rect.r0));
                if piece.rect.r1 == bottom {
                    work[i] = None;
                } else {
                    piece.rect.r0 = bottom + 1;
                    corners.insert((piece.rect.c0, piece.rect.r0), i);
                }
            }
            if let Some(piece) = work[head].as_mut() {
                piece.rect.r1 = bottom;
            }
            merged = true;
        }
    }

    let regions = work
        .into_iter()
        .flatten()
        .map(|piece| StyleRegion::new(orientation.from_view(piece.rect), piece.style))
        .collect();
    (regions, merged)
}

/// Regions lined up exactly along the bottom edge of `head`, left to right
fn chain_below(
    work: &[Option<Piece>],
    corners: &AHashMap<(i64, i64), usize>,
    head: usize,
    eq: StyleEq<'_>,
) -> Option<Vec<usize>> {
    let head = work[head].as_ref()?;
    let below = head.rect.r1 + 1;
    let mut pos = head.rect.c0;
    let mut chain = Vec::new();
    while pos <= head.rect.c1 {
        let &next = corners.get(&(pos, below))?;
        let piece = work[next].as_ref()?;
        if piece.rect.c1 > head.rect.c1 || !same_style(&head.style, &piece.style, eq) {
            return None;
        }
        chain.push(next);
        pos = piece.rect.c1 + 1;
    }
    Some(chain)
}
