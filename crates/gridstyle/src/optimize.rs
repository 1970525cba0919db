//! Tile compaction
//!
//! After a write, every touched tile is offered a chance to collapse back to
//! a coarser shape. Only the tile's own entries are inspected: sub-tiles were
//! already compacted on the way back up, so a single bottom-up pass suffices.

use std::array;

use gridstyle_core::SharedStyle;

use crate::tile::{index, Tile, TileKind, TILE_CELLS, TILE_SIZE_COL, TILE_SIZE_ROW};

const COLS: usize = TILE_SIZE_COL as usize;
const ROWS: usize = TILE_SIZE_ROW as usize;

/// Collapse `tile` as far as its entries allow. Returns whether it changed.
pub(crate) fn optimize_tile(tile: &mut Tile, level: usize) -> bool {
    let before = tile.kind();

    if let Tile::PtrMatrix(children) = tile {
        let simple: Option<Vec<SharedStyle>> =
            children.iter().map(|c| c.as_simple().cloned()).collect();
        let Some(styles) = simple else {
            return false;
        };
        let Ok(styles) = <Box<[SharedStyle; TILE_CELLS]>>::try_from(styles.into_boxed_slice()) else {
            return false;
        };
        *tile = Tile::Matrix(styles);
    }

    let collapsed = match tile {
        Tile::Matrix(m) => {
            if m.iter().all(|s| s.ptr_eq(&m[0])) {
                Some(Tile::Simple(m[0].clone()))
            } else if (0..TILE_CELLS).all(|i| m[i].ptr_eq(&m[i % COLS])) {
                Some(Tile::Col(Box::new(array::from_fn(|ci| m[ci].clone()))))
            } else if (0..TILE_CELLS).all(|i| m[i].ptr_eq(&m[(i / COLS) * COLS])) {
                Some(Tile::Row(Box::new(array::from_fn(|ri| m[index(0, ri)].clone()))))
            } else {
                None
            }
        }
        Tile::Col(styles) if styles.iter().all(|s| s.ptr_eq(&styles[0])) => {
            Some(Tile::Simple(styles[0].clone()))
        }
        Tile::Row(styles) if styles.iter().all(|s| s.ptr_eq(&styles[0])) => {
            Some(Tile::Simple(styles[0].clone()))
        }
        _ => None,
    };
    if let Some(collapsed) = collapsed {
        *tile = collapsed;
    }

    let after = tile.kind();
    if after != before {
        log::trace!("collapse level {level} tile {before:?} -> {after:?}");
    }
    after != before
}

/// Entries of a tile as seen from outside, `None` for non-uniform sub-tiles
pub(crate) fn entries(tile: &Tile) -> Vec<Option<SharedStyle>> {
    (0..ROWS)
        .flat_map(|ri| (0..COLS).map(move |ci| (ci, ri)))
        .map(|(ci, ri)| tile.entry(ci, ri).cloned())
        .collect()
}

/// Panic unless `tile` resolves every uniform entry of `before` the same way
pub(crate) fn verify(before: &[Option<SharedStyle>], tile: &Tile, level: usize) {
    if before.iter().any(Option::is_none) {
        assert_eq!(
            tile.kind(),
            TileKind::PtrMatrix,
            "level {level} tile with non-uniform sub-tiles was collapsed"
        );
        return;
    }
    for (i, expected) in before.iter().enumerate() {
        let (ci, ri) = (i % COLS, i / COLS);
        let actual = tile.entry(ci, ri);
        let same = matches!((expected, actual), (Some(e), Some(a)) if e.ptr_eq(a));
        assert!(
            same,
            "optimizer changed entry ({ci}, {ri}) of a level {level} {:?} tile",
            tile.kind()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstyle_core::{SheetLink, Style, StylePool};

    fn two() -> (SharedStyle, SharedStyle) {
        let mut pool = StylePool::new();
        let link = SheetLink::default();
        (
            pool.intern(Style::new().with_indent(1), &link),
            pool.intern(Style::new().with_indent(2), &link),
        )
    }

    fn matrix(f: impl Fn(usize, usize) -> SharedStyle) -> Tile {
        Tile::Matrix(Box::new(array::from_fn(|i| f(i % COLS, i / COLS))))
    }

    #[test]
    fn test_uniform_matrix_becomes_simple() {
        let (a, _) = two();
        let mut tile = matrix(|_, _| a.clone());
        assert!(optimize_tile(&mut tile, 0));
        assert_eq!(tile, Tile::Simple(a));
    }

    #[test]
    fn test_matrix_to_col_and_row() {
        let (a, b) = two();
        let mut cols = matrix(|ci, _| if ci < 3 { a.clone() } else { b.clone() });
        assert!(optimize_tile(&mut cols, 0));
        assert_eq!(cols.kind(), TileKind::Col);

        let mut rows = matrix(|_, ri| if ri == 7 { a.clone() } else { b.clone() });
        assert!(optimize_tile(&mut rows, 0));
        assert_eq!(rows.kind(), TileKind::Row);

        let mut mixed = matrix(|ci, ri| if ci == ri { a.clone() } else { b.clone() });
        assert!(!optimize_tile(&mut mixed, 0));
        assert_eq!(mixed.kind(), TileKind::Matrix);
    }

    #[test]
    fn test_ptr_matrix_of_simples_collapses_fully() {
        let (a, _) = two();
        let mut tile = Tile::Simple(a.clone());
        tile.expand(TileKind::PtrMatrix, 1);
        let before = entries(&tile);
        assert!(optimize_tile(&mut tile, 1));
        assert_eq!(tile, Tile::Simple(a));
        verify(&before, &tile, 1);
    }

    #[test]
    fn test_ptr_matrix_with_deep_child_stays() {
        let (a, b) = two();
        let mut tile = Tile::Simple(a);
        tile.expand(TileKind::PtrMatrix, 2);
        if let Tile::PtrMatrix(children) = &mut tile {
            children[5].expand(TileKind::PtrMatrix, 1);
            if let Tile::PtrMatrix(grand) = &mut children[5] {
                grand[0] = Tile::Simple(b);
            }
        }
        assert!(!optimize_tile(&mut tile, 2));
        assert_eq!(tile.kind(), TileKind::PtrMatrix);
    }

    #[test]
    #[should_panic(expected = "optimizer changed entry")]
    fn test_verify_catches_mismatch() {
        let (a, b) = two();
        let before = entries(&Tile::Simple(a));
        verify(&before, &Tile::Simple(b), 0);
    }
}
