//! Cell address and range types
//!
//! Coordinates are zero-based and ordered `(col, row)` everywhere in the
//! style engine, matching the way tiles are addressed.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell position (e.g., "A1", "$B$2")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u32,
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
}

impl CellAddress {
    /// Create a new cell address
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// Absolute markers (`$`) are accepted and ignored.
    ///
    /// # Examples
    /// ```
    /// use gridstyle_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.col, addr.row), (0, 0));
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!((addr.col, addr.row), (1, 1));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidAddress(format!("no column letters in '{s}'")));
        }

        let col = Self::letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{s}'")));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{s}'")))?;

        // Rows are 1-based in A1 notation, 0-based internally
        if row == 0 {
            return Err(Error::InvalidAddress(format!("row number must be >= 1 in '{s}'")));
        }

        let row = row - 1;

        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self { col, row })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("invalid column letter '{c}'")));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
            if col > MAX_COLS as u64 {
                return Err(Error::ColumnOutOfBounds(
                    col.min(u32::MAX as u64) as u32 - 1,
                    MAX_COLS - 1,
                ));
            }
        }

        Ok(col as u32 - 1)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An inclusive rectangle of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range, normalizing the corners
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self {
            start: CellAddress::new(start.col.min(end.col), start.row.min(end.row)),
            end: CellAddress::new(start.col.max(end.col), start.row.max(end.row)),
        }
    }

    /// Create a range from column/row indices
    pub fn from_indices(start_col: u32, start_row: u32, end_col: u32, end_row: u32) -> Self {
        Self::new(
            CellAddress::new(start_col, start_row),
            CellAddress::new(end_col, end_row),
        )
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// The range covering a whole sheet of the given size
    pub fn sheet(cols: u32, rows: u32) -> Self {
        assert!(cols > 0 && rows > 0, "empty sheet {cols}x{rows}");
        Self::from_indices(0, 0, cols - 1, rows - 1)
    }

    /// Parse a range from A1:B10 notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(colon_pos) = s.find(':') {
            let start = CellAddress::parse(&s[..colon_pos])
                .map_err(|e| Error::InvalidRange(format!("'{s}': {e}")))?;
            let end = CellAddress::parse(&s[colon_pos + 1..])
                .map_err(|e| Error::InvalidRange(format!("'{s}': {e}")))?;
            Ok(Self::new(start, end))
        } else {
            let addr = CellAddress::parse(s)?;
            Ok(Self::single(addr))
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, col: u32, row: u32) -> bool {
        row >= self.start.row && row <= self.end.row && col >= self.start.col && col <= self.end.col
    }

    /// Check if another range lies entirely inside this one
    pub fn contains_range(&self, other: &CellRange) -> bool {
        self.contains(other.start.col, other.start.row) && self.contains(other.end.col, other.end.row)
    }

    /// Number of columns in the range
    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Number of rows in the range
    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Whether the range is exactly one cell
    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && self.end.row >= other.start.row
            && self.start.col <= other.end.col
            && self.end.col >= other.start.col
    }

    /// Get the intersection of two ranges, if any
    pub fn intersect(&self, other: &CellRange) -> Option<CellRange> {
        if !self.overlaps(other) {
            return None;
        }

        Some(CellRange::from_indices(
            self.start.col.max(other.start.col),
            self.start.row.max(other.start.row),
            self.end.col.min(other.end.col),
            self.end.row.min(other.end.row),
        ))
    }

    /// Smallest range containing both ranges
    pub fn union(&self, other: &CellRange) -> CellRange {
        CellRange::from_indices(
            self.start.col.min(other.start.col),
            self.start.row.min(other.start.row),
            self.end.col.max(other.end.col),
            self.end.row.max(other.end.row),
        )
    }

    /// Move the range by a (possibly negative) offset
    ///
    /// # Panics
    /// If the result would leave the non-negative quadrant.
    pub fn translate(&self, dcol: i64, drow: i64) -> CellRange {
        let shift = |v: u32, d: i64| -> u32 {
            let r = v as i64 + d;
            assert!(r >= 0 && r <= u32::MAX as i64, "translate out of range");
            r as u32
        };
        CellRange::from_indices(
            shift(self.start.col, dcol),
            shift(self.start.row, drow),
            shift(self.end.col, dcol),
            shift(self.end.row, drow),
        )
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_col: self.start.col,
            current_row: self.start.row,
            remaining: self.cell_count(),
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_col: u32,
    current_row: u32,
    remaining: u64,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let addr = CellAddress::new(self.current_col, self.current_row);

        if self.current_col == self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        } else {
            self.current_col += 1;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(702), "AAA");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("AB").unwrap(), 27);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 26);
        assert!(CellAddress::letters_to_column("XFE").is_err());
        assert!(CellAddress::letters_to_column("ZZZZZZZZ").is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("B2").unwrap();
        assert_eq!(addr, CellAddress::new(1, 1));

        let addr = CellAddress::parse("$C$10").unwrap();
        assert_eq!(addr, CellAddress::new(2, 9));

        let addr = CellAddress::parse("XFD1048576").unwrap();
        assert_eq!(addr, CellAddress::new(16383, 1048575));
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A1048577").is_err());
    }

    #[test]
    fn test_range_parse_and_normalize() {
        let range = CellRange::parse("D4:B2").unwrap();
        assert_eq!(range, CellRange::from_indices(1, 1, 3, 3));
        assert_eq!(range.to_string(), "B2:D4");
        assert_eq!(CellRange::parse("C3").unwrap().to_string(), "C3");
        assert!(CellRange::parse("A1:").is_err());
    }

    #[test]
    fn test_range_geometry() {
        let a = CellRange::from_indices(0, 0, 9, 4);
        let b = CellRange::from_indices(5, 2, 12, 8);
        assert_eq!(a.width(), 10);
        assert_eq!(a.height(), 5);
        assert_eq!(a.cell_count(), 50);
        assert_eq!(a.intersect(&b), Some(CellRange::from_indices(5, 2, 9, 4)));
        assert_eq!(a.union(&b), CellRange::from_indices(0, 0, 12, 8));
        assert_eq!(a.translate(2, 3), CellRange::from_indices(2, 3, 11, 7));
        assert!(a.contains_range(&CellRange::from_indices(1, 1, 2, 2)));
        assert!(a
            .intersect(&CellRange::from_indices(20, 20, 21, 21))
            .is_none());
    }

    #[test]
    fn test_cell_range_iterator() {
        let cells: Vec<_> = CellRange::parse("A1:B2").unwrap().cells().collect();
        assert_eq!(
            cells,
            vec![
                CellAddress::new(0, 0),
                CellAddress::new(1, 0),
                CellAddress::new(0, 1),
                CellAddress::new(1, 1),
            ]
        );
    }
}
