//! Cell coordinates and keys for the uniform grid.

/// Packed integer key of one grid cell.
///
/// Upper 32 bits hold the column, lower 32 bits the row (both as raw
/// two's-complement bits), so every `(cx, cy)` pair maps to a distinct key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u64);

impl CellKey {
    /// Packs cell coordinates into a key.
    #[inline]
    #[must_use]
    pub const fn from_cell(cx: i32, cy: i32) -> Self {
        Self(((cx as u32 as u64) << 32) | (cy as u32 as u64))
    }

    /// Column of this cell.
    #[inline]
    #[must_use]
    pub const fn cx(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    /// Row of this cell.
    #[inline]
    #[must_use]
    pub const fn cy(self) -> i32 {
        self.0 as u32 as i32
    }
}

/// Inclusive rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    /// Lowest column.
    pub min_x: i32,
    /// Lowest row.
    pub min_y: i32,
    /// Highest column.
    pub max_x: i32,
    /// Highest row.
    pub max_y: i32,
}

impl CellRange {
    /// Cells overlapped by the box `[x - r, x + r] x [y - r, y + r]`.
    ///
    /// Float-to-int casts saturate, so infinities stay bounded and NaN maps
    /// to cell 0.
    #[inline]
    #[must_use]
    pub fn around(x: f32, y: f32, r: f32, inv_cell_size: f32) -> Self {
        Self {
            min_x: ((x - r) * inv_cell_size).floor() as i32,
            min_y: ((y - r) * inv_cell_size).floor() as i32,
            max_x: ((x + r) * inv_cell_size).floor() as i32,
            max_y: ((y + r) * inv_cell_size).floor() as i32,
        }
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        let w = (i64::from(self.max_x) - i64::from(self.min_x) + 1).max(0) as u64;
        let h = (i64::from(self.max_y) - i64::from(self.min_y) + 1).max(0) as u64;
        w.saturating_mul(h)
    }

    /// Returns true if `key` lies inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, key: CellKey) -> bool {
        let (cx, cy) = (key.cx(), key.cy());
        cx >= self.min_x && cx <= self.max_x && cy >= self.min_y && cy <= self.max_y
    }

    /// Iterates every key in the range, row by row.
    pub fn keys(self) -> impl Iterator<Item = CellKey> {
        (self.min_y..=self.max_y)
            .flat_map(move |cy| (self.min_x..=self.max_x).map(move |cx| CellKey::from_cell(cx, cy)))
    }
}
