//! # Uniform Grid Index
//!
//! Buckets bodies by the square cells their bounding circle overlaps.
//! Lookups only touch the cells around the query box, so proximity checks
//! stay near O(1) per query instead of O(n) scans.
//!
//! ## Lifecycle
//!
//! The owner rebuilds the whole index once per simulation tick from live
//! positions, then issues read-only queries. Writes take `&mut self` and
//! reads take `&self`, so a query can never observe a half-built grid.

use std::collections::HashMap;

use tracing::trace;

use super::body::{BodyId, Circle};
use super::cell::{CellKey, CellRange};
use super::collision::check_collision;

/// Cell edge length used by [`SpatialIndex::default`].
pub const DEFAULT_CELL_SIZE: f32 = 128.0;

/// Smallest accepted cell edge length.
pub const MIN_CELL_SIZE: f32 = 1.0;

/// Bodies covering more cells than this are kept on a side list and
/// offered as candidates to every query.
pub const MAX_CELLS_PER_BODY: u64 = 4096;

/// Where a body is registered.
#[derive(Debug)]
struct Registration {
    circle: Circle,
    cells: Vec<CellKey>,
    oversized: bool,
}

/// Uniform-grid spatial index over circular bodies.
///
/// # Example
///
/// ```rust,ignore
/// let mut index = SpatialIndex::new(128.0);
/// index.insert(BodyId::new(0, 0), Circle::at(10.0, 10.0, 8.0));
/// let hits = index.query_circle(0.0, 0.0, 20.0);
/// ```
#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f32,
    inv_cell_size: f32,
    /// Occupied cells only. Empty buckets are returned to `spare`.
    cells: HashMap<CellKey, Vec<BodyId>>,
    bodies: HashMap<BodyId, Registration>,
    oversized: Vec<BodyId>,
    /// Recycled bucket buffers.
    spare: Vec<Vec<BodyId>>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialIndex {
    /// Creates an empty index.
    ///
    /// Non-positive, NaN or infinite cell sizes fall back to
    /// [`MIN_CELL_SIZE`].
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size >= MIN_CELL_SIZE {
            cell_size
        } else {
            MIN_CELL_SIZE
        };
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            bodies: HashMap::new(),
            oversized: Vec::new(),
            spare: Vec::new(),
        }
    }

    /// Cell edge length in world units.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of registered bodies.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if no body is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of non-empty cells.
    #[inline]
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if `id` is registered.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Stored (sanitized) circle of a body.
    #[must_use]
    pub fn circle(&self, id: BodyId) -> Option<Circle> {
        self.bodies.get(&id).map(|reg| reg.circle)
    }

    /// Drops every body. Bucket buffers are kept for reuse.
    pub fn clear(&mut self) {
        for (_, mut bucket) in self.cells.drain() {
            bucket.clear();
            self.spare.push(bucket);
        }
        self.bodies.clear();
        self.oversized.clear();
    }

    /// Registers a body in every cell its circle overlaps.
    ///
    /// An id that is already present is replaced. Degenerate radii are
    /// clamped to the minimum body radius.
    pub fn insert(&mut self, id: BodyId, circle: Circle) {
        if self.bodies.contains_key(&id) {
            self.remove(id);
        }

        let circle = circle.sanitized();
        let range = CellRange::around(circle.center.x, circle.center.y, circle.radius, self.inv_cell_size);
        let count = range.cell_count();

        if count > MAX_CELLS_PER_BODY {
            trace!(index = id.index(), group = id.group(), cells = count, "oversized body kept off-grid");
            self.oversized.push(id);
            self.bodies.insert(id, Registration { circle, cells: Vec::new(), oversized: true });
            return;
        }

        let mut cells = Vec::with_capacity(count as usize);
        for key in range.keys() {
            let bucket = self
                .cells
                .entry(key)
                .or_insert_with(|| self.spare.pop().unwrap_or_default());
            bucket.push(id);
            cells.push(key);
        }
        self.bodies.insert(id, Registration { circle, cells, oversized: false });
    }

    /// Removes a body from every cell it was registered in.
    ///
    /// Returns false (and changes nothing) if the id was never inserted.
    pub fn remove(&mut self, id: BodyId) -> bool {
        let Some(reg) = self.bodies.remove(&id) else {
            return false;
        };

        if reg.oversized {
            self.oversized.retain(|other| *other != id);
            return true;
        }

        for key in reg.cells {
            let emptied = match self.cells.get_mut(&key) {
                Some(bucket) => {
                    if let Some(pos) = bucket.iter().position(|other| *other == id) {
                        bucket.swap_remove(pos);
                    }
                    bucket.is_empty()
                }
                None => false,
            };
            if emptied {
                if let Some(bucket) = self.cells.remove(&key) {
                    self.spare.push(bucket);
                }
            }
        }
        true
    }

    /// Moves a body: `remove` followed by `insert`.
    ///
    /// Returns true if the body was registered before the call.
    pub fn update(&mut self, id: BodyId, circle: Circle) -> bool {
        let existed = self.remove(id);
        self.insert(id, circle);
        existed
    }

    /// Clears the index and inserts every body from `bodies`.
    pub fn rebuild<I>(&mut self, bodies: I)
    where
        I: IntoIterator<Item = (BodyId, Circle)>,
    {
        self.clear();
        for (id, circle) in bodies {
            self.insert(id, circle);
        }
    }

    /// Broad phase: bodies registered in any cell the query box touches.
    ///
    /// Sorted by id, without duplicates. May contain false positives.
    #[must_use]
    pub fn query(&self, x: f32, y: f32, r: f32) -> Vec<BodyId> {
        let mut out = Vec::new();
        self.query_into(x, y, r, &mut out);
        out
    }

    /// [`query`](Self::query) into a caller-owned buffer. The buffer is
    /// cleared first.
    pub fn query_into(&self, x: f32, y: f32, r: f32, out: &mut Vec<BodyId>) {
        out.clear();
        let reach = query_reach(x, y, r);
        let range = CellRange::around(x, y, reach, self.inv_cell_size);

        if range.cell_count() > self.cells.len() as u64 {
            for (key, bucket) in &self.cells {
                if range.contains(*key) {
                    out.extend_from_slice(bucket);
                }
            }
        } else {
            for key in range.keys() {
                if let Some(bucket) = self.cells.get(&key) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.extend_from_slice(&self.oversized);

        out.sort_unstable();
        out.dedup();
    }

    /// Broad phase plus exact filter: bodies with `dist <= r + radius`.
    #[must_use]
    pub fn query_circle(&self, x: f32, y: f32, r: f32) -> Vec<BodyId> {
        let mut out = Vec::new();
        self.query_circle_into(x, y, r, &mut out);
        out
    }

    /// [`query_circle`](Self::query_circle) into a caller-owned buffer.
    pub fn query_circle_into(&self, x: f32, y: f32, r: f32, out: &mut Vec<BodyId>) {
        self.query_into(x, y, r, out);
        let probe = Circle::at(x, y, non_negative(r));
        out.retain(|id| {
            self.bodies
                .get(id)
                .is_some_and(|reg| check_collision(probe, reg.circle))
        });
    }

    /// Every pair of overlapping bodies, `(lower id, higher id)`, sorted.
    #[must_use]
    pub fn collision_pairs(&self) -> Vec<(BodyId, BodyId)> {
        let mut pairs = Vec::new();

        for bucket in self.cells.values() {
            for (i, &a) in bucket.iter().enumerate() {
                for &b in &bucket[i + 1..] {
                    self.push_if_touching(a, b, &mut pairs);
                }
            }
        }

        for &big in &self.oversized {
            for &other in self.bodies.keys() {
                if other != big {
                    self.push_if_touching(big, other, &mut pairs);
                }
            }
        }

        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    fn push_if_touching(&self, a: BodyId, b: BodyId, pairs: &mut Vec<(BodyId, BodyId)>) {
        let (Some(ra), Some(rb)) = (self.bodies.get(&a), self.bodies.get(&b)) else {
            return;
        };
        if check_collision(ra.circle, rb.circle) {
            pairs.push(if a < b { (a, b) } else { (b, a) });
        }
    }
}

#[inline]
fn non_negative(r: f32) -> f32 {
    if r > 0.0 { r } else { 0.0 }
}

/// Query half-extent padded so float rounding in the cell math can never
/// drop a body the exact test would accept.
#[inline]
fn query_reach(x: f32, y: f32, r: f32) -> f32 {
    let r = non_negative(r);
    r + (r + x.abs() + y.abs()) * 1.0e-6 + 1.0e-3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: u32) -> BodyId {
        BodyId::new(i, 0)
    }

    #[test]
    fn test_insert_and_query() {
        let mut index = SpatialIndex::new(64.0);
        index.insert(id(1), Circle::at(10.0, 10.0, 5.0));
        index.insert(id(2), Circle::at(500.0, 500.0, 5.0));

        assert_eq!(index.query_circle(0.0, 0.0, 20.0), vec![id(1)]);
        assert_eq!(index.query_circle(500.0, 490.0, 6.0), vec![id(2)]);
        assert!(index.query_circle(250.0, 250.0, 10.0).is_empty());
    }

    #[test]
    fn test_multi_cell_body_reported_once() {
        let mut index = SpatialIndex::new(32.0);
        index.insert(id(7), Circle::at(0.0, 0.0, 100.0));
        assert!(index.occupied_cells() > 4);
        assert_eq!(index.query(0.0, 0.0, 200.0), vec![id(7)]);
    }

    #[test]
    fn test_reinsert_replaces() {
        let mut index = SpatialIndex::new(64.0);
        index.insert(id(1), Circle::at(0.0, 0.0, 4.0));
        index.insert(id(1), Circle::at(1000.0, 1000.0, 4.0));

        assert_eq!(index.len(), 1);
        assert_eq!(index.occupied_cells(), 1);
        assert!(index.query_circle(0.0, 0.0, 10.0).is_empty());
        assert_eq!(index.query_circle(1000.0, 1000.0, 1.0), vec![id(1)]);
    }

    #[test]
    fn test_remove_releases_cells() {
        let mut index = SpatialIndex::new(64.0);
        index.insert(id(1), Circle::at(0.0, 0.0, 100.0));
        assert!(index.remove(id(1)));
        assert_eq!(index.occupied_cells(), 0);
        assert!(index.is_empty());
        assert!(!index.remove(id(1)));
    }

    #[test]
    fn test_degenerate_radius_clamped() {
        let mut index = SpatialIndex::default();
        index.insert(id(3), Circle::at(5.0, 5.0, f32::NAN));
        let stored = index.circle(id(3)).map(|c| c.radius);
        assert_eq!(stored, Some(crate::spatial::MIN_BODY_RADIUS));
        assert_eq!(index.query_circle(5.0, 5.0, 0.0), vec![id(3)]);
    }

    #[test]
    fn test_bad_cell_size_clamped() {
        assert_eq!(SpatialIndex::new(0.0).cell_size(), MIN_CELL_SIZE);
        assert_eq!(SpatialIndex::new(-5.0).cell_size(), MIN_CELL_SIZE);
        assert_eq!(SpatialIndex::new(f32::NAN).cell_size(), MIN_CELL_SIZE);
    }

    #[test]
    fn test_oversized_body_still_found() {
        let mut index = SpatialIndex::new(1.0);
        index.insert(id(9), Circle::at(0.0, 0.0, 1000.0));
        index.insert(id(1), Circle::at(500.25, 0.25, 0.5));

        assert_eq!(index.occupied_cells(), 4);
        assert_eq!(index.query_circle(600.0, 0.0, 1.0), vec![id(9)]);
        assert_eq!(index.collision_pairs(), vec![(id(1), id(9))]);
    }

    #[test]
    fn test_huge_query_scans_occupied_cells() {
        let mut index = SpatialIndex::new(16.0);
        for i in 0..10 {
            index.insert(id(i), Circle::at(i as f32 * 40.0, 0.0, 2.0));
        }
        let all = index.query_circle(0.0, 0.0, 1.0e9);
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn test_collision_pairs_sorted_unique() {
        let mut index = SpatialIndex::new(8.0);
        index.insert(id(2), Circle::at(0.0, 0.0, 10.0));
        index.insert(id(1), Circle::at(5.0, 0.0, 10.0));
        index.insert(id(3), Circle::at(100.0, 0.0, 1.0));

        assert_eq!(index.collision_pairs(), vec![(id(1), id(2))]);
    }

    #[test]
    fn test_clear_then_rebuild() {
        let mut index = SpatialIndex::new(64.0);
        index.rebuild((0..5).map(|i| (id(i), Circle::at(i as f32 * 10.0, 0.0, 2.0))));
        assert_eq!(index.len(), 5);

        index.rebuild(std::iter::once((id(42), Circle::at(0.0, 0.0, 2.0))));
        assert_eq!(index.len(), 1);
        assert_eq!(index.query(0.0, 0.0, 100.0), vec![id(42)]);
    }
}
