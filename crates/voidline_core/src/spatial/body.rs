//! # Indexed Bodies
//!
//! A body is anything the index tracks: an id plus a bounding circle.
//! Ids are lightweight handles consisting of:
//! - An index into the owner's list (obstacle index, live-entity slot, ...)
//! - A group tag telling the owner which list the index points into

use serde::{Deserialize, Serialize};
use voidline_shared::Vec2;

/// Radius used when legacy data carries no usable size at all.
pub const DEFAULT_BODY_RADIUS: f32 = 16.0;

/// Smallest radius a body can have once inside the index.
pub const MIN_BODY_RADIUS: f32 = 0.5;

/// Unique identifier for an indexed body.
///
/// - Lower 32 bits: index in the owner's list
/// - Upper 32 bits: group tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BodyId(u64);

impl BodyId {
    /// Creates a body id from a list index and a group tag.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, group: u32) -> Self {
        Self(((group as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the id.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the group portion of the id.
    #[inline]
    #[must_use]
    pub const fn group(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Raw packed value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Bounding circle of a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center in world units.
    pub center: Vec2,
    /// Radius in world units.
    pub radius: f32,
}

impl Circle {
    /// Creates a circle.
    #[inline]
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Circle from raw coordinates.
    #[inline]
    #[must_use]
    pub const fn at(x: f32, y: f32, radius: f32) -> Self {
        Self::new(Vec2::new(x, y), radius)
    }

    /// Copy with the radius clamped to [`MIN_BODY_RADIUS`].
    ///
    /// NaN, zero and negative radii all become the minimum.
    #[inline]
    #[must_use]
    pub fn sanitized(self) -> Self {
        let radius = if self.radius >= MIN_BODY_RADIUS { self.radius } else { MIN_BODY_RADIUS };
        Self::new(self.center, radius)
    }
}

/// Loosely-shaped size record from older content files.
///
/// Older data named the size field three different ways. This is the one
/// place that fallback chain lives; everything past it uses [`Circle`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyShape {
    /// Explicit radius.
    pub radius: Option<f32>,
    /// Diameter-style size.
    pub size: Option<f32>,
    /// Short radius alias.
    pub r: Option<f32>,
}

impl LegacyShape {
    /// Resolves the radius: `radius`, then `size / 2`, then `r`, then
    /// [`DEFAULT_BODY_RADIUS`]. Non-positive values are skipped.
    #[must_use]
    pub fn resolve_radius(&self) -> f32 {
        let usable = |v: Option<f32>| v.filter(|v| v.is_finite() && *v > 0.0);
        usable(self.radius)
            .or_else(|| usable(self.size.map(|s| s * 0.5)))
            .or_else(|| usable(self.r))
            .unwrap_or(DEFAULT_BODY_RADIUS)
    }

    /// Converts into a circle centered at `center`.
    #[must_use]
    pub fn to_circle(&self, center: Vec2) -> Circle {
        Circle::new(center, self.resolve_radius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_id_roundtrip() {
        let id = BodyId::new(12345, 67890);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.group(), 67890);
    }

    #[test]
    fn test_sanitized_radius() {
        assert_eq!(Circle::at(0.0, 0.0, -3.0).sanitized().radius, MIN_BODY_RADIUS);
        assert_eq!(Circle::at(0.0, 0.0, f32::NAN).sanitized().radius, MIN_BODY_RADIUS);
        assert_eq!(Circle::at(0.0, 0.0, 12.0).sanitized().radius, 12.0);
    }

    #[test]
    fn test_legacy_radius_fallback_chain() {
        let explicit = LegacyShape { radius: Some(10.0), size: Some(100.0), r: Some(3.0) };
        assert_eq!(explicit.resolve_radius(), 10.0);

        let sized = LegacyShape { radius: Some(0.0), size: Some(40.0), r: Some(3.0) };
        assert_eq!(sized.resolve_radius(), 20.0);

        let short = LegacyShape { radius: None, size: None, r: Some(3.0) };
        assert_eq!(short.resolve_radius(), 3.0);

        assert_eq!(LegacyShape::default().resolve_radius(), DEFAULT_BODY_RADIUS);
    }
}
