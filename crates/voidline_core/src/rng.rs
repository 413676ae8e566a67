//! # Deterministic Randomness
//!
//! Every random decision a zone makes flows from one [`ZoneSeed`].
//!
//! ## Determinism Guarantee
//!
//! Given the same seed, [`ZoneRng`] produces **exactly** the same sequence
//! on any platform, any time. Output is a pure function of the seed and the
//! number of draws taken; nothing here reads the clock or the OS entropy
//! pool.

use serde::{Deserialize, Serialize};

/// Replacement state for a zero seed (xorshift has a fixed point at 0).
const ZERO_SEED_STATE: u32 = 0x6D2B_79F5;

/// Seed from which a zone (or a whole act) is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneSeed(u32);

impl ZoneSeed {
    /// Creates a new seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose.
    ///
    /// Different purposes give independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u32) -> Self {
        Self(mix32(self.0 ^ mix32(purpose.wrapping_add(0x9E37_79B9))))
    }

    /// Seed of zone `zone_index` within the act seeded by `act_seed`.
    ///
    /// This is the fixed mix every caller uses, so a session seed plus a
    /// zone index always names the same zone.
    #[inline]
    #[must_use]
    pub const fn for_zone(act_seed: Self, zone_index: u32) -> Self {
        Self(mix32(act_seed.0.wrapping_mul(0x85EB_CA6B) ^ zone_index.wrapping_mul(0xC2B2_AE35)))
    }

    /// Hashes a human-readable label (e.g. a daily-run code) into a seed.
    ///
    /// FNV-1a over the UTF-8 bytes. Meant for session start only.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let mut hash: u32 = 0x811C_9DC5;
        for byte in label.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }
        Self(hash)
    }
}

impl Default for ZoneSeed {
    fn default() -> Self {
        Self(0xC0FF_EE11)
    }
}

impl From<u32> for ZoneSeed {
    fn from(seed: u32) -> Self {
        Self(seed)
    }
}

/// Final avalanche of murmur3.
#[inline]
const fn mix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}

/// A value paired with a selection weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weighted<T> {
    /// The candidate value.
    pub value: T,
    /// Relative weight. Non-positive or NaN weights never win.
    pub weight: f32,
}

impl<T> Weighted<T> {
    /// Creates a weighted entry.
    #[must_use]
    pub const fn new(value: T, weight: f32) -> Self {
        Self { value, weight }
    }

    #[inline]
    fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            f64::from(self.weight)
        } else {
            0.0
        }
    }
}

/// Deterministic xorshift32 generator owned by exactly one generation call.
///
/// # Example
///
/// ```rust
/// use voidline_core::rng::{ZoneRng, ZoneSeed};
///
/// let mut a = ZoneRng::new(ZoneSeed::new(12345));
/// let mut b = ZoneRng::new(ZoneSeed::new(12345));
/// assert_eq!(a.int(1, 6), b.int(1, 6));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneRng {
    seed: ZoneSeed,
    state: u32,
    draws: u64,
}

impl ZoneRng {
    /// Creates a generator from a seed.
    #[must_use]
    pub const fn new(seed: ZoneSeed) -> Self {
        let scrambled = mix32(seed.0);
        Self {
            seed,
            state: if scrambled == 0 { ZERO_SEED_STATE } else { scrambled },
            draws: 0,
        }
    }

    /// Creates a generator from a human-readable label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::new(ZoneSeed::from_label(label))
    }

    /// The seed this generator was created from.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> ZoneSeed {
        self.seed
    }

    /// Number of raw draws taken so far.
    #[inline]
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Independent child generator for one generation phase.
    ///
    /// The child depends only on the root seed and `purpose`, never on how
    /// many draws the parent has taken.
    #[must_use]
    pub const fn fork(&self, purpose: u32) -> Self {
        Self::new(self.seed.derive(purpose))
    }

    /// Raw 32-bit output.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.draws += 1;
        x
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform float in `[min, max)`. Reversed bounds are swapped.
    ///
    /// Degenerate or non-finite bounds return the lower bound (or 0).
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        let t = self.next_unit();
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if !lo.is_finite() || !hi.is_finite() {
            return if lo.is_finite() { lo } else { 0.0 };
        }
        if hi <= lo {
            return lo;
        }
        let value = (f64::from(lo) + t * (f64::from(hi) - f64::from(lo))) as f32;
        if value >= hi {
            lo
        } else {
            value
        }
    }

    /// Uniform integer in `[min, max]` (inclusive). Reversed bounds are swapped.
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (i64::from(hi) - i64::from(lo) + 1) as u64;
        let offset = (u64::from(self.next_u32()) * span) >> 32;
        (i64::from(lo) + offset as i64) as i32
    }

    /// Uniform index in `[0, len)`. Returns 0 for an empty range.
    pub fn index(&mut self, len: usize) -> usize {
        let roll = u64::from(self.next_u32());
        if len == 0 {
            return 0;
        }
        ((roll * len as u64) >> 32) as usize
    }

    /// Returns true with probability `probability`, clamped to `[0, 1]`.
    /// NaN never hits. Always takes one draw.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.next_unit() < f64::from(probability.clamp(0.0, 1.0))
    }

    /// Uniform pick from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.index(items.len()))
        }
    }

    /// Weighted pick. Falls back to a uniform pick when no weight is positive.
    pub fn pick_weighted<'a, T>(&mut self, items: &'a [Weighted<T>]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let roll = self.next_unit();
        let total: f64 = items.iter().map(Weighted::effective_weight).sum();
        if total <= 0.0 {
            let idx = ((roll * items.len() as f64) as usize).min(items.len() - 1);
            return Some(&items[idx].value);
        }

        let mut target = roll * total;
        let mut last_live = None;
        for item in items {
            let w = item.effective_weight();
            if w <= 0.0 {
                continue;
            }
            if target < w {
                return Some(&item.value);
            }
            target -= w;
            last_live = Some(&item.value);
        }
        // Floating-point residue lands on the last live entry.
        last_live
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

impl rand::RngCore for ZoneRng {
    fn next_u32(&mut self) -> u32 {
        ZoneRng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(ZoneRng::next_u32(self));
        let low = u64::from(ZoneRng::next_u32(self));
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = ZoneRng::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl rand::SeedableRng for ZoneRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(ZoneSeed::new(u32::from_le_bytes(seed)))
    }
}
