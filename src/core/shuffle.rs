//! Deterministic variety shuffle.
//!
//! Repeated requests should not always surface the same top records, but a
//! single request (and its retries) must stay reproducible. The shuffle is a
//! pure function of the pool order and a seed string, so the same
//! `(pool, seed)` pair always yields the same permutation.

/// Fold a seed string into a 32-bit value (FNV-1a).
pub fn seed_from(seed: &str) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for byte in seed.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Minimal xorshift32 generator, uniform in [0, 1).
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        // xorshift has a fixed point at zero
        let state = if seed == 0 { 0x9e37_79b9 } else { seed };
        Self { state }
    }

    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(seed_from(seed))
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (u32::MAX as f64 + 1.0)
    }
}

/// Fisher–Yates shuffle driven by the seeded generator.
pub fn shuffle_seeded<T>(items: &mut [T], seed: &str) {
    let mut rng = XorShift32::from_seed_str(seed);
    for i in (1..items.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64) as usize;
        items.swap(i, j);
    }
}
