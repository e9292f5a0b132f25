//! RNG module - seeded tile rolls
//!
//! Every tile on the board, visible or reserve, comes from [`SimpleRng`]. Keeping
//! the generator in-crate and explicitly seeded makes whole games reproducible:
//! the same seed and the same swaps give the same grids and the same events.

use crate::types::TileType;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Roll a tile type uniformly in `[1, variations]`
    pub fn next_tile(&mut self, variations: u8) -> TileType {
        self.next_range(variations as u32) as TileType + 1
    }
}
