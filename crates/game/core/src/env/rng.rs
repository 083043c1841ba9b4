//! Deterministic per-game random number generation.
//!
//! Every random event in a game draws from one sequential [`GameRng`] stored
//! in the game state. Two runs started from the same seed and fed the same
//! moves therefore draw the same values in the same order, which keeps the
//! authoritative run and every replay bit-for-bit identical.

/// Seed of the throwaway generator used by damage diagnostics.
pub const DIAGNOSTIC_SEED: u64 = 12345;

/// Source of uniform randomness consumed by the combat resolver.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state. The state is a plain `u64`, so the generator is `Copy` and
/// persists with the rest of the game.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator whose first outputs are well mixed even for small
    /// seeds such as 0 or 1.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            state: mix_seed(seed),
        }
    }

    /// Generator used by damage distributions and other what-if diagnostics.
    pub fn diagnostic() -> Self {
        Self::from_seed(DIAGNOSTIC_SEED)
    }

    /// Raw 64-bit state, for persistence and debugging.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        let state = self.step();
        Self::output(state)
    }

    pub fn next_f64(&mut self) -> f64 {
        RandomSource::next_f64(self)
    }
}

impl RandomSource for GameRng {
    fn next_u32(&mut self) -> u32 {
        GameRng::next_u32(self)
    }
}

/// SplitMix-style avalanche so neighbouring seeds start far apart.
fn mix_seed(seed: u64) -> u64 {
    let mut hash = seed;
    hash ^= hash.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (hash >> 29).wrapping_mul(0x517cc1b727220a95);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
