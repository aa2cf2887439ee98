//! MT19937 random stream.
//!
//! Seeding is the classic `init_genrand` and floats are `next_u32() / 2^32`,
//! so a given key produces the same sequence as any other MT19937 with 32-bit
//! seeding.

use crate::seed::Seed;
use rand::{Error, RngCore, SeedableRng};

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;
const INV_TWO_POW_32: f64 = 1.0 / 4_294_967_296.0;

/// Deterministic stream owned by a single generation run.
#[derive(Clone)]
pub struct RandomStream {
    state: [u32; N],
    index: usize,
}

impl RandomStream {
    pub fn new(key: u32) -> Self {
        let mut state = [0u32; N];
        state[0] = key;
        for i in 1..N {
            let prev = state[i - 1];
            state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self { state, index: N }
    }

    pub fn from_block_seed(seed: Seed) -> Self {
        Self::new(seed.stream_key())
    }

    /// Next float in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        unit(self)
    }

    fn twist(&mut self) {
        for k in 0..N {
            let y = (self.state[k] & UPPER_MASK) | (self.state[(k + 1) % N] & LOWER_MASK);
            let mut next = self.state[(k + M) % N] ^ (y >> 1);
            if y & 1 != 0 {
                next ^= MATRIX_A;
            }
            self.state[k] = next;
        }
        self.index = 0;
    }
}

impl std::fmt::Debug for RandomStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomStream").field("index", &self.index).finish()
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;

        // Tempering
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for RandomStream {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Map any generator's next `u32` to a float in `[0, 1)`.
///
/// Generation only ever draws through this, so a mock `RngCore` controls the
/// exact values the forest sees.
pub fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.next_u32()) * INV_TWO_POW_32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_outputs() {
        let mut rng = RandomStream::new(5489);
        assert_eq!(rng.next_u32(), 3_499_211_612);
        assert_eq!(rng.next_u32(), 581_869_302);
        assert_eq!(rng.next_u32(), 3_890_346_734);
    }

    #[test]
    fn unit_floats_for_key_1000() {
        let mut rng = RandomStream::new(1000);
        assert_eq!(rng.next_unit(), 0.6535895883571357);
        assert_eq!(rng.next_unit(), 0.20552172302268445);
        assert_eq!(rng.next_unit(), 0.11500694020651281);
    }

    #[test]
    fn same_key_never_diverges() {
        let mut a = RandomStream::new(42);
        let mut b = RandomStream::from_seed(42u32.to_le_bytes());
        // Crosses the 624-word regeneration boundary a few times.
        for _ in 0..2000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn units_stay_in_range() {
        let mut rng = RandomStream::new(7);
        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
