//! Deterministic, splittable random stream used by the simulation workers.

use rand::{Error, RngCore, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// 64-bit SplitMix generator. One instance per worker, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomStream {
    state: u64,
}

impl RandomStream {
    pub fn new(seed: u64) -> RandomStream {
        RandomStream { state: seed }
    }

    /// Derives a child stream whose seed is drawn from this one.
    pub fn split(&mut self) -> RandomStream {
        RandomStream::new(self.next_u64())
    }

    /// Derives `n` child streams in order.
    pub fn split_n(&mut self, n: usize) -> Vec<RandomStream> {
        (0..n).map(|_| self.split()).collect()
    }
}

impl RngCore for RandomStream {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for RandomStream {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        RandomStream::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        RandomStream::new(state)
    }
}
