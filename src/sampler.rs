use rand::Rng;

/// Draws without replacement by a partial Fisher-Yates shuffle over a
/// reusable index buffer. Nothing is allocated once the buffer has grown
/// to the pool size.
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    indices: Vec<usize>,
}

impl Sampler {
    pub fn new() -> Sampler {
        Sampler::default()
    }

    pub fn with_capacity(pool_size: usize) -> Sampler {
        Sampler {
            indices: Vec::with_capacity(pool_size),
        }
    }

    /// Picks `k` distinct positions out of `0..n`.
    ///
    /// `k == 0` returns an empty slice without touching `rng`.
    ///
    /// # Panics
    ///
    /// Panics if `k > n`.
    pub fn sample_indices<R: Rng + ?Sized>(&mut self, k: usize, n: usize, rng: &mut R) -> &[usize] {
        assert!(k <= n, "cannot sample {} items from a pool of {}", k, n);
        if k == 0 {
            return &[];
        }

        self.indices.clear();
        self.indices.extend(0..n);
        for i in 0..k {
            let j = rng.gen_range(i..n);
            self.indices.swap(i, j);
        }
        &self.indices[..k]
    }

    /// Fills `out` with `out.len()` distinct elements of `pool`.
    pub fn draw_into<T: Copy, R: Rng + ?Sized>(&mut self, pool: &[T], rng: &mut R, out: &mut [T]) {
        let picked = self.sample_indices(out.len(), pool.len(), rng);
        for (slot, &idx) in out.iter_mut().zip(picked) {
            *slot = pool[idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomStream;
    use std::collections::HashSet;

    #[test]
    fn test_zero_draw_consumes_nothing() {
        let mut sampler = Sampler::new();
        let mut rng = RandomStream::new(5);
        let untouched = rng.clone();
        assert!(sampler.sample_indices(0, 10, &mut rng).is_empty());
        assert_eq!(rng, untouched);
    }

    #[test]
    fn test_indices_distinct_and_in_range() {
        let mut sampler = Sampler::new();
        let mut rng = RandomStream::new(11);
        for k in 0..=20 {
            let picked = sampler.sample_indices(k, 20, &mut rng).to_vec();
            assert_eq!(picked.len(), k);
            let unique: HashSet<usize> = picked.iter().copied().collect();
            assert_eq!(unique.len(), k);
            assert!(picked.iter().all(|&i| i < 20));
        }
    }

    #[test]
    fn test_full_draw_is_permutation() {
        let mut sampler = Sampler::new();
        let mut rng = RandomStream::new(3);
        let mut picked = sampler.sample_indices(8, 8, &mut rng).to_vec();
        picked.sort_unstable();
        assert_eq!(picked, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_roughly_uniform() {
        let mut sampler = Sampler::new();
        let mut rng = RandomStream::new(1234);
        let mut hits = [0u32; 6];
        for _ in 0..60_000 {
            let picked = sampler.sample_indices(2, 6, &mut rng);
            for &i in picked {
                hits[i] += 1;
            }
        }
        // Each position is expected 20_000 times.
        for &h in &hits {
            assert!(h > 19_000 && h < 21_000, "skewed count {}", h);
        }
    }

    #[test]
    fn test_draw_into_uses_pool_elements() {
        let pool = ['a', 'b', 'c', 'd'];
        let mut out = ['_'; 3];
        let mut sampler = Sampler::with_capacity(pool.len());
        let mut rng = RandomStream::new(8);
        sampler.draw_into(&pool, &mut rng, &mut out);
        assert!(out.iter().all(|c| pool.contains(c)));
        let unique: HashSet<char> = out.iter().copied().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    #[should_panic]
    fn test_oversized_draw_panics() {
        let mut sampler = Sampler::new();
        let mut rng = RandomStream::new(0);
        sampler.sample_indices(3, 2, &mut rng);
    }
}
