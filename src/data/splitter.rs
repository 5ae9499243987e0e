// ============================================================
// Layer 4 - Train/Test Splitter
// ============================================================
// Shuffles the row indices 0..n and cuts them into two sets:
//   - Train: the first ⌊train_fraction · n⌋ shuffled indices
//   - Test:  everything after the cut
//
// The shuffle is Fisher-Yates (rand::seq::SliceRandom) driven
// by a ChaCha8 generator seeded from the run configuration, so
// the same row count and seed always give the same Partition.
// ChaCha8's output stream is fixed across platforms and rand
// releases, unlike StdRng.
//
// Reference: rand / rand_chacha crate documentation

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Disjoint train/test row indices covering 0..n exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

impl Partition {
    /// Seeded random split of `n` rows.
    ///
    /// # Example
    /// ```ignore
    /// let p = Partition::new(100, 0.8, 42);
    /// // p.train has 80 indices, p.test has 20
    /// ```
    pub fn new(n: usize, train_fraction: f64, seed: u64) -> Self {
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        // The epsilon keeps 10 × 0.8 from landing on 7.999…
        let split_at = ((n as f64) * train_fraction + 1e-9).floor() as usize;
        let split_at = split_at.min(n);

        let test = indices.split_off(split_at);

        tracing::debug!(
            "Partition (seed {}): {} train, {} test",
            seed,
            indices.len(),
            test.len(),
        );

        Self { train: indices, test }
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

}
