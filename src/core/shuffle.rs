use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Produces shuffled copies of a sequence from an owned random source.
///
/// Seed it with [`ShuffleEngine::seeded`] for reproducible output.
#[derive(Debug, Clone)]
pub struct ShuffleEngine<R = StdRng> {
    rng: R,
}

impl ShuffleEngine<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ShuffleEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// 回傳重新洗牌後的副本，原始序列不變
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled = items.to_vec();
        // Fisher-Yates
        shuffled.shuffle(&mut self.rng);
        shuffled
    }
}

impl Default for ShuffleEngine<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_keeps_elements_and_leaves_input_untouched() {
        let input = vec!["a", "b", "c", "d", "e", "f"];
        let mut engine = ShuffleEngine::seeded(42);

        let shuffled = engine.shuffle(&input);

        assert_eq!(input, vec!["a", "b", "c", "d", "e", "f"]);
        let mut sorted = shuffled.clone();
        sorted.sort();
        assert_eq!(sorted, input);
    }

    #[test]
    fn test_same_seed_same_permutation() {
        let input: Vec<u32> = (0..20).collect();
        let first = ShuffleEngine::seeded(7).shuffle(&input);
        let second = ShuffleEngine::seeded(7).shuffle(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_shuffle_eventually_reorders() {
        let input: Vec<u32> = (0..10).collect();
        let mut engine = ShuffleEngine::seeded(1);
        let reordered = (0..20).any(|_| engine.shuffle(&input) != input);
        assert!(reordered);
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut engine = ShuffleEngine::seeded(3);
        assert!(engine.shuffle::<u8>(&[]).is_empty());
        assert_eq!(engine.shuffle(&["solo"]), vec!["solo"]);
    }
}
