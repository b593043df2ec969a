//! Random train/test index split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffles `0..n` and splits it into `(train, test)` index sets.
///
/// The test side holds `ceil(test_size * n)` indices. With `seed = None`
/// the shuffle draws from OS entropy, so repeated runs differ.
pub fn train_test_split(n: usize, test_size: f64, seed: Option<u64>) -> (Vec<usize>, Vec<usize>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let n_test = ((test_size * n as f64).ceil() as usize).min(n);
    let train = indices.split_off(n_test);
    (train, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        let (train, test) = train_test_split(100, 0.15, Some(1));
        assert_eq!(test.len(), 15);
        assert_eq!(train.len(), 85);

        // ceil(0.15 * 2) = 1
        let (train, test) = train_test_split(2, 0.15, Some(1));
        assert_eq!((train.len(), test.len()), (1, 1));
    }

    #[test]
    fn test_split_is_partition() {
        let (train, test) = train_test_split(37, 0.15, Some(7));
        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_seed_reproducible() {
        assert_eq!(
            train_test_split(50, 0.2, Some(42)),
            train_test_split(50, 0.2, Some(42))
        );
    }

    #[test]
    fn test_split_without_seed() {
        let (train, test) = train_test_split(20, 0.25, None);
        assert_eq!((train.len(), test.len()), (15, 5));
    }
}
