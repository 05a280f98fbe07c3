use rand::Rng;

/// Fisher–Yates shuffle: walk from the last index down, swapping each slot with a
/// uniformly chosen slot at or before it.
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for current in (1..items.len()).rev() {
        let chosen = rng.random_range(0..=current);
        items.swap(current, chosen);
    }
}

/// Shuffle a freshly fetched batch with the thread-local generator.
pub fn shuffled<T>(mut items: Vec<T>) -> Vec<T> {
    shuffle(&mut items, &mut rand::rng());
    items
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let original: Vec<u32> = (0..10).collect();

        for _ in 0..50 {
            let mut items = original.clone();
            shuffle(&mut items, &mut rng);

            assert_eq!(items.len(), original.len());
            let mut sorted = items.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, original);
        }
    }

    #[test]
    fn shuffle_keeps_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items = vec!["a", "b", "a", "c", "b"];
        shuffle(&mut items, &mut rng);

        let mut counts = HashMap::new();
        for item in &items {
            *counts.entry(*item).or_insert(0) += 1;
        }
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&2));
        assert_eq!(counts.get("c"), Some(&1));
    }

    #[test]
    fn empty_and_single_slices_are_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![9];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![9]);
    }

    #[test]
    fn every_permutation_is_roughly_equally_likely() {
        const RUNS: usize = 60_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen: HashMap<[u8; 3], usize> = HashMap::new();

        for _ in 0..RUNS {
            let mut items = [1u8, 2, 3];
            shuffle(&mut items, &mut rng);
            *seen.entry(items).or_insert(0) += 1;
        }

        assert_eq!(seen.len(), 6);
        let expected = RUNS / 6;
        for (permutation, count) in seen {
            let deviation = count.abs_diff(expected);
            assert!(
                deviation < expected / 10,
                "permutation {permutation:?} seen {count} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn shuffled_preserves_length() {
        let batch = shuffled(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(batch.len(), 10);
    }
}
