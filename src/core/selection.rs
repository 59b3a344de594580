//! Random draw of the items to inspect

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("cannot draw {requested} items from a lot of {available}")]
    NotEnoughItems { requested: usize, available: usize },
}

/// Random generator for a draw, reproducible when a seed is given
pub fn sampling_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            debug!(seed, "seeded draw");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Draw `n` distinct items uniformly without replacement, in draw order
pub fn select_sample<T: Clone, R: Rng + ?Sized>(
    items: &[T],
    n: usize,
    rng: &mut R,
) -> Result<Vec<T>, SelectionError> {
    if n > items.len() {
        return Err(SelectionError::NotEnoughItems {
            requested: n,
            available: items.len(),
        });
    }
    Ok(rand::seq::index::sample(rng, items.len(), n)
        .into_iter()
        .map(|i| items[i].clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn lot(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("img_{}.tif", i)).collect()
    }

    #[test]
    fn test_draw_is_distinct() {
        let items = lot(100);
        let mut rng = sampling_rng(Some(7));
        let sample = select_sample(&items, 20, &mut rng).unwrap();
        assert_eq!(sample.len(), 20);
        let unique: HashSet<_> = sample.iter().collect();
        assert_eq!(unique.len(), 20);
        assert!(sample.iter().all(|s| items.contains(s)));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let items = lot(500);
        let a = select_sample(&items, 50, &mut sampling_rng(Some(42))).unwrap();
        let b = select_sample(&items, 50, &mut sampling_rng(Some(42))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_whole_lot() {
        let items = lot(5);
        let mut sample = select_sample(&items, 5, &mut sampling_rng(None)).unwrap();
        sample.sort();
        assert_eq!(sample, items);
    }

    #[test]
    fn test_too_many() {
        let items = lot(3);
        assert_eq!(
            select_sample(&items, 4, &mut sampling_rng(None)).unwrap_err(),
            SelectionError::NotEnoughItems {
                requested: 4,
                available: 3
            }
        );
    }
}
