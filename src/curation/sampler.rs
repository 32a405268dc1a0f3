//! Stratified sampling without replacement.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{info, warn};

use super::ranker::MovementBucket;
use super::CurationError;

/// Shrinking pool of image ids. Every draw removes the drawn id.
#[derive(Debug, Clone)]
pub struct SamplingPool {
    remaining: Vec<String>,
}

impl SamplingPool {
    pub fn new(ids: Vec<String>) -> Self {
        Self { remaining: ids }
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    /// Remove and return one id chosen uniformly at random.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<String> {
        if self.remaining.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.remaining.len());
        Some(self.remaining.swap_remove(index))
    }

    /// Draw exactly `count` ids, or none at all if the pool is too small.
    pub fn draw_many<R: Rng>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Option<Vec<String>> {
        if count > self.remaining.len() {
            return None;
        }
        let mut drawn = Vec::with_capacity(count);
        while drawn.len() < count {
            match self.draw(rng) {
                Some(id) => drawn.push(id),
                None => break,
            }
        }
        Some(drawn)
    }
}

/// Disjoint train and validate ids per target movement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitAssignment {
    pub train: BTreeMap<String, Vec<String>>,
    pub validate: BTreeMap<String, Vec<String>>,
    /// Target movements left out, with the reason.
    pub skipped: BTreeMap<String, String>,
}

impl SplitAssignment {
    pub fn movements(&self) -> impl Iterator<Item = &String> {
        self.train.keys()
    }
}

/// Draw `train_n` then `validate_n` ids from `pool`.
///
/// Fails before drawing anything when the pool cannot cover both.
pub fn split_pool<R: Rng>(
    movement: &str,
    pool: &mut SamplingPool,
    train_n: usize,
    validate_n: usize,
    rng: &mut R,
) -> Result<(Vec<String>, Vec<String>), CurationError> {
    let requested = train_n + validate_n;
    if requested > pool.len() {
        return Err(CurationError::PoolExhausted {
            movement: movement.to_string(),
            requested,
            available: pool.len(),
        });
    }

    let train = pool.draw_many(train_n, rng).unwrap_or_default();
    let validate = pool.draw_many(validate_n, rng).unwrap_or_default();
    Ok((train, validate))
}

/// Assign train and validate ids for every target movement.
///
/// A target missing from `buckets` or with too few valid images is skipped
/// and recorded in [`SplitAssignment::skipped`]; the others proceed.
pub fn assign_splits<R: Rng>(
    buckets: &[MovementBucket],
    targets: &[String],
    train_n: usize,
    validate_n: usize,
    rng: &mut R,
) -> SplitAssignment {
    let mut assignment = SplitAssignment::default();

    for target in targets {
        let result = buckets
            .iter()
            .find(|b| &b.movement == target)
            .ok_or_else(|| CurationError::UnknownMovement {
                movement: target.clone(),
            })
            .and_then(|bucket| {
                let mut pool = SamplingPool::new(bucket.image_ids.clone());
                split_pool(target, &mut pool, train_n, validate_n, rng)
            });

        match result {
            Ok((train, validate)) => {
                info!(
                    "{}: {} train, {} validate",
                    target,
                    train.len(),
                    validate.len()
                );
                assignment.train.insert(target.clone(), train);
                assignment.validate.insert(target.clone(), validate);
            }
            Err(e) => {
                warn!("Skipping {}: {}", target, e);
                assignment.skipped.insert(target.clone(), e.to_string());
            }
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn ids(movement: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{}/artist__{}", movement, i)).collect()
    }

    fn bucket(movement: &str, count: usize) -> MovementBucket {
        MovementBucket {
            movement: movement.to_string(),
            image_ids: ids(movement, count),
        }
    }

    #[test]
    fn test_draw_removes_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = SamplingPool::new(ids("cubism", 3));

        let mut seen = HashSet::new();
        while let Some(id) = pool.draw(&mut rng) {
            assert!(seen.insert(id));
        }
        assert_eq!(seen.len(), 3);
        assert!(pool.is_empty());
        assert!(pool.draw(&mut rng).is_none());
    }

    #[test]
    fn test_twelve_ids_split_eight_four() {
        let mut rng = StdRng::seed_from_u64(42);
        let original = ids("cubism", 12);
        let mut pool = SamplingPool::new(original.clone());

        let (train, validate) = split_pool("cubism", &mut pool, 8, 4, &mut rng).unwrap();

        assert_eq!(train.len(), 8);
        assert_eq!(validate.len(), 4);
        assert!(pool.is_empty());

        let all: HashSet<_> = train.iter().chain(validate.iter()).collect();
        assert_eq!(all.len(), 12);
        assert!(all.iter().all(|id| original.contains(id)));
    }

    #[test]
    fn test_exhausted_pool_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = SamplingPool::new(ids("cubism", 5));

        let err = split_pool("cubism", &mut pool, 4, 2, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            CurationError::PoolExhausted {
                requested: 6,
                available: 5,
                ..
            }
        ));
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn test_assign_splits_is_disjoint_per_movement() {
        let mut rng = StdRng::seed_from_u64(3);
        let buckets = vec![bucket("cubism", 20), bucket("symbolism", 9)];
        let targets = vec!["cubism".to_string(), "symbolism".to_string()];

        let assignment = assign_splits(&buckets, &targets, 6, 3, &mut rng);

        for movement in &targets {
            let train = &assignment.train[movement];
            let validate = &assignment.validate[movement];
            assert_eq!(train.len(), 6);
            assert_eq!(validate.len(), 3);
            assert!(train.iter().all(|id| !validate.contains(id)));
            assert!(train.iter().all(|id| id.starts_with(movement.as_str())));
        }
        assert!(assignment.skipped.is_empty());
    }

    #[test]
    fn test_assign_splits_skips_small_and_unknown_targets() {
        let mut rng = StdRng::seed_from_u64(3);
        let buckets = vec![bucket("cubism", 20), bucket("symbolism", 2)];
        let targets = vec![
            "cubism".to_string(),
            "symbolism".to_string(),
            "impressionism".to_string(),
        ];

        let assignment = assign_splits(&buckets, &targets, 3, 1, &mut rng);

        assert_eq!(assignment.movements().collect::<Vec<_>>(), vec!["cubism"]);
        assert!(assignment.skipped.contains_key("symbolism"));
        assert!(assignment.skipped.contains_key("impressionism"));
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let buckets = vec![bucket("cubism", 30)];
        let targets = vec!["cubism".to_string()];

        let a = assign_splits(&buckets, &targets, 5, 5, &mut StdRng::seed_from_u64(9));
        let b = assign_splits(&buckets, &targets, 5, 5, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
