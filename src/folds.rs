use crate::data::{period_buckets, validate_series};
use crate::types::{CvError, Fold, FoldStrategy, Observation};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Build folds according to the configured strategy.
pub fn build_folds(series: &[Observation], strategy: &FoldStrategy) -> Result<Vec<Fold>, CvError> {
    match strategy {
        FoldStrategy::RollingOrigin { folds } => build_rolling_folds(series, *folds),
        FoldStrategy::RandomKFold {
            folds,
            rounds,
            seed,
        } => build_random_folds(series, *folds, *rounds, *seed),
    }
}

/// Rolling-origin (forward-chaining) folds over period buckets.
///
/// Buckets are the distinct period values present in the series. Fold k
/// (1-based) trains on every observation in the first k buckets and tests on
/// exactly the observations of bucket k+1, so training windows grow
/// monotonically and no test period ever precedes its train window.
///
/// # Errors
/// Returns `CvError::InvalidConfig` when `num_folds` is zero or the series
/// spans fewer than `num_folds + 1` distinct period buckets.
pub fn build_rolling_folds(
    series: &[Observation],
    num_folds: usize,
) -> Result<Vec<Fold>, CvError> {
    validate_series(series)?;
    if num_folds == 0 {
        return Err(CvError::InvalidConfig(
            "rolling CV requires at least 1 fold".to_string(),
        ));
    }

    let buckets = period_buckets(series);
    if buckets.len() < num_folds + 1 {
        return Err(CvError::InvalidConfig(format!(
            "series spans {} period buckets, need at least {} for {} folds",
            buckets.len(),
            num_folds + 1,
            num_folds
        )));
    }

    let mut folds = Vec::with_capacity(num_folds);
    for k in 1..=num_folds {
        let boundary = buckets[k];
        let train: Vec<Observation> = series
            .iter()
            .copied()
            .filter(|obs| obs.period < boundary)
            .collect();
        let test: Vec<Observation> = series
            .iter()
            .copied()
            .filter(|obs| obs.period == boundary)
            .collect();
        folds.push(Fold { train, test });
    }

    Ok(folds)
}

/// Repeated randomized K-fold resampling of the full series.
///
/// Each round shuffles the observation indices once (seeded `StdRng`, so the
/// whole schedule is reproducible) and partitions them into `folds` chunks;
/// each chunk in turn is the test set with the remainder as train. Yields
/// `folds * rounds` folds. Unlike the rolling strategy, train and test are
/// not temporally ordered; this variant estimates the spread of the CV error
/// rather than guarding against leakage.
pub fn build_random_folds(
    series: &[Observation],
    folds: usize,
    rounds: usize,
    seed: u64,
) -> Result<Vec<Fold>, CvError> {
    validate_series(series)?;
    if folds < 2 {
        return Err(CvError::InvalidConfig(
            "randomized CV requires at least 2 folds".to_string(),
        ));
    }
    if rounds == 0 {
        return Err(CvError::InvalidConfig(
            "randomized CV requires at least 1 round".to_string(),
        ));
    }
    let n = series.len();
    if n < folds {
        return Err(CvError::InvalidConfig(format!(
            "series has {} observations, need at least {} for {} folds",
            n, folds, folds
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(folds * rounds);
    let mut indices: Vec<usize> = (0..n).collect();

    for _round in 0..rounds {
        indices.shuffle(&mut rng);

        // Chunk boundaries: the first (n % folds) chunks get one extra row.
        let base = n / folds;
        let extra = n % folds;
        let mut start = 0;
        for chunk in 0..folds {
            let len = base + usize::from(chunk < extra);
            let end = start + len;
            let test: Vec<Observation> =
                indices[start..end].iter().map(|&i| series[i]).collect();
            let train: Vec<Observation> = indices[..start]
                .iter()
                .chain(indices[end..].iter())
                .map(|&i| series[i])
                .collect();
            out.push(Fold { train, test });
            start = end;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yearly_series(years: usize, per_year: usize) -> Vec<Observation> {
        let mut series = Vec::new();
        for y in 0..years {
            for m in 0..per_year {
                let x = m as f64 - per_year as f64 / 2.0;
                series.push(Observation::new(2000 + y as i32, x, 2.0 * x + 1.0));
            }
        }
        series
    }

    #[test]
    fn test_rolling_fold_count_and_sizes() {
        let series = yearly_series(19, 1);
        let folds = build_rolling_folds(&series, 18).unwrap();
        assert_eq!(folds.len(), 18);
        assert_eq!(folds[0].train.len(), 1);
        assert_eq!(folds[17].train.len(), 18);
        for fold in &folds {
            assert_eq!(fold.test.len(), 1);
        }
    }

    #[test]
    fn test_rolling_train_precedes_test() {
        let series = yearly_series(8, 3);
        let folds = build_rolling_folds(&series, 7).unwrap();
        for fold in &folds {
            assert!(!fold.test.is_empty());
            let max_train = fold.train.iter().map(|o| o.period).max().unwrap();
            let min_test = fold.test.iter().map(|o| o.period).min().unwrap();
            assert!(max_train < min_test);
        }
    }

    #[test]
    fn test_rolling_train_windows_grow() {
        let series = yearly_series(10, 2);
        let folds = build_rolling_folds(&series, 9).unwrap();
        for pair in folds.windows(2) {
            let prev = &pair[0].train;
            let next = &pair[1].train;
            assert!(next.len() > prev.len());
            // Superset: the next window starts with the previous one.
            assert_eq!(&next[..prev.len()], &prev[..]);
        }
    }

    #[test]
    fn test_rolling_too_few_buckets() {
        let series = yearly_series(5, 2);
        let result = build_rolling_folds(&series, 5);
        assert!(matches!(result, Err(CvError::InvalidConfig(_))));
    }

    #[test]
    fn test_rolling_deterministic() {
        let series = yearly_series(12, 2);
        let a = build_rolling_folds(&series, 10).unwrap();
        let b = build_rolling_folds(&series, 10).unwrap();
        for (fa, fb) in a.iter().zip(b.iter()) {
            assert_eq!(fa.train, fb.train);
            assert_eq!(fa.test, fb.test);
        }
    }

    #[test]
    fn test_random_folds_partition_each_round() {
        let series = yearly_series(5, 4);
        let folds = build_random_folds(&series, 4, 3, 42).unwrap();
        assert_eq!(folds.len(), 12);
        // Within each round, the test chunks partition the series.
        for round in folds.chunks(4) {
            let total: usize = round.iter().map(|f| f.test.len()).sum();
            assert_eq!(total, series.len());
            for fold in round {
                assert_eq!(fold.train.len() + fold.test.len(), series.len());
            }
        }
    }

    #[test]
    fn test_random_folds_seed_reproducible() {
        let series = yearly_series(6, 3);
        let a = build_random_folds(&series, 3, 5, 7).unwrap();
        let b = build_random_folds(&series, 3, 5, 7).unwrap();
        for (fa, fb) in a.iter().zip(b.iter()) {
            assert_eq!(fa.test, fb.test);
        }
    }

    #[test]
    fn test_random_folds_rejects_tiny_series() {
        let series = yearly_series(1, 2);
        let result = build_random_folds(&series, 5, 1, 7);
        assert!(matches!(result, Err(CvError::InvalidConfig(_))));
    }
}
