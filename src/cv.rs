use crate::folds::build_folds;
use crate::types::{CvError, CvOptions, CvOutcome, DegreeSummary, ErrorMatrix, Fold, Observation};

/// Run the full (degree, fold) evaluation grid and summarize per degree.
///
/// Builds folds per the configured strategy, evaluates every degree in
/// `1..=max_degree` on every fold, and reduces the fold axis to per-degree
/// mean and cross-fold sample standard deviation. Any single evaluation
/// failure aborts the run; a partially filled matrix would silently bias the
/// summaries it feeds.
///
/// The rolling strategy makes this fully deterministic: the same series and
/// options produce a bit-identical [`ErrorMatrix`]. The randomized strategy
/// is deterministic given its seed.
pub fn cross_validate(series: &[Observation], opts: &CvOptions) -> Result<CvOutcome, CvError> {
    let folds = build_folds(series, &opts.strategy)?;
    cross_validate_folds(folds, opts.max_degree, opts.skip_empty_test)
}

/// [`cross_validate`] over caller-supplied folds.
///
/// For callers that construct their own train/test splits instead of going
/// through the built-in strategies. Folds with an empty test slice are fatal
/// unless `skip_empty_test` is set, in which case they are dropped before
/// the matrix is allocated so the exclusion stays uniform across degrees.
pub fn cross_validate_folds(
    mut folds: Vec<Fold>,
    max_degree: usize,
    skip_empty_test: bool,
) -> Result<CvOutcome, CvError> {
    if max_degree == 0 {
        return Err(CvError::InvalidConfig(
            "max_degree must be at least 1".to_string(),
        ));
    }
    if skip_empty_test {
        folds.retain(|fold| !fold.test.is_empty());
    }
    if folds.is_empty() {
        return Err(CvError::InvalidConfig(
            "no usable folds after filtering empty test sets".to_string(),
        ));
    }

    let errors = fill_error_matrix(&folds, max_degree)?;
    let summaries = summarize(&errors);

    Ok(CvOutcome { errors, summaries })
}

fn fill_error_matrix(folds: &[Fold], max_degree: usize) -> Result<ErrorMatrix, CvError> {
    let mut errors = ErrorMatrix::zeros(max_degree, folds.len());
    for degree in 1..=max_degree {
        for (fold_idx, fold) in folds.iter().enumerate() {
            let rmse = crate::poly::evaluate(&fold.train, &fold.test, degree)?;
            errors.set(degree, fold_idx, rmse);
        }
    }
    Ok(errors)
}

/// Reduce the fold axis to per-degree mean and sample standard deviation.
///
/// The spread is the Bessel-corrected standard deviation of the fold RMSEs
/// themselves, not divided by sqrt(folds); the one-standard-error rule in
/// the selector is calibrated against exactly this quantity.
pub fn summarize(errors: &ErrorMatrix) -> Vec<DegreeSummary> {
    let folds = errors.num_folds() as f64;
    (1..=errors.max_degree())
        .map(|degree| {
            let row = errors.row(degree);
            let mean = row.iter().sum::<f64>() / folds;
            let se = if row.len() > 1 {
                let var = row.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (folds - 1.0);
                var.sqrt()
            } else {
                0.0
            };
            DegreeSummary {
                degree,
                mean_rmse: mean,
                se_rmse: se,
            }
        })
        .collect()
}
