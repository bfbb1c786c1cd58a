use crate::cv::cross_validate;
use crate::types::{CvError, CvOptions, Degree, DegreeSummary, Observation, SelectionResult};

/// Cross-validate with default options and pick a degree.
///
/// Equivalent to [`select_with_options`] with [`CvOptions::default`]:
/// rolling-origin folds, degrees 1 through 6, empty test sets fatal.
pub fn select_auto(series: &[Observation]) -> Result<SelectionResult, CvError> {
    select_with_options(series, &CvOptions::default())
}

/// Cross-validate the series and apply the one-standard-error rule.
///
/// Returns the chosen degree together with the per-degree summary table and
/// the full error matrix for audit or reporting.
pub fn select_with_options(
    series: &[Observation],
    opts: &CvOptions,
) -> Result<SelectionResult, CvError> {
    let outcome = cross_validate(series, opts)?;
    let degree = select_degree(&outcome.summaries)?;
    Ok(SelectionResult {
        degree,
        summaries: outcome.summaries,
        errors: outcome.errors,
    })
}

/// One-standard-error rule over a per-degree summary table.
///
/// Finds the degree with the lowest mean RMSE (ties go to the smaller
/// degree), sets the threshold at that mean plus its cross-fold standard
/// deviation, and returns the smallest degree whose mean is within the
/// threshold. Falls back to the best degree itself when no simpler degree
/// qualifies.
///
/// # Errors
/// `CvError::IncompleteSummary` when the table is empty, has a gap in its
/// degree coverage (it must run contiguously from degree 1), or contains a
/// non-finite mean.
pub fn select_degree(summaries: &[DegreeSummary]) -> Result<Degree, CvError> {
    validate_summaries(summaries)?;

    let mut best = &summaries[0];
    for summary in summaries.iter().skip(1) {
        if summary.mean_rmse < best.mean_rmse {
            best = summary;
        }
    }

    let threshold = best.mean_rmse + best.se_rmse;
    for summary in summaries {
        if summary.mean_rmse <= threshold {
            return Ok(summary.degree);
        }
    }

    Ok(best.degree)
}

fn validate_summaries(summaries: &[DegreeSummary]) -> Result<(), CvError> {
    if summaries.is_empty() {
        return Err(CvError::IncompleteSummary(
            "summary table is empty".to_string(),
        ));
    }
    for (idx, summary) in summaries.iter().enumerate() {
        if summary.degree != idx + 1 {
            return Err(CvError::IncompleteSummary(format!(
                "expected degree {} at position {}, found degree {}",
                idx + 1,
                idx,
                summary.degree
            )));
        }
        if !summary.mean_rmse.is_finite() || !summary.se_rmse.is_finite() {
            return Err(CvError::IncompleteSummary(format!(
                "non-finite statistics for degree {}",
                summary.degree
            )));
        }
    }
    Ok(())
}
