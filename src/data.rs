use crate::types::{CvError, Observation};

/// Assemble a series from parallel period/predictor/response columns.
///
/// This is the boundary with the upstream data-preparation step: it hands
/// over plain columns (years, a temperature principal component, demand) and
/// gets back the ordered record sequence the core operates on.
///
/// # Errors
/// Returns `CvError::LengthMismatch` if the columns differ in length,
/// `CvError::EmptyInput` if they are empty, and the validation errors of
/// [`validate_series`] on the assembled sequence.
pub fn series_from_columns(
    periods: &[i32],
    predictors: &[f64],
    responses: &[f64],
) -> Result<Vec<Observation>, CvError> {
    if periods.len() != predictors.len() || periods.len() != responses.len() {
        return Err(CvError::LengthMismatch);
    }

    let series: Vec<Observation> = periods
        .iter()
        .zip(predictors.iter())
        .zip(responses.iter())
        .map(|((&period, &predictor), &response)| Observation {
            period,
            predictor,
            response,
        })
        .collect();

    validate_series(&series)?;
    Ok(series)
}

/// Validate that a series is usable: non-empty, sorted by period
/// (non-decreasing), and free of NaN/infinite values.
pub fn validate_series(series: &[Observation]) -> Result<(), CvError> {
    if series.is_empty() {
        return Err(CvError::EmptyInput);
    }

    for (index, obs) in series.iter().enumerate() {
        if !obs.predictor.is_finite() || !obs.response.is_finite() {
            return Err(CvError::NonFiniteValue { index });
        }
        if index > 0 && obs.period < series[index - 1].period {
            return Err(CvError::UnsortedSeries);
        }
    }

    Ok(())
}

/// Distinct period buckets present in a sorted series, in order.
pub fn period_buckets(series: &[Observation]) -> Vec<i32> {
    let mut buckets = Vec::new();
    for obs in series {
        if buckets.last() != Some(&obs.period) {
            buckets.push(obs.period);
        }
    }
    buckets
}
