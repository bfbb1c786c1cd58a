use crate::defaults::DEFAULT_COND_EPS;
use crate::types::{CvError, Degree, Observation};
use linfa::dataset::Dataset;
use linfa::traits::Fit;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

/// Centered orthogonal polynomial basis over a training predictor sample.
///
/// Built with the three-term recurrence (alpha/norm2 bookkeeping), so raw
/// powers never appear and high degrees stay well-conditioned. The stored
/// recurrence coefficients come from the training sample only; expanding a
/// test row reuses them, which is what keeps train and test columns on the
/// same basis.
#[derive(Clone, Debug)]
pub struct OrthoBasis {
    degree: Degree,
    center: f64,
    scale: f64,
    alpha: Vec<f64>,
    /// Squared column norms per recurrence level, level 0 included.
    norm2: Vec<f64>,
}

impl OrthoBasis {
    /// Construct the basis of the given degree from training predictor values.
    ///
    /// # Errors
    /// `CvError::IllConditionedFit` when a basis column's squared norm falls
    /// below `cond_eps * n`, which happens when the sample has fewer distinct
    /// predictor values than the degree requires.
    pub fn fit(x: &[f64], degree: Degree, cond_eps: f64) -> Result<Self, CvError> {
        if x.is_empty() {
            return Err(CvError::EmptyInput);
        }
        if degree == 0 {
            return Err(CvError::InvalidConfig(
                "polynomial degree must be at least 1".to_string(),
            ));
        }

        let n = x.len() as f64;
        let center = x.iter().sum::<f64>() / n;
        let spread = x
            .iter()
            .map(|&v| (v - center).abs())
            .fold(0.0_f64, f64::max);
        let scale = if spread > 0.0 { spread } else { 1.0 };
        let z: Vec<f64> = x.iter().map(|&v| (v - center) / scale).collect();

        let mut f_prev = vec![0.0; z.len()];
        let mut f_cur = vec![1.0; z.len()];
        let mut alpha = Vec::with_capacity(degree);
        let mut norm2 = Vec::with_capacity(degree + 1);
        norm2.push(n);

        for j in 0..degree {
            let norm2_cur = norm2[j];
            let a = z
                .iter()
                .zip(f_cur.iter())
                .map(|(&zi, &fi)| zi * fi * fi)
                .sum::<f64>()
                / norm2_cur;
            let ratio = if j == 0 { 0.0 } else { norm2_cur / norm2[j - 1] };

            let f_next: Vec<f64> = z
                .iter()
                .zip(f_cur.iter())
                .zip(f_prev.iter())
                .map(|((&zi, &fi), &pi)| (zi - a) * fi - ratio * pi)
                .collect();
            let norm2_next: f64 = f_next.iter().map(|&v| v * v).sum();
            if norm2_next < cond_eps * n {
                return Err(CvError::IllConditionedFit { degree: j + 1 });
            }

            alpha.push(a);
            norm2.push(norm2_next);
            f_prev = f_cur;
            f_cur = f_next;
        }

        Ok(Self {
            degree,
            center,
            scale,
            alpha,
            norm2,
        })
    }

    /// Expand predictor values into the (len x degree) design matrix.
    pub fn design(&self, x: &[f64]) -> Array2<f64> {
        let m = x.len();
        let z: Vec<f64> = x
            .iter()
            .map(|&v| (v - self.center) / self.scale)
            .collect();

        let mut out = Array2::<f64>::zeros((m, self.degree));
        let mut f_prev = vec![0.0; m];
        let mut f_cur = vec![1.0; m];

        for j in 0..self.degree {
            let ratio = if j == 0 {
                0.0
            } else {
                self.norm2[j] / self.norm2[j - 1]
            };
            let f_next: Vec<f64> = z
                .iter()
                .zip(f_cur.iter())
                .zip(f_prev.iter())
                .map(|((&zi, &fi), &pi)| (zi - self.alpha[j]) * fi - ratio * pi)
                .collect();

            let denom = self.norm2[j + 1].sqrt();
            for (i, &v) in f_next.iter().enumerate() {
                out[[i, j]] = v / denom;
            }
            f_prev = f_cur;
            f_cur = f_next;
        }

        out
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }
}

/// Fit a polynomial of `degree` on `train` and score RMSE on `test`.
///
/// Pure function of its inputs: regresses response on the orthogonal
/// polynomial expansion of the predictor (least squares via linfa, with
/// intercept), predicts every test observation, and returns
/// sqrt(mean squared residual).
///
/// # Errors
/// * `CvError::EmptyTestSet` — `test` is empty, so the fold error is undefined.
/// * `CvError::InsufficientData` — `train` holds fewer than `degree + 1` rows.
/// * `CvError::IllConditionedFit` — basis degenerates (see [`OrthoBasis::fit`]).
/// * `CvError::Linalg` — the least-squares solve failed.
pub fn evaluate(train: &[Observation], test: &[Observation], degree: Degree) -> Result<f64, CvError> {
    evaluate_with(train, test, degree, DEFAULT_COND_EPS)
}

/// [`evaluate`] with an explicit conditioning threshold.
pub fn evaluate_with(
    train: &[Observation],
    test: &[Observation],
    degree: Degree,
    cond_eps: f64,
) -> Result<f64, CvError> {
    if test.is_empty() {
        return Err(CvError::EmptyTestSet);
    }
    let needed = degree + 1;
    if train.len() < needed {
        return Err(CvError::InsufficientData {
            degree,
            needed,
            got: train.len(),
        });
    }

    let train_x: Vec<f64> = train.iter().map(|o| o.predictor).collect();
    let train_y = Array1::from_iter(train.iter().map(|o| o.response));

    let basis = OrthoBasis::fit(&train_x, degree, cond_eps)?;
    let x_train = basis.design(&train_x);

    let dataset = Dataset::new(x_train, train_y);
    let linreg = LinearRegression::new().with_intercept(true);
    let fitted = linreg
        .fit(&dataset)
        .map_err(|e| CvError::Linalg(format!("{:?}", e)))?;
    let params = Array1::from(fitted.params().to_vec());
    let intercept = fitted.intercept();

    let test_x: Vec<f64> = test.iter().map(|o| o.predictor).collect();
    let preds = basis.design(&test_x).dot(&params) + intercept;

    let mse = preds
        .iter()
        .zip(test.iter())
        .map(|(&p, o)| (p - o.response).powi(2))
        .sum::<f64>()
        / test.len() as f64;
    Ok(mse.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(points: &[(f64, f64)]) -> Vec<Observation> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Observation::new(i as i32, x, y))
            .collect()
    }

    #[test]
    fn test_basis_columns_orthonormal_on_train() {
        let x: Vec<f64> = (0..12).map(|i| i as f64 * 0.7 - 3.0).collect();
        let basis = OrthoBasis::fit(&x, 4, DEFAULT_COND_EPS).unwrap();
        let design = basis.design(&x);

        for a in 0..4 {
            for b in 0..4 {
                let dot: f64 = (0..x.len()).map(|i| design[[i, a]] * design[[i, b]]).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!(
                    (dot - expected).abs() < 1e-9,
                    "columns {} and {}: dot = {}",
                    a,
                    b,
                    dot
                );
            }
        }
    }

    #[test]
    fn test_basis_constant_predictor_ill_conditioned() {
        let x = vec![3.0; 8];
        let result = OrthoBasis::fit(&x, 2, DEFAULT_COND_EPS);
        assert!(matches!(result, Err(CvError::IllConditionedFit { degree: 1 })));
    }

    #[test]
    fn test_basis_too_few_distinct_points() {
        // Two distinct x values cannot support a quadratic column.
        let x = vec![1.0, 1.0, 2.0, 2.0, 1.0, 2.0];
        let result = OrthoBasis::fit(&x, 3, DEFAULT_COND_EPS);
        assert!(matches!(result, Err(CvError::IllConditionedFit { .. })));
    }

    #[test]
    fn test_evaluate_recovers_linear_signal() {
        let train = obs(&[
            (0.0, 1.0),
            (1.0, 3.0),
            (2.0, 5.0),
            (3.0, 7.0),
            (4.0, 9.0),
        ]);
        let test = obs(&[(5.0, 11.0), (6.0, 13.0)]);

        let rmse = evaluate(&train, &test, 1).unwrap();
        assert!(rmse < 1e-8, "rmse = {}", rmse);
    }

    #[test]
    fn test_evaluate_recovers_quadratic_signal() {
        let points: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let x = i as f64 * 0.5 - 2.0;
                (x, 3.0 * x * x - x + 2.0)
            })
            .collect();
        let train = obs(&points[..8]);
        let test = obs(&points[8..]);

        let rmse = evaluate(&train, &test, 2).unwrap();
        assert!(rmse < 1e-7, "rmse = {}", rmse);
    }

    #[test]
    fn test_evaluate_insufficient_train() {
        let train = obs(&[(0.0, 1.0), (1.0, 2.0)]);
        let test = obs(&[(2.0, 3.0)]);

        let result = evaluate(&train, &test, 5);
        assert!(matches!(
            result,
            Err(CvError::InsufficientData {
                degree: 5,
                needed: 6,
                got: 2
            })
        ));
    }

    #[test]
    fn test_evaluate_empty_test() {
        let train = obs(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        let result = evaluate(&train, &[], 1);
        assert!(matches!(result, Err(CvError::EmptyTestSet)));
    }

    #[test]
    fn test_evaluate_is_pure() {
        let points: Vec<(f64, f64)> = (0..9).map(|i| (i as f64, (i * i) as f64)).collect();
        let train = obs(&points[..7]);
        let test = obs(&points[7..]);

        let a = evaluate(&train, &test, 3).unwrap();
        let b = evaluate(&train, &test, 3).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
