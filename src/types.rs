use crate::defaults::{DEFAULT_FOLDS, DEFAULT_MAX_DEGREE, DEFAULT_RESAMPLE_ROUNDS, DEFAULT_SEED};
use ndarray::Array2;

/// Polynomial degree.
pub type Degree = usize;

/// One per-period record of the series under study.
///
/// `period` is the temporal bucket key (e.g. the year); several observations
/// may share a bucket (e.g. twelve monthly readings per year). Order by
/// `period` is semantically meaningful.
///
/// # Example
/// ```
/// use poly_cv::Observation;
/// let obs = Observation { period: 1998, predictor: 17.2, response: 4_310.0 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub period: i32,
    pub predictor: f64,
    pub response: f64,
}

impl Observation {
    pub fn new(period: i32, predictor: f64, response: f64) -> Self {
        Self {
            period,
            predictor,
            response,
        }
    }
}

/// One train/test split instance.
///
/// Invariant for the rolling-origin strategy: every `period` in `train` is
/// strictly less than every `period` in `test`. The randomized strategy does
/// not carry this invariant.
#[derive(Clone, Debug)]
pub struct Fold {
    pub train: Vec<Observation>,
    pub test: Vec<Observation>,
}

/// Out-of-sample RMSE per (degree, fold) cell.
///
/// Row `d - 1` holds degree `d`; columns are folds in build order. Cells are
/// written once during aggregation and never mutated afterward.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorMatrix {
    cells: Array2<f64>,
}

impl ErrorMatrix {
    pub(crate) fn zeros(max_degree: Degree, num_folds: usize) -> Self {
        Self {
            cells: Array2::zeros((max_degree, num_folds)),
        }
    }

    pub(crate) fn set(&mut self, degree: Degree, fold: usize, rmse: f64) {
        self.cells[[degree - 1, fold]] = rmse;
    }

    /// RMSE for `degree` on fold `fold` (both as used during aggregation).
    pub fn get(&self, degree: Degree, fold: usize) -> f64 {
        self.cells[[degree - 1, fold]]
    }

    pub fn max_degree(&self) -> Degree {
        self.cells.nrows()
    }

    pub fn num_folds(&self) -> usize {
        self.cells.ncols()
    }

    /// All fold RMSEs for one degree, in fold order.
    pub fn row(&self, degree: Degree) -> Vec<f64> {
        self.cells.row(degree - 1).to_vec()
    }
}

/// Per-degree error statistics across the fold axis.
///
/// `se_rmse` is the Bessel-corrected sample standard deviation of the fold
/// RMSEs, not divided by sqrt(folds). The one-standard-error rule is defined
/// against this cross-fold spread.
#[derive(Clone, Copy, Debug)]
pub struct DegreeSummary {
    pub degree: Degree,
    pub mean_rmse: f64,
    pub se_rmse: f64,
}

/// Output of cross-validation before selection.
#[derive(Clone, Debug)]
pub struct CvOutcome {
    pub errors: ErrorMatrix,
    pub summaries: Vec<DegreeSummary>,
}

/// Final selection, retained with the full error table for audit.
#[derive(Clone, Debug)]
pub struct SelectionResult {
    pub degree: Degree,
    pub summaries: Vec<DegreeSummary>,
    pub errors: ErrorMatrix,
}

/// Fold construction strategies.
#[derive(Clone, Debug)]
pub enum FoldStrategy {
    /// Forward-chaining splits: train on all buckets before the test bucket,
    /// test on exactly the next bucket. Deterministic, no leakage.
    RollingOrigin { folds: usize },
    /// Repeated randomized K-fold resampling of the full series. Each round
    /// shuffles once and yields `folds` splits, so `folds * rounds` folds in
    /// total. Deterministic given the seed.
    RandomKFold {
        folds: usize,
        rounds: usize,
        seed: u64,
    },
}

impl Default for FoldStrategy {
    fn default() -> Self {
        Self::RollingOrigin {
            folds: DEFAULT_FOLDS,
        }
    }
}

/// Options for one cross-validation run.
///
/// # Example
/// ```
/// use poly_cv::{CvOptions, FoldStrategy};
/// let opts = CvOptions {
///     max_degree: 4,
///     strategy: FoldStrategy::RandomKFold { folds: 5, rounds: 100, seed: 7 },
///     skip_empty_test: false,
/// };
/// ```
#[derive(Clone, Debug)]
pub struct CvOptions {
    /// Degrees 1..=max_degree are evaluated.
    pub max_degree: Degree,
    /// How folds are constructed.
    pub strategy: FoldStrategy,
    /// Drop folds with an empty test slice instead of failing. Default:
    /// false, since silent exclusion biases the per-degree means.
    pub skip_empty_test: bool,
}

impl Default for CvOptions {
    fn default() -> Self {
        Self {
            max_degree: DEFAULT_MAX_DEGREE,
            strategy: FoldStrategy::default(),
            skip_empty_test: false,
        }
    }
}

impl CvOptions {
    /// Randomized repeated-resampling configuration with default rounds/seed.
    ///
    /// # Example
    /// ```
    /// use poly_cv::{CvOptions, FoldStrategy};
    /// let opts = CvOptions::randomized(5);
    /// assert!(matches!(opts.strategy, FoldStrategy::RandomKFold { folds: 5, .. }));
    /// ```
    pub fn randomized(folds: usize) -> Self {
        Self {
            strategy: FoldStrategy::RandomKFold {
                folds,
                rounds: DEFAULT_RESAMPLE_ROUNDS,
                seed: DEFAULT_SEED,
            },
            ..Self::default()
        }
    }
}

/// Library error type.
#[derive(thiserror::Error, Debug)]
pub enum CvError {
    #[error("empty input")]
    EmptyInput,
    #[error("input lengths mismatch")]
    LengthMismatch,
    #[error("series is not sorted by period")]
    UnsortedSeries,
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("insufficient data: degree {degree} needs {needed} training rows, got {got}")]
    InsufficientData {
        degree: Degree,
        needed: usize,
        got: usize,
    },
    #[error("fold has an empty test set")]
    EmptyTestSet,
    #[error("incomplete summary table: {0}")]
    IncompleteSummary(String),
    #[error("ill-conditioned fit at degree {degree} (basis column norm below threshold)")]
    IllConditionedFit { degree: Degree },
    #[error("linear algebra failure: {0}")]
    Linalg(String),
}
