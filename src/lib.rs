//! # poly_cv
//!
//! Rolling-origin cross-validation and one-standard-error degree selection
//! for univariate polynomial regression on seasonal demand series.
//!
//! Given an ordered sequence of per-period observations (period bucket,
//! predictor, response), the crate:
//!
//! * builds forward-chaining train/test folds that never leak future periods
//!   into a training window (or, alternatively, repeated randomized K-fold
//!   resamples of the full series),
//! * fits a polynomial of each candidate degree on every fold's train set
//!   using a centered orthogonal basis and scores out-of-sample RMSE,
//! * summarizes the error matrix per degree (mean + cross-fold spread), and
//! * picks the smallest degree whose mean error is within one standard error
//!   of the best degree's.
//!
//! ## Example
//!
//! ```
//! use poly_cv::{select_auto, Observation};
//!
//! // 19 years of monthly observations: response = 3 * predictor^2 + noise.
//! let mut tick: u32 = 1;
//! let mut series = Vec::new();
//! for year in 0..19 {
//!     for month in 0..12 {
//!         tick = tick.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
//!         let noise = (tick >> 16) as f64 / 65_536.0 - 0.5;
//!         let x = month as f64 - 5.5 + year as f64 * 0.03;
//!         series.push(Observation::new(1998 + year, x, 3.0 * x * x + noise));
//!     }
//! }
//!
//! let result = select_auto(&series).unwrap();
//! assert_eq!(result.degree, 2);
//! println!(
//!     "degree {} (mean RMSE {:.3})",
//!     result.degree,
//!     result.summaries[result.degree - 1].mean_rmse
//! );
//! ```

// Module declarations
pub mod cv;
pub mod data;
mod defaults;
pub mod folds;
pub mod poly;
mod select;
mod types;

// Re-export public types
pub use types::{
    CvError, CvOptions, CvOutcome, Degree, DegreeSummary, ErrorMatrix, Fold, FoldStrategy,
    Observation, SelectionResult,
};

// Re-export main public functions
pub use cv::{cross_validate, cross_validate_folds};
pub use data::{series_from_columns, validate_series};
pub use folds::{build_random_folds, build_rolling_folds};
pub use poly::evaluate;
pub use select::{select_auto, select_degree, select_with_options};
