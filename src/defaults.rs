//! Default constants for cross-validation and degree selection.

pub const DEFAULT_MAX_DEGREE: usize = 6;
pub const DEFAULT_FOLDS: usize = 18;
pub const DEFAULT_RESAMPLE_ROUNDS: usize = 100;
pub const DEFAULT_SEED: u64 = 7;
pub const DEFAULT_COND_EPS: f64 = 1e-10;
