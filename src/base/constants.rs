/// Defines the stable time step reported by models without a time-step restriction
pub const LARGE_TIME_STEP: f64 = 1e10;

/// Defines the Maxwell time reported when the effective stress vanishes
pub const INFINITE_MAXWELL_TIME: f64 = 1e30;

/// Defines the default blend factor of the generalized trapezoidal rule (midpoint)
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Defines the default fraction of the Maxwell time used as the stable time step
pub const DEFAULT_STABLE_STEP_FRACTION: f64 = 0.1;

/// Defines the number of entries of the symmetric tangent (upper triangle of 6×6)
pub const N_SYMMETRIC_TANGENT: usize = 21;

/// Defines the number of entries of the full tangent (6×6)
pub const N_FULL_TANGENT: usize = 36;
