//! Angle folding and sentinel utilities.
//!
//! Longitudes and ring longitudes live in one of two domains:
//!
//! | Domain | Range | Function |
//! |--------|-------|----------|
//! | 360    | [0°, 360°]    | [`wrap_360`] |
//! | 180    | [−180°, 180°] | [`wrap_180`] |
//!
//! Both endpoints of each domain are valid and map to themselves. Values
//! outside the domain are folded in a single `fmod`, never by repeated
//! subtraction, so folding a longitude of 1e9 degrees costs the same as
//! folding 361. A fold result within [`BOUNDARY_SNAP`] of a domain boundary
//! is snapped onto that boundary; without the snap, folding `-1e-10` would
//! produce `359.9999999999` — a value that is "almost 360" and breaks
//! downstream comparisons against the stored range endpoints.

use crate::constants::NULL_REAL;
use crate::math::fmod;

/// Absolute tolerance, in degrees, for treating a value as exactly on a
/// domain boundary.
pub const BOUNDARY_SNAP: f64 = 1.0e-9;

/// Tests whether `v` is the reserved "no value supplied" marker.
#[inline]
pub fn is_null(v: f64) -> bool {
    v == NULL_REAL
}

/// Tolerant equality for degree-valued quantities.
#[inline]
pub fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= BOUNDARY_SNAP
}

/// Folds a longitude into the 0 to 360 domain.
///
/// Values already in [0, 360] are returned unchanged, so both 0 and 360
/// are preserved exactly. Out-of-domain values fold in O(1); results
/// within [`BOUNDARY_SNAP`] of 0 or 360 land exactly on the boundary.
pub fn wrap_360(lon: f64) -> f64 {
    if (0.0..=360.0).contains(&lon) {
        return lon;
    }
    let mut folded = fmod(lon, 360.0);
    if folded < 0.0 {
        folded += 360.0;
    }
    if fuzzy_eq(folded, 0.0) {
        return 0.0;
    }
    if fuzzy_eq(folded, 360.0) {
        return 360.0;
    }
    folded
}

/// Folds a longitude into the −180 to 180 domain.
///
/// Values already in [−180, 180] are returned unchanged, so both endpoints
/// are preserved exactly. Out-of-domain values fold in O(1); results
/// within [`BOUNDARY_SNAP`] of ±180 land exactly on the boundary.
pub fn wrap_180(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let mut folded = fmod(lon + 180.0, 360.0);
    if folded < 0.0 {
        folded += 360.0;
    }
    let result = folded - 180.0;
    if fuzzy_eq(result, -180.0) {
        return -180.0;
    }
    if fuzzy_eq(result, 180.0) {
        return 180.0;
    }
    result
}
