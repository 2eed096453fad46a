//! Coordinate-convention conversions.
//!
//! Pure functions over degree-valued inputs: longitude domain folding,
//! longitude/ring-longitude direction flips, and latitude-type conversion
//! between planetocentric and planetographic. They carry no object state
//! and are safe to call before any projection exists — coordinate-reporting
//! tools use them directly.
//!
//! All of them reject the reserved "absent value" sentinel with an error:
//! callers in per-pixel loops are expected to have validated inputs, so a
//! sentinel reaching one of these is a programming error, not a bad pixel.

use planetmap_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use planetmap_core::utils::{fuzzy_eq, is_null};
use planetmap_core::{wrap_180, wrap_360};

use crate::error::{ProjError, ProjResult};

/// Folds a longitude into the −180 to 180 domain. Values already in the
/// domain are unchanged; both endpoints are valid.
pub fn to_180_domain(lon: f64) -> ProjResult<f64> {
    if is_null(lon) {
        return Err(ProjError::invalid_coordinate(
            "unable to convert to the 180 degree domain, the given longitude is invalid",
        ));
    }
    Ok(wrap_180(lon))
}

/// Folds a longitude into the 0 to 360 domain. Values already in the
/// domain are unchanged; 0 and 360 both map to themselves.
pub fn to_360_domain(lon: f64) -> ProjResult<f64> {
    if is_null(lon) {
        return Err(ProjError::invalid_coordinate(
            "unable to convert to the 360 degree domain, the given longitude is invalid",
        ));
    }
    Ok(wrap_360(lon))
}

fn flip_direction(value: f64, domain: i32, what: &str) -> ProjResult<f64> {
    if is_null(value) {
        return Err(ProjError::invalid_coordinate(format!(
            "unable to convert direction, the given {what} is invalid"
        )));
    }
    let flipped = -value;
    match domain {
        360 => Ok(wrap_360(flipped)),
        180 => Ok(wrap_180(flipped)),
        other => Err(ProjError::InvalidDomain { domain: other }),
    }
}

/// Converts a longitude into the positive-east direction, folding into the
/// requested domain (180 or 360).
pub fn to_positive_east(lon: f64, domain: i32) -> ProjResult<f64> {
    flip_direction(lon, domain, "longitude")
}

/// Converts a longitude into the positive-west direction, folding into the
/// requested domain (180 or 360).
pub fn to_positive_west(lon: f64, domain: i32) -> ProjResult<f64> {
    flip_direction(lon, domain, "longitude")
}

/// Converts a ring longitude into the clockwise direction, folding into
/// the requested domain (180 or 360).
pub fn to_clockwise(ring_lon: f64, domain: i32) -> ProjResult<f64> {
    flip_direction(ring_lon, domain, "ring longitude")
}

/// Converts a ring longitude into the counterclockwise direction, folding
/// into the requested domain (180 or 360).
pub fn to_counter_clockwise(ring_lon: f64, domain: i32) -> ProjResult<f64> {
    flip_direction(ring_lon, domain, "ring longitude")
}

fn checked_latitude(lat: f64, target: &str) -> ProjResult<f64> {
    if is_null(lat) {
        return Err(ProjError::invalid_coordinate(format!(
            "unable to convert to {target}, the given latitude is invalid"
        )));
    }
    // values a rounding error away from a pole are the pole
    let lat = if fuzzy_eq(lat.abs(), 90.0) {
        lat.round()
    } else {
        lat
    };
    if lat.abs() > 90.0 {
        return Err(ProjError::invalid_coordinate(format!(
            "unable to convert to {target}, latitude [{lat}] is outside the range of [-90:90]"
        )));
    }
    Ok(lat)
}

/// Converts a planetocentric latitude to planetographic, in degrees.
///
/// tan is singular at the poles, so ±90 pass through untouched.
pub fn to_planetographic(lat: f64, equatorial_radius: f64, polar_radius: f64) -> ProjResult<f64> {
    let lat = checked_latitude(lat, "planetographic")?;
    if lat.abs() < 90.0 {
        let ratio = equatorial_radius / polar_radius;
        Ok(((lat * DEG_TO_RAD).tan() * ratio * ratio).atan() * RAD_TO_DEG)
    } else {
        Ok(lat)
    }
}

/// Converts a planetographic latitude to planetocentric, in degrees.
///
/// The algebraic inverse of [`to_planetographic`].
pub fn to_planetocentric(lat: f64, equatorial_radius: f64, polar_radius: f64) -> ProjResult<f64> {
    let lat = checked_latitude(lat, "planetocentric")?;
    if lat.abs() < 90.0 {
        let ratio = polar_radius / equatorial_radius;
        Ok(((lat * DEG_TO_RAD).tan() * ratio * ratio).atan() * RAD_TO_DEG)
    } else {
        Ok(lat)
    }
}
