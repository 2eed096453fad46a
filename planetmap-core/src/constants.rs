#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.5707963267948966192313216;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const TWOPI: f64 = 6.283185307179586476925287;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

/// Reserved marker meaning "no value supplied".
///
/// Distinct from IEEE NaN so it compares equal to itself and survives
/// serialization. Every coordinate-taking API in the toolkit checks for it
/// explicitly before computing.
pub const NULL_REAL: f64 = -f64::MAX;

/// Degrees of longitude per hour of right ascension.
pub const DEGREES_PER_HOUR: f64 = 15.0;
