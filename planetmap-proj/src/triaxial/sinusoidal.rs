//! Sinusoidal projection: equal-area pseudocylindrical about a center
//! longitude. x = R·Δλ·cos(φ), y = R·φ on the sphere of the equatorial
//! radius.

use planetmap_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use planetmap_core::{wrap_180, wrap_360};

use crate::base::CoordRange;
use crate::error::ProjResult;
use crate::label::KeywordProvider;

use super::TriaxialProjection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinusoidalParams {
    /// Center longitude in radians, positive east.
    pub(crate) center_longitude: f64,
}

impl SinusoidalParams {
    /// Reads CenterLongitude from the projection's mapping group. When the
    /// keyword is absent the middle of the longitude range is used and
    /// written back into the group.
    pub(crate) fn from_projection(proj: &mut TriaxialProjection) -> ProjResult<Self> {
        if !proj.base.mapping.has_keyword("CenterLongitude") {
            let lon = (proj.minimum_longitude + proj.maximum_longitude) / 2.0;
            proj.base.mapping.set_real("CenterLongitude", lon);
        }
        let mut center_longitude = proj.base.mapping.require_float("CenterLongitude")?;

        center_longitude *= DEG_TO_RAD;
        if proj.is_positive_west() {
            center_longitude *= -1.0;
        }
        Ok(Self { center_longitude })
    }
}

pub(crate) fn set_ground(
    proj: &mut TriaxialProjection,
    params: &SinusoidalParams,
    lat: f64,
    lon: f64,
) -> bool {
    if lat.abs() > 90.0 {
        proj.base.good = false;
        return false;
    }
    proj.latitude = lat;
    proj.longitude = lon;

    let mut lon_radians = lon * DEG_TO_RAD;
    if proj.is_positive_west() {
        lon_radians *= -1.0;
    }
    let lat_radians = lat * DEG_TO_RAD;

    let delta_lon = lon_radians - params.center_longitude;
    let x = proj.equatorial_radius * delta_lon * lat_radians.cos();
    let y = proj.equatorial_radius * lat_radians;

    proj.base.set_computed_xy(x, y);
    proj.base.good = true;
    true
}

pub(crate) fn set_coordinate(
    proj: &mut TriaxialProjection,
    params: &SinusoidalParams,
    x: f64,
    y: f64,
) -> bool {
    proj.base.set_xy(x, y);

    let lat_radians = proj.base.get_y() / proj.equatorial_radius;
    let latitude = lat_radians * RAD_TO_DEG;
    if latitude.abs() > 90.0 {
        proj.base.good = false;
        return false;
    }

    let cos_lat = lat_radians.cos();
    let lon_radians = if cos_lat.abs() < 1.0e-15 {
        // at a pole every longitude collapses to a point
        params.center_longitude
    } else {
        params.center_longitude + proj.base.get_x() / (proj.equatorial_radius * cos_lat)
    };

    let mut longitude = lon_radians * RAD_TO_DEG;
    if proj.is_positive_west() {
        longitude *= -1.0;
    }
    longitude = wrap_360(longitude);
    if proj.longitude_domain == 180 {
        longitude = wrap_180(longitude);
    }

    proj.latitude = latitude;
    proj.longitude = longitude;
    proj.base.good = true;
    true
}

pub(crate) fn xy_range(
    proj: &mut TriaxialProjection,
    _params: &SinusoidalParams,
) -> Option<CoordRange> {
    let mut range = CoordRange::new();

    proj.xy_range_check(&mut range, proj.minimum_latitude, proj.minimum_longitude);
    proj.xy_range_check(&mut range, proj.maximum_latitude, proj.minimum_longitude);
    proj.xy_range_check(&mut range, proj.minimum_latitude, proj.maximum_longitude);
    proj.xy_range_check(&mut range, proj.maximum_latitude, proj.maximum_longitude);

    // |x| peaks on the equator when the range crosses it
    if proj.in_latitude_range(0.0) {
        proj.xy_range_check(&mut range, 0.0, proj.minimum_longitude);
        proj.xy_range_check(&mut range, 0.0, proj.maximum_longitude);
    }

    if range.is_ordered() {
        Some(range)
    } else {
        None
    }
}
