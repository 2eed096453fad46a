//! Planar ring projection: the ring plane viewed face-on, with
//! x = r·cos(Δλ) and y = r·sin(Δλ) about a center ring longitude.

use planetmap_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use planetmap_core::{wrap_180, wrap_360};

use crate::base::CoordRange;
use crate::error::ProjResult;
use crate::label::KeywordProvider;

use super::{RingLongitudeDirection, RingPlaneProjection};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarParams {
    /// Center ring longitude in radians, counterclockwise.
    pub(crate) center_ring_longitude: f64,
    /// Center ring radius in meters.
    pub(crate) center_radius: f64,
}

impl PlanarParams {
    /// Reads CenterRingLongitude and CenterRadius from the projection's
    /// mapping group. Absent keywords default to the middle of the ground
    /// range and are written back.
    pub(crate) fn from_projection(proj: &mut RingPlaneProjection) -> ProjResult<Self> {
        if !proj.base.mapping.has_keyword("CenterRingLongitude") {
            let lon = (proj.minimum_ring_longitude + proj.maximum_ring_longitude) / 2.0;
            proj.base.mapping.set_real("CenterRingLongitude", lon);
        }
        if !proj.base.mapping.has_keyword("CenterRadius") {
            let radius = (proj.minimum_ring_radius + proj.maximum_ring_radius) / 2.0;
            proj.base.mapping.set_real("CenterRadius", radius);
        }

        let mut center_ring_longitude = proj.base.mapping.require_float("CenterRingLongitude")?;
        let center_radius = proj.base.mapping.require_float("CenterRadius")?;

        center_ring_longitude *= DEG_TO_RAD;
        if proj.ring_longitude_direction == RingLongitudeDirection::Clockwise {
            center_ring_longitude *= -1.0;
        }

        Ok(Self {
            center_ring_longitude,
            center_radius,
        })
    }

    pub(crate) fn true_scale_ring_radius(&self) -> f64 {
        self.center_radius
    }
}

pub(crate) fn set_ground(
    proj: &mut RingPlaneProjection,
    params: &PlanarParams,
    ring_radius: f64,
    ring_longitude: f64,
) -> bool {
    if ring_radius < 0.0 {
        proj.base.good = false;
        return false;
    }
    proj.ring_radius = ring_radius;
    proj.ring_longitude = ring_longitude;

    let mut lon_radians = ring_longitude * DEG_TO_RAD;
    if proj.is_clockwise() {
        lon_radians *= -1.0;
    }

    let delta_lon = lon_radians - params.center_ring_longitude;
    let x = ring_radius * delta_lon.cos();
    let y = ring_radius * delta_lon.sin();

    proj.base.set_computed_xy(x, y);
    proj.base.good = true;
    true
}

pub(crate) fn set_coordinate(
    proj: &mut RingPlaneProjection,
    params: &PlanarParams,
    x: f64,
    y: f64,
) -> bool {
    proj.base.set_xy(x, y);

    let gx = proj.base.get_x();
    let gy = proj.base.get_y();

    proj.ring_radius = (gx * gx + gy * gy).sqrt();

    let mut longitude = (gy.atan2(gx) + params.center_ring_longitude) * RAD_TO_DEG;
    if longitude < 0.0 {
        longitude += 360.0;
    }
    if proj.is_clockwise() {
        longitude *= -1.0;
    }
    longitude = wrap_360(longitude);
    if proj.ring_longitude_domain == 180 {
        longitude = wrap_180(longitude);
    }

    proj.ring_longitude = longitude;
    proj.base.good = true;
    true
}

pub(crate) fn xy_range(proj: &mut RingPlaneProjection, _params: &PlanarParams) -> Option<CoordRange> {
    let mut range = CoordRange::new();

    proj.xy_range_check(
        &mut range,
        proj.minimum_ring_radius,
        proj.minimum_ring_longitude,
    );
    proj.xy_range_check(
        &mut range,
        proj.maximum_ring_radius,
        proj.minimum_ring_longitude,
    );
    proj.xy_range_check(
        &mut range,
        proj.minimum_ring_radius,
        proj.maximum_ring_longitude,
    );
    proj.xy_range_check(
        &mut range,
        proj.maximum_ring_radius,
        proj.maximum_ring_longitude,
    );

    // x and y peak where the range crosses a cardinal azimuth
    for cardinal in [0.0, 90.0, 180.0, 270.0, 360.0] {
        if proj.in_ring_longitude_range(cardinal) {
            proj.xy_range_check(&mut range, proj.minimum_ring_radius, cardinal);
            proj.xy_range_check(&mut range, proj.maximum_ring_radius, cardinal);
        }
    }

    if range.is_ordered() {
        Some(range)
    } else {
        None
    }
}
