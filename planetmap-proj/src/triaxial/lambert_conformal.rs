//! Lambert conformal conic projection, ellipsoidal form (Snyder 1987,
//! pp. 104–110). Two standard parallels, a center latitude and longitude;
//! meridians are straight lines converging at the cone apex, parallels are
//! concentric arcs.

use planetmap_core::constants::{DEG_TO_RAD, HALF_PI, RAD_TO_DEG};

use crate::base::CoordRange;
use crate::error::{ProjError, ProjResult};
use crate::label::KeywordProvider;

use super::TriaxialProjection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformalParams {
    /// Center longitude in radians, positive east.
    pub(crate) center_longitude: f64,
    /// Center latitude in radians, planetographic.
    pub(crate) center_latitude: f64,
    /// Standard parallel nearer the equator, radians, planetographic.
    pub(crate) par1: f64,
    /// Standard parallel nearer the cone apex, radians, planetographic.
    pub(crate) par2: f64,
    /// Snyder's cone constant n.
    pub(crate) n: f64,
    /// Snyder's F.
    pub(crate) f: f64,
    /// Radius of the parallel through the center latitude.
    pub(crate) rho: f64,
}

impl LambertConformalParams {
    pub(crate) fn from_projection(proj: &mut TriaxialProjection) -> ProjResult<Self> {
        // Defaults: center of the ground range, written back into the group
        if !proj.base.mapping.has_keyword("CenterLongitude") {
            let lon = (proj.minimum_longitude + proj.maximum_longitude) / 2.0;
            proj.base.mapping.set_real("CenterLongitude", lon);
        }
        if !proj.base.mapping.has_keyword("CenterLatitude") {
            let lat = (proj.minimum_latitude + proj.maximum_latitude) / 2.0;
            proj.base.mapping.set_real("CenterLatitude", lat);
        }

        let mut center_longitude = proj.base.mapping.require_float("CenterLongitude")?;
        let mut center_latitude = proj.base.mapping.require_float("CenterLatitude")?;
        let mut par1 = proj.base.mapping.require_float("FirstStandardParallel")?;
        let mut par2 = proj.base.mapping.require_float("SecondStandardParallel")?;

        // Snyder's ellipsoidal series run on planetographic latitudes
        if proj.is_planetocentric() {
            center_latitude = proj.to_planetographic(center_latitude)?;
            par1 = proj.to_planetographic(par1)?;
            par2 = proj.to_planetographic(par2)?;
        }

        if center_longitude.abs() > 360.0 {
            return Err(ProjError::invalid_keyword(
                "CenterLongitude",
                format!("[{center_longitude}] must be between -360 and 360"),
            ));
        }
        center_longitude *= DEG_TO_RAD;
        if proj.is_positive_west() {
            center_longitude *= -1.0;
        }

        if par1.abs() > 90.0 || par2.abs() > 90.0 {
            return Err(ProjError::invalid_parameter(
                "standard parallels must be between -90 and 90",
            ));
        }
        if (par1 + par2).abs() < f64::EPSILON {
            return Err(ProjError::invalid_parameter(
                "standard parallels cannot be symmetric to the equator",
            ));
        }

        // Order the parallels so par2 is nearest the cone apex
        if par1.abs() > par2.abs() {
            std::mem::swap(&mut par1, &mut par2);
        }

        // The pole opposite the apex projects to infinity and cannot be
        // the projection origin
        if par2 < 0.0 && (90.0 - center_latitude).abs() < f64::EPSILON {
            return Err(ProjError::invalid_keyword(
                "CenterLatitude",
                format!(
                    "[{center_latitude}] projects to infinity for standard parallels \
                     [{par1},{par2}]"
                ),
            ));
        }
        if par2 > 0.0 && (-90.0 - center_latitude).abs() < f64::EPSILON {
            return Err(ProjError::invalid_keyword(
                "CenterLatitude",
                format!(
                    "[{center_latitude}] projects to infinity for standard parallels \
                     [{par1},{par2}]"
                ),
            ));
        }

        let center_latitude = center_latitude * DEG_TO_RAD;
        let par1 = par1 * DEG_TO_RAD;
        let par2 = par2 * DEG_TO_RAD;

        let m1 = proj.m_compute(par1.sin(), par1.cos());
        let t1 = proj.t_compute(par1, par1.sin());
        let m2 = proj.m_compute(par2.sin(), par2.cos());
        let t2 = proj.t_compute(par2, par2.sin());
        let t_center = proj.t_compute(center_latitude, center_latitude.sin());

        let n = if (par1 - par2).abs() >= f64::EPSILON {
            (m1 / m2).ln() / (t1 / t2).ln()
        } else {
            par1.sin()
        };
        let f = m1 / (n * t1.powf(n));
        let rho = proj.equatorial_radius * f * t_center.powf(n);

        Ok(Self {
            center_longitude,
            center_latitude,
            par1,
            par2,
            n,
            f,
            rho,
        })
    }

    pub(crate) fn true_scale_latitude(&self) -> f64 {
        self.par1 * RAD_TO_DEG
    }
}

pub(crate) fn set_ground(
    proj: &mut TriaxialProjection,
    params: &LambertConformalParams,
    lat: f64,
    lon: f64,
) -> bool {
    if lat.abs() > 90.0 {
        proj.base.good = false;
        return false;
    }
    proj.longitude = lon;
    proj.latitude = lat;

    let mut lon_radians = lon * DEG_TO_RAD;
    if proj.is_positive_west() {
        lon_radians *= -1.0;
    }

    let mut lat_graphic = lat;
    if proj.is_planetocentric() {
        lat_graphic = proj.lat_to_planetographic(lat);
    }
    let lat_radians = lat_graphic * DEG_TO_RAD;

    let rh;
    if (lat_radians.abs() - HALF_PI).abs() < f64::EPSILON {
        // only the pole on the apex side projects
        if lat_radians * params.n <= 0.0 {
            proj.base.good = false;
            return false;
        }
        rh = 0.0;
    } else {
        let t = proj.t_compute(lat_radians, lat_radians.sin());
        rh = proj.equatorial_radius * params.f * t.powf(params.n);
    }

    let theta = params.n * (lon_radians - params.center_longitude);
    let x = rh * theta.sin();
    let y = params.rho - rh * theta.cos();
    proj.base.set_computed_xy(x, y);

    proj.base.good = true;
    true
}

pub(crate) fn set_coordinate(
    proj: &mut TriaxialProjection,
    params: &LambertConformalParams,
    x: f64,
    y: f64,
) -> bool {
    proj.base.set_xy(x, y);

    let sign = if params.n >= 0.0 { 1.0 } else { -1.0 };

    let temp = params.rho - proj.base.get_y();
    let rh = sign * (proj.base.get_x() * proj.base.get_x() + temp * temp).sqrt();

    let theta = if rh != 0.0 {
        (sign * proj.base.get_x()).atan2(sign * temp)
    } else {
        0.0
    };

    let mut latitude = if rh != 0.0 || params.n > 0.0 {
        let t = (rh / (proj.equatorial_radius * params.f)).powf(1.0 / params.n);
        match proj.phi2_compute(t) {
            Ok(phi) => phi,
            // eccentricity is validated at construction, so phi2 always
            // converges for a well-formed projection object
            Err(err) => panic!("{err}"),
        }
    } else {
        -HALF_PI
    };
    let mut longitude = theta / params.n + params.center_longitude;

    latitude *= RAD_TO_DEG;
    longitude *= RAD_TO_DEG;

    if proj.is_positive_west() {
        longitude *= -1.0;
    }
    // no domain fold: conic coordinates do not wrap

    if proj.is_planetocentric() {
        latitude = proj.lat_to_planetocentric(latitude);
    }

    proj.latitude = latitude;
    proj.longitude = longitude;
    proj.base.good = true;
    true
}

pub(crate) fn xy_range(
    proj: &mut TriaxialProjection,
    params: &LambertConformalParams,
) -> Option<CoordRange> {
    let mut range = CoordRange::new();

    proj.xy_range_check(&mut range, proj.minimum_latitude, proj.minimum_longitude);
    proj.xy_range_check(&mut range, proj.minimum_latitude, proj.maximum_longitude);
    proj.xy_range_check(&mut range, proj.maximum_latitude, proj.minimum_longitude);
    proj.xy_range_check(&mut range, proj.maximum_latitude, proj.maximum_longitude);

    // Which pole the cone apex sits over. par2 is nearest the apex.
    let north_hemi = !(params.par2 < 0.0 || (params.par1 == params.par2 && params.par1 < 0.0));

    // set_ground applies the positive-west flip itself, so hand it the
    // label-native center longitude
    let mut center_lon_deg = params.center_longitude * RAD_TO_DEG;
    if proj.is_positive_west() {
        center_lon_deg *= -1.0;
    }

    // Probe where the meridian opposite the center crosses the edge
    // nearest the apex; the arc bulges outward between the corners there.
    let (pole_lat, edge_lat) = if north_hemi {
        (90.0, proj.minimum_latitude)
    } else {
        (-90.0, proj.maximum_latitude)
    };

    if !proj.set_ground(pole_lat, center_lon_deg) {
        return None;
    }
    let pole_y = proj.y_coord();

    if !proj.set_ground(edge_lat, center_lon_deg) {
        return None;
    }
    let edge_y = proj.y_coord();

    let y = if north_hemi {
        edge_y + 2.0 * (pole_y - edge_y)
    } else {
        edge_y - 2.0 * (edge_y - pole_y)
    };
    if !proj.set_coordinate(proj.x_coord(), y) {
        return None;
    }

    let lon_diff = (center_lon_deg - proj.longitude()).abs() / 2.0;
    let mut lon = center_lon_deg - lon_diff;
    for _ in 0..3 {
        if lon >= proj.minimum_longitude && lon <= proj.maximum_longitude {
            proj.xy_range_check(&mut range, edge_lat, lon);
        }
        lon += lon_diff;
    }

    if range.is_ordered() {
        Some(range)
    } else {
        None
    }
}
