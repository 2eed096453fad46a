//! Orthographic projection: the view of the sphere from infinity, centered
//! on an arbitrary (latitude, longitude). Oblique aspect, so XY-range
//! extrema are found by the numerical edge search rather than at corners.

use planetmap_core::constants::{DEG_TO_RAD, HALF_PI, RAD_TO_DEG};
use planetmap_core::{wrap_180, wrap_360};

use crate::error::{ProjError, ProjResult};
use crate::label::KeywordProvider;

use super::TriaxialProjection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicParams {
    /// Center longitude in radians, positive east.
    pub(crate) center_longitude: f64,
    /// Center latitude in radians, planetographic.
    pub(crate) center_latitude: f64,
    pub(crate) sin_center_lat: f64,
    pub(crate) cos_center_lat: f64,
}

impl OrthographicParams {
    pub(crate) fn from_projection(proj: &mut TriaxialProjection) -> ProjResult<Self> {
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

        if proj.is_planetocentric() {
            center_latitude = proj.to_planetographic(center_latitude)?;
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
        center_latitude *= DEG_TO_RAD;

        let sin_center_lat = center_latitude.sin();
        let cos_center_lat = center_latitude.cos();

        if proj.has_ground_range() {
            if proj.maximum_longitude - proj.minimum_longitude > 360.0 {
                return Err(ProjError::invalid_parameter(
                    "the longitude range cannot exceed 360 degrees",
                ));
            }

            // Pull the latitude range inside the visible hemisphere. The
            // horizon at the center longitude is where
            // sin(φ0)sin(φ) + cos(φ0)cos(φ) = 0.
            let horizon_lat = (-cos_center_lat).atan2(sin_center_lat) * RAD_TO_DEG;

            let min_lat_rad = proj.minimum_latitude * DEG_TO_RAD;
            if sin_center_lat * min_lat_rad.sin() + cos_center_lat * min_lat_rad.cos() < 1.0e-10
                && horizon_lat > proj.minimum_latitude
            {
                proj.minimum_latitude = horizon_lat;
            }

            let max_lat_rad = proj.maximum_latitude * DEG_TO_RAD;
            if sin_center_lat * max_lat_rad.sin() + cos_center_lat * max_lat_rad.cos() < 1.0e-10
                && horizon_lat < proj.maximum_latitude
                && horizon_lat > proj.minimum_latitude
            {
                proj.maximum_latitude = horizon_lat;
            }
        }

        Ok(Self {
            center_longitude,
            center_latitude,
            sin_center_lat,
            cos_center_lat,
        })
    }

    pub(crate) fn true_scale_latitude(&self) -> f64 {
        // scale is true only at the single center point
        self.center_latitude * RAD_TO_DEG
    }
}

pub(crate) fn set_ground(
    proj: &mut TriaxialProjection,
    params: &OrthographicParams,
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

    let delta_lon = lon_radians - params.center_longitude;
    let sin_phi = lat_radians.sin();
    let cos_phi = lat_radians.cos();
    let cos_lon = delta_lon.cos();

    // points beyond the limb are not visible
    let g = params.sin_center_lat * sin_phi + params.cos_center_lat * cos_phi * cos_lon;
    if g <= 0.0 && g.abs() > 1.0e-10 {
        proj.base.good = false;
        return false;
    }

    let x = proj.equatorial_radius * cos_phi * delta_lon.sin();
    let y = proj.equatorial_radius
        * (params.cos_center_lat * sin_phi - params.sin_center_lat * cos_phi * cos_lon);

    proj.base.set_computed_xy(x, y);
    proj.base.good = true;
    true
}

pub(crate) fn set_coordinate(
    proj: &mut TriaxialProjection,
    params: &OrthographicParams,
    x: f64,
    y: f64,
) -> bool {
    const EPSILON: f64 = 1.0e-10;

    proj.base.set_xy(x, y);

    let gx = proj.base.get_x();
    let gy = proj.base.get_y();
    let rho = (gx * gx + gy * gy).sqrt();

    if rho > proj.equatorial_radius {
        proj.base.good = false;
        return false;
    }

    let mut longitude = params.center_longitude;
    let mut latitude;
    if rho.abs() <= EPSILON {
        latitude = params.center_latitude;
    } else {
        let z = (rho / proj.equatorial_radius).clamp(-1.0, 1.0).asin();
        let sin_z = z.sin();
        let cos_z = z.cos();

        let con = (cos_z * params.sin_center_lat + gy * sin_z * params.cos_center_lat / rho)
            .clamp(-1.0, 1.0);
        latitude = con.asin();

        if (params.center_latitude.abs() - HALF_PI).abs() <= EPSILON {
            // polar aspect: longitude reads straight off the plane
            if params.center_latitude >= 0.0 {
                longitude += gx.atan2(-gy);
            } else {
                longitude += gx.atan2(gy);
            }
        } else {
            let con = cos_z - params.sin_center_lat * latitude.sin();
            if con.abs() >= EPSILON || gx.abs() >= EPSILON {
                longitude += (gx * sin_z * params.cos_center_lat).atan2(con * rho);
            }
        }
    }

    latitude *= RAD_TO_DEG;
    longitude *= RAD_TO_DEG;

    if proj.is_positive_west() {
        longitude *= -1.0;
    }
    longitude = wrap_360(longitude);
    if proj.longitude_domain == 180 {
        longitude = wrap_180(longitude);
    }

    if proj.is_planetocentric() {
        latitude = proj.lat_to_planetocentric(latitude);
    }

    proj.latitude = latitude;
    proj.longitude = longitude;
    proj.base.good = true;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{KeywordGroup, Label};
    use planetmap_core::assert_ulp_lt;

    const RADIUS: f64 = 6370997.0;

    fn oblique_label() -> Label {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_text("ProjectionName", "Orthographic")
            .set_real("EquatorialRadius", RADIUS)
            .set_real("PolarRadius", RADIUS)
            .set_text("LatitudeType", "Planetocentric")
            .set_text("LongitudeDirection", "PositiveEast")
            .set_integer("LongitudeDomain", 360)
            .set_real("MinimumLatitude", 20.0)
            .set_real("MaximumLatitude", 60.0)
            .set_real("MinimumLongitude", 240.0)
            .set_real("MaximumLongitude", 300.0)
            .set_real("CenterLatitude", 40.0)
            .set_real("CenterLongitude", 260.0)
            .set_real("PixelResolution", 1000.0);
        label.add_group(grp);
        label
    }

    #[test]
    fn test_name_and_true_scale() {
        let proj = TriaxialProjection::orthographic(&oblique_label()).unwrap();
        assert_eq!(proj.name(), "Orthographic");
        assert_ulp_lt!(proj.true_scale_latitude(), 40.0, 8);
    }

    #[test]
    fn test_center_projects_to_origin() {
        let mut proj = TriaxialProjection::orthographic(&oblique_label()).unwrap();
        assert!(proj.set_ground(40.0, 260.0));
        assert!(proj.x_coord().abs() < 1.0e-6);
        assert!(proj.y_coord().abs() < 1.0e-6);
    }

    #[test]
    fn test_snyder_oblique_forward() {
        // Snyder 1987 oblique example: R = 1, center (40, -100), point
        // (30, -110) maps to x = -0.1503837, y = -0.1651911
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_real("EquatorialRadius", 1.0)
            .set_real("PolarRadius", 1.0)
            .set_text("LatitudeType", "Planetocentric")
            .set_text("LongitudeDirection", "PositiveEast")
            .set_integer("LongitudeDomain", 180)
            .set_real("CenterLatitude", 40.0)
            .set_real("CenterLongitude", -100.0);
        label.add_group(grp);
        let mut proj = TriaxialProjection::orthographic(&label).unwrap();

        assert!(proj.set_ground(30.0, -110.0));
        assert!((proj.x_coord() - (-0.1503837)).abs() < 1.0e-6);
        assert!((proj.y_coord() - (-0.1651911)).abs() < 1.0e-6);
    }

    #[test]
    fn test_forward_inverse_roundtrip() {
        let mut proj = TriaxialProjection::orthographic(&oblique_label()).unwrap();
        for lat in [20.0, 35.0, 40.0, 59.0] {
            for lon in [241.0, 260.0, 299.0] {
                assert!(proj.set_ground(lat, lon), "({lat}, {lon}) did not project");
                let (x, y) = (proj.x_coord(), proj.y_coord());
                assert!(proj.set_coordinate(x, y));
                assert!((proj.latitude() - lat).abs() < 1.0e-6);
                assert!((proj.longitude() - lon).abs() < 1.0e-6);
            }
        }
    }

    #[test]
    fn test_far_side_rejected() {
        let mut proj = TriaxialProjection::orthographic(&oblique_label()).unwrap();
        // the antipode of the center is behind the limb
        assert!(!proj.set_ground(-40.0, 80.0));
        assert!(!proj.is_good());
    }

    #[test]
    fn test_point_off_the_disk_rejected() {
        let mut proj = TriaxialProjection::orthographic(&oblique_label()).unwrap();
        assert!(!proj.set_coordinate(RADIUS * 1.5, 0.0));
        assert!(!proj.is_good());
    }

    #[test]
    fn test_xy_range_uses_oblique_search() {
        let mut proj = TriaxialProjection::orthographic(&oblique_label()).unwrap();
        let range = proj.xy_range().unwrap();
        assert!(range.is_ordered());

        // every probe-able edge point lands inside the found range, to
        // within the half-pixel search tolerance
        let tolerance = proj.pixel_resolution();
        let (min_lat, max_lat) = (proj.minimum_latitude(), proj.maximum_latitude());
        let (min_lon, max_lon) = (proj.minimum_longitude(), proj.maximum_longitude());
        let mut sample = |lat: f64, lon: f64, proj: &mut TriaxialProjection| {
            if proj.set_ground(lat, lon) {
                assert!(proj.x_coord() >= range.min_x - tolerance);
                assert!(proj.x_coord() <= range.max_x + tolerance);
                assert!(proj.y_coord() >= range.min_y - tolerance);
                assert!(proj.y_coord() <= range.max_y + tolerance);
            }
        };
        for step in 0..=20 {
            let lat = min_lat + (max_lat - min_lat) * step as f64 / 20.0;
            sample(lat, min_lon, &mut proj);
            sample(lat, max_lon, &mut proj);
            let lon = min_lon + (max_lon - min_lon) * step as f64 / 20.0;
            sample(min_lat, lon, &mut proj);
            sample(max_lat, lon, &mut proj);
        }
    }

    #[test]
    fn test_polar_aspect_inverse() {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_real("EquatorialRadius", 1.0)
            .set_real("PolarRadius", 1.0)
            .set_text("LatitudeType", "Planetocentric")
            .set_text("LongitudeDirection", "PositiveEast")
            .set_integer("LongitudeDomain", 360)
            .set_real("CenterLatitude", 90.0)
            .set_real("CenterLongitude", 0.0);
        label.add_group(grp);
        let mut proj = TriaxialProjection::orthographic(&label).unwrap();

        assert!(proj.set_ground(60.0, 45.0));
        let (x, y) = (proj.x_coord(), proj.y_coord());
        assert!(proj.set_coordinate(x, y));
        assert!((proj.latitude() - 60.0).abs() < 1.0e-6);
        assert!((proj.longitude() - 45.0).abs() < 1.0e-6);
    }
}
