//! Triaxial-body projections: latitude/longitude ground coordinates.
//!
//! [`TriaxialProjection`] owns the ellipsoid geometry (equatorial and polar
//! radii), the latitude-type / longitude-direction / longitude-domain
//! conventions, the ground range, and the last-set ground coordinate. The
//! projection family — the actual forward/inverse math — is a closed
//! [`TriaxialShape`] variant; each family lives in its own module as free
//! functions over the shared state.
//!
//! The oblique XY-range machinery ([`TriaxialProjection::xy_range_oblique`])
//! walks the four ground-range edges with a bounded fixed-point search,
//! detecting projection discontinuities by non-convergence and re-searching
//! along them for extra accuracy.

use planetmap_core::constants::{DEG_TO_RAD, HALF_PI, RAD_TO_DEG};
use planetmap_core::utils::{fuzzy_eq, is_null};
use planetmap_core::{wrap_180, wrap_360};

use crate::base::{CoordRange, ProjectionBase, ProjectionType};
use crate::conventions;
use crate::error::{ProjError, ProjResult};
use crate::label::{KeywordGroup, KeywordProvider, Label};
use crate::targets::target_radii;

pub mod lambert_conformal;
pub mod orthographic;
pub mod sinusoidal;

pub use lambert_conformal::LambertConformalParams;
pub use orthographic::OrthographicParams;
pub use sinusoidal::SinusoidalParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatitudeType {
    Planetocentric,
    Planetographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudeDirection {
    PositiveEast,
    PositiveWest,
}

/// The projection family plugged into the shared triaxial machinery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriaxialShape {
    /// No-op projection: x = longitude, y = latitude. Fallback used by
    /// bare instances and coordinate-reporting tools.
    Identity,
    Sinusoidal(SinusoidalParams),
    LambertConformal(LambertConformalParams),
    Orthographic(OrthographicParams),
}

impl TriaxialShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Sinusoidal(_) => "Sinusoidal",
            Self::LambertConformal(_) => "LambertConformal",
            Self::Orthographic(_) => "Orthographic",
        }
    }

    pub fn version(&self) -> &'static str {
        "1.0"
    }

    fn extra_mapping_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Identity => &[],
            Self::Sinusoidal(_) => &["CenterLongitude"],
            Self::LambertConformal(_) => &[
                "CenterLatitude",
                "CenterLongitude",
                "FirstStandardParallel",
                "SecondStandardParallel",
            ],
            Self::Orthographic(_) => &["CenterLatitude", "CenterLongitude"],
        }
    }

    fn extra_latitude_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Identity | Self::Sinusoidal(_) => &[],
            Self::LambertConformal(_) => &[
                "CenterLatitude",
                "FirstStandardParallel",
                "SecondStandardParallel",
            ],
            Self::Orthographic(_) => &["CenterLatitude"],
        }
    }

    fn extra_longitude_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Identity => &[],
            Self::Sinusoidal(_) | Self::LambertConformal(_) | Self::Orthographic(_) => {
                &["CenterLongitude"]
            }
        }
    }
}

/// A map projection over a triaxial body.
#[derive(Debug)]
pub struct TriaxialProjection {
    pub(crate) base: ProjectionBase,
    pub(crate) equatorial_radius: f64,
    pub(crate) polar_radius: f64,
    pub(crate) eccentricity: f64,
    pub(crate) latitude_type: LatitudeType,
    pub(crate) longitude_direction: LongitudeDirection,
    pub(crate) longitude_domain: i32,
    pub(crate) minimum_latitude: f64,
    pub(crate) maximum_latitude: f64,
    pub(crate) minimum_longitude: f64,
    pub(crate) maximum_longitude: f64,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) shape: TriaxialShape,
}

impl TriaxialProjection {
    /// Constructs the identity (no-op) projection from a label.
    pub fn from_label(label: &Label) -> ProjResult<Self> {
        Self::build(label).map_err(ProjError::into_mapping_failure)
    }

    /// Constructs a sinusoidal projection from a label.
    pub fn sinusoidal(label: &Label) -> ProjResult<Self> {
        Self::build(label)
            .and_then(|mut proj| {
                let params = SinusoidalParams::from_projection(&mut proj)?;
                proj.shape = TriaxialShape::Sinusoidal(params);
                Ok(proj)
            })
            .map_err(ProjError::into_mapping_failure)
    }

    /// Constructs a Lambert conformal conic projection from a label.
    pub fn lambert_conformal(label: &Label) -> ProjResult<Self> {
        Self::build(label)
            .and_then(|mut proj| {
                let params = LambertConformalParams::from_projection(&mut proj)?;
                proj.shape = TriaxialShape::LambertConformal(params);
                Ok(proj)
            })
            .map_err(ProjError::into_mapping_failure)
    }

    /// Constructs an orthographic projection from a label.
    pub fn orthographic(label: &Label) -> ProjResult<Self> {
        Self::build(label)
            .and_then(|mut proj| {
                let params = OrthographicParams::from_projection(&mut proj)?;
                proj.shape = TriaxialShape::Orthographic(params);
                Ok(proj)
            })
            .map_err(ProjError::into_mapping_failure)
    }

    fn build(label: &Label) -> ProjResult<Self> {
        let base = ProjectionBase::from_label(label)?;
        let grp = &base.mapping;

        // Radii come from the label keywords, or from the target-body
        // table when only a TargetName is given.
        let (equatorial_radius, polar_radius) = if grp.has_keyword("EquatorialRadius")
            && grp.has_keyword("PolarRadius")
        {
            (
                grp.require_float("EquatorialRadius")?,
                grp.require_float("PolarRadius")?,
            )
        } else if let Some(target) = grp.get_string("TargetName") {
            target_radii(&target).ok_or_else(|| {
                ProjError::invalid_parameter(format!(
                    "No target radii are available through keywords [EquatorialRadius and \
                     PolarRadius] or [TargetName]; target [{target}] is not recognized"
                ))
            })?
        } else {
            return Err(ProjError::invalid_parameter(
                "No target radii are available through keywords [EquatorialRadius and \
                 PolarRadius] or [TargetName]",
            ));
        };

        if equatorial_radius <= 0.0 {
            return Err(ProjError::invalid_keyword(
                "EquatorialRadius",
                "must be greater than zero",
            ));
        }
        if polar_radius <= 0.0 {
            return Err(ProjError::invalid_keyword(
                "PolarRadius",
                "must be greater than zero",
            ));
        }
        if equatorial_radius < polar_radius {
            return Err(ProjError::invalid_parameter(format!(
                "[EquatorialRadius] = {equatorial_radius} must be greater than or equal to \
                 [PolarRadius] = {polar_radius}"
            )));
        }

        let latitude_type = match grp.require_string("LatitudeType")?.as_str() {
            "Planetographic" => LatitudeType::Planetographic,
            "Planetocentric" => LatitudeType::Planetocentric,
            _ => {
                return Err(ProjError::invalid_keyword(
                    "LatitudeType",
                    "must be [Planetographic or Planetocentric]",
                ))
            }
        };

        let longitude_direction = match grp.require_string("LongitudeDirection")?.as_str() {
            "PositiveWest" => LongitudeDirection::PositiveWest,
            "PositiveEast" => LongitudeDirection::PositiveEast,
            _ => {
                return Err(ProjError::invalid_keyword(
                    "LongitudeDirection",
                    "must be [PositiveWest or PositiveEast]",
                ))
            }
        };

        let longitude_domain = match grp.get_int("LongitudeDomain") {
            Some(360) => 360,
            Some(180) => 180,
            Some(_) => {
                return Err(ProjError::invalid_keyword(
                    "LongitudeDomain",
                    "must be [180 or 360]",
                ))
            }
            None => return Err(ProjError::missing_keyword("LongitudeDomain")),
        };

        let mut ground_range_good = false;
        let mut minimum_latitude = 0.0;
        let mut maximum_latitude = 0.0;
        let mut minimum_longitude = 0.0;
        let mut maximum_longitude = 0.0;
        if grp.has_keyword("MinimumLatitude")
            && grp.has_keyword("MaximumLatitude")
            && grp.has_keyword("MinimumLongitude")
            && grp.has_keyword("MaximumLongitude")
        {
            minimum_latitude = grp.require_float("MinimumLatitude")?;
            maximum_latitude = grp.require_float("MaximumLatitude")?;
            minimum_longitude = grp.require_float("MinimumLongitude")?;
            maximum_longitude = grp.require_float("MaximumLongitude")?;

            if !(-90.0..=90.0).contains(&minimum_latitude) {
                return Err(ProjError::invalid_keyword(
                    "MinimumLatitude",
                    format!("[{minimum_latitude}] is outside the range of [-90:90]"),
                ));
            }
            if !(-90.0..=90.0).contains(&maximum_latitude) {
                return Err(ProjError::invalid_keyword(
                    "MaximumLatitude",
                    format!("[{maximum_latitude}] is outside the range of [-90:90]"),
                ));
            }
            if minimum_latitude >= maximum_latitude {
                return Err(ProjError::invalid_parameter(format!(
                    "[MinimumLatitude,MaximumLatitude] of \
                     [{minimum_latitude},{maximum_latitude}] are not properly ordered"
                )));
            }
            if minimum_longitude >= maximum_longitude {
                return Err(ProjError::invalid_parameter(format!(
                    "[MinimumLongitude,MaximumLongitude] of \
                     [{minimum_longitude},{maximum_longitude}] are not properly ordered"
                )));
            }
            ground_range_good = true;
        }

        let eccentricity =
            (1.0 - (polar_radius * polar_radius) / (equatorial_radius * equatorial_radius)).sqrt();

        let mut base = base;
        base.ground_range_good = ground_range_good;

        Ok(Self {
            base,
            equatorial_radius,
            polar_radius,
            eccentricity,
            latitude_type,
            longitude_direction,
            longitude_domain,
            minimum_latitude,
            maximum_latitude,
            minimum_longitude,
            maximum_longitude,
            latitude: planetmap_core::NULL_REAL,
            longitude: planetmap_core::NULL_REAL,
            shape: TriaxialShape::Identity,
        })
    }

    #[inline]
    pub fn projection_type(&self) -> ProjectionType {
        ProjectionType::Triaxial
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.shape.name()
    }

    #[inline]
    pub fn version(&self) -> &'static str {
        self.shape.version()
    }

    #[inline]
    pub fn shape(&self) -> &TriaxialShape {
        &self.shape
    }

    #[inline]
    pub fn equatorial_radius(&self) -> f64 {
        self.equatorial_radius
    }

    #[inline]
    pub fn polar_radius(&self) -> f64 {
        self.polar_radius
    }

    /// Eccentricity of the body, in [0, 1); 0 for a sphere.
    #[inline]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    #[inline]
    pub fn latitude_type(&self) -> LatitudeType {
        self.latitude_type
    }

    #[inline]
    pub fn is_planetocentric(&self) -> bool {
        self.latitude_type == LatitudeType::Planetocentric
    }

    #[inline]
    pub fn is_planetographic(&self) -> bool {
        self.latitude_type == LatitudeType::Planetographic
    }

    pub fn latitude_type_string(&self) -> &'static str {
        match self.latitude_type {
            LatitudeType::Planetographic => "Planetographic",
            LatitudeType::Planetocentric => "Planetocentric",
        }
    }

    #[inline]
    pub fn longitude_direction(&self) -> LongitudeDirection {
        self.longitude_direction
    }

    #[inline]
    pub fn is_positive_east(&self) -> bool {
        self.longitude_direction == LongitudeDirection::PositiveEast
    }

    #[inline]
    pub fn is_positive_west(&self) -> bool {
        self.longitude_direction == LongitudeDirection::PositiveWest
    }

    pub fn longitude_direction_string(&self) -> &'static str {
        match self.longitude_direction {
            LongitudeDirection::PositiveEast => "PositiveEast",
            LongitudeDirection::PositiveWest => "PositiveWest",
        }
    }

    #[inline]
    pub fn longitude_domain(&self) -> i32 {
        self.longitude_domain
    }

    #[inline]
    pub fn has_180_domain(&self) -> bool {
        self.longitude_domain == 180
    }

    #[inline]
    pub fn has_360_domain(&self) -> bool {
        self.longitude_domain == 360
    }

    pub fn longitude_domain_string(&self) -> &'static str {
        if self.longitude_domain == 360 {
            "360"
        } else {
            "180"
        }
    }

    /// Valid only when [`Self::has_ground_range`] is true.
    #[inline]
    pub fn minimum_latitude(&self) -> f64 {
        self.minimum_latitude
    }

    #[inline]
    pub fn maximum_latitude(&self) -> f64 {
        self.maximum_latitude
    }

    #[inline]
    pub fn minimum_longitude(&self) -> f64 {
        self.minimum_longitude
    }

    #[inline]
    pub fn maximum_longitude(&self) -> f64 {
        self.maximum_longitude
    }

    /// Last-set latitude in the projection's native latitude type. Valid
    /// only when [`Self::is_good`].
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Last-set longitude in the projection's native direction and domain.
    /// Valid only when [`Self::is_good`].
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub fn is_good(&self) -> bool {
        self.base.is_good()
    }

    #[inline]
    pub fn x_coord(&self) -> f64 {
        self.base.x_coord()
    }

    #[inline]
    pub fn y_coord(&self) -> f64 {
        self.base.y_coord()
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        self.base.rotation()
    }

    #[inline]
    pub fn pixel_resolution(&self) -> f64 {
        self.base.pixel_resolution()
    }

    #[inline]
    pub fn is_sky(&self) -> bool {
        self.base.is_sky()
    }

    #[inline]
    pub fn has_ground_range(&self) -> bool {
        self.base.has_ground_range()
    }

    #[inline]
    pub fn mapping_group(&self) -> &KeywordGroup {
        self.base.mapping_group()
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.base.resolution()
    }

    pub fn set_world_mapper(&mut self, mapper: Box<dyn crate::mapper::WorldMapper>) {
        self.base.set_world_mapper(mapper);
    }

    pub fn set_upper_left_corner(&mut self, x: f64, y: f64) {
        self.base.set_upper_left_corner(x, y);
    }

    #[inline]
    pub fn world_x(&self) -> f64 {
        self.base.world_x()
    }

    #[inline]
    pub fn world_y(&self) -> f64 {
        self.base.world_y()
    }

    pub fn to_world_x(&self, projection_x: f64) -> ProjResult<f64> {
        self.base.to_world_x(projection_x)
    }

    pub fn to_world_y(&self, projection_y: f64) -> ProjResult<f64> {
        self.base.to_world_y(projection_y)
    }

    pub fn to_projection_x(&self, world_x: f64) -> ProjResult<f64> {
        self.base.to_projection_x(world_x)
    }

    pub fn to_projection_y(&self, world_y: f64) -> ProjResult<f64> {
        self.base.to_projection_y(world_y)
    }

    /// Converts a latitude to planetographic using this body's radii.
    pub fn to_planetographic(&self, latitude: f64) -> ProjResult<f64> {
        conventions::to_planetographic(latitude, self.equatorial_radius, self.polar_radius)
    }

    /// Converts a latitude to planetocentric using this body's radii.
    pub fn to_planetocentric(&self, latitude: f64) -> ProjResult<f64> {
        conventions::to_planetocentric(latitude, self.equatorial_radius, self.polar_radius)
    }

    // Unchecked latitude-type conversions for internal use on values that
    // have already been validated.
    pub(crate) fn lat_to_planetographic(&self, latitude: f64) -> f64 {
        if latitude.abs() < 90.0 {
            let ratio = self.equatorial_radius / self.polar_radius;
            ((latitude * DEG_TO_RAD).tan() * ratio * ratio).atan() * RAD_TO_DEG
        } else {
            latitude
        }
    }

    pub(crate) fn lat_to_planetocentric(&self, latitude: f64) -> f64 {
        if latitude.abs() < 90.0 {
            let ratio = self.polar_radius / self.equatorial_radius;
            ((latitude * DEG_TO_RAD).tan() * ratio * ratio).atan() * RAD_TO_DEG
        } else {
            latitude
        }
    }

    /// Sets the ground coordinate in the projection's native conventions
    /// and computes the plane coordinate. Soft failure: a sentinel or
    /// geometrically invalid input returns false and leaves the instance
    /// not-good, without an error.
    pub fn set_ground(&mut self, latitude: f64, longitude: f64) -> bool {
        if is_null(latitude) || is_null(longitude) {
            self.base.good = false;
            return false;
        }
        match self.shape {
            TriaxialShape::Identity => {
                if latitude.abs() > 90.0 {
                    self.base.good = false;
                    return false;
                }
                self.latitude = latitude;
                self.longitude = longitude;
                self.base.good = true;
                self.base.set_computed_xy(longitude, latitude);
                self.base.good
            }
            TriaxialShape::Sinusoidal(p) => sinusoidal::set_ground(self, &p, latitude, longitude),
            TriaxialShape::LambertConformal(p) => {
                lambert_conformal::set_ground(self, &p, latitude, longitude)
            }
            TriaxialShape::Orthographic(p) => {
                orthographic::set_ground(self, &p, latitude, longitude)
            }
        }
    }

    /// Sets the plane coordinate and recovers the ground coordinate.
    /// Same soft-failure contract as [`Self::set_ground`].
    pub fn set_coordinate(&mut self, x: f64, y: f64) -> bool {
        if is_null(x) || is_null(y) {
            self.base.good = false;
            return false;
        }
        match self.shape {
            TriaxialShape::Identity => {
                self.base.good = true;
                self.base.set_xy(x, y);
                self.latitude = self.base.get_y();
                self.longitude = self.base.get_x();
                true
            }
            TriaxialShape::Sinusoidal(p) => sinusoidal::set_coordinate(self, &p, x, y),
            TriaxialShape::LambertConformal(p) => {
                lambert_conformal::set_coordinate(self, &p, x, y)
            }
            TriaxialShape::Orthographic(p) => orthographic::set_coordinate(self, &p, x, y),
        }
    }

    /// Sets the ground from a universal coordinate: planetocentric
    /// latitude, positive-east longitude in the 360 domain. The inputs are
    /// converted to the instance's native conventions first.
    pub fn set_universal_ground(&mut self, latitude: f64, longitude: f64) -> bool {
        if is_null(latitude) || is_null(longitude) {
            self.base.good = false;
            return false;
        }
        let mut lon = longitude;
        if self.is_positive_west() {
            lon = -longitude;
        }
        // direction adjustment can leave (-360, 0), so fold even in the
        // 360 domain
        lon = if self.longitude_domain == 180 {
            wrap_180(lon)
        } else {
            wrap_360(lon)
        };

        let lat = if self.is_planetographic() {
            self.lat_to_planetographic(latitude)
        } else {
            latitude
        };

        self.set_ground(lat, lon)
    }

    /// Like [`Self::set_universal_ground`] but skips the domain fold on
    /// longitude, preserving values that legitimately run past the
    /// canonical domain (e.g. accumulating a path across the seam). The
    /// direction conversion still applies.
    pub fn set_unbound_universal_ground(&mut self, latitude: f64, longitude: f64) -> bool {
        if is_null(latitude) || is_null(longitude) {
            self.base.good = false;
            return false;
        }
        let mut lon = longitude;
        if self.is_positive_west() {
            lon = -longitude;
        }

        let lat = if self.is_planetographic() {
            self.lat_to_planetographic(latitude)
        } else {
            latitude
        };

        self.set_ground(lat, lon)
    }

    /// The current latitude as planetocentric degrees, regardless of the
    /// instance's native latitude type.
    pub fn universal_latitude(&self) -> f64 {
        let mut lat = self.latitude;
        if self.is_planetographic() {
            lat = self.lat_to_planetocentric(lat);
        }
        lat
    }

    /// The current longitude as positive-east degrees in the 360 domain,
    /// regardless of the instance's native direction and domain.
    pub fn universal_longitude(&self) -> f64 {
        let mut lon = self.longitude;
        if self.is_positive_west() {
            lon = -lon;
        }
        wrap_360(lon)
    }

    /// Sets the coordinate from world units via the mapper (identity
    /// without one).
    pub fn set_world(&mut self, world_x: f64, world_y: f64) -> bool {
        let (x, y) = self.base.projection_from_world(world_x, world_y);
        self.set_coordinate(x, y)
    }

    /// Ellipsoid radius in meters at the given latitude (native type).
    pub fn local_radius_at(&self, latitude: f64) -> ProjResult<f64> {
        if is_null(latitude) {
            return Err(ProjError::invalid_coordinate(
                "unable to calculate the local radius, the given latitude is invalid",
            ));
        }
        let a = self.equatorial_radius;
        let c = self.polar_radius;
        // spherical bodies need no trig
        if a - c < f64::EPSILON {
            return Ok(a);
        }
        let lat = latitude * DEG_TO_RAD;
        Ok(a * c / ((c * lat.cos()).powi(2) + (a * lat.sin()).powi(2)).sqrt())
    }

    /// Ellipsoid radius at the last-set latitude.
    pub fn local_radius(&self) -> ProjResult<f64> {
        self.local_radius_at(self.latitude)
    }

    /// The latitude at which the projection is locally undistorted, in
    /// degrees. Families without a distinguished parallel use the equator.
    pub fn true_scale_latitude(&self) -> f64 {
        match &self.shape {
            TriaxialShape::Identity | TriaxialShape::Sinusoidal(_) => 0.0,
            TriaxialShape::LambertConformal(p) => p.true_scale_latitude(),
            TriaxialShape::Orthographic(p) => p.true_scale_latitude(),
        }
    }

    /// True if an image projected at longitude 0 matches one projected at
    /// 360 (equatorial cylindrical families only).
    pub fn is_equatorial_cylindrical(&self) -> bool {
        matches!(self.shape, TriaxialShape::Sinusoidal(_))
    }

    /// World units per degree at the true-scale latitude; 1.0 without a
    /// mapper.
    pub fn scale(&self) -> f64 {
        if self.base.mapper.is_none() {
            return 1.0;
        }
        let lat = self.true_scale_latitude() * DEG_TO_RAD;
        let a = self.polar_radius * lat.cos();
        let b = self.equatorial_radius * lat.sin();
        let local_radius = self.equatorial_radius * self.polar_radius / (a * a + b * b).sqrt();
        local_radius / self.base.resolution()
    }

    /// The plane-coordinate range covering the ground range, or None when
    /// no ground range is available or the result degenerates.
    pub fn xy_range(&mut self) -> Option<CoordRange> {
        if !self.base.ground_range_good {
            return None;
        }
        match self.shape {
            TriaxialShape::Identity => Some(CoordRange {
                min_x: self.minimum_longitude,
                max_x: self.maximum_longitude,
                min_y: self.minimum_latitude,
                max_y: self.maximum_latitude,
            }),
            TriaxialShape::Sinusoidal(p) => sinusoidal::xy_range(self, &p),
            TriaxialShape::LambertConformal(p) => lambert_conformal::xy_range(self, &p),
            TriaxialShape::Orthographic(_) => self.xy_range_oblique(),
        }
    }

    /// Probes one ground point and folds the resulting plane coordinate
    /// into the accumulator. Silently skips points the projection cannot
    /// represent.
    pub fn xy_range_check(&mut self, range: &mut CoordRange, latitude: f64, longitude: f64) {
        if is_null(latitude) || is_null(longitude) {
            self.base.good = false;
            return;
        }
        self.set_ground(latitude, longitude);
        if !self.base.good {
            return;
        }
        range.expand(self.base.x, self.base.y);
    }

    /// Whether `longitude` lies within [`min_lon`, `max_lon`], handling
    /// ranges that wrap across the 0°/360° seam. A full 360° range
    /// contains everything.
    pub fn longitude_in_range(min_lon: f64, max_lon: f64, longitude: f64) -> bool {
        let mut adjusted_lon = wrap_360(longitude);
        let mut adjusted_min = wrap_360(min_lon);
        let adjusted_max = wrap_360(max_lon);

        if adjusted_min > adjusted_max {
            if adjusted_lon > adjusted_min {
                adjusted_lon -= 360.0;
            }
            adjusted_min -= 360.0;
        }

        if fuzzy_eq(max_lon - min_lon, 360.0) {
            true
        } else {
            adjusted_min <= adjusted_lon && adjusted_lon <= adjusted_max
        }
    }

    /// Whether `longitude` lies within this projection's ground range.
    pub fn in_longitude_range(&self, longitude: f64) -> bool {
        Self::longitude_in_range(self.minimum_longitude, self.maximum_longitude, longitude)
    }

    /// Whether `latitude` lies within this projection's ground range. A
    /// full 180° range contains everything.
    pub fn in_latitude_range(&self, latitude: f64) -> bool {
        if fuzzy_eq(self.maximum_latitude - self.minimum_latitude, 180.0) {
            true
        } else {
            self.minimum_latitude <= latitude && latitude <= self.maximum_latitude
        }
    }

    /// XY range for oblique-aspect projections, where the extrema do not
    /// fall on the ground-range corners. Walks all four edges with the
    /// bounded search, then re-searches any discontinuities found.
    pub fn xy_range_oblique(&mut self) -> Option<CoordRange> {
        if !self.base.ground_range_good {
            return None;
        }

        let mut special_lats: Vec<f64> = Vec::new();
        let mut special_lons: Vec<f64> = Vec::new();
        let mut range = CoordRange::new();

        for find_min in [true, false] {
            for search_x in [true, false] {
                // along each fixed longitude, varying latitude
                for lon in [self.minimum_longitude, self.maximum_longitude] {
                    if let Some(value) = self.do_search(
                        self.minimum_latitude,
                        self.maximum_latitude,
                        lon,
                        search_x,
                        true,
                        find_min,
                        &mut special_lats,
                    ) {
                        fold_extreme(&mut range, search_x, find_min, value);
                    }
                }
                // along each fixed latitude, varying longitude
                for lat in [self.minimum_latitude, self.maximum_latitude] {
                    if let Some(value) = self.do_search(
                        self.minimum_longitude,
                        self.maximum_longitude,
                        lat,
                        search_x,
                        false,
                        find_min,
                        &mut special_lons,
                    ) {
                        fold_extreme(&mut range, search_x, find_min, value);
                    }
                }
            }
        }

        // A discontinuity crossing the range can hide extrema from the
        // edge walks; search along each one directly.
        let mut scratch: Vec<f64> = Vec::new();
        for lat in special_lats {
            for find_min in [true, false] {
                for search_x in [true, false] {
                    if let Some(value) = self.do_search(
                        self.minimum_longitude,
                        self.maximum_longitude,
                        lat,
                        search_x,
                        false,
                        find_min,
                        &mut scratch,
                    ) {
                        fold_extreme(&mut range, search_x, find_min, value);
                    }
                }
            }
        }
        for lon in special_lons {
            for find_min in [true, false] {
                for search_x in [true, false] {
                    if let Some(value) = self.do_search(
                        self.minimum_latitude,
                        self.maximum_latitude,
                        lon,
                        search_x,
                        true,
                        find_min,
                        &mut scratch,
                    ) {
                        fold_extreme(&mut range, search_x, find_min, value);
                    }
                }
            }
        }

        if range.is_ordered() {
            Some(range)
        } else {
            None
        }
    }

    /// Converges on one extreme coordinate value along `const_border`,
    /// between `min_border` and `max_border`. Returns None when no point
    /// of the border projects. A border whose search window never shrinks
    /// below tolerance within the attempt limit is recorded as a
    /// discontinuity in `special_cases`.
    #[allow(clippy::too_many_arguments)]
    fn do_search(
        &mut self,
        mut min_border: f64,
        mut max_border: f64,
        const_border: f64,
        search_x: bool,
        variable_is_lat: bool,
        find_min: bool,
        special_cases: &mut Vec<f64>,
    ) -> Option<f64> {
        // f64 carries 15 reliable decimal digits; narrowing further than
        // that chases noise
        const MAX_ATTEMPTS: u32 = 15;
        let tolerance = self.base.pixel_resolution / 2.0;

        let mut attempts = 0u32;
        let mut borders;
        loop {
            borders = self.find_extreme(
                &mut min_border,
                &mut max_border,
                const_border,
                search_x,
                variable_is_lat,
                find_min,
            )?;
            attempts += 1;
            let (min_x, min_y, max_x, max_y) = borders;
            // check both axes: a symmetric map can pin x while y still
            // straddles the extreme
            if ((min_x - max_x).abs() <= tolerance && (min_y - max_y).abs() <= tolerance)
                || attempts >= MAX_ATTEMPTS
            {
                break;
            }
        }

        if attempts >= MAX_ATTEMPTS {
            // the window never converged: a discontinuity to recheck later
            special_cases.push(min_border);
        }

        let (min_x, min_y, max_x, max_y) = borders;
        Some(match (find_min, search_x) {
            (true, true) => min_x.min(max_x),
            (true, false) => min_y.min(max_y),
            (false, true) => min_x.max(max_x),
            (false, false) => min_y.max(max_y),
        })
    }

    /// One refinement pass: steps along `const_border` in ten increments,
    /// brackets the most extreme coordinate value seen, and narrows
    /// `min_border`/`max_border` onto that bracket. Returns the plane
    /// coordinates at the narrowed borders as
    /// (min_border_x, min_border_y, max_border_x, max_border_y).
    fn find_extreme(
        &mut self,
        min_border: &mut f64,
        max_border: &mut f64,
        const_border: f64,
        search_x: bool,
        variable_is_lat: bool,
        find_min: bool,
    ) -> Option<(f64, f64, f64, f64)> {
        // walking "along" a pole visits a single point
        if !variable_is_lat && (const_border.abs() - 90.0).abs() < f64::EPSILON {
            self.set_search_ground(*min_border, const_border, variable_is_lat);
            if !self.base.good {
                return None;
            }
            let x = self.base.x;
            let y = self.base.y;
            return Some((x, y, x, y));
        }

        let step = (*max_border - *min_border) / 10.0;
        // half a step of slack so the last step is taken despite rounding
        let loop_end = *max_border + step / 2.0;

        let mut current = *min_border;
        self.set_search_ground(current, const_border, variable_is_lat);

        // advance to the first point of the border the projection accepts
        if !self.base.good {
            while !self.base.good && current <= loop_end {
                current += step;
                if variable_is_lat && current - 90.0 > f64::EPSILON {
                    current = 90.0;
                }
                self.set_search_ground(current, const_border, variable_is_lat);
            }
            if !self.base.good {
                return None;
            }
        }

        // three consecutive border samples bracket the running extreme
        let mut border1 = current;
        let mut border2 = current;
        let mut border3;

        let mut value1 = if search_x { self.base.x } else { self.base.y };
        let mut value2 = value1;

        let mut extreme_value = value2;
        let mut extreme_border1 = *min_border;
        let mut extreme_border3 = *min_border;

        while current <= loop_end {
            // stepping from min toward max can only overshoot at the top
            if variable_is_lat && current - 90.0 > f64::EPSILON {
                current = 90.0;
            }
            current += step;
            self.set_search_ground(current, const_border, variable_is_lat);
            if !self.base.good {
                continue;
            }

            border3 = border2;
            border2 = border1;
            border1 = current;
            value2 = value1;
            value1 = if search_x { self.base.x } else { self.base.y };

            if (find_min && value2 < extreme_value) || (!find_min && value2 > extreme_value) {
                extreme_value = value2;
                extreme_border3 = border3;
                extreme_border1 = border1;
            }
        }

        *min_border = extreme_border3;
        // the loop steps past the original max; never widen beyond it
        if extreme_border1 <= *max_border {
            *max_border = extreme_border1;
        }

        self.set_search_ground(*min_border, const_border, variable_is_lat);
        let min_border_x = self.base.x;
        let min_border_y = self.base.y;

        self.set_search_ground(*max_border, const_border, variable_is_lat);
        Some((min_border_x, min_border_y, self.base.x, self.base.y))
    }

    fn set_search_ground(&mut self, variable_border: f64, const_border: f64, variable_is_lat: bool) {
        let (lat, lon) = if variable_is_lat {
            (variable_border, const_border)
        } else {
            (const_border, variable_border)
        };
        self.set_ground(lat, lon);
    }

    /// The keywords describing this projection, in canonical order,
    /// restricted to those present in the backing label.
    pub fn mapping(&self) -> KeywordGroup {
        let mut out = KeywordGroup::new("Mapping");
        let src = &self.base.mapping;
        for key in [
            "TargetName",
            "ProjectionName",
            "EquatorialRadius",
            "PolarRadius",
            "LatitudeType",
            "LongitudeDirection",
            "LongitudeDomain",
            "PixelResolution",
            "Scale",
            "UpperLeftCornerX",
            "UpperLeftCornerY",
            "MinimumLatitude",
            "MaximumLatitude",
            "MinimumLongitude",
            "MaximumLongitude",
            "Rotation",
        ] {
            out.copy_if_present(src, key);
        }
        for key in self.shape.extra_mapping_keywords() {
            out.copy_if_present(src, key);
        }
        out
    }

    /// The latitude keywords this projection uses.
    pub fn mapping_latitudes(&self) -> KeywordGroup {
        let mut out = KeywordGroup::new("Mapping");
        let src = &self.base.mapping;
        if self.has_ground_range() {
            out.copy_if_present(src, "MinimumLatitude");
            out.copy_if_present(src, "MaximumLatitude");
        }
        for key in self.shape.extra_latitude_keywords() {
            out.copy_if_present(src, key);
        }
        out
    }

    /// The longitude keywords this projection uses.
    pub fn mapping_longitudes(&self) -> KeywordGroup {
        let mut out = KeywordGroup::new("Mapping");
        let src = &self.base.mapping;
        if self.has_ground_range() {
            out.copy_if_present(src, "MinimumLongitude");
            out.copy_if_present(src, "MaximumLongitude");
        }
        for key in self.shape.extra_longitude_keywords() {
            out.copy_if_present(src, key);
        }
        out
    }

    /// Snyder's q, equation (3-12): the authalic-latitude integrand for a
    /// given sin(φ). Meaningless for a sphere.
    pub fn q_compute(&self, sin_phi: f64) -> ProjResult<f64> {
        if self.eccentricity < f64::EPSILON {
            return Err(ProjError::invalid_parameter(
                "Snyder's q variable should only be computed for ellipsoidal projections",
            ));
        }
        let e = self.eccentricity;
        let e_sin_phi = e * sin_phi;
        Ok((1.0 - e * e)
            * (sin_phi / (1.0 - e_sin_phi * e_sin_phi)
                - 1.0 / (2.0 * e) * ((1.0 - e_sin_phi) / (1.0 + e_sin_phi)).ln()))
    }

    /// Snyder's m, equation (14-15): cos(φ)/√(1 − e²sin²φ).
    pub fn m_compute(&self, sin_phi: f64, cos_phi: f64) -> f64 {
        let e_sin_phi = self.eccentricity * sin_phi;
        cos_phi / (1.0 - e_sin_phi * e_sin_phi).sqrt()
    }

    /// Snyder's t, equation (15-9). Zero at the poles.
    pub fn t_compute(&self, phi: f64, sin_phi: f64) -> f64 {
        if HALF_PI - phi.abs() < f64::EPSILON {
            return 0.0;
        }
        let e_sin_phi = self.eccentricity * sin_phi;
        let denominator =
            ((1.0 - e_sin_phi) / (1.0 + e_sin_phi)).powf(0.5 * self.eccentricity);
        (0.5 * (HALF_PI - phi)).tan() / denominator
    }

    /// Latitude φ₂ from Snyder's recursive equation (7-9) for a given t.
    ///
    /// Non-convergence is a hard error: the eccentricity itself is
    /// unconvertible, not merely one bad input point.
    pub fn phi2_compute(&self, t: f64) -> ProjResult<f64> {
        const MAX_ITERATIONS: u32 = 45;
        const TOLERANCE: f64 = 1.0e-10;

        let half_ecc = 0.5 * self.eccentricity;
        let mut phi = HALF_PI - 2.0 * t.atan();
        let mut difference = f64::MAX;
        let mut iteration = 0;

        while iteration < MAX_ITERATIONS && difference > TOLERANCE {
            let e_sin_phi = self.eccentricity * phi.sin();
            let new_phi = HALF_PI
                - 2.0 * (t * ((1.0 - e_sin_phi) / (1.0 + e_sin_phi)).powf(half_ecc)).atan();
            difference = (new_phi - phi).abs();
            phi = new_phi;
            iteration += 1;
        }

        if iteration >= MAX_ITERATIONS {
            return Err(ProjError::convergence_failure(
                "failed to converge computing phi2",
            ));
        }

        Ok(phi)
    }

    /// Snyder's e4 constant: √((1+e)^(1+e) (1−e)^(1−e)).
    pub fn e4_compute(&self) -> f64 {
        let one_plus = 1.0 + self.eccentricity;
        let one_minus = 1.0 - self.eccentricity;
        (one_plus.powf(one_plus) * one_minus.powf(one_minus)).sqrt()
    }
}

fn fold_extreme(range: &mut CoordRange, search_x: bool, find_min: bool, value: f64) {
    match (search_x, find_min) {
        (true, true) => range.min_x = range.min_x.min(value),
        (true, false) => range.max_x = range.max_x.max(value),
        (false, true) => range.min_y = range.min_y.min(value),
        (false, false) => range.max_y = range.max_y.max(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use planetmap_core::assert_ulp_lt;
    use planetmap_core::constants::NULL_REAL;

    fn spherical_label() -> Label {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_text("ProjectionName", "Identity")
            .set_real("EquatorialRadius", 1.0)
            .set_real("PolarRadius", 1.0)
            .set_text("LatitudeType", "Planetographic")
            .set_text("LongitudeDirection", "PositiveEast")
            .set_integer("LongitudeDomain", 360)
            .set_real("MinimumLatitude", 45.0)
            .set_real("MaximumLatitude", 80.0)
            .set_real("MinimumLongitude", 15.0)
            .set_real("MaximumLongitude", 190.0);
        label.add_group(grp);
        label
    }

    fn mars_label() -> Label {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_text("TargetName", "Mars")
            .set_real("EquatorialRadius", 3396190.0)
            .set_real("PolarRadius", 3376200.0)
            .set_text("LatitudeType", "Planetocentric")
            .set_text("LongitudeDirection", "PositiveEast")
            .set_integer("LongitudeDomain", 360);
        label.add_group(grp);
        label
    }

    #[test]
    fn test_construction_reads_label() {
        let proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert_eq!(proj.equatorial_radius(), 1.0);
        assert_eq!(proj.polar_radius(), 1.0);
        assert_eq!(proj.eccentricity(), 0.0);
        assert!(proj.is_planetographic());
        assert!(proj.is_positive_east());
        assert!(proj.has_360_domain());
        assert!(proj.has_ground_range());
        assert_eq!(proj.minimum_latitude(), 45.0);
        assert_eq!(proj.maximum_longitude(), 190.0);
        assert_eq!(proj.name(), "Identity");
        assert_eq!(proj.version(), "1.0");
        assert_eq!(proj.projection_type(), ProjectionType::Triaxial);
    }

    #[test]
    fn test_radii_from_target_table() {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_text("TargetName", "Mars")
            .set_text("LatitudeType", "Planetocentric")
            .set_text("LongitudeDirection", "PositiveEast")
            .set_integer("LongitudeDomain", 360);
        label.add_group(grp);
        let proj = TriaxialProjection::from_label(&label).unwrap();
        assert_eq!(proj.equatorial_radius(), 3396190.0);
        assert_eq!(proj.polar_radius(), 3376200.0);
    }

    #[test]
    fn test_no_radii_no_target_fails() {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_text("LatitudeType", "Planetocentric")
            .set_text("LongitudeDirection", "PositiveEast")
            .set_integer("LongitudeDomain", 360);
        label.add_group(grp);
        let err = TriaxialProjection::from_label(&label).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Projection failed"));
        assert!(msg.contains("EquatorialRadius and PolarRadius"));
        assert!(msg.contains("TargetName"));
    }

    #[test]
    fn test_invalid_enumerations_fail_distinctly() {
        let mut label = spherical_label();
        label
            .find_group_mut("Mapping")
            .unwrap()
            .set_text("LatitudeType", "Geodetic");
        let err = TriaxialProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("LatitudeType"));

        let mut label = spherical_label();
        label
            .find_group_mut("Mapping")
            .unwrap()
            .set_text("LongitudeDirection", "Up");
        let err = TriaxialProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("LongitudeDirection"));

        let mut label = spherical_label();
        label
            .find_group_mut("Mapping")
            .unwrap()
            .set_integer("LongitudeDomain", 270);
        let err = TriaxialProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("LongitudeDomain"));
    }

    #[test]
    fn test_swapped_radii_fail() {
        let mut label = spherical_label();
        let grp = label.find_group_mut("Mapping").unwrap();
        grp.set_real("EquatorialRadius", 1000.0);
        grp.set_real("PolarRadius", 2000.0);
        let err = TriaxialProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("EquatorialRadius"));
    }

    #[test]
    fn test_bad_ground_range_fails() {
        let mut label = spherical_label();
        label
            .find_group_mut("Mapping")
            .unwrap()
            .set_real("MinimumLatitude", 95.0);
        let err = TriaxialProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("MinimumLatitude"));

        let mut label = spherical_label();
        let grp = label.find_group_mut("Mapping").unwrap();
        grp.set_real("MinimumLatitude", 50.0);
        grp.set_real("MaximumLatitude", 40.0);
        let err = TriaxialProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("not properly ordered"));
    }

    #[test]
    fn test_partial_ground_range_means_none() {
        let proj = TriaxialProjection::from_label(&mars_label()).unwrap();
        assert!(!proj.has_ground_range());
        let mut proj = proj;
        assert!(proj.xy_range().is_none());
    }

    #[test]
    fn test_identity_forward_and_inverse() {
        let mut proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert!(proj.set_ground(60.0, -5.0));
        assert!(proj.is_good());
        assert_eq!(proj.x_coord(), -5.0);
        assert_eq!(proj.y_coord(), 60.0);
        assert_eq!(proj.latitude(), 60.0);
        assert_eq!(proj.longitude(), -5.0);

        assert!(proj.set_coordinate(15.0, 52.0));
        assert_eq!(proj.latitude(), 52.0);
        assert_eq!(proj.longitude(), 15.0);
    }

    #[test]
    fn test_set_ground_idempotent() {
        let mut proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert!(proj.set_ground(60.0, 100.0));
        let first = (proj.x_coord(), proj.y_coord(), proj.is_good());
        assert!(proj.set_ground(60.0, 100.0));
        assert_eq!((proj.x_coord(), proj.y_coord(), proj.is_good()), first);
    }

    #[test]
    fn test_set_ground_rejects_out_of_range_latitude() {
        let mut proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert!(!proj.set_ground(91.0, 0.0));
        assert!(!proj.is_good());
    }

    #[test]
    fn test_set_rejects_sentinel_without_panic() {
        let mut proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert!(!proj.set_ground(NULL_REAL, 0.0));
        assert!(!proj.is_good());
        assert!(!proj.set_ground(0.0, NULL_REAL));
        assert!(!proj.set_coordinate(NULL_REAL, 0.0));
        assert!(!proj.set_universal_ground(0.0, NULL_REAL));
        assert!(!proj.set_unbound_universal_ground(NULL_REAL, 0.0));
        assert!(!proj.is_good());
    }

    #[test]
    fn test_bad_state_is_recoverable() {
        let mut proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert!(!proj.set_ground(NULL_REAL, 0.0));
        assert!(proj.set_ground(10.0, 20.0));
        assert!(proj.is_good());
    }

    #[test]
    fn test_universal_ground_roundtrip_conventions() {
        // positive-west, 180-domain, planetographic instance
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_real("EquatorialRadius", 3396190.0)
            .set_real("PolarRadius", 3376200.0)
            .set_text("LatitudeType", "Planetographic")
            .set_text("LongitudeDirection", "PositiveWest")
            .set_integer("LongitudeDomain", 180);
        label.add_group(grp);
        let mut proj = TriaxialProjection::from_label(&label).unwrap();

        let lat = 34.5;
        let lon = 250.0;
        assert!(proj.set_universal_ground(lat, lon));
        assert_ulp_lt!(proj.universal_latitude(), lat, 16);
        let round = proj.universal_longitude();
        assert!((round - wrap_360(lon)).abs() < 1.0e-9);
    }

    #[test]
    fn test_universal_ground_native_values() {
        // positive-east 360-domain planetocentric: universal is native
        let mut proj = TriaxialProjection::from_label(&mars_label()).unwrap();
        assert!(proj.set_universal_ground(12.0, 355.0));
        assert_eq!(proj.latitude(), 12.0);
        assert_eq!(proj.longitude(), 355.0);
    }

    #[test]
    fn test_unbound_universal_ground_skips_domain_fold() {
        let mut proj = TriaxialProjection::from_label(&mars_label()).unwrap();
        assert!(proj.set_unbound_universal_ground(10.0, 365.0));
        // direction is applied but the fold is not
        assert_eq!(proj.longitude(), 365.0);

        assert!(proj.set_universal_ground(10.0, 365.0));
        assert_eq!(proj.longitude(), 5.0);
    }

    #[test]
    fn test_unbound_universal_ground_applies_direction() {
        let mut label = mars_label();
        label
            .find_group_mut("Mapping")
            .unwrap()
            .set_text("LongitudeDirection", "PositiveWest");
        let mut proj = TriaxialProjection::from_label(&label).unwrap();
        assert!(proj.set_unbound_universal_ground(10.0, 365.0));
        assert_eq!(proj.longitude(), -365.0);
    }

    #[test]
    fn test_local_radius() {
        let proj = TriaxialProjection::from_label(&mars_label()).unwrap();
        assert_eq!(proj.local_radius_at(0.0).unwrap(), 3396190.0);
        assert_eq!(proj.local_radius_at(90.0).unwrap(), 3376200.0);
        let mid = proj.local_radius_at(45.0).unwrap();
        assert!(mid < 3396190.0 && mid > 3376200.0);
        assert!(proj.local_radius_at(NULL_REAL).is_err());
    }

    #[test]
    fn test_local_radius_spherical_fast_path() {
        let proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert_eq!(proj.local_radius_at(37.0).unwrap(), 1.0);
    }

    #[test]
    fn test_scale_without_mapper_is_one() {
        let proj = TriaxialProjection::from_label(&mars_label()).unwrap();
        assert_eq!(proj.scale(), 1.0);
    }

    #[test]
    fn test_scale_with_mapper() {
        use crate::mapper::PixelMapper;
        let mut proj = TriaxialProjection::from_label(&mars_label()).unwrap();
        proj.set_world_mapper(Box::new(PixelMapper::new(100.0, 0.0, 0.0)));
        // identity true-scale latitude is the equator
        assert_ulp_lt!(proj.scale(), 3396190.0 / 100.0, 4);
    }

    #[test]
    fn test_identity_xy_range_reinterprets_ground_range() {
        let mut proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        let range = proj.xy_range().unwrap();
        assert_eq!(range.min_x, 15.0);
        assert_eq!(range.max_x, 190.0);
        assert_eq!(range.min_y, 45.0);
        assert_eq!(range.max_y, 80.0);
    }

    #[test]
    fn test_xy_range_check_accumulates() {
        let mut proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        let mut range = CoordRange::new();
        proj.xy_range_check(&mut range, 45.0, 15.0);
        proj.xy_range_check(&mut range, 80.0, 190.0);
        proj.xy_range_check(&mut range, NULL_REAL, 20.0); // skipped
        assert_eq!(range.min_x, 15.0);
        assert_eq!(range.max_x, 190.0);
        assert_eq!(range.min_y, 45.0);
        assert_eq!(range.max_y, 80.0);
    }

    #[test]
    fn test_longitude_in_range_wraparound() {
        // range crossing the 0/360 seam
        assert!(TriaxialProjection::longitude_in_range(350.0, 370.0, 5.0));
        assert!(TriaxialProjection::longitude_in_range(350.0, 370.0, 355.0));
        assert!(!TriaxialProjection::longitude_in_range(350.0, 370.0, 180.0));
        // plain range
        assert!(TriaxialProjection::longitude_in_range(15.0, 190.0, 100.0));
        assert!(!TriaxialProjection::longitude_in_range(15.0, 190.0, 200.0));
        // full range contains everything
        assert!(TriaxialProjection::longitude_in_range(0.0, 360.0, 123.0));
    }

    #[test]
    fn test_in_latitude_range() {
        let proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert!(proj.in_latitude_range(60.0));
        assert!(!proj.in_latitude_range(0.0));
        assert!(!proj.in_latitude_range(81.0));
    }

    #[test]
    fn test_mapping_key_order_and_presence() {
        let proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        let mapping = proj.mapping();
        let keys: Vec<&str> = mapping.keywords().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            [
                "ProjectionName",
                "EquatorialRadius",
                "PolarRadius",
                "LatitudeType",
                "LongitudeDirection",
                "LongitudeDomain",
                "MinimumLatitude",
                "MaximumLatitude",
                "MinimumLongitude",
                "MaximumLongitude",
            ]
        );
        // no fabricated defaults: PixelResolution was absent in the label
        assert!(!mapping.has_keyword("PixelResolution"));
    }

    #[test]
    fn test_mapping_latitudes_and_longitudes() {
        let proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        let lats = proj.mapping_latitudes();
        assert!(lats.has_keyword("MinimumLatitude"));
        assert!(lats.has_keyword("MaximumLatitude"));
        assert!(!lats.has_keyword("MinimumLongitude"));

        let lons = proj.mapping_longitudes();
        assert!(lons.has_keyword("MinimumLongitude"));
        assert!(lons.has_keyword("MaximumLongitude"));
        assert!(!lons.has_keyword("MinimumLatitude"));
    }

    #[test]
    fn test_snyder_helpers_on_ellipsoid() {
        let proj = TriaxialProjection::from_label(&mars_label()).unwrap();
        let e = proj.eccentricity();
        assert!(e > 0.0 && e < 1.0);

        // m at the equator is cos(0)/sqrt(1-0) = 1
        assert_ulp_lt!(proj.m_compute(0.0, 1.0), 1.0, 2);
        // t at the pole is 0
        assert_eq!(proj.t_compute(HALF_PI, 1.0), 0.0);
        // t at the equator is tan(pi/4) = 1
        assert_ulp_lt!(proj.t_compute(0.0, 0.0), 1.0, 2);

        // phi2 inverts t
        for phi in [-1.2, -0.5, 0.0, 0.3, 1.0] {
            let t = proj.t_compute(phi, phi.sin());
            let back = proj.phi2_compute(t).unwrap();
            assert!((back - phi).abs() < 1.0e-9);
        }

        // e4 is 1 for e=0 and grows with eccentricity
        assert!(proj.e4_compute() > 1.0);
    }

    #[test]
    fn test_q_compute_rejects_sphere() {
        let proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert!(proj.q_compute(0.5).is_err());
    }

    #[test]
    fn test_q_compute_known_value() {
        let proj = TriaxialProjection::from_label(&mars_label()).unwrap();
        // q(sin 90°) approaches 2 as e -> 0; for small e it stays near 2
        let q_pole = proj.q_compute(1.0).unwrap();
        assert!((q_pole - 2.0).abs() < 0.01);
        // odd symmetry
        let q = proj.q_compute(0.5).unwrap();
        let q_neg = proj.q_compute(-0.5).unwrap();
        assert_ulp_lt!(q, -q_neg, 8);
    }

    #[test]
    fn test_rotation_applied_to_identity() {
        let mut label = spherical_label();
        label
            .find_group_mut("Mapping")
            .unwrap()
            .set_real("Rotation", 90.0);
        let mut proj = TriaxialProjection::from_label(&label).unwrap();
        assert!(proj.set_ground(0.0, 10.0));
        // unrotated (x, y) = (10, 0); rotated by 90°: x' = y·sin = 0...
        assert_ulp_lt!(proj.x_coord(), 10.0 * (90.0 * DEG_TO_RAD).cos(), 64);
        assert!((proj.y_coord() - (-10.0)).abs() < 1.0e-9);

        // inverse recovers the ground point through get_x/get_y
        let (x, y) = (proj.x_coord(), proj.y_coord());
        assert!(proj.set_coordinate(x, y));
        assert!((proj.latitude() - 0.0).abs() < 1.0e-9);
        assert!((proj.longitude() - 10.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_set_world_identity_and_mapper() {
        use crate::mapper::PixelMapper;
        let mut proj = TriaxialProjection::from_label(&spherical_label()).unwrap();
        assert!(proj.set_world(30.0, 50.0));
        assert_eq!(proj.longitude(), 30.0);
        assert_eq!(proj.latitude(), 50.0);

        proj.set_world_mapper(Box::new(PixelMapper::new(1.0, 0.0, 0.0)));
        assert!(proj.set_world(10.5, 20.5));
        assert_eq!(proj.longitude(), 10.0);
        assert_eq!(proj.latitude(), -20.0);
        assert_ulp_lt!(proj.world_x(), 10.5, 4);
        assert_ulp_lt!(proj.world_y(), 20.5, 4);
    }
}
