//! Ring-plane projections: ring radius / ring longitude ground coordinates.
//!
//! The ring plane replaces latitude with a plain radial distance in meters
//! (no planetographic/planetocentric duality) and longitude with a ring
//! longitude whose direction is clockwise or counterclockwise. Everything
//! else — world mapping, rotation, XY-range bookkeeping, the oblique edge
//! search — mirrors the triaxial machinery with radius and ring longitude
//! substituted for latitude and longitude.

use planetmap_core::constants::{DEG_TO_RAD, NULL_REAL};
use planetmap_core::utils::{fuzzy_eq, is_null};
use planetmap_core::{wrap_180, wrap_360};

use crate::base::{CoordRange, ProjectionBase, ProjectionType};
use crate::error::{ProjError, ProjResult};
use crate::label::{KeywordGroup, KeywordProvider, Label};

pub mod planar;

pub use planar::PlanarParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingLongitudeDirection {
    Clockwise,
    CounterClockwise,
}

/// The projection family plugged into the shared ring-plane machinery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingShape {
    /// No-op projection: x = ring longitude, y = ring radius.
    Identity,
    Planar(PlanarParams),
}

impl RingShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Planar(_) => "Planar",
        }
    }

    pub fn version(&self) -> &'static str {
        "1.0"
    }

    fn extra_mapping_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Identity => &[],
            Self::Planar(_) => &["CenterRadius", "CenterRingLongitude"],
        }
    }
}

/// A map projection over a ring plane.
#[derive(Debug)]
pub struct RingPlaneProjection {
    pub(crate) base: ProjectionBase,
    pub(crate) ring_longitude_direction: RingLongitudeDirection,
    pub(crate) ring_longitude_domain: i32,
    pub(crate) minimum_ring_radius: f64,
    pub(crate) maximum_ring_radius: f64,
    pub(crate) minimum_ring_longitude: f64,
    pub(crate) maximum_ring_longitude: f64,
    pub(crate) ring_radius: f64,
    pub(crate) ring_longitude: f64,
    pub(crate) shape: RingShape,
}

impl RingPlaneProjection {
    /// Constructs the identity (no-op) ring projection from a label.
    pub fn from_label(label: &Label) -> ProjResult<Self> {
        Self::build(label).map_err(ProjError::into_mapping_failure)
    }

    /// Constructs a planar ring projection from a label.
    pub fn planar(label: &Label) -> ProjResult<Self> {
        Self::build(label)
            .and_then(|mut proj| {
                let params = PlanarParams::from_projection(&mut proj)?;
                proj.shape = RingShape::Planar(params);
                Ok(proj)
            })
            .map_err(ProjError::into_mapping_failure)
    }

    fn build(label: &Label) -> ProjResult<Self> {
        let base = ProjectionBase::from_label(label)?;
        let grp = &base.mapping;

        let ring_longitude_direction =
            match grp.require_string("RingLongitudeDirection")?.as_str() {
                "Clockwise" => RingLongitudeDirection::Clockwise,
                "CounterClockwise" => RingLongitudeDirection::CounterClockwise,
                _ => {
                    return Err(ProjError::invalid_keyword(
                        "RingLongitudeDirection",
                        "must be [Clockwise or CounterClockwise]",
                    ))
                }
            };

        let ring_longitude_domain = match grp.get_int("RingLongitudeDomain") {
            Some(360) => 360,
            Some(180) => 180,
            Some(_) => {
                return Err(ProjError::invalid_keyword(
                    "RingLongitudeDomain",
                    "must be [180 or 360]",
                ))
            }
            None => return Err(ProjError::missing_keyword("RingLongitudeDomain")),
        };

        let mut ground_range_good = false;
        let mut minimum_ring_radius = 0.0;
        let mut maximum_ring_radius = 0.0;
        let mut minimum_ring_longitude = 0.0;
        let mut maximum_ring_longitude = 0.0;
        if grp.has_keyword("MinimumRingRadius")
            && grp.has_keyword("MaximumRingRadius")
            && grp.has_keyword("MinimumRingLongitude")
            && grp.has_keyword("MaximumRingLongitude")
        {
            minimum_ring_radius = grp.require_float("MinimumRingRadius")?;
            maximum_ring_radius = grp.require_float("MaximumRingRadius")?;
            minimum_ring_longitude = grp.require_float("MinimumRingLongitude")?;
            maximum_ring_longitude = grp.require_float("MaximumRingLongitude")?;

            if minimum_ring_radius < 0.0 {
                return Err(ProjError::invalid_keyword(
                    "MinimumRingRadius",
                    format!("[{minimum_ring_radius}] cannot be negative"),
                ));
            }
            if maximum_ring_radius < 0.0 {
                return Err(ProjError::invalid_keyword(
                    "MaximumRingRadius",
                    format!("[{maximum_ring_radius}] cannot be negative"),
                ));
            }
            if minimum_ring_radius >= maximum_ring_radius {
                return Err(ProjError::invalid_parameter(format!(
                    "[MinimumRingRadius,MaximumRingRadius] of \
                     [{minimum_ring_radius},{maximum_ring_radius}] are not properly ordered"
                )));
            }
            if minimum_ring_longitude >= maximum_ring_longitude {
                return Err(ProjError::invalid_parameter(format!(
                    "[MinimumRingLongitude,MaximumRingLongitude] of \
                     [{minimum_ring_longitude},{maximum_ring_longitude}] are not properly \
                     ordered"
                )));
            }
            ground_range_good = true;
        }

        let mut base = base;
        base.ground_range_good = ground_range_good;

        Ok(Self {
            base,
            ring_longitude_direction,
            ring_longitude_domain,
            minimum_ring_radius,
            maximum_ring_radius,
            minimum_ring_longitude,
            maximum_ring_longitude,
            ring_radius: NULL_REAL,
            ring_longitude: NULL_REAL,
            shape: RingShape::Identity,
        })
    }

    #[inline]
    pub fn projection_type(&self) -> ProjectionType {
        ProjectionType::RingPlane
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
    pub fn shape(&self) -> &RingShape {
        &self.shape
    }

    #[inline]
    pub fn ring_longitude_direction(&self) -> RingLongitudeDirection {
        self.ring_longitude_direction
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.ring_longitude_direction == RingLongitudeDirection::Clockwise
    }

    #[inline]
    pub fn is_counter_clockwise(&self) -> bool {
        self.ring_longitude_direction == RingLongitudeDirection::CounterClockwise
    }

    pub fn ring_longitude_direction_string(&self) -> &'static str {
        match self.ring_longitude_direction {
            RingLongitudeDirection::Clockwise => "Clockwise",
            RingLongitudeDirection::CounterClockwise => "CounterClockwise",
        }
    }

    #[inline]
    pub fn ring_longitude_domain(&self) -> i32 {
        self.ring_longitude_domain
    }

    #[inline]
    pub fn has_180_domain(&self) -> bool {
        self.ring_longitude_domain == 180
    }

    #[inline]
    pub fn has_360_domain(&self) -> bool {
        self.ring_longitude_domain == 360
    }

    pub fn ring_longitude_domain_string(&self) -> &'static str {
        if self.ring_longitude_domain == 360 {
            "360"
        } else {
            "180"
        }
    }

    /// Valid only when [`Self::has_ground_range`] is true.
    #[inline]
    pub fn minimum_ring_radius(&self) -> f64 {
        self.minimum_ring_radius
    }

    #[inline]
    pub fn maximum_ring_radius(&self) -> f64 {
        self.maximum_ring_radius
    }

    #[inline]
    pub fn minimum_ring_longitude(&self) -> f64 {
        self.minimum_ring_longitude
    }

    #[inline]
    pub fn maximum_ring_longitude(&self) -> f64 {
        self.maximum_ring_longitude
    }

    /// Last-set ring radius in meters. Valid only when [`Self::is_good`].
    #[inline]
    pub fn ring_radius(&self) -> f64 {
        self.ring_radius
    }

    /// Last-set ring longitude in the projection's native direction and
    /// domain. Valid only when [`Self::is_good`].
    #[inline]
    pub fn ring_longitude(&self) -> f64 {
        self.ring_longitude
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

    /// Sets the ground coordinate (ring radius in meters, ring longitude
    /// in native direction/domain) and computes the plane coordinate.
    /// Soft failure: sentinel or negative-radius input returns false.
    pub fn set_ground(&mut self, ring_radius: f64, ring_longitude: f64) -> bool {
        if is_null(ring_radius) || is_null(ring_longitude) {
            self.base.good = false;
            return false;
        }
        match self.shape {
            RingShape::Identity => {
                if ring_radius < 0.0 {
                    self.base.good = false;
                    return false;
                }
                self.ring_radius = ring_radius;
                self.ring_longitude = ring_longitude;
                self.base.good = true;
                self.base.set_computed_xy(ring_longitude, ring_radius);
                self.base.good
            }
            RingShape::Planar(p) => planar::set_ground(self, &p, ring_radius, ring_longitude),
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
            RingShape::Identity => {
                self.base.good = true;
                self.base.set_xy(x, y);
                self.ring_radius = self.base.get_y();
                self.ring_longitude = self.base.get_x();
                true
            }
            RingShape::Planar(p) => planar::set_coordinate(self, &p, x, y),
        }
    }

    /// Sets the ground from a universal coordinate: ring radius in meters
    /// and counterclockwise ring longitude in the 360 domain.
    pub fn set_universal_ground(&mut self, ring_radius: f64, ring_longitude: f64) -> bool {
        if is_null(ring_radius) || is_null(ring_longitude) {
            self.base.good = false;
            return false;
        }
        let mut lon = ring_longitude;
        if self.is_clockwise() {
            lon = -ring_longitude;
        }
        // direction adjustment can leave (-360, 0), so fold even in the
        // 360 domain
        lon = if self.ring_longitude_domain == 180 {
            wrap_180(lon)
        } else {
            wrap_360(lon)
        };

        self.set_ground(ring_radius, lon)
    }

    /// Like [`Self::set_universal_ground`] but skips the domain fold on
    /// ring longitude; the direction conversion still applies.
    pub fn set_unbound_universal_ground(&mut self, ring_radius: f64, ring_longitude: f64) -> bool {
        if is_null(ring_radius) || is_null(ring_longitude) {
            self.base.good = false;
            return false;
        }
        let mut lon = ring_longitude;
        if self.is_clockwise() {
            lon = -ring_longitude;
        }

        self.set_ground(ring_radius, lon)
    }

    /// The current ring radius in meters; radius has no alternate
    /// convention, so universal and native agree.
    pub fn universal_ring_radius(&self) -> f64 {
        self.ring_radius
    }

    /// The current ring longitude as counterclockwise degrees in the 360
    /// domain, regardless of the instance's native convention.
    pub fn universal_ring_longitude(&self) -> f64 {
        let mut lon = self.ring_longitude;
        if self.is_clockwise() {
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

    /// The ring-plane local radius is the current ring radius itself.
    pub fn local_radius(&self) -> f64 {
        self.ring_radius
    }

    /// The ring radius at which the projection is undistorted, in meters.
    pub fn true_scale_ring_radius(&self) -> f64 {
        match &self.shape {
            RingShape::Identity => 0.0,
            RingShape::Planar(p) => p.true_scale_ring_radius(),
        }
    }

    /// World units per degree at the true-scale ring radius; 1.0 without a
    /// mapper.
    pub fn scale(&self) -> f64 {
        if self.base.mapper.is_none() {
            return 1.0;
        }
        // one degree of ring longitude spans radius * DEG_TO_RAD meters
        self.true_scale_ring_radius() / self.base.resolution() * DEG_TO_RAD
    }

    /// The plane-coordinate range covering the ground range, or None when
    /// no ground range is available or the result degenerates.
    pub fn xy_range(&mut self) -> Option<CoordRange> {
        if !self.base.ground_range_good {
            return None;
        }
        match self.shape {
            RingShape::Identity => Some(CoordRange {
                min_x: self.minimum_ring_longitude,
                max_x: self.maximum_ring_longitude,
                min_y: self.minimum_ring_radius,
                max_y: self.maximum_ring_radius,
            }),
            RingShape::Planar(p) => planar::xy_range(self, &p),
        }
    }

    /// Probes one ground point and folds the resulting plane coordinate
    /// into the accumulator. Silently skips points the projection cannot
    /// represent.
    pub fn xy_range_check(&mut self, range: &mut CoordRange, ring_radius: f64, ring_longitude: f64) {
        if is_null(ring_radius) || is_null(ring_longitude) {
            self.base.good = false;
            return;
        }
        self.set_ground(ring_radius, ring_longitude);
        if !self.base.good {
            return;
        }
        range.expand(self.base.x, self.base.y);
    }

    /// Whether `ring_longitude` lies within [`min_lon`, `max_lon`],
    /// handling ranges that wrap across the 0°/360° seam. A full 360°
    /// range contains everything.
    pub fn ring_longitude_in_range(min_lon: f64, max_lon: f64, ring_longitude: f64) -> bool {
        let mut adjusted_lon = wrap_360(ring_longitude);
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

    /// Whether `ring_longitude` lies within this projection's ground range.
    pub fn in_ring_longitude_range(&self, ring_longitude: f64) -> bool {
        Self::ring_longitude_in_range(
            self.minimum_ring_longitude,
            self.maximum_ring_longitude,
            ring_longitude,
        )
    }

    /// Whether `ring_radius` lies within this projection's ground range.
    pub fn in_ring_radius_range(&self, ring_radius: f64) -> bool {
        self.minimum_ring_radius <= ring_radius && ring_radius <= self.maximum_ring_radius
    }

    /// XY range for oblique-aspect ring projections: walks the four edges
    /// of the radius/ring-longitude range with the bounded search,
    /// re-searching any discontinuities found.
    pub fn xy_range_oblique(&mut self) -> Option<CoordRange> {
        if !self.base.ground_range_good {
            return None;
        }

        let mut special_radii: Vec<f64> = Vec::new();
        let mut special_lons: Vec<f64> = Vec::new();
        let mut range = CoordRange::new();

        for find_min in [true, false] {
            for search_x in [true, false] {
                // along each fixed ring longitude, varying radius
                for lon in [self.minimum_ring_longitude, self.maximum_ring_longitude] {
                    if let Some(value) = self.do_search(
                        self.minimum_ring_radius,
                        self.maximum_ring_radius,
                        lon,
                        search_x,
                        true,
                        find_min,
                        &mut special_radii,
                    ) {
                        fold_extreme(&mut range, search_x, find_min, value);
                    }
                }
                // along each fixed radius, varying ring longitude
                for radius in [self.minimum_ring_radius, self.maximum_ring_radius] {
                    if let Some(value) = self.do_search(
                        self.minimum_ring_longitude,
                        self.maximum_ring_longitude,
                        radius,
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

        let mut scratch: Vec<f64> = Vec::new();
        for radius in special_radii {
            for find_min in [true, false] {
                for search_x in [true, false] {
                    if let Some(value) = self.do_search(
                        self.minimum_ring_longitude,
                        self.maximum_ring_longitude,
                        radius,
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
                        self.minimum_ring_radius,
                        self.maximum_ring_radius,
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

    /// Converges on one extreme coordinate value along `const_border`.
    /// Mirrors the triaxial search with radius in place of latitude; the
    /// radius axis has no singular border, so there is no pole special
    /// case.
    #[allow(clippy::too_many_arguments)]
    fn do_search(
        &mut self,
        mut min_border: f64,
        mut max_border: f64,
        const_border: f64,
        search_x: bool,
        variable_is_radius: bool,
        find_min: bool,
        special_cases: &mut Vec<f64>,
    ) -> Option<f64> {
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
                variable_is_radius,
                find_min,
            )?;
            attempts += 1;
            let (min_x, min_y, max_x, max_y) = borders;
            if ((min_x - max_x).abs() <= tolerance && (min_y - max_y).abs() <= tolerance)
                || attempts >= MAX_ATTEMPTS
            {
                break;
            }
        }

        if attempts >= MAX_ATTEMPTS {
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

    fn find_extreme(
        &mut self,
        min_border: &mut f64,
        max_border: &mut f64,
        const_border: f64,
        search_x: bool,
        variable_is_radius: bool,
        find_min: bool,
    ) -> Option<(f64, f64, f64, f64)> {
        let step = (*max_border - *min_border) / 10.0;
        let loop_end = *max_border + step / 2.0;

        let mut current = *min_border;
        self.set_search_ground(current, const_border, variable_is_radius);

        if !self.base.good {
            while !self.base.good && current <= loop_end {
                current += step;
                self.set_search_ground(current, const_border, variable_is_radius);
            }
            if !self.base.good {
                return None;
            }
        }

        let mut border1 = current;
        let mut border2 = current;
        let mut border3;

        let mut value1 = if search_x { self.base.x } else { self.base.y };
        let mut value2 = value1;

        let mut extreme_value = value2;
        let mut extreme_border1 = *min_border;
        let mut extreme_border3 = *min_border;

        while current <= loop_end {
            current += step;
            self.set_search_ground(current, const_border, variable_is_radius);
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
        if extreme_border1 <= *max_border {
            *max_border = extreme_border1;
        }

        self.set_search_ground(*min_border, const_border, variable_is_radius);
        let min_border_x = self.base.x;
        let min_border_y = self.base.y;

        self.set_search_ground(*max_border, const_border, variable_is_radius);
        Some((min_border_x, min_border_y, self.base.x, self.base.y))
    }

    fn set_search_ground(
        &mut self,
        variable_border: f64,
        const_border: f64,
        variable_is_radius: bool,
    ) {
        let (radius, lon) = if variable_is_radius {
            (variable_border, const_border)
        } else {
            (const_border, variable_border)
        };
        self.set_ground(radius, lon);
    }

    /// The keywords describing this projection, in canonical order,
    /// restricted to those present in the backing label.
    pub fn mapping(&self) -> KeywordGroup {
        let mut out = KeywordGroup::new("Mapping");
        let src = &self.base.mapping;
        for key in [
            "TargetName",
            "ProjectionName",
            "RingLongitudeDirection",
            "RingLongitudeDomain",
            "PixelResolution",
            "Scale",
            "UpperLeftCornerX",
            "UpperLeftCornerY",
            "MinimumRingRadius",
            "MaximumRingRadius",
            "MinimumRingLongitude",
            "MaximumRingLongitude",
            "Rotation",
        ] {
            out.copy_if_present(src, key);
        }
        for key in self.shape.extra_mapping_keywords() {
            out.copy_if_present(src, key);
        }
        out
    }

    /// The ring-radius keywords this projection uses.
    pub fn mapping_ring_radii(&self) -> KeywordGroup {
        let mut out = KeywordGroup::new("Mapping");
        let src = &self.base.mapping;
        if self.has_ground_range() {
            out.copy_if_present(src, "MinimumRingRadius");
            out.copy_if_present(src, "MaximumRingRadius");
        }
        if matches!(self.shape, RingShape::Planar(_)) {
            out.copy_if_present(src, "CenterRadius");
        }
        out
    }

    /// The ring-longitude keywords this projection uses.
    pub fn mapping_ring_longitudes(&self) -> KeywordGroup {
        let mut out = KeywordGroup::new("Mapping");
        let src = &self.base.mapping;
        if self.has_ground_range() {
            out.copy_if_present(src, "MinimumRingLongitude");
            out.copy_if_present(src, "MaximumRingLongitude");
        }
        if matches!(self.shape, RingShape::Planar(_)) {
            out.copy_if_present(src, "CenterRingLongitude");
        }
        out
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
    use planetmap_core::constants::NULL_REAL;

    fn ring_label(direction: &str, domain: i64) -> Label {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_text("TargetName", "Saturn")
            .set_text("ProjectionName", "Identity")
            .set_text("RingLongitudeDirection", direction)
            .set_integer("RingLongitudeDomain", domain)
            .set_real("MinimumRingRadius", 2000.0)
            .set_real("MaximumRingRadius", 20000.0)
            .set_real("MinimumRingLongitude", 0.0)
            .set_real("MaximumRingLongitude", 360.0);
        label.add_group(grp);
        label
    }

    #[test]
    fn test_construction() {
        let proj = RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        assert!(proj.is_counter_clockwise());
        assert!(proj.has_360_domain());
        assert!(proj.has_ground_range());
        assert_eq!(proj.minimum_ring_radius(), 2000.0);
        assert_eq!(proj.maximum_ring_radius(), 20000.0);
        assert_eq!(proj.projection_type(), ProjectionType::RingPlane);
        assert_eq!(proj.ring_longitude_direction_string(), "CounterClockwise");
        assert_eq!(proj.ring_longitude_domain_string(), "360");
    }

    #[test]
    fn test_invalid_direction_fails() {
        let mut label = ring_label("CounterClockwise", 360);
        label
            .find_group_mut("Mapping")
            .unwrap()
            .set_text("RingLongitudeDirection", "Widdershins");
        let err = RingPlaneProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("RingLongitudeDirection"));
    }

    #[test]
    fn test_negative_radius_range_fails() {
        let mut label = ring_label("CounterClockwise", 360);
        label
            .find_group_mut("Mapping")
            .unwrap()
            .set_real("MinimumRingRadius", -10.0);
        let err = RingPlaneProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("MinimumRingRadius"));
    }

    #[test]
    fn test_misordered_radius_range_fails() {
        let mut label = ring_label("CounterClockwise", 360);
        let grp = label.find_group_mut("Mapping").unwrap();
        grp.set_real("MinimumRingRadius", 30000.0);
        let err = RingPlaneProjection::from_label(&label).unwrap_err();
        assert!(err.to_string().contains("not properly ordered"));
    }

    #[test]
    fn test_identity_forward_inverse() {
        let mut proj =
            RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        assert!(proj.set_ground(9000.0, 45.0));
        assert_eq!(proj.x_coord(), 45.0);
        assert_eq!(proj.y_coord(), 9000.0);

        assert!(proj.set_coordinate(120.0, 5000.0));
        assert_eq!(proj.ring_radius(), 5000.0);
        assert_eq!(proj.ring_longitude(), 120.0);
    }

    #[test]
    fn test_negative_radius_rejected() {
        let mut proj =
            RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        assert!(!proj.set_ground(-1.0, 45.0));
        assert!(!proj.is_good());
    }

    #[test]
    fn test_sentinel_rejected() {
        let mut proj =
            RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        assert!(!proj.set_ground(NULL_REAL, 45.0));
        assert!(!proj.set_coordinate(0.0, NULL_REAL));
        assert!(!proj.set_universal_ground(NULL_REAL, 0.0));
        assert!(!proj.set_unbound_universal_ground(9000.0, NULL_REAL));
        assert!(!proj.is_good());
    }

    #[test]
    fn test_universal_ground_identity_conventions() {
        let mut proj =
            RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        assert!(proj.set_universal_ground(9000.0, 90.0));
        assert_eq!(proj.ring_radius(), 9000.0);
        assert_eq!(proj.ring_longitude(), 90.0);
        assert_eq!(proj.universal_ring_radius(), 9000.0);
        assert_eq!(proj.universal_ring_longitude(), 90.0);
    }

    #[test]
    fn test_universal_ground_clockwise_fold() {
        // clockwise, 180 domain: 0 and 360 resolve to the same azimuth
        let mut proj = RingPlaneProjection::from_label(&ring_label("Clockwise", 180)).unwrap();

        assert!(proj.set_universal_ground(9000.0, 0.0));
        let first = proj.universal_ring_longitude();
        assert!(proj.set_universal_ground(9000.0, 360.0));
        let second = proj.universal_ring_longitude();

        let diff = (first - second).abs();
        assert!(diff < 1.0e-9 || (diff - 360.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_universal_ring_longitude_direction() {
        let mut proj = RingPlaneProjection::from_label(&ring_label("Clockwise", 360)).unwrap();
        assert!(proj.set_universal_ground(9000.0, 100.0));
        // native is the clockwise negation
        assert_eq!(proj.ring_longitude(), 260.0);
        // universal converts back
        assert_eq!(proj.universal_ring_longitude(), 100.0);
    }

    #[test]
    fn test_unbound_skips_fold() {
        let mut proj =
            RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        assert!(proj.set_unbound_universal_ground(9000.0, 400.0));
        assert_eq!(proj.ring_longitude(), 400.0);
        assert!(proj.set_universal_ground(9000.0, 400.0));
        assert_eq!(proj.ring_longitude(), 40.0);
    }

    #[test]
    fn test_local_radius_is_ring_radius() {
        let mut proj =
            RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        assert!(proj.set_ground(7500.0, 10.0));
        assert_eq!(proj.local_radius(), 7500.0);
    }

    #[test]
    fn test_identity_xy_range() {
        let mut proj =
            RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        let range = proj.xy_range().unwrap();
        assert_eq!(range.min_y, 2000.0);
        assert_eq!(range.max_y, 20000.0);
        assert_eq!(range.min_x, 0.0);
        assert_eq!(range.max_x, 360.0);
    }

    #[test]
    fn test_xy_range_gate_without_ground_range() {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_text("RingLongitudeDirection", "CounterClockwise")
            .set_integer("RingLongitudeDomain", 360);
        label.add_group(grp);
        let mut proj = RingPlaneProjection::from_label(&label).unwrap();
        assert!(!proj.has_ground_range());
        assert!(proj.xy_range().is_none());
        assert!(proj.xy_range_oblique().is_none());
    }

    #[test]
    fn test_ring_longitude_in_range() {
        let proj = RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        // full circle contains everything
        assert!(proj.in_ring_longitude_range(725.0));
        assert!(RingPlaneProjection::ring_longitude_in_range(350.0, 370.0, 5.0));
        assert!(!RingPlaneProjection::ring_longitude_in_range(350.0, 370.0, 180.0));
    }

    #[test]
    fn test_in_ring_radius_range() {
        let proj = RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        assert!(proj.in_ring_radius_range(2000.0));
        assert!(proj.in_ring_radius_range(20000.0));
        assert!(!proj.in_ring_radius_range(1999.9));
    }

    #[test]
    fn test_mapping_key_order() {
        let proj = RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        let mapping = proj.mapping();
        let keys: Vec<&str> = mapping.keywords().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            [
                "TargetName",
                "ProjectionName",
                "RingLongitudeDirection",
                "RingLongitudeDomain",
                "MinimumRingRadius",
                "MaximumRingRadius",
                "MinimumRingLongitude",
                "MaximumRingLongitude",
            ]
        );
    }

    #[test]
    fn test_mapping_radii_and_longitudes() {
        let proj = RingPlaneProjection::from_label(&ring_label("CounterClockwise", 360)).unwrap();
        let radii = proj.mapping_ring_radii();
        assert!(radii.has_keyword("MinimumRingRadius"));
        assert!(!radii.has_keyword("MinimumRingLongitude"));
        let lons = proj.mapping_ring_longitudes();
        assert!(lons.has_keyword("MinimumRingLongitude"));
        assert!(!lons.has_keyword("MaximumRingRadius"));
    }
}
