//! State and behavior shared by every projection type.
//!
//! [`ProjectionBase`] owns the pieces that do not depend on whether the
//! body is triaxial or a ring plane: the backing mapping group, map
//! rotation, the optional [`WorldMapper`], the current (x, y) result and
//! its validity flag. The triaxial and ring-plane types embed one and
//! layer their own ground-coordinate bookkeeping on top.

use planetmap_core::constants::{DEG_TO_RAD, DEGREES_PER_HOUR, NULL_REAL};
use planetmap_core::utils::is_null;
use planetmap_core::wrap_360;

use crate::error::{ProjError, ProjResult};
use crate::label::{KeywordGroup, KeywordProvider, Label};
use crate::mapper::WorldMapper;

/// Which ground-coordinate flavor a projection speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Triaxial,
    RingPlane,
}

/// Running x/y extrema accumulator for XY-range computations.
///
/// Created fresh at the top of every range computation so no state leaks
/// between unrelated calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordRange {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl CoordRange {
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            max_x: -f64::MAX,
            min_y: f64::MAX,
            max_y: -f64::MAX,
        }
    }

    pub fn expand(&mut self, x: f64, y: f64) {
        if x < self.min_x {
            self.min_x = x;
        }
        if x > self.max_x {
            self.max_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    /// A range is usable only when both axes are strictly ordered.
    pub fn is_ordered(&self) -> bool {
        self.min_x < self.max_x && self.min_y < self.max_y
    }
}

impl Default for CoordRange {
    fn default() -> Self {
        Self::new()
    }
}

/// Common projection state: rotation, current coordinate, world mapper.
#[derive(Debug)]
pub struct ProjectionBase {
    pub(crate) mapping: KeywordGroup,
    pub(crate) rotation: f64,
    pub(crate) pixel_resolution: f64,
    pub(crate) sky: bool,
    pub(crate) good: bool,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) ground_range_good: bool,
    pub(crate) mapper: Option<Box<dyn WorldMapper>>,
}

impl ProjectionBase {
    /// Reads the shared keywords out of the label's "Mapping" group.
    ///
    /// `Rotation` defaults to 0 and `PixelResolution` to 1.0 when absent.
    /// A target name of "SKY" (any case) marks the projection as having no
    /// physical body.
    pub fn from_label(label: &Label) -> ProjResult<Self> {
        let mapping = label
            .find_group("Mapping")
            .ok_or_else(|| ProjError::missing_group("Mapping"))?
            .clone();

        let rotation = mapping.get_float("Rotation").unwrap_or(0.0);
        let pixel_resolution = mapping.get_float("PixelResolution").unwrap_or(1.0);
        let sky = mapping
            .get_string("TargetName")
            .map(|t| t.eq_ignore_ascii_case("sky"))
            .unwrap_or(false);

        Ok(Self {
            mapping,
            rotation,
            pixel_resolution,
            sky,
            good: false,
            x: NULL_REAL,
            y: NULL_REAL,
            ground_range_good: false,
            mapper: None,
        })
    }

    /// Whether the most recent Set* call produced a valid coordinate.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.good
    }

    /// Last computed projection x in meters. Stale unless [`Self::is_good`].
    #[inline]
    pub fn x_coord(&self) -> f64 {
        self.x
    }

    /// Last computed projection y in meters. Stale unless [`Self::is_good`].
    #[inline]
    pub fn y_coord(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Meters per pixel from the label. Used as the convergence tolerance
    /// for the oblique XY-range search (half a pixel).
    #[inline]
    pub fn pixel_resolution(&self) -> f64 {
        self.pixel_resolution
    }

    #[inline]
    pub fn is_sky(&self) -> bool {
        self.sky
    }

    #[inline]
    pub fn has_ground_range(&self) -> bool {
        self.ground_range_good
    }

    #[inline]
    pub fn mapping_group(&self) -> &KeywordGroup {
        &self.mapping
    }

    /// Takes ownership of a world mapper, releasing any previous one.
    pub fn set_world_mapper(&mut self, mapper: Box<dyn WorldMapper>) {
        self.mapper = Some(mapper);
    }

    /// World units per projection unit; 1.0 without a mapper.
    pub fn resolution(&self) -> f64 {
        match &self.mapper {
            Some(mapper) => mapper.resolution(),
            None => 1.0,
        }
    }

    /// Stores an unrotated coordinate pair, applying the map rotation.
    ///
    /// Sentinel input marks the state bad and leaves the stored
    /// coordinates untouched.
    pub(crate) fn set_computed_xy(&mut self, x: f64, y: f64) {
        if is_null(x) || is_null(y) {
            self.good = false;
            return;
        }
        if self.rotation == 0.0 {
            self.x = x;
            self.y = y;
        } else {
            let rot = self.rotation * DEG_TO_RAD;
            self.x = x * rot.cos() + y * rot.sin();
            self.y = y * rot.cos() - x * rot.sin();
        }
    }

    /// Stores an already-rotated coordinate pair directly.
    pub(crate) fn set_xy(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// The stored x, inverse-rotated back to the projection-native frame.
    pub(crate) fn get_x(&self) -> f64 {
        if self.rotation == 0.0 {
            return self.x;
        }
        let rot = self.rotation * DEG_TO_RAD;
        self.x * rot.cos() - self.y * rot.sin()
    }

    /// The stored y, inverse-rotated back to the projection-native frame.
    pub(crate) fn get_y(&self) -> f64 {
        if self.rotation == 0.0 {
            return self.y;
        }
        let rot = self.rotation * DEG_TO_RAD;
        self.y * rot.cos() + self.x * rot.sin()
    }

    /// Maps a world coordinate pair into projection meters (identity
    /// without a mapper).
    pub(crate) fn projection_from_world(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        match &self.mapper {
            Some(mapper) => (mapper.projection_x(world_x), mapper.projection_y(world_y)),
            None => (world_x, world_y),
        }
    }

    /// The current x in world units.
    pub fn world_x(&self) -> f64 {
        match &self.mapper {
            Some(mapper) => mapper.world_x(self.x),
            None => self.x,
        }
    }

    /// The current y in world units.
    pub fn world_y(&self) -> f64 {
        match &self.mapper {
            Some(mapper) => mapper.world_y(self.y),
            None => self.y,
        }
    }

    /// Stateless projection-x → world-x conversion.
    pub fn to_world_x(&self, projection_x: f64) -> ProjResult<f64> {
        if is_null(projection_x) {
            return Err(ProjError::invalid_coordinate(
                "unable to convert to world x, the given x value is invalid",
            ));
        }
        Ok(match &self.mapper {
            Some(mapper) => mapper.world_x(projection_x),
            None => projection_x,
        })
    }

    /// Stateless projection-y → world-y conversion.
    pub fn to_world_y(&self, projection_y: f64) -> ProjResult<f64> {
        if is_null(projection_y) {
            return Err(ProjError::invalid_coordinate(
                "unable to convert to world y, the given y value is invalid",
            ));
        }
        Ok(match &self.mapper {
            Some(mapper) => mapper.world_y(projection_y),
            None => projection_y,
        })
    }

    /// Stateless world-x → projection-x conversion.
    pub fn to_projection_x(&self, world_x: f64) -> ProjResult<f64> {
        if is_null(world_x) {
            return Err(ProjError::invalid_coordinate(
                "unable to convert to projection x, the given x value is invalid",
            ));
        }
        Ok(match &self.mapper {
            Some(mapper) => mapper.projection_x(world_x),
            None => world_x,
        })
    }

    /// Stateless world-y → projection-y conversion.
    pub fn to_projection_y(&self, world_y: f64) -> ProjResult<f64> {
        if is_null(world_y) {
            return Err(ProjError::invalid_coordinate(
                "unable to convert to projection y, the given y value is invalid",
            ));
        }
        Ok(match &self.mapper {
            Some(mapper) => mapper.projection_y(world_y),
            None => world_y,
        })
    }

    /// Writes the projection coordinate of the upper-left image corner
    /// into the backing mapping group, replacing any prior values.
    pub fn set_upper_left_corner(&mut self, x: f64, y: f64) {
        self.mapping.set_real("UpperLeftCornerX", x);
        self.mapping.set_real("UpperLeftCornerY", y);
    }
}

/// Converts an angle in degrees to hours.
#[inline]
pub fn to_hours(angle: f64) -> f64 {
    angle / DEGREES_PER_HOUR
}

/// Formats an angle in degrees as "D MMm SS.fffs".
///
/// 206.291 degrees becomes "206 17m 27.600s". Fractional seconds carry
/// into seconds, seconds into minutes, minutes into degrees.
pub fn to_dms(angle: f64) -> String {
    let magnitude = angle.abs();
    let mut degrees = magnitude.trunc() as i64;
    let minutes_full = (magnitude - magnitude.trunc()) * 60.0;
    let mut minutes = minutes_full.trunc() as i64;
    let seconds_full = (minutes_full - minutes as f64) * 60.0;
    let mut seconds = seconds_full.trunc() as i64;
    let mut millis = ((seconds_full - seconds as f64) * 1000.0).round() as i64;

    if millis >= 1000 {
        millis -= 1000;
        seconds += 1;
    }
    if seconds >= 60 {
        seconds -= 60;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        degrees += 1;
    }

    let sign = if angle < 0.0 { "-" } else { "" };
    format!("{sign}{degrees} {minutes:02}m {seconds:02}.{millis:03}s")
}

/// Formats an angle in degrees as "HHh MMm SS.fffs".
///
/// The angle is first folded into [0, 360] and divided by 15, so 206.291
/// degrees becomes "13h 45m 09.840s".
pub fn to_hms(angle: f64) -> String {
    let hours_full = to_hours(wrap_360(angle));
    let mut hours = hours_full.trunc() as i64;
    let minutes_full = (hours_full - hours as f64) * 60.0;
    let mut minutes = minutes_full.trunc() as i64;
    let seconds_full = (minutes_full - minutes as f64) * 60.0;
    let mut seconds = seconds_full.trunc() as i64;
    let mut millis = ((seconds_full - seconds as f64) * 1000.0).round() as i64;

    if millis >= 1000 {
        millis -= 1000;
        seconds += 1;
    }
    if seconds >= 60 {
        seconds -= 60;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        hours += 1;
    }

    format!("{hours:02}h {minutes:02}m {seconds:02}.{millis:03}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::PixelMapper;
    use planetmap_core::assert_ulp_lt;

    fn base_with_rotation(rotation: f64) -> ProjectionBase {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_real("Rotation", rotation);
        label.add_group(grp);
        ProjectionBase::from_label(&label).unwrap()
    }

    #[test]
    fn test_missing_mapping_group() {
        let label = Label::new();
        let result = ProjectionBase::from_label(&label);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Mapping"));
    }

    #[test]
    fn test_defaults() {
        let base = base_with_rotation(0.0);
        assert_eq!(base.pixel_resolution(), 1.0);
        assert_eq!(base.resolution(), 1.0);
        assert!(!base.is_sky());
        assert!(!base.is_good());
        assert!(!base.has_ground_range());
    }

    #[test]
    fn test_sky_detection() {
        let mut label = Label::new();
        let mut grp = KeywordGroup::new("Mapping");
        grp.set_text("TargetName", "sKy");
        label.add_group(grp);
        let base = ProjectionBase::from_label(&label).unwrap();
        assert!(base.is_sky());
    }

    #[test]
    fn test_set_computed_xy_no_rotation() {
        let mut base = base_with_rotation(0.0);
        base.set_computed_xy(12.0, -7.0);
        assert_eq!(base.x_coord(), 12.0);
        assert_eq!(base.y_coord(), -7.0);
        assert_eq!(base.get_x(), 12.0);
        assert_eq!(base.get_y(), -7.0);
    }

    #[test]
    fn test_set_computed_xy_sentinel_leaves_state() {
        let mut base = base_with_rotation(0.0);
        base.set_computed_xy(3.0, 4.0);
        base.good = true;
        base.set_computed_xy(NULL_REAL, 4.0);
        assert!(!base.is_good());
        assert_eq!(base.x_coord(), 3.0);
        assert_eq!(base.y_coord(), 4.0);
    }

    #[test]
    fn test_rotation_roundtrip() {
        for rotation in [0.0, 37.0, 90.0, 180.0] {
            let mut base = base_with_rotation(rotation);
            base.set_computed_xy(123.5, -86.25);
            assert_ulp_lt!(base.get_x(), 123.5, 8);
            assert_ulp_lt!(base.get_y(), -86.25, 8);
        }
    }

    #[test]
    fn test_rotation_is_isometry() {
        let pairs = [(0.0, 0.0, 3.0, 4.0), (-10.0, 25.0, 40.0, -12.5)];
        for rotation in [0.0, 37.0, 90.0, 180.0] {
            for (ax, ay, bx, by) in pairs {
                let mut base = base_with_rotation(rotation);
                base.set_computed_xy(ax, ay);
                let (rax, ray) = (base.x_coord(), base.y_coord());
                base.set_computed_xy(bx, by);
                let (rbx, rby) = (base.x_coord(), base.y_coord());

                let before = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
                let after = ((rbx - rax).powi(2) + (rby - ray).powi(2)).sqrt();
                assert!((before - after).abs() < 1.0e-9);
            }
        }
    }

    #[test]
    fn test_world_identity_without_mapper() {
        let mut base = base_with_rotation(0.0);
        base.set_computed_xy(55.0, 66.0);
        assert_eq!(base.world_x(), 55.0);
        assert_eq!(base.world_y(), 66.0);
        assert_eq!(base.to_world_x(10.0).unwrap(), 10.0);
        assert_eq!(base.to_projection_y(20.0).unwrap(), 20.0);
    }

    #[test]
    fn test_world_through_mapper() {
        let mut base = base_with_rotation(0.0);
        base.set_world_mapper(Box::new(PixelMapper::new(100.0, -5000.0, 8000.0)));
        assert_eq!(base.resolution(), 100.0);
        assert_eq!(base.to_projection_x(0.5).unwrap(), -5000.0);
        let px = base.to_projection_x(12.5).unwrap();
        assert_ulp_lt!(base.to_world_x(px).unwrap(), 12.5, 2);
    }

    #[test]
    fn test_mapper_replacement() {
        let mut base = base_with_rotation(0.0);
        base.set_world_mapper(Box::new(PixelMapper::new(100.0, 0.0, 0.0)));
        base.set_world_mapper(Box::new(PixelMapper::new(25.0, 0.0, 0.0)));
        assert_eq!(base.resolution(), 25.0);
    }

    #[test]
    fn test_to_world_rejects_sentinel() {
        let base = base_with_rotation(0.0);
        assert!(base.to_world_x(NULL_REAL).is_err());
        assert!(base.to_world_y(NULL_REAL).is_err());
        assert!(base.to_projection_x(NULL_REAL).is_err());
        assert!(base.to_projection_y(NULL_REAL).is_err());
    }

    #[test]
    fn test_set_upper_left_corner_replaces() {
        let mut base = base_with_rotation(0.0);
        base.set_upper_left_corner(100.0, 200.0);
        base.set_upper_left_corner(-300.0, 400.0);
        let grp = base.mapping_group();
        assert_eq!(grp.get_float("UpperLeftCornerX"), Some(-300.0));
        assert_eq!(grp.get_float("UpperLeftCornerY"), Some(400.0));
    }

    #[test]
    fn test_coord_range_expand_and_order() {
        let mut range = CoordRange::new();
        assert!(!range.is_ordered());
        range.expand(1.0, 5.0);
        assert!(!range.is_ordered());
        range.expand(-2.0, 8.0);
        assert!(range.is_ordered());
        assert_eq!(range.min_x, -2.0);
        assert_eq!(range.max_x, 1.0);
        assert_eq!(range.min_y, 5.0);
        assert_eq!(range.max_y, 8.0);
    }

    #[test]
    fn test_to_hours() {
        assert_eq!(to_hours(30.0), 2.0);
        assert_eq!(to_hours(360.0), 24.0);
    }

    #[test]
    fn test_to_dms() {
        assert_eq!(to_dms(30.5), "30 30m 00.000s");
        assert_eq!(to_dms(206.291), "206 17m 27.600s");
        assert_eq!(to_dms(-30.5), "-30 30m 00.000s");
    }

    #[test]
    fn test_to_dms_carry() {
        // 59.9999999 minutes-of-the-last-second rolls all the way up
        assert_eq!(to_dms(29.9999999999), "30 00m 00.000s");
    }

    #[test]
    fn test_to_hms() {
        assert_eq!(to_hms(30.5), "02h 02m 00.000s");
        assert_eq!(to_hms(206.291), "13h 45m 09.840s");
    }

    #[test]
    fn test_to_hms_wraps_negative() {
        assert_eq!(to_hms(-30.0), to_hms(330.0));
    }
}
