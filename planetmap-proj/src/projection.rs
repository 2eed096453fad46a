//! The projection umbrella: one value that is either a triaxial or a
//! ring-plane projection, plus the label-driven factory.
//!
//! Callers that do not care which flavor they hold (mosaicking,
//! resampling, coordinate reporting) work through [`Projection`]; the
//! universal-ground calls dispatch on the flavor so the same (coord1,
//! coord2) pair means (latitude, longitude) or (ring radius, ring
//! longitude) as appropriate.

use crate::base::{CoordRange, ProjectionType};
use crate::error::{ProjError, ProjResult};
use crate::label::{KeywordGroup, KeywordProvider, Label};
use crate::mapper::WorldMapper;
use crate::ringplane::RingPlaneProjection;
use crate::triaxial::TriaxialProjection;

/// A map projection of either flavor.
#[derive(Debug)]
pub enum Projection {
    Triaxial(TriaxialProjection),
    RingPlane(RingPlaneProjection),
}

impl Projection {
    /// Selects and constructs the concrete projection named by the
    /// label's `ProjectionName` keyword.
    pub fn from_label(label: &Label) -> ProjResult<Self> {
        let mapping = label
            .find_group("Mapping")
            .ok_or_else(|| ProjError::missing_group("Mapping"))?;
        let name = mapping.require_string("ProjectionName")?;

        match name.as_str() {
            "Sinusoidal" => Ok(Self::Triaxial(TriaxialProjection::sinusoidal(label)?)),
            "LambertConformal" => Ok(Self::Triaxial(TriaxialProjection::lambert_conformal(
                label,
            )?)),
            "Orthographic" => Ok(Self::Triaxial(TriaxialProjection::orthographic(label)?)),
            "Planar" => Ok(Self::RingPlane(RingPlaneProjection::planar(label)?)),
            other => Err(ProjError::unsupported_projection(other)),
        }
    }

    #[inline]
    pub fn projection_type(&self) -> ProjectionType {
        match self {
            Self::Triaxial(_) => ProjectionType::Triaxial,
            Self::RingPlane(_) => ProjectionType::RingPlane,
        }
    }

    /// The triaxial projection inside, if that is what this is.
    pub fn as_triaxial(&self) -> Option<&TriaxialProjection> {
        match self {
            Self::Triaxial(proj) => Some(proj),
            Self::RingPlane(_) => None,
        }
    }

    pub fn as_ring_plane(&self) -> Option<&RingPlaneProjection> {
        match self {
            Self::Triaxial(_) => None,
            Self::RingPlane(proj) => Some(proj),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Triaxial(proj) => proj.name(),
            Self::RingPlane(proj) => proj.name(),
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            Self::Triaxial(proj) => proj.version(),
            Self::RingPlane(proj) => proj.version(),
        }
    }

    pub fn is_good(&self) -> bool {
        match self {
            Self::Triaxial(proj) => proj.is_good(),
            Self::RingPlane(proj) => proj.is_good(),
        }
    }

    pub fn x_coord(&self) -> f64 {
        match self {
            Self::Triaxial(proj) => proj.x_coord(),
            Self::RingPlane(proj) => proj.x_coord(),
        }
    }

    pub fn y_coord(&self) -> f64 {
        match self {
            Self::Triaxial(proj) => proj.y_coord(),
            Self::RingPlane(proj) => proj.y_coord(),
        }
    }

    pub fn resolution(&self) -> f64 {
        match self {
            Self::Triaxial(proj) => proj.resolution(),
            Self::RingPlane(proj) => proj.resolution(),
        }
    }

    pub fn is_sky(&self) -> bool {
        match self {
            Self::Triaxial(proj) => proj.is_sky(),
            Self::RingPlane(proj) => proj.is_sky(),
        }
    }

    pub fn has_ground_range(&self) -> bool {
        match self {
            Self::Triaxial(proj) => proj.has_ground_range(),
            Self::RingPlane(proj) => proj.has_ground_range(),
        }
    }

    pub fn set_world_mapper(&mut self, mapper: Box<dyn WorldMapper>) {
        match self {
            Self::Triaxial(proj) => proj.set_world_mapper(mapper),
            Self::RingPlane(proj) => proj.set_world_mapper(mapper),
        }
    }

    pub fn set_upper_left_corner(&mut self, x: f64, y: f64) {
        match self {
            Self::Triaxial(proj) => proj.set_upper_left_corner(x, y),
            Self::RingPlane(proj) => proj.set_upper_left_corner(x, y),
        }
    }

    /// Sets the ground from universal coordinates; (coord1, coord2) is
    /// (planetocentric latitude, positive-east 360 longitude) for a
    /// triaxial projection and (ring radius, counterclockwise 360 ring
    /// longitude) for a ring plane. Sentinel input fails immediately.
    pub fn set_universal_ground(&mut self, coord1: f64, coord2: f64) -> bool {
        match self {
            Self::Triaxial(proj) => proj.set_universal_ground(coord1, coord2),
            Self::RingPlane(proj) => proj.set_universal_ground(coord1, coord2),
        }
    }

    /// As [`Self::set_universal_ground`] but without the longitude domain
    /// fold.
    pub fn set_unbound_universal_ground(&mut self, coord1: f64, coord2: f64) -> bool {
        match self {
            Self::Triaxial(proj) => proj.set_unbound_universal_ground(coord1, coord2),
            Self::RingPlane(proj) => proj.set_unbound_universal_ground(coord1, coord2),
        }
    }

    pub fn set_coordinate(&mut self, x: f64, y: f64) -> bool {
        match self {
            Self::Triaxial(proj) => proj.set_coordinate(x, y),
            Self::RingPlane(proj) => proj.set_coordinate(x, y),
        }
    }

    pub fn set_world(&mut self, world_x: f64, world_y: f64) -> bool {
        match self {
            Self::Triaxial(proj) => proj.set_world(world_x, world_y),
            Self::RingPlane(proj) => proj.set_world(world_x, world_y),
        }
    }

    pub fn world_x(&self) -> f64 {
        match self {
            Self::Triaxial(proj) => proj.world_x(),
            Self::RingPlane(proj) => proj.world_x(),
        }
    }

    pub fn world_y(&self) -> f64 {
        match self {
            Self::Triaxial(proj) => proj.world_y(),
            Self::RingPlane(proj) => proj.world_y(),
        }
    }

    pub fn scale(&self) -> f64 {
        match self {
            Self::Triaxial(proj) => proj.scale(),
            Self::RingPlane(proj) => proj.scale(),
        }
    }

    /// The local radius at the last-set ground point, in meters.
    pub fn local_radius(&self) -> ProjResult<f64> {
        match self {
            Self::Triaxial(proj) => proj.local_radius(),
            Self::RingPlane(proj) => Ok(proj.local_radius()),
        }
    }

    pub fn xy_range(&mut self) -> Option<CoordRange> {
        match self {
            Self::Triaxial(proj) => proj.xy_range(),
            Self::RingPlane(proj) => proj.xy_range(),
        }
    }

    pub fn mapping(&self) -> KeywordGroup {
        match self {
            Self::Triaxial(proj) => proj.mapping(),
            Self::RingPlane(proj) => proj.mapping(),
        }
    }
}

/// Shallow equality: two projections are equal iff their resolution and
/// family name match. Radii, ground range, and all other configuration
/// are deliberately not compared — downstream code depends on exactly
/// this notion.
impl PartialEq for Projection {
    fn eq(&self, other: &Self) -> bool {
        self.resolution() == other.resolution() && self.name() == other.name()
    }
}
