//! Map projection subsystem for the planetmap toolkit.
//!
//! Converts between ground coordinates — planetocentric/planetographic
//! latitude and longitude for triaxial bodies, or ring radius and ring
//! longitude for ring planes — and 2-D projection-plane coordinates in
//! meters, with an optional [`WorldMapper`] layer out to pixel (or paper)
//! coordinates. This is the layer every operation on map-projected
//! imagery sits on: mosaicking, resampling, coordinate-range computation,
//! and label writing.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`projection`] | [`Projection`] umbrella enum and the label factory |
//! | [`triaxial`] | [`TriaxialProjection`] and its families (sinusoidal, Lambert conformal, orthographic) |
//! | [`ringplane`] | [`RingPlaneProjection`] and the planar family |
//! | [`conventions`] | domain folding, direction flips, latitude-type conversion |
//! | [`base`] | shared projection state, rotation handling, DMS/HMS formatting |
//! | [`label`] | programmatic label model ([`Label`], [`KeywordGroup`]) |
//! | [`mapper`] | [`WorldMapper`] trait and the image [`PixelMapper`] |
//!
//! # Quick Start
//!
//! ```
//! use planetmap_proj::label::{KeywordGroup, Label};
//! use planetmap_proj::Projection;
//!
//! let mut grp = KeywordGroup::new("Mapping");
//! grp.set_text("ProjectionName", "Sinusoidal")
//!     .set_text("TargetName", "Mars")
//!     .set_text("LatitudeType", "Planetocentric")
//!     .set_text("LongitudeDirection", "PositiveEast")
//!     .set_integer("LongitudeDomain", 360)
//!     .set_real("CenterLongitude", 180.0);
//! let mut label = Label::new();
//! label.add_group(grp);
//!
//! let mut proj = Projection::from_label(&label).unwrap();
//! assert!(proj.set_universal_ground(12.0, 185.5));
//! let (x, y) = (proj.x_coord(), proj.y_coord());
//! assert!(proj.set_coordinate(x, y));
//! ```
//!
//! # Failure model
//!
//! Construction from a malformed label is an error with a message naming
//! the offending keyword. Per-point conversion failures (a pixel off the
//! limb, a latitude past the pole, the reserved "absent" sentinel) are
//! soft: the `set_*` call returns false and [`Projection::is_good`] goes
//! false, with no allocation and no error value — these happen once per
//! pixel in mosaic loops.

pub mod base;
pub mod conventions;
pub mod error;
pub mod label;
pub mod mapper;
pub mod projection;
pub mod ringplane;
pub mod targets;
pub mod triaxial;

pub use base::{to_dms, to_hms, to_hours, CoordRange, ProjectionType};
pub use error::{ProjError, ProjResult};
pub use label::{KeywordGroup, KeywordProvider, KeywordValue, Label};
pub use mapper::{PixelMapper, WorldMapper};
pub use projection::Projection;
pub use ringplane::{RingLongitudeDirection, RingPlaneProjection, RingShape};
pub use triaxial::{
    LatitudeType, LongitudeDirection, TriaxialProjection, TriaxialShape,
};
