//! Target-body radius lookup.
//!
//! When a mapping group carries a `TargetName` but no radius keywords, the
//! radii come from this table. Values are IAU mean equatorial and polar
//! radii in meters. "Sky" is the no-body target used for celestial
//! projections; it gets unit-kilometer radii so the spherical formulas
//! stay well conditioned.

/// Equatorial and polar radii in meters for a named target body.
pub fn target_radii(target: &str) -> Option<(f64, f64)> {
    let radii = match target.to_ascii_lowercase().as_str() {
        "mercury" => (2_439_700.0, 2_439_700.0),
        "venus" => (6_051_800.0, 6_051_800.0),
        "earth" => (6_378_137.0, 6_356_752.314_2),
        "moon" => (1_737_400.0, 1_737_400.0),
        "mars" => (3_396_190.0, 3_376_200.0),
        "jupiter" => (71_492_000.0, 66_854_000.0),
        "saturn" => (60_268_000.0, 54_364_000.0),
        "uranus" => (25_559_000.0, 24_973_000.0),
        "neptune" => (24_764_000.0, 24_341_000.0),
        "pluto" => (1_188_300.0, 1_188_300.0),
        "sky" => (1_000.0, 1_000.0),
        _ => return None,
    };
    Some(radii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_targets() {
        assert_eq!(target_radii("Mars"), Some((3_396_190.0, 3_376_200.0)));
        assert_eq!(target_radii("MOON"), Some((1_737_400.0, 1_737_400.0)));
        assert_eq!(target_radii("sky"), Some((1_000.0, 1_000.0)));
    }

    #[test]
    fn test_unknown_target() {
        assert_eq!(target_radii("Vulcan"), None);
    }

    #[test]
    fn test_equatorial_not_less_than_polar() {
        for name in [
            "Mercury", "Venus", "Earth", "Moon", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
        ] {
            let (eq, pol) = target_radii(name).unwrap();
            assert!(eq >= pol);
        }
    }
}
