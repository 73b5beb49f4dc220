//! Unit-system consistency between a model and its coordinate reference system.

use crate::{RasError, RasResult};

/// Linear-unit names (lowercase) that belong to the English unit system.
const ENGLISH_UNITS: [&str; 5] = [
    "english units",
    "us survey foot",
    "foot_us",
    "foot us",
    "us foot",
];

/// Linear-unit names (lowercase) that belong to the SI unit system.
const SI_UNITS: [&str; 3] = ["si units", "metre", "meter"];

fn unit_group(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    if ENGLISH_UNITS.contains(&lower.as_str()) {
        Some("english")
    } else if SI_UNITS.contains(&lower.as_str()) {
        Some("si")
    } else {
        None
    }
}

/// Check that the unit system used by the model and the linear unit of its
/// coordinate reference system agree.
///
/// `model_units` is the `Units` value from the project file (e.g.
/// "English Units"); `crs_units` is the UNIT name from the CRS definition
/// (e.g. "US survey foot"). Comparison is case-insensitive and
/// set-membership based, so "foot_us" and "us survey foot" are equivalent.
pub fn check_unit_consistency(model_units: &str, crs_units: &str) -> RasResult<()> {
    let model_group = unit_group(model_units);
    let crs_group = unit_group(crs_units);

    match (model_group, crs_group) {
        (Some(m), Some(c)) if m == c => Ok(()),
        _ => Err(RasError::UnitMismatch {
            model: model_units.to_string(),
            crs: crs_units.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_group() {
        assert!(check_unit_consistency("English Units", "US survey foot").is_ok());
        assert!(check_unit_consistency("English Units", "Foot_US").is_ok());
        assert!(check_unit_consistency("English Units", "foot us").is_ok());
        assert!(check_unit_consistency("English Units", "US Foot").is_ok());
    }

    #[test]
    fn test_si_group() {
        assert!(check_unit_consistency("SI Units", "metre").is_ok());
        assert!(check_unit_consistency("SI Units", "Meter").is_ok());
    }

    #[test]
    fn test_mismatch() {
        assert!(check_unit_consistency("English Units", "metre").is_err());
        assert!(check_unit_consistency("SI Units", "US survey foot").is_err());
    }

    #[test]
    fn test_symmetry() {
        // The check is symmetric: swapping arguments never changes the verdict.
        let pairs = [
            ("English Units", "us survey foot"),
            ("SI Units", "metre"),
            ("English Units", "meter"),
        ];
        for (a, b) in pairs {
            assert_eq!(
                check_unit_consistency(a, b).is_ok(),
                check_unit_consistency(b, a).is_ok()
            );
        }
    }

    #[test]
    fn test_unknown_unit() {
        assert!(check_unit_consistency("English Units", "degree").is_err());
        assert!(check_unit_consistency("Furlongs", "metre").is_err());
    }
}
