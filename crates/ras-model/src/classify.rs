//! Extension classification for RAS model file sets.
//!
//! Companion files are identified purely by extension: a one-letter kind
//! code followed by a two-digit suffix (01..99), plus the projection
//! sidecar extensions.

/// The kind of a RAS companion file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The project definition file (.prj)
    Project,
    /// Plan file (.pNN)
    Plan(u8),
    /// Geometry file (.gNN)
    Geometry(u8),
    /// Steady flow file (.fNN)
    SteadyFlow(u8),
    /// Unsteady flow file (.uNN)
    UnsteadyFlow(u8),
    /// Quasi-steady flow file (.qNN)
    QuasiSteadyFlow(u8),
    /// Output file (.ONN, capital O)
    Output(u8),
    /// Steady run file (.rNN)
    SteadyRun(u8),
    /// Unsteady run file (.xNN)
    UnsteadyRun(u8),
    /// Projection sidecar (.projection / .proj)
    Projection,
}

impl FileKind {
    /// True for steady, unsteady, and quasi-steady flow files.
    pub fn is_flow(&self) -> bool {
        matches!(
            self,
            FileKind::SteadyFlow(_) | FileKind::UnsteadyFlow(_) | FileKind::QuasiSteadyFlow(_)
        )
    }

    /// True for run files of either kind.
    pub fn is_run(&self) -> bool {
        matches!(self, FileKind::SteadyRun(_) | FileKind::UnsteadyRun(_))
    }
}

/// Parse the two-digit suffix of a typed extension. 00 is not a valid
/// file number.
fn two_digit_suffix(digits: &str) -> Option<u8> {
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u8>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(_) => None,
    }
}

/// Classify an extension (including the leading dot). Unknown extensions
/// return None and are ignored by the driver.
pub fn classify(ext: &str) -> Option<FileKind> {
    match ext {
        ".prj" => return Some(FileKind::Project),
        ".projection" | ".proj" => return Some(FileKind::Projection),
        _ => {}
    }

    let rest = ext.strip_prefix('.')?;
    let mut chars = rest.chars();
    let kind_code = chars.next()?;
    let suffix = two_digit_suffix(chars.as_str())?;

    // the output code is case-sensitive: capital O only
    match kind_code {
        'g' => Some(FileKind::Geometry(suffix)),
        'p' => Some(FileKind::Plan(suffix)),
        'f' => Some(FileKind::SteadyFlow(suffix)),
        'u' => Some(FileKind::UnsteadyFlow(suffix)),
        'q' => Some(FileKind::QuasiSteadyFlow(suffix)),
        'O' => Some(FileKind::Output(suffix)),
        'r' => Some(FileKind::SteadyRun(suffix)),
        'x' => Some(FileKind::UnsteadyRun(suffix)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_typed_extensions() {
        assert_eq!(classify(".g01"), Some(FileKind::Geometry(1)));
        assert_eq!(classify(".p99"), Some(FileKind::Plan(99)));
        assert_eq!(classify(".f10"), Some(FileKind::SteadyFlow(10)));
        assert_eq!(classify(".u02"), Some(FileKind::UnsteadyFlow(2)));
        assert_eq!(classify(".q05"), Some(FileKind::QuasiSteadyFlow(5)));
        assert_eq!(classify(".O01"), Some(FileKind::Output(1)));
        assert_eq!(classify(".r01"), Some(FileKind::SteadyRun(1)));
        assert_eq!(classify(".x01"), Some(FileKind::UnsteadyRun(1)));
    }

    #[test]
    fn test_classify_special_extensions() {
        assert_eq!(classify(".prj"), Some(FileKind::Project));
        assert_eq!(classify(".projection"), Some(FileKind::Projection));
        assert_eq!(classify(".proj"), Some(FileKind::Projection));
    }

    #[test]
    fn test_classify_rejects() {
        assert_eq!(classify(".o01"), None); // lowercase output is not a thing
        assert_eq!(classify(".g00"), None); // 00 is not a valid file number
        assert_eq!(classify(".g1"), None);
        assert_eq!(classify(".g001"), None);
        assert_eq!(classify(".txt"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("g01"), None);
    }

    #[test]
    fn test_flow_grouping() {
        assert!(classify(".f01").unwrap().is_flow());
        assert!(classify(".u01").unwrap().is_flow());
        assert!(classify(".q01").unwrap().is_flow());
        assert!(!classify(".g01").unwrap().is_flow());
        assert!(classify(".r01").unwrap().is_run());
        assert!(classify(".x02").unwrap().is_run());
    }
}
