//! Helpers for object-store keys.
//!
//! Keys are '/'-separated regardless of platform, so these are implemented
//! over strings rather than `std::path`.

/// The final component of a key.
pub fn base_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// The parent prefix of a key, without a trailing slash. Empty for bare names.
pub fn parent(key: &str) -> &str {
    match key.rfind('/') {
        Some(idx) => &key[..idx],
        None => "",
    }
}

/// The extension of a key including the leading dot (".g01"), or "" if the
/// base name has no dot.
pub fn extension(key: &str) -> &str {
    let name = base_name(key);
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// The key with its extension removed ("models/run/case.prj" -> "models/run/case").
pub fn strip_extension(key: &str) -> &str {
    let ext = extension(key);
    if ext.is_empty() {
        key
    } else {
        &key[..key.len() - ext.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("models/ras/case/case.prj"), "case.prj");
        assert_eq!(base_name("case.prj"), "case.prj");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("models/ras/case/case.prj"), "models/ras/case");
        assert_eq!(parent("case.prj"), "");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("models/case.g01"), ".g01");
        assert_eq!(extension("models/case.prj"), ".prj");
        assert_eq!(extension("models/noext"), "");
        assert_eq!(extension("models/dotted.dir/noext"), "");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("models/case.prj"), "models/case");
        assert_eq!(strip_extension("models/noext"), "models/noext");
    }
}
