//! Plan (.pNN) file parser.

use serde::{Deserialize, Serialize};

use ras_common::path as keypath;

use crate::scan::{left_of_equals, read_description, right_of_equals, LineScanner};

/// Contents of a RAS plan file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "File Extension")]
    pub file_ext: String,
    #[serde(rename = "Plan Title")]
    pub plan_title: String,
    #[serde(rename = "Short Identifier")]
    pub short_identifier: String,
    #[serde(rename = "Program Version")]
    pub program_version: String,
    #[serde(rename = "Geom File")]
    pub geom_file: String,
    #[serde(rename = "Flow File")]
    pub flow_file: String,
    #[serde(rename = "Flow Regime")]
    pub flow_regime: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Notes", default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl PlanFile {
    /// A skeleton record for a key; filled in by [`parse_plan`] or annotated
    /// with notes when parsing fails.
    pub fn stub(path: &str) -> Self {
        Self {
            path: path.to_string(),
            file_ext: keypath::extension(path).to_string(),
            ..Self::default()
        }
    }
}

/// Parse a plan file.
pub fn parse_plan(text: &str, path: &str) -> PlanFile {
    let mut meta = PlanFile::stub(path);
    let mut sc = LineScanner::new(text);

    while let Some(line) = sc.next_line() {
        if line.contains('=') {
            let value = right_of_equals(line).to_string();
            match left_of_equals(line) {
                "Plan Title" => meta.plan_title = value,
                "Short Identifier" => meta.short_identifier = value,
                "Program Version" => meta.program_version = value,
                "Geom File" => meta.geom_file = value,
                "Flow File" => meta.flow_file = value,
                _ => {}
            }
        } else if line.contains("BEGIN DESCRIPTION") {
            let description = read_description(&mut sc, "END DESCRIPTION");
            if !meta.description.is_empty() {
                meta.description.push('\n');
            }
            meta.description.push_str(&description);
        } else if line.contains("Subcritical")
            || line.contains("Supercritical")
            || line.contains("Mixed")
        {
            meta.flow_regime = line.to_string();
        }
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "Plan Title=100yr Existing\n\
Short Identifier=100yrEx\n\
Program Version=5.07\n\
Geom File=g01\n\
Flow File=f01\n\
Subcritical Flow\n\
BEGIN DESCRIPTION:\n\
Baseline run.\n\
END DESCRIPTION:\n";

    #[test]
    fn test_parse_plan() {
        let meta = parse_plan(PLAN, "models/case/case.p01");
        assert_eq!(meta.path, "models/case/case.p01");
        assert_eq!(meta.file_ext, ".p01");
        assert_eq!(meta.plan_title, "100yr Existing");
        assert_eq!(meta.short_identifier, "100yrEx");
        assert_eq!(meta.program_version, "5.07");
        assert_eq!(meta.geom_file, "g01");
        assert_eq!(meta.flow_file, "f01");
        assert_eq!(meta.flow_regime, "Subcritical Flow");
        assert_eq!(meta.description, "Baseline run.");
    }

    #[test]
    fn test_flow_regime_requires_free_text_line() {
        // A key=value line mentioning a regime is not the regime flag.
        let meta = parse_plan("Plan Title=Mixed Results=x\nMixed\n", "case.p02");
        assert_eq!(meta.flow_regime, "Mixed");
    }
}
