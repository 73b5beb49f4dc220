//! Project (.prj) file parser.

use serde::{Deserialize, Serialize};

use crate::scan::{left_of_equals, read_description, right_of_equals, LineScanner};

/// Contents of a RAS project file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(rename = "Proj Title")]
    pub proj_title: String,
    #[serde(rename = "Plan File")]
    pub plan_files: Vec<String>,
    #[serde(rename = "Flow File")]
    pub flow_files: Vec<String>,
    #[serde(rename = "QuasiSteady File")]
    pub quasi_steady_files: Vec<String>,
    #[serde(rename = "Unsteady File")]
    pub unsteady_files: Vec<String>,
    #[serde(rename = "Geom File")]
    pub geom_files: Vec<String>,
    #[serde(rename = "Units")]
    pub units: String,
    #[serde(rename = "Current Plan")]
    pub current_plan: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Parse a project file.
///
/// Reference keys may repeat; repeats append in source order. Only
/// `Proj Title` is required, and that is enforced by the driver before this
/// parser runs.
pub fn parse_project(text: &str) -> ProjectFile {
    let mut meta = ProjectFile::default();
    let mut sc = LineScanner::new(text);

    while let Some(line) = sc.next_line() {
        if line.contains('=') {
            let value = right_of_equals(line).to_string();
            match left_of_equals(line) {
                "Proj Title" => meta.proj_title = value,
                "Plan File" => meta.plan_files.push(value),
                "Flow File" => meta.flow_files.push(value),
                "QuasiSteady File" => meta.quasi_steady_files.push(value),
                "Unsteady File" => meta.unsteady_files.push(value),
                "Geom File" => meta.geom_files.push(value),
                "Current Plan" => meta.current_plan = value,
                _ => {}
            }
        } else if line.contains("BEGIN DESCRIPTION") {
            let description = read_description(&mut sc, "END DESCRIPTION");
            if !meta.description.is_empty() {
                meta.description.push('\n');
            }
            meta.description.push_str(&description);
        } else if line.contains("Units") {
            meta.units = line.to_string();
        }
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "Proj Title=Church House Gully\r\n\
Default Exp/Contr=0.3,0.1\r\n\
English Units\r\n\
Geom File=g01\r\n\
Geom File=g02\r\n\
Flow File=f01\r\n\
Plan File=p01\r\n\
Current Plan=p01\r\n\
BEGIN DESCRIPTION:\r\n\
A levee study.\r\n\
\r\n\
Second paragraph.\r\n\
END DESCRIPTION:\r\n";

    #[test]
    fn test_parse_project() {
        let meta = parse_project(PROJECT);
        assert_eq!(meta.proj_title, "Church House Gully");
        assert_eq!(meta.geom_files, vec!["g01", "g02"]);
        assert_eq!(meta.flow_files, vec!["f01"]);
        assert_eq!(meta.plan_files, vec!["p01"]);
        assert_eq!(meta.current_plan, "p01");
        assert_eq!(meta.units, "English Units");
        assert_eq!(meta.description, "A levee study.\nSecond paragraph.");
    }

    #[test]
    fn test_title_only_project() {
        let meta = parse_project("Proj Title=Bare\n");
        assert_eq!(meta.proj_title, "Bare");
        assert!(meta.geom_files.is_empty());
        assert!(meta.units.is_empty());
    }
}
