//! Flow (.fNN / .uNN / .qNN) file dispatch.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use ras_common::{path as keypath, RasResult};

use crate::scan::{left_of_equals, right_of_equals, LineScanner};
use crate::steady::{parse_steady, SteadyData};
use crate::unsteady::{parse_unsteady, UnsteadyData};

/// Title/version stub for quasi-steady files, whose detail decoding is not
/// implemented.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuasiSteadyData {
    #[serde(rename = "Flow Title")]
    pub flow_title: String,
    #[serde(rename = "Program Version")]
    pub program_version: String,
}

/// A parsed flow file of any kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FlowData {
    Steady(SteadyData),
    Unsteady(UnsteadyData),
    QuasiUnsteady(QuasiSteadyData),
    /// Kept when the extension was recognized but the payload failed to
    /// parse; the failure is reported via the file record's notes.
    Unparsed,
}

impl Default for FlowData {
    fn default() -> Self {
        FlowData::Unparsed
    }
}

/// A flow file record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowFile {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "File Extension")]
    pub file_ext: String,
    #[serde(rename = "Hash")]
    pub hash: String,
    #[serde(rename = "Notes", default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(flatten)]
    pub data: FlowData,
}

impl FlowFile {
    /// A skeleton record for a key; filled in by [`parse_flow`] or annotated
    /// with notes when parsing fails.
    pub fn stub(path: &str) -> Self {
        Self {
            path: path.to_string(),
            file_ext: keypath::extension(path).to_string(),
            ..Self::default()
        }
    }

    /// Program version of the parsed payload, empty when unknown.
    pub fn program_version(&self) -> &str {
        match &self.data {
            FlowData::Steady(sd) => &sd.program_version,
            FlowData::Unsteady(ud) => &ud.program_version,
            FlowData::QuasiUnsteady(qd) => &qd.program_version,
            FlowData::Unparsed => "",
        }
    }
}

/// Scan a file for its title and version only.
fn title_and_version(text: &str) -> (String, String) {
    let mut title = String::new();
    let mut version = String::new();

    let mut sc = LineScanner::new(text);
    while let Some(line) = sc.next_line() {
        match left_of_equals(line) {
            "Flow Title" => title = right_of_equals(line).to_string(),
            "Program Version" => version = right_of_equals(line).to_string(),
            _ => {}
        }
    }
    (title, version)
}

/// Parse a flow file, choosing the decoder from the extension prefix.
/// The hash is SHA-256 over the raw bytes exactly as stored.
pub fn parse_flow(bytes: &[u8], path: &str) -> RasResult<FlowFile> {
    let mut meta = FlowFile::stub(path);

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    meta.hash = format!("{:x}", hasher.finalize());

    let text = String::from_utf8_lossy(bytes);

    meta.data = match meta.file_ext.get(..2) {
        Some(".f") => FlowData::Steady(parse_steady(&text)?),
        Some(".u") => FlowData::Unsteady(parse_unsteady(&text)?),
        Some(".q") => {
            let (flow_title, program_version) = title_and_version(&text);
            FlowData::QuasiUnsteady(QuasiSteadyData {
                flow_title,
                program_version,
            })
        }
        _ => FlowData::Unparsed,
    };

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_steady() {
        let text = b"Flow Title=S\nProgram Version=5.07\nNumber of Profiles= 1\nProfile Names=PF1\n";
        let flow = parse_flow(text, "case.f01").unwrap();
        assert_eq!(flow.file_ext, ".f01");
        assert!(matches!(flow.data, FlowData::Steady(_)));
        assert_eq!(flow.program_version(), "5.07");
        assert_eq!(flow.hash.len(), 64);
    }

    #[test]
    fn test_dispatch_unsteady() {
        let flow = parse_flow(b"Flow Title=U\nProgram Version=6.1\n", "case.u03").unwrap();
        assert!(matches!(flow.data, FlowData::Unsteady(_)));
        assert_eq!(flow.program_version(), "6.1");
    }

    #[test]
    fn test_dispatch_quasi() {
        let flow = parse_flow(b"Flow Title=Q\nProgram Version=5.07\n", "case.q01").unwrap();
        match &flow.data {
            FlowData::QuasiUnsteady(qd) => {
                assert_eq!(qd.flow_title, "Q");
                assert_eq!(qd.program_version, "5.07");
            }
            other => panic!("expected quasi data, got {:?}", other),
        }
    }
}
