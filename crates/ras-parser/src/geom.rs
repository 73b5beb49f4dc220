//! Geometry (.gNN) file parser — metadata pass.
//!
//! A single forward scan dispatches on element prefixes. Nested blocks
//! (structures, areas, connections, BC lines) are read by bounded
//! sub-scanners addressed by the element's line index, so an element that
//! fails to parse is skipped without losing the rest of the file.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::warn;

use ras_common::path as keypath;

use crate::areas::{parse_area, parse_bc_line, AreaKind, StorageArea, TwoDArea};
use crate::connections::{parse_connection, Connection};
use crate::scan::{read_description, LineScanner};
use crate::structures::{parse_structures, HydraulicStructures};

/// Contents of a RAS geometry file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeomFile {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Hash")]
    pub hash: String,
    #[serde(rename = "File Extension")]
    pub file_ext: String,
    #[serde(rename = "Geom Title")]
    pub geom_title: String,
    #[serde(rename = "Program Version")]
    pub program_version: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Hydraulic Structures")]
    pub structures: Vec<HydraulicStructures>,
    #[serde(rename = "Storage Areas")]
    pub storage_areas: BTreeMap<String, StorageArea>,
    #[serde(rename = "2D Areas")]
    pub two_d_areas: BTreeMap<String, TwoDArea>,
    #[serde(rename = "Connections")]
    pub connections: BTreeMap<String, Connection>,
    #[serde(rename = "Notes", default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl GeomFile {
    /// A skeleton record for a key; filled in by [`parse_geom`] or annotated
    /// with notes when parsing fails.
    pub fn stub(path: &str) -> Self {
        Self {
            path: path.to_string(),
            file_ext: keypath::extension(path).to_string(),
            ..Self::default()
        }
    }
}

/// Parse a geometry file's metadata. The hash is SHA-256 over the raw
/// bytes exactly as stored.
pub fn parse_geom(bytes: &[u8], path: &str) -> GeomFile {
    let mut meta = GeomFile::stub(path);

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    meta.hash = format!("{:x}", hasher.finalize());

    let text = String::from_utf8_lossy(bytes);
    let sc = LineScanner::new(&text);
    let mut cursor = sc.clone();

    // Geometry descriptions are only honored in the file header; once the
    // first element appears, later description blocks belong to elements.
    let mut header = true;

    while let Some(line) = cursor.next_line() {
        let element_idx = cursor.pos() - 1;

        if let Some(value) = line.strip_prefix("Geom Title=") {
            meta.geom_title = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("Program Version=") {
            meta.program_version = value.trim().to_string();
        } else if line.starts_with("BEGIN GEOM DESCRIPTION:") {
            let description = read_description(&mut cursor, "END GEOM DESCRIPTION");
            if header {
                meta.description.push_str(&description);
            }
        } else if line.starts_with("River Reach=") {
            match parse_structures(&sc, element_idx) {
                Ok(structures) => meta.structures.push(structures),
                Err(err) => warn!(file = %meta.file_ext, %err, "Hydraulic Structures"),
            }
            header = false;
        } else if line.starts_with("Storage Area=") {
            match parse_area(&sc, element_idx) {
                Ok((name, AreaKind::Storage(area))) => {
                    meta.storage_areas.insert(name, area);
                }
                Ok((name, AreaKind::TwoD(area))) => {
                    meta.two_d_areas.insert(name, area);
                }
                Err(err) => warn!(file = %meta.file_ext, %err, "SA/2D Areas"),
            }
            header = false;
        } else if line.starts_with("Connection=") {
            match parse_connection(&sc, element_idx) {
                Ok((name, connection)) => {
                    meta.connections.insert(name, connection);
                }
                Err(err) => warn!(file = %meta.file_ext, %err, "Connections"),
            }
            header = false;
        } else if line.starts_with("BC Line Name=") {
            match parse_bc_line(&sc, element_idx) {
                Ok((area_name, bc_name)) => {
                    if let Some(area) = meta.storage_areas.get_mut(&area_name) {
                        area.num_bc_lines += 1;
                        area.bc_lines.push(bc_name);
                    } else if let Some(area) = meta.two_d_areas.get_mut(&area_name) {
                        area.num_bc_lines += 1;
                        area.bc_lines.push(bc_name);
                    }
                }
                Err(err) => warn!(file = %meta.file_ext, %err, "BC Line"),
            }
            header = false;
        }
    }

    meta
}
