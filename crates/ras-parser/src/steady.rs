//! Steady flow (.fNN) file parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ras_common::{RasError, RasResult};

use crate::block::{pairs_from_block, parse_count, parse_float_permissive, series_from_block};
use crate::scan::{is_element, left_of_equals, right_of_equals, LineScanner};

/// Prefixes that begin a new steady flow element.
const STEADY_ELEMENTS: [&str; 2] = ["River Rch & RM", "Boundary for River Rch & Prof#"];

/// Map a steady boundary-condition type code to its name.
fn bc_type_name(code: &str) -> &'static str {
    match code {
        "1" => "Known WS",
        "2" => "Critical Depth",
        "3" => "Normal Depth",
        "4" => "Rating Curve",
        _ => "",
    }
}

/// Contents of a steady flow file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SteadyData {
    #[serde(rename = "Flow Title")]
    pub flow_title: String,
    #[serde(rename = "Program Version")]
    pub program_version: String,
    #[serde(rename = "Profiles")]
    pub profiles: Vec<Profile>,
}

/// One steady flow profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Boundary Conditions")]
    pub boundary_conditions: BTreeMap<String, ReachBoundaryConditions>,
    #[serde(rename = "Flows")]
    pub flows: BTreeMap<String, Vec<RsFlow>>,
    #[serde(rename = "Storage Area Elevations")]
    pub storage_area_elevations: Vec<StoAreaElevation>,
}

/// Upstream and downstream boundary conditions for one reach.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReachBoundaryConditions {
    #[serde(rename = "Up")]
    pub up: SteadyBoundaryCondition,
    #[serde(rename = "Dn")]
    pub dn: SteadyBoundaryCondition,
}

/// A steady boundary condition: a type tag plus its typed payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SteadyBoundaryCondition {
    #[serde(rename = "type")]
    pub bc_type: String,
    #[serde(rename = "data")]
    pub data: SteadyBcData,
}

/// Typed steady BC payload. Serialized as the map shape consumers expect:
/// `{"Known WS": 12.5}`, `{"Slope": 0.001}`, `{"Rating Curve": [[s, e], ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SteadyBcData {
    KnownWs {
        #[serde(rename = "Known WS")]
        value: f64,
    },
    Slope {
        #[serde(rename = "Slope")]
        value: f64,
    },
    RatingCurve {
        #[serde(rename = "Rating Curve")]
        values: Vec<[f64; 2]>,
    },
    #[default]
    None,
}

/// A river-station/flow pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsFlow {
    #[serde(rename = "river_station")]
    pub rs: String,
    #[serde(rename = "flow")]
    pub flow: f64,
}

/// A storage-area/elevation pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoAreaElevation {
    #[serde(rename = "storage_area")]
    pub storage_area: String,
    #[serde(rename = "elevation")]
    pub elevation: f64,
}

/// Pre-scan for the profile count and names. Both must be present; the
/// scan stops early once the name count matches the declared count.
fn profile_names(text: &str) -> RasResult<(usize, Vec<String>)> {
    let mut num_profiles = 0usize;
    let mut names: Vec<String> = Vec::new();

    let mut sc = LineScanner::new(text);
    while let Some(line) = sc.next_line() {
        match left_of_equals(line) {
            "Number of Profiles" => {
                num_profiles = right_of_equals(line)
                    .parse()
                    .map_err(|_| RasError::parse(format!("invalid profile count in '{}'", line)))?;
            }
            "Profile Names" => {
                names = right_of_equals(line)
                    .split(',')
                    .map(|s| s.to_string())
                    .collect();
            }
            _ => {}
        }
        if num_profiles > 0 && num_profiles == names.len() {
            return Ok((num_profiles, names));
        }
    }

    Err(RasError::parse(
        "couldn't find the number of profiles or the profile names".to_string(),
    ))
}

/// Parse a `River Rch & RM=river,reach,RS` header into a reach key and RS.
fn parse_flow_header(line: &str) -> RasResult<(String, String)> {
    let parts: Vec<&str> = right_of_equals(line).split(',').collect();
    if parts.first().map(|s| s.trim()).unwrap_or("").is_empty() {
        return Err(RasError::parse(format!(
            "cannot determine river/reach name at line '{}'",
            line
        )));
    }
    let reach = format!(
        "{} - {}",
        parts[0].trim(),
        parts.get(1).map(|s| s.trim()).unwrap_or("")
    );
    let rs = parts.get(2).map(|s| s.trim()).unwrap_or("").to_string();
    Ok((reach, rs))
}

/// Read the per-profile flow vector that follows a `River Rch & RM=` line
/// and append one {RS, flow} entry to every profile's reach.
fn read_reach_flows(sc: &mut LineScanner, line: &str, sd: &mut SteadyData) -> RasResult<()> {
    let (reach, rs) = parse_flow_header(line)?;

    let series = series_from_block(sc, sd.profiles.len(), 80, 8)?;
    for (profile, flow) in sd.profiles.iter_mut().zip(series) {
        profile
            .flows
            .entry(reach.clone())
            .or_default()
            .push(RsFlow { rs: rs.clone(), flow });
    }
    Ok(())
}

/// Parse a `Boundary for River Rch & Prof#=river,reach,N` header.
fn parse_bc_header(line: &str) -> RasResult<(String, usize)> {
    let parts: Vec<&str> = right_of_equals(line).split(',').collect();
    if parts.first().map(|s| s.trim()).unwrap_or("").is_empty() {
        return Err(RasError::parse(format!(
            "cannot determine river/reach name, profile number at line '{}'",
            line
        )));
    }
    let reach = format!(
        "{} - {}",
        parts[0].trim(),
        parts.get(1).map(|s| s.trim()).unwrap_or("")
    );
    let profile_num: usize = parts
        .get(2)
        .map(|s| s.trim())
        .unwrap_or("")
        .parse()
        .map_err(|_| RasError::parse(format!("invalid profile number in '{}'", line)))?;
    Ok((reach, profile_num))
}

/// Read the boundary-condition block that follows a
/// `Boundary for River Rch & Prof#=` line. The reader stops at the next
/// element boundary without consuming it.
fn read_reach_bcs(sc: &mut LineScanner, line: &str, sd: &mut SteadyData) -> RasResult<()> {
    let (reach, profile_num) = parse_bc_header(line)?;

    let profile = sd
        .profiles
        .get_mut(profile_num.wrapping_sub(1))
        .ok_or_else(|| RasError::parse(format!("profile number {} out of range", profile_num)))?;
    let bcs = profile.boundary_conditions.entry(reach).or_default();

    while let Some(line) = sc.peek() {
        if is_element(line, &STEADY_ELEMENTS) {
            return Ok(());
        }
        let line = line.to_string();
        sc.advance();

        let key = left_of_equals(&line);
        match key {
            "Up Type" | "Dn Type" => {
                let entry = if key.starts_with("Up") { &mut bcs.up } else { &mut bcs.dn };
                entry.bc_type = bc_type_name(right_of_equals(&line)).to_string();
            }
            "Up Known WS" | "Dn Known WS" => {
                let wse = parse_float_permissive(right_of_equals(&line))?;
                let entry = if key.starts_with("Up") { &mut bcs.up } else { &mut bcs.dn };
                entry.data = SteadyBcData::KnownWs { value: wse };
            }
            "Up Slope" | "Dn Slope" => {
                let slope = parse_float_permissive(right_of_equals(&line))?;
                let entry = if key.starts_with("Up") { &mut bcs.up } else { &mut bcs.dn };
                entry.data = SteadyBcData::Slope { value: slope };
            }
            "Up Rating Curve # Pts" | "Dn Rating Curve # Pts" => {
                let n_pairs = parse_count(&line)?;
                let pairs = pairs_from_block(sc, n_pairs, 80, 8)?;
                let entry = if key.starts_with("Up") { &mut bcs.up } else { &mut bcs.dn };
                entry.data = SteadyBcData::RatingCurve { values: pairs };
            }
            _ => {}
        }
    }
    Ok(())
}

/// Parse a steady flow file.
pub fn parse_steady(text: &str) -> RasResult<SteadyData> {
    // The count and names can sit anywhere in the file, so they are
    // harvested by a pre-scan before the element scan begins.
    let (num_profiles, names) = profile_names(text)?;

    let mut sd = SteadyData {
        profiles: names
            .into_iter()
            .take(num_profiles)
            .map(|name| Profile {
                name,
                ..Profile::default()
            })
            .collect(),
        ..SteadyData::default()
    };

    let mut sc = LineScanner::new(text);
    while let Some(line) = sc.next_line() {
        match left_of_equals(line) {
            "Flow Title" => sd.flow_title = right_of_equals(line).to_string(),
            "Program Version" => sd.program_version = right_of_equals(line).to_string(),
            "River Rch & RM" => read_reach_flows(&mut sc, line, &mut sd)?,
            "Boundary for River Rch & Prof#" => read_reach_bcs(&mut sc, line, &mut sd)?,
            _ => {}
        }
    }

    Ok(sd)
}
