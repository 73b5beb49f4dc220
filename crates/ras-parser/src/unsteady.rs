//! Unsteady flow (.uNN) file parser.
//!
//! Boundary conditions hang off `Boundary Location=` headers whose
//! comma-separated columns identify the parent kind positionally: columns
//! 0-1 name a river/reach, column 4 a connection, column 5 a storage/2D
//! area, column 6 a pump station. Exactly one must be populated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use ras_common::{RasError, RasResult};

use crate::block::{pairs_from_block, parse_count, parse_float_permissive, series_from_block};
use crate::scan::{is_element, left_of_equals, right_of_equals, LineScanner};

/// Prefixes that begin a new unsteady flow element.
const UNSTEADY_ELEMENTS: [&str; 3] = ["Flow Title", "Program Version", "Boundary Location"];

/// Contents of an unsteady flow file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnsteadyData {
    #[serde(rename = "Flow Title")]
    pub flow_title: String,
    #[serde(rename = "Program Version")]
    pub program_version: String,
    #[serde(rename = "Initial Conditions")]
    pub initial_conditions: String,
    #[serde(rename = "Boundary Conditions")]
    pub boundary_conditions: UnsteadyBoundaryConditions,
    #[serde(rename = "Meteorological Data")]
    pub meteorological_data: String,
    #[serde(rename = "Observed Data")]
    pub observed_data: String,
}

impl UnsteadyData {
    fn new() -> Self {
        Self {
            initial_conditions: "Not Implemented".to_string(),
            meteorological_data: "Not Implemented".to_string(),
            observed_data: "Not Implemented".to_string(),
            ..Self::default()
        }
    }
}

/// Boundary conditions grouped by parent kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnsteadyBoundaryConditions {
    /// There can be many boundary conditions for the same element.
    #[serde(rename = "Reaches")]
    pub reaches: BTreeMap<String, Vec<BoundaryCondition>>,
    #[serde(rename = "Areas")]
    pub areas: BTreeMap<String, Vec<BoundaryCondition>>,
    #[serde(rename = "Connections")]
    pub connections: BTreeMap<String, Vec<BoundaryCondition>>,
    /// A pump station carries at most one boundary condition.
    #[serde(rename = "Pump Stations")]
    pub pump_stations: BTreeMap<String, BoundaryCondition>,
}

/// One boundary condition: parent discriminators plus a typed payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundaryCondition {
    /// River station; only set for reach parents.
    #[serde(rename = "RS", default, skip_serializing_if = "String::is_empty")]
    pub rs: String,
    /// BC line tag; only set for area parents.
    #[serde(rename = "bc_line", default, skip_serializing_if = "String::is_empty")]
    pub bc_line: String,
    #[serde(rename = "description", default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type")]
    pub bc_type: String,
    #[serde(rename = "data")]
    pub data: BcData,
}

/// Typed boundary-condition payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BcData {
    Hydrograph(Hydrograph),
    RatingCurve(RatingCurve),
    /// Time-series gate openings keyed by gate name.
    Gates(BTreeMap<String, Hydrograph>),
    FrictionSlope {
        #[serde(rename = "Friction Slope")]
        slope: f64,
    },
    /// Payloads this extractor recognizes but does not decode (rules,
    /// elevation-controlled gates, navigation dams).
    Marker(String),
    #[default]
    None,
}

/// A rating curve payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingCurve {
    #[serde(rename = "values", default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<[f64; 2]>,
    #[serde(rename = "use_dss")]
    pub use_dss: bool,
    #[serde(rename = "dss_file", default, skip_serializing_if = "String::is_empty")]
    pub dss_file: String,
    #[serde(rename = "dss_path", default, skip_serializing_if = "String::is_empty")]
    pub dss_path: String,
}

/// Hydrograph data: flow, stage, precipitation, lateral inflow, groundwater
/// interflow, or gate-opening series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hydrograph {
    #[serde(rename = "time_interval", default, skip_serializing_if = "String::is_empty")]
    pub time_interval: String,
    /// Flow is distributed from RS to this river station. Only set for
    /// reaches with uniform lateral inflow or groundwater interflow.
    #[serde(
        rename = "flow_distribution_last_RS",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub end_rs: String,
    #[serde(rename = "values", default, skip_serializing_if = "Option::is_none")]
    pub values: Option<HydrographValues>,
    #[serde(rename = "use_dss")]
    pub use_dss: bool,
    #[serde(rename = "dss_file", default, skip_serializing_if = "String::is_empty")]
    pub dss_file: String,
    #[serde(rename = "dss_path", default, skip_serializing_if = "String::is_empty")]
    pub dss_path: String,
    #[serde(rename = "fixed_start")]
    pub use_fixed_start: bool,
    #[serde(
        rename = "fixed_start_date_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fixed_start_date_time: Option<DateTimeStamp>,
}

/// Hydrograph value storage: single series or stage/flow pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HydrographValues {
    Series(Vec<f64>),
    Pairs(Vec<[f64; 2]>),
}

/// A start date/time. Hours stay textual so "0015" is not read as 15.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateTimeStamp {
    #[serde(rename = "date", default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(rename = "hours", default, skip_serializing_if = "String::is_empty")]
    pub hours: String,
}

/// The parent kind a BC header resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    Reach,
    Connection,
    Area,
    PumpStation,
}

/// Parse a `Boundary Location=` header. Returns the parent kind, the parent
/// key, the flow-distribution end RS (reaches only), and a BC skeleton with
/// RS / BC-line tags filled in.
pub fn parse_bc_header(
    line: &str,
) -> RasResult<(ParentKind, String, String, BoundaryCondition)> {
    let value = right_of_equals(line);
    let cols: Vec<&str> = value.split(',').collect();
    let col = |idx: usize| cols.get(idx).map(|s| s.trim()).unwrap_or("");

    let populated = [!col(0).is_empty(), !col(4).is_empty(), !col(5).is_empty(), !col(6).is_empty()];
    if populated.iter().filter(|p| **p).count() != 1 {
        return Err(RasError::CannotDetermineParent(line.to_string()));
    }

    let mut bc = BoundaryCondition::default();
    if !col(0).is_empty() {
        let parent = format!("{} - {}", col(0), col(1));
        bc.rs = col(2).to_string();
        let flow_end_rs = col(3).to_string();
        Ok((ParentKind::Reach, parent, flow_end_rs, bc))
    } else if !col(4).is_empty() {
        Ok((ParentKind::Connection, col(4).to_string(), String::new(), bc))
    } else if !col(5).is_empty() {
        bc.bc_line = col(7).to_string();
        Ok((ParentKind::Area, col(5).to_string(), String::new(), bc))
    } else {
        Ok((ParentKind::PumpStation, col(6).to_string(), String::new(), bc))
    }
}

/// Read a DSS/fixed-start trailer shared by hydrographs, stopping at the
/// next element boundary without consuming it.
fn read_hydrograph_trailer(sc: &mut LineScanner, hg: &mut Hydrograph) {
    while let Some(line) = sc.peek() {
        if is_element(line, &UNSTEADY_ELEMENTS) {
            return;
        }
        let line = line.to_string();
        sc.advance();

        match left_of_equals(&line) {
            "Use DSS" => {
                if right_of_equals(&line) == "True" {
                    hg.use_dss = true;
                }
            }
            "DSS File" => hg.dss_file = right_of_equals(&line).to_string(),
            "DSS Path" => hg.dss_path = right_of_equals(&line).to_string(),
            "Use Fixed Start Time" => {
                if right_of_equals(&line) == "True" {
                    hg.use_fixed_start = true;
                }
            }
            "Fixed Start Date/Time" => {
                let parts: Vec<&str> = right_of_equals(&line).split(',').collect();
                if !parts.first().unwrap_or(&"").is_empty() {
                    hg.fixed_start_date_time = Some(DateTimeStamp {
                        date: parts[0].to_string(),
                        hours: parts.get(1).unwrap_or(&"").to_string(),
                    });
                }
            }
            _ => {}
        }
    }
}

/// Read hydrograph data from the count on the current header line, then the
/// DSS/fixed-start trailer.
fn read_hydrograph(
    sc: &mut LineScanner,
    header_line: &str,
    paired: bool,
    flow_end_rs: &str,
) -> RasResult<Hydrograph> {
    let mut hg = Hydrograph {
        end_rs: flow_end_rs.to_string(),
        ..Hydrograph::default()
    };

    let count = parse_count(header_line)?;
    if paired {
        hg.values = Some(HydrographValues::Pairs(pairs_from_block(sc, count, 80, 8)?));
    } else if count != 0 {
        hg.values = Some(HydrographValues::Series(series_from_block(sc, count, 80, 8)?));
    }

    read_hydrograph_trailer(sc, &mut hg);
    Ok(hg)
}

/// Read a rating curve from the count on the current header line.
fn read_rating_curve(sc: &mut LineScanner, header_line: &str) -> RasResult<RatingCurve> {
    let mut rc = RatingCurve {
        values: pairs_from_block(sc, parse_count(header_line)?, 80, 8)?,
        ..RatingCurve::default()
    };

    while let Some(line) = sc.peek() {
        if is_element(line, &UNSTEADY_ELEMENTS) {
            break;
        }
        let line = line.to_string();
        sc.advance();

        match left_of_equals(&line) {
            "Use DSS" => {
                if right_of_equals(&line) == "True" {
                    rc.use_dss = true;
                }
            }
            "DSS File" => rc.dss_file = right_of_equals(&line).to_string(),
            "DSS Path" => rc.dss_path = right_of_equals(&line).to_string(),
            _ => {}
        }
    }
    Ok(rc)
}

/// Handle one line of a gate-openings block.
fn handle_gate_line(
    line: &str,
    sc: &mut LineScanner,
    gates: &mut BTreeMap<String, Hydrograph>,
    current: &mut Option<String>,
) -> RasResult<()> {
    let key = left_of_equals(line);
    if key == "Gate Name" {
        // a new gate starts a fresh record to assign data to
        let name = right_of_equals(line).to_string();
        gates.insert(name.clone(), Hydrograph::default());
        *current = Some(name);
        return Ok(());
    }

    let Some(name) = current.as_ref() else {
        warn!(key, "gate field before any Gate Name");
        return Ok(());
    };
    let Some(hg) = gates.get_mut(name) else {
        return Ok(());
    };

    match key {
        "Gate Use DSS" => {
            if right_of_equals(line) == "True" {
                hg.use_dss = true;
            }
        }
        "Gate DSS File" => hg.dss_file = right_of_equals(line).to_string(),
        "Gate DSS Path" => hg.dss_path = right_of_equals(line).to_string(),
        "Gate Time Interval" => hg.time_interval = right_of_equals(line).to_string(),
        "Gate Use Fixed Start Time" => {
            if right_of_equals(line) == "True" {
                hg.use_fixed_start = true;
            }
        }
        "Gate Fixed Start Date/Time" => {
            let value = right_of_equals(line);
            let parts: Vec<&str> = value.split(',').collect();
            if !parts.first().unwrap_or(&"").is_empty() {
                hg.fixed_start_date_time = Some(DateTimeStamp {
                    date: parts[0].to_string(),
                    hours: parts.get(1).unwrap_or(&"").to_string(),
                });
            }
        }
        "Gate Openings" => {
            let count = parse_count(line)?;
            if count != 0 {
                hg.values = Some(HydrographValues::Series(series_from_block(sc, count, 80, 8)?));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Read time-series gate openings. The cursor sits just past the first
/// `Gate Name=` line, which is passed in as `first_line`.
fn read_gates(
    sc: &mut LineScanner,
    first_line: &str,
) -> RasResult<BTreeMap<String, Hydrograph>> {
    let mut gates: BTreeMap<String, Hydrograph> = BTreeMap::new();
    let mut current: Option<String> = None;

    handle_gate_line(first_line, sc, &mut gates, &mut current)?;

    while let Some(line) = sc.peek() {
        if is_element(line, &UNSTEADY_ELEMENTS) {
            break;
        }
        let line = line.to_string();
        sc.advance();
        handle_gate_line(&line, sc, &mut gates, &mut current)?;
    }

    Ok(gates)
}

/// Read one boundary condition following a `Boundary Location=` header.
fn read_boundary_condition(
    sc: &mut LineScanner,
    header_line: &str,
) -> RasResult<(ParentKind, String, BoundaryCondition)> {
    let (parent_kind, parent, flow_end_rs, mut bc) = parse_bc_header(header_line)?;

    let mut time_interval = String::new();

    while let Some(line) = sc.peek() {
        if is_element(line, &UNSTEADY_ELEMENTS) {
            if bc.bc_type.is_empty() {
                bc.bc_type = "Unknown Type".to_string();
            }
            return Ok((parent_kind, parent, bc));
        }
        let line = line.to_string();
        sc.advance();

        match left_of_equals(&line) {
            "Friction Slope" => {
                bc.bc_type = "Normal Depth".to_string();
                let first = right_of_equals(&line).split(',').next().unwrap_or("");
                let slope = parse_float_permissive(first).unwrap_or(0.0);
                bc.data = BcData::FrictionSlope { slope };
                return Ok((parent_kind, parent, bc));
            }
            "Interval" => {
                time_interval = right_of_equals(&line).to_string();
            }
            key @ ("Flow Hydrograph"
            | "Precipitation Hydrograph"
            | "Uniform Lateral Inflow Hydrograph"
            | "Lateral Inflow Hydrograph"
            | "Ground Water Interflow"
            | "Stage Hydrograph") => {
                bc.bc_type = if key == "Precipitation Hydrograph" {
                    "Precipitation".to_string()
                } else {
                    key.to_string()
                };
                let mut hg = read_hydrograph(sc, &line, false, &flow_end_rs)?;
                hg.time_interval = time_interval.clone();
                bc.data = BcData::Hydrograph(hg);
                return Ok((parent_kind, parent, bc));
            }
            key @ ("Stage and Flow Hydrograph" | "Observed Stage and Flow Hydrograph") => {
                bc.bc_type = if key == "Observed Stage and Flow Hydrograph" {
                    "IB Stage and Flow Hydrograph".to_string()
                } else {
                    key.to_string()
                };
                let mut hg = read_hydrograph(sc, &line, true, &flow_end_rs)?;
                hg.time_interval = time_interval.clone();
                bc.data = BcData::Hydrograph(hg);
                return Ok((parent_kind, parent, bc));
            }
            "Rating Curve" => {
                bc.bc_type = "Rating Curve".to_string();
                bc.data = BcData::RatingCurve(read_rating_curve(sc, &line)?);
                return Ok((parent_kind, parent, bc));
            }
            "Gate Name" => {
                bc.bc_type = "T. S. Gate Openings".to_string();
                bc.data = BcData::Gates(read_gates(sc, &line)?);
                return Ok((parent_kind, parent, bc));
            }
            "Rule Operation" | "Rule Expression" => {
                bc.bc_type = "Rules".to_string();
                bc.data = BcData::Marker("Not Implemented".to_string());
                return Ok((parent_kind, parent, bc));
            }
            key @ ("Elev Controlled Gate" | "Navigation Dam") => {
                bc.bc_type = key.to_string();
                bc.data = BcData::Marker("Not Implemented".to_string());
                return Ok((parent_kind, parent, bc));
            }
            _ => {}
        }
    }

    if bc.bc_type.is_empty() {
        bc.bc_type = "Unknown Type".to_string();
    }
    Ok((parent_kind, parent, bc))
}

/// Parse an unsteady flow file.
pub fn parse_unsteady(text: &str) -> RasResult<UnsteadyData> {
    let mut ud = UnsteadyData::new();

    let mut sc = LineScanner::new(text);
    while let Some(line) = sc.next_line() {
        match left_of_equals(line) {
            "Flow Title" => ud.flow_title = right_of_equals(line).to_string(),
            "Program Version" => ud.program_version = right_of_equals(line).to_string(),
            "Boundary Location" => {
                let (parent_kind, parent, bc) = read_boundary_condition(&mut sc, line)?;
                let bcs = &mut ud.boundary_conditions;
                match parent_kind {
                    ParentKind::Reach => bcs.reaches.entry(parent).or_default().push(bc),
                    ParentKind::Area => bcs.areas.entry(parent).or_default().push(bc),
                    ParentKind::Connection => {
                        bcs.connections.entry(parent).or_default().push(bc)
                    }
                    ParentKind::PumpStation => {
                        bcs.pump_stations.insert(parent, bc);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(ud)
}
