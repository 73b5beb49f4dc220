//! Hydraulic structure parsing for geometry files: bridges, culverts, and
//! inline weirs grouped per river reach.

use serde::{Deserialize, Serialize};

use ras_common::{RasError, RasResult};

use crate::block::{
    column_from_block, max_value, min_value, number_of_lines, parse_float_permissive,
};
use crate::scan::{read_description, right_of_equals, LineScanner};

/// Culvert conduit shapes, indexed by the shape id used in geometry files.
pub fn conduit_shape(id: u32) -> &'static str {
    match id {
        1 => "Circular",
        2 => "Box",
        3 => "Pipe Arch",
        4 => "Ellipse",
        5 => "Arch",
        6 => "Semi-Circle",
        7 => "Low Arch",
        8 => "High Arch",
        9 => "Conspan Arch",
        _ => "",
    }
}

/// 1D hydraulic structures found under one river reach.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HydraulicStructures {
    #[serde(rename = "River Name")]
    pub river: String,
    #[serde(rename = "Reach Name")]
    pub reach: String,
    #[serde(rename = "Num CrossSections")]
    pub num_xs: u32,
    #[serde(rename = "Culvert Data")]
    pub culvert_data: CulvertData,
    #[serde(rename = "Bridge Data")]
    pub bridge_data: BridgeData,
    #[serde(rename = "Inline Weir Data")]
    pub weir_data: WeirData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CulvertData {
    #[serde(rename = "Num Culverts")]
    pub num_culverts: u32,
    #[serde(rename = "Culverts")]
    pub culverts: Vec<Culvert>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeData {
    #[serde(rename = "Num Bridges")]
    pub num_bridges: u32,
    #[serde(rename = "Bridges")]
    pub bridges: Vec<Bridge>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeirData {
    #[serde(rename = "Num Inline Weirs")]
    pub num_weirs: u32,
    #[serde(rename = "Inline Weirs")]
    pub weirs: Vec<InlineWeir>,
}

/// Minimum and maximum of a station/elevation block's elevation column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxPair {
    #[serde(rename = "Max")]
    pub max: f64,
    #[serde(rename = "Min")]
    pub min: f64,
}

impl MinMaxPair {
    /// Reduce a series to its extremes; zero pair when the series is empty.
    pub fn from_values(values: &[f64]) -> Self {
        match (max_value(values), min_value(values)) {
            (Some(max), Some(min)) => Self { max, min },
            _ => Self::default(),
        }
    }
}

/// A 1D culvert crossing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Culvert {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Station")]
    pub station: f64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Deck Width")]
    pub deck_width: f64,
    #[serde(rename = "Upstream High Chord")]
    pub up_high_chord: MinMaxPair,
    #[serde(rename = "Upstream Low Chord")]
    pub up_low_chord: MinMaxPair,
    #[serde(rename = "Downstream High Chord")]
    pub down_high_chord: MinMaxPair,
    #[serde(rename = "Downstream Low Chord")]
    pub down_low_chord: MinMaxPair,
    #[serde(rename = "Num Culvert Conduits")]
    pub num_conduits: u32,
    #[serde(rename = "Culvert Conduits")]
    pub conduits: Vec<Conduit>,
}

/// A 1D bridge crossing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bridge {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Station")]
    pub station: f64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Deck Width")]
    pub deck_width: f64,
    #[serde(rename = "Upstream High Chord")]
    pub up_high_chord: MinMaxPair,
    #[serde(rename = "Upstream Low Chord")]
    pub up_low_chord: MinMaxPair,
    #[serde(rename = "Downstream High Chord")]
    pub down_high_chord: MinMaxPair,
    #[serde(rename = "Downstream Low Chord")]
    pub down_low_chord: MinMaxPair,
    #[serde(rename = "Num Piers")]
    pub num_piers: u32,
}

/// A 1D inline weir structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineWeir {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Station")]
    pub station: f64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Weir Width")]
    pub weir_width: f64,
    #[serde(rename = "Weir Elevations")]
    pub weir_elev: MinMaxPair,
    #[serde(rename = "Num Gates")]
    pub num_gates: u32,
    #[serde(rename = "Gates")]
    pub gates: Vec<Gate>,
    #[serde(rename = "Num Culvert Conduits")]
    pub num_conduits: u32,
    #[serde(rename = "Culvert Conduits")]
    pub conduits: Vec<Conduit>,
}

/// A gate group on an inline weir or connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gate {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Width")]
    pub width: f64,
    #[serde(rename = "Height")]
    pub height: f64,
    #[serde(rename = "Num Openings")]
    pub num_openings: u32,
}

/// A culvert conduit group on a culvert, inline weir, or connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conduit {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Num Barrels")]
    pub num_barrels: u32,
    #[serde(rename = "Shape")]
    pub shape: String,
    #[serde(rename = "Rise")]
    pub rise: f64,
    #[serde(rename = "Span")]
    pub span: f64,
    #[serde(rename = "Length")]
    pub length: f64,
    #[serde(rename = "Mannings N")]
    pub mannings_n: f64,
}

fn field<'a>(parts: &[&'a str], idx: usize, line: &str) -> RasResult<&'a str> {
    parts
        .get(idx)
        .copied()
        .ok_or_else(|| RasError::parse(format!("missing field {} in '{}'", idx, line)))
}

/// Parse a `Culvert=` (single barrel) or `Multiple Barrel Culv=` /
/// `IW Culv=` / `Connection Culv=` (multi barrel) conduit line.
pub fn parse_conduit(line: &str, single: bool) -> RasResult<Conduit> {
    let value = right_of_equals(line);
    let parts: Vec<&str> = value.split(',').collect();
    let mut conduit = Conduit::default();

    if single {
        conduit.num_barrels = 1;
        conduit.name = field(&parts, 13, line)?.trim().to_string();
    } else {
        conduit.num_barrels = field(&parts, 11, line)?
            .trim()
            .parse()
            .map_err(|_| RasError::parse(format!("invalid barrel count in '{}'", line)))?;
        conduit.name = field(&parts, 12, line)?.trim().to_string();
    }

    let shape_id: u32 = field(&parts, 0, line)?
        .trim()
        .parse()
        .map_err(|_| RasError::parse(format!("invalid conduit shape in '{}'", line)))?;
    conduit.shape = conduit_shape(shape_id).to_string();

    conduit.rise = parse_float_permissive(field(&parts, 1, line)?)?;
    conduit.span = parse_float_permissive(field(&parts, 2, line)?)?;
    conduit.length = parse_float_permissive(field(&parts, 3, line)?)?;
    conduit.mannings_n = parse_float_permissive(field(&parts, 4, line)?)?;

    Ok(conduit)
}

/// Parse the data line following a gate header.
pub fn parse_gate(line: &str) -> RasResult<Gate> {
    let parts: Vec<&str> = line.split(',').collect();
    Ok(Gate {
        name: field(&parts, 0, line)?.trim().to_string(),
        width: parse_float_permissive(field(&parts, 1, line)?)?,
        height: parse_float_permissive(field(&parts, 2, line)?)?,
        num_openings: field(&parts, 13, line)?
            .trim()
            .parse()
            .map_err(|_| RasError::parse(format!("invalid gate opening count in '{}'", line)))?,
    })
}

/// Read the station/high-chord/low-chord blocks that follow a deck metadata
/// line. The station block is skipped; the chords are reduced to min/max.
fn parse_high_low_chord(
    sc: &mut LineScanner,
    n_elev_text: &str,
) -> RasResult<(MinMaxPair, MinMaxPair)> {
    let n_elev: usize = n_elev_text
        .trim()
        .parse()
        .map_err(|_| RasError::parse(format!("invalid chord count '{}'", n_elev_text)))?;
    let n_lines = number_of_lines(n_elev, 80, 8);

    let high = column_from_block(sc, n_lines, n_lines, 80, 8, 1)?;
    let low = column_from_block(sc, n_lines, 0, 80, 8, 1)?;

    Ok((MinMaxPair::from_values(&high), MinMaxPair::from_values(&low)))
}

fn parse_station(parts: &[&str], line: &str) -> RasResult<f64> {
    field(parts, 1, line)?
        .trim()
        .parse()
        .map_err(|_| RasError::parse(format!("invalid station in '{}'", line)))
}

/// Parse a culvert block. The cursor sits just past its `Type RM` line and
/// is left just past the terminating `BC Design` line.
fn parse_culvert(sc: &mut LineScanner, type_data: &[&str], type_line: &str) -> RasResult<Culvert> {
    let mut culvert = Culvert {
        station: parse_station(type_data, type_line)?,
        ..Culvert::default()
    };

    while let Some(line) = sc.next_line() {
        if line.starts_with("BEGIN DESCRIPTION") {
            culvert.description.push_str(&read_description(sc, "END DESCRIPTION"));
        } else if line.starts_with("Node Name=") {
            culvert.name = right_of_equals(line).to_string();
        } else if line.starts_with("Deck Dist") {
            let deck_line = sc
                .next_line()
                .ok_or_else(|| RasError::parse("missing deck data line".to_string()))?;
            let parts: Vec<&str> = deck_line.split(',').collect();
            culvert.deck_width = field(&parts, 0, deck_line)?
                .trim()
                .parse()
                .map_err(|_| RasError::parse(format!("invalid deck width in '{}'", deck_line)))?;

            let (up_high, up_low) = parse_high_low_chord(sc, field(&parts, 4, deck_line)?)?;
            culvert.up_high_chord = up_high;
            culvert.up_low_chord = up_low;

            let (down_high, down_low) = parse_high_low_chord(sc, field(&parts, 5, deck_line)?)?;
            culvert.down_high_chord = down_high;
            culvert.down_low_chord = down_low;
        } else if line.starts_with("Culvert=") {
            culvert.conduits.push(parse_conduit(line, true)?);
            culvert.num_conduits += 1;
        } else if line.starts_with("Multiple Barrel Culv=") {
            culvert.conduits.push(parse_conduit(line, false)?);
            culvert.num_conduits += 1;
        } else if line.starts_with("BC Design") {
            return Ok(culvert);
        } else if line.starts_with("Type RM Length L Ch R =") || line.starts_with("River Reach=") {
            return Err(RasError::parse(
                "failed to terminate parsing of culvert at 'BC Design'".to_string(),
            ));
        }
    }
    Ok(culvert)
}

/// Parse a bridge block. Same protocol as culverts; piers are counted from
/// their skew lines.
fn parse_bridge(sc: &mut LineScanner, type_data: &[&str], type_line: &str) -> RasResult<Bridge> {
    let mut bridge = Bridge {
        station: parse_station(type_data, type_line)?,
        ..Bridge::default()
    };

    while let Some(line) = sc.next_line() {
        if line.starts_with("BEGIN DESCRIPTION") {
            bridge.description.push_str(&read_description(sc, "END DESCRIPTION"));
        } else if line.starts_with("Node Name=") {
            bridge.name = right_of_equals(line).to_string();
        } else if line.starts_with("Deck Dist") {
            let deck_line = sc
                .next_line()
                .ok_or_else(|| RasError::parse("missing deck data line".to_string()))?;
            let parts: Vec<&str> = deck_line.split(',').collect();
            bridge.deck_width = field(&parts, 0, deck_line)?
                .trim()
                .parse()
                .map_err(|_| RasError::parse(format!("invalid deck width in '{}'", deck_line)))?;

            let (up_high, up_low) = parse_high_low_chord(sc, field(&parts, 4, deck_line)?)?;
            bridge.up_high_chord = up_high;
            bridge.up_low_chord = up_low;

            let (down_high, down_low) = parse_high_low_chord(sc, field(&parts, 5, deck_line)?)?;
            bridge.down_high_chord = down_high;
            bridge.down_low_chord = down_low;
        } else if line.starts_with("Pier Skew") {
            bridge.num_piers += 1;
        } else if line.starts_with("BC Design") {
            return Ok(bridge);
        } else if line.starts_with("Type RM Length L Ch R =") || line.starts_with("River Reach=") {
            return Err(RasError::parse(
                "failed to terminate parsing of bridge at 'BC Design'".to_string(),
            ));
        }
    }
    Ok(bridge)
}

/// Parse an inline weir from its `Type RM` line index. Weir blocks have no
/// reliable terminator of their own, so this scans an independent cursor and
/// stops at the next structure or reach.
fn parse_weir(sc: &LineScanner, type_idx: usize) -> RasResult<InlineWeir> {
    let type_line = sc
        .line_at(type_idx)
        .ok_or_else(|| RasError::parse("inline weir line out of range".to_string()))?;
    let data: Vec<&str> = right_of_equals(type_line).split(',').collect();

    let mut weir = InlineWeir {
        station: parse_station(&data, type_line)?,
        ..InlineWeir::default()
    };

    let mut cursor = sc.scanner_at(type_idx + 1);
    while let Some(line) = cursor.next_line() {
        if line.starts_with("BEGIN DESCRIPTION") {
            weir.description.push_str(&read_description(&mut cursor, "END DESCRIPTION"));
        } else if line.starts_with("Node Name=") {
            weir.name = right_of_equals(line).to_string();
        } else if line.starts_with("#Inline Weir SE=") {
            let n_elev: usize = right_of_equals(line)
                .parse()
                .map_err(|_| RasError::parse(format!("invalid weir SE count in '{}'", line)))?;
            let n_lines = number_of_lines(n_elev * 2, 80, 8);
            let elevations = column_from_block(&mut cursor, n_lines, 0, 80, 8, 2)?;
            weir.weir_elev = MinMaxPair::from_values(&elevations);
        } else if line.starts_with("IW Dist,WD") {
            let next = cursor
                .next_line()
                .ok_or_else(|| RasError::parse("missing weir width line".to_string()))?;
            let parts: Vec<&str> = next.split(',').collect();
            weir.weir_width = field(&parts, 1, next)?
                .trim()
                .parse()
                .map_err(|_| RasError::parse(format!("invalid weir width in '{}'", next)))?;
        } else if line.starts_with("IW Gate Name") {
            let next = cursor
                .next_line()
                .ok_or_else(|| RasError::parse("missing gate data line".to_string()))?;
            weir.gates.push(parse_gate(next)?);
            weir.num_gates += 1;
        } else if line.starts_with("IW Culv=") {
            weir.conduits.push(parse_conduit(line, false)?);
            weir.num_conduits += 1;
        } else if line.starts_with("Type RM Length L Ch R =") || line.starts_with("River Reach=") {
            break;
        }
    }
    Ok(weir)
}

/// Parse every structure under the `River Reach=` line at `start`.
pub fn parse_structures(sc: &LineScanner, start: usize) -> RasResult<HydraulicStructures> {
    let header = sc
        .line_at(start)
        .ok_or_else(|| RasError::parse("river reach line out of range".to_string()))?;
    let river_reach = right_of_equals(header);
    let mut tokens = river_reach.split(',');

    let mut structures = HydraulicStructures {
        river: tokens.next().unwrap_or("").trim().to_string(),
        reach: tokens.next().unwrap_or("").trim().to_string(),
        ..HydraulicStructures::default()
    };

    let mut cursor = sc.scanner_at(start + 1);
    while let Some(line) = cursor.next_line() {
        if line.starts_with("Type RM Length L Ch R =") {
            let value = right_of_equals(line);
            let data: Vec<&str> = value.split(',').collect();
            let structure_type: u32 = field(&data, 0, line)?
                .trim()
                .parse()
                .map_err(|_| RasError::parse(format!("invalid structure type in '{}'", line)))?;

            match structure_type {
                1 => structures.num_xs += 1,
                2 => {
                    let culvert = parse_culvert(&mut cursor, &data, line)?;
                    structures.culvert_data.culverts.push(culvert);
                    structures.culvert_data.num_culverts += 1;
                }
                3 => {
                    let bridge = parse_bridge(&mut cursor, &data, line)?;
                    structures.bridge_data.bridges.push(bridge);
                    structures.bridge_data.num_bridges += 1;
                }
                5 => {
                    let weir = parse_weir(sc, cursor.pos() - 1)?;
                    structures.weir_data.weirs.push(weir);
                    structures.weir_data.num_weirs += 1;
                }
                _ => {}
            }
        } else if line.starts_with("River Reach=") {
            break;
        }
    }

    Ok(structures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conduit_shapes() {
        assert_eq!(conduit_shape(1), "Circular");
        assert_eq!(conduit_shape(9), "Conspan Arch");
        assert_eq!(conduit_shape(12), "");
    }

    #[test]
    fn test_parse_single_conduit() {
        let line = "Culvert=1,4,4,100,0.013,,,,,,,,,Culvert #1 ,";
        let conduit = parse_conduit(line, true).unwrap();
        assert_eq!(conduit.num_barrels, 1);
        assert_eq!(conduit.name, "Culvert #1");
        assert_eq!(conduit.shape, "Circular");
        assert_eq!(conduit.rise, 4.0);
        assert_eq!(conduit.span, 4.0);
        assert_eq!(conduit.length, 100.0);
        assert_eq!(conduit.mannings_n, 0.013);
    }

    #[test]
    fn test_parse_multi_barrel_conduit() {
        let line = "Multiple Barrel Culv=2,5,6,80,0.012,,,,,,,3,Group A,";
        let conduit = parse_conduit(line, false).unwrap();
        assert_eq!(conduit.num_barrels, 3);
        assert_eq!(conduit.name, "Group A");
        assert_eq!(conduit.shape, "Box");
    }

    #[test]
    fn test_parse_gate() {
        let line = "Gate #1 ,10,8,,,,,,,,,,,2";
        let gate = parse_gate(line).unwrap();
        assert_eq!(gate.name, "Gate #1");
        assert_eq!(gate.width, 10.0);
        assert_eq!(gate.height, 8.0);
        assert_eq!(gate.num_openings, 2);
    }

    #[test]
    fn test_parse_bridge_with_deck() {
        // Deck header, then deck line (nUp=3, nDn=3), then three blocks per
        // side: stations, high chord, low chord.
        let text = "\
Node Name=Main St Bridge\n\
Deck Dist, Width, WeirC, Skew, NumUp, NumDn, MinLoCord, MaxHiCord\n\
20,40,2.6,0,3,3,,\n\
       0      50     100\n\
      25      26      27\n\
      18      19      20\n\
       0      50     100\n\
      24      25      26\n\
      17      18      19\n\
Pier Skew=1\n\
BC Design\n";
        let mut sc = LineScanner::new(text);
        let bridge = parse_bridge(&mut sc, &["3", "1280.5"], "Type RM Length L Ch R = 3 ,1280.5")
            .unwrap();
        assert_eq!(bridge.name, "Main St Bridge");
        assert_eq!(bridge.station, 1280.5);
        assert_eq!(bridge.deck_width, 20.0);
        assert_eq!(bridge.up_high_chord, MinMaxPair { max: 27.0, min: 25.0 });
        assert_eq!(bridge.up_low_chord, MinMaxPair { max: 20.0, min: 18.0 });
        assert_eq!(bridge.down_high_chord, MinMaxPair { max: 26.0, min: 24.0 });
        assert_eq!(bridge.down_low_chord, MinMaxPair { max: 19.0, min: 17.0 });
        assert_eq!(bridge.num_piers, 1);
    }

    #[test]
    fn test_bridge_must_terminate_at_bc_design() {
        let text = "Node Name=Runaway\nRiver Reach=Next, Reach\n";
        let mut sc = LineScanner::new(text);
        let result = parse_bridge(&mut sc, &["3", "100"], "Type RM Length L Ch R = 3 ,100");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_structures_counts_cross_sections() {
        let text = "\
River Reach=Main, Reach1\n\
Type RM Length L Ch R = 1 ,450,100,100,100\n\
Type RM Length L Ch R = 1 ,350,100,100,100\n\
River Reach=Other, Reach2\n\
Type RM Length L Ch R = 1 ,10,1,1,1\n";
        let sc = LineScanner::new(text);
        let structures = parse_structures(&sc, 0).unwrap();
        assert_eq!(structures.river, "Main");
        assert_eq!(structures.reach, "Reach1");
        // the scan stops at the next River Reach
        assert_eq!(structures.num_xs, 2);
    }

    #[test]
    fn test_parse_weir() {
        let text = "\
River Reach=Main, Reach1\n\
Type RM Length L Ch R = 5 ,900,0,0,0\n\
Node Name=Diversion Weir\n\
#Inline Weir SE= 3\n\
       0      31      50      30     100      32\n\
IW Dist,WD\n\
5,25\n\
IW Gate Name Wd,H,Inv,Type\n\
Sluice ,12,9,,,,,,,,,,,4\n\
IW Culv=1,3,3,60,0.013,,,,,,,2,Barrels,\n\
Type RM Length L Ch R = 1 ,800,0,0,0\n";
        let sc = LineScanner::new(text);
        let structures = parse_structures(&sc, 0).unwrap();
        assert_eq!(structures.weir_data.num_weirs, 1);
        let weir = &structures.weir_data.weirs[0];
        assert_eq!(weir.name, "Diversion Weir");
        assert_eq!(weir.station, 900.0);
        assert_eq!(weir.weir_elev, MinMaxPair { max: 32.0, min: 30.0 });
        assert_eq!(weir.weir_width, 25.0);
        assert_eq!(weir.num_gates, 1);
        assert_eq!(weir.gates[0].name, "Sluice");
        assert_eq!(weir.num_conduits, 1);
        assert_eq!(weir.conduits[0].num_barrels, 2);
        // the weir does not swallow the following cross-section
        assert_eq!(structures.num_xs, 1);
    }
}
