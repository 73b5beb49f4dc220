//! SA/2D area connection parsing for geometry files.

use serde::{Deserialize, Serialize};

use ras_common::{RasError, RasResult};

use crate::block::{column_from_block, number_of_lines};
use crate::scan::{right_of_equals, LineScanner};
use crate::structures::{parse_conduit, parse_gate, Conduit, Gate, MinMaxPair};

/// A hydraulic connection between two storage/2D areas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Up SA")]
    pub up_sa: String,
    #[serde(rename = "Dn SA")]
    pub dn_sa: String,
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

/// Connection descriptions are the field value plus continuation lines up
/// to the `Connection Line=` block. The terminator is left unconsumed.
fn read_connection_description(cursor: &mut LineScanner, first: &str) -> String {
    let mut description = String::from(first.trim());
    while let Some(line) = cursor.peek() {
        if line.starts_with("Connection Line=")
            || line.starts_with("Connection=")
            || line.starts_with("Conn Outlet Rating Curve=")
        {
            break;
        }
        let line = line.to_string();
        cursor.advance();
        if !line.is_empty() {
            if !description.is_empty() {
                description.push('\n');
            }
            description.push_str(&line);
        }
    }
    description
}

/// Parse the connection block whose `Connection=` line sits at `start`.
/// The scan is bounded by `Conn Outlet Rating Curve=` or the next
/// `Connection=` line.
pub fn parse_connection(sc: &LineScanner, start: usize) -> RasResult<(String, Connection)> {
    let header = sc
        .line_at(start)
        .ok_or_else(|| RasError::parse("connection line out of range".to_string()))?;
    let name = right_of_equals(header)
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    let mut connection = Connection::default();

    let mut cursor = sc.scanner_at(start + 1);
    while let Some(line) = cursor.next_line() {
        if line.starts_with("Connection Desc=") {
            let description = read_connection_description(&mut cursor, right_of_equals(line));
            connection.description.push_str(&description);
        } else if line.starts_with("Connection Up SA=") {
            connection.up_sa = right_of_equals(line).to_string();
        } else if line.starts_with("Connection Dn SA=") {
            connection.dn_sa = right_of_equals(line).to_string();
        } else if line.starts_with("Conn Weir WD=") {
            connection.weir_width = right_of_equals(line)
                .parse()
                .map_err(|_| RasError::parse(format!("invalid weir width in '{}'", line)))?;
        } else if line.starts_with("Conn Weir SE=") {
            let n_elev: usize = right_of_equals(line)
                .parse()
                .map_err(|_| RasError::parse(format!("invalid weir SE count in '{}'", line)))?;
            let n_lines = number_of_lines(n_elev * 2, 80, 8);
            let elevations = column_from_block(&mut cursor, n_lines, 0, 80, 8, 2)?;
            connection.weir_elev = MinMaxPair::from_values(&elevations);
        } else if line.starts_with("Conn Gate Name Wd,H,") {
            let next = cursor
                .next_line()
                .ok_or_else(|| RasError::parse("missing gate data line".to_string()))?;
            connection.gates.push(parse_gate(next)?);
            connection.num_gates += 1;
        } else if line.starts_with("Connection Culv=") {
            connection.conduits.push(parse_conduit(line, false)?);
            connection.num_conduits += 1;
        } else if line.starts_with("Conn Outlet Rating Curve=") || line.starts_with("Connection=")
        {
            break;
        }
    }

    Ok((name, connection))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONNECTION: &str = "\
Connection=Levee Breach ,100,200\n\
Connection Desc=Overflow link\n\
Connection Line= 2\n\
           100.0           200.0           300.0           400.0\n\
Connection Up SA=Upper Pond\n\
Connection Dn SA=Mesh A\n\
Conn Weir WD=15.5\n\
Conn Weir SE= 3\n\
       0      22      50      20     100      24\n\
Conn Gate Name Wd,H,Inv,Type\n\
Slide ,6,4,,,,,,,,,,,1\n\
Connection Culv=2,3,3,45,0.012,,,,,,,2,Twin Box,\n\
Conn Outlet Rating Curve= 0\n";

    #[test]
    fn test_parse_connection() {
        let sc = LineScanner::new(CONNECTION);
        let (name, connection) = parse_connection(&sc, 0).unwrap();
        assert_eq!(name, "Levee Breach");
        assert_eq!(connection.description, "Overflow link");
        assert_eq!(connection.up_sa, "Upper Pond");
        assert_eq!(connection.dn_sa, "Mesh A");
        assert_eq!(connection.weir_width, 15.5);
        assert_eq!(connection.weir_elev, MinMaxPair { max: 24.0, min: 20.0 });
        assert_eq!(connection.num_gates, 1);
        assert_eq!(connection.gates[0].name, "Slide");
        assert_eq!(connection.num_conduits, 1);
        assert_eq!(connection.conduits[0].name, "Twin Box");
    }

    #[test]
    fn test_connection_terminates_at_next_connection() {
        let text = "Connection=First,1,2\nConnection Up SA=A\nConnection=Second,3,4\nConnection Up SA=B\n";
        let sc = LineScanner::new(text);
        let (name, connection) = parse_connection(&sc, 0).unwrap();
        assert_eq!(name, "First");
        assert_eq!(connection.up_sa, "A");
    }
}
