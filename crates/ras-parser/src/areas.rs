//! Storage area / 2D area parsing for geometry files.

use serde::{Deserialize, Serialize};

use ras_common::{RasError, RasResult};

use crate::scan::{right_of_equals, LineScanner};

/// A flat-storage area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageArea {
    #[serde(rename = "Num BC Lines")]
    pub num_bc_lines: u32,
    #[serde(rename = "BC Lines")]
    pub bc_lines: Vec<String>,
}

/// A meshed 2D flow area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwoDArea {
    #[serde(rename = "Num Mesh Cells")]
    pub num_cells: u32,
    #[serde(rename = "Num BC Lines")]
    pub num_bc_lines: u32,
    #[serde(rename = "BC Lines")]
    pub bc_lines: Vec<String>,
}

/// The two kinds an area block can resolve to, decided by
/// `Storage Area Is2D=` (0 storage, -1 two-dimensional).
#[derive(Debug, Clone)]
pub enum AreaKind {
    Storage(StorageArea),
    TwoD(TwoDArea),
}

/// Parse the area block whose `Storage Area=` line sits at `start`.
/// The scan is bounded by the next `2D Face Area ` or `Storage Area=` line.
pub fn parse_area(sc: &LineScanner, start: usize) -> RasResult<(String, AreaKind)> {
    let header = sc
        .line_at(start)
        .ok_or_else(|| RasError::parse("storage area line out of range".to_string()))?;
    let name = right_of_equals(header)
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    let mut is_2d = "";
    let mut num_cells: u32 = 0;

    let mut cursor = sc.scanner_at(start + 1);
    while let Some(line) = cursor.next_line() {
        if line.starts_with("Storage Area Is2D=") {
            is_2d = right_of_equals(line);
            if is_2d != "0" && is_2d != "-1" {
                return Err(RasError::AmbiguousAreaKind(line.to_string()));
            }
        } else if line.starts_with("Storage Area 2D Points=") {
            num_cells = right_of_equals(line)
                .parse()
                .map_err(|_| RasError::parse(format!("invalid 2D point count in '{}'", line)))?;
        } else if line.starts_with("2D Face Area ") || line.starts_with("Storage Area=") {
            break;
        }
    }

    if is_2d == "0" {
        Ok((name, AreaKind::Storage(StorageArea::default())))
    } else {
        Ok((
            name,
            AreaKind::TwoD(TwoDArea {
                num_cells,
                ..TwoDArea::default()
            }),
        ))
    }
}

/// Parse the BC line block at `start`, returning the associated area name
/// and the BC line name. The association is mandatory.
pub fn parse_bc_line(sc: &LineScanner, start: usize) -> RasResult<(String, String)> {
    let header = sc
        .line_at(start)
        .ok_or_else(|| RasError::parse("BC line out of range".to_string()))?;
    let bc_name = right_of_equals(header).to_string();

    let mut cursor = sc.scanner_at(start + 1);
    while let Some(line) = cursor.next_line() {
        if line.starts_with("BC Line Storage Area=") {
            return Ok((right_of_equals(line).to_string(), bc_name));
        }
        if line.starts_with("BC Line Text Position=") || line.starts_with("BC Line Name=") {
            break;
        }
    }
    Err(RasError::parse(format!(
        "failed to find the storage area of BC line '{}' at line {}",
        bc_name, start
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_area() {
        let text = "Storage Area=Upper Pond ,123,456\nStorage Area Is2D= 0 \nStorage Area=Next,";
        let sc = LineScanner::new(text);
        let (name, kind) = parse_area(&sc, 0).unwrap();
        assert_eq!(name, "Upper Pond");
        assert!(matches!(kind, AreaKind::Storage(_)));
    }

    #[test]
    fn test_two_d_area() {
        let text = "Storage Area=Mesh A,1,2\nStorage Area Is2D=-1\nStorage Area 2D Points= 5280\n2D Face Area Conveyance Ratio=1";
        let sc = LineScanner::new(text);
        let (name, kind) = parse_area(&sc, 0).unwrap();
        assert_eq!(name, "Mesh A");
        match kind {
            AreaKind::TwoD(area) => assert_eq!(area.num_cells, 5280),
            AreaKind::Storage(_) => panic!("expected 2D area"),
        }
    }

    #[test]
    fn test_bad_is2d_value() {
        let text = "Storage Area=Odd,1,2\nStorage Area Is2D=7\n";
        let sc = LineScanner::new(text);
        assert!(matches!(
            parse_area(&sc, 0),
            Err(RasError::AmbiguousAreaKind(_))
        ));
    }

    #[test]
    fn test_bc_line_association() {
        let text = "BC Line Name=Inflow North\nBC Line Storage Area=Mesh A\n";
        let sc = LineScanner::new(text);
        let (area, bc) = parse_bc_line(&sc, 0).unwrap();
        assert_eq!(area, "Mesh A");
        assert_eq!(bc, "Inflow North");
    }

    #[test]
    fn test_bc_line_without_area_is_error() {
        let text = "BC Line Name=Orphan\nBC Line Name=Another\n";
        let sc = LineScanner::new(text);
        assert!(parse_bc_line(&sc, 0).is_err());
    }
}
