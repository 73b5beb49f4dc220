//! Geometry (.gNN) file parser — geospatial pass.
//!
//! A second forward scan over the same file builds vector features: river
//! centerlines, cross-section cutlines with z attribution, bank points,
//! area polygons, breaklines, BC lines, and connection lines. Geometries
//! are transformed into the destination CRS and then have their x/y axes
//! exchanged before WKB encoding — downstream consumers expect
//! latitude-first order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use ras_common::{RasError, RasResult};
use ras_geo::{
    attribute_z, interp_xy, polyline_length, wkb, CoordinateTransform, Geometry, SpatialRef, Xy,
};

use crate::block::{pairs_after_count_line, to_numeric};
use crate::scan::{right_of_equals, LineScanner};

/// Geospatial data for a model: features per geometry file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoData {
    #[serde(rename = "Features")]
    pub features: BTreeMap<String, Features>,
    /// Destination EPSG code every feature was transformed into.
    #[serde(rename = "Georeference")]
    pub georeference: i32,
}

/// The feature collections extracted from one geometry file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Features {
    #[serde(rename = "Rivers")]
    pub rivers: Vec<VectorFeature>,
    #[serde(rename = "XS")]
    pub xs: Vec<VectorFeature>,
    #[serde(rename = "Banks")]
    pub banks: Vec<VectorFeature>,
    #[serde(rename = "StorageAreas")]
    pub storage_areas: Vec<VectorFeature>,
    #[serde(rename = "TwoDAreas")]
    pub two_d_areas: Vec<VectorFeature>,
    #[serde(rename = "HydraulicStructures")]
    pub hydraulic_structures: Vec<VectorFeature>,
    #[serde(rename = "Connections")]
    pub connections: Vec<VectorFeature>,
    #[serde(rename = "BCLines")]
    pub bc_lines: Vec<VectorFeature>,
    #[serde(rename = "BreakLines")]
    pub break_lines: Vec<VectorFeature>,
}

/// A named feature with free-form fields and WKB geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorFeature {
    #[serde(rename = "feature_name")]
    pub feature_name: String,
    #[serde(rename = "fields")]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(rename = "geometry")]
    pub geometry: Vec<u8>,
}

/// A feature field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Num(f64),
    Str(String),
}

/// Line prefixes that start a new geospatial element; bounded lookaheads
/// stop here.
const ELEMENT_PREFIXES: [&str; 6] = [
    "River Reach=",
    "Storage Area=",
    "Connection=",
    "BC Line Name=",
    "BreakLine Name=",
    "Type RM Length L Ch R =",
];

fn at_element(line: &str) -> bool {
    ELEMENT_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Transform, flip axes, promote to multi-part, and WKB-encode.
fn finish_feature(
    name: String,
    fields: BTreeMap<String, FieldValue>,
    mut geom: Geometry,
    transform: &CoordinateTransform,
) -> VectorFeature {
    transform.apply_geometry(&mut geom);
    // x/y exchanged for consumers that expect latitude-first order
    geom.flip_xy();
    let geom = geom.into_multi();
    VectorFeature {
        feature_name: name,
        fields,
        geometry: wkb::encode(&geom),
    }
}

/// Read a river centerline from its `River Reach=` header.
fn read_river_centerline(
    sc: &mut LineScanner,
    header: &str,
    transform: &CoordinateTransform,
) -> RasResult<VectorFeature> {
    let tokens: Vec<&str> = right_of_equals(header).split(',').collect();
    let name = format!(
        "{}, {}",
        tokens.first().map(|s| s.trim()).unwrap_or(""),
        tokens.get(1).map(|s| s.trim()).unwrap_or("")
    );

    let xy_pairs = pairs_after_count_line(sc, "Reach XY=", 64, 16)?;
    Ok(finish_feature(
        name,
        BTreeMap::new(),
        Geometry::LineString(xy_pairs),
        transform,
    ))
}

/// Read a cross-section cutline, attributing elevations by station when the
/// profile length agrees with the cutline's planar length.
///
/// Returns the feature plus the cutline, the starting station, and the
/// match flag, which bank extraction needs.
fn read_xs(
    sc: &mut LineScanner,
    header: &str,
    transform: &CoordinateTransform,
    river_reach_name: &str,
) -> RasResult<(VectorFeature, Vec<Xy>, f64, bool)> {
    let comp: Vec<&str> = right_of_equals(header).split(',').collect();
    let name = to_numeric(comp.get(1).copied().unwrap_or(""));

    let mut fields = BTreeMap::new();
    fields.insert(
        "RiverReachName".to_string(),
        FieldValue::Str(river_reach_name.to_string()),
    );

    let xy_pairs = pairs_after_count_line(sc, "XS GIS Cut Line", 64, 16)?;
    if xy_pairs.len() < 2 {
        return Err(RasError::parse(
            "the cross-section cutline could not be extracted, check that the geometry file contains cutlines"
                .to_string(),
        ));
    }
    let cutline_length = polyline_length(&xy_pairs);

    let mz_pairs = pairs_after_count_line(sc, "#Sta/Elev", 80, 8)?;
    let starting_station = mz_pairs.first().map(|p| p[0]).unwrap_or(0.0);

    let mut cutline_profile_match = false;
    let mut line: Vec<[f64; 3]> = xy_pairs.iter().map(|p| [p[0], p[1], 0.0]).collect();

    if mz_pairs.len() >= 2 {
        let profile_length = mz_pairs[mz_pairs.len() - 1][0] - mz_pairs[0][0];
        if (profile_length - cutline_length).abs() <= 0.1 {
            line = attribute_z(&xy_pairs, &mz_pairs);
            cutline_profile_match = true;
        }
    }
    fields.insert(
        "CutLineProfileMatch".to_string(),
        FieldValue::Bool(cutline_profile_match),
    );

    let feature = finish_feature(name, fields, Geometry::LineStringZ(line), transform);
    Ok((feature, xy_pairs, starting_station, cutline_profile_match))
}

/// Read bank point features from a `Bank Sta=` line.
fn read_banks(
    line: &str,
    transform: &CoordinateTransform,
    xs: &VectorFeature,
    xy_pairs: &[Xy],
    starting_station: f64,
) -> RasResult<Vec<VectorFeature>> {
    let mut layers = Vec::new();

    for station_text in right_of_equals(line).split(',') {
        let station: f64 = station_text.trim().parse().map_err(|_| {
            RasError::parse(format!("invalid bank station '{}'", station_text))
        })?;

        // A station beyond the cutline still emits its feature, carrying
        // the zero point.
        let bank_xy = interp_xy(xy_pairs, station - starting_station).unwrap_or_else(|| {
            warn!(station, xs = %xs.feature_name, "bank station beyond cutline");
            [0.0, 0.0]
        });

        let mut fields = BTreeMap::new();
        if let Some(reach) = xs.fields.get("RiverReachName") {
            fields.insert("RiverReachName".to_string(), reach.clone());
        }
        fields.insert(
            "xsName".to_string(),
            FieldValue::Str(xs.feature_name.clone()),
        );

        layers.push(finish_feature(
            station_text.trim().to_string(),
            fields,
            Geometry::Point(bank_xy),
            transform,
        ));
    }
    Ok(layers)
}

/// Read a cross-section and, when its profile matched, the banks that
/// follow it. A failed profile match suppresses bank emission.
fn read_xs_banks(
    sc: &mut LineScanner,
    header: &str,
    transform: &CoordinateTransform,
    river_reach_name: &str,
) -> RasResult<(VectorFeature, Vec<VectorFeature>)> {
    let (xs, xy_pairs, starting_station, profile_match) =
        read_xs(sc, header, transform, river_reach_name)?;
    debug!(xs = %xs.feature_name, "Extracted cross-section");

    let mut banks = Vec::new();
    if profile_match {
        while let Some(line) = sc.peek() {
            if at_element(line) {
                break;
            }
            let line = line.to_string();
            sc.advance();
            if line.starts_with("Bank Sta=") {
                banks = read_banks(&line, transform, &xs, &xy_pairs, starting_station)?;
                break;
            }
        }
    }
    Ok((xs, banks))
}

/// The two places an area polygon can land, decided by `Storage Area Is2D=`.
enum AreaRoute {
    Storage,
    TwoD,
}

/// Read a storage/2D area surface polygon and route it by the `Is2D` flag
/// that follows the surface line block.
fn read_area_polygon(
    sc: &mut LineScanner,
    header: &str,
    transform: &CoordinateTransform,
) -> RasResult<(VectorFeature, AreaRoute)> {
    let name = right_of_equals(header)
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    let xy_pairs = pairs_after_count_line(sc, "Storage Area Surface Line=", 32, 16)?;
    let feature = finish_feature(
        name,
        BTreeMap::new(),
        Geometry::Polygon(vec![xy_pairs]),
        transform,
    );

    let mut route = AreaRoute::Storage;
    while let Some(line) = sc.peek() {
        if at_element(line) {
            break;
        }
        let line = line.to_string();
        sc.advance();
        if line.starts_with("Storage Area Is2D=") {
            match right_of_equals(&line) {
                "0" => route = AreaRoute::Storage,
                "-1" => route = AreaRoute::TwoD,
                _ => return Err(RasError::AmbiguousAreaKind(line)),
            }
            break;
        }
    }

    Ok((feature, route))
}

/// Read a breakline feature.
fn read_breakline(
    sc: &mut LineScanner,
    header: &str,
    transform: &CoordinateTransform,
) -> RasResult<VectorFeature> {
    let name = right_of_equals(header).to_string();

    let xy_pairs = pairs_after_count_line(sc, "BreakLine Polyline=", 64, 16)?;
    if xy_pairs.len() < 2 {
        return Err(RasError::InvalidLineGeometry);
    }

    Ok(finish_feature(
        name,
        BTreeMap::new(),
        Geometry::LineString(xy_pairs),
        transform,
    ))
}

/// Read a BC line feature, recording the storage/2D area it belongs to.
fn read_bc_line(
    sc: &mut LineScanner,
    header: &str,
    transform: &CoordinateTransform,
) -> RasResult<VectorFeature> {
    let name = right_of_equals(header).to_string();

    let mut fields = BTreeMap::new();
    while let Some(line) = sc.peek() {
        if at_element(line) {
            break;
        }
        let line = line.to_string();
        sc.advance();
        if line.starts_with("BC Line Storage Area=") {
            fields.insert(
                "StorageArea".to_string(),
                FieldValue::Str(right_of_equals(&line).to_string()),
            );
            break;
        }
    }

    let xy_pairs = pairs_after_count_line(sc, "BC Line Arc=", 64, 16)?;
    if xy_pairs.len() < 2 {
        return Err(RasError::InvalidLineGeometry);
    }

    Ok(finish_feature(
        name,
        fields,
        Geometry::LineString(xy_pairs),
        transform,
    ))
}

/// Read a connection line feature, recording its up/down areas.
fn read_connection_line(
    sc: &mut LineScanner,
    header: &str,
    transform: &CoordinateTransform,
) -> RasResult<VectorFeature> {
    let name = right_of_equals(header)
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    let xy_pairs = pairs_after_count_line(sc, "Connection Line=", 64, 16)?;
    if xy_pairs.len() < 2 {
        return Err(RasError::InvalidLineGeometry);
    }

    let mut fields = BTreeMap::new();
    while let Some(line) = sc.peek() {
        if at_element(line) {
            break;
        }
        let line = line.to_string();
        sc.advance();
        if line.starts_with("Connection Up SA=") {
            fields.insert(
                "UpSA".to_string(),
                FieldValue::Str(right_of_equals(&line).to_string()),
            );
        } else if line.starts_with("Connection Dn SA=") {
            fields.insert(
                "DnSA".to_string(),
                FieldValue::Str(right_of_equals(&line).to_string()),
            );
            break;
        }
    }

    Ok(finish_feature(
        name,
        fields,
        Geometry::LineString(xy_pairs),
        transform,
    ))
}

/// Extract every vector feature from a geometry file into `gd`.
pub fn extract_geometry(
    gd: &mut GeoData,
    geom_file_name: &str,
    text: &str,
    source_crs: &str,
    dest_epsg: i32,
) -> RasResult<()> {
    debug!(file = geom_file_name, "Extracting geospatial data");

    let spatial_ref =
        SpatialRef::from_wkt(source_crs).map_err(|e| RasError::projection(e.to_string()))?;
    let transform = CoordinateTransform::new(&spatial_ref, dest_epsg)
        .map_err(|e| RasError::projection(e.to_string()))?;

    let mut features = Features::default();
    let mut river_reach_name = String::new();

    let mut sc = LineScanner::new(text);
    while let Some(line) = sc.next_line() {
        if line.starts_with("River Reach=") {
            let river = read_river_centerline(&mut sc, line, &transform)?;
            river_reach_name = river.feature_name.clone();
            features.rivers.push(river);
            debug!("Extracted river centerline");
        } else if line.starts_with("Storage Area=") {
            let (feature, route) = read_area_polygon(&mut sc, line, &transform)?;
            match route {
                AreaRoute::Storage => features.storage_areas.push(feature),
                AreaRoute::TwoD => features.two_d_areas.push(feature),
            }
            debug!("Extracted storage area");
        } else if line.starts_with("Type RM Length L Ch R = 1") {
            let (xs, banks) = read_xs_banks(&mut sc, line, &transform, &river_reach_name)?;
            features.xs.push(xs);
            features.banks.extend(banks);
            debug!("Extracted banks and cross-sections");
        } else if line.starts_with("BreakLine Name=") {
            match read_breakline(&mut sc, line, &transform) {
                Ok(feature) => features.break_lines.push(feature),
                Err(RasError::InvalidLineGeometry) => {
                    warn!(line, "Invalid Line Geometry");
                }
                Err(err) => return Err(err),
            }
        } else if line.starts_with("BC Line Name=") {
            match read_bc_line(&mut sc, line, &transform) {
                Ok(feature) => features.bc_lines.push(feature),
                Err(RasError::InvalidLineGeometry) => {
                    warn!(line, "Invalid Line Geometry");
                }
                Err(err) => return Err(err),
            }
        } else if line.starts_with("Connection=") {
            match read_connection_line(&mut sc, line, &transform) {
                Ok(feature) => features.connections.push(feature),
                Err(RasError::InvalidLineGeometry) => {
                    warn!(line, "Invalid Line Geometry");
                }
                Err(err) => return Err(err),
            }
        }
    }

    gd.features.insert(geom_file_name.to_string(), features);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#;

    fn pad16(values: &[f64]) -> String {
        values
            .iter()
            .map(|v| format!("{:>16}", v))
            .collect::<String>()
    }

    fn pad8(values: &[f64]) -> String {
        values.iter().map(|v| format!("{:>8}", v)).collect::<String>()
    }

    fn read_f64(bytes: &[u8], at: usize) -> f64 {
        f64::from_le_bytes(bytes[at..at + 8].try_into().unwrap())
    }

    #[test]
    fn test_river_centerline_axes_flipped() {
        let text = format!(
            "River Reach=Main, Reach1\nReach XY= 4\n{}\n{}\n",
            pad16(&[100.0, 200.0, 110.0, 210.0]),
            pad16(&[120.0, 220.0, 130.0, 230.0]),
        );
        let mut gd = GeoData::default();
        extract_geometry(&mut gd, "case.g01", &text, WGS84, 4326).unwrap();

        let features = &gd.features["case.g01"];
        assert_eq!(features.rivers.len(), 1);
        let river = &features.rivers[0];
        assert_eq!(river.feature_name, "Main, Reach1");

        // multi line string header (9) + line header (5) + count (4)
        let wkb = &river.geometry;
        assert_eq!(u32::from_le_bytes(wkb[1..5].try_into().unwrap()), 5);
        let n = u32::from_le_bytes(wkb[14..18].try_into().unwrap());
        assert_eq!(n, 4);
        // first vertex is the flipped (y, x) of the source
        assert_eq!(read_f64(wkb, 18), 200.0);
        assert_eq!(read_f64(wkb, 26), 100.0);
    }

    #[test]
    fn test_xs_profile_match_attributes_z() {
        let text = format!(
            "River Reach=Main, Reach1\nReach XY= 2\n{}\n\
Type RM Length L Ch R = 1 ,450     ,100,100,100\n\
XS GIS Cut Line= 2\n{}\n\
#Sta/Elev= 3\n{}\n\
Bank Sta=25,75\n",
            pad16(&[0.0, 0.0, 100.0, 0.0]),
            pad16(&[0.0, 0.0, 100.0, 0.0]),
            pad8(&[0.0, 10.0, 50.0, 5.0, 100.0, 10.0]),
        );
        let mut gd = GeoData::default();
        extract_geometry(&mut gd, "case.g01", &text, WGS84, 4326).unwrap();

        let features = &gd.features["case.g01"];
        assert_eq!(features.xs.len(), 1);
        let xs = &features.xs[0];
        assert_eq!(xs.feature_name, "450");
        assert_eq!(xs.fields["CutLineProfileMatch"], FieldValue::Bool(true));
        assert_eq!(
            xs.fields["RiverReachName"],
            FieldValue::Str("Main, Reach1".to_string())
        );

        // 25D multi line string with three vertices, z = 10, 5, 10
        let wkb = &xs.geometry;
        assert_eq!(
            u32::from_le_bytes(wkb[1..5].try_into().unwrap()),
            5 | 0x8000_0000
        );
        let n = u32::from_le_bytes(wkb[14..18].try_into().unwrap());
        assert_eq!(n, 3);
        let z0 = read_f64(wkb, 18 + 16);
        let z1 = read_f64(wkb, 18 + 24 + 16);
        let z2 = read_f64(wkb, 18 + 48 + 16);
        assert_eq!((z0, z1, z2), (10.0, 5.0, 10.0));

        // matched profile emits the banks
        assert_eq!(features.banks.len(), 2);
        assert_eq!(features.banks[0].feature_name, "25");
        assert_eq!(
            features.banks[0].fields["xsName"],
            FieldValue::Str("450".to_string())
        );
    }

    #[test]
    fn test_bank_station_beyond_cutline_still_emitted() {
        let text = format!(
            "River Reach=Main, Reach1\nReach XY= 2\n{}\n\
Type RM Length L Ch R = 1 ,450     ,100,100,100\n\
XS GIS Cut Line= 2\n{}\n\
#Sta/Elev= 3\n{}\n\
Bank Sta=50,150\n",
            pad16(&[0.0, 0.0, 100.0, 0.0]),
            pad16(&[0.0, 0.0, 100.0, 0.0]),
            pad8(&[0.0, 10.0, 50.0, 5.0, 100.0, 10.0]),
        );
        let mut gd = GeoData::default();
        extract_geometry(&mut gd, "case.g01", &text, WGS84, 4326).unwrap();

        let features = &gd.features["case.g01"];
        assert_eq!(features.banks.len(), 2);
        assert_eq!(features.banks[1].feature_name, "150");

        // the overshooting station carries the zero point
        let wkb = &features.banks[1].geometry;
        let x = read_f64(wkb, 14);
        let y = read_f64(wkb, 22);
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn test_xs_profile_mismatch_suppresses_banks() {
        // profile length 90 vs cutline length 100
        let text = format!(
            "River Reach=Main, Reach1\nReach XY= 2\n{}\n\
Type RM Length L Ch R = 1 ,450     ,100,100,100\n\
XS GIS Cut Line= 2\n{}\n\
#Sta/Elev= 2\n{}\n\
Bank Sta=25,75\n",
            pad16(&[0.0, 0.0, 100.0, 0.0]),
            pad16(&[0.0, 0.0, 100.0, 0.0]),
            pad8(&[0.0, 10.0, 90.0, 10.0]),
        );
        let mut gd = GeoData::default();
        extract_geometry(&mut gd, "case.g01", &text, WGS84, 4326).unwrap();

        let features = &gd.features["case.g01"];
        let xs = &features.xs[0];
        assert_eq!(xs.fields["CutLineProfileMatch"], FieldValue::Bool(false));
        assert!(features.banks.is_empty());

        // the flat cutline is still emitted, two vertices with z = 0
        let n = u32::from_le_bytes(xs.geometry[14..18].try_into().unwrap());
        assert_eq!(n, 2);
    }

    #[test]
    fn test_storage_area_routing() {
        let text = format!(
            "Storage Area=Upper Pond ,1,2\nStorage Area Surface Line= 4\n{}\n{}\n{}\n{}\nStorage Area Is2D= 0\n\
Storage Area=Mesh A ,3,4\nStorage Area Surface Line= 3\n{}\n{}\n{}\nStorage Area Is2D=-1\n",
            pad16(&[0.0, 0.0]),
            pad16(&[10.0, 0.0]),
            pad16(&[10.0, 10.0]),
            pad16(&[0.0, 10.0]),
            pad16(&[20.0, 20.0]),
            pad16(&[30.0, 20.0]),
            pad16(&[25.0, 30.0]),
        );
        let mut gd = GeoData::default();
        extract_geometry(&mut gd, "case.g01", &text, WGS84, 4326).unwrap();

        let features = &gd.features["case.g01"];
        assert_eq!(features.storage_areas.len(), 1);
        assert_eq!(features.storage_areas[0].feature_name, "Upper Pond");
        assert_eq!(features.two_d_areas.len(), 1);
        assert_eq!(features.two_d_areas[0].feature_name, "Mesh A");

        // multi polygon type code
        let wkb = &features.storage_areas[0].geometry;
        assert_eq!(u32::from_le_bytes(wkb[1..5].try_into().unwrap()), 6);
    }

    #[test]
    fn test_short_breakline_skipped() {
        let text = format!(
            "BreakLine Name=Short One\nBreakLine Polyline= 1\n{}\n\
BreakLine Name=Good One\nBreakLine Polyline= 2\n{}\n",
            pad16(&[5.0, 5.0]),
            pad16(&[0.0, 0.0, 50.0, 50.0]),
        );
        let mut gd = GeoData::default();
        extract_geometry(&mut gd, "case.g01", &text, WGS84, 4326).unwrap();

        let features = &gd.features["case.g01"];
        assert_eq!(features.break_lines.len(), 1);
        assert_eq!(features.break_lines[0].feature_name, "Good One");
    }

    #[test]
    fn test_bc_line_records_area() {
        let text = format!(
            "BC Line Name=Inflow North\nBC Line Storage Area=Mesh A\nBC Line Arc= 2\n{}\n",
            pad16(&[0.0, 0.0, 10.0, 10.0]),
        );
        let mut gd = GeoData::default();
        extract_geometry(&mut gd, "case.g01", &text, WGS84, 4326).unwrap();

        let features = &gd.features["case.g01"];
        assert_eq!(features.bc_lines.len(), 1);
        assert_eq!(
            features.bc_lines[0].fields["StorageArea"],
            FieldValue::Str("Mesh A".to_string())
        );
    }

    #[test]
    fn test_connection_records_up_dn() {
        let text = format!(
            "Connection=Levee Breach ,1,2\nConnection Line= 2\n{}\nConnection Up SA=Upper Pond\nConnection Dn SA=Mesh A\n",
            pad16(&[0.0, 0.0, 10.0, 0.0]),
        );
        let mut gd = GeoData::default();
        extract_geometry(&mut gd, "case.g01", &text, WGS84, 4326).unwrap();

        let features = &gd.features["case.g01"];
        assert_eq!(features.connections.len(), 1);
        assert_eq!(features.connections[0].feature_name, "Levee Breach");
        assert_eq!(
            features.connections[0].fields["UpSA"],
            FieldValue::Str("Upper Pond".to_string())
        );
        assert_eq!(
            features.connections[0].fields["DnSA"],
            FieldValue::Str("Mesh A".to_string())
        );
    }
}
