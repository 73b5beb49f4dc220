//! Well-known-binary encoding of vector geometries.
//!
//! Output is little-endian WKB. Geometries with z values carry the
//! 0x80000000 type flag (the GDAL "2.5D" convention) rather than the ISO
//! +1000 offset, so the bytes match what downstream consumers of the
//! previous extractor already decode.

use crate::geometry::{Geometry, Xy, Xyz};

const BYTE_ORDER_LE: u8 = 1;
const WKB_Z_FLAG: u32 = 0x8000_0000;

const WKB_POINT: u32 = 1;
const WKB_LINESTRING: u32 = 2;
const WKB_POLYGON: u32 = 3;
const WKB_MULTIPOINT: u32 = 4;
const WKB_MULTILINESTRING: u32 = 5;
const WKB_MULTIPOLYGON: u32 = 6;

/// Encode a geometry as little-endian WKB.
pub fn encode(geom: &Geometry) -> Vec<u8> {
    let mut buf = Vec::with_capacity(estimated_size(geom));
    write_geometry(&mut buf, geom);
    buf
}

fn estimated_size(geom: &Geometry) -> usize {
    // header + coords; close enough for a single allocation in most cases
    match geom {
        Geometry::Point(_) => 21,
        Geometry::MultiPoint(ps) => 9 + ps.len() * 21,
        Geometry::LineString(l) => 9 + l.len() * 16,
        Geometry::LineStringZ(l) => 9 + l.len() * 24,
        Geometry::MultiLineString(ls) => 9 + ls.iter().map(|l| 9 + l.len() * 16).sum::<usize>(),
        Geometry::MultiLineStringZ(ls) => 9 + ls.iter().map(|l| 9 + l.len() * 24).sum::<usize>(),
        Geometry::Polygon(rings) => 9 + rings.iter().map(|r| 4 + r.len() * 16).sum::<usize>(),
        Geometry::MultiPolygon(polys) => {
            9 + polys
                .iter()
                .map(|rings| 9 + rings.iter().map(|r| 4 + r.len() * 16).sum::<usize>())
                .sum::<usize>()
        }
    }
}

fn write_header(buf: &mut Vec<u8>, type_code: u32) {
    buf.push(BYTE_ORDER_LE);
    buf.extend_from_slice(&type_code.to_le_bytes());
}

fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_xy(buf: &mut Vec<u8>, p: &Xy) {
    buf.extend_from_slice(&p[0].to_le_bytes());
    buf.extend_from_slice(&p[1].to_le_bytes());
}

fn write_xyz(buf: &mut Vec<u8>, p: &Xyz) {
    buf.extend_from_slice(&p[0].to_le_bytes());
    buf.extend_from_slice(&p[1].to_le_bytes());
    buf.extend_from_slice(&p[2].to_le_bytes());
}

fn write_geometry(buf: &mut Vec<u8>, geom: &Geometry) {
    match geom {
        Geometry::Point(p) => {
            write_header(buf, WKB_POINT);
            write_xy(buf, p);
        }
        Geometry::MultiPoint(ps) => {
            write_header(buf, WKB_MULTIPOINT);
            write_u32(buf, ps.len() as u32);
            for p in ps {
                write_header(buf, WKB_POINT);
                write_xy(buf, p);
            }
        }
        Geometry::LineString(l) => {
            write_header(buf, WKB_LINESTRING);
            write_u32(buf, l.len() as u32);
            for p in l {
                write_xy(buf, p);
            }
        }
        Geometry::LineStringZ(l) => {
            write_header(buf, WKB_LINESTRING | WKB_Z_FLAG);
            write_u32(buf, l.len() as u32);
            for p in l {
                write_xyz(buf, p);
            }
        }
        Geometry::MultiLineString(ls) => {
            write_header(buf, WKB_MULTILINESTRING);
            write_u32(buf, ls.len() as u32);
            for l in ls {
                write_header(buf, WKB_LINESTRING);
                write_u32(buf, l.len() as u32);
                for p in l {
                    write_xy(buf, p);
                }
            }
        }
        Geometry::MultiLineStringZ(ls) => {
            write_header(buf, WKB_MULTILINESTRING | WKB_Z_FLAG);
            write_u32(buf, ls.len() as u32);
            for l in ls {
                write_header(buf, WKB_LINESTRING | WKB_Z_FLAG);
                write_u32(buf, l.len() as u32);
                for p in l {
                    write_xyz(buf, p);
                }
            }
        }
        Geometry::Polygon(rings) => {
            write_header(buf, WKB_POLYGON);
            write_u32(buf, rings.len() as u32);
            for r in rings {
                write_u32(buf, r.len() as u32);
                for p in r {
                    write_xy(buf, p);
                }
            }
        }
        Geometry::MultiPolygon(polys) => {
            write_header(buf, WKB_MULTIPOLYGON);
            write_u32(buf, polys.len() as u32);
            for rings in polys {
                write_header(buf, WKB_POLYGON);
                write_u32(buf, rings.len() as u32);
                for r in rings {
                    write_u32(buf, r.len() as u32);
                    for p in r {
                        write_xy(buf, p);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_u32(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn read_f64(bytes: &[u8], at: usize) -> f64 {
        f64::from_le_bytes(bytes[at..at + 8].try_into().unwrap())
    }

    #[test]
    fn test_point() {
        let wkb = encode(&Geometry::Point([1.5, -2.5]));
        assert_eq!(wkb.len(), 21);
        assert_eq!(wkb[0], 1);
        assert_eq!(read_u32(&wkb, 1), WKB_POINT);
        assert_eq!(read_f64(&wkb, 5), 1.5);
        assert_eq!(read_f64(&wkb, 13), -2.5);
    }

    #[test]
    fn test_multi_line_string() {
        let wkb = encode(&Geometry::MultiLineString(vec![vec![
            [200.0, 100.0],
            [210.0, 110.0],
            [220.0, 120.0],
            [230.0, 130.0],
        ]]));
        assert_eq!(read_u32(&wkb, 1), WKB_MULTILINESTRING);
        assert_eq!(read_u32(&wkb, 5), 1); // one member line
        assert_eq!(read_u32(&wkb, 10), WKB_LINESTRING);
        assert_eq!(read_u32(&wkb, 14), 4); // four vertices
        assert_eq!(read_f64(&wkb, 18), 200.0);
        assert_eq!(read_f64(&wkb, 26), 100.0);
    }

    #[test]
    fn test_line_string_z_flag() {
        let wkb = encode(&Geometry::LineStringZ(vec![
            [0.0, 0.0, 10.0],
            [50.0, 0.0, 5.0],
            [100.0, 0.0, 10.0],
        ]));
        assert_eq!(read_u32(&wkb, 1), WKB_LINESTRING | WKB_Z_FLAG);
        assert_eq!(read_u32(&wkb, 5), 3);
        // third vertex z
        assert_eq!(read_f64(&wkb, 9 + 2 * 24 + 16), 10.0);
    }

    #[test]
    fn test_multi_polygon() {
        let ring = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let wkb = encode(&Geometry::MultiPolygon(vec![vec![ring]]));
        assert_eq!(read_u32(&wkb, 1), WKB_MULTIPOLYGON);
        assert_eq!(read_u32(&wkb, 5), 1);
        assert_eq!(read_u32(&wkb, 10), WKB_POLYGON);
        assert_eq!(read_u32(&wkb, 14), 1); // one ring
        assert_eq!(read_u32(&wkb, 18), 4); // four vertices
    }

    #[test]
    fn test_multi_point() {
        let wkb = encode(&Geometry::Point([3.0, 4.0]).into_multi());
        assert_eq!(read_u32(&wkb, 1), WKB_MULTIPOINT);
        assert_eq!(read_u32(&wkb, 5), 1);
        assert_eq!(read_u32(&wkb, 10), WKB_POINT);
        assert_eq!(read_f64(&wkb, 14), 3.0);
    }
}
