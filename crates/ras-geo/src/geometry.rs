//! Vector geometry containers.
//!
//! These carry coordinates between the text parsers, the coordinate
//! transform, and the WKB encoder. Cross-section cutlines need a z
//! coordinate, so 2D and 3D line variants are distinct.

/// An x/y coordinate pair.
pub type Xy = [f64; 2];

/// An x/y/z coordinate triple.
pub type Xyz = [f64; 3];

/// A vector geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Xy),
    MultiPoint(Vec<Xy>),
    LineString(Vec<Xy>),
    /// A line string with z values (the GDAL "2.5D" form).
    LineStringZ(Vec<Xyz>),
    MultiLineString(Vec<Vec<Xy>>),
    MultiLineStringZ(Vec<Vec<Xyz>>),
    /// Outer ring first, holes after. Rings are not implicitly closed.
    Polygon(Vec<Vec<Xy>>),
    MultiPolygon(Vec<Vec<Vec<Xy>>>),
}

impl Geometry {
    /// Promote a singular geometry to its multi-part counterpart.
    /// Multi-part geometries are returned unchanged.
    pub fn into_multi(self) -> Geometry {
        match self {
            Geometry::Point(p) => Geometry::MultiPoint(vec![p]),
            Geometry::LineString(l) => Geometry::MultiLineString(vec![l]),
            Geometry::LineStringZ(l) => Geometry::MultiLineStringZ(vec![l]),
            Geometry::Polygon(rings) => Geometry::MultiPolygon(vec![rings]),
            other => other,
        }
    }

    /// Exchange the x and y axes of every coordinate, leaving z untouched.
    pub fn flip_xy(&mut self) {
        fn flip2(points: &mut [Xy]) {
            for p in points {
                p.swap(0, 1);
            }
        }
        fn flip3(points: &mut [Xyz]) {
            for p in points {
                p.swap(0, 1);
            }
        }

        match self {
            Geometry::Point(p) => p.swap(0, 1),
            Geometry::MultiPoint(ps) => flip2(ps),
            Geometry::LineString(l) => flip2(l),
            Geometry::LineStringZ(l) => flip3(l),
            Geometry::MultiLineString(ls) => ls.iter_mut().for_each(|l| flip2(l)),
            Geometry::MultiLineStringZ(ls) => ls.iter_mut().for_each(|l| flip3(l)),
            Geometry::Polygon(rings) => rings.iter_mut().for_each(|r| flip2(r)),
            Geometry::MultiPolygon(polys) => polys
                .iter_mut()
                .for_each(|rings| rings.iter_mut().for_each(|r| flip2(r))),
        }
    }

    /// Apply `f` to every (x, y) pair in place.
    pub fn map_xy(&mut self, mut f: impl FnMut(f64, f64) -> (f64, f64)) {
        fn apply2(points: &mut [Xy], f: &mut impl FnMut(f64, f64) -> (f64, f64)) {
            for p in points {
                let (x, y) = f(p[0], p[1]);
                p[0] = x;
                p[1] = y;
            }
        }
        fn apply3(points: &mut [Xyz], f: &mut impl FnMut(f64, f64) -> (f64, f64)) {
            for p in points {
                let (x, y) = f(p[0], p[1]);
                p[0] = x;
                p[1] = y;
            }
        }

        match self {
            Geometry::Point(p) => {
                let (x, y) = f(p[0], p[1]);
                *p = [x, y];
            }
            Geometry::MultiPoint(ps) => apply2(ps, &mut f),
            Geometry::LineString(l) => apply2(l, &mut f),
            Geometry::LineStringZ(l) => apply3(l, &mut f),
            Geometry::MultiLineString(ls) => {
                for l in ls {
                    apply2(l, &mut f);
                }
            }
            Geometry::MultiLineStringZ(ls) => {
                for l in ls {
                    apply3(l, &mut f);
                }
            }
            Geometry::Polygon(rings) => {
                for r in rings {
                    apply2(r, &mut f);
                }
            }
            Geometry::MultiPolygon(polys) => {
                for rings in polys {
                    for r in rings {
                        apply2(r, &mut f);
                    }
                }
            }
        }
    }
}

/// Planar length of a polyline.
pub fn polyline_length(points: &[Xy]) -> f64 {
    points
        .windows(2)
        .map(|w| distance(w[0], w[1]))
        .sum()
}

/// Euclidean distance between two points.
pub fn distance(p0: Xy, p1: Xy) -> f64 {
    ((p1[0] - p0[0]).powi(2) + (p1[1] - p0[1]).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_multi() {
        let g = Geometry::LineString(vec![[0.0, 0.0], [1.0, 1.0]]);
        match g.into_multi() {
            Geometry::MultiLineString(ls) => assert_eq!(ls.len(), 1),
            other => panic!("expected multi line string, got {:?}", other),
        }
    }

    #[test]
    fn test_flip_xy() {
        let mut g = Geometry::LineStringZ(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        g.flip_xy();
        assert_eq!(
            g,
            Geometry::LineStringZ(vec![[2.0, 1.0, 3.0], [5.0, 4.0, 6.0]])
        );
    }

    #[test]
    fn test_polyline_length() {
        let line = [[0.0, 0.0], [3.0, 4.0], [3.0, 14.0]];
        assert!((polyline_length(&line) - 15.0).abs() < 1e-12);
    }
}
