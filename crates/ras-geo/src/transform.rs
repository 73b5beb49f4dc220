//! Coordinate transforms from a source CRS (WKT) to a destination EPSG code.
//!
//! The source side inverse-projects to geographic coordinates on the source
//! spheroid; the destination side forward-projects from there. NAD83 and
//! WGS84 are treated as coincident, which is sub-meter over the data this
//! serves. Formulas follow Snyder, "Map Projections: A Working Manual"
//! (USGS PP 1395), in ellipsoidal form.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::crs::SpatialRef;
use crate::error::{GeoError, GeoResult};
use crate::geometry::Geometry;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Earth radius used by EPSG:3857 (sphere).
const WEB_MERCATOR_RADIUS: f64 = 6378137.0;

/// A point-wise transform from a source CRS to a destination EPSG code.
pub struct CoordinateTransform {
    source: SourceProjection,
    /// Source linear unit to metres (1.0 for geographic sources).
    unit_factor: f64,
    dest: DestProjection,
}

enum SourceProjection {
    Geographic,
    Lambert(LambertConformal),
    TransverseMercator(TransverseMercator),
}

enum DestProjection {
    /// EPSG:4326 — output is (lon, lat) in degrees.
    Geographic,
    /// EPSG:3857 — output is (x, y) in metres.
    WebMercator,
}

impl CoordinateTransform {
    /// Build a transform from a parsed source CRS to a destination EPSG code.
    pub fn new(source: &SpatialRef, dest_epsg: i32) -> GeoResult<Self> {
        source.validate()?;

        let dest = match dest_epsg {
            4326 => DestProjection::Geographic,
            3857 => DestProjection::WebMercator,
            other => return Err(GeoError::UnsupportedEpsg(other)),
        };

        if source.is_geographic() {
            return Ok(Self {
                source: SourceProjection::Geographic,
                unit_factor: 1.0,
                dest,
            });
        }

        let name = source
            .projection_name()
            .ok_or_else(|| GeoError::InvalidCrs("PROJCS without PROJECTION".into()))?
            .to_lowercase();

        let projection = if name.contains("lambert_conformal_conic") {
            SourceProjection::Lambert(LambertConformal::from_spatial_ref(source)?)
        } else if name.contains("transverse_mercator") {
            SourceProjection::TransverseMercator(TransverseMercator::from_spatial_ref(source)?)
        } else {
            return Err(GeoError::UnsupportedProjection(name));
        };

        Ok(Self {
            source: projection,
            unit_factor: source.linear_unit_factor(),
            dest,
        })
    }

    /// Transform one coordinate pair, given in source CRS units.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let (lon_deg, lat_deg) = match &self.source {
            SourceProjection::Geographic => (x, y),
            SourceProjection::Lambert(p) => p.inverse(x * self.unit_factor, y * self.unit_factor),
            SourceProjection::TransverseMercator(p) => {
                p.inverse(x * self.unit_factor, y * self.unit_factor)
            }
        };

        match self.dest {
            DestProjection::Geographic => (lon_deg, lat_deg),
            DestProjection::WebMercator => {
                let x = WEB_MERCATOR_RADIUS * lon_deg * DEG_TO_RAD;
                let y = WEB_MERCATOR_RADIUS
                    * (FRAC_PI_4 + lat_deg * DEG_TO_RAD / 2.0).tan().ln();
                (x, y)
            }
        }
    }

    /// Transform every coordinate of a geometry in place.
    pub fn apply_geometry(&self, geom: &mut Geometry) {
        geom.map_xy(|x, y| self.apply(x, y));
    }
}

fn eccentricity(inv_f: f64) -> f64 {
    let f = 1.0 / inv_f;
    (2.0 * f - f * f).sqrt()
}

/// Snyder eq. 14-15: m(phi) = cos(phi) / sqrt(1 - e^2 sin^2 phi)
fn little_m(phi: f64, e: f64) -> f64 {
    phi.cos() / (1.0 - (e * phi.sin()).powi(2)).sqrt()
}

/// Snyder eq. 15-9: t(phi)
fn little_t(phi: f64, e: f64) -> f64 {
    (FRAC_PI_4 - phi / 2.0).tan()
        / ((1.0 - e * phi.sin()) / (1.0 + e * phi.sin())).powf(e / 2.0)
}

/// Invert t(phi) iteratively (Snyder eq. 7-9).
fn phi_from_t(t: f64, e: f64) -> f64 {
    let mut phi = FRAC_PI_2 - 2.0 * t.atan();
    for _ in 0..8 {
        let next = FRAC_PI_2
            - 2.0 * (t * ((1.0 - e * phi.sin()) / (1.0 + e * phi.sin())).powf(e / 2.0)).atan();
        if (next - phi).abs() < 1e-12 {
            return next;
        }
        phi = next;
    }
    phi
}

/// Ellipsoidal Lambert Conformal Conic (1SP or 2SP).
struct LambertConformal {
    a: f64,
    e: f64,
    n: f64,
    big_f: f64,
    rho0: f64,
    lon0: f64,
    k0: f64,
    /// False easting/northing in metres.
    fe: f64,
    fn_: f64,
}

impl LambertConformal {
    fn from_spatial_ref(sp: &SpatialRef) -> GeoResult<Self> {
        let (a, inv_f) = sp.spheroid()?;
        let e = eccentricity(inv_f);
        let unit = sp.linear_unit_factor();

        let lat0 = sp
            .parameter("latitude_of_origin")
            .ok_or_else(|| GeoError::InvalidCrs("Lambert without latitude_of_origin".into()))?
            * DEG_TO_RAD;
        let lon0 = sp
            .parameter("central_meridian")
            .ok_or_else(|| GeoError::InvalidCrs("Lambert without central_meridian".into()))?
            * DEG_TO_RAD;
        let lat1 = sp
            .parameter("standard_parallel_1")
            .map(|v| v * DEG_TO_RAD)
            .unwrap_or(lat0);
        let lat2 = sp
            .parameter("standard_parallel_2")
            .map(|v| v * DEG_TO_RAD)
            .unwrap_or(lat1);
        let k0 = sp.parameter("scale_factor").unwrap_or(1.0);
        let fe = sp.parameter("false_easting").unwrap_or(0.0) * unit;
        let fn_ = sp.parameter("false_northing").unwrap_or(0.0) * unit;

        let m1 = little_m(lat1, e);
        let t1 = little_t(lat1, e);
        let t0 = little_t(lat0, e);

        let n = if (lat1 - lat2).abs() < 1e-10 {
            lat1.sin()
        } else {
            let m2 = little_m(lat2, e);
            let t2 = little_t(lat2, e);
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };
        let big_f = m1 / (n * t1.powf(n));
        let rho0 = a * big_f * t0.powf(n) * k0;

        Ok(Self {
            a,
            e,
            n,
            big_f,
            rho0,
            lon0,
            k0,
            fe,
            fn_,
        })
    }

    /// Projected metres to (lon, lat) degrees.
    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let xp = x - self.fe;
        let yp = y - self.fn_;

        let mut rho = (xp * xp + (self.rho0 - yp) * (self.rho0 - yp)).sqrt();
        if self.n < 0.0 {
            rho = -rho;
        }
        let theta = if self.n < 0.0 {
            (-xp).atan2(-(self.rho0 - yp))
        } else {
            xp.atan2(self.rho0 - yp)
        };

        let t = (rho / (self.a * self.big_f * self.k0)).powf(1.0 / self.n);
        let phi = phi_from_t(t, self.e);
        let lambda = theta / self.n + self.lon0;

        (lambda * RAD_TO_DEG, phi * RAD_TO_DEG)
    }

    /// (lon, lat) degrees to projected metres. Used by tests to verify the
    /// inverse; kept non-test because destination Lambert support may reuse it.
    #[allow(dead_code)]
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg * DEG_TO_RAD;
        let lambda = lon_deg * DEG_TO_RAD;

        let t = little_t(phi, self.e);
        let rho = self.a * self.big_f * t.powf(self.n) * self.k0;
        let theta = self.n * (lambda - self.lon0);

        let x = self.fe + rho * theta.sin();
        let y = self.fn_ + self.rho0 - rho * theta.cos();
        (x, y)
    }
}

/// Ellipsoidal Transverse Mercator (covers UTM and TM state-plane zones).
struct TransverseMercator {
    a: f64,
    e2: f64,
    ep2: f64,
    k0: f64,
    lon0: f64,
    m0: f64,
    /// False easting/northing in metres.
    fe: f64,
    fn_: f64,
}

impl TransverseMercator {
    fn from_spatial_ref(sp: &SpatialRef) -> GeoResult<Self> {
        let (a, inv_f) = sp.spheroid()?;
        let e = eccentricity(inv_f);
        let e2 = e * e;
        let unit = sp.linear_unit_factor();

        let lat0 = sp
            .parameter("latitude_of_origin")
            .ok_or_else(|| GeoError::InvalidCrs("TM without latitude_of_origin".into()))?
            * DEG_TO_RAD;
        let lon0 = sp
            .parameter("central_meridian")
            .ok_or_else(|| GeoError::InvalidCrs("TM without central_meridian".into()))?
            * DEG_TO_RAD;
        let k0 = sp.parameter("scale_factor").unwrap_or(1.0);
        let fe = sp.parameter("false_easting").unwrap_or(0.0) * unit;
        let fn_ = sp.parameter("false_northing").unwrap_or(0.0) * unit;

        Ok(Self {
            a,
            e2,
            ep2: e2 / (1.0 - e2),
            k0,
            lon0,
            m0: meridional_arc(a, e2, lat0),
            fe,
            fn_,
        })
    }

    /// Projected metres to (lon, lat) degrees. Snyder eqs. 8-17 .. 8-25.
    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let xp = x - self.fe;
        let yp = y - self.fn_;

        let m = self.m0 + yp / self.k0;
        let e2 = self.e2;
        let mu = m
            / (self.a
                * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));

        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let c1 = self.ep2 * phi1.cos().powi(2);
        let t1 = phi1.tan().powi(2);
        let n1 = self.a / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
        let r1 = self.a * (1.0 - e2) / (1.0 - e2 * phi1.sin().powi(2)).powf(1.5);
        let d = xp / (n1 * self.k0);

        let phi = phi1
            - (n1 * phi1.tan() / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2)
                        * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let lambda = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2
                    + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / phi1.cos();

        (lambda * RAD_TO_DEG, phi * RAD_TO_DEG)
    }

    /// (lon, lat) degrees to projected metres. Snyder eqs. 8-9 .. 8-13.
    #[allow(dead_code)]
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg * DEG_TO_RAD;
        let lambda = lon_deg * DEG_TO_RAD;

        let e2 = self.e2;
        let n = self.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        let t = phi.tan().powi(2);
        let c = self.ep2 * phi.cos().powi(2);
        let a_term = (lambda - self.lon0) * phi.cos();
        let m = meridional_arc(self.a, e2, phi);

        let x = self.k0
            * n
            * (a_term
                + (1.0 - t + c) * a_term.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a_term.powi(5)
                    / 120.0)
            + self.fe;

        let y = self.k0
            * (m - self.m0
                + n * phi.tan()
                    * (a_term * a_term / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a_term.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2)
                            * a_term.powi(6)
                            / 720.0))
            + self.fn_;

        (x, y)
    }
}

/// Meridional arc length M(phi), Snyder eq. 3-21.
fn meridional_arc(a: f64, e2: f64, phi: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}
