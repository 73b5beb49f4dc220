//! WKT coordinate-reference-system reader.
//!
//! RAS projection sidecars carry a single line of WKT1. This module parses
//! that into a node tree and answers the questions the extractor asks of it:
//! is it valid, what linear unit does it use, which projection method and
//! parameters, which authority code.

use crate::error::{GeoError, GeoResult};

/// A value inside a WKT node: either a scalar token or a nested node.
///
/// Scalars keep their raw text; numeric interpretation happens on demand so
/// authority codes like "4326" survive untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum WktValue {
    Scalar(String),
    Node(WktNode),
}

/// A WKT node: `KEYWORD[value, value, ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WktNode {
    pub keyword: String,
    pub values: Vec<WktValue>,
}

impl WktNode {
    /// Find a node by keyword, checking direct children before recursing.
    /// This mirrors the search order CRS consumers of WKT1 conventionally
    /// use, so a PROJCS's own UNIT shadows the one inside its GEOGCS.
    pub fn get_node(&self, keyword: &str) -> Option<&WktNode> {
        for value in &self.values {
            if let WktValue::Node(node) = value {
                if node.keyword.eq_ignore_ascii_case(keyword) {
                    return Some(node);
                }
            }
        }
        for value in &self.values {
            if let WktValue::Node(node) = value {
                if let Some(found) = node.get_node(keyword) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Direct child node by keyword, no recursion.
    pub fn child(&self, keyword: &str) -> Option<&WktNode> {
        self.values.iter().find_map(|value| match value {
            WktValue::Node(node) if node.keyword.eq_ignore_ascii_case(keyword) => Some(node),
            _ => None,
        })
    }

    /// The idx-th scalar value of this node, counting nested nodes too.
    pub fn value(&self, idx: usize) -> Option<&str> {
        match self.values.get(idx) {
            Some(WktValue::Scalar(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn value_f64(&self, idx: usize) -> Option<f64> {
        self.value(idx).and_then(|s| s.parse().ok())
    }
}

/// A parsed spatial reference.
#[derive(Debug, Clone)]
pub struct SpatialRef {
    root: WktNode,
}

impl SpatialRef {
    /// Parse a WKT1 definition.
    pub fn from_wkt(wkt: &str) -> GeoResult<Self> {
        let mut parser = WktParser::new(wkt);
        let root = parser.parse_node()?;
        parser.expect_end()?;
        Ok(Self { root })
    }

    /// The root keyword (PROJCS, GEOGCS, ...).
    pub fn keyword(&self) -> &str {
        &self.root.keyword
    }

    pub fn is_projected(&self) -> bool {
        self.root.keyword.eq_ignore_ascii_case("PROJCS")
    }

    pub fn is_geographic(&self) -> bool {
        self.root.keyword.eq_ignore_ascii_case("GEOGCS")
    }

    /// Check that the definition describes a usable coordinate system.
    pub fn validate(&self) -> GeoResult<()> {
        if self.is_projected() {
            if self.root.get_node("GEOGCS").is_none() {
                return Err(GeoError::InvalidCrs("PROJCS without GEOGCS".into()));
            }
            if self.root.child("PROJECTION").is_none() {
                return Err(GeoError::InvalidCrs("PROJCS without PROJECTION".into()));
            }
            if self.root.child("UNIT").is_none() {
                return Err(GeoError::InvalidCrs("PROJCS without UNIT".into()));
            }
            Ok(())
        } else if self.is_geographic() {
            if self.root.get_node("DATUM").is_none() {
                return Err(GeoError::InvalidCrs("GEOGCS without DATUM".into()));
            }
            Ok(())
        } else {
            Err(GeoError::InvalidCrs(format!(
                "unsupported root keyword {}",
                self.root.keyword
            )))
        }
    }

    /// The idx-th value of the first node with the given keyword, direct
    /// children searched before nested ones.
    pub fn attr_value(&self, keyword: &str, idx: usize) -> Option<&str> {
        let node = if self.root.keyword.eq_ignore_ascii_case(keyword) {
            Some(&self.root)
        } else {
            self.root.get_node(keyword)
        };
        node.and_then(|n| n.value(idx))
    }

    /// Name of the unit governing this CRS's coordinates: the linear unit
    /// for projected systems, the angular unit for geographic ones.
    pub fn unit_name(&self) -> Option<&str> {
        self.attr_value("UNIT", 0)
    }

    /// Conversion factor from this CRS's linear unit to metres. 1.0 for
    /// metre-based systems, ~0.3048 for foot-based ones.
    pub fn linear_unit_factor(&self) -> f64 {
        if self.is_projected() {
            self.root
                .child("UNIT")
                .and_then(|u| u.value_f64(1))
                .unwrap_or(1.0)
        } else {
            1.0
        }
    }

    /// The EPSG authority code of the root node, if declared.
    pub fn epsg_code(&self) -> Option<i32> {
        let auth = self.root.child("AUTHORITY")?;
        if !auth.value(0)?.eq_ignore_ascii_case("EPSG") {
            return None;
        }
        auth.value(1)?.parse().ok()
    }

    /// The projection method name for projected systems.
    pub fn projection_name(&self) -> Option<&str> {
        self.root.child("PROJECTION").and_then(|n| n.value(0))
    }

    /// A projection parameter by (case-insensitive) name.
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.root.values.iter().find_map(|value| match value {
            WktValue::Node(node)
                if node.keyword.eq_ignore_ascii_case("PARAMETER")
                    && node.value(0).is_some_and(|v| v.eq_ignore_ascii_case(name)) =>
            {
                node.value_f64(1)
            }
            _ => None,
        })
    }

    /// Semi-major axis and inverse flattening of the underlying spheroid.
    pub fn spheroid(&self) -> GeoResult<(f64, f64)> {
        let node = self
            .root
            .get_node("SPHEROID")
            .ok_or_else(|| GeoError::InvalidCrs("no SPHEROID".into()))?;
        let a = node
            .value_f64(1)
            .ok_or_else(|| GeoError::InvalidCrs("SPHEROID without semi-major axis".into()))?;
        let inv_f = node
            .value_f64(2)
            .ok_or_else(|| GeoError::InvalidCrs("SPHEROID without inverse flattening".into()))?;
        Ok((a, inv_f))
    }
}

struct WktParser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> WktParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn parse_node(&mut self) -> GeoResult<WktNode> {
        self.skip_ws();
        let keyword = self.parse_bare_token()?;
        self.skip_ws();
        match self.chars.next() {
            Some('[') | Some('(') => {}
            other => {
                return Err(GeoError::InvalidWkt(format!(
                    "expected '[' after {}, found {:?}",
                    keyword, other
                )))
            }
        }
        self.parse_node_body(keyword)
    }

    // Parse the values of a node whose keyword and '[' were already consumed.
    fn parse_node_body(&mut self, keyword: String) -> GeoResult<WktNode> {
        let mut values = Vec::new();
        loop {
            self.skip_ws();
            match self.chars.peek() {
                Some(']') | Some(')') => {
                    self.chars.next();
                    break;
                }
                Some(',') => {
                    self.chars.next();
                }
                Some('"') => {
                    values.push(WktValue::Scalar(self.parse_quoted()?));
                }
                Some(_) => {
                    let token = self.parse_bare_token()?;
                    self.skip_ws();
                    if matches!(self.chars.peek(), Some('[') | Some('(')) {
                        self.chars.next();
                        values.push(WktValue::Node(self.parse_node_body(token)?));
                    } else {
                        values.push(WktValue::Scalar(token));
                    }
                }
                None => {
                    return Err(GeoError::InvalidWkt(format!(
                        "unterminated node {}",
                        keyword
                    )))
                }
            }
        }
        Ok(WktNode { keyword, values })
    }

    fn parse_quoted(&mut self) -> GeoResult<String> {
        // opening quote
        self.chars.next();
        let mut out = String::new();
        for c in self.chars.by_ref() {
            if c == '"' {
                return Ok(out);
            }
            out.push(c);
        }
        Err(GeoError::InvalidWkt("unterminated quoted string".into()))
    }

    fn parse_bare_token(&mut self) -> GeoResult<String> {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '[' || c == ']' || c == '(' || c == ')' || c == ',' || c == '"' || c.is_whitespace() {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        if out.is_empty() {
            return Err(GeoError::InvalidWkt("expected a token".into()));
        }
        Ok(out)
    }

    fn expect_end(&mut self) -> GeoResult<()> {
        self.skip_ws();
        match self.chars.next() {
            None => Ok(()),
            Some(c) => Err(GeoError::InvalidWkt(format!(
                "trailing content starting at '{}'",
                c
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#;

    const STATE_PLANE: &str = r#"PROJCS["NAD83 / Texas South Central (ftUS)",GEOGCS["NAD83",DATUM["North_American_Datum_1983",SPHEROID["GRS 1980",6378137,298.257222101]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic_2SP"],PARAMETER["standard_parallel_1",30.28333333333333],PARAMETER["standard_parallel_2",28.38333333333333],PARAMETER["latitude_of_origin",27.83333333333333],PARAMETER["central_meridian",-99],PARAMETER["false_easting",1968500],PARAMETER["false_northing",13123333.333],UNIT["US survey foot",0.3048006096012192],AUTHORITY["EPSG","2278"]]"#;

    #[test]
    fn test_parse_geographic() {
        let sp = SpatialRef::from_wkt(WGS84).unwrap();
        assert!(sp.is_geographic());
        assert!(sp.validate().is_ok());
        assert_eq!(sp.unit_name(), Some("degree"));
        assert_eq!(sp.epsg_code(), Some(4326));
    }

    #[test]
    fn test_parse_projected() {
        let sp = SpatialRef::from_wkt(STATE_PLANE).unwrap();
        assert!(sp.is_projected());
        assert!(sp.validate().is_ok());
        // The PROJCS's own UNIT shadows the GEOGCS degree unit.
        assert_eq!(sp.unit_name(), Some("US survey foot"));
        assert!((sp.linear_unit_factor() - 0.3048006096012192).abs() < 1e-15);
        assert_eq!(sp.projection_name(), Some("Lambert_Conformal_Conic_2SP"));
        assert_eq!(sp.parameter("central_meridian"), Some(-99.0));
        assert_eq!(sp.epsg_code(), Some(2278));
        let (a, inv_f) = sp.spheroid().unwrap();
        assert_eq!(a, 6378137.0);
        assert!((inv_f - 298.257222101).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_wkt() {
        assert!(SpatialRef::from_wkt("not wkt at all").is_err());
        assert!(SpatialRef::from_wkt("PROJCS[\"x\"").is_err());
        assert!(SpatialRef::from_wkt("").is_err());
    }

    #[test]
    fn test_validate_rejects_other_roots() {
        let sp = SpatialRef::from_wkt(r#"LOCAL_CS["local",UNIT["metre",1]]"#).unwrap();
        assert!(sp.validate().is_err());
    }
}
