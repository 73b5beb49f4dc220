//! Canned RAS model file texts shared across crates' tests.
//!
//! The numeric blocks are built programmatically so the fixed-width column
//! layout (80/8, 64/16, 32/16) is always exact.

/// Well-known-text CRS fixtures.
pub mod wkt {
    /// Geographic WGS84 with an EPSG authority.
    pub const WGS84: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#;

    /// NAD83 Texas South Central state plane, US survey feet,
    /// Lambert Conformal Conic 2SP.
    pub const TX_SOUTH_CENTRAL: &str = r#"PROJCS["NAD83 / Texas South Central (ftUS)",GEOGCS["NAD83",DATUM["North_American_Datum_1983",SPHEROID["GRS 1980",6378137,298.257222101]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic_2SP"],PARAMETER["standard_parallel_1",30.28333333333333],PARAMETER["standard_parallel_2",28.38333333333333],PARAMETER["latitude_of_origin",27.83333333333333],PARAMETER["central_meridian",-99],PARAMETER["false_easting",1968500],PARAMETER["false_northing",13123333.333],UNIT["US survey foot",0.3048006096012192],AUTHORITY["EPSG","2278"]]"#;

    /// WGS84 / UTM zone 16N, metres, Transverse Mercator.
    pub const UTM_16N: &str = r#"PROJCS["WGS 84 / UTM zone 16N",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",-87],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",0],UNIT["metre",1],AUTHORITY["EPSG","32616"]]"#;
}

/// Render coordinate pairs into rows of `col_width` characters with
/// `value_width`-character fields.
pub fn pair_block(pairs: &[(f64, f64)], col_width: usize, value_width: usize) -> String {
    let per_line = col_width / (value_width * 2);
    let mut lines = Vec::new();
    for chunk in pairs.chunks(per_line.max(1)) {
        let mut line = String::new();
        for (a, b) in chunk {
            line.push_str(&format!("{:>vw$}{:>vw$}", a, b, vw = value_width));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Render a value series into rows of `col_width` characters with
/// `value_width`-character fields.
pub fn series_block(values: &[f64], col_width: usize, value_width: usize) -> String {
    let per_line = col_width / value_width;
    let mut lines = Vec::new();
    for chunk in values.chunks(per_line.max(1)) {
        let mut line = String::new();
        for v in chunk {
            line.push_str(&format!("{:>vw$}", v, vw = value_width));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// A project file referencing one plan, one geometry, one steady flow, and
/// one unsteady flow file, in English units.
pub fn project_file() -> String {
    "Proj Title=Church House Gully\r\n\
Current Plan=p01\r\n\
Default Exp/Contr=0.3,0.1\r\n\
English Units\r\n\
Geom File=g01\r\n\
Flow File=f01\r\n\
Unsteady File=u01\r\n\
Plan File=p01\r\n\
BEGIN DESCRIPTION:\r\n\
Levee accreditation study.\r\n\
END DESCRIPTION:\r\n"
        .to_string()
}

/// A plan file pairing g01 with f01.
pub fn plan_file() -> String {
    "Plan Title=100yr Existing\r\n\
Short Identifier=100yrEx\r\n\
Program Version=5.07\r\n\
Geom File=g01\r\n\
Flow File=f01\r\n\
Subcritical Flow\r\n\
BEGIN DESCRIPTION:\r\n\
Baseline run.\r\n\
END DESCRIPTION:\r\n"
        .to_string()
}

/// A geometry file exercising every element the parsers handle: a river
/// with one cross-section and one bridge, a storage area, a 2D area, a
/// breakline, a connection, and a BC line.
///
/// Coordinates sit near the Texas South Central false origin so the
/// state-plane fixture CRS inverse-projects them to plausible ground.
pub fn geom_file() -> String {
    let x0 = 1_968_500.0;
    let y0 = 13_123_000.0;

    let reach_xy = pair_block(
        &[
            (x0, y0),
            (x0 + 50.0, y0 + 100.0),
            (x0 + 100.0, y0 + 200.0),
            (x0 + 150.0, y0 + 300.0),
        ],
        64,
        16,
    );
    let cutline = pair_block(&[(x0, y0), (x0 + 100.0, y0)], 64, 16);
    let sta_elev = series_block(&[0.0, 10.0, 50.0, 5.0, 100.0, 10.0], 80, 8);

    let deck_stations = series_block(&[0.0, 50.0, 100.0], 80, 8);
    let deck_high = series_block(&[25.0, 26.0, 27.0], 80, 8);
    let deck_low = series_block(&[18.0, 19.0, 20.0], 80, 8);

    let pond_ring = pair_block(
        &[
            (x0 + 200.0, y0),
            (x0 + 300.0, y0),
            (x0 + 300.0, y0 + 100.0),
            (x0 + 200.0, y0 + 100.0),
        ],
        32,
        16,
    );
    let mesh_ring = pair_block(
        &[
            (x0 + 400.0, y0),
            (x0 + 500.0, y0),
            (x0 + 450.0, y0 + 100.0),
        ],
        32,
        16,
    );
    let breakline = pair_block(&[(x0 + 410.0, y0 + 10.0), (x0 + 490.0, y0 + 10.0)], 64, 16);
    let connection_line = pair_block(&[(x0 + 300.0, y0 + 50.0), (x0 + 400.0, y0 + 50.0)], 64, 16);
    let bc_arc = pair_block(&[(x0 + 420.0, y0 + 90.0), (x0 + 480.0, y0 + 90.0)], 64, 16);

    format!(
        "Geom Title=Existing Conditions\r\n\
Program Version=5.07\r\n\
BEGIN GEOM DESCRIPTION:\r\n\
Fixture geometry.\r\n\
END GEOM DESCRIPTION:\r\n\
River Reach=Main, Reach1\r\n\
Reach XY= 4\r\n\
{reach_xy}\r\n\
Type RM Length L Ch R = 1 ,450     ,100,100,100\r\n\
XS GIS Cut Line= 2\r\n\
{cutline}\r\n\
#Sta/Elev= 3\r\n\
{sta_elev}\r\n\
Bank Sta=25,75\r\n\
Type RM Length L Ch R = 3 ,350,50,50,50\r\n\
Node Name=Main St Bridge\r\n\
Deck Dist, Width, WeirC, Skew, NumUp, NumDn, MinLoCord, MaxHiCord\r\n\
20,40,2.6,0,3,3,,\r\n\
{deck_stations}\r\n\
{deck_high}\r\n\
{deck_low}\r\n\
{deck_stations}\r\n\
{deck_high}\r\n\
{deck_low}\r\n\
Pier Skew=1\r\n\
BC Design\r\n\
Storage Area=Upper Pond ,1,2\r\n\
Storage Area Surface Line= 4\r\n\
{pond_ring}\r\n\
Storage Area Is2D= 0\r\n\
Storage Area=Mesh A ,3,4\r\n\
Storage Area Surface Line= 3\r\n\
{mesh_ring}\r\n\
Storage Area Is2D=-1\r\n\
Storage Area 2D Points= 5280\r\n\
2D Face Area Conveyance Ratio=1\r\n\
BreakLine Name=Levee Toe\r\n\
BreakLine Polyline= 2\r\n\
{breakline}\r\n\
Connection=Levee Breach ,1,2\r\n\
Connection Desc=Overflow link\r\n\
Connection Line= 2\r\n\
{connection_line}\r\n\
Connection Up SA=Upper Pond\r\n\
Connection Dn SA=Mesh A\r\n\
Conn Outlet Rating Curve= 0\r\n\
BC Line Name=Inflow North\r\n\
BC Line Storage Area=Mesh A\r\n\
BC Line Arc= 2\r\n\
{bc_arc}\r\n"
    )
}

/// A steady flow file with two profiles, one reach flow line, and boundary
/// conditions for profile 1.
pub fn steady_flow_file() -> String {
    let flows = series_block(&[100.0, 200.0], 80, 8);
    format!(
        "Flow Title=Design Events\r\n\
Program Version=5.07\r\n\
Number of Profiles= 2\r\n\
Profile Names=PF1,PF2\r\n\
River Rch & RM=Main,Reach1,500\r\n\
{flows}\r\n\
Boundary for River Rch & Prof#=Main,Reach1,1\r\n\
Up Type= 3\r\n\
Up Slope= 0.002\r\n\
Dn Type= 1\r\n\
Dn Known WS= 12.5\r\n"
    )
}

/// An unsteady flow file with a reach normal-depth BC and an area flow
/// hydrograph tied to a BC line.
pub fn unsteady_flow_file() -> String {
    let hydrograph = series_block(&[100.0, 150.0, 120.0], 80, 8);
    format!(
        "Flow Title=Storm Event\r\n\
Program Version=5.07\r\n\
Boundary Location=Main, Reach1,1000.0,,,,,\r\n\
Friction Slope= 0.005,0\r\n\
Boundary Location=,,,,,Mesh A,,Inflow North\r\n\
Interval=1HOUR\r\n\
Flow Hydrograph= 3\r\n\
{hydrograph}\r\n"
    )
}
