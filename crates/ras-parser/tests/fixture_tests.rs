//! Parser tests over the shared fixture files.

use ras_parser::{
    extract_geometry, parse_flow, parse_geom, parse_plan, parse_project, FlowData, GeoData,
};
use test_utils::fixtures;

#[test]
fn test_project_fixture() {
    let project = parse_project(&fixtures::project_file());
    assert_eq!(project.proj_title, "Church House Gully");
    assert_eq!(project.units, "English Units");
    assert_eq!(project.geom_files, vec!["g01"]);
    assert_eq!(project.flow_files, vec!["f01"]);
    assert_eq!(project.unsteady_files, vec!["u01"]);
    assert_eq!(project.plan_files, vec!["p01"]);
    assert_eq!(project.description, "Levee accreditation study.");
}

#[test]
fn test_plan_fixture() {
    let plan = parse_plan(&fixtures::plan_file(), "models/case/case.p01");
    assert_eq!(plan.plan_title, "100yr Existing");
    assert_eq!(plan.program_version, "5.07");
    assert_eq!(plan.flow_regime, "Subcritical Flow");
}

#[test]
fn test_geom_fixture_metadata() {
    let geom = parse_geom(fixtures::geom_file().as_bytes(), "models/case/case.g01");
    assert_eq!(geom.geom_title, "Existing Conditions");
    assert_eq!(geom.program_version, "5.07");
    assert_eq!(geom.description, "Fixture geometry.");

    assert_eq!(geom.structures.len(), 1);
    let structures = &geom.structures[0];
    assert_eq!(structures.river, "Main");
    assert_eq!(structures.reach, "Reach1");
    assert_eq!(structures.num_xs, 1);
    assert_eq!(structures.bridge_data.num_bridges, 1);

    let bridge = &structures.bridge_data.bridges[0];
    assert_eq!(bridge.name, "Main St Bridge");
    assert_eq!(bridge.station, 350.0);
    assert_eq!(bridge.deck_width, 20.0);
    assert_eq!(bridge.up_high_chord.max, 27.0);
    assert_eq!(bridge.up_low_chord.min, 18.0);
    assert_eq!(bridge.num_piers, 1);

    assert_eq!(geom.storage_areas["Upper Pond"].num_bc_lines, 0);
    assert_eq!(geom.two_d_areas["Mesh A"].num_cells, 5280);
    assert_eq!(geom.two_d_areas["Mesh A"].num_bc_lines, 1);
    assert_eq!(geom.connections["Levee Breach"].description, "Overflow link");
    assert_eq!(geom.connections["Levee Breach"].dn_sa, "Mesh A");
}

#[test]
fn test_steady_fixture() {
    let flow = parse_flow(fixtures::steady_flow_file().as_bytes(), "case.f01").unwrap();
    let FlowData::Steady(sd) = &flow.data else {
        panic!("expected steady data");
    };
    assert_eq!(sd.flow_title, "Design Events");
    assert_eq!(sd.profiles.len(), 2);
    assert_eq!(sd.profiles[1].flows["Main - Reach1"][0].flow, 200.0);

    let bcs = &sd.profiles[0].boundary_conditions["Main - Reach1"];
    assert_eq!(bcs.up.bc_type, "Normal Depth");
    assert_eq!(bcs.dn.bc_type, "Known WS");
}

#[test]
fn test_unsteady_fixture() {
    let flow = parse_flow(fixtures::unsteady_flow_file().as_bytes(), "case.u01").unwrap();
    let FlowData::Unsteady(ud) = &flow.data else {
        panic!("expected unsteady data");
    };
    assert_eq!(ud.flow_title, "Storm Event");
    assert_eq!(ud.boundary_conditions.reaches["Main - Reach1"].len(), 1);

    let area_bc = &ud.boundary_conditions.areas["Mesh A"][0];
    assert_eq!(area_bc.bc_line, "Inflow North");
    assert_eq!(area_bc.bc_type, "Flow Hydrograph");
}

#[test]
fn test_geospatial_fixture_extraction() {
    let mut gd = GeoData {
        georeference: 4326,
        ..GeoData::default()
    };
    extract_geometry(
        &mut gd,
        "case.g01",
        &fixtures::geom_file(),
        fixtures::wkt::TX_SOUTH_CENTRAL,
        4326,
    )
    .unwrap();

    let features = &gd.features["case.g01"];
    assert_eq!(features.rivers.len(), 1);
    assert_eq!(features.xs.len(), 1);
    assert_eq!(features.banks.len(), 2);
    assert_eq!(features.storage_areas.len(), 1);
    assert_eq!(features.two_d_areas.len(), 1);
    assert_eq!(features.break_lines.len(), 1);
    assert_eq!(features.connections.len(), 1);
    assert_eq!(features.bc_lines.len(), 1);
}

#[test]
fn test_model_json_round_trip() {
    let geom = parse_geom(fixtures::geom_file().as_bytes(), "models/case/case.g01");
    let json = serde_json::to_string(&geom).unwrap();
    let reparsed: ras_parser::GeomFile = serde_json::from_str(&json).unwrap();
    assert_eq!(json, serde_json::to_string(&reparsed).unwrap());

    let flow = parse_flow(fixtures::unsteady_flow_file().as_bytes(), "case.u01").unwrap();
    let json = serde_json::to_string(&flow).unwrap();
    let reparsed: ras_parser::FlowFile = serde_json::from_str(&json).unwrap();
    assert_eq!(json, serde_json::to_string(&reparsed).unwrap());
}
