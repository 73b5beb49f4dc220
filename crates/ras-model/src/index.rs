//! The external-facing model index: files categorized into input, output,
//! and supplemental buckets with parsed contents keyed by basename.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ras_common::path as keypath;
use ras_parser::{FlowFile, GeomFile, PlanFile};

use crate::model::RasModel;

/// The consolidated, machine-readable model index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "Type")]
    pub model_type: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "DefinitionFile")]
    pub definition_file: String,
    #[serde(rename = "Files")]
    pub files: ModelFiles,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelFiles {
    #[serde(rename = "InputFiles")]
    pub input_files: InputFiles,
    #[serde(rename = "OutputFiles")]
    pub output_files: OutputFiles,
    #[serde(rename = "SupplementalFiles")]
    pub supplemental_files: SupplementalFiles,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputFiles {
    #[serde(rename = "ControlFiles")]
    pub control_files: ControlFiles,
    #[serde(rename = "ForcingFiles")]
    pub forcing_files: ForcingFiles,
    #[serde(rename = "GeometryFiles")]
    pub geometry_files: GeometryFiles,
}

/// Plans steer a run, so they are the control bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlFiles {
    #[serde(rename = "Paths")]
    pub paths: Vec<String>,
    #[serde(rename = "Data")]
    pub data: BTreeMap<String, PlanFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForcingFiles {
    #[serde(rename = "Paths")]
    pub paths: Vec<String>,
    #[serde(rename = "Data")]
    pub data: BTreeMap<String, FlowFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeometryFiles {
    #[serde(rename = "Paths")]
    pub paths: Vec<String>,
    #[serde(rename = "FeaturesProperties")]
    pub features_properties: BTreeMap<String, GeomFile>,
    #[serde(rename = "Georeference")]
    pub georeference: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputFiles {
    #[serde(rename = "Paths")]
    pub paths: Vec<String>,
    #[serde(rename = "RunFiles")]
    pub run_files: Vec<String>,
    #[serde(rename = "RunLogs")]
    pub run_logs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplementalFiles {
    #[serde(rename = "Paths")]
    pub paths: Vec<String>,
}

/// Build the model index from a parsed model.
pub fn build_index(model: &RasModel) -> Model {
    let metadata = model.metadata();
    let mut index = Model {
        model_type: model.model_type().to_string(),
        version: model.model_version().to_string(),
        definition_file: keypath::base_name(&metadata.proj_file_path).to_string(),
        ..Model::default()
    };
    index.files.input_files.geometry_files.georeference = metadata.projection.clone();

    for plan in &metadata.plan_files {
        let name = keypath::base_name(&plan.path).to_string();
        index
            .files
            .input_files
            .control_files
            .paths
            .push(plan.path.clone());
        index.files.input_files.control_files.data.insert(name, plan.clone());
    }
    for geom in &metadata.geom_files {
        let name = keypath::base_name(&geom.path).to_string();
        index
            .files
            .input_files
            .geometry_files
            .paths
            .push(geom.path.clone());
        index
            .files
            .input_files
            .geometry_files
            .features_properties
            .insert(name, geom.clone());
    }
    for flow in &metadata.flow_files {
        let name = keypath::base_name(&flow.path).to_string();
        index
            .files
            .input_files
            .forcing_files
            .paths
            .push(flow.path.clone());
        index.files.input_files.forcing_files.data.insert(name, flow.clone());
    }

    // Output and supplemental buckets stay empty; only input files carry
    // parsed contents.
    index
}
