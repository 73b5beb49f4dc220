//! Forcing-data view: flow-file payloads regrouped by kind and keyed by
//! file basename.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ras_common::path as keypath;
use ras_parser::{FlowData, SteadyData, UnsteadyData};

use crate::model::RasModel;

/// Forcing data for a model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForcingData {
    #[serde(rename = "Steady", skip_serializing_if = "BTreeMap::is_empty", default)]
    pub steady: BTreeMap<String, SteadyData>,
    /// Quasi-steady decoding is not implemented; the marker preserves the
    /// file's presence.
    #[serde(
        rename = "QuasiUnsteady",
        skip_serializing_if = "BTreeMap::is_empty",
        default
    )]
    pub quasi_unsteady: BTreeMap<String, String>,
    #[serde(rename = "Unsteady", skip_serializing_if = "BTreeMap::is_empty", default)]
    pub unsteady: BTreeMap<String, UnsteadyData>,
}

/// Regroup a model's parsed flow files into the forcing view.
pub fn build_forcing_data(model: &RasModel) -> ForcingData {
    let mut fd = ForcingData::default();

    for flow in &model.metadata().flow_files {
        let name = keypath::base_name(&flow.path).to_string();
        match &flow.data {
            FlowData::Steady(sd) => {
                fd.steady.insert(name, sd.clone());
            }
            FlowData::Unsteady(ud) => {
                fd.unsteady.insert(name, ud.clone());
            }
            FlowData::QuasiUnsteady(_) => {
                fd.quasi_unsteady.insert(name, "Not Implemented".to_string());
            }
            FlowData::Unparsed => {}
        }
    }

    fd
}
