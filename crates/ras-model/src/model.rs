//! Project driver: discovers the file set, fans out per-file parsers, and
//! merges the results into one model record.

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use ras_common::{check_unit_consistency, path as keypath, RasError, RasResult};
use ras_geo::SpatialRef;
use ras_parser::{
    extract_geometry, parse_flow, parse_geom, parse_plan, parse_project, FlowFile, GeoData,
    GeomFile, PlanFile, ProjectFile,
};
use storage::ModelStore;

use crate::classify::{classify, FileKind};

/// Metadata scraped from the project file and every companion it lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    #[serde(rename = "ProjFilePath")]
    pub proj_file_path: String,
    #[serde(rename = "Project Data")]
    pub proj_file_contents: ProjectFile,
    #[serde(rename = "Plan Data")]
    pub plan_files: Vec<PlanFile>,
    #[serde(rename = "Flow Data")]
    pub flow_files: Vec<FlowFile>,
    #[serde(rename = "Geometry Data")]
    pub geom_files: Vec<GeomFile>,
    #[serde(rename = "Projection")]
    pub projection: String,
    #[serde(rename = "Notes", default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// A RAS model: the project key, its companion files, and their parsed
/// contents. Built fresh per invocation; nothing is mutated afterwards.
#[derive(Debug, Clone)]
pub struct RasModel {
    version: String,
    store: ModelStore,
    model_directory: String,
    file_list: Vec<String>,
    metadata: ProjectMetadata,
}

/// The family tag for every model this crate builds.
pub const MODEL_TYPE: &str = "RAS";

enum TaskOutput {
    Plan(PlanFile),
    Geom(GeomFile),
    Flow(FlowFile),
    Projection(Option<String>),
}

/// Check that the key is a .prj file whose first line carries `Proj Title=`.
async fn verify_project_path(key: &str, store: &ModelStore) -> RasResult<()> {
    if keypath::extension(key) != ".prj" {
        return Err(RasError::NotAProject(key.to_string()));
    }
    let first_line = store.first_line(key).await?;
    if !first_line.contains("Proj Title=") {
        return Err(RasError::NotAProject(key.to_string()));
    }
    Ok(())
}

/// List the companions of a project key: files sharing its base stem, plus
/// any sibling .prj that could hold a projection.
async fn model_files(key: &str, store: &ModelStore) -> RasResult<Vec<String>> {
    let prefix = keypath::parent(key);
    let stem_dot = format!("{}.", keypath::strip_extension(key));

    let entries = store.list_dir(prefix).await?;
    Ok(entries
        .into_iter()
        .map(|e| e.path)
        .filter(|path| path.starts_with(&stem_dot) || keypath::extension(path) == ".prj")
        .collect())
}

async fn load_plan(store: ModelStore, path: String) -> PlanFile {
    match store.get_text(&path).await {
        Ok(text) => parse_plan(&text, &path),
        Err(err) => {
            warn!(%err, path = %path, "plan file failed to process");
            let mut stub = PlanFile::stub(&path);
            stub.notes = format!("{} failed to process.", keypath::base_name(&path));
            stub
        }
    }
}

async fn load_geom(store: ModelStore, path: String) -> GeomFile {
    match store.get(&path).await {
        Ok(bytes) => parse_geom(&bytes, &path),
        Err(err) => {
            warn!(%err, path = %path, "geometry file failed to process");
            let mut stub = GeomFile::stub(&path);
            stub.notes = format!("{} failed to process.", keypath::base_name(&path));
            stub
        }
    }
}

async fn load_flow(store: ModelStore, path: String) -> FlowFile {
    let parsed = match store.get(&path).await {
        Ok(bytes) => parse_flow(&bytes, &path),
        Err(err) => Err(err),
    };
    match parsed {
        Ok(flow) => flow,
        Err(err) => {
            warn!(%err, path = %path, "flow file failed to process");
            let mut stub = FlowFile::stub(&path);
            stub.notes = format!("{} failed to process.", keypath::base_name(&path));
            stub
        }
    }
}

/// Try projection candidates in preference order; the first valid WKT wins.
async fn load_projection(store: ModelStore, candidates: Vec<String>) -> Option<String> {
    for candidate in candidates {
        let line = match store.first_line(&candidate).await {
            Ok(line) => line,
            Err(err) => {
                debug!(%err, path = %candidate, "projection candidate unreadable");
                continue;
            }
        };

        match SpatialRef::from_wkt(&line).and_then(|sp| sp.validate().map(|_| sp)) {
            Ok(_) => {
                info!(path = %candidate, "found valid projection");
                return Some(line);
            }
            Err(err) => {
                warn!(%err, path = %candidate, "not a valid projection file");
            }
        }
    }
    None
}

impl RasModel {
    /// Build a model from a project key: verify it, list its companions,
    /// parse everything in parallel, and merge.
    pub async fn new(key: &str, store: ModelStore) -> RasResult<Self> {
        verify_project_path(key, &store).await?;

        let mut model = RasModel {
            version: String::new(),
            model_directory: keypath::parent(key).to_string(),
            file_list: model_files(key, &store).await?,
            metadata: ProjectMetadata {
                proj_file_path: key.to_string(),
                ..ProjectMetadata::default()
            },
            store,
        };

        let project_text = model.store.get_text(key).await?;
        model.metadata.proj_file_contents = parse_project(&project_text);

        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();

        // The sidecar is preferred; any other sibling .prj/.proj that
        // validates is a fallback, never the project file itself.
        let sidecar = format!("{}.projection", keypath::strip_extension(key));
        let mut projection_candidates = vec![sidecar.clone()];
        for path in &model.file_list {
            if path == key || *path == sidecar {
                continue;
            }
            match classify(keypath::extension(path)) {
                Some(FileKind::Projection) | Some(FileKind::Project) => {
                    projection_candidates.push(path.clone());
                }
                _ => {}
            }
        }
        {
            let store = model.store.clone();
            tasks.spawn(async move {
                TaskOutput::Projection(load_projection(store, projection_candidates).await)
            });
        }

        for path in &model.file_list {
            let kind = match classify(keypath::extension(path)) {
                Some(kind) => kind,
                None => continue,
            };
            let store = model.store.clone();
            let path = path.clone();

            match kind {
                FileKind::Plan(_) => {
                    tasks.spawn(async move { TaskOutput::Plan(load_plan(store, path).await) });
                }
                FileKind::Geometry(_) => {
                    tasks.spawn(async move { TaskOutput::Geom(load_geom(store, path).await) });
                }
                kind if kind.is_flow() => {
                    tasks.spawn(async move { TaskOutput::Flow(load_flow(store, path).await) });
                }
                _ => {}
            }
        }

        while let Some(joined) = tasks.join_next().await {
            let output = joined.map_err(|e| RasError::Internal(e.to_string()))?;
            match output {
                TaskOutput::Plan(plan) => model.metadata.plan_files.push(plan),
                TaskOutput::Geom(geom) => model.metadata.geom_files.push(geom),
                TaskOutput::Flow(flow) => model.metadata.flow_files.push(flow),
                TaskOutput::Projection(Some(wkt)) => {
                    if model.metadata.projection.is_empty() {
                        model.metadata.projection = wkt;
                    } else {
                        warn!("projection already exists for the model, discarding another");
                    }
                }
                TaskOutput::Projection(None) => {}
            }
        }

        // Joining happens in completion order; sort for stable output and a
        // deterministic version string.
        model.metadata.plan_files.sort_by(|a, b| a.file_ext.cmp(&b.file_ext));
        model.metadata.geom_files.sort_by(|a, b| a.file_ext.cmp(&b.file_ext));
        model.metadata.flow_files.sort_by(|a, b| a.file_ext.cmp(&b.file_ext));

        model.version = model.build_version();
        Ok(model)
    }

    fn build_version(&self) -> String {
        let mut entries: Vec<String> = Vec::new();
        for p in &self.metadata.plan_files {
            if !p.program_version.is_empty() {
                entries.push(format!("{}: {}", p.file_ext, p.program_version));
            }
        }
        for g in &self.metadata.geom_files {
            if !g.program_version.is_empty() {
                entries.push(format!("{}: {}", g.file_ext, g.program_version));
            }
        }
        for f in &self.metadata.flow_files {
            let version = f.program_version();
            if !version.is_empty() {
                entries.push(format!("{}: {}", f.file_ext, version));
            }
        }
        entries.join(", ")
    }

    /// A key is a model when it verified as a project and at least one
    /// geometry file was identified.
    pub fn is_a_model(&self) -> bool {
        if self.metadata.geom_files.is_empty() {
            info!("no geometry files identified");
            return false;
        }
        true
    }

    /// The static family tag.
    pub fn model_type(&self) -> &'static str {
        MODEL_TYPE
    }

    /// The concatenated per-file version string.
    pub fn model_version(&self) -> &str {
        &self.version
    }

    /// A model is geospatial when a valid CRS was found and every geometry
    /// file's program version is at least 4.
    pub fn is_geospatial(&self) -> bool {
        if self.metadata.projection.is_empty() {
            info!("no valid coordinate reference system");
            return false;
        }
        for entry in self.version.split(',') {
            if !entry.contains(".g") {
                continue;
            }
            let Some((_, version_text)) = entry.split_once(':') else {
                continue;
            };
            let Ok(version) = version_text.trim().parse::<f64>() else {
                info!("could not convert the geometry version to a float");
                return false;
            };
            if version < 4.0 {
                info!(version, "geometry file version is not geospatial");
                return false;
            }
        }
        true
    }

    /// Build vector features for every geometry file, transformed into the
    /// destination CRS.
    pub async fn geospatial_data(&self, dest_epsg: i32) -> RasResult<GeoData> {
        if !self.is_geospatial() {
            return Err(RasError::NotGeospatial(self.metadata.proj_file_path.clone()));
        }

        let source_crs = &self.metadata.projection;
        let spatial_ref =
            SpatialRef::from_wkt(source_crs).map_err(|e| RasError::projection(e.to_string()))?;
        let crs_units = spatial_ref.unit_name().unwrap_or("").to_string();
        check_unit_consistency(&self.metadata.proj_file_contents.units, &crs_units)?;

        let mut gd = GeoData {
            georeference: dest_epsg,
            ..GeoData::default()
        };

        for geom in &self.metadata.geom_files {
            let text = self.store.get_text(&geom.path).await?;
            extract_geometry(
                &mut gd,
                keypath::base_name(&geom.path),
                &text,
                source_crs,
                dest_epsg,
            )?;
        }
        Ok(gd)
    }

    /// The directory prefix the model lives under.
    pub fn model_directory(&self) -> &str {
        &self.model_directory
    }

    /// Every companion key the driver discovered.
    pub fn file_list(&self) -> &[String] {
        &self.file_list
    }

    /// Parsed metadata for the project and all companions.
    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }
}
