//! Service configuration from CLI arguments and environment.

use clap::Parser;

use ras_common::RasResult;
use storage::{ModelStore, ObjectStorageConfig};

/// MCAT API server
#[derive(Parser, Debug, Clone)]
#[command(name = "mcat-api")]
#[command(about = "Metadata and geospatial extraction API for RAS models")]
pub struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:5600", env = "MCAT_LISTEN_ADDR")]
    pub listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Destination EPSG code for geospatial extraction
    #[arg(long, default_value_t = 4326, env = "MCAT_DESTINATION_CRS")]
    pub destination_crs: i32,

    /// Serve models from a local directory instead of object storage
    #[arg(long, env = "MCAT_LOCAL_ROOT")]
    pub local_root: Option<String>,

    /// S3/MinIO endpoint URL
    #[arg(long, default_value = "http://minio:9000", env = "MCAT_S3_ENDPOINT")]
    pub s3_endpoint: String,

    /// Bucket holding the model file sets
    #[arg(long, default_value = "model-library", env = "S3_BUCKET")]
    pub s3_bucket: String,

    /// Access key ID
    #[arg(long, default_value = "", env = "AWS_ACCESS_KEY_ID")]
    pub s3_access_key_id: String,

    /// Secret access key
    #[arg(long, default_value = "", env = "AWS_SECRET_ACCESS_KEY")]
    pub s3_secret_access_key: String,

    /// AWS region
    #[arg(long, default_value = "us-east-1", env = "AWS_DEFAULT_REGION")]
    pub s3_region: String,

    /// Allow plain-HTTP object storage (local MinIO)
    #[arg(long, default_value_t = true, env = "MCAT_S3_ALLOW_HTTP")]
    pub s3_allow_http: bool,
}

impl Args {
    /// Build the model store this service reads from.
    pub fn store(&self) -> RasResult<ModelStore> {
        match &self.local_root {
            Some(root) => ModelStore::local(root),
            None => ModelStore::s3(&ObjectStorageConfig {
                endpoint: self.s3_endpoint.clone(),
                bucket: self.s3_bucket.clone(),
                access_key_id: self.s3_access_key_id.clone(),
                secret_access_key: self.s3_secret_access_key.clone(),
                region: self.s3_region.clone(),
                allow_http: self.s3_allow_http,
            }),
        }
    }
}
