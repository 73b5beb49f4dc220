//! MCAT API Server
//!
//! HTTP front-end for RAS model metadata and geospatial extraction.

mod config;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::{routing::get, Router};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use config::Args;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(filter).with_target(true).init();

    info!("Starting MCAT API server");

    let state = AppState {
        store: args.store()?,
        destination_crs: args.destination_crs,
    };

    let app = Router::new()
        .route("/ping", get(handlers::ping::ping_handler))
        .route("/isamodel", get(handlers::classification::is_a_model_handler))
        .route(
            "/isgeospatial",
            get(handlers::classification::is_geospatial_handler),
        )
        .route("/modeltype", get(handlers::classification::model_type_handler))
        .route(
            "/modelversion",
            get(handlers::classification::model_version_handler),
        )
        .route("/index", get(handlers::classification::index_handler))
        .route(
            "/geospatialdata",
            get(handlers::geospatial::geospatial_data_handler),
        )
        .route("/forcingdata", get(handlers::forcing::forcing_data_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = args.listen.parse()?;
    info!("MCAT API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
