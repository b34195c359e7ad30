//! Classification server binary.
//!
use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use clap::Parser;
use env_logger::TimestampPrecision;

use classify_server::{
    endpoints::{classify_upload, healthcheck, index, uploaded_file, ServerContext},
    meter::spawn_meter_logger,
    nn::TumorClassModel,
};

/// Upper bound on the multipart request body.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Parser, Debug)]
#[clap(author, version)]
struct Args {
    /// Address to serve the web UI on
    #[clap(long, default_value = "127.0.0.1:3000")]
    server_address: String,

    /// Path of the ONNX classifier model
    #[clap(long, default_value = "brain_tumor_cnn.onnx")]
    model: PathBuf,

    /// Directory where uploaded scans are stored
    #[clap(long, default_value = "static/uploads")]
    upload_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logger
    env_logger::builder()
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    // A missing or unreadable model is fatal
    let model = TumorClassModel::load(&args.model)?;

    std::fs::create_dir_all(&args.upload_dir)
        .with_context(|| format!("creating upload directory {}", args.upload_dir.display()))?;

    let ctx = Arc::new(ServerContext {
        model: Box::new(model),
        upload_dir: args.upload_dir,
    });

    spawn_meter_logger();

    // Build HTTP server with endpoints
    let app = Router::new()
        .route("/", get(index).post(classify_upload))
        .route("/healthcheck", get(healthcheck))
        .route("/static/uploads/:filename", get(uploaded_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(Extension(ctx));

    // Serve HTTP server
    let addr: SocketAddr = args.server_address.parse()?;
    log::info!("Serving on http://{}", &addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
