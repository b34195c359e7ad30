//! CLI client uploading one MRI scan to the classification server.
//!
use std::path::PathBuf;

use clap::Parser;
use common::Error;
use env_logger::TimestampPrecision;
use reqwest::multipart;

#[derive(Parser, Debug)]
#[clap(author, version)]
struct Args {
    /// Address of the classification server to connect to
    #[clap(long, default_value = "127.0.0.1:3000")]
    address: String,

    /// Path of the image to upload
    image: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    env_logger::builder()
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    log::info!("Uploading {} to {}", args.image.display(), &args.address);

    let file_name = args
        .image
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("scan.png")
        .to_owned();
    let data = tokio::fs::read(&args.image).await?;

    let part = multipart::Part::bytes(data).file_name(file_name);
    let form = multipart::Form::new().part("file", part);

    let response = reqwest::Client::new()
        .post(&format!("http://{}/", &args.address))
        .multipart(form)
        .send()
        .await?;

    log::info!("Server answered with status {}", response.status());
    println!("{}", response.text().await?);

    Ok(())
}
