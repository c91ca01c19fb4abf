//! Debug script to inspect what the downloader sees for one video
//!
//! Run with: cargo run --example debug_video -p cda-core -- <video-url>

use std::sync::Arc;

use cda_core::{CdaClient, Resolution, Video};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.cda.pl/video/1234567a".to_string());

    let client = Arc::new(CdaClient::new()?);
    let video = Video::new(&url, ".", Resolution::Best, client)?;

    println!("Video ID: {}", video.video_id());
    println!("Target:   {}\n", video.target_path().display());

    let available = video.list_resolutions().await?;
    println!("Available resolutions:");
    for res in &available {
        println!("  - {}", res);
    }

    let selected = video.select_resolution(&available)?;
    println!("\nSelected: {}", selected.as_deref().unwrap_or("default"));

    let source = video.fetch_source_url(selected.as_deref()).await?;
    println!("Source URL:\n{}", source);

    Ok(())
}
