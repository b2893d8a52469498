//! Demo command - the full walkthrough against a live database

use albumctl_core::{sample_albums, Walkthrough};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use super::albums::format_album;
use super::Session;

#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Title to look up after inserting the sample albums
    #[arg(long, default_value = "Grace")]
    pub title: String,

    /// Artist to list after inserting the sample albums
    #[arg(long, default_value = "Radiohead")]
    pub artist: String,

    /// Print the step report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_demo(session: &Session, args: DemoArgs) -> Result<()> {
    let walkthrough = Walkthrough {
        retry_interval: session.retry_interval,
        albums: sample_albums(),
        title: args.title,
        artist: args.artist,
    };

    let report = walkthrough
        .run_until(&session.gateway, session.cancelled())
        .await
        .context("database did not become reachable")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &report.found {
        Some(album) => println!("Found: {}", format_album(album)),
        None => println!("Found: no album titled {:?}", walkthrough.title),
    }
    println!("By {} ({}):", walkthrough.artist, report.by_artist.len());
    for album in &report.by_artist {
        println!("  {}", format_album(album));
    }

    if !report.errors.is_empty() {
        warn!(count = report.errors.len(), "walkthrough finished with errors");
    }
    Ok(())
}
