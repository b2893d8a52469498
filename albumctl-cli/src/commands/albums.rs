//! Single-operation commands: init, add, get, list
//!
//! Each one waits for the database first, then runs one gateway call.

use albumctl_core::{Album, AlbumStore};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use super::Session;

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Album title
    #[arg(long)]
    pub title: String,

    /// Artist name
    #[arg(long)]
    pub artist: String,

    /// Score from 0 to 10 (checked by the database)
    #[arg(long, allow_negative_numbers = true)]
    pub score: f64,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Exact title to match
    pub title: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Exact artist name to match
    #[arg(long)]
    pub artist: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_init(session: &Session) -> Result<()> {
    session.wait().await?;
    session.gateway.ensure_schema().await?;
    info!("albums table ready");
    Ok(())
}

pub async fn run_add(session: &Session, args: AddArgs) -> Result<()> {
    session.wait().await?;
    let album = Album::new(args.title, args.artist, args.score);
    session.gateway.insert(&album).await?;
    info!(title = %album.title, artist = %album.artist, "inserted album");
    Ok(())
}

pub async fn run_get(session: &Session, args: GetArgs) -> Result<()> {
    session.wait().await?;
    let album = lookup_album(&session.gateway, &args.title).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&album)?);
    } else {
        println!("{}", format_album(&album));
    }
    Ok(())
}

pub async fn run_list(session: &Session, args: ListArgs) -> Result<()> {
    session.wait().await?;
    let albums = list_albums(&session.gateway, &args.artist).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&albums)?);
        return Ok(());
    }

    if albums.is_empty() {
        println!("No albums by {}", args.artist);
    }
    for album in &albums {
        println!("{}", format_album(album));
    }
    Ok(())
}

async fn lookup_album<S: AlbumStore + ?Sized>(store: &S, title: &str) -> Result<Album> {
    store
        .find_one(title)
        .await
        .with_context(|| format!("failed to look up album {:?}", title))
}

async fn list_albums<S: AlbumStore + ?Sized>(store: &S, artist: &str) -> Result<Vec<Album>> {
    store
        .find_many(artist)
        .await
        .with_context(|| format!("failed to list albums by {:?}", artist))
}

pub(crate) fn format_album(album: &Album) -> String {
    let id = album
        .id
        .map(|id| format!("#{} ", id))
        .unwrap_or_default();
    format!("{}{} - {} ({}/10)", id, album.title, album.artist, album.score)
}

#[cfg(test)]
mod tests {
    use super::*;

    use albumctl_core::PgGateway;

    async fn closed_gateway() -> PgGateway {
        let gateway = PgGateway::connect("postgres://user:pw@127.0.0.1:1/albums").unwrap();
        gateway.close().await;
        gateway
    }

    #[tokio::test]
    async fn lookup_failure_names_title() {
        let gateway = closed_gateway().await;

        let err = lookup_album(&gateway, "Grace").await.unwrap_err();

        assert_eq!(err.to_string(), "failed to look up album \"Grace\"");
        assert!(format!("{err:#}").contains("Failed to read albums for title"));
    }

    #[tokio::test]
    async fn list_failure_names_artist() {
        let gateway = closed_gateway().await;

        let err = list_albums(&gateway, "Radiohead").await.unwrap_err();

        assert_eq!(err.to_string(), "failed to list albums by \"Radiohead\"");
    }

    #[test]
    fn format_album_with_and_without_id() {
        let mut album = Album::new("Grace", "Jeff Buckley", 9.0);
        assert_eq!(format_album(&album), "Grace - Jeff Buckley (9/10)");

        album.id = Some(4);
        assert_eq!(format_album(&album), "#4 Grace - Jeff Buckley (9/10)");
    }
}
