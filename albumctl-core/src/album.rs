use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Album record. `id` stays `None` until the database assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Album {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub artist: String,
    /// Expected in [0, 10]; the table's CHECK constraint enforces it.
    pub score: f64,
}

impl Album {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, score: f64) -> Self {
        Self {
            id: None,
            title: title.into(),
            artist: artist.into(),
            score,
        }
    }
}

/// Albums inserted by the walkthrough.
pub fn sample_albums() -> Vec<Album> {
    vec![
        Album::new("Grace", "Jeff Buckley", 9.0),
        Album::new("In Rainbows", "Radiohead", 9.5),
        Album::new("OK Computer", "Radiohead", 10.0),
        Album::new("Kid A", "Radiohead", 8.5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_album_has_no_id() {
        let album = Album::new("Grace", "Jeff Buckley", 9.0);
        assert_eq!(album.id, None);
        assert_eq!(album.title, "Grace");
    }

    #[test]
    fn test_unsaved_album_serializes_without_id() {
        let json = serde_json::to_value(Album::new("Grace", "Jeff Buckley", 9.0)).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["artist"], "Jeff Buckley");
    }

    #[test]
    fn test_samples_within_score_range() {
        assert!(sample_albums()
            .iter()
            .all(|a| (0.0..=10.0).contains(&a.score)));
    }
}
