// src/artwork.rs
use serde::{Deserialize, Serialize};

/// Column titles of the table, in render order (checkbox column excluded).
pub const COLUMN_HEADERS: [&str; 6] = [
    "Title",
    "Place of Origin",
    "Artist",
    "Inscriptions",
    "Date Start",
    "Date End",
];

/// One artwork row as the table and the selection core see it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub id: u64,
    pub title: String,
    pub place_of_origin: Option<String>,
    pub artist_display: Option<String>,
    pub inscriptions: Option<String>,
    pub date_start: Option<i32>,
    pub date_end: Option<i32>,
}

impl Artwork {
    /// Display cells in `COLUMN_HEADERS` order; absent values become "".
    pub fn columns(&self) -> [String; 6] {
        [
            self.title.clone(),
            self.place_of_origin.clone().unwrap_or_default(),
            self.artist_display.clone().unwrap_or_default(),
            self.inscriptions.clone().unwrap_or_default(),
            self.date_start.map(|y| y.to_string()).unwrap_or_default(),
            self.date_end.map(|y| y.to_string()).unwrap_or_default(),
        ]
    }
}

/*──────────────────────── wire schema ────────────────────────*/

/// Fields requested from the listing endpoint (`fields=` query parameter).
pub const API_FIELDS: &str =
    "id,title,place_of_origin,artist_display,inscriptions,date_start,date_end";

/// Raw record as returned by the listing endpoint. Every field except the id may be null.
#[derive(Deserialize, Debug, Clone)]
pub struct ApiArtwork {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default)]
    pub artist_display: Option<String>,
    #[serde(default)]
    pub inscriptions: Option<String>,
    #[serde(default)]
    pub date_start: Option<i32>,
    #[serde(default)]
    pub date_end: Option<i32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiPagination {
    pub total: u64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
}

/// Top-level listing payload: `{ "pagination": {...}, "data": [...] }`.
#[derive(Deserialize, Debug, Clone)]
pub struct ApiListing {
    pub pagination: ApiPagination,
    pub data: Vec<ApiArtwork>,
}

impl From<ApiArtwork> for Artwork {
    fn from(raw: ApiArtwork) -> Self {
        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            place_of_origin: raw.place_of_origin,
            artist_display: raw.artist_display,
            inscriptions: raw.inscriptions,
            date_start: raw.date_start,
            date_end: raw.date_end,
        }
    }
}
