//! TMDB catalog response types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Video type that marks an entry as a trailer.
const TRAILER_TYPE: &str = "Trailer";

/// Hosting site of playable trailers.
const TRAILER_SITE: &str = "YouTube";

/// Treats an explicit JSON `null` the same as a missing field.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Listings ---

/// Paged listing response shared by the movie, TV, search and discover endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse<T> {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Listing results.
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A movie or TV show record as shown in the browsing rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// TMDB ID. Unique within one listing only.
    pub id: u64,
    /// Display title.
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    /// Synopsis.
    #[serde(default, deserialize_with = "null_to_default")]
    pub overview: String,
    /// Poster image path fragment (e.g. `/abc.jpg`).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path fragment.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Release date (`YYYY-MM-DD`, may be empty).
    #[serde(default, deserialize_with = "null_to_default")]
    pub release_date: String,
    /// Average rating (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl CatalogItem {
    /// Returns the release year, or `None` if the release date does not parse.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }

    /// Formats the average rating with one decimal place.
    #[must_use]
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}

/// A single result from `tv/popular`.
///
/// TV shows carry `name` and `first_air_date` where movies carry `title`
/// and `release_date`; `From<TvShowResult> for CatalogItem` maps between them.
#[derive(Debug, Clone, Deserialize)]
pub struct TvShowResult {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    /// Overview text.
    #[serde(default, deserialize_with = "null_to_default")]
    pub overview: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// First air date.
    #[serde(default, deserialize_with = "null_to_default")]
    pub first_air_date: String,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl From<TvShowResult> for CatalogItem {
    fn from(show: TvShowResult) -> Self {
        Self {
            id: show.id,
            title: show.name,
            overview: show.overview,
            poster_path: show.poster_path,
            backdrop_path: show.backdrop_path,
            release_date: show.first_air_date,
            vote_average: show.vote_average,
            genre_ids: show.genre_ids,
        }
    }
}

// --- Videos ---

/// Response from `movie/{id}/videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    /// Movie ID the videos belong to.
    #[serde(default)]
    pub id: u64,
    /// Videos in upstream order.
    pub results: Vec<Video>,
}

/// A video entry (trailer, teaser, clip, ...) hosted on an external platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Platform video ID.
    #[serde(default, deserialize_with = "null_to_default")]
    pub key: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    /// Type tag (e.g. "Trailer", "Teaser", "Clip").
    #[serde(rename = "type", default, deserialize_with = "null_to_default")]
    pub video_type: String,
    /// Hosting site tag (e.g. "YouTube").
    #[serde(default, deserialize_with = "null_to_default")]
    pub site: String,
}

impl Video {
    /// Whether this entry is a trailer playable on YouTube.
    #[must_use]
    pub fn is_youtube_trailer(&self) -> bool {
        !self.key.is_empty() && self.video_type == TRAILER_TYPE && self.site == TRAILER_SITE
    }
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}
