//! `CatalogApi` trait definition.
//!
//! Each operation follows one of two error strategies:
//!
//! - **Propagate**: transport errors, non-success statuses and undecodable
//!   bodies are returned to the caller as an error.
//! - **Recover**: failures are logged and reported as an absent value.
//!
//! "Not found" is never an error: it is an empty `Vec` or `None`.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{CatalogItem, Video};

/// TMDB catalog API trait.
///
/// Abstracts catalog reads for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Fetches the popular movies listing.
    ///
    /// Strategy: Propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn fetch_popular(&self) -> Result<Vec<CatalogItem>>;

    /// Fetches movies currently in theaters.
    ///
    /// Strategy: Propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn fetch_now_playing(&self) -> Result<Vec<CatalogItem>>;

    /// Fetches the top rated movies listing.
    ///
    /// Strategy: Propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn fetch_top_rated(&self) -> Result<Vec<CatalogItem>>;

    /// Fetches popular TV shows, with `name` mapped to `title` and
    /// `first_air_date` mapped to `release_date`.
    ///
    /// Strategy: Propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn fetch_popular_tv(&self) -> Result<Vec<CatalogItem>>;

    /// Returns the first popular movie, or `None` when the listing is empty.
    ///
    /// Strategy: Propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn fetch_featured(&self) -> Result<Option<CatalogItem>>;

    /// Returns the first YouTube trailer of a movie.
    ///
    /// Strategy: Recover. Returns `None` when no entry matches or the
    /// request fails.
    async fn fetch_trailer(&self, item_id: u64) -> Option<Video>;

    /// Searches movies by title.
    ///
    /// A blank query returns an empty list without issuing a request.
    ///
    /// Strategy: Propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>>;

    /// Discovers movies by genre ID.
    ///
    /// Strategy: Propagate.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn fetch_by_genre(&self, genre_id: u32) -> Result<Vec<CatalogItem>>;
}
