//! TMDB catalog client module.
//!
//! Maps typed accessors onto the fixed TMDB API v3 listing, search and
//! video endpoints, and builds image and trailer URLs.

mod api;
mod client;
mod endpoint;
mod types;
mod urls;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder};
pub use endpoint::Endpoint;
pub use types::{CatalogItem, ListingResponse, TvShowResult, Video, VideoListResponse};
pub use urls::{
    DEFAULT_BACKDROP_BASE_URL, DEFAULT_EMBED_BASE_URL, DEFAULT_PLACEHOLDER,
    DEFAULT_POSTER_BASE_URL, MediaUrls,
};
