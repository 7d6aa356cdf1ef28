//! `CatalogClient` - TMDB catalog client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::endpoint::Endpoint;
use super::types::{
    CatalogItem, ListingResponse, TmdbErrorResponse, TvShowResult, Video, VideoListResponse,
};
use super::urls::MediaUrls;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Placeholder logged in place of the API key.
const REDACTED: &str = "REDACTED";

/// TMDB catalog client.
///
/// Stateless: every call issues exactly one request (or none, for a blank
/// search) and returns freshly decoded values.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests (always ends in `/`).
    base_url: Url,
    /// API key sent as the `api_key` query parameter.
    api_key: String,
    /// Response language sent with every request, if set.
    language: Option<String>,
    /// Image and embed URL prefixes.
    urls: MediaUrls,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    urls: Option<MediaUrls>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            language: None,
            urls: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (e.g. "pt-BR"). Upstream default when unset.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Overrides the image and embed URL prefixes.
    #[must_use]
    pub fn media_urls(mut self, urls: MediaUrls) -> Self {
        self.urls = Some(urls);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key is required");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let mut base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        // `Url::join` replaces the last segment unless the path ends in `/`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
            api_key,
            language: self.language,
            urls: self.urls.unwrap_or_default(),
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Returns the image and embed URL prefixes.
    #[must_use]
    pub const fn urls(&self) -> &MediaUrls {
        &self.urls
    }

    /// Builds a poster URL, or the placeholder for an empty/absent path.
    #[must_use]
    pub fn poster_url(&self, path: Option<&str>) -> String {
        self.urls.poster_url(path)
    }

    /// Builds a backdrop URL, or the placeholder for an empty/absent path.
    #[must_use]
    pub fn backdrop_url(&self, path: Option<&str>) -> String {
        self.urls.backdrop_url(path)
    }

    /// Builds the embed URL for a trailer key.
    #[must_use]
    pub fn trailer_embed_url(&self, key: &str) -> String {
        self.urls.trailer_embed_url(key)
    }

    /// Sends a GET request with the API key (and language) appended to `params`.
    #[instrument(skip_all)]
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<T> {
        let path = endpoint.path();
        let url = self
            .base_url
            .join(&path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut query: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        if let Some(ref language) = self.language {
            query.push(("language", language.as_str()));
        }
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let request = self
            .http_client
            .get(url)
            .query(&query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;
        tracing::debug!(url = %redact_api_key(request.url()), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {path}"))
    }

    /// Fetches a listing endpoint and returns its `results` array.
    async fn get_results<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response: ListingResponse<T> = self.get_json(endpoint, params).await?;
        Ok(response.results)
    }

    /// Finds the first YouTube trailer, propagating request failures.
    async fn find_trailer(&self, item_id: u64) -> Result<Option<Video>> {
        let response: VideoListResponse =
            self.get_json(Endpoint::MovieVideos(item_id), &[]).await?;
        Ok(response
            .results
            .into_iter()
            .find(Video::is_youtube_trailer))
    }
}

/// Returns `url` with the `api_key` query value masked, for logging.
fn redact_api_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "api_key" {
                String::from(REDACTED)
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

/// Applies the Recover strategy: logs a failure and reports it as absent.
fn recover<T>(operation: &str, result: Result<Option<T>>) -> Option<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(operation, "TMDB request failed, treating as absent: {e:#}");
        None
    })
}

impl LocalCatalogApi for CatalogClient {
    #[instrument(skip_all)]
    async fn fetch_popular(&self) -> Result<Vec<CatalogItem>> {
        self.get_results(Endpoint::PopularMovies, &[]).await
    }

    #[instrument(skip_all)]
    async fn fetch_now_playing(&self) -> Result<Vec<CatalogItem>> {
        self.get_results(Endpoint::NowPlayingMovies, &[]).await
    }

    #[instrument(skip_all)]
    async fn fetch_top_rated(&self) -> Result<Vec<CatalogItem>> {
        self.get_results(Endpoint::TopRatedMovies, &[]).await
    }

    #[instrument(skip_all)]
    async fn fetch_popular_tv(&self) -> Result<Vec<CatalogItem>> {
        let shows: Vec<TvShowResult> = self.get_results(Endpoint::PopularTv, &[]).await?;
        Ok(shows.into_iter().map(CatalogItem::from).collect())
    }

    #[instrument(skip_all)]
    async fn fetch_featured(&self) -> Result<Option<CatalogItem>> {
        let items: Vec<CatalogItem> = self.get_results(Endpoint::PopularMovies, &[]).await?;
        Ok(items.into_iter().next())
    }

    #[instrument(skip_all, fields(item_id = item_id))]
    async fn fetch_trailer(&self, item_id: u64) -> Option<Video> {
        recover("fetch_trailer", self.find_trailer(item_id).await)
    }

    #[instrument(skip_all)]
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let params = [("query", String::from(query))];
        self.get_results(Endpoint::SearchMovie, &params).await
    }

    #[instrument(skip_all, fields(genre_id = genre_id))]
    async fn fetch_by_genre(&self, genre_id: u32) -> Result<Vec<CatalogItem>> {
        let params = [("with_genres", genre_id.to_string())];
        self.get_results(Endpoint::DiscoverMovie, &params).await
    }
}
