//! Image and trailer URL builders.

/// Default prefix for poster-sized images.
pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default prefix for full-size backdrops.
pub const DEFAULT_BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Default prefix for trailer embeds.
pub const DEFAULT_EMBED_BASE_URL: &str = "https://www.youtube.com/embed/";

/// Local image shown when an item has no poster or backdrop.
pub const DEFAULT_PLACEHOLDER: &str = "/placeholder.svg";

/// Prefixes used to turn catalog path fragments into displayable URLs.
///
/// Path fragments are appended verbatim; nothing is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrls {
    /// Poster prefix.
    pub poster_base_url: String,
    /// Backdrop prefix.
    pub backdrop_base_url: String,
    /// Trailer embed prefix.
    pub embed_base_url: String,
    /// Fallback for empty or missing image paths.
    pub placeholder: String,
}

impl Default for MediaUrls {
    fn default() -> Self {
        Self {
            poster_base_url: String::from(DEFAULT_POSTER_BASE_URL),
            backdrop_base_url: String::from(DEFAULT_BACKDROP_BASE_URL),
            embed_base_url: String::from(DEFAULT_EMBED_BASE_URL),
            placeholder: String::from(DEFAULT_PLACEHOLDER),
        }
    }
}

impl MediaUrls {
    /// Builds a poster URL, or the placeholder for an empty/absent path.
    #[must_use]
    pub fn poster_url(&self, path: Option<&str>) -> String {
        self.image_url(&self.poster_base_url, path)
    }

    /// Builds a backdrop URL, or the placeholder for an empty/absent path.
    #[must_use]
    pub fn backdrop_url(&self, path: Option<&str>) -> String {
        self.image_url(&self.backdrop_base_url, path)
    }

    /// Builds the embed URL for a trailer key.
    #[must_use]
    pub fn trailer_embed_url(&self, key: &str) -> String {
        format!("{}{key}", self.embed_base_url)
    }

    fn image_url(&self, base: &str, path: Option<&str>) -> String {
        match path {
            Some(p) if !p.is_empty() => format!("{base}{p}"),
            _ => self.placeholder.clone(),
        }
    }
}
