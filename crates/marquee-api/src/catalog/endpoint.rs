//! Fixed TMDB endpoints used by the catalog client.

/// An upstream endpoint, relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `movie/popular`
    PopularMovies,
    /// `movie/now_playing`
    NowPlayingMovies,
    /// `movie/top_rated`
    TopRatedMovies,
    /// `tv/popular`
    PopularTv,
    /// `movie/{id}/videos`
    MovieVideos(u64),
    /// `search/movie`
    SearchMovie,
    /// `discover/movie`
    DiscoverMovie,
}

impl Endpoint {
    /// Returns the relative request path (no leading slash, so it joins onto
    /// a base URL ending in `/`).
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::PopularMovies => String::from("movie/popular"),
            Self::NowPlayingMovies => String::from("movie/now_playing"),
            Self::TopRatedMovies => String::from("movie/top_rated"),
            Self::PopularTv => String::from("tv/popular"),
            Self::MovieVideos(id) => format!("movie/{id}/videos"),
            Self::SearchMovie => String::from("search/movie"),
            Self::DiscoverMovie => String::from("discover/movie"),
        }
    }
}
