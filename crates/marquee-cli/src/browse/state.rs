//! Browse session state management.

use anyhow::Result;
use marquee_api::catalog::{CatalogItem, LocalCatalogApi, Video};

/// Title of the search results row's prefix.
const SEARCH_ROW_PREFIX: &str = "Results for";

/// Title of the personal list row.
pub const MY_LIST_TITLE: &str = "My List";

/// The four category rows shown on the home view.
#[derive(Debug, Clone, Default)]
pub struct HomeRows {
    /// Popular movies.
    pub popular: Vec<CatalogItem>,
    /// Movies in theaters.
    pub now_playing: Vec<CatalogItem>,
    /// Top rated movies.
    pub top_rated: Vec<CatalogItem>,
    /// Popular TV shows (already remapped to movie fields).
    pub popular_tv: Vec<CatalogItem>,
}

impl HomeRows {
    /// Fetches all four rows concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first failure; a partial result is never returned.
    pub async fn load<A: LocalCatalogApi>(api: &A) -> Result<Self> {
        let (popular, now_playing, top_rated, popular_tv) = futures::try_join!(
            api.fetch_popular(),
            api.fetch_now_playing(),
            api.fetch_top_rated(),
            api.fetch_popular_tv(),
        )?;
        Ok(Self {
            popular,
            now_playing,
            top_rated,
            popular_tv,
        })
    }

    /// Iterates every row's items in display order. Duplicates across rows are kept.
    pub fn all(&self) -> impl Iterator<Item = &CatalogItem> {
        self.popular
            .iter()
            .chain(&self.now_playing)
            .chain(&self.top_rated)
            .chain(&self.popular_tv)
    }

    /// Returns `(title, items)` for each category row.
    fn titled(&self) -> [(&'static str, &[CatalogItem]); 4] {
        [
            ("Popular", self.popular.as_slice()),
            ("Now Playing", self.now_playing.as_slice()),
            ("Top Rated", self.top_rated.as_slice()),
            ("Popular TV Shows", self.popular_tv.as_slice()),
        ]
    }
}

/// A titled row of items ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Row title.
    pub title: String,
    /// Items in display order.
    pub items: Vec<CatalogItem>,
}

/// Trailer view state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrailerView {
    /// Item whose trailer is shown.
    pub item_id: Option<u64>,
    /// Whether the view is open.
    pub open: bool,
}

/// In-memory browsing state: simulated login, my list, search and trailer view.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowseSession {
    authenticated: bool,
    my_list: Vec<u64>,
    query: String,
    search_results: Vec<CatalogItem>,
    trailer: TrailerView,
}

impl BrowseSession {
    /// Creates an anonymous session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Simulated login. Nothing is verified or persisted.
    pub fn login(&mut self) {
        self.authenticated = true;
        tracing::debug!("session logged in");
    }

    /// Logs out and clears my list.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.my_list.clear();
        tracing::debug!("session logged out");
    }

    /// Adds an item to my list. Requires login; an ID already present is ignored.
    ///
    /// Returns whether the item was added.
    pub fn add_to_list(&mut self, item: &CatalogItem) -> bool {
        if !self.authenticated || self.my_list.contains(&item.id) {
            return false;
        }
        self.my_list.push(item.id);
        tracing::debug!(id = item.id, title = %item.title, "added to my list");
        true
    }

    /// Removes an item from my list. Requires login.
    ///
    /// Returns whether the item was removed.
    pub fn remove_from_list(&mut self, id: u64) -> bool {
        if !self.authenticated {
            return false;
        }
        let before = self.my_list.len();
        self.my_list.retain(|&listed| listed != id);
        let removed = self.my_list.len() != before;
        if removed {
            tracing::debug!(id, "removed from my list");
        }
        removed
    }

    /// Whether an item ID is in my list.
    #[must_use]
    pub fn is_in_list(&self, id: u64) -> bool {
        self.my_list.contains(&id)
    }

    /// Items of `rows` whose ID is in my list, in row order.
    ///
    /// An item listed in several rows appears once per row.
    #[must_use]
    pub fn my_list_items(&self, rows: &HomeRows) -> Vec<CatalogItem> {
        rows.all()
            .filter(|item| self.is_in_list(item.id))
            .cloned()
            .collect()
    }

    /// Current search query as entered.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a non-blank search query is active.
    #[must_use]
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Results of the last successful search.
    #[must_use]
    pub fn search_results(&self) -> &[CatalogItem] {
        &self.search_results
    }

    /// Runs a search and stores its results.
    ///
    /// A blank query clears the results without a request. A failed search
    /// is logged and leaves the previous results in place.
    pub async fn search<A: LocalCatalogApi>(&mut self, api: &A, query: &str) {
        self.query = String::from(query);
        if !self.has_query() {
            self.search_results.clear();
            return;
        }
        match api.search(query).await {
            Ok(results) => self.search_results = results,
            Err(e) => tracing::warn!(query, "search failed: {e:#}"),
        }
    }

    /// Stores results fetched outside the session for `query`.
    pub fn set_search_results(&mut self, query: &str, results: Vec<CatalogItem>) {
        self.query = String::from(query);
        self.search_results = if self.has_query() {
            results
        } else {
            Vec::new()
        };
    }

    /// Whether the featured banner is shown (hidden while searching).
    #[must_use]
    pub fn show_featured(&self) -> bool {
        !self.has_query()
    }

    /// Current trailer view state.
    #[must_use]
    pub const fn trailer(&self) -> TrailerView {
        self.trailer
    }

    /// Opens the trailer view for an item.
    pub const fn open_trailer(&mut self, item_id: u64) {
        self.trailer = TrailerView {
            item_id: Some(item_id),
            open: true,
        };
    }

    /// Closes the trailer view.
    pub const fn close_trailer(&mut self) {
        self.trailer = TrailerView {
            item_id: None,
            open: false,
        };
    }

    /// Looks up the trailer for the open view.
    ///
    /// Closes the view when no trailer is available.
    pub async fn load_trailer<A: LocalCatalogApi>(&mut self, api: &A) -> Option<Video> {
        let TrailerView {
            item_id: Some(id),
            open: true,
        } = self.trailer
        else {
            return None;
        };
        let trailer = api.fetch_trailer(id).await;
        if trailer.is_none() {
            self.close_trailer();
        }
        trailer
    }

    /// Rows to display, in order: search results, my list, then categories.
    ///
    /// Category rows are hidden while a query is active.
    #[must_use]
    pub fn sections(&self, rows: &HomeRows) -> Vec<Section> {
        let mut sections = Vec::new();

        if self.has_query() && !self.search_results.is_empty() {
            sections.push(Section {
                title: format!("{SEARCH_ROW_PREFIX} \"{}\"", self.query),
                items: self.search_results.clone(),
            });
        }

        if self.authenticated {
            let items = self.my_list_items(rows);
            if !items.is_empty() {
                sections.push(Section {
                    title: String::from(MY_LIST_TITLE),
                    items,
                });
            }
        }

        if !self.has_query() {
            sections.extend(rows.titled().into_iter().map(|(title, items)| Section {
                title: String::from(title),
                items: items.to_vec(),
            }));
        }

        sections
    }

    /// Empty-state message, if one applies.
    #[must_use]
    pub fn empty_notice(&self, rows: &HomeRows) -> Option<String> {
        if self.has_query() {
            return self
                .search_results
                .is_empty()
                .then(|| format!("No results found for \"{}\"", self.query));
        }
        (self.authenticated && self.my_list_items(rows).is_empty())
            .then(|| String::from("Your list is empty. Add titles to see them here."))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::cell::Cell;

    use anyhow::bail;

    use super::*;

    fn item(id: u64, title: &str) -> CatalogItem {
        CatalogItem {
            id,
            title: String::from(title),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: String::from("2024-01-01"),
            vote_average: 7.0,
            genre_ids: Vec::new(),
        }
    }

    fn trailer(key: &str) -> Video {
        Video {
            key: String::from(key),
            name: String::from("Official Trailer"),
            video_type: String::from("Trailer"),
            site: String::from("YouTube"),
        }
    }

    /// Canned catalog that counts search requests.
    #[derive(Default)]
    struct MockCatalog {
        rows: HomeRows,
        search_results: Vec<CatalogItem>,
        fail_search: bool,
        fail_top_rated: bool,
        trailer: Option<Video>,
        search_calls: Cell<usize>,
    }

    impl LocalCatalogApi for MockCatalog {
        async fn fetch_popular(&self) -> Result<Vec<CatalogItem>> {
            Ok(self.rows.popular.clone())
        }

        async fn fetch_now_playing(&self) -> Result<Vec<CatalogItem>> {
            Ok(self.rows.now_playing.clone())
        }

        async fn fetch_top_rated(&self) -> Result<Vec<CatalogItem>> {
            if self.fail_top_rated {
                bail!("TMDB API error (HTTP 500 Internal Server Error): boom");
            }
            Ok(self.rows.top_rated.clone())
        }

        async fn fetch_popular_tv(&self) -> Result<Vec<CatalogItem>> {
            Ok(self.rows.popular_tv.clone())
        }

        async fn fetch_featured(&self) -> Result<Option<CatalogItem>> {
            Ok(self.rows.popular.first().cloned())
        }

        async fn fetch_trailer(&self, _item_id: u64) -> Option<Video> {
            self.trailer.clone()
        }

        async fn search(&self, _query: &str) -> Result<Vec<CatalogItem>> {
            self.search_calls.set(self.search_calls.get().saturating_add(1));
            if self.fail_search {
                bail!("request failed: search/movie");
            }
            Ok(self.search_results.clone())
        }

        async fn fetch_by_genre(&self, _genre_id: u32) -> Result<Vec<CatalogItem>> {
            Ok(Vec::new())
        }
    }

    fn sample_rows() -> HomeRows {
        HomeRows {
            popular: vec![item(1, "Dune"), item(2, "Alien")],
            now_playing: vec![item(3, "Wicked"), item(1, "Dune")],
            top_rated: vec![item(4, "Parasite")],
            popular_tv: vec![item(1399, "Game of Thrones")],
        }
    }

    #[tokio::test]
    async fn test_home_rows_load_all_four() {
        // Arrange
        let api = MockCatalog {
            rows: sample_rows(),
            ..MockCatalog::default()
        };

        // Act
        let rows = HomeRows::load(&api).await.unwrap();

        // Assert
        assert_eq!(rows.popular.len(), 2);
        assert_eq!(rows.now_playing.len(), 2);
        assert_eq!(rows.top_rated[0].title, "Parasite");
        assert_eq!(rows.popular_tv[0].id, 1399);
        assert_eq!(rows.all().count(), 6);
    }

    #[tokio::test]
    async fn test_home_rows_load_fails_when_one_row_fails() {
        // Arrange
        let api = MockCatalog {
            rows: sample_rows(),
            fail_top_rated: true,
            ..MockCatalog::default()
        };

        // Act
        let result = HomeRows::load(&api).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_add_to_list_requires_login() {
        // Arrange
        let mut session = BrowseSession::new();

        // Act
        let added = session.add_to_list(&item(1, "Dune"));

        // Assert
        assert!(!added);
        assert!(!session.is_in_list(1));
    }

    #[test]
    fn test_add_to_list_dedupes_on_insert() {
        // Arrange
        let mut session = BrowseSession::new();
        session.login();

        // Act
        let first = session.add_to_list(&item(1, "Dune"));
        let second = session.add_to_list(&item(1, "Dune"));

        // Assert
        assert!(first);
        assert!(!second);
        assert!(session.is_in_list(1));
    }

    #[test]
    fn test_my_list_items_keep_duplicates_across_rows() {
        // Arrange
        let rows = sample_rows();
        let mut session = BrowseSession::new();
        session.login();
        session.add_to_list(&item(1, "Dune"));
        session.add_to_list(&item(1399, "Game of Thrones"));

        // Act
        let items = session.my_list_items(&rows);

        // Assert: Dune is in both popular and now playing
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 1, 1399]);
    }

    #[test]
    fn test_remove_from_list() {
        // Arrange
        let mut session = BrowseSession::new();
        session.login();
        session.add_to_list(&item(1, "Dune"));
        session.add_to_list(&item(2, "Alien"));

        // Act
        let removed = session.remove_from_list(1);
        let missing = session.remove_from_list(99);

        // Assert
        assert!(removed);
        assert!(!missing);
        assert!(!session.is_in_list(1));
        assert!(session.is_in_list(2));
    }

    #[test]
    fn test_remove_from_list_requires_login() {
        // Arrange
        let mut session = BrowseSession::new();
        session.login();
        session.add_to_list(&item(1, "Dune"));
        session.authenticated = false;

        // Act
        let removed = session.remove_from_list(1);

        // Assert
        assert!(!removed);
        assert!(session.is_in_list(1));
    }

    #[test]
    fn test_logout_clears_list() {
        // Arrange
        let mut session = BrowseSession::new();
        session.login();
        session.add_to_list(&item(1, "Dune"));

        // Act
        session.logout();

        // Assert
        assert!(!session.is_authenticated());
        assert!(!session.is_in_list(1));
    }

    #[tokio::test]
    async fn test_search_stores_results() {
        // Arrange
        let api = MockCatalog {
            search_results: vec![item(5, "RoboCop")],
            ..MockCatalog::default()
        };
        let mut session = BrowseSession::new();

        // Act
        session.search(&api, "robo").await;

        // Assert
        assert_eq!(session.query(), "robo");
        assert_eq!(session.search_results().len(), 1);
        assert!(!session.show_featured());
        assert_eq!(api.search_calls.get(), 1);
    }

    #[test]
    fn test_set_search_results() {
        // Arrange
        let mut session = BrowseSession::new();
        let rows = HomeRows::default();

        // Act
        session.set_search_results("robo", vec![item(5, "RoboCop")]);

        // Assert
        let sections = session.sections(&rows);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Results for \"robo\"");

        // Act: a blank query drops the results
        session.set_search_results("  ", vec![item(5, "RoboCop")]);

        // Assert
        assert!(session.search_results().is_empty());
        assert!(session.empty_notice(&rows).is_none());
    }

    #[tokio::test]
    async fn test_blank_search_clears_without_request() {
        // Arrange
        let api = MockCatalog {
            search_results: vec![item(5, "RoboCop")],
            ..MockCatalog::default()
        };
        let mut session = BrowseSession::new();
        session.search(&api, "robo").await;

        // Act
        session.search(&api, "   ").await;

        // Assert
        assert!(session.search_results().is_empty());
        assert!(!session.has_query());
        assert!(session.show_featured());
        assert_eq!(api.search_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_results() {
        // Arrange
        let ok_api = MockCatalog {
            search_results: vec![item(5, "RoboCop")],
            ..MockCatalog::default()
        };
        let failing_api = MockCatalog {
            fail_search: true,
            ..MockCatalog::default()
        };
        let mut session = BrowseSession::new();
        session.search(&ok_api, "robo").await;

        // Act
        session.search(&failing_api, "alien").await;

        // Assert
        assert_eq!(session.query(), "alien");
        assert_eq!(session.search_results()[0].title, "RoboCop");
    }

    #[tokio::test]
    async fn test_load_trailer_when_available() {
        // Arrange
        let api = MockCatalog {
            trailer: Some(trailer("abc123")),
            ..MockCatalog::default()
        };
        let mut session = BrowseSession::new();
        session.open_trailer(42);

        // Act
        let found = session.load_trailer(&api).await;

        // Assert
        assert_eq!(found.unwrap().key, "abc123");
        assert_eq!(
            session.trailer(),
            TrailerView {
                item_id: Some(42),
                open: true
            }
        );
    }

    #[tokio::test]
    async fn test_load_trailer_missing_closes_view() {
        // Arrange
        let api = MockCatalog::default();
        let mut session = BrowseSession::new();
        session.open_trailer(42);

        // Act
        let found = session.load_trailer(&api).await;

        // Assert
        assert!(found.is_none());
        assert_eq!(session.trailer(), TrailerView::default());
    }

    #[tokio::test]
    async fn test_load_trailer_when_closed_is_none() {
        // Arrange
        let api = MockCatalog {
            trailer: Some(trailer("abc123")),
            ..MockCatalog::default()
        };
        let mut session = BrowseSession::new();
        session.open_trailer(42);
        session.close_trailer();

        // Act & Assert
        assert!(session.load_trailer(&api).await.is_none());
    }

    #[test]
    fn test_sections_without_query_or_login() {
        // Arrange
        let rows = sample_rows();
        let session = BrowseSession::new();

        // Act
        let sections = session.sections(&rows);

        // Assert
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Popular", "Now Playing", "Top Rated", "Popular TV Shows"]
        );
        assert!(session.empty_notice(&rows).is_none());
    }

    #[test]
    fn test_sections_with_my_list() {
        // Arrange
        let rows = sample_rows();
        let mut session = BrowseSession::new();
        session.login();
        session.add_to_list(&item(4, "Parasite"));

        // Act
        let sections = session.sections(&rows);

        // Assert
        assert_eq!(sections.len(), 5);
        assert_eq!(sections[0].title, MY_LIST_TITLE);
        assert_eq!(sections[0].items[0].title, "Parasite");
    }

    #[test]
    fn test_empty_list_notice_when_logged_in() {
        // Arrange
        let rows = sample_rows();
        let mut session = BrowseSession::new();
        session.login();

        // Act
        let notice = session.empty_notice(&rows);

        // Assert
        assert!(notice.unwrap().starts_with("Your list is empty"));
        assert!(
            session
                .sections(&rows)
                .iter()
                .all(|s| s.title != MY_LIST_TITLE)
        );
    }

    #[tokio::test]
    async fn test_sections_while_searching() {
        // Arrange
        let rows = sample_rows();
        let api = MockCatalog {
            search_results: vec![item(5, "RoboCop")],
            ..MockCatalog::default()
        };
        let mut session = BrowseSession::new();
        session.login();
        session.add_to_list(&item(2, "Alien"));

        // Act
        session.search(&api, "robo").await;
        let sections = session.sections(&rows);

        // Assert: search row, then my list, no categories
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Results for \"robo\"", MY_LIST_TITLE]);
        assert!(session.empty_notice(&rows).is_none());
    }

    #[tokio::test]
    async fn test_no_results_notice() {
        // Arrange
        let rows = HomeRows::default();
        let api = MockCatalog::default();
        let mut session = BrowseSession::new();

        // Act
        session.search(&api, "zzzz").await;

        // Assert
        assert!(session.sections(&rows).is_empty());
        assert_eq!(
            session.empty_notice(&rows).unwrap(),
            "No results found for \"zzzz\""
        );
    }
}
