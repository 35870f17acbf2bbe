//! TMDB (The Movie Database) API client
//!
//! One method per remote resource. Failures degrade instead of propagating:
//! list operations fall back to [`Paginated::empty`], single-entity lookups to
//! `None`, so a flaky upstream renders as "no results" rather than a crash.
//! API docs: https://developer.themoviedb.org/docs

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::TmdbConfig;
use crate::images::{image_url, ImageSize};
use crate::models::{
    AggregateCredits, CombinedCredits, Credits, Feed, MediaItem, MediaKind, Movie, MovieCredits,
    MovieDetails, Paginated, Person, PersonDetails, Review, TaggedItem, TimeWindow, TvDetails,
    TvShow,
};

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("TMDB returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Required {0} failed to load")]
    MissingSubResource(&'static str),
}

impl TmdbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::Status { status: 404, .. })
    }
}

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    image_base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a client from resolved settings
    pub fn new(config: TmdbConfig) -> Self {
        Self {
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url,
            client: reqwest::Client::builder()
                .user_agent(concat!("lmdb/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::new(TmdbConfig::new(api_key).with_base_url(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute image URL against the configured CDN
    pub fn image_url(&self, path: Option<&str>, size: ImageSize) -> String {
        image_url(&self.image_base_url, path, size)
    }

    /// Single authenticated GET. Non-2xx statuses are logged with their body
    /// and returned as [`TmdbError::Status`].
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, TmdbError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(endpoint = %endpoint, "TMDB request");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                endpoint = %endpoint,
                body = %body,
                "TMDB request failed"
            );
            return Err(TmdbError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| TmdbError::InvalidResponse(format!("JSON parse error: {}", e)))
    }

    /// GET a list endpoint; any failure becomes the empty envelope.
    async fn list<T: DeserializeOwned>(&self, endpoint: &str) -> Paginated<T> {
        match self.get(endpoint).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "returning empty results");
                Paginated::empty()
            }
        }
    }

    /// GET a single entity; a non-2xx status becomes `None`.
    async fn lookup<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>, TmdbError> {
        match self.get(endpoint).await {
            Ok(value) => Ok(Some(value)),
            Err(TmdbError::Status { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // -------------------------------------------------------------------------
    // Movies
    // -------------------------------------------------------------------------

    pub async fn popular_movies(&self, page: Option<u32>) -> Paginated<Movie> {
        self.list(&paged("/movie/popular", page)).await
    }

    pub async fn trending_movies(&self, window: TimeWindow, page: Option<u32>) -> Paginated<Movie> {
        self.list(&paged(&format!("/trending/movie/{}", window.as_str()), page))
            .await
    }

    pub async fn top_rated_movies(&self, page: Option<u32>) -> Paginated<Movie> {
        self.list(&paged("/movie/top_rated", page)).await
    }

    /// Bare movie record, no sub-resources
    pub async fn movie(&self, id: u64) -> Result<Option<MovieDetails>, TmdbError> {
        self.lookup(&format!("/movie/{}", id)).await
    }

    /// Movie with credits, recommendations and reviews appended
    pub async fn movie_details(&self, id: u64) -> Result<Option<MovieDetails>, TmdbError> {
        self.lookup(&endpoint(
            &format!("/movie/{}", id),
            &[("append_to_response", "credits,recommendations,reviews")],
        ))
        .await
    }

    pub async fn movie_credits(&self, id: u64) -> Result<Option<Credits>, TmdbError> {
        self.lookup(&format!("/movie/{}/credits", id)).await
    }

    pub async fn movie_recommendations(&self, id: u64, page: Option<u32>) -> Paginated<Movie> {
        self.list(&paged(&format!("/movie/{}/recommendations", id), page))
            .await
    }

    pub async fn movie_reviews(&self, id: u64, page: Option<u32>) -> Paginated<Review> {
        self.list(&paged(&format!("/movie/{}/reviews", id), page)).await
    }

    pub async fn search_movies(&self, query: &str, page: Option<u32>) -> Paginated<Movie> {
        if is_blank(query) {
            return Paginated::empty();
        }
        self.list(&search_endpoint("/search/movie", query, page)).await
    }

    // -------------------------------------------------------------------------
    // TV
    // -------------------------------------------------------------------------

    pub async fn popular_tv(&self, page: Option<u32>) -> Paginated<TvShow> {
        self.list(&paged("/tv/popular", page)).await
    }

    pub async fn trending_tv(&self, window: TimeWindow, page: Option<u32>) -> Paginated<TvShow> {
        self.list(&paged(&format!("/trending/tv/{}", window.as_str()), page))
            .await
    }

    pub async fn top_rated_tv(&self, page: Option<u32>) -> Paginated<TvShow> {
        self.list(&paged("/tv/top_rated", page)).await
    }

    pub async fn airing_today_tv(&self, page: Option<u32>) -> Paginated<TvShow> {
        self.list(&paged("/tv/airing_today", page)).await
    }

    pub async fn tv_show(&self, id: u64) -> Result<Option<TvDetails>, TmdbError> {
        self.lookup(&format!("/tv/{}", id)).await
    }

    /// Show with aggregate credits, recommendations and reviews appended
    pub async fn tv_details(&self, id: u64) -> Result<Option<TvDetails>, TmdbError> {
        self.lookup(&endpoint(
            &format!("/tv/{}", id),
            &[(
                "append_to_response",
                "aggregate_credits,recommendations,reviews",
            )],
        ))
        .await
    }

    pub async fn tv_credits(&self, id: u64) -> Result<Option<AggregateCredits>, TmdbError> {
        self.lookup(&format!("/tv/{}/aggregate_credits", id)).await
    }

    pub async fn tv_recommendations(&self, id: u64, page: Option<u32>) -> Paginated<TvShow> {
        self.list(&paged(&format!("/tv/{}/recommendations", id), page))
            .await
    }

    pub async fn tv_reviews(&self, id: u64, page: Option<u32>) -> Paginated<Review> {
        self.list(&paged(&format!("/tv/{}/reviews", id), page)).await
    }

    pub async fn search_tv(&self, query: &str, page: Option<u32>) -> Paginated<TvShow> {
        if is_blank(query) {
            return Paginated::empty();
        }
        self.list(&search_endpoint("/search/tv", query, page)).await
    }

    // -------------------------------------------------------------------------
    // People
    // -------------------------------------------------------------------------

    pub async fn popular_people(&self, page: Option<u32>) -> Paginated<Person> {
        self.list(&paged("/person/popular", page)).await
    }

    pub async fn person(&self, id: u64) -> Result<Option<PersonDetails>, TmdbError> {
        self.lookup(&format!("/person/{}", id)).await
    }

    /// Person with combined (movie + TV) credits appended
    pub async fn person_details(&self, id: u64) -> Result<Option<PersonDetails>, TmdbError> {
        self.lookup(&endpoint(
            &format!("/person/{}", id),
            &[("append_to_response", "combined_credits")],
        ))
        .await
    }

    pub async fn person_combined_credits(
        &self,
        id: u64,
    ) -> Result<Option<CombinedCredits>, TmdbError> {
        self.lookup(&format!("/person/{}/combined_credits", id))
            .await
    }

    /// Movie-only filmography, tagged so it shares types with combined credits
    pub async fn person_movie_credits(
        &self,
        id: u64,
    ) -> Result<Option<CombinedCredits>, TmdbError> {
        let credits: Option<MovieCredits> =
            self.lookup(&format!("/person/{}/movie_credits", id)).await?;
        Ok(credits.map(MovieCredits::into_combined))
    }

    pub async fn search_people(&self, query: &str, page: Option<u32>) -> Paginated<Person> {
        if is_blank(query) {
            return Paginated::empty();
        }
        self.list(&search_endpoint("/search/person", query, page)).await
    }

    // -------------------------------------------------------------------------
    // Mixed
    // -------------------------------------------------------------------------

    /// Search movies, shows and people at once; unknown kinds are dropped
    pub async fn multi_search(&self, query: &str, page: Option<u32>) -> Paginated<MediaItem> {
        if is_blank(query) {
            return Paginated::empty();
        }
        self.list::<TaggedItem>(&search_endpoint("/search/multi", query, page))
            .await
            .filter_map(TaggedItem::into_item)
    }

    /// Fetch one page of a listing feed as tagged items
    pub async fn feed(&self, feed: Feed, page: Option<u32>) -> Paginated<MediaItem> {
        let endpoint = paged(&feed.path(), page);
        match feed.kind() {
            MediaKind::Movie => self.list::<Movie>(&endpoint).await.map(MediaItem::from),
            MediaKind::Tv => self.list::<TvShow>(&endpoint).await.map(MediaItem::from),
            MediaKind::Person => self.list::<Person>(&endpoint).await.map(MediaItem::from),
        }
    }

    /// Typed search for one kind, tagged at the boundary
    pub async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: Option<u32>,
    ) -> Paginated<MediaItem> {
        match kind {
            MediaKind::Movie => self.search_movies(query, page).await.map(MediaItem::from),
            MediaKind::Tv => self.search_tv(query, page).await.map(MediaItem::from),
            MediaKind::Person => self.search_people(query, page).await.map(MediaItem::from),
        }
    }

    /// Pick the search tab to open: an explicit kind wins, otherwise the kind
    /// of the top multi-search hit, otherwise movies.
    pub async fn resolve_search_kind(&self, query: &str, kind: Option<MediaKind>) -> MediaKind {
        if let Some(kind) = kind {
            return kind;
        }
        self.multi_search(query, None)
            .await
            .results
            .first()
            .map(MediaItem::kind)
            .unwrap_or(MediaKind::Movie)
    }
}

// =============================================================================
// Endpoint building
// =============================================================================

fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// `path?k=v&...` with URL-encoded values
fn endpoint(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}

fn paged(path: &str, page: Option<u32>) -> String {
    let page = page.unwrap_or(1).to_string();
    endpoint(path, &[("page", &page)])
}

fn search_endpoint(path: &str, query: &str, page: Option<u32>) -> String {
    let page = page.unwrap_or(1).to_string();
    endpoint(path, &[("query", query), ("page", &page)])
}
