//! Data structures and types for LMDB
//!
//! Contains the records decoded from TMDB and the view models derived from them:
//! - **Envelopes**: the paginated list wrapper every list endpoint returns
//! - **Summaries**: movie, TV show and person records as they appear in lists
//! - **Details**: fully populated records with appended sub-resources
//! - **Credits**: cast/crew records for titles and filmographies for people
//! - **Cards**: the render-ready projection shared by every list in the UI

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::api::TmdbError;
use crate::images::slugify;

// =============================================================================
// Decoding helpers
// =============================================================================

/// Treat an explicit JSON `null` like a missing field.
///
/// TMDB sends `null` for plenty of string fields (overview, character, biography)
/// so every such field goes through here instead of failing the whole record.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn first_page() -> u32 {
    1
}

// =============================================================================
// Paginated envelope
// =============================================================================

/// `{page, total_pages, total_results, results}` as returned by every list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// The canonical "nothing here" envelope: page 1 of 1, no results.
    pub fn empty() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total_results: 0,
            results: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Convert each result, keeping the pagination counters.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    /// Convert results, dropping the ones `f` rejects.
    pub fn filter_map<U>(self, f: impl FnMut(T) -> Option<U>) -> Paginated<U> {
        Paginated {
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            results: self.results.into_iter().filter_map(f).collect(),
        }
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Kinds, feeds and windows
// =============================================================================

/// The three kinds of entity TMDB lists, searches and links to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Tv,
    Person,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Movie, MediaKind::Tv, MediaKind::Person];

    /// Path segment used by TMDB endpoints and by hrefs
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Person => "person",
        }
    }

    /// Tab label on the search screen
    pub fn tab_label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movies",
            MediaKind::Tv => "TV Shows",
            MediaKind::Person => "People",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            MediaKind::Movie => "MOVIE",
            MediaKind::Tv => "TV",
            MediaKind::Person => "PERSON",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "Movie"),
            MediaKind::Tv => write!(f, "TV Show"),
            MediaKind::Person => write!(f, "Person"),
        }
    }
}

/// Trending time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// A fixed listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    PopularMovies,
    TrendingMovies(TimeWindow),
    TopRatedMovies,
    PopularTv,
    TrendingTv(TimeWindow),
    TopRatedTv,
    AiringTodayTv,
    PopularPeople,
}

impl Feed {
    /// Feeds reachable from the number keys, in key order
    pub const ALL: [Feed; 8] = [
        Feed::PopularMovies,
        Feed::TrendingMovies(TimeWindow::Week),
        Feed::TopRatedMovies,
        Feed::PopularTv,
        Feed::TrendingTv(TimeWindow::Week),
        Feed::TopRatedTv,
        Feed::AiringTodayTv,
        Feed::PopularPeople,
    ];

    pub fn kind(&self) -> MediaKind {
        match self {
            Feed::PopularMovies | Feed::TrendingMovies(_) | Feed::TopRatedMovies => {
                MediaKind::Movie
            }
            Feed::PopularTv | Feed::TrendingTv(_) | Feed::TopRatedTv | Feed::AiringTodayTv => {
                MediaKind::Tv
            }
            Feed::PopularPeople => MediaKind::Person,
        }
    }

    /// Endpoint path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Feed::PopularMovies => "/movie/popular".to_string(),
            Feed::TrendingMovies(w) => format!("/trending/movie/{}", w.as_str()),
            Feed::TopRatedMovies => "/movie/top_rated".to_string(),
            Feed::PopularTv => "/tv/popular".to_string(),
            Feed::TrendingTv(w) => format!("/trending/tv/{}", w.as_str()),
            Feed::TopRatedTv => "/tv/top_rated".to_string(),
            Feed::AiringTodayTv => "/tv/airing_today".to_string(),
            Feed::PopularPeople => "/person/popular".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Feed::PopularMovies => "Popular Movies",
            Feed::TrendingMovies(TimeWindow::Day) => "Trending Movies Today",
            Feed::TrendingMovies(TimeWindow::Week) => "Trending Movies This Week",
            Feed::TopRatedMovies => "Top Rated Movies",
            Feed::PopularTv => "Popular TV Shows",
            Feed::TrendingTv(TimeWindow::Day) => "Trending TV Shows Today",
            Feed::TrendingTv(TimeWindow::Week) => "Trending TV Shows This Week",
            Feed::TopRatedTv => "Top Rated TV Shows",
            Feed::AiringTodayTv => "TV Shows Airing Today",
            Feed::PopularPeople => "Popular People",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Person gender as TMDB encodes it (0-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Gender {
    #[default]
    Unspecified,
    Female,
    Male,
    NonBinary,
}

impl From<u8> for Gender {
    fn from(code: u8) -> Self {
        match code {
            1 => Gender::Female,
            2 => Gender::Male,
            3 => Gender::NonBinary,
            _ => Gender::Unspecified,
        }
    }
}

impl From<Gender> for u8 {
    fn from(gender: Gender) -> u8 {
        match gender {
            Gender::Unspecified => 0,
            Gender::Female => 1,
            Gender::Male => 2,
            Gender::NonBinary => 3,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Unspecified => write!(f, "Not specified"),
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
            Gender::NonBinary => write!(f, "Non-binary"),
        }
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Movie as it appears in list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_language: String,
    #[serde(default, deserialize_with = "nullable")]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub genre_ids: Vec<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub vote_average: f32,
    #[serde(default, deserialize_with = "nullable")]
    pub vote_count: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub popularity: f64,
}

/// TV show as it appears in list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_language: String,
    #[serde(default, deserialize_with = "nullable")]
    pub overview: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub genre_ids: Vec<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub origin_country: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub vote_average: f32,
    #[serde(default, deserialize_with = "nullable")]
    pub vote_count: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub popularity: f64,
}

/// Person as they appear in list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub known_for_department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Gender,
    #[serde(default, deserialize_with = "nullable")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "known_items")]
    pub known_for: Vec<MediaItem>,
}

/// A list result of any kind, discriminated by `media_type`.
///
/// Endpoints that only ever return one kind (e.g. `/movie/popular`) omit the tag;
/// the client wraps those results in the matching variant when it decodes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MediaItem {
    Movie(Movie),
    Tv(TvShow),
    Person(Person),
}

impl MediaItem {
    pub fn id(&self) -> u64 {
        match self {
            MediaItem::Movie(m) => m.id,
            MediaItem::Tv(t) => t.id,
            MediaItem::Person(p) => p.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaItem::Movie(_) => MediaKind::Movie,
            MediaItem::Tv(_) => MediaKind::Tv,
            MediaItem::Person(_) => MediaKind::Person,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.title,
            MediaItem::Tv(t) => &t.name,
            MediaItem::Person(p) => &p.name,
        }
    }
}

impl From<Movie> for MediaItem {
    fn from(movie: Movie) -> Self {
        MediaItem::Movie(movie)
    }
}

impl From<TvShow> for MediaItem {
    fn from(show: TvShow) -> Self {
        MediaItem::Tv(show)
    }
}

impl From<Person> for MediaItem {
    fn from(person: Person) -> Self {
        MediaItem::Person(person)
    }
}

/// Decoding shape for tagged result lists that may contain kinds we don't model
#[derive(Debug, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub(crate) enum TaggedItem {
    Movie(Movie),
    Tv(TvShow),
    Person(Person),
    #[serde(other)]
    Unknown,
}

impl TaggedItem {
    pub(crate) fn into_item(self) -> Option<MediaItem> {
        match self {
            TaggedItem::Movie(m) => Some(MediaItem::Movie(m)),
            TaggedItem::Tv(t) => Some(MediaItem::Tv(t)),
            TaggedItem::Person(p) => Some(MediaItem::Person(p)),
            TaggedItem::Unknown => None,
        }
    }
}

fn known_items<'de, D>(deserializer: D) -> Result<Vec<MediaItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<TaggedItem>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(TaggedItem::into_item)
        .collect())
}

// =============================================================================
// Detail records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub season_number: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub episode_count: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub overview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// `/movie/{id}` with `credits,recommendations,reviews` appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub overview: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tagline: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "nullable")]
    pub budget: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub revenue: u64,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub vote_average: f32,
    #[serde(default, deserialize_with = "nullable")]
    pub vote_count: u32,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub recommendations: Option<Paginated<Movie>>,
    #[serde(default)]
    pub reviews: Option<Paginated<Review>>,
}

impl MovieDetails {
    /// Names of the crew members credited with `job` (e.g. "Director")
    pub fn crew_with_job(&self, job: &str) -> Vec<&str> {
        self.credits
            .iter()
            .flat_map(|c| c.crew.iter())
            .filter(|m| m.job == job)
            .map(|m| m.name.as_str())
            .collect()
    }

    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Credits are required to render a movie page at all.
    pub fn require_credits(&self) -> Result<&Credits, TmdbError> {
        self.credits
            .as_ref()
            .ok_or(TmdbError::MissingSubResource("credits"))
    }
}

/// `/tv/{id}` with `aggregate_credits,recommendations,reviews` appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub original_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub overview: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tagline: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub last_air_date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub number_of_seasons: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub number_of_episodes: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub episode_run_time: Vec<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "nullable")]
    pub created_by: Vec<Creator>,
    #[serde(default, deserialize_with = "nullable")]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub vote_average: f32,
    #[serde(default, deserialize_with = "nullable")]
    pub vote_count: u32,
    #[serde(default)]
    pub aggregate_credits: Option<AggregateCredits>,
    #[serde(default)]
    pub recommendations: Option<Paginated<TvShow>>,
    #[serde(default)]
    pub reviews: Option<Paginated<Review>>,
}

impl TvDetails {
    pub fn year(&self) -> Option<u16> {
        self.first_air_date.as_deref().and_then(extract_year)
    }

    pub fn require_credits(&self) -> Result<&AggregateCredits, TmdbError> {
        self.aggregate_credits
            .as_ref()
            .ok_or(TmdbError::MissingSubResource("aggregate credits"))
    }
}

/// `/person/{id}` with `combined_credits` appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub biography: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub known_for_department: String,
    #[serde(default, deserialize_with = "nullable")]
    pub also_known_as: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Gender,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub popularity: f64,
    #[serde(default)]
    pub combined_credits: Option<CombinedCredits>,
}

// =============================================================================
// Credits
// =============================================================================

/// `/movie/{id}/credits`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default = "Vec::new")]
    pub cast: Vec<CastMember>,
    #[serde(default = "Vec::new")]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub order: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub job: String,
    #[serde(default, deserialize_with = "nullable")]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// `/tv/{id}/aggregate_credits`: every role a person played across the run of a show
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateCredits {
    #[serde(default = "Vec::new")]
    pub cast: Vec<AggregateCast>,
    #[serde(default = "Vec::new")]
    pub crew: Vec<AggregateCrew>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "nullable")]
    pub character: String,
    #[serde(default, deserialize_with = "nullable")]
    pub episode_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "nullable")]
    pub job: String,
    #[serde(default, deserialize_with = "nullable")]
    pub episode_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCast {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub roles: Vec<Role>,
    #[serde(default, deserialize_with = "nullable")]
    pub total_episode_count: u32,
}

impl AggregateCast {
    /// All characters joined for display, e.g. "Walter White, Heisenberg"
    pub fn characters(&self) -> String {
        join_non_empty(self.roles.iter().map(|r| r.character.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCrew {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub jobs: Vec<Job>,
    #[serde(default, deserialize_with = "nullable")]
    pub total_episode_count: u32,
}

impl AggregateCrew {
    pub fn job_titles(&self) -> String {
        join_non_empty(self.jobs.iter().map(|j| j.job.as_str()))
    }
}

fn join_non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.filter(|p| !p.is_empty()).collect::<Vec<_>>().join(", ")
}

/// The title a person is credited on, tagged by `media_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum CreditMedia {
    Movie(Movie),
    Tv(TvShow),
}

impl CreditMedia {
    pub fn id(&self) -> u64 {
        match self {
            CreditMedia::Movie(m) => m.id,
            CreditMedia::Tv(t) => t.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            CreditMedia::Movie(_) => MediaKind::Movie,
            CreditMedia::Tv(_) => MediaKind::Tv,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CreditMedia::Movie(m) => &m.title,
            CreditMedia::Tv(t) => &t.name,
        }
    }

    /// Release date for movies, first air date for shows
    pub fn date(&self) -> Option<&str> {
        match self {
            CreditMedia::Movie(m) => m.release_date.as_deref(),
            CreditMedia::Tv(t) => t.first_air_date.as_deref(),
        }
        .filter(|d| !d.is_empty())
    }

    pub fn genre_ids(&self) -> &[u32] {
        match self {
            CreditMedia::Movie(m) => &m.genre_ids,
            CreditMedia::Tv(t) => &t.genre_ids,
        }
    }

    pub fn original_language(&self) -> &str {
        match self {
            CreditMedia::Movie(m) => &m.original_language,
            CreditMedia::Tv(t) => &t.original_language,
        }
    }

    pub fn popularity(&self) -> f64 {
        match self {
            CreditMedia::Movie(m) => m.popularity,
            CreditMedia::Tv(t) => t.popularity,
        }
    }

    pub fn vote_average(&self) -> f32 {
        match self {
            CreditMedia::Movie(m) => m.vote_average,
            CreditMedia::Tv(t) => t.vote_average,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            CreditMedia::Movie(m) => m.poster_path.as_deref(),
            CreditMedia::Tv(t) => t.poster_path.as_deref(),
        }
    }
}

/// One entry of a person's filmography
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonCredit<M> {
    #[serde(flatten)]
    pub media: M,
    #[serde(default, deserialize_with = "nullable")]
    pub credit_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub character: String,
    #[serde(default, deserialize_with = "nullable")]
    pub job: String,
    #[serde(default, deserialize_with = "nullable")]
    pub department: String,
    #[serde(default)]
    pub episode_count: Option<u32>,
}

/// A person's cast and crew credits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonCredits<M> {
    #[serde(default = "Vec::new")]
    pub cast: Vec<PersonCredit<M>>,
    #[serde(default = "Vec::new")]
    pub crew: Vec<PersonCredit<M>>,
}

impl<M> Default for PersonCredits<M> {
    fn default() -> Self {
        Self {
            cast: Vec::new(),
            crew: Vec::new(),
        }
    }
}

/// Filmography entry across movies and TV
pub type Credit = PersonCredit<CreditMedia>;

/// `/person/{id}/combined_credits`
pub type CombinedCredits = PersonCredits<CreditMedia>;

/// `/person/{id}/movie_credits` (untagged: every entry is a movie)
pub type MovieCredits = PersonCredits<Movie>;

impl MovieCredits {
    /// Tag every entry as a movie so it can share code with combined credits.
    pub fn into_combined(self) -> CombinedCredits {
        let tag = |c: PersonCredit<Movie>| PersonCredit {
            media: CreditMedia::Movie(c.media),
            credit_id: c.credit_id,
            character: c.character,
            job: c.job,
            department: c.department,
            episode_count: c.episode_count,
        };
        PersonCredits {
            cast: self.cast.into_iter().map(tag).collect(),
            crew: self.crew.into_iter().map(tag).collect(),
        }
    }
}

// =============================================================================
// Reviews
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorDetails {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default)]
    pub avatar_path: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub author: String,
    #[serde(default, deserialize_with = "nullable")]
    pub author_details: AuthorDetails,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
}

impl Review {
    /// Creation date in display form ("Mar 1, 2022")
    pub fn date(&self) -> Option<String> {
        self.created_at.get(..10).and_then(format_date)
    }
}

// =============================================================================
// Cards
// =============================================================================

/// Where activating a card navigates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub kind: MediaKind,
    pub id: u64,
}

impl Target {
    pub fn new(kind: MediaKind, id: u64) -> Self {
        Self { kind, id }
    }

    /// Site-style link, e.g. `/movie/414906/the-batman`
    pub fn href(&self, title: &str) -> String {
        let slug = slugify(title);
        if slug.is_empty() {
            format!("/{}/{}", self.kind.as_str(), self.id)
        } else {
            format!("/{}/{}/{}", self.kind.as_str(), self.id, slug)
        }
    }
}

/// Render-ready projection of any list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub badge: String,
    pub title: String,
    pub subtitle: String,
    pub rating: Option<f32>,
    pub image_path: Option<String>,
    pub target: Option<Target>,
}

impl Card {
    pub fn href(&self) -> Option<String> {
        self.target.map(|t| t.href(&self.title))
    }
}

/// Anything a list can show as a card
pub trait CardItem {
    fn card(&self) -> Card;
}

impl CardItem for Card {
    fn card(&self) -> Card {
        self.clone()
    }
}

impl CardItem for Movie {
    fn card(&self) -> Card {
        Card {
            badge: MediaKind::Movie.badge().to_string(),
            title: self.title.clone(),
            subtitle: self.release_date.as_deref().and_then(format_date).unwrap_or_default(),
            rating: Some(self.vote_average),
            image_path: self.poster_path.clone(),
            target: Some(Target::new(MediaKind::Movie, self.id)),
        }
    }
}

impl CardItem for TvShow {
    fn card(&self) -> Card {
        Card {
            badge: MediaKind::Tv.badge().to_string(),
            title: self.name.clone(),
            subtitle: self.first_air_date.as_deref().and_then(format_date).unwrap_or_default(),
            rating: Some(self.vote_average),
            image_path: self.poster_path.clone(),
            target: Some(Target::new(MediaKind::Tv, self.id)),
        }
    }
}

impl CardItem for Person {
    fn card(&self) -> Card {
        let known_for = self
            .known_for
            .iter()
            .map(MediaItem::title)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Card {
            badge: MediaKind::Person.badge().to_string(),
            title: self.name.clone(),
            subtitle: if known_for.is_empty() {
                self.known_for_department.clone()
            } else {
                known_for
            },
            rating: None,
            image_path: self.profile_path.clone(),
            target: Some(Target::new(MediaKind::Person, self.id)),
        }
    }
}

impl CardItem for MediaItem {
    fn card(&self) -> Card {
        match self {
            MediaItem::Movie(m) => m.card(),
            MediaItem::Tv(t) => t.card(),
            MediaItem::Person(p) => p.card(),
        }
    }
}

impl CardItem for CastMember {
    fn card(&self) -> Card {
        person_card(self.id, &self.name, &self.character, self.profile_path.as_ref())
    }
}

impl CardItem for CrewMember {
    fn card(&self) -> Card {
        person_card(self.id, &self.name, &self.job, self.profile_path.as_ref())
    }
}

impl CardItem for AggregateCast {
    fn card(&self) -> Card {
        let subtitle = format!("{} ({})", self.characters(), episodes(self.total_episode_count));
        person_card(self.id, &self.name, &subtitle, self.profile_path.as_ref())
    }
}

impl CardItem for AggregateCrew {
    fn card(&self) -> Card {
        let subtitle = format!("{} ({})", self.job_titles(), episodes(self.total_episode_count));
        person_card(self.id, &self.name, &subtitle, self.profile_path.as_ref())
    }
}

impl CardItem for Credit {
    fn card(&self) -> Card {
        let role = if self.character.is_empty() {
            &self.job
        } else {
            &self.character
        };
        let date = self.media.date().and_then(format_date);
        let subtitle = match date {
            Some(d) if !role.is_empty() => format!("{} · {}", role, d),
            Some(d) => d,
            None => role.clone(),
        };
        Card {
            badge: self.media.kind().badge().to_string(),
            title: self.media.title().to_string(),
            subtitle,
            rating: Some(self.media.vote_average()),
            image_path: self.media.poster_path().map(str::to_string),
            target: Some(Target::new(self.media.kind(), self.media.id())),
        }
    }
}

impl CardItem for Review {
    fn card(&self) -> Card {
        let author = if self.author.is_empty() {
            self.author_details.username.clone()
        } else {
            self.author.clone()
        };
        Card {
            badge: "REVIEW".to_string(),
            title: author,
            subtitle: self.date().unwrap_or_default(),
            rating: self.author_details.rating,
            image_path: self.author_details.avatar_path.clone(),
            target: None,
        }
    }
}

fn person_card(id: u64, name: &str, role: &str, profile: Option<&String>) -> Card {
    Card {
        badge: MediaKind::Person.badge().to_string(),
        title: name.to_string(),
        subtitle: role.to_string(),
        rating: None,
        image_path: profile.cloned(),
        target: Some(Target::new(MediaKind::Person, id)),
    }
}

fn episodes(count: u32) -> String {
    if count == 1 {
        "1 episode".to_string()
    } else {
        format!("{} episodes", count)
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

/// "2022-03-01" -> "Mar 1, 2022"; empty or malformed dates give `None`
pub fn format_date(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%b %-d, %Y").to_string())
}

/// 148 -> "2h 28m"
pub fn format_runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// 185000000 -> "$185,000,000"
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}
