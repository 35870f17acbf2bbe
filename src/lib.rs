//! LMDB - a terminal browser for The Movie Database
//!
//! Popular, trending and top rated listings, search, and detail pages for
//! movies, TV shows and people, with infinite scrolling lists.
//!
//! # Modules
//!
//! - `models` - TMDB records, feeds, cards and formatting helpers
//! - `api` - TMDB client
//! - `list` - Paginated list controller behind every scrolling list
//! - `filmography` - Known-for and date ordering of a person's credits
//! - `images` - Image URLs and title slugs
//! - `app` - Application state and navigation
//! - `runtime` - Runs app requests on tokio tasks
//! - `ui` - TUI components
//! - `cli` / `commands` - Scriptable subcommands
//! - `config` / `logging` - Settings and tracing setup

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod filmography;
pub mod images;
pub mod list;
pub mod logging;
pub mod models;
pub mod runtime;
pub mod ui;

// Re-export commonly used types
pub use models::{
    Card, CardItem, Feed, MediaItem, MediaKind, Movie, MovieDetails, Paginated, Person,
    PersonDetails, Review, Target, TimeWindow, TvDetails, TvShow,
};

pub use api::{TmdbClient, TmdbError};
pub use app::{App, AppState};
pub use config::{Config, TmdbConfig};
pub use list::{Advance, ListSeed, ListStatus, PaginatedList};
pub use runtime::Runtime;
