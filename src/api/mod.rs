//! API clients for external services
//!
//! - TMDB: movie, TV and person metadata, listings and search

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};
