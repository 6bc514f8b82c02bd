//! # cinetmdb
//!
//! Typed client for the TMDB movie catalog API.
//!
//! This crate provides the remote half of the CineTree stack:
//!
//! - **Models**: movies, persons, credits, genres, discovery pages, with
//!   flexible id deserialization.
//! - **Low-level API** ([`api::TmdbApi`]): one pooled HTTP client with
//!   connect/read timeouts, API-key injection, and uniform mapping of the
//!   TMDB error envelope onto [`TmdbError`].
//! - **[`Catalog`] trait**: the capability contract consumed by the tree
//!   layer, with [`TmdbClient`] as the production implementation.
//!
//! Caching deliberately does NOT live here; the tree layer owns the
//! cache-aside strategy and calls this crate only on cache misses.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cinetmdb::{Catalog, SortOrder, TmdbClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = TmdbClient::from_config()?;
//!     let page = client.discover(2024, 1, SortOrder::default(), 1, "en").await?;
//!     println!("{} movies released in 2024-01", page.total_results);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod models;

pub use client::{Catalog, TmdbClient};
pub use error::{Result, TmdbError};
pub use models::{
    CastMember, Credits, CrewMember, DiscoverPage, Genre, ImageConfiguration, MovieDetails,
    MovieSummary, Person, ProductionCompany, SortOrder, SpokenLanguage,
};
