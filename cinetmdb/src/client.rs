//! High-level TMDB client and the [`Catalog`] capability trait
//!
//! The [`Catalog`] trait is the contract consumed by the tree layer: every
//! remote capability the virtual tree needs, and nothing else. [`TmdbClient`]
//! is the production implementation; tests substitute an in-memory fake.

use crate::api::{ApiSettings, TmdbApi};
use crate::error::Result;
use crate::models::*;
use cineconfig::Config;
use std::fmt::Debug;
use std::time::Duration;
use tracing::info;

/// Remote movie-catalog capabilities
///
/// All operations may fail with a transport or parsing error; none of them
/// retries. Implementations must be `Send + Sync` for use from concurrent
/// tree traversals.
#[async_trait::async_trait]
pub trait Catalog: Debug + Send + Sync {
    /// Fetches the global image configuration (base URL and size tables)
    async fn configuration(&self) -> Result<ImageConfiguration>;

    /// Fetches full movie details by id and locale
    async fn movie(&self, movie_id: &str, language: &str) -> Result<MovieDetails>;

    /// Fetches person details by id and locale
    async fn person(&self, person_id: &str, language: &str) -> Result<Person>;

    /// Fetches the cast and crew of a movie
    async fn credits(&self, movie_id: &str) -> Result<Credits>;

    /// Fetches one page of movies released within a calendar month
    async fn discover(
        &self,
        year: i32,
        month: u32,
        sort: SortOrder,
        page: u32,
        language: &str,
    ) -> Result<DiscoverPage>;

    /// Searches movies by title
    async fn search_movies(&self, query: &str, language: &str, page: u32)
        -> Result<DiscoverPage>;

    /// Fetches the list of movie genres
    async fn genres(&self, language: &str) -> Result<Vec<Genre>>;
}

/// TMDB-backed implementation of [`Catalog`]
///
/// Stateless apart from the pooled HTTP client; all caching happens in the
/// tree layer, which owns the cache-aside strategy.
///
/// # Examples
///
/// ```rust,no_run
/// use cinetmdb::TmdbClient;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = TmdbClient::from_config()?;
///     Ok(())
/// }
/// ```
pub struct TmdbClient {
    api: TmdbApi,
}

impl Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.api.base_url())
            .finish()
    }
}

impl TmdbClient {
    /// Creates a new client with default connection settings
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api: TmdbApi::new(api_key, base_url)?,
        })
    }

    /// Creates a new client with explicit connection settings
    pub fn with_settings(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        settings: ApiSettings,
    ) -> Result<Self> {
        Ok(Self {
            api: TmdbApi::with_settings(api_key, base_url, settings)?,
        })
    }

    /// Creates a client from the global cineconfig configuration
    pub fn from_config() -> Result<Self> {
        let config = cineconfig::get_config();
        Self::from_config_obj(config.as_ref())
    }

    /// Creates a client from a specific `Config` object
    pub fn from_config_obj(config: &Config) -> Result<Self> {
        let api_key = config.get_tmdb_api_key()?;
        let base_url = config.get_tmdb_base_url();

        let settings = ApiSettings {
            connect_timeout: Duration::from_secs(
                config.get_http_connect_timeout_seconds()? as u64
            ),
            request_timeout: Duration::from_secs(
                config.get_http_request_timeout_seconds()? as u64
            ),
            pool_max_per_host: config.get_http_pool_max_per_host()?,
        };

        info!(base_url = %base_url, "Creating TMDB client");
        Self::with_settings(api_key, base_url, settings)
    }
}

#[async_trait::async_trait]
impl Catalog for TmdbClient {
    async fn configuration(&self) -> Result<ImageConfiguration> {
        self.api.configuration().await
    }

    async fn movie(&self, movie_id: &str, language: &str) -> Result<MovieDetails> {
        self.api.movie(movie_id, language).await
    }

    async fn person(&self, person_id: &str, language: &str) -> Result<Person> {
        self.api.person(person_id, language).await
    }

    async fn credits(&self, movie_id: &str) -> Result<Credits> {
        self.api.movie_credits(movie_id).await
    }

    async fn discover(
        &self,
        year: i32,
        month: u32,
        sort: SortOrder,
        page: u32,
        language: &str,
    ) -> Result<DiscoverPage> {
        self.api.discover(year, month, sort, page, language).await
    }

    async fn search_movies(
        &self,
        query: &str,
        language: &str,
        page: u32,
    ) -> Result<DiscoverPage> {
        self.api.search_movies(query, language, page).await
    }

    async fn genres(&self, language: &str) -> Result<Vec<Genre>> {
        self.api.genres(language).await
    }
}
