//! Catalog endpoint wrappers (movies, persons, credits, genres, discovery)

use super::TmdbApi;
use crate::error::{Result, TmdbError};
use crate::models::*;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

/// Response of the `/configuration` endpoint
#[derive(Debug, Deserialize)]
struct ConfigurationResponse {
    images: ImageConfiguration,
}

/// Response of the `/genre/movie/list` endpoint
#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}

/// First and last day of a calendar month, for discovery date ranges
fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TmdbError::Other(format!("Invalid month {:04}-{:02}", year, month)))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| TmdbError::Other(format!("Invalid month {:04}-{:02}", year, month)))?;
    let last = next_first
        .pred_opt()
        .ok_or_else(|| TmdbError::Other(format!("Invalid month {:04}-{:02}", year, month)))?;
    Ok((first, last))
}

impl TmdbApi {
    /// Fetches the global image configuration
    pub async fn configuration(&self) -> Result<ImageConfiguration> {
        debug!("Fetching configuration");
        let response: ConfigurationResponse = self.get("/configuration", &[]).await?;
        Ok(response.images)
    }

    /// Fetches full movie details
    pub async fn movie(&self, movie_id: &str, language: &str) -> Result<MovieDetails> {
        debug!("Fetching movie {}", movie_id);
        let params = [("language", language)];
        self.get(&format!("/movie/{}", movie_id), &params).await
    }

    /// Fetches the cast and crew of a movie
    pub async fn movie_credits(&self, movie_id: &str) -> Result<Credits> {
        debug!("Fetching credits for movie {}", movie_id);
        self.get(&format!("/movie/{}/credits", movie_id), &[]).await
    }

    /// Fetches person details
    pub async fn person(&self, person_id: &str, language: &str) -> Result<Person> {
        debug!("Fetching person {}", person_id);
        let params = [("language", language)];
        self.get(&format!("/person/{}", person_id), &params).await
    }

    /// Fetches the list of movie genres
    pub async fn genres(&self, language: &str) -> Result<Vec<Genre>> {
        debug!("Fetching genre list");
        let params = [("language", language)];
        let response: GenreListResponse = self.get("/genre/movie/list", &params).await?;
        Ok(response.genres)
    }

    /// Fetches one discovery page of movies released within a calendar month
    ///
    /// The caller is responsible for iterating pages until
    /// [`DiscoverPage::is_last`] reports the end of the result set.
    pub async fn discover(
        &self,
        year: i32,
        month: u32,
        sort: SortOrder,
        page: u32,
        language: &str,
    ) -> Result<DiscoverPage> {
        let (first, last) = month_bounds(year, month)?;
        let gte = first.format("%Y-%m-%d").to_string();
        let lte = last.format("%Y-%m-%d").to_string();
        let page_str = page.to_string();

        debug!(
            "Discovering movies {}..{} sort={} page={}",
            gte,
            lte,
            sort.api_id(),
            page
        );

        let params = [
            ("primary_release_date.gte", gte.as_str()),
            ("primary_release_date.lte", lte.as_str()),
            ("sort_by", sort.api_id()),
            ("page", page_str.as_str()),
            ("language", language),
        ];
        self.get("/discover/movie", &params).await
    }

    /// Searches movies by title
    pub async fn search_movies(
        &self,
        query: &str,
        language: &str,
        page: u32,
    ) -> Result<DiscoverPage> {
        debug!("Searching movies for '{}' page={}", query, page);
        let page_str = page.to_string();
        let params = [
            ("query", query),
            ("language", language),
            ("page", page_str.as_str()),
        ];
        self.get("/search/movie", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let (first, last) = month_bounds(2024, 1).unwrap();
        assert_eq!(first.to_string(), "2024-01-01");
        assert_eq!(last.to_string(), "2024-01-31");

        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first.to_string(), "2024-02-01");
        assert_eq!(last.to_string(), "2024-02-29");

        let (first, last) = month_bounds(2023, 12).unwrap();
        assert_eq!(first.to_string(), "2023-12-01");
        assert_eq!(last.to_string(), "2023-12-31");
    }

    #[test]
    fn test_month_bounds_invalid() {
        assert!(month_bounds(2024, 13).is_err());
        assert!(month_bounds(2024, 0).is_err());
    }
}
