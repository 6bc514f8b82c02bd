//! Movie collection: discovery listing, detail fetch, lazy properties

use crate::cache::CatalogCache;
use crate::collections::absent_if_missing;
use crate::data::{date_segments, PropertyMap, ProviderData, ResourceKind};
use crate::error::{Result, TreeError};
use crate::events::{IndexingEvent, IndexingNotifier};
use crate::path::PathBuilder;
use cinetmdb::{Catalog, MovieDetails, MovieSummary, SortOrder};
use std::sync::Arc;
use tracing::{debug, warn};

type Extractor = fn(&MovieDetails) -> Option<Vec<String>>;

fn one(value: String) -> Vec<String> {
    vec![value]
}

/// Explicit property table for movies: every supported property name and the
/// function extracting it from a detail snapshot. Replaces the getter-name
/// reflection of older providers; the set of supported properties is this
/// table, nothing else.
pub(crate) static MOVIE_PROPERTIES: &[(&str, Extractor)] = &[
    ("title", |m| Some(one(m.title.clone()))),
    ("original_title", |m| m.original_title.clone().map(one)),
    ("original_language", |m| {
        m.original_language.clone().map(one)
    }),
    ("overview", |m| m.overview.clone().map(one)),
    ("release_date", |m| {
        m.release_date.as_deref().and_then(crate::data::format_date).map(one)
    }),
    ("poster_path", |m| m.poster_path.clone().map(one)),
    ("backdrop_path", |m| m.backdrop_path.clone().map(one)),
    ("vote_average", |m| m.vote_average.map(|v| one(v.to_string()))),
    ("vote_count", |m| m.vote_count.map(|v| one(v.to_string()))),
    ("popularity", |m| m.popularity.map(|v| one(v.to_string()))),
    ("adult", |m| Some(one(m.adult.to_string()))),
    ("budget", |m| {
        m.budget.filter(|b| *b > 0).map(|b| one(b.to_string()))
    }),
    ("revenue", |m| {
        m.revenue.filter(|r| *r > 0).map(|r| one(r.to_string()))
    }),
    ("runtime", |m| m.runtime.map(|r| one(r.to_string()))),
    ("tagline", |m| {
        m.tagline.clone().filter(|t| !t.is_empty()).map(one)
    }),
    ("homepage", |m| {
        m.homepage.clone().filter(|h| !h.is_empty()).map(one)
    }),
    ("imdb_id", |m| m.imdb_id.clone().map(one)),
    ("status", |m| m.status.clone().map(one)),
    ("genres", |m| {
        let names: Vec<String> = m.genres.iter().map(|g| g.name.clone()).collect();
        (!names.is_empty()).then_some(names)
    }),
    ("production_companies", |m| {
        let names: Vec<String> = m.production_companies.iter().map(|c| c.name.clone()).collect();
        (!names.is_empty()).then_some(names)
    }),
    ("spoken_languages", |m| {
        let names: Vec<String> = m.spoken_languages.iter().map(|l| l.name.clone()).collect();
        (!names.is_empty()).then_some(names)
    }),
];

/// Properties excluded from the eager discovery record, resolved on demand
pub(crate) const MOVIE_LAZY_PROPERTIES: &[&str] = &[
    "budget",
    "revenue",
    "runtime",
    "tagline",
    "homepage",
    "imdb_id",
    "status",
    "genres",
    "production_companies",
    "spoken_languages",
];

/// Localized properties, refetched per locale on demand
pub(crate) const MOVIE_I18N_PROPERTIES: &[&str] = &["title", "overview", "tagline"];

/// Derives the canonical browsing path of a movie record
///
/// `/movies/{yyyy}/{yyyy}-{mm}/{id}`, falling back to the permanent
/// `/movies/0000/0000-00/{id}` branch when no release date is known.
pub(crate) fn movie_path(data: &ProviderData) -> String {
    let (year, month) = date_segments(data.property_first("release_date"));
    let mut builder = PathBuilder::new();
    builder
        .append("movies")
        .append(&year)
        .append(&format!("{}-{}", year, month))
        .append(data.raw_key());
    builder.build()
}

/// Cache-aside access to movies
pub struct MovieCollection {
    catalog: Arc<dyn Catalog>,
    cache: CatalogCache,
    notifier: IndexingNotifier,
    language: String,
    page_limit: usize,
}

impl MovieCollection {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        cache: CatalogCache,
        notifier: IndexingNotifier,
        language: String,
        page_limit: usize,
    ) -> Self {
        Self {
            catalog,
            cache,
            notifier,
            language,
            page_limit,
        }
    }

    /// Builds the eager record for one discovery result
    pub(crate) fn summary_record(summary: &MovieSummary) -> ProviderData {
        let mut props = PropertyMap::new();
        props.set("title", summary.title.clone());
        props.set_opt("original_title", summary.original_title.as_deref());
        props.set_opt("original_language", summary.original_language.as_deref());
        props.set_opt("overview", summary.overview.as_deref());
        props.set_date("release_date", summary.release_date.as_deref());
        props.set_opt("poster_path", summary.poster_path.as_deref());
        props.set_opt("backdrop_path", summary.backdrop_path.as_deref());
        props.set_num("vote_average", summary.vote_average);
        props.set_num("vote_count", summary.vote_count);
        props.set_num("popularity", summary.popularity);
        props.set("adult", summary.adult.to_string());

        let mut data = ProviderData::new(
            format!("movie-{}", summary.id),
            ResourceKind::Movie,
            summary.title.clone(),
        );
        data.properties = props.into_inner();
        data
    }

    /// Builds the full record for a detail snapshot
    ///
    /// Walks the property table so that the record and `get_property` can
    /// never disagree on a value.
    pub(crate) fn detail_record(details: &MovieDetails) -> ProviderData {
        let mut data = ProviderData::new(
            format!("movie-{}", details.id),
            ResourceKind::Movie,
            details.title.clone(),
        );
        for (name, extract) in MOVIE_PROPERTIES {
            if let Some(values) = extract(details) {
                data.properties.insert(name.to_string(), values);
            }
        }
        data
    }

    /// Returns a movie record, fetching details on a cold cache
    ///
    /// Records pre-warmed by [`list_month`](Self::list_month) are returned
    /// unchanged without any remote call.
    pub async fn get(&self, movie_id: &str) -> Result<Option<ProviderData>> {
        let key = format!("movie-{}", movie_id);
        if let Some(data) = self.cache.get_data(&key).await {
            debug!("Movie {} found in cache", movie_id);
            return Ok(Some(data));
        }

        match self.details(movie_id, &self.language).await? {
            Some(details) => Ok(Some(Self::detail_record(&details))),
            None => Ok(None),
        }
    }

    /// Returns the raw detail snapshot for a movie and locale, cache-aside
    ///
    /// On the first successful fetch in the tree's own language the full
    /// record replaces any eager record in the data region and one indexing
    /// event is emitted for the entity.
    pub async fn details(
        &self,
        movie_id: &str,
        locale: &str,
    ) -> Result<Option<Arc<MovieDetails>>> {
        let snapshot_key = format!("{}:{}", movie_id, locale);
        if let Some(details) = self.cache.get_movie_details(&snapshot_key).await {
            return Ok(Some(details));
        }

        let details = match absent_if_missing(self.catalog.movie(movie_id, locale).await)? {
            Some(details) => Arc::new(details),
            None => return Ok(None),
        };

        self.cache
            .put_movie_details(snapshot_key, details.clone())
            .await;

        if locale == self.language {
            let record = Self::detail_record(&details);
            let path = movie_path(&record);
            let id = record.id.clone();
            self.cache.put_data(id.clone(), record).await;
            self.notifier.notify(IndexingEvent {
                id,
                path,
                kind: ResourceKind::Movie,
            });
        }

        Ok(Some(details))
    }

    /// Lists the movies released in one calendar month, fully paginated
    ///
    /// Fetches discovery pages in order until the remote reports the last
    /// page, stores every returned movie under its own id key and the
    /// ordered id list under `movies-folder-{year}-{month}`, then returns
    /// the ids. Partial pages never escape this method.
    pub async fn list_month(&self, year: i32, month: u32) -> Result<Arc<Vec<String>>> {
        let scope = format!("movies-folder-{:04}-{:02}", year, month);
        if let Some(ids) = self.cache.get_list(&scope).await {
            debug!("Month listing {} found in cache", scope);
            return Ok(ids);
        }

        let mut ids = Vec::new();
        let mut page = 1u32;
        loop {
            let result = self
                .catalog
                .discover(year, month, SortOrder::PrimaryReleaseDateAsc, page, &self.language)
                .await;
            let current = match absent_if_missing(result)? {
                Some(current) => current,
                None => break,
            };

            for summary in &current.results {
                let record = Self::summary_record(summary);
                ids.push(record.id.clone());
                self.cache.put_data(record.id.clone(), record).await;
            }

            if current.is_last() {
                break;
            }
            page += 1;
            if self.page_limit > 0 && page as usize > self.page_limit {
                warn!(
                    "Discovery for {} capped at {} of {} pages; remaining pages dropped",
                    scope, self.page_limit, current.total_pages
                );
                break;
            }
        }

        let ids = Arc::new(ids);
        self.cache.put_list(scope, ids.clone()).await;
        Ok(ids)
    }

    /// Resolves one property for a movie and locale
    ///
    /// Eager properties in the tree's language come straight from the cached
    /// record; anything else goes through the detail snapshot and the
    /// property table. Unsupported names yield an empty result.
    pub async fn property(
        &self,
        movie_id: &str,
        locale: &str,
        name: &str,
    ) -> Result<Vec<String>> {
        if locale == self.language {
            if let Some(data) = self.cache.get_data(&format!("movie-{}", movie_id)).await {
                let values = data.property(name);
                if !values.is_empty() {
                    return Ok(values.to_vec());
                }
            }
        }

        let Some((_, extract)) = MOVIE_PROPERTIES.iter().find(|(n, _)| *n == name) else {
            return Ok(Vec::new());
        };

        match self.details(movie_id, locale).await? {
            Some(details) => Ok(extract(&details).unwrap_or_default()),
            None => Err(TreeError::NotFound(format!("movie-{}", movie_id))),
        }
    }

    /// Searches movies by title, warming the per-id cache for every hit
    pub async fn search(&self, query: &str) -> Result<Vec<ProviderData>> {
        let mut records = Vec::new();
        let mut page = 1u32;
        loop {
            let result = self
                .catalog
                .search_movies(query, &self.language, page)
                .await;
            let current = match absent_if_missing(result)? {
                Some(current) => current,
                None => break,
            };

            for summary in &current.results {
                let record = Self::summary_record(summary);
                self.cache
                    .put_data(record.id.clone(), record.clone())
                    .await;
                records.push(record);
            }

            if current.is_last() {
                break;
            }
            page += 1;
            if self.page_limit > 0 && page as usize > self.page_limit {
                warn!(
                    "Search for '{}' capped at {} of {} pages; remaining pages dropped",
                    query, self.page_limit, current.total_pages
                );
                break;
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> MovieDetails {
        serde_json::from_str(
            r#"{
                "id": 14,
                "title": "American Beauty",
                "release_date": "1999-09-15",
                "runtime": 122,
                "budget": 15000000,
                "revenue": 356296601,
                "tagline": "Look closer.",
                "vote_average": 8.0,
                "genres": [{"id": 18, "name": "Drama"}],
                "spoken_languages": [{"iso_639_1": "en", "name": "English"}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_detail_record_follows_property_table() {
        let record = MovieCollection::detail_record(&details());

        assert_eq!(record.id, "movie-14");
        assert_eq!(record.kind, ResourceKind::Movie);
        assert_eq!(
            record.property_first("release_date"),
            Some("1999-09-15T00:00:00.000+00:00")
        );
        assert_eq!(record.property_first("runtime"), Some("122"));
        assert_eq!(record.property("genres"), ["Drama".to_string()]);
        // Absent optionals are omitted, not empty
        assert!(record.property_first("homepage").is_none());
    }

    #[test]
    fn test_zero_budget_is_treated_as_unknown() {
        let mut movie = details();
        movie.budget = Some(0);
        let record = MovieCollection::detail_record(&movie);
        assert!(record.property_first("budget").is_none());
    }

    #[test]
    fn test_movie_path_from_release_date() {
        let record = MovieCollection::detail_record(&details());
        assert_eq!(movie_path(&record), "/movies/1999/1999-09/14");
    }

    #[test]
    fn test_movie_path_without_release_date() {
        let movie: MovieDetails =
            serde_json::from_str(r#"{"id": 42, "title": "Unscheduled"}"#).unwrap();
        let record = MovieCollection::detail_record(&movie);
        assert_eq!(movie_path(&record), "/movies/0000/0000-00/42");
    }

    #[test]
    fn test_every_lazy_property_is_in_the_table() {
        for name in MOVIE_LAZY_PROPERTIES {
            assert!(
                MOVIE_PROPERTIES.iter().any(|(n, _)| n == name),
                "lazy property {} missing from table",
                name
            );
        }
        for name in MOVIE_I18N_PROPERTIES {
            assert!(MOVIE_PROPERTIES.iter().any(|(n, _)| n == name));
        }
    }

    #[test]
    fn test_summary_record_numbers_are_stringified() {
        let summary: MovieSummary = serde_json::from_str(
            r#"{"id": 866398, "title": "The Beekeeper", "release_date": "2024-01-10",
                "vote_average": 7.1, "vote_count": 2300}"#,
        )
        .unwrap();
        let record = MovieCollection::summary_record(&summary);

        assert_eq!(record.id, "movie-866398");
        assert_eq!(record.property_first("vote_average"), Some("7.1"));
        assert_eq!(record.property_first("vote_count"), Some("2300"));
        assert_eq!(record.property_first("adult"), Some("false"));
    }
}
