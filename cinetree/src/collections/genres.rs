//! Genre collection: the full genre list, slug resolution

use crate::cache::CatalogCache;
use crate::collections::absent_if_missing;
use crate::data::{PropertyMap, ProviderData, ResourceKind};
use crate::error::Result;
use cinetmdb::{Catalog, Genre};
use std::sync::Arc;
use tracing::debug;

const GENRES_SCOPE: &str = "genres-list";

/// Cache-aside access to the genre table
///
/// The whole genre list comes from one remote call and is cached as a unit
/// under `genres-list`, with every genre record warmed under its `gid-{n}`
/// key. Slug resolution works against that cached table, so repeated path
/// lookups cost no network once the table is in.
pub struct GenreCollection {
    catalog: Arc<dyn Catalog>,
    cache: CatalogCache,
    language: String,
}

impl GenreCollection {
    pub fn new(catalog: Arc<dyn Catalog>, cache: CatalogCache, language: String) -> Self {
        Self {
            catalog,
            cache,
            language,
        }
    }

    fn genre_record(genre: &Genre) -> ProviderData {
        let mut props = PropertyMap::new();
        props.set("name", genre.name.clone());
        props.set("slug", genre.slug());

        let mut data = ProviderData::new(
            format!("gid-{}", genre.id),
            ResourceKind::Genre,
            genre.name.clone(),
        );
        data.properties = props.into_inner();
        data
    }

    /// Lists every genre id, warming the per-genre records
    pub async fn list(&self) -> Result<Arc<Vec<String>>> {
        if let Some(ids) = self.cache.get_list(GENRES_SCOPE).await {
            debug!("Genre list found in cache");
            return Ok(ids);
        }

        let genres = absent_if_missing(self.catalog.genres(&self.language).await)?
            .unwrap_or_default();

        let mut ids = Vec::with_capacity(genres.len());
        for genre in &genres {
            let record = Self::genre_record(genre);
            ids.push(record.id.clone());
            self.cache.put_data(record.id.clone(), record).await;
        }

        let ids = Arc::new(ids);
        self.cache.put_list(GENRES_SCOPE.to_string(), ids.clone()).await;
        Ok(ids)
    }

    /// Returns the records of every genre, in remote order
    pub async fn records(&self) -> Result<Vec<ProviderData>> {
        let ids = self.list().await?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids.iter() {
            if let Some(record) = self.cache.get_data(id).await {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Returns one genre record by its `gid-{n}` identifier
    pub async fn get(&self, id: &str) -> Result<Option<ProviderData>> {
        if let Some(data) = self.cache.get_data(id).await {
            return Ok(Some(data));
        }

        self.list().await?;
        Ok(self.cache.get_data(id).await)
    }

    /// Resolves a path slug to a `gid-{n}` identifier
    pub async fn id_for_slug(&self, slug: &str) -> Result<Option<String>> {
        for record in self.records().await? {
            if record.property_first("slug") == Some(slug) {
                return Ok(Some(record.id));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_record_shape() {
        let genre = Genre {
            id: 878,
            name: "Science Fiction".to_string(),
        };
        let record = GenreCollection::genre_record(&genre);

        assert_eq!(record.id, "gid-878");
        assert_eq!(record.kind, ResourceKind::Genre);
        assert_eq!(record.name, "Science Fiction");
        assert_eq!(record.property_first("slug"), Some("science-fiction"));
    }
}
