//! Credits collection: cast and crew entries of one movie

use crate::cache::CatalogCache;
use crate::collections::absent_if_missing;
use crate::data::{PropertyMap, ProviderData, ResourceKind};
use crate::error::Result;
use cinetmdb::{CastMember, Catalog, CrewMember};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

/// Cache-aside access to movie credits
///
/// Credit entries are keyed `credits-{movieId}-cast_{personId}` and
/// `credits-{movieId}-crew_{personId}`. A person credited several times in
/// the same section (an actor with two roles, a crew member with two jobs)
/// yields one entry whose multi-valued properties carry every role.
pub struct CreditsCollection {
    catalog: Arc<dyn Catalog>,
    cache: CatalogCache,
}

impl CreditsCollection {
    pub fn new(catalog: Arc<dyn Catalog>, cache: CatalogCache) -> Self {
        Self { catalog, cache }
    }

    fn cast_record(movie_id: &str, member: &CastMember) -> ProviderData {
        let mut props = PropertyMap::new();
        props.set("person", member.id.clone());
        props.set_opt("character", member.character.as_deref());
        props.set_num("order", member.order);
        props.set_opt("profile_path", member.profile_path.as_deref());

        let mut data = ProviderData::new(
            format!("credits-{}-cast_{}", movie_id, member.id),
            ResourceKind::Cast,
            member.name.clone(),
        );
        data.properties = props.into_inner();
        data
    }

    fn crew_record(movie_id: &str, member: &CrewMember) -> ProviderData {
        let mut props = PropertyMap::new();
        props.set("person", member.id.clone());
        props.set_opt("job", member.job.as_deref());
        props.set_opt("department", member.department.as_deref());
        props.set_opt("profile_path", member.profile_path.as_deref());

        let mut data = ProviderData::new(
            format!("credits-{}-crew_{}", movie_id, member.id),
            ResourceKind::Crew,
            member.name.clone(),
        );
        data.properties = props.into_inner();
        data
    }

    /// Folds a repeated credit into the existing entry
    fn merge(existing: &mut ProviderData, fresh: ProviderData, multi: &[&str]) {
        for name in multi {
            let incoming = fresh.property(name).to_vec();
            for value in incoming {
                let values = existing.properties.entry(name.to_string()).or_default();
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
    }

    /// Lists the credit entry ids of one movie, cast first, then crew
    ///
    /// Stores each entry under its own id key and the ordered id list under
    /// `credits-list-{movieId}`; a subsequent [`get`](Self::get) for any
    /// listed entry is a guaranteed cache hit.
    pub async fn list_for_movie(&self, movie_id: &str) -> Result<Arc<Vec<String>>> {
        let scope = format!("credits-list-{}", movie_id);
        if let Some(ids) = self.cache.get_list(&scope).await {
            debug!("Credits for movie {} found in cache", movie_id);
            return Ok(ids);
        }

        let credits = match absent_if_missing(self.catalog.credits(movie_id).await)? {
            Some(credits) => credits,
            None => {
                let empty = Arc::new(Vec::new());
                self.cache.put_list(scope, empty.clone()).await;
                return Ok(empty);
            }
        };

        let mut entries: IndexMap<String, ProviderData> = IndexMap::new();
        for member in &credits.cast {
            let record = Self::cast_record(movie_id, member);
            match entries.get_mut(&record.id) {
                Some(existing) => Self::merge(existing, record, &["character"]),
                None => {
                    entries.insert(record.id.clone(), record);
                }
            }
        }
        for member in &credits.crew {
            let record = Self::crew_record(movie_id, member);
            match entries.get_mut(&record.id) {
                Some(existing) => Self::merge(existing, record, &["job", "department"]),
                None => {
                    entries.insert(record.id.clone(), record);
                }
            }
        }

        let mut ids = Vec::with_capacity(entries.len());
        for (id, record) in entries {
            ids.push(id.clone());
            self.cache.put_data(id, record).await;
        }

        let ids = Arc::new(ids);
        self.cache.put_list(scope, ids.clone()).await;
        Ok(ids)
    }

    /// Returns the credit records of one movie, in listing order
    pub async fn records_for_movie(&self, movie_id: &str) -> Result<Vec<ProviderData>> {
        let ids = self.list_for_movie(movie_id).await?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids.iter() {
            if let Some(record) = self.cache.get_data(id).await {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Returns one credit entry, populating the movie's credits on a miss
    ///
    /// `credit_key` is the `cast_{personId}` / `crew_{personId}` tail of the
    /// identifier.
    pub async fn get(&self, movie_id: &str, credit_key: &str) -> Result<Option<ProviderData>> {
        let id = format!("credits-{}-{}", movie_id, credit_key);
        if let Some(data) = self.cache.get_data(&id).await {
            return Ok(Some(data));
        }

        self.list_for_movie(movie_id).await?;
        Ok(self.cache.get_data(&id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(id: &str, name: &str, character: &str) -> CastMember {
        serde_json::from_str(&format!(
            r#"{{"id": {}, "name": "{}", "character": "{}"}}"#,
            id, name, character
        ))
        .unwrap()
    }

    #[test]
    fn test_cast_record_shape() {
        let record = CreditsCollection::cast_record("14", &cast("976", "Jason Statham", "Clay"));
        assert_eq!(record.id, "credits-14-cast_976");
        assert_eq!(record.kind, ResourceKind::Cast);
        assert_eq!(record.name, "Jason Statham");
        assert_eq!(record.property_first("person"), Some("976"));
        assert_eq!(record.property_first("character"), Some("Clay"));
    }

    #[test]
    fn test_repeated_credit_merges_roles() {
        let mut existing = CreditsCollection::cast_record("14", &cast("7", "A", "First Role"));
        let fresh = CreditsCollection::cast_record("14", &cast("7", "A", "Second Role"));
        CreditsCollection::merge(&mut existing, fresh, &["character"]);

        assert_eq!(
            existing.property("character"),
            ["First Role".to_string(), "Second Role".to_string()]
        );
    }
}
