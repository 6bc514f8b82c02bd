//! Person collection: detail fetch and localized properties

use crate::cache::CatalogCache;
use crate::collections::absent_if_missing;
use crate::data::{ProviderData, ResourceKind};
use crate::error::{Result, TreeError};
use crate::events::{IndexingEvent, IndexingNotifier};
use cinetmdb::{Catalog, Person};
use std::sync::Arc;
use tracing::debug;

type Extractor = fn(&Person) -> Option<Vec<String>>;

fn one(value: String) -> Vec<String> {
    vec![value]
}

/// Explicit property table for persons
pub(crate) static PERSON_PROPERTIES: &[(&str, Extractor)] = &[
    ("name", |p| Some(one(p.name.clone()))),
    ("biography", |p| {
        p.biography.clone().filter(|b| !b.is_empty()).map(one)
    }),
    ("birthday", |p| {
        p.birthday.as_deref().and_then(crate::data::format_date).map(one)
    }),
    ("deathday", |p| {
        p.deathday.as_deref().and_then(crate::data::format_date).map(one)
    }),
    ("place_of_birth", |p| p.place_of_birth.clone().map(one)),
    ("profile_path", |p| p.profile_path.clone().map(one)),
    ("known_for_department", |p| {
        p.known_for_department.clone().map(one)
    }),
    ("popularity", |p| p.popularity.map(|v| one(v.to_string()))),
    ("also_known_as", |p| {
        (!p.also_known_as.is_empty()).then(|| p.also_known_as.clone())
    }),
    ("imdb_id", |p| p.imdb_id.clone().map(one)),
    ("homepage", |p| {
        p.homepage.clone().filter(|h| !h.is_empty()).map(one)
    }),
];

/// Localized properties, refetched per locale on demand
pub(crate) const PERSON_I18N_PROPERTIES: &[&str] = &["biography"];

/// Cache-aside access to persons
pub struct PersonCollection {
    catalog: Arc<dyn Catalog>,
    cache: CatalogCache,
    notifier: IndexingNotifier,
    language: String,
}

impl PersonCollection {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        cache: CatalogCache,
        notifier: IndexingNotifier,
        language: String,
    ) -> Self {
        Self {
            catalog,
            cache,
            notifier,
            language,
        }
    }

    /// Builds the record for a person snapshot, walking the property table
    pub(crate) fn person_record(person: &Person) -> ProviderData {
        let mut data = ProviderData::new(
            format!("pid-{}", person.id),
            ResourceKind::Person,
            person.name.clone(),
        );
        for (name, extract) in PERSON_PROPERTIES {
            if let Some(values) = extract(person) {
                data.properties.insert(name.to_string(), values);
            }
        }
        data
    }

    /// Returns a person record, fetching on a cold cache
    pub async fn get(&self, person_id: &str) -> Result<Option<ProviderData>> {
        let key = format!("pid-{}", person_id);
        if let Some(data) = self.cache.get_data(&key).await {
            debug!("Person {} found in cache", person_id);
            return Ok(Some(data));
        }

        match self.details(person_id, &self.language).await? {
            Some(person) => Ok(Some(Self::person_record(&person))),
            None => Ok(None),
        }
    }

    /// Returns the raw person snapshot for a locale, cache-aside
    ///
    /// The first successful fetch in the tree's own language also populates
    /// the data region and emits one indexing event for the entity.
    pub async fn details(&self, person_id: &str, locale: &str) -> Result<Option<Arc<Person>>> {
        let snapshot_key = format!("{}:{}", person_id, locale);
        if let Some(person) = self.cache.get_person_details(&snapshot_key).await {
            return Ok(Some(person));
        }

        let person = match absent_if_missing(self.catalog.person(person_id, locale).await)? {
            Some(person) => Arc::new(person),
            None => return Ok(None),
        };

        self.cache
            .put_person_details(snapshot_key, person.clone())
            .await;

        if locale == self.language {
            let record = Self::person_record(&person);
            let id = record.id.clone();
            let path = format!("/persons/{}", person.id);
            self.cache.put_data(id.clone(), record).await;
            self.notifier.notify(IndexingEvent {
                id,
                path,
                kind: ResourceKind::Person,
            });
        }

        Ok(Some(person))
    }

    /// Resolves one property for a person and locale
    pub async fn property(
        &self,
        person_id: &str,
        locale: &str,
        name: &str,
    ) -> Result<Vec<String>> {
        if locale == self.language {
            if let Some(data) = self.cache.get_data(&format!("pid-{}", person_id)).await {
                let values = data.property(name);
                if !values.is_empty() {
                    return Ok(values.to_vec());
                }
            }
        }

        let Some((_, extract)) = PERSON_PROPERTIES.iter().find(|(n, _)| *n == name) else {
            return Ok(Vec::new());
        };

        match self.details(person_id, locale).await? {
            Some(person) => Ok(extract(&person).unwrap_or_default()),
            None => Err(TreeError::NotFound(format!("pid-{}", person_id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_record_follows_property_table() {
        let person: Person = serde_json::from_str(
            r#"{
                "id": 976,
                "name": "Jason Statham",
                "birthday": "1967-07-26",
                "known_for_department": "Acting",
                "also_known_as": ["Джейсон Стэтхэм"]
            }"#,
        )
        .unwrap();
        let record = PersonCollection::person_record(&person);

        assert_eq!(record.id, "pid-976");
        assert_eq!(record.kind, ResourceKind::Person);
        assert_eq!(
            record.property_first("birthday"),
            Some("1967-07-26T00:00:00.000+00:00")
        );
        assert_eq!(record.property("also_known_as").len(), 1);
        assert!(record.property_first("deathday").is_none());
    }

    #[test]
    fn test_i18n_properties_are_in_the_table() {
        for name in PERSON_I18N_PROPERTIES {
            assert!(PERSON_PROPERTIES.iter().any(|(n, _)| n == name));
        }
    }
}
