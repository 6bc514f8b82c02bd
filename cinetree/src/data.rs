//! Canonical in-memory entities exchanged between collections, bindings and
//! the host tree store

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Resource kinds addressable in the virtual tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Root,
    Category,
    Year,
    Month,
    Movie,
    Cast,
    Crew,
    Genre,
    Person,
}

impl ResourceKind {
    /// Stable lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Root => "root",
            ResourceKind::Category => "category",
            ResourceKind::Year => "year",
            ResourceKind::Month => "month",
            ResourceKind::Movie => "movie",
            ResourceKind::Cast => "cast",
            ResourceKind::Crew => "crew",
            ResourceKind::Genre => "genre",
            ResourceKind::Person => "person",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical entity snapshot produced by a collection
///
/// Immutable once constructed: collections build the full property map and
/// hand the value out; nothing mutates a `ProviderData` after it has been
/// stored in the cache. Property values are ordered string arrays so that
/// multi-valued fields (genre lists, spoken languages) keep remote order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderData {
    /// Canonical resource identifier (`movie-123`, `pid-976`, ...)
    pub id: String,
    /// Resource kind
    pub kind: ResourceKind,
    /// Display name of the entity
    pub name: String,
    /// Ordered multi-valued properties
    pub properties: IndexMap<String, Vec<String>>,
}

impl ProviderData {
    /// Creates an entity with an empty property map
    pub fn new(id: impl Into<String>, kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    /// Returns the values of a property, empty when absent
    pub fn property(&self, name: &str) -> &[String] {
        self.properties.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first value of a property
    pub fn property_first(&self, name: &str) -> Option<&str> {
        self.property(name).first().map(String::as_str)
    }

    /// The raw key behind the id prefix (`movie-123` → `123`)
    ///
    /// Identifiers are `{prefix}-{key}`; this strips the first prefix only,
    /// so compound keys like `credits-14-crew_72102` keep their tail intact.
    pub fn raw_key(&self) -> &str {
        match self.id.split_once('-') {
            Some((_, key)) => key,
            None => &self.id,
        }
    }
}

/// Collector used while building a property map
///
/// Enforces the serialization conventions shared by every collection:
/// absent optional fields are omitted (never stored as empty strings), and
/// numbers are stringified with non-locale-sensitive formatting.
#[derive(Debug, Default)]
pub(crate) struct PropertyMap {
    map: IndexMap<String, Vec<String>>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a single-valued property
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.map.insert(name.to_string(), vec![value.into()]);
    }

    /// Stores a single-valued property when present and non-empty
    pub fn set_opt(&mut self, name: &str, value: Option<&str>) {
        if let Some(v) = value {
            if !v.is_empty() {
                self.set(name, v);
            }
        }
    }

    /// Stores a stringified number when present
    pub fn set_num<T: ToString>(&mut self, name: &str, value: Option<T>) {
        if let Some(v) = value {
            self.set(name, v.to_string());
        }
    }

    /// Stores a multi-valued property when non-empty
    pub fn set_multi(&mut self, name: &str, values: Vec<String>) {
        if !values.is_empty() {
            self.map.insert(name.to_string(), values);
        }
    }

    /// Stores a date property in canonical form when the input parses
    pub fn set_date(&mut self, name: &str, value: Option<&str>) {
        if let Some(formatted) = value.and_then(format_date) {
            self.set(name, formatted);
        }
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.map
    }
}

/// Canonicalizes a `YYYY-MM-DD` date into the tree's date convention
///
/// All dates in property maps are serialized as
/// `YYYY-MM-DDT00:00:00.000+00:00`. Unparsable input yields `None` so the
/// property is omitted rather than stored malformed.
pub fn format_date(date: &str) -> Option<String> {
    let parsed = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(format!("{}T00:00:00.000+00:00", parsed.format("%Y-%m-%d")))
}

/// Extracts `(year, month)` path segments from a canonical date property
///
/// Returns `("0000", "00")` when the entity has no usable release date, the
/// permanent fallback branch for unknown-date movies.
pub fn date_segments(date: Option<&str>) -> (String, String) {
    if let Some(date) = date {
        if let (Some(year), Some(sep), Some(month)) =
            (date.get(..4), date.get(4..5), date.get(5..7))
        {
            if sep == "-"
                && year.chars().all(|c| c.is_ascii_digit())
                && month.chars().all(|c| c.is_ascii_digit())
            {
                return (year.to_string(), month.to_string());
            }
        }
    }
    ("0000".to_string(), "00".to_string())
}

/// Host-facing record for one resolved node
///
/// This is everything the host tree store gets: the identifier, the resolved
/// browsing path, the eager properties, and the names of properties that are
/// deliberately deferred (overall and per locale).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub path: String,
    pub kind: ResourceKind,
    pub name: String,
    pub properties: IndexMap<String, Vec<String>>,
    /// Properties resolvable only through `get_property`
    pub lazy_properties: Vec<String>,
    /// Locale → localized properties resolvable through `get_property`
    pub lazy_i18n_properties: IndexMap<String, Vec<String>>,
}

impl NodeRecord {
    /// Returns the values of a property, empty when absent
    pub fn property(&self, name: &str) -> &[String] {
        self.properties.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first value of a property
    pub fn property_first(&self, name: &str) -> Option<&str> {
        self.property(name).first().map(String::as_str)
    }

    /// Builds a record by combining entity data with its resolved path
    pub fn from_data(data: ProviderData, path: String) -> Self {
        Self {
            id: data.id,
            path,
            kind: data.kind,
            name: data.name,
            properties: data.properties,
            lazy_properties: Vec::new(),
            lazy_i18n_properties: IndexMap::new(),
        }
    }

    /// Declares deferred property names
    pub fn with_lazy(mut self, lazy: Vec<String>) -> Self {
        self.lazy_properties = lazy;
        self
    }

    /// Declares deferred localized property names for one locale
    pub fn with_lazy_i18n(mut self, locale: &str, names: Vec<String>) -> Self {
        if !names.is_empty() {
            self.lazy_i18n_properties.insert(locale.to_string(), names);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date("1999-09-15").unwrap(),
            "1999-09-15T00:00:00.000+00:00"
        );
        assert!(format_date("not-a-date").is_none());
        assert!(format_date("1999-13-01").is_none());
    }

    #[test]
    fn test_date_segments() {
        assert_eq!(
            date_segments(Some("1999-09-15T00:00:00.000+00:00")),
            ("1999".to_string(), "09".to_string())
        );
        assert_eq!(date_segments(None), ("0000".to_string(), "00".to_string()));
        assert_eq!(
            date_segments(Some("garbage")),
            ("0000".to_string(), "00".to_string())
        );
    }

    #[test]
    fn test_property_map_omits_absent_values() {
        let mut props = PropertyMap::new();
        props.set_opt("tagline", None);
        props.set_opt("overview", Some(""));
        props.set_opt("title", Some("American Beauty"));
        props.set_num::<u64>("budget", None);

        let map = props.into_inner();
        assert_eq!(map.len(), 1);
        assert_eq!(map["title"], vec!["American Beauty"]);
    }

    #[test]
    fn test_property_map_preserves_order() {
        let mut props = PropertyMap::new();
        props.set("title", "a");
        props.set("release_date", "b");
        props.set("overview", "c");

        let keys: Vec<_> = props.into_inner().keys().cloned().collect();
        assert_eq!(keys, vec!["title", "release_date", "overview"]);
    }

    #[test]
    fn test_raw_key() {
        let data = ProviderData::new("movie-123", ResourceKind::Movie, "x");
        assert_eq!(data.raw_key(), "123");

        let data = ProviderData::new("credits-14-crew_72102", ResourceKind::Crew, "x");
        assert_eq!(data.raw_key(), "14-crew_72102");
    }
}
