//! Data structures representing TMDB catalog objects

use serde::{Deserialize, Deserializer, Serialize};

/// Flexible deserializer for IDs that may arrive as strings or integers
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::custom("ID must be a string or number")),
    }
}

/// Image configuration advertised by the TMDB `/configuration` endpoint
///
/// Full image URLs are assembled as `{secure_base_url}{size}{path}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageConfiguration {
    /// HTTPS base URL for image assets
    pub secure_base_url: String,
    /// Available poster sizes (e.g., "w92", "w500", "original")
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    /// Available profile (person photo) sizes
    #[serde(default)]
    pub profile_sizes: Vec<String>,
    /// Available backdrop sizes
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
}

impl ImageConfiguration {
    /// Builds a full image URL for a relative asset path
    ///
    /// Returns `None` for empty paths.
    pub fn image_url(&self, size: &str, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        Some(format!("{}{}{}", self.secure_base_url, size, path))
    }
}

/// A movie genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    /// Numeric TMDB genre identifier
    pub id: u32,
    /// Localized genre name
    pub name: String,
}

impl Genre {
    /// URL-friendly slug for this genre, derived from its name
    ///
    /// Lowercase, with every non-alphanumeric run collapsed to a single `-`
    /// and no leading or trailing `-`.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        let mut pending_dash = false;
        for c in self.name.chars() {
            if c.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                for lc in c.to_lowercase() {
                    slug.push(lc);
                }
            } else {
                pending_dash = true;
            }
        }
        slug
    }
}

/// The subset of movie attributes returned by discovery and search pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Unique movie identifier
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Localized title
    pub title: String,
    /// Original (untranslated) title
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1)
    #[serde(default)]
    pub original_language: Option<String>,
    /// Plot overview
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date (`YYYY-MM-DD`), absent for unscheduled titles
    #[serde(default)]
    pub release_date: Option<String>,
    /// Relative poster asset path
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Relative backdrop asset path
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Average vote (0..10)
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Number of votes
    #[serde(default)]
    pub vote_count: Option<u64>,
    /// Popularity score
    #[serde(default)]
    pub popularity: Option<f64>,
    /// Adult flag
    #[serde(default)]
    pub adult: bool,
    /// Genre ids (the full genre objects require a detail fetch)
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// A production company credited on a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCompany {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
}

/// A spoken language credited on a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpokenLanguage {
    /// ISO 639-1 code
    pub iso_639_1: String,
    pub name: String,
}

/// Full movie details, returned by `/movie/{id}`
///
/// Everything beyond [`MovieSummary`] is only available here; the tree layer
/// treats those attributes as lazy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    /// Unique movie identifier
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Localized title
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub adult: bool,
    /// Budget in USD; TMDB reports 0 for unknown
    #[serde(default)]
    pub budget: Option<u64>,
    /// Revenue in USD; TMDB reports 0 for unknown
    #[serde(default)]
    pub revenue: Option<u64>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Release status (Rumored, Planned, Released, ...)
    #[serde(default)]
    pub status: Option<String>,
    /// Resolved genre objects
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
}

impl MovieDetails {
    /// The four-digit release year, if a release date is known
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next()?.parse().ok())
    }
}

/// A cast credit on a movie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    /// Person identifier of the credited actor
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Actor name
    pub name: String,
    /// Character played
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order
    #[serde(default)]
    pub order: Option<u32>,
    /// Relative profile photo path
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A crew credit on a movie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    /// Person identifier of the credited crew member
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Crew member name
    pub name: String,
    /// Job title (Director, Editor, ...)
    #[serde(default)]
    pub job: Option<String>,
    /// Department (Directing, Writing, ...)
    #[serde(default)]
    pub department: Option<String>,
    /// Relative profile photo path
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Cast and crew of one movie, returned by `/movie/{id}/credits`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    /// Movie identifier the credits belong to
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A person (actor, director, ...), returned by `/person/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique person identifier
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Person name
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    /// Birth date (`YYYY-MM-DD`)
    #[serde(default)]
    pub birthday: Option<String>,
    /// Death date (`YYYY-MM-DD`), absent for living persons
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub also_known_as: Vec<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

/// One page of a paginated discovery or search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverPage {
    /// 1-based page number
    pub page: u32,
    /// Total number of pages for the query
    pub total_pages: u32,
    /// Total number of matching movies
    #[serde(default)]
    pub total_results: u64,
    /// Movies on this page
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

impl DiscoverPage {
    /// Whether this is the last page of the result set
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// Sort orders accepted by the discovery endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest release first
    PrimaryReleaseDateAsc,
    /// Newest release first
    PrimaryReleaseDateDesc,
    /// Most popular first
    PopularityDesc,
}

impl SortOrder {
    /// Returns the API identifier for this sort order
    pub fn api_id(&self) -> &'static str {
        match self {
            Self::PrimaryReleaseDateAsc => "primary_release_date.asc",
            Self::PrimaryReleaseDateDesc => "primary_release_date.desc",
            Self::PopularityDesc => "popularity.desc",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::PrimaryReleaseDateAsc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_slug() {
        let genre = Genre {
            id: 878,
            name: "Science Fiction".to_string(),
        };
        assert_eq!(genre.slug(), "science-fiction");

        let genre = Genre {
            id: 10770,
            name: "TV Movie".to_string(),
        };
        assert_eq!(genre.slug(), "tv-movie");

        let genre = Genre {
            id: 28,
            name: "Action".to_string(),
        };
        assert_eq!(genre.slug(), "action");
    }

    #[test]
    fn test_deserialize_numeric_id() {
        let movie: MovieSummary =
            serde_json::from_str(r#"{"id": 14, "title": "American Beauty"}"#).unwrap();
        assert_eq!(movie.id, "14");
        assert!(movie.release_date.is_none());
    }

    #[test]
    fn test_discover_page_is_last() {
        let page = DiscoverPage {
            page: 3,
            total_pages: 3,
            total_results: 45,
            results: vec![],
        };
        assert!(page.is_last());

        let page = DiscoverPage {
            page: 1,
            total_pages: 3,
            total_results: 45,
            results: vec![],
        };
        assert!(!page.is_last());
    }

    #[test]
    fn test_image_url() {
        let config = ImageConfiguration {
            secure_base_url: "https://image.tmdb.org/t/p/".to_string(),
            poster_sizes: vec!["w500".to_string()],
            profile_sizes: vec![],
            backdrop_sizes: vec![],
        };
        assert_eq!(
            config.image_url("w500", "/abc.jpg").unwrap(),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert!(config.image_url("w500", "").is_none());
    }

    #[test]
    fn test_release_year() {
        let details: MovieDetails =
            serde_json::from_str(r#"{"id": 14, "title": "American Beauty", "release_date": "1999-09-15"}"#)
                .unwrap();
        assert_eq!(details.release_year(), Some(1999));
    }
}
