//! Binding for movie nodes `/movies/{yyyy}/{yyyy}-{mm}/{id}`

use super::{captures, Binding};
use crate::collections::movies::movie_path;
use crate::collections::Collections;
use crate::data::{ProviderData, ResourceKind};
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref MOVIE_PATH: Regex =
        Regex::new(r"^/movies/(\d{4})/(\d{4})-(\d{2})/(\d+)$").unwrap();
    static ref MOVIE_ID: Regex = Regex::new(r"^movie-(\d+)$").unwrap();
}

pub struct MovieBinding {
    collections: Arc<Collections>,
}

impl MovieBinding {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }
}

#[async_trait::async_trait]
impl Binding for MovieBinding {
    fn name(&self) -> &'static str {
        "movie"
    }

    fn kinds(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Movie]
    }

    fn path_pattern(&self) -> &Regex {
        &MOVIE_PATH
    }

    fn id_pattern(&self) -> &Regex {
        &MOVIE_ID
    }

    async fn find_node_id(&self, path: &str) -> Result<String> {
        let caps = captures(&MOVIE_PATH, path)?;
        Ok(format!("movie-{}", &caps[4]))
    }

    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>> {
        let caps = captures(&MOVIE_ID, id)?;
        self.collections.movies.get(&caps[1]).await
    }

    async fn list_children(&self, path: &str) -> Result<Vec<ProviderData>> {
        let caps = captures(&MOVIE_PATH, path)?;
        self.collections.credits.records_for_movie(&caps[4]).await
    }

    async fn path_for(&self, data: &ProviderData) -> Result<String> {
        Ok(movie_path(data))
    }

    async fn get_property(&self, id: &str, locale: &str, name: &str) -> Result<Vec<String>> {
        let caps = captures(&MOVIE_ID, id)?;
        self.collections.movies.property(&caps[1], locale, name).await
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let records = self.collections.movies.search(query).await?;
        Ok(records.iter().map(movie_path).collect())
    }
}
