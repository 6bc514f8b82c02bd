//! Binding for genre nodes `/genres/{slug}`

use super::{captures, Binding};
use crate::collections::Collections;
use crate::data::{ProviderData, ResourceKind};
use crate::error::{Result, TreeError};
use crate::path::PathBuilder;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref GENRE_PATH: Regex = Regex::new(r"^/genres/([a-z0-9][a-z0-9-]*)$").unwrap();
    static ref GENRE_ID: Regex = Regex::new(r"^gid-(\d+)$").unwrap();
}

pub struct GenreBinding {
    collections: Arc<Collections>,
}

impl GenreBinding {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }
}

#[async_trait::async_trait]
impl Binding for GenreBinding {
    fn name(&self) -> &'static str {
        "genre"
    }

    fn kinds(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Genre]
    }

    fn path_pattern(&self) -> &Regex {
        &GENRE_PATH
    }

    fn id_pattern(&self) -> &Regex {
        &GENRE_ID
    }

    async fn find_node_id(&self, path: &str) -> Result<String> {
        let caps = captures(&GENRE_PATH, path)?;
        self.collections
            .genres
            .id_for_slug(&caps[1])
            .await?
            .ok_or_else(|| TreeError::NotFound(path.to_string()))
    }

    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>> {
        captures(&GENRE_ID, id)?;
        self.collections.genres.get(id).await
    }

    async fn list_children(&self, _path: &str) -> Result<Vec<ProviderData>> {
        Ok(Vec::new())
    }

    async fn path_for(&self, data: &ProviderData) -> Result<String> {
        let slug = data
            .property_first("slug")
            .ok_or_else(|| TreeError::NotFound(data.id.clone()))?;
        let mut builder = PathBuilder::new();
        builder.append("genres").append(slug);
        Ok(builder.build())
    }
}
