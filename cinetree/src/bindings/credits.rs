//! Binding for credit nodes `/movies/{yyyy}/{yyyy}-{mm}/{movieId}/(cast_|crew_){personId}`
//!
//! Credit identifiers are compound: `credits-{movieId}-(cast_|crew_){personId}`.
//! Their canonical path is re-derived through the movie's record, so a
//! credit resolved by id outside any month listing still lands under the
//! movie's canonical (possibly `0000-00` fallback) branch.

use super::{captures, Binding};
use crate::collections::movies::movie_path;
use crate::collections::Collections;
use crate::data::{ProviderData, ResourceKind};
use crate::error::{Result, TreeError};
use crate::path::PathBuilder;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref CREDITS_PATH: Regex =
        Regex::new(r"^/movies/(\d{4})/(\d{4})-(\d{2})/(\d+)/(cast|crew)_(\d+)$").unwrap();
    static ref CREDITS_ID: Regex = Regex::new(r"^credits-(\d+)-(cast|crew)_(\d+)$").unwrap();
}

pub struct CreditsBinding {
    collections: Arc<Collections>,
}

impl CreditsBinding {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }
}

#[async_trait::async_trait]
impl Binding for CreditsBinding {
    fn name(&self) -> &'static str {
        "credits"
    }

    fn kinds(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Cast, ResourceKind::Crew]
    }

    fn path_pattern(&self) -> &Regex {
        &CREDITS_PATH
    }

    fn id_pattern(&self) -> &Regex {
        &CREDITS_ID
    }

    async fn find_node_id(&self, path: &str) -> Result<String> {
        let caps = captures(&CREDITS_PATH, path)?;
        Ok(format!("credits-{}-{}_{}", &caps[4], &caps[5], &caps[6]))
    }

    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>> {
        let caps = captures(&CREDITS_ID, id)?;
        let credit_key = format!("{}_{}", &caps[2], &caps[3]);
        self.collections.credits.get(&caps[1], &credit_key).await
    }

    async fn list_children(&self, _path: &str) -> Result<Vec<ProviderData>> {
        Ok(Vec::new())
    }

    async fn path_for(&self, data: &ProviderData) -> Result<String> {
        let caps = captures(&CREDITS_ID, &data.id)?;
        let movie = self
            .collections
            .movies
            .get(&caps[1])
            .await?
            .ok_or_else(|| TreeError::NotFound(format!("movie-{}", &caps[1])))?;

        let mut builder = PathBuilder::from_path(&movie_path(&movie));
        builder.append(&format!("{}_{}", &caps[2], &caps[3]));
        Ok(builder.build())
    }
}
