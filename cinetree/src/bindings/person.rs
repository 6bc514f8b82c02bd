//! Binding for person nodes `/persons/{id}`

use super::{captures, Binding};
use crate::collections::Collections;
use crate::data::{ProviderData, ResourceKind};
use crate::error::Result;
use crate::path::PathBuilder;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref PERSON_PATH: Regex = Regex::new(r"^/persons/(\d+)$").unwrap();
    static ref PERSON_ID: Regex = Regex::new(r"^pid-(\d+)$").unwrap();
}

pub struct PersonBinding {
    collections: Arc<Collections>,
}

impl PersonBinding {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }
}

#[async_trait::async_trait]
impl Binding for PersonBinding {
    fn name(&self) -> &'static str {
        "person"
    }

    fn kinds(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Person]
    }

    fn path_pattern(&self) -> &Regex {
        &PERSON_PATH
    }

    fn id_pattern(&self) -> &Regex {
        &PERSON_ID
    }

    async fn find_node_id(&self, path: &str) -> Result<String> {
        let caps = captures(&PERSON_PATH, path)?;
        Ok(format!("pid-{}", &caps[1]))
    }

    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>> {
        let caps = captures(&PERSON_ID, id)?;
        self.collections.persons.get(&caps[1]).await
    }

    async fn list_children(&self, _path: &str) -> Result<Vec<ProviderData>> {
        Ok(Vec::new())
    }

    async fn path_for(&self, data: &ProviderData) -> Result<String> {
        let mut builder = PathBuilder::new();
        builder.append("persons").append(data.raw_key());
        Ok(builder.build())
    }

    async fn get_property(&self, id: &str, locale: &str, name: &str) -> Result<Vec<String>> {
        let caps = captures(&PERSON_ID, id)?;
        self.collections
            .persons
            .property(&caps[1], locale, name)
            .await
    }
}
