//! Bindings over the static scaffold: root, categories, years, months

use super::{captures, Binding};
use crate::collections::Collections;
use crate::data::{ProviderData, ResourceKind};
use crate::error::{Result, TreeError};
use crate::path::PathBuilder;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref ROOT_PATH: Regex = Regex::new(r"^/$").unwrap();
    static ref ROOT_ID: Regex = Regex::new(r"^root$").unwrap();
    static ref CATEGORY_PATH: Regex = Regex::new(r"^/(movies|persons|genres)$").unwrap();
    static ref CATEGORY_ID: Regex = Regex::new(r"^cid-(movies|persons|genres)$").unwrap();
    static ref YEAR_PATH: Regex = Regex::new(r"^/movies/(\d{4})$").unwrap();
    static ref YEAR_ID: Regex = Regex::new(r"^year-(\d{4})$").unwrap();
    static ref MONTH_PATH: Regex = Regex::new(r"^/movies/(\d{4})/(\d{4})-(\d{2})$").unwrap();
    static ref MONTH_ID: Regex = Regex::new(r"^month-(\d{4})-(\d{2})$").unwrap();
}

/// Binding for the tree root `/`
pub struct RootBinding {
    collections: Arc<Collections>,
}

impl RootBinding {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }
}

#[async_trait::async_trait]
impl Binding for RootBinding {
    fn name(&self) -> &'static str {
        "root"
    }

    fn kinds(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Root]
    }

    fn path_pattern(&self) -> &Regex {
        &ROOT_PATH
    }

    fn id_pattern(&self) -> &Regex {
        &ROOT_ID
    }

    async fn find_node_id(&self, path: &str) -> Result<String> {
        captures(&ROOT_PATH, path)?;
        Ok("root".to_string())
    }

    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>> {
        captures(&ROOT_ID, id)?;
        Ok(Some(self.collections.scaffold.root().clone()))
    }

    async fn list_children(&self, path: &str) -> Result<Vec<ProviderData>> {
        captures(&ROOT_PATH, path)?;
        Ok(self.collections.scaffold.categories().to_vec())
    }

    async fn path_for(&self, _data: &ProviderData) -> Result<String> {
        Ok("/".to_string())
    }
}

/// Binding for the fixed categories `/movies`, `/persons`, `/genres`
pub struct CategoryBinding {
    collections: Arc<Collections>,
}

impl CategoryBinding {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }
}

#[async_trait::async_trait]
impl Binding for CategoryBinding {
    fn name(&self) -> &'static str {
        "category"
    }

    fn kinds(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Category]
    }

    fn path_pattern(&self) -> &Regex {
        &CATEGORY_PATH
    }

    fn id_pattern(&self) -> &Regex {
        &CATEGORY_ID
    }

    async fn find_node_id(&self, path: &str) -> Result<String> {
        let caps = captures(&CATEGORY_PATH, path)?;
        Ok(format!("cid-{}", &caps[1]))
    }

    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>> {
        let caps = captures(&CATEGORY_ID, id)?;
        Ok(self.collections.scaffold.category(&caps[1]).cloned())
    }

    async fn list_children(&self, path: &str) -> Result<Vec<ProviderData>> {
        let caps = captures(&CATEGORY_PATH, path)?;
        match &caps[1] {
            "movies" => Ok(self.collections.scaffold.years().to_vec()),
            "genres" => self.collections.genres.records().await,
            // Persons are reachable by id or search, never by browsing
            _ => Ok(Vec::new()),
        }
    }

    async fn path_for(&self, data: &ProviderData) -> Result<String> {
        let mut builder = PathBuilder::new();
        builder.append(&data.name);
        Ok(builder.build())
    }
}

/// Binding for year folders `/movies/{yyyy}`
pub struct YearBinding {
    collections: Arc<Collections>,
}

impl YearBinding {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }
}

#[async_trait::async_trait]
impl Binding for YearBinding {
    fn name(&self) -> &'static str {
        "year"
    }

    fn kinds(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Year]
    }

    fn path_pattern(&self) -> &Regex {
        &YEAR_PATH
    }

    fn id_pattern(&self) -> &Regex {
        &YEAR_ID
    }

    async fn find_node_id(&self, path: &str) -> Result<String> {
        let caps = captures(&YEAR_PATH, path)?;
        Ok(format!("year-{}", &caps[1]))
    }

    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>> {
        let caps = captures(&YEAR_ID, id)?;
        let year: i32 = caps[1].parse().map_err(|_| TreeError::NotFound(id.to_string()))?;
        // Off-window years resolve too; only the window is listed
        Ok(Some(self.collections.scaffold.year(year)))
    }

    async fn list_children(&self, path: &str) -> Result<Vec<ProviderData>> {
        let caps = captures(&YEAR_PATH, path)?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| TreeError::NotFound(path.to_string()))?;
        Ok(self.collections.scaffold.months(year))
    }

    async fn path_for(&self, data: &ProviderData) -> Result<String> {
        let mut builder = PathBuilder::new();
        builder.append("movies").append(&data.name);
        Ok(builder.build())
    }
}

/// Binding for month folders `/movies/{yyyy}/{yyyy}-{mm}`
pub struct MonthBinding {
    collections: Arc<Collections>,
}

impl MonthBinding {
    pub fn new(collections: Arc<Collections>) -> Self {
        Self { collections }
    }

    fn parse_id(id: &str) -> Result<(i32, u32)> {
        let caps = captures(&MONTH_ID, id)?;
        let year = caps[1].parse().map_err(|_| TreeError::NotFound(id.to_string()))?;
        let month = caps[2].parse().map_err(|_| TreeError::NotFound(id.to_string()))?;
        Ok((year, month))
    }
}

#[async_trait::async_trait]
impl Binding for MonthBinding {
    fn name(&self) -> &'static str {
        "month"
    }

    fn kinds(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Month]
    }

    fn path_pattern(&self) -> &Regex {
        &MONTH_PATH
    }

    fn id_pattern(&self) -> &Regex {
        &MONTH_ID
    }

    async fn find_node_id(&self, path: &str) -> Result<String> {
        let caps = captures(&MONTH_PATH, path)?;
        // The year folder and the month segment must agree
        if caps[1] != caps[2] {
            return Err(TreeError::NotFound(path.to_string()));
        }
        Ok(format!("month-{}-{}", &caps[2], &caps[3]))
    }

    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>> {
        let (year, month) = Self::parse_id(id)?;
        Ok(self.collections.scaffold.month(year, month))
    }

    async fn list_children(&self, path: &str) -> Result<Vec<ProviderData>> {
        let id = self.find_node_id(path).await?;
        let (year, month) = Self::parse_id(&id)?;

        let ids = self.collections.movies.list_month(year, month).await?;
        let mut children = Vec::with_capacity(ids.len());
        for movie_id in ids.iter() {
            // Guaranteed cache hit: list_month warmed every record
            let raw = movie_id.strip_prefix("movie-").unwrap_or(movie_id);
            if let Some(record) = self.collections.movies.get(raw).await? {
                children.push(record);
            }
        }
        Ok(children)
    }

    async fn path_for(&self, data: &ProviderData) -> Result<String> {
        // The name is "{yyyy}-{mm}"; the year folder is its first component
        let year = data
            .name
            .split('-')
            .next()
            .ok_or_else(|| TreeError::NotFound(data.id.clone()))?;
        let mut builder = PathBuilder::new();
        builder.append("movies").append(year).append(&data.name);
        Ok(builder.build())
    }
}
