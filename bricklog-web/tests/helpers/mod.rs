//! Shared test helpers: provider fakes and fixture data
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bricklog_web::services::SetResolver;
use bricklog_web::types::{
    CatalogError, CatalogProvider, CatalogSet, SearchError, SearchProvider, SetNumber,
};

/// What the fake catalog should answer
pub enum CatalogMode {
    Found(CatalogSet),
    NotFound,
    RateLimited,
}

/// In-memory catalog provider with a call counter
pub struct FakeCatalog {
    pub mode: CatalogMode,
    pub calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(mode: CatalogMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn set_by_number(&self, set_number: &SetNumber) -> Result<CatalogSet, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            CatalogMode::Found(set) => Ok(set.clone()),
            CatalogMode::NotFound => Err(CatalogError::SetNotFound(set_number.to_string())),
            CatalogMode::RateLimited => Err(CatalogError::RateLimitExceeded),
        }
    }
}

/// What the fake search should answer
pub enum SearchMode {
    Lines(Vec<String>),
    Fail,
}

/// In-memory search provider with a call counter
pub struct FakeSearch {
    pub mode: SearchMode,
    pub calls: AtomicUsize,
}

impl FakeSearch {
    pub fn new(mode: SearchMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, _query: &str) -> Result<Vec<String>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            SearchMode::Lines(lines) => Ok(lines.clone()),
            SearchMode::Fail => Err(SearchError::Transport("connection refused".to_string())),
        }
    }
}

/// Resolver wired to the given fakes
pub fn resolver_with(catalog: Arc<FakeCatalog>, search: Arc<FakeSearch>) -> Arc<SetResolver> {
    Arc::new(SetResolver::new(catalog, search))
}

/// Catalog record fixture in the upstream payload shape
pub fn catalog_set(set_num: &str, name: &str, year: i32, num_parts: i64) -> CatalogSet {
    CatalogSet {
        set_num: set_num.to_string(),
        name: name.to_string(),
        year,
        theme_id: 252,
        num_parts,
        set_img_url: Some(format!(
            "https://cdn.rebrickable.com/media/sets/{}.jpg",
            set_num
        )),
        set_url: Some(format!("https://rebrickable.com/sets/{}/", set_num)),
        last_modified_dt: Some("2023-01-17T12:00:00Z".to_string()),
    }
}

/// Search snippets with a strong signal for set 42107
pub fn ducati_snippets() -> Vec<String> {
    vec![
        "LEGO Technic Ducati Panigale V4 R 42107 (646 pieces) - LEGO".to_string(),
        "LEGO Technic Ducati Panigale V4 R motorcycle model kit 2019".to_string(),
        "Set 42107: Ducati Panigale V4 R - 646 pieces - Released 2019 - Technic theme".to_string(),
        "Build the iconic Ducati Panigale V4 R superbike with this detailed LEGO set".to_string(),
    ]
}

/// Search snippets with no usable signal for the given set number
pub fn generic_snippets(set_number: &str) -> Vec<String> {
    vec![
        format!("LEGO Set {} collectible model", set_number),
        format!("LEGO {} building set with pieces", set_number),
        format!("Set {} LEGO official release", set_number),
    ]
}
