//! # Models
//!
//! The list of selectable model names and the catalogs that produce it.
//!
//! `ModelList` owns the selection invariant: a selected name is always a
//! member of the list. Catalogs are the async sources the list is refreshed
//! from; the list itself is replaced wholesale on every refresh.

use std::fmt;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

/// Ordered model names plus an optional selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelList {
    names: Vec<String>,
    selected: Option<usize>,
}

impl ModelList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list and resolve `requested` against it.
    pub fn with_selection(names: Vec<String>, requested: Option<&str>) -> Self {
        let mut list = Self::new();
        list.replace(names, requested);
        list
    }

    /// Replace the contents, keeping `requested` if it is present,
    /// otherwise falling back to the first entry, otherwise to no selection.
    pub fn replace(&mut self, names: Vec<String>, requested: Option<&str>) {
        self.selected = requested
            .and_then(|name| names.iter().position(|n| n == name))
            .or(if names.is_empty() { None } else { Some(0) });
        self.names = names;
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.names[i].as_str())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Select the entry at `index`. Returns `false` if out of range.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.names.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }
}

// ============================================================================
// Catalogs
// ============================================================================

/// Errors that can occur while listing models.
#[derive(Debug)]
pub enum CatalogError {
    /// Connection-level failure (DNS, refused, timeout).
    Network(String),
    /// The endpoint answered with a non-success status.
    Api { status: u16, message: String },
    /// The body was not the expected `{"data": [...]}` shape.
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Network(msg) => write!(f, "network error: {msg}"),
            CatalogError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            CatalogError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// A source of available model names.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Returns the name of the catalog (for logs and status text).
    fn name(&self) -> &str;

    /// Fetch the current list of model names, in display order.
    async fn list_models(&self) -> Result<Vec<String>, CatalogError>;
}

/// Catalog backed by the `[[models]]` entries of the config file.
pub struct StaticCatalog {
    models: Vec<String>,
}

impl StaticCatalog {
    pub fn new(models: Vec<String>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl ModelCatalog for StaticCatalog {
    fn name(&self) -> &str {
        "config"
    }

    async fn list_models(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.models.clone())
    }
}

#[derive(Deserialize)]
struct ModelsResponse {
    data: Vec<ModelObject>,
}

#[derive(Deserialize)]
struct ModelObject {
    id: String,
}

/// Catalog that queries an OpenAI-compatible `GET {base_url}/models` endpoint.
pub struct HttpCatalog {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ModelCatalog for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_models(&self) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/models", self.base_url);
        info!("Listing models from {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        debug!("Model listing status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Model listing failed: {} - {}", status, message);
            return Err(CatalogError::Api { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        let parsed: ModelsResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let names: Vec<String> = parsed.data.into_iter().map(|m| m.id).collect();
        info!("Catalog returned {} models", names.len());
        Ok(names)
    }
}
