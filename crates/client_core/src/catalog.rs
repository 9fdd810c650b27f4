//! Documented components and their control schemas.

use std::{fs, path::Path};

use serde::Deserialize;
use shared::{domain::ComponentId, schema::ControlSchema};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("component '{0}' is listed more than once")]
    DuplicateComponent(String),
    #[error("catalog lists no components")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub id: ComponentId,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    pub controls: ControlSchema,
}

impl CatalogEntry {
    pub fn new(id: impl Into<ComponentId>, controls: ControlSchema) -> Self {
        Self {
            id: id.into(),
            label: None,
            controls,
        }
    }

    /// Sidebar label; falls back to the component id.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "component")]
    components: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::parse(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Loads `path` when given, otherwise the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::from_entries(file.components)
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            if entries[..index].iter().any(|earlier| earlier.id == entry.id) {
                return Err(CatalogError::DuplicateComponent(entry.id.to_string()));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id.as_str() == id)
    }

    pub fn first(&self) -> Option<&CatalogEntry> {
        self.entries.first()
    }
}
