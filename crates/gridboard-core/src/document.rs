// ABOUTME: TOML dashboard documents.
// ABOUTME: Sections of rows of panels, read from disk before layout.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Dashboard, DataSourceInput, Panel};

/// One horizontal strip of panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSpec {
    /// Default height for panels without one
    #[serde(default)]
    pub height: u32,
    /// Default width; 0 shares the free grid columns evenly
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub panels: Vec<Panel>,
}

/// A titled group of rows, introduced by a divider when it has a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub rows: Vec<RowSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardDocument {
    pub title: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Applied to non-divider panels that name no datasource
    #[serde(default)]
    pub default_datasource: Option<String>,
    #[serde(default)]
    pub inputs: Vec<DataSourceInput>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read dashboard document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dashboard document: {0}")]
    Parse(#[from] toml::de::Error),
}

impl DashboardDocument {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DocumentError> {
        let document: Self = toml::from_str(content)?;
        tracing::debug!(
            "Parsed document `{}`: {} sections, {} panels",
            document.title,
            document.sections.len(),
            document.panel_count()
        );
        Ok(document)
    }

    pub fn panel_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| &section.rows)
            .map(|row| row.panels.len())
            .sum()
    }

    /// The dashboard shell (title, inputs, ...) around the given panels
    pub fn dashboard(&self, panels: Vec<Panel>) -> Dashboard {
        Dashboard {
            title: self.title.clone(),
            uid: self.uid.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            inputs: self.inputs.clone(),
            panels,
        }
    }
}
