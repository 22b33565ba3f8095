// ABOUTME: Dashboard wrapper around a list of positioned panels.
// ABOUTME: Emits Grafana dashboard JSON and checks datasources and grid placement.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{Panel, GRID_WIDTH};

/// Datasource placeholder declared by an importable dashboard (`__inputs`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceInput {
    pub name: String,
    pub label: String,
    pub plugin_id: String,
    #[serde(default)]
    pub plugin_name: String,
    #[serde(default)]
    pub description: String,
}

impl DataSourceInput {
    /// The `${NAME}` reference panels use to point at this input
    pub fn reference(&self) -> String {
        format!("${{{}}}", self.name)
    }

    fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "label": self.label,
            "description": self.description,
            "type": "datasource",
            "pluginId": self.plugin_id,
            "pluginName": self.plugin_name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dashboard {
    pub title: String,
    pub uid: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub inputs: Vec<DataSourceInput>,
    pub panels: Vec<Panel>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Row panel `{title}` must not have a datasource")]
    DividerWithDatasource { title: String },

    #[error(
        "Panel `{title}` uses unknown datasource `{}`",
        .datasource.as_deref().unwrap_or("<none>")
    )]
    UnknownDatasource {
        title: String,
        datasource: Option<String>,
    },

    #[error("Panel `{title}` extends past the grid (x={x}, w={width})")]
    OutOfGrid { title: String, x: u32, width: u32 },

    #[error("Row panel `{title}` must span the full grid width")]
    PartialDivider { title: String },

    #[error("Panels `{first}` and `{second}` overlap")]
    Overlap { first: String, second: String },
}

impl Dashboard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_input(mut self, input: DataSourceInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_panels(mut self, panels: impl IntoIterator<Item = Panel>) -> Self {
        self.panels.extend(panels);
        self
    }

    /// Grafana dashboard JSON. Panels drop their `null` fields; the
    /// dashboard object keeps them (an absent `uid` stays `null`).
    pub fn to_json(&self) -> Value {
        json!({
            "__inputs": self.inputs.iter().map(DataSourceInput::to_json).collect::<Vec<_>>(),
            "title": self.title,
            "uid": self.uid,
            "description": self.description,
            "tags": self.tags,
            "editable": true,
            "schemaVersion": 36,
            "panels": self.panels.iter().map(Panel::to_json).collect::<Vec<_>>(),
        })
    }

    /// Check that every panel points at a declared datasource input and that
    /// row panels carry none.
    pub fn verify_datasources(&self) -> Result<&Self, DashboardError> {
        let known: HashSet<String> = self.inputs.iter().map(DataSourceInput::reference).collect();

        let panels: Vec<&Panel> = self
            .panels
            .iter()
            .flat_map(|panel| std::iter::once(panel).chain(panel.hidden_panels()))
            .collect();

        for panel in &panels {
            if panel.is_divider() {
                if panel.datasource.is_some() {
                    return Err(DashboardError::DividerWithDatasource {
                        title: panel.title.clone(),
                    });
                }
                continue;
            }
            let declared = panel
                .datasource
                .as_ref()
                .is_some_and(|ds| known.contains(ds));
            if !declared {
                return Err(DashboardError::UnknownDatasource {
                    title: panel.title.clone(),
                    datasource: panel.datasource.clone(),
                });
            }
        }

        tracing::debug!(
            "Datasources verified for {} panels against {} inputs",
            panels.len(),
            known.len()
        );
        Ok(self)
    }

    /// Check that placed panels fit the grid and do not overlap. Unplaced
    /// panels are ignored. Panels hidden in a collapsed row are checked
    /// against each other only, since Grafana lays them out when expanded.
    pub fn verify_layout(&self) -> Result<&Self, DashboardError> {
        let mut count = verify_layer(&self.panels)?;
        for panel in &self.panels {
            count += verify_layer(panel.hidden_panels())?;
        }

        tracing::debug!("Layout verified for {} placed panels", count);
        Ok(self)
    }
}

/// Bounds and overlap checks over panels sharing one visible layer
fn verify_layer(panels: &[Panel]) -> Result<usize, DashboardError> {
    let placed: Vec<_> = panels
        .iter()
        .filter_map(|panel| panel.grid_pos().map(|pos| (panel, pos)))
        .collect();

    for (panel, pos) in &placed {
        if pos.right() > GRID_WIDTH {
            return Err(DashboardError::OutOfGrid {
                title: panel.title.clone(),
                x: pos.x,
                width: pos.width,
            });
        }
        if panel.is_divider() && (pos.x != 0 || pos.width != GRID_WIDTH) {
            return Err(DashboardError::PartialDivider {
                title: panel.title.clone(),
            });
        }
    }

    for (i, (first, first_pos)) in placed.iter().enumerate() {
        for (second, second_pos) in &placed[i + 1..] {
            if first_pos.overlaps(second_pos) {
                return Err(DashboardError::Overlap {
                    first: first.title.clone(),
                    second: second.title.clone(),
                });
            }
        }
    }

    Ok(placed.len())
}
