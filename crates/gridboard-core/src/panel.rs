// ABOUTME: Dashboard panel model.
// ABOUTME: Panel kinds, query targets, and Grafana panel JSON emission.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::GridPos;

/// A query attached to a panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub expr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
}

impl Target {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            legend_format: None,
            ref_id: None,
        }
    }

    pub fn with_legend(mut self, legend: impl Into<String>) -> Self {
        self.legend_format = Some(legend.into());
        self
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    /// Grafana target object. The interval factor is always pinned to 1.
    pub fn to_json(&self, default_ref_id: &str) -> Value {
        let mut json = Map::new();
        json.insert("expr".into(), json!(self.expr));
        if let Some(legend) = &self.legend_format {
            json.insert("legendFormat".into(), json!(legend));
        }
        json.insert(
            "refId".into(),
            json!(self.ref_id.as_deref().unwrap_or(default_ref_id)),
        );
        json.insert("intervalFactor".into(), json!(1));
        Value::Object(json)
    }
}

/// Hover tooltip settings, both enabled by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tooltip {
    pub show: bool,
    pub show_histogram: bool,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            show: true,
            show_histogram: true,
        }
    }
}

impl Tooltip {
    pub fn to_json(&self) -> Value {
        json!({ "show": self.show, "showHistogram": self.show_histogram })
    }
}

/// Panel flavour, tagged by its Grafana `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PanelKind {
    TimeSeries {
        #[serde(default)]
        unit: Option<String>,
        /// 0 leaves Grafana's automatic precision
        #[serde(default)]
        decimals: u32,
    },
    PieChart {
        #[serde(default)]
        display_labels: Vec<String>,
    },
    Stat {
        #[serde(default)]
        unit: Option<String>,
    },
    Text {
        #[serde(default)]
        content: String,
    },
    /// Section divider: full width, one unit high, never offset sideways.
    /// A collapsed divider carries the panels it hides.
    Row {
        #[serde(default)]
        collapsed: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        panels: Vec<Panel>,
    },
}

impl PanelKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PanelKind::TimeSeries { .. } => "timeseries",
            PanelKind::PieChart { .. } => "piechart",
            PanelKind::Stat { .. } => "stat",
            PanelKind::Text { .. } => "text",
            PanelKind::Row { .. } => "row",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_pos: Option<GridPos>,
    #[serde(flatten)]
    pub kind: PanelKind,
}

impl Panel {
    pub fn new(title: impl Into<String>, kind: PanelKind) -> Self {
        Self {
            title: title.into(),
            description: None,
            datasource: None,
            targets: Vec::new(),
            tooltip: None,
            grid_pos: None,
            kind,
        }
    }

    pub fn timeseries(title: impl Into<String>) -> Self {
        Self::new(
            title,
            PanelKind::TimeSeries {
                unit: None,
                decimals: 0,
            },
        )
    }

    pub fn piechart(title: impl Into<String>, display_labels: Vec<String>) -> Self {
        Self::new(title, PanelKind::PieChart { display_labels })
    }

    pub fn stat(title: impl Into<String>) -> Self {
        Self::new(title, PanelKind::Stat { unit: None })
    }

    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            title,
            PanelKind::Text {
                content: content.into(),
            },
        )
    }

    /// Section divider
    pub fn row(title: impl Into<String>) -> Self {
        Self::new(
            title,
            PanelKind::Row {
                collapsed: false,
                panels: Vec::new(),
            },
        )
    }

    /// Collapsed section divider hiding `panels`
    pub fn collapsed_row(title: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self::new(
            title,
            PanelKind::Row {
                collapsed: true,
                panels,
            },
        )
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = Some(datasource.into());
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    pub fn with_tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Attach a grid position. Dividers are pinned to the full grid width.
    pub fn with_grid_pos(mut self, pos: GridPos) -> Self {
        self.grid_pos = Some(self.normalize(pos));
        self
    }

    /// Assigned grid position, if the panel has been placed
    pub fn grid_pos(&self) -> Option<GridPos> {
        self.grid_pos.map(|pos| self.normalize(pos))
    }

    pub fn is_divider(&self) -> bool {
        matches!(self.kind, PanelKind::Row { .. })
    }

    /// Panels folded into a collapsed divider; empty for everything else
    pub fn hidden_panels(&self) -> &[Panel] {
        match &self.kind {
            PanelKind::Row { panels, .. } => panels,
            _ => &[],
        }
    }

    fn normalize(&self, pos: GridPos) -> GridPos {
        if self.is_divider() {
            GridPos::divider(pos.y)
        } else {
            pos
        }
    }

    /// Grafana panel object. Absent optional fields are left out rather than
    /// emitted as `null`.
    pub fn to_json(&self) -> Value {
        let mut json = Map::new();
        json.insert("type".into(), json!(self.kind.type_name()));
        json.insert("title".into(), json!(self.title));
        if let Some(description) = &self.description {
            json.insert("description".into(), json!(description));
        }
        if let Some(datasource) = &self.datasource {
            json.insert("datasource".into(), json!(datasource));
        }
        if let Some(pos) = self.grid_pos() {
            json.insert("gridPos".into(), json!(pos));
        }
        if let Some(tooltip) = &self.tooltip {
            json.insert("tooltip".into(), tooltip.to_json());
        }
        if !self.targets.is_empty() {
            let targets = self
                .targets
                .iter()
                .enumerate()
                .map(|(i, target)| target.to_json(&ref_id(i)))
                .collect();
            json.insert("targets".into(), Value::Array(targets));
        }

        match &self.kind {
            PanelKind::TimeSeries { unit, decimals } => {
                insert_unit(&mut json, unit.as_deref());
                if *decimals != 0 {
                    json.insert("options".into(), json!({ "decimals": decimals }));
                }
            }
            PanelKind::PieChart { display_labels } => {
                if !display_labels.is_empty() {
                    json.insert(
                        "options".into(),
                        json!({ "displayLabels": display_labels }),
                    );
                }
            }
            PanelKind::Stat { unit } => insert_unit(&mut json, unit.as_deref()),
            PanelKind::Text { content } => {
                json.insert(
                    "options".into(),
                    json!({ "mode": "markdown", "content": content }),
                );
            }
            PanelKind::Row { collapsed, panels } => {
                json.insert("collapsed".into(), json!(collapsed));
                let panels = panels.iter().map(Panel::to_json).collect();
                json.insert("panels".into(), Value::Array(panels));
            }
        }

        Value::Object(json)
    }
}

fn insert_unit(json: &mut Map<String, Value>, unit: Option<&str>) {
    if let Some(unit) = unit {
        json.insert(
            "fieldConfig".into(),
            json!({ "defaults": { "unit": unit }, "overrides": [] }),
        );
    }
}

/// Grafana-style query ids: A..Z, then AA, AB, ...
fn ref_id(index: usize) -> String {
    let mut id = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        id.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    id.reverse();
    String::from_utf8_lossy(&id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unplaced_panel_has_no_grid_pos() {
        let panel = Panel::timeseries("Latency");
        assert_eq!(panel.grid_pos(), None);
        assert!(panel.to_json().get("gridPos").is_none());
    }

    #[test]
    fn divider_position_is_pinned_to_full_width() {
        let divider = Panel::row("Section").with_grid_pos(GridPos::new(5, 7, 3, 9));
        assert_eq!(divider.grid_pos(), Some(GridPos::new(0, 7, 24, 1)));
        assert!(divider.is_divider());
        assert!(!Panel::stat("Up").is_divider());
    }

    #[test]
    fn json_omits_absent_fields() {
        let json = Panel::timeseries("Requests").to_json();
        assert_eq!(json, json!({"type": "timeseries", "title": "Requests"}));
    }

    #[test]
    fn timeseries_decimals_and_unit() {
        let panel = Panel::new(
            "Latency",
            PanelKind::TimeSeries {
                unit: Some("s".into()),
                decimals: 2,
            },
        );
        let json = panel.to_json();
        assert_eq!(json["options"]["decimals"], json!(2));
        assert_eq!(json["fieldConfig"]["defaults"]["unit"], json!("s"));
    }

    #[test]
    fn piechart_display_labels() {
        let json = Panel::piechart("Status", vec!["percent".into()]).to_json();
        assert_eq!(json["type"], json!("piechart"));
        assert_eq!(json["options"]["displayLabels"], json!(["percent"]));

        let json = Panel::piechart("Status", Vec::new()).to_json();
        assert!(json.get("options").is_none());
    }

    #[test]
    fn targets_get_ref_ids_and_interval_factor() {
        let panel = Panel::timeseries("Rate")
            .with_target(Target::new("up").with_legend("{{instance}}"))
            .with_target(Target::new("down").with_ref_id("Z"));
        let json = panel.to_json();
        assert_eq!(
            json["targets"],
            json!([
                {"expr": "up", "legendFormat": "{{instance}}", "refId": "A", "intervalFactor": 1},
                {"expr": "down", "refId": "Z", "intervalFactor": 1},
            ])
        );
    }

    #[test]
    fn ref_ids_wrap_after_z() {
        assert_eq!(ref_id(0), "A");
        assert_eq!(ref_id(25), "Z");
        assert_eq!(ref_id(26), "AA");
        assert_eq!(ref_id(27), "AB");
    }

    #[test]
    fn deserializes_tagged_kind() {
        let panel: Panel = toml::from_str(
            r#"
            type = "stat"
            title = "Up"
            datasource = "${DS}"
            grid_pos = { w = 6 }
            "#,
        )
        .unwrap();
        assert_eq!(panel.kind, PanelKind::Stat { unit: None });
        assert_eq!(panel.grid_pos(), Some(GridPos::sized(6, 0)));
        assert_eq!(panel.datasource.as_deref(), Some("${DS}"));
    }

    #[test]
    fn row_json_is_collapsible_section() {
        let json = Panel::row("Section").to_json();
        assert_eq!(json["type"], json!("row"));
        assert_eq!(json["collapsed"], json!(false));
        assert_eq!(json["panels"], json!([]));
    }

    #[test]
    fn collapsed_row_nests_hidden_panels() {
        let hidden = Panel::stat("Errors").with_grid_pos(GridPos::new(0, 4, 8, 3));
        let json = Panel::collapsed_row("Section", vec![hidden])
            .with_grid_pos(GridPos::divider(3))
            .to_json();
        assert_eq!(json["collapsed"], json!(true));
        assert_eq!(
            json["panels"],
            json!([{
                "type": "stat",
                "title": "Errors",
                "gridPos": {"x": 0, "y": 4, "w": 8, "h": 3},
            }])
        );
    }

    #[test]
    fn tooltip_json() {
        let json = Panel::timeseries("Latency")
            .with_tooltip(Tooltip::default())
            .to_json();
        assert_eq!(json["tooltip"], json!({"show": true, "showHistogram": true}));

        let hidden = Tooltip {
            show: false,
            ..Tooltip::default()
        };
        let json = Panel::stat("Up").with_tooltip(hidden).to_json();
        assert_eq!(json["tooltip"], json!({"show": false, "showHistogram": true}));
    }

    #[test]
    fn tooltip_from_toml_fills_defaults() {
        let panel: Panel = toml::from_str(
            r#"
            type = "timeseries"
            title = "Rate"
            tooltip = { show_histogram = false }
            "#,
        )
        .unwrap();
        assert_eq!(
            panel.tooltip,
            Some(Tooltip {
                show: true,
                show_histogram: false,
            })
        );
        assert!(Panel::stat("Up").to_json().get("tooltip").is_none());
    }
}
