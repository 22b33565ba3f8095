// ABOUTME: Turns a dashboard document into positioned panels.
// ABOUTME: Sections become a divider plus laid-out rows stacked in a column; collapsed ones fold their rows into the divider.

use anyhow::{bail, Result};
use gridboard_core::{DashboardDocument, Panel, PanelKind, Section};
use gridboard_layout::{column, items, reposition, row, LayoutItem};

pub fn compose(document: &DashboardDocument) -> Result<Vec<Panel>> {
    let mut sections = Vec::new();

    for (section_index, section) in document.sections.iter().enumerate() {
        let rows = strips(document, section_index, section)?;
        match (&section.title, section.collapsed) {
            (Some(title), true) => {
                let hidden = column(&rows, 0, 0);
                sections.push(LayoutItem::Panel(Panel::collapsed_row(title.clone(), hidden)));
            }
            (Some(title), false) => {
                sections.push(LayoutItem::Panel(Panel::row(title.clone())));
                sections.extend(rows);
            }
            (None, true) => bail!("Section {} is collapsed but has no title", section_index + 1),
            (None, false) => sections.extend(rows),
        }
    }

    let panels: Vec<Panel> = column(&sections, 0, 0)
        .into_iter()
        .map(place_hidden)
        .collect();
    tracing::info!("Laid out {} panels for `{}`", panels.len(), document.title);
    Ok(panels)
}

/// One laid-out group per strip of the section
fn strips(
    document: &DashboardDocument,
    section_index: usize,
    section: &Section,
) -> Result<Vec<LayoutItem<Panel>>> {
    let mut rows = Vec::new();
    for (row_index, strip) in section.rows.iter().enumerate() {
        if let Some(divider) = strip.panels.iter().find(|p| p.is_divider()) {
            bail!(
                "Row {} of section {} contains row panel `{}`; give the section a title instead",
                row_index + 1,
                section_index + 1,
                divider.title
            );
        }
        let panels = strip
            .panels
            .iter()
            .cloned()
            .map(|panel| fill_datasource(panel, document.default_datasource.as_deref()));
        rows.push(LayoutItem::group(row(&items(panels), strip.height, strip.width)));
    }
    Ok(rows)
}

/// Panels hidden in a collapsed divider are laid out from y = 0; move them
/// just below the divider.
fn place_hidden(mut divider: Panel) -> Panel {
    let top = divider.grid_pos().map_or(0, |pos| pos.bottom());
    if let PanelKind::Row { panels, .. } = &mut divider.kind {
        *panels = panels
            .iter()
            .map(|panel| reposition(panel, 0, top, 0, 0))
            .collect();
    }
    divider
}

fn fill_datasource(mut panel: Panel, default: Option<&str>) -> Panel {
    if panel.datasource.is_none() {
        panel.datasource = default.map(str::to_string);
    }
    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridboard_core::{DashboardError, GridPos};

    const DOCUMENT: &str = r#"
title = "Overview"
default_datasource = "${DS_PROMETHEUS}"

[[inputs]]
name = "DS_PROMETHEUS"
label = "Prometheus"
plugin_id = "prometheus"

[[sections]]
title = "Requests"
[[sections.rows]]
height = 6
panels = [
    { type = "timeseries", title = "Rate" },
    { type = "timeseries", title = "Latency" },
    { type = "stat", title = "Errors", grid_pos = { w = 4 } },
]

[[sections]]
title = "Storage"
collapsed = true
[[sections.rows]]
height = 8
width = 12
panels = [
    { type = "piechart", title = "Usage", datasource = "${DS_PROMETHEUS}" },
    { type = "text", title = "Notes", content = "capacity", grid_pos = { h = 3 } },
]
"#;

    fn positions(panels: &[Panel]) -> Vec<(&str, GridPos)> {
        panels
            .iter()
            .map(|p| (p.title.as_str(), p.grid_pos().unwrap()))
            .collect()
    }

    #[test]
    fn composes_sections_into_a_column() {
        let document = DashboardDocument::from_toml_str(DOCUMENT).unwrap();
        let panels = compose(&document).unwrap();
        assert_eq!(
            positions(&panels),
            vec![
                ("Requests", GridPos::new(0, 0, 24, 1)),
                ("Rate", GridPos::new(0, 1, 10, 6)),
                ("Latency", GridPos::new(10, 1, 10, 6)),
                ("Errors", GridPos::new(20, 1, 4, 6)),
                ("Storage", GridPos::new(0, 7, 24, 1)),
            ]
        );
    }

    #[test]
    fn collapsed_section_nests_its_panels_under_the_divider() {
        let document = DashboardDocument::from_toml_str(DOCUMENT).unwrap();
        let panels = compose(&document).unwrap();
        let storage = &panels[4];
        assert!(matches!(storage.kind, PanelKind::Row { collapsed: true, .. }));
        assert_eq!(
            positions(storage.hidden_panels()),
            vec![
                ("Usage", GridPos::new(0, 8, 12, 8)),
                ("Notes", GridPos::new(12, 8, 12, 3)),
            ]
        );

        let json = storage.to_json();
        assert_eq!(json["collapsed"], serde_json::json!(true));
        assert_eq!(json["panels"][0]["title"], "Usage");
        assert_eq!(json["panels"][1]["gridPos"]["y"], 8);
        assert!(matches!(panels[0].kind, PanelKind::Row { collapsed: false, .. }));
        assert!(panels[0].hidden_panels().is_empty());
    }

    #[test]
    fn collapsed_section_is_followed_by_next_section() {
        let document = DashboardDocument::from_toml_str(
            r#"
title = "Stacked"
[[sections]]
title = "Hidden"
collapsed = true
[[sections.rows]]
height = 5
panels = [{ type = "stat", title = "A" }]

[[sections]]
title = "Shown"
[[sections.rows]]
height = 2
panels = [{ type = "stat", title = "B" }]
"#,
        )
        .unwrap();
        let panels = compose(&document).unwrap();
        assert_eq!(
            positions(&panels),
            vec![
                ("Hidden", GridPos::new(0, 0, 24, 1)),
                ("Shown", GridPos::new(0, 1, 24, 1)),
                ("B", GridPos::new(0, 2, 24, 2)),
            ]
        );
        assert_eq!(
            positions(panels[0].hidden_panels()),
            vec![("A", GridPos::new(0, 1, 24, 5))]
        );
    }

    #[test]
    fn collapsed_section_needs_a_title() {
        let document = DashboardDocument::from_toml_str(
            r#"
title = "Broken"
[[sections]]
collapsed = true
[[sections.rows]]
panels = [{ type = "stat", title = "A" }]
"#,
        )
        .unwrap();
        let err = compose(&document).unwrap_err();
        assert!(err.to_string().contains("collapsed but has no title"));
    }

    #[test]
    fn huge_widths_fail_verification_instead_of_panicking() {
        let document = DashboardDocument::from_toml_str(
            r#"
title = "Huge"
[[sections]]
[[sections.rows]]
height = 3
panels = [
    { type = "stat", title = "A", grid_pos = { w = 3000000000 } },
    { type = "stat", title = "B", grid_pos = { w = 3000000000 } },
    { type = "stat", title = "C" },
]
"#,
        )
        .unwrap();
        let panels = compose(&document).unwrap();
        assert_eq!(panels[2].grid_pos(), Some(GridPos::new(u32::MAX, 0, 0, 3)));

        let dashboard = document.dashboard(panels);
        assert!(matches!(
            dashboard.verify_layout(),
            Err(DashboardError::OutOfGrid { .. })
        ));
    }

    #[test]
    fn default_datasource_fills_panels() {
        let document = DashboardDocument::from_toml_str(DOCUMENT).unwrap();
        let panels = compose(&document).unwrap();
        assert_eq!(panels[0].datasource, None);
        assert!(panels
            .iter()
            .flat_map(|p| std::iter::once(p).chain(p.hidden_panels()))
            .filter(|p| !p.is_divider())
            .all(|p| p.datasource.as_deref() == Some("${DS_PROMETHEUS}")));

        let dashboard = document.dashboard(panels);
        assert!(dashboard.verify_datasources().is_ok());
        assert!(dashboard.verify_layout().is_ok());
    }

    #[test]
    fn row_panel_inside_row_is_rejected() {
        let document = DashboardDocument::from_toml_str(
            r#"
title = "Broken"
[[sections]]
[[sections.rows]]
panels = [{ type = "row", title = "Oops" }]
"#,
        )
        .unwrap();
        let err = compose(&document).unwrap_err();
        assert!(err.to_string().contains("row panel `Oops`"));
    }
}
