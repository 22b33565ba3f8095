// ABOUTME: Shared types for gridboard dashboards.
// ABOUTME: Grid geometry, panels, dashboards, metric selectors, and config.

pub mod config;
pub mod dashboard;
pub mod document;
pub mod grid;
pub mod metrics;
pub mod panel;

pub use config::{Config, ConfigError};
pub use dashboard::{Dashboard, DashboardError, DataSourceInput};
pub use document::{DashboardDocument, DocumentError, RowSpec, Section};
pub use grid::{GridPos, GRID_WIDTH, ROW_HEIGHT};
pub use metrics::{BucketMetric, CounterMetric, Matcher, Metric, MetricError};
pub use panel::{Panel, PanelKind, Target, Tooltip};
