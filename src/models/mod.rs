//! Data models for the dashboard renderer
//!
//! Payloads as read from the page, the series built from them, the chart
//! description handed to a renderer, and the report of a render run.

pub mod payload;
pub mod series;
pub mod chart;
pub mod report;

pub use payload::Payload;
pub use series::{ChartKind, LabelOrder, Series};
pub use chart::ChartSpec;
pub use report::{ChartOutcome, ChartStatus, DashboardReport};
