//! Dashboard configuration
//!
//! The layout binds each chart to the data slot it reads and the surface it
//! draws into. Render settings come from the environment (a `.env` file is
//! loaded at startup) and can be overridden on the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{ChartKind, LabelOrder};
use crate::utils::errors::DashboardError;
use crate::utils::surface::validate_surface_id;

pub const DEFAULT_OUT_DIR: &str = "charts";
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 400;

/// One chart of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBinding {
    pub name: String,
    pub data_slot: String,
    pub surface: String,
    pub kind: ChartKind,
    #[serde(default)]
    pub order: LabelOrder,
}

impl ChartBinding {
    fn new(name: &str, data_slot: &str, surface: &str, kind: ChartKind, order: LabelOrder) -> Self {
        ChartBinding {
            name: name.to_string(),
            data_slot: data_slot.to_string(),
            surface: surface.to_string(),
            kind,
            order,
        }
    }
}

/// The charts of a dashboard, attempted in this order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub charts: Vec<ChartBinding>,
}

impl Default for DashboardLayout {
    /// Listings per year, median price by property type, median price by
    /// bedroom count
    fn default() -> Self {
        DashboardLayout {
            charts: vec![
                ChartBinding::new("yearly", "yearData", "yearChart", ChartKind::Line, LabelOrder::Numeric),
                ChartBinding::new("property_type", "ptypeMedianData", "ptypeChart", ChartKind::Bar, LabelOrder::Source),
                ChartBinding::new("bedrooms", "bedMedianData", "bedChart", ChartKind::Bar, LabelOrder::Source),
            ],
        }
    }
}

impl DashboardLayout {
    pub fn from_json(text: &str) -> Result<Self, DashboardError> {
        let layout: DashboardLayout =
            serde_json::from_str(text).map_err(|e| DashboardError::Layout(e.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let text = std::fs::read_to_string(path).map_err(|e| DashboardError::io(path, e))?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), DashboardError> {
        for (i, chart) in self.charts.iter().enumerate() {
            if chart.name.trim().is_empty() || chart.data_slot.trim().is_empty() {
                return Err(DashboardError::Layout(format!(
                    "chart #{} needs a name and a data_slot",
                    i + 1
                )));
            }
            validate_surface_id(&chart.surface)?;

            if self.charts[..i].iter().any(|c| c.surface == chart.surface) {
                return Err(DashboardError::Layout(format!(
                    "surface '{}' is bound to more than one chart",
                    chart.surface
                )));
            }
        }
        Ok(())
    }
}

/// Output location and chart size
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub out_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl RenderSettings {
    /// Read `DASHBOARD_OUT_DIR`, `DASHBOARD_CHART_WIDTH` and
    /// `DASHBOARD_CHART_HEIGHT` from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = RenderSettings::default();
        RenderSettings {
            out_dir: lookup("DASHBOARD_OUT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.out_dir),
            width: dimension(&lookup, "DASHBOARD_CHART_WIDTH", defaults.width),
            height: dimension(&lookup, "DASHBOARD_CHART_HEIGHT", defaults.height),
        }
    }
}

fn dimension(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(v) if v > 0 => v,
            _ => {
                warn!("Ignoring {}={:?}, using {}", key, raw, default);
                default
            }
        },
    }
}
