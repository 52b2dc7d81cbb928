use std::ops::Range;

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::prelude::*;

use crate::models::{ChartKind, ChartSpec, Series};
use crate::utils::DashboardError;

/// Fill colour of the single series
const SERIES_COLOR: RGBColor = RGBColor(54, 162, 235);

const MARGIN: u32 = 15;
const X_LABEL_AREA: u32 = 40;
const Y_LABEL_AREA: u32 = 70;

/// Share of a category slot covered by its bar
const BAR_WIDTH: f64 = 0.8;

/// Draws a chart and returns it as a self-contained SVG document
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<String, DashboardError>;
}

/// Category x axis: `count` equal slots over `0..count`, slot `i` centred
/// on `i + 0.5`. Key points are the slot centres, so there is exactly one
/// tick label per category.
#[derive(Debug, Clone, Copy)]
struct CategoryAxis {
    count: usize,
}

impl CategoryAxis {
    fn center(index: usize) -> f64 {
        index as f64 + 0.5
    }

    fn index_of(&self, value: f64) -> Option<usize> {
        let index = (value - 0.5).round();
        (index >= 0.0 && (index as usize) < self.count).then_some(index as usize)
    }
}

impl Ranged for CategoryAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let span = (limit.1 - limit.0) as f64;
        limit.0 + (span * value / self.count as f64).round() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        (0..self.count).map(Self::center).collect()
    }

    fn range(&self) -> Range<f64> {
        0.0..self.count as f64
    }
}

/// `plotters` renderer using the SVG backend
#[derive(Debug, Default, Clone, Copy)]
pub struct PlottersSvg;

impl ChartRenderer for PlottersSvg {
    fn render(&self, chart: &ChartSpec) -> Result<String, DashboardError> {
        if chart.series.is_empty() {
            return Err(DashboardError::Draw(format!(
                "nothing to draw on '{}'",
                chart.surface
            )));
        }

        let labels = &chart.series.labels;
        let axis = CategoryAxis {
            count: labels.len(),
        };
        let (y_min, y_max) = chart.value_range();
        let mut svg = String::new();

        {
            let root = SVGBackend::with_string(&mut svg, (chart.width, chart.height))
                .into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| DashboardError::Draw(format!("Failed to fill canvas: {}", e)))?;

            let mut plot = ChartBuilder::on(&root)
                .margin(MARGIN)
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA)
                .build_cartesian_2d(axis, y_min..y_max)
                .map_err(|e| DashboardError::Draw(format!("Failed to build chart: {}", e)))?;

            let label_of = |v: &f64| {
                axis.index_of(*v)
                    .and_then(|i| labels.get(i).cloned())
                    .unwrap_or_default()
            };
            let value_of = |v: &f64| short_number(*v);

            plot.configure_mesh()
                .disable_x_mesh()
                .x_labels(labels.len())
                .x_label_formatter(&label_of)
                .y_label_formatter(&value_of)
                .draw()
                .map_err(|e| DashboardError::Draw(format!("Failed to draw mesh: {}", e)))?;

            match chart.kind {
                ChartKind::Line => {
                    for run in line_runs(&chart.series) {
                        plot.draw_series(LineSeries::new(
                            run.iter().map(|&(i, v)| (CategoryAxis::center(i), v)),
                            SERIES_COLOR.stroke_width(2),
                        ))
                        .map_err(|e| DashboardError::Draw(format!("Failed to draw line: {}", e)))?;
                    }
                    plot.draw_series(chart.series.points().map(|(i, v)| {
                        Circle::new((CategoryAxis::center(i), v), 3, SERIES_COLOR.filled())
                    }))
                    .map_err(|e| DashboardError::Draw(format!("Failed to draw point: {}", e)))?;
                }
                ChartKind::Bar => {
                    plot.draw_series(chart.series.points().map(|(i, v)| {
                        bar(i, v, SERIES_COLOR.mix(0.5).filled())
                    }))
                    .map_err(|e| DashboardError::Draw(format!("Failed to draw bar: {}", e)))?;
                    plot.draw_series(chart.series.points().map(|(i, v)| {
                        bar(i, v, SERIES_COLOR.stroke_width(1))
                    }))
                    .map_err(|e| DashboardError::Draw(format!("Failed to draw bar: {}", e)))?;
                }
            }

            root.present()
                .map_err(|e| DashboardError::Draw(format!("Failed to render chart: {}", e)))?;
        }

        Ok(svg)
    }
}

fn bar(index: usize, value: f64, style: ShapeStyle) -> Rectangle<(f64, f64)> {
    let half = BAR_WIDTH / 2.0;
    let center = CategoryAxis::center(index);
    Rectangle::new([(center - half, 0.0), (center + half, value)], style)
}

/// Split a series at its gaps; each run is drawn as one connected line
fn line_runs(series: &Series) -> Vec<Vec<(usize, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (i, value) in series.values.iter().enumerate() {
        match value {
            Some(v) => current.push((i, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Axis labels for prices: 450000 -> "450K", 1250000 -> "1.25M"
fn short_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{}M", trim_fraction(value / 1_000_000.0))
    } else if magnitude >= 1_000.0 {
        format!("{}K", trim_fraction(value / 1_000.0))
    } else {
        trim_fraction(value)
    }
}

fn trim_fraction(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
