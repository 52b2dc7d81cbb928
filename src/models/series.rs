use serde::{Deserialize, Serialize};

use super::payload::Entry;

/// How a chart draws its single series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Line => write!(f, "line"),
            ChartKind::Bar => write!(f, "bar"),
        }
    }
}

/// Display order of the labels of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelOrder {
    /// Order in which the keys appear in the payload
    #[default]
    Source,
    /// Ascending by numeric value of the label; labels that are not numbers
    /// go last, in source order
    Numeric,
}

/// Finite numeric value of a label; "NaN" and "inf" are not numbers here
fn numeric_label(label: &str) -> Option<f64> {
    label.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Labels and values of one chart, already in display order
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn from_entries(mut entries: Vec<Entry>, order: LabelOrder) -> Self {
        if order == LabelOrder::Numeric {
            // stable: equal and non-numeric keys keep their source order
            entries.sort_by(|(a, _), (b, _)| {
                match (numeric_label(a), numeric_label(b)) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            });
        }

        let (labels, values) = entries.into_iter().unzip();
        Series { labels, values }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Values that can be drawn, with their position in the series
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }
}
