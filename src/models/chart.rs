//! Chart description models

use super::series::{ChartKind, Series};

/// Everything a renderer needs to draw one chart.
///
/// There is a single unlabeled series, no legend, and the value axis always
/// starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub surface: String,
    pub kind: ChartKind,
    pub series: Series,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    /// Value axis range: always contains zero, with 10% headroom on the
    /// side(s) that have data. A series without drawable values gets `0..1`.
    pub fn value_range(&self) -> (f64, f64) {
        let (min, max) = self
            .series
            .points()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), (_, v)| (lo.min(v), hi.max(v)));

        if min == 0.0 && max == 0.0 {
            return (0.0, 1.0);
        }

        let headroom = (max - min) * 0.1;
        let lo = if min < 0.0 { min - headroom } else { 0.0 };
        let hi = if max > 0.0 { max + headroom } else { 0.0 };
        (lo, hi)
    }
}
