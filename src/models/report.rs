use chrono::{DateTime, Utc};

/// What happened to one chart binding during a render run
#[derive(Debug, Clone, PartialEq)]
pub enum ChartStatus {
    /// Chart drawn and presented to its surface
    Rendered { points: usize },
    /// Data slot not found on the page
    NoData,
    /// Data slot holds an empty object
    Empty,
    /// Data slot text is not a JSON object
    Malformed(String),
    /// Drawing or presenting the chart failed
    Failed(String),
}

impl ChartStatus {
    /// Statuses that were logged as a diagnostic
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, ChartStatus::Malformed(_) | ChartStatus::Failed(_))
    }
}

impl std::fmt::Display for ChartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartStatus::Rendered { points } => write!(f, "rendered ({} points)", points),
            ChartStatus::NoData => write!(f, "no data"),
            ChartStatus::Empty => write!(f, "empty"),
            ChartStatus::Malformed(reason) => write!(f, "malformed: {}", reason),
            ChartStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartOutcome {
    pub name: String,
    pub data_slot: String,
    pub surface: String,
    pub status: ChartStatus,
}

/// Outcome of every chart binding of one render run, in layout order
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub rendered_at: DateTime<Utc>,
    pub outcomes: Vec<ChartOutcome>,
}

impl DashboardReport {
    pub fn new() -> Self {
        DashboardReport {
            rendered_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn outcome(&self, name: &str) -> Option<&ChartOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn rendered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ChartStatus::Rendered { .. }))
            .count()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &ChartOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_diagnostic())
    }
}

impl Default for DashboardReport {
    fn default() -> Self {
        Self::new()
    }
}
