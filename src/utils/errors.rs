use thiserror::Error;

/// Errors raised while reading a page, loading a layout or presenting a chart.
///
/// Missing or malformed chart data is not an error: it is reported through
/// [`crate::models::Payload`] and the chart is skipped.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
    #[error("Invalid layout: {0}")]
    Layout(String),
    #[error("Invalid surface identifier '{0}'")]
    InvalidSurface(String),
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

impl DashboardError {
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        DashboardError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Shorten a `serde_json` error to the part worth showing in a diagnostic.
///
/// "expected value at line 1 column 2" stays as is, anything after the first
/// line of a multi-line message is dropped.
pub fn clean_parse_error(error_msg: &str) -> String {
    error_msg.lines().next().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_parse_error_keeps_first_line() {
        assert_eq!(
            clean_parse_error("expected value at line 1 column 2\ncaused by"),
            "expected value at line 1 column 2"
        );
        assert_eq!(clean_parse_error(""), "");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = DashboardError::io(
            "charts/out.svg",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("charts/out.svg"));
        assert!(msg.contains("missing"));
    }
}
