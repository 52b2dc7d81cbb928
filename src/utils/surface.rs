#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::DashboardError;

/// Destination of rendered charts, addressed by surface identifier
pub trait SurfaceSink {
    fn present(&mut self, surface: &str, svg: String) -> Result<(), DashboardError>;
}

/// Surface identifiers end up as file names, so they are kept to a single
/// path component.
pub fn validate_surface_id(surface: &str) -> Result<(), DashboardError> {
    if surface.trim().is_empty()
        || surface.contains('/')
        || surface.contains('\\')
        || surface.contains("..")
    {
        return Err(DashboardError::InvalidSurface(surface.to_string()));
    }
    Ok(())
}

/// Writes each chart to `<dir>/<surface>.svg`
pub struct SvgDirectory {
    dir: PathBuf,
}

impl SvgDirectory {
    /// Create the output directory if needed
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, DashboardError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| DashboardError::io(&dir, e))?;
        Ok(SvgDirectory { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, surface: &str) -> PathBuf {
        self.dir.join(format!("{}.svg", surface))
    }
}

impl SurfaceSink for SvgDirectory {
    fn present(&mut self, surface: &str, svg: String) -> Result<(), DashboardError> {
        validate_surface_id(surface)?;
        let path = self.path_for(surface);
        fs::write(&path, svg).map_err(|e| DashboardError::io(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Keeps rendered charts in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySurfaces {
    pub charts: HashMap<String, String>,
}

#[cfg(test)]
impl SurfaceSink for MemorySurfaces {
    fn present(&mut self, surface: &str, svg: String) -> Result<(), DashboardError> {
        validate_surface_id(surface)?;
        self.charts.insert(surface.to_string(), svg);
        Ok(())
    }
}
