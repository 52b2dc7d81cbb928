pub mod table;
pub mod page;
pub mod errors;
pub mod surface;

pub use table::Table;
pub use page::Page;
pub use errors::{clean_parse_error, DashboardError};
pub use surface::{SurfaceSink, SvgDirectory};
#[cfg(test)]
pub use surface::MemorySurfaces;
