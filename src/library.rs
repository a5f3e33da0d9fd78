//! Music directory scanning.

mod model;
mod scan;

pub use model::SourceFile;
pub use scan::scan;
