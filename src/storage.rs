mod format;
mod project_file;
mod summary;

pub use format::Format;
pub use project_file::{load, save, LoadError, ParseError, SaveError, ValidationError};
pub use summary::{export_summary, write_summary};
