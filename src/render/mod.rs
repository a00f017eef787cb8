//! Output rendering: author line templates and markdown block splicing

pub mod format;
pub mod splice;

pub use format::{resolve_format, Template, BUILTIN_FORMATS};
pub use splice::{splice_blocks, update_file};
