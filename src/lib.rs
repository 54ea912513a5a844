//! Parse CSV text, reorder or filter its columns, and render it again as
//! CSV, a plain text table, a Markdown table or through a custom formatter.

pub mod config;
pub mod data;
pub mod error;
pub mod formatter;
pub mod pipeline;

pub use data::columns::{Projection, ProjectionKind};
pub use data::{ColumnSelector, FormatOptions, ParseConfig, Table};
pub use error::{Error, Result};
pub use formatter::{Formatter, FormatterRef, FormatterRegistry};
pub use pipeline::Pipeline;
