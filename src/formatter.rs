use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::data::markdown::format_markdown_table;
use crate::data::output::{format_csv, format_table};
use crate::data::FormatOptions;
use crate::error::{Error, Result};

pub const CSV: &str = "csv";
pub const TABLE: &str = "table";
pub const MARKDOWN_TABLE: &str = "markdown_table";

/// Turns a header and rows into output text.
///
/// Implemented for every `Fn(&[String], &[Vec<String>], &FormatOptions) -> String`,
/// so plain functions and closures can be used directly.
pub trait Formatter: Send + Sync {
    fn format(&self, header: &[String], rows: &[Vec<String>], options: &FormatOptions) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&[String], &[Vec<String>], &FormatOptions) -> String + Send + Sync,
{
    fn format(&self, header: &[String], rows: &[Vec<String>], options: &FormatOptions) -> String {
        self(header, rows, options)
    }
}

/// Which formatter a `format` call should use.
#[derive(Clone)]
pub enum FormatterRef {
    /// The CSV formatter.
    Default,
    /// A formatter looked up by name in a [`FormatterRegistry`].
    Named(String),
    Custom(Arc<dyn Formatter>),
}

impl FormatterRef {
    pub fn custom(formatter: impl Formatter + 'static) -> Self {
        FormatterRef::Custom(Arc::new(formatter))
    }
}

impl Default for FormatterRef {
    fn default() -> Self {
        FormatterRef::Default
    }
}

impl fmt::Debug for FormatterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatterRef::Default => f.write_str("Default"),
            FormatterRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            FormatterRef::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for FormatterRef {
    fn from(name: &str) -> Self {
        FormatterRef::Named(name.to_string())
    }
}

impl From<String> for FormatterRef {
    fn from(name: String) -> Self {
        FormatterRef::Named(name)
    }
}

impl From<Arc<dyn Formatter>> for FormatterRef {
    fn from(formatter: Arc<dyn Formatter>) -> Self {
        FormatterRef::Custom(formatter)
    }
}

impl<T: Into<FormatterRef>> From<Option<T>> for FormatterRef {
    fn from(formatter: Option<T>) -> Self {
        formatter.map_or(FormatterRef::Default, Into::into)
    }
}

static BUILTINS: Lazy<FormatterRegistry> = Lazy::new(|| {
    let mut registry = FormatterRegistry::empty();
    registry.register(CSV, format_csv);
    registry.register(TABLE, format_table);
    registry.register(MARKDOWN_TABLE, format_markdown_table);
    registry
});

/// Maps formatter names to implementations.
#[derive(Clone)]
pub struct FormatterRegistry {
    formatters: BTreeMap<String, Arc<dyn Formatter>>,
}

impl Default for FormatterRegistry {
    /// A registry holding the built-in `csv`, `table` and `markdown_table`.
    fn default() -> Self {
        BUILTINS.clone()
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.formatters.keys()).finish()
    }
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        FormatterRegistry {
            formatters: BTreeMap::new(),
        }
    }

    /// Register `formatter` under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, formatter: impl Formatter + 'static) {
        self.formatters.insert(name.into(), Arc::new(formatter));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formatters.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Formatter>> {
        self.formatters.get(name).cloned()
    }

    pub fn resolve(&self, formatter: &FormatterRef) -> Result<Arc<dyn Formatter>> {
        match formatter {
            FormatterRef::Default => {
                debug!("Using default formatter {:?}", CSV);
                Ok(Arc::new(format_csv))
            }
            FormatterRef::Named(name) => {
                debug!("Resolving formatter {:?}", name);
                self.get(name)
                    .ok_or_else(|| Error::FormatterNotCallable { name: name.clone() })
            }
            FormatterRef::Custom(custom) => Ok(Arc::clone(custom)),
        }
    }
}
