use std::path::Path;

use tracing::debug;

use crate::data::columns::{Projection, ProjectionKind};
use crate::data::parse::{parse_string, read_file};
use crate::data::{ColumnSelector, FormatOptions, ParseConfig, Table};
use crate::error::Result;
use crate::formatter::{Formatter, FormatterRef, FormatterRegistry};

/// CSV source text plus everything needed to render it: the parse
/// configuration, the column projection and the formatter registry.
///
/// The parsed table is cached and rebuilt whenever the source or the parse
/// configuration changes. The projection is applied afresh on every
/// [`format`](Pipeline::format) call.
///
/// ```
/// use csvtable::{FormatOptions, Pipeline};
///
/// let mut table = Pipeline::new("Name,Age,City\nJohn,30,Paris\n");
/// table.only_columns(vec!["City", "Name"]);
///
/// let out = table.format("csv", &FormatOptions::new()).unwrap();
/// assert_eq!(out, "City,Name\nParis,John\n");
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: String,
    config: ParseConfig,
    projection: Projection,
    registry: FormatterRegistry,
    table: Table,
}

impl Pipeline {
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_config(source, ParseConfig::default())
    }

    pub fn with_config(source: impl Into<String>, config: ParseConfig) -> Self {
        let source = source.into();
        let table = parse_string(&source, &config);
        Pipeline {
            source,
            config,
            projection: Projection::default(),
            registry: FormatterRegistry::default(),
            table,
        }
    }

    pub fn from_file(path: impl AsRef<Path>, config: ParseConfig) -> Result<Self> {
        let path = path.as_ref();
        let source = read_file(path)?;
        debug!("Read {} bytes from {:?}", source.len(), path);
        Ok(Self::with_config(source, config))
    }

    fn reparse(&mut self) -> &mut Self {
        self.table = parse_string(&self.source, &self.config);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.source = source.into();
        self.reparse()
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ParseConfig) -> &mut Self {
        self.config = config;
        self.reparse()
    }

    pub fn separator(&mut self, separator: char) -> &mut Self {
        self.config.separator = separator;
        self.reparse()
    }

    pub fn enclosure(&mut self, enclosure: char) -> &mut Self {
        self.config.enclosure = enclosure;
        self.reparse()
    }

    pub fn escape(&mut self, escape: Option<char>) -> &mut Self {
        self.config.escape = escape;
        self.reparse()
    }

    /// Treat the first record as the header.
    pub fn with_header(&mut self) -> &mut Self {
        self.config.has_header = true;
        self.reparse()
    }

    /// Treat every record as data.
    pub fn without_header(&mut self) -> &mut Self {
        self.config.has_header = false;
        self.reparse()
    }

    /// Header of the parsed table, before any projection.
    pub fn header(&self) -> &[String] {
        &self.table.header
    }

    /// Rows of the parsed table, before any projection.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.table.rows
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    fn set_projection<I, S>(&mut self, kind: ProjectionKind, selectors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnSelector>,
    {
        self.projection
            .set(kind, selectors.into_iter().map(Into::into).collect());
        self
    }

    /// Move the selected columns to the front; the others follow in their
    /// original order.
    pub fn column_order<I, S>(&mut self, selectors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnSelector>,
    {
        self.set_projection(ProjectionKind::Reorder, selectors)
    }

    /// Keep only the selected columns, in the given order.
    pub fn only_columns<I, S>(&mut self, selectors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnSelector>,
    {
        self.set_projection(ProjectionKind::OnlyColumns, selectors)
    }

    /// Drop the selected columns.
    pub fn without_columns<I, S>(&mut self, selectors: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnSelector>,
    {
        self.set_projection(ProjectionKind::WithoutColumns, selectors)
    }

    pub fn reset_column_order(&mut self) -> &mut Self {
        self.projection.reset(ProjectionKind::Reorder);
        self
    }

    pub fn reset_only_columns(&mut self) -> &mut Self {
        self.projection.reset(ProjectionKind::OnlyColumns);
        self
    }

    pub fn reset_without_columns(&mut self) -> &mut Self {
        self.projection.reset(ProjectionKind::WithoutColumns);
        self
    }

    pub fn reset_columns(&mut self) -> &mut Self {
        self.projection.reset_all();
        self
    }

    /// The parsed table with the configured projection applied.
    pub fn projected(&self) -> Result<Table> {
        self.projection.apply(&self.table)
    }

    pub fn register_formatter(
        &mut self,
        name: impl Into<String>,
        formatter: impl Formatter + 'static,
    ) -> &mut Self {
        self.registry.register(name, formatter);
        self
    }

    pub fn registry(&self) -> &FormatterRegistry {
        &self.registry
    }

    /// Project the table and render it with `formatter`.
    pub fn format(
        &self,
        formatter: impl Into<FormatterRef>,
        options: &FormatOptions,
    ) -> Result<String> {
        let formatter = self.registry.resolve(&formatter.into())?;
        let table = self.projected()?;
        debug!(
            "Formatting {} columns, {} rows",
            table.num_columns(),
            table.rows.len()
        );
        Ok(formatter.format(&table.header, &table.rows, options))
    }
}
