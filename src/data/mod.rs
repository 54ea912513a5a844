use std::collections::BTreeMap;
use std::convert::Infallible;
use std::iter::FromIterator;
use std::str::FromStr;

pub mod columns;
pub mod markdown;
pub mod output;
pub mod parse;

/// A parsed table. `header` is empty when the input has no header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { header, rows }
    }

    /// Column count used to resolve selectors: the header width, or the width
    /// of the first row when there is no header.
    pub fn num_columns(&self) -> usize {
        if self.header.is_empty() {
            self.rows.first().map_or(0, |r| r.len())
        } else {
            self.header.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    pub separator: char,
    pub enclosure: char,
    /// `None` disables escape handling inside quoted fields.
    pub escape: Option<char>,
    pub has_header: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            separator: ',',
            enclosure: '"',
            escape: Some('\\'),
            has_header: true,
        }
    }
}

impl ParseConfig {
    /// The escape character, if it is set and differs from the enclosure.
    pub(crate) fn distinct_escape(&self) -> Option<char> {
        self.escape.filter(|&e| e != self.enclosure)
    }
}

/// A reference to a column, by header name or by 0-based index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnSelector {
    Name(String),
    Index(usize),
}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        ColumnSelector::Name(name.to_string())
    }
}

impl From<String> for ColumnSelector {
    fn from(name: String) -> Self {
        ColumnSelector::Name(name)
    }
}

impl From<usize> for ColumnSelector {
    fn from(index: usize) -> Self {
        ColumnSelector::Index(index)
    }
}

/// Strings made only of ASCII digits are indices, everything else is a name.
impl FromStr for ColumnSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = s.parse() {
                return Ok(ColumnSelector::Index(index));
            }
        }
        Ok(ColumnSelector::Name(s.to_string()))
    }
}

/// String options handed to a formatter. Each formatter picks the keys it
/// knows and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions(BTreeMap<String, String>);

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// First character of the option value; `default` when unset or empty.
    pub fn char_or(&self, key: &str, default: char) -> char {
        self.get(key)
            .and_then(|v| v.chars().next())
            .unwrap_or(default)
    }

    /// Like [`char_or`](Self::char_or), but an explicitly empty value means "none".
    pub fn optional_char_or(&self, key: &str, default: Option<char>) -> Option<char> {
        match self.get(key) {
            Some(v) => v.chars().next(),
            None => default,
        }
    }

    /// Fills in every key of `other` that is not set here.
    pub fn merge_defaults(&mut self, other: &FormatOptions) {
        for (k, v) in &other.0 {
            self.0.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormatOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FormatOptions(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
