use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::data::parse::read_file;
use crate::data::{FormatOptions, ParseConfig};
use crate::error::{Error, Result};

/// `$XDG_CONFIG_HOME/csvtable/config.json`, when a config directory exists.
pub static CONFIG_PATH: Lazy<Option<PathBuf>> =
    Lazy::new(|| dirs::config_dir().map(|path| path.join("csvtable").join("config.json")));

/// Persistent defaults. Every field is optional; unset fields keep the
/// built-in defaults.
///
/// ```json
/// {
///   "separator": ";",
///   "header": false,
///   "format": "markdown_table",
///   "options": { "value_row_separator": " / " }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub separator: Option<char>,
    pub enclosure: Option<char>,
    /// An empty string disables the escape character.
    pub escape: Option<String>,
    pub header: Option<bool>,
    pub format: Option<String>,
    pub options: BTreeMap<String, String>,
}

pub fn parse_file(path: &Path) -> Result<Config> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Load `explicit` if given, failing on any error. Otherwise try the
    /// default location and fall back to defaults when it is missing or
    /// broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {:?}", path);
            return parse_file(path);
        }

        let path = match CONFIG_PATH.as_ref() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        };

        match parse_file(path) {
            Ok(config) => {
                debug!("Loaded config from {:?}", path);
                Ok(config)
            }
            Err(err) => {
                error!("Failed to load config {:?}: {}", path, err);
                warn!("Falling back to default config");
                Ok(Config::default())
            }
        }
    }

    pub fn parse_config(&self) -> ParseConfig {
        let defaults = ParseConfig::default();
        ParseConfig {
            separator: self.separator.unwrap_or(defaults.separator),
            enclosure: self.enclosure.unwrap_or(defaults.enclosure),
            escape: match &self.escape {
                Some(escape) => escape.chars().next(),
                None => defaults.escape,
            },
            has_header: self.header.unwrap_or(defaults.has_header),
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        self.options.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}
