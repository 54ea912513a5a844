use std::fs;
use std::mem;
use std::path::Path;

use tracing::{debug, warn};

use super::{ParseConfig, Table};
use crate::error::{Error, Result};

/// Read a whole file into memory.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a string into a Table, splitting off the header row when
/// `cfg.has_header` is set.
pub fn parse_string(input: &str, cfg: &ParseConfig) -> Table {
    let mut records = parse_records(input, cfg);

    let header = if cfg.has_header && !records.is_empty() {
        records.remove(0)
    } else {
        Vec::new()
    };

    debug!(
        "Parsed table: {} header columns, {} rows",
        header.len(),
        records.len()
    );

    Table {
        header,
        rows: records,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// An enclosure was seen inside a quoted field: either the closing one or
    /// the first half of a doubled enclosure.
    QuoteInQuoted,
}

/// Split `input` into records of fields.
///
/// Never fails: an unterminated quoted field runs to the end of the input.
/// A line break ending the input does not start another record, but a blank
/// line anywhere else yields a record with a single empty field.
pub fn parse_records(input: &str, cfg: &ParseConfig) -> Vec<Vec<String>> {
    let separator = cfg.separator;
    let enclosure = cfg.enclosure;
    let escape = cfg.distinct_escape();

    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut in_record = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        in_record = true;

        if state == State::Quoted {
            if Some(c) == escape {
                // The escape stays in the value; it only protects the next
                // enclosure (or escape) from being read as syntax.
                field.push(c);
                if let Some(&next) = chars.peek() {
                    if next == enclosure || Some(next) == escape {
                        field.push(next);
                        chars.next();
                    }
                }
            } else if c == enclosure {
                state = State::QuoteInQuoted;
            } else {
                field.push(c);
            }
            continue;
        }

        if state == State::QuoteInQuoted && c == enclosure {
            field.push(c);
            state = State::Quoted;
            continue;
        }

        if state == State::FieldStart && c == enclosure {
            state = State::Quoted;
        } else if c == separator {
            record.push(mem::take(&mut field));
            state = State::FieldStart;
        } else if c == '\n' || c == '\r' {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            record.push(mem::take(&mut field));
            records.push(mem::take(&mut record));
            state = State::FieldStart;
            in_record = false;
        } else {
            // Text after a closing enclosure is kept as-is.
            field.push(c);
            state = State::Unquoted;
        }
    }

    if state == State::Quoted {
        warn!("Unterminated quoted field closed at end of input");
    }

    if in_record {
        record.push(field);
        records.push(record);
    }

    records
}
