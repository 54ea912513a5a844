use super::FormatOptions;

const DEFAULT_SEPARATOR: char = ',';
const DEFAULT_ENCLOSURE: char = '"';
const DEFAULT_ESCAPE: char = '\\';

/// Render as CSV, one `\n`-terminated record per row. The header record is
/// written only when `header` is non-empty.
///
/// Recognized options: `separator`, `enclosure` and `escape` (an empty
/// `escape` disables it).
pub fn format_csv(header: &[String], rows: &[Vec<String>], options: &FormatOptions) -> String {
    let dialect = Dialect::from_options(options);
    let mut out = String::new();

    if !header.is_empty() {
        dialect.write_record(&mut out, header);
    }
    for row in rows {
        dialect.write_record(&mut out, row);
    }

    out
}

/// Render as a plain pipe-joined table with a dashed line under the header.
/// Cells are not padded.
///
/// Recognized options: `column_separator` (default `|`) and `row_separator`
/// (default `\n`).
pub fn format_table(header: &[String], rows: &[Vec<String>], options: &FormatOptions) -> String {
    let col_sep = options.get_or("column_separator", "|");
    let row_sep = options.get_or("row_separator", "\n");

    let mut out = String::new();
    if !header.is_empty() {
        let line = header.join(col_sep);
        let dashes = "-".repeat(line.chars().count());
        out.push_str(&line);
        out.push_str(row_sep);
        out.push_str(&dashes);
        out.push_str(row_sep);
    }

    let body: Vec<String> = rows.iter().map(|row| row.join(col_sep)).collect();
    out.push_str(&body.join(row_sep));

    out
}

#[derive(Debug, Clone, Copy)]
struct Dialect {
    separator: char,
    enclosure: char,
    escape: Option<char>,
}

impl Dialect {
    fn from_options(options: &FormatOptions) -> Self {
        let separator = options.char_or("separator", DEFAULT_SEPARATOR);
        let enclosure = options.char_or("enclosure", DEFAULT_ENCLOSURE);
        let escape = options
            .optional_char_or("escape", Some(DEFAULT_ESCAPE))
            .filter(|&e| e != enclosure);

        Dialect {
            separator,
            enclosure,
            escape,
        }
    }

    fn write_record(&self, out: &mut String, fields: &[String]) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(self.separator);
            }
            self.write_field(out, field);
        }
        out.push('\n');
    }

    fn needs_quotes(&self, field: &str) -> bool {
        field
            .chars()
            .any(|c| c == self.separator || c == self.enclosure || c == '\n' || c == '\r')
    }

    fn write_field(&self, out: &mut String, field: &str) {
        if !self.needs_quotes(field) {
            out.push_str(field);
            return;
        }

        out.push(self.enclosure);
        let mut chars = field.chars().peekable();
        while let Some(c) = chars.next() {
            if Some(c) == self.escape {
                // Mirrors the reader: an escape pairs with a following
                // enclosure or escape, and the pair is written verbatim.
                out.push(c);
                if let Some(&next) = chars.peek() {
                    if next == self.enclosure || Some(next) == self.escape {
                        out.push(next);
                        chars.next();
                    }
                }
            } else if c == self.enclosure {
                out.push(c);
                out.push(c);
            } else {
                out.push(c);
            }
        }
        out.push(self.enclosure);
    }
}
