//! Markdown pipe-table rendering.
//!
//! Every row is padded to the widest row so the table stays rectangular, and
//! line breaks inside cells are replaced by `value_row_separator` because a
//! Markdown table row cannot span lines.

use super::FormatOptions;

#[derive(Debug)]
struct MarkdownOptions<'a> {
    column_separator: &'a str,
    row_separator: &'a str,
    header_separator: &'a str,
    value_row_separator: &'a str,
}

impl<'a> MarkdownOptions<'a> {
    fn from_options(options: &'a FormatOptions) -> Self {
        MarkdownOptions {
            column_separator: options.get_or("column_separator", "|"),
            row_separator: options.get_or("row_separator", "\n"),
            header_separator: options.get_or("header_separator", "-"),
            value_row_separator: options.get_or("value_row_separator", "<br/>"),
        }
    }
}

pub fn format_markdown_table(
    header: &[String],
    rows: &[Vec<String>],
    options: &FormatOptions,
) -> String {
    let opts = MarkdownOptions::from_options(options);

    if header.is_empty() && rows.is_empty() {
        return String::new();
    }

    let normalize = |row: &[String]| -> Vec<String> {
        row.iter()
            .map(|cell| replace_line_breaks(cell, opts.value_row_separator))
            .collect()
    };
    let mut header = normalize(header);
    let mut rows: Vec<Vec<String>> = rows.iter().map(|row| normalize(row)).collect();

    let max_columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let has_header = !header.is_empty();
    if has_header {
        header.resize(max_columns, String::new());
    }
    for row in &mut rows {
        row.resize(max_columns, String::new());
    }

    let widths = column_widths(&header, &rows, max_columns);

    let mut out = String::new();
    if has_header {
        render_row(&mut out, &header, &widths, &opts);
        render_header_separator(&mut out, &widths, &opts);
    }
    for row in &rows {
        render_row(&mut out, row, &widths, &opts);
    }

    out
}

/// Replace `\r\n`, `\n` and `\r` with `replacement`.
fn replace_line_breaks(value: &str, replacement: &str) -> String {
    value
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', replacement)
}

fn column_widths(header: &[String], rows: &[Vec<String>], max_columns: usize) -> Vec<usize> {
    let mut widths = vec![0; max_columns];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn render_row(out: &mut String, row: &[String], widths: &[usize], opts: &MarkdownOptions<'_>) {
    out.push_str(opts.column_separator);
    for (cell, &width) in row.iter().zip(widths) {
        out.push(' ');
        out.push_str(&format!("{cell:<width$}"));
        out.push(' ');
        out.push_str(opts.column_separator);
    }
    out.push_str(opts.row_separator);
}

fn render_header_separator(out: &mut String, widths: &[usize], opts: &MarkdownOptions<'_>) {
    out.push_str(opts.column_separator);
    for &width in widths {
        out.push_str(&opts.header_separator.repeat(width + 2));
        out.push_str(opts.column_separator);
    }
    out.push_str(opts.row_separator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse::parse_string;
    use crate::data::ParseConfig;
    use pretty_assertions::assert_eq;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn render(csv: &str, has_header: bool, options: &FormatOptions) -> String {
        let cfg = ParseConfig {
            has_header,
            ..ParseConfig::default()
        };
        let table = parse_string(csv, &cfg);
        format_markdown_table(&table.header, &table.rows, options)
    }

    #[test]
    fn pads_columns_to_widest_cell() {
        let header = strings(&["a", "bb"]);
        let rows = vec![strings(&["aa", "b"])];

        assert_eq!(
            format_markdown_table(&header, &rows, &FormatOptions::new()),
            "| a  | bb |\n|----|----|\n| aa | b  |\n"
        );
    }

    #[test]
    fn table_with_header() {
        let csv = "col11a,col12ab,col13abc\ncol21a,\"col22ab cde\",col23abc\ncol31a,col32ab,\"col33abcd\"";

        assert_eq!(
            render(csv, true, &FormatOptions::new()),
            "| col11a | col12ab     | col13abc  |\n\
             |--------|-------------|-----------|\n\
             | col21a | col22ab cde | col23abc  |\n\
             | col31a | col32ab     | col33abcd |\n"
        );
    }

    #[test]
    fn multiline_cells() {
        let csv = "col11a,col12ab,col13abc\ncol21a,\"col22ab\ncdef\",col23abc\ncol31a,col32ab,col33abcd";

        assert_eq!(
            render(csv, true, &FormatOptions::new()),
            "| col11a | col12ab          | col13abc  |\n\
             |--------|------------------|-----------|\n\
             | col21a | col22ab<br/>cdef | col23abc  |\n\
             | col31a | col32ab          | col33abcd |\n"
        );
    }

    #[test]
    fn multiline_cells_without_header() {
        let csv = "col11a,col12ab,col13abc\ncol21a,\"col22ab\ncdef\",col23abc\ncol31a,col32ab,col33abcd";

        assert_eq!(
            render(csv, false, &FormatOptions::new()),
            "| col11a | col12ab          | col13abc  |\n\
             | col21a | col22ab<br/>cdef | col23abc  |\n\
             | col31a | col32ab          | col33abcd |\n"
        );
    }

    #[test]
    fn every_line_break_style_is_replaced() {
        let rows = vec![strings(&["a\r\nb\rc\nd"])];
        let opts = FormatOptions::new().with("value_row_separator", "<br />");

        assert_eq!(
            format_markdown_table(&[], &rows, &opts),
            "| a<br />b<br />c<br />d |\n"
        );
    }

    #[test]
    fn custom_separators() {
        let csv = "col11a,col12ab,col13abc\ncol21a,\"col22ab cde\",col23abc\ncol31a,col32ab,\"col33abcd\"";
        let opts = FormatOptions::new()
            .with("column_separator", "|")
            .with("row_separator", "\n")
            .with("header_separator", "=");

        assert_eq!(
            render(csv, true, &opts),
            "| col11a | col12ab     | col13abc  |\n\
             |========|=============|===========|\n\
             | col21a | col22ab cde | col23abc  |\n\
             | col31a | col32ab     | col33abcd |\n"
        );

        let opts = FormatOptions::new()
            .with("column_separator", "!")
            .with("row_separator", "\r\n");
        assert_eq!(
            render("a,bb\n1,2", true, &opts),
            "! a ! bb !\r\n!---!----!\r\n! 1 ! 2  !\r\n"
        );
    }

    #[test]
    fn empty_table() {
        assert_eq!(render("", false, &FormatOptions::new()), "");
        assert_eq!(render("", true, &FormatOptions::new()), "");
    }

    #[test]
    fn single_row_without_header() {
        assert_eq!(
            render("col11,col12,col13", false, &FormatOptions::new()),
            "| col11 | col12 | col13 |\n"
        );
    }

    #[test]
    fn header_only() {
        assert_eq!(
            render("id,name", true, &FormatOptions::new()),
            "| id | name |\n|----|------|\n"
        );
    }

    #[test]
    fn ragged_rows_are_padded() {
        let csv = "col11,col12,col13\ncol21,col22\ncol31,col32,col33,col34";

        assert_eq!(
            render(csv, true, &FormatOptions::new()),
            "| col11 | col12 | col13 |       |\n\
             |-------|-------|-------|-------|\n\
             | col21 | col22 |       |       |\n\
             | col31 | col32 | col33 | col34 |\n"
        );
        assert_eq!(
            render(csv, false, &FormatOptions::new()),
            "| col11 | col12 | col13 |       |\n\
             | col21 | col22 |       |       |\n\
             | col31 | col32 | col33 | col34 |\n"
        );
    }

    #[test]
    fn widths_count_characters_not_bytes() {
        let header = strings(&["née", "x"]);
        let rows = vec![strings(&["ab", "ü"])];

        assert_eq!(
            format_markdown_table(&header, &rows, &FormatOptions::new()),
            "| née | x |\n|-----|---|\n| ab  | ü |\n"
        );
    }
}
