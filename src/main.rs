use std::convert::Infallible;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use csvtable::config::Config;
use csvtable::data::parse::read_file;
use csvtable::{ColumnSelector, FormatOptions, Pipeline};

#[derive(Parser)]
#[command(name = "csvtable")]
struct Cli {
    #[arg(help = "CSV file to read. Reads stdin when omitted")]
    input: Option<PathBuf>,

    #[arg(
        long = "config",
        short = 'c',
        help = "Path to an alternate config file (JSON)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long = "format",
        short = 'f',
        help = "Output format: csv, table or markdown_table [default: csv]"
    )]
    format: Option<String>,

    #[arg(long = "separator", short = 'd', help = "Field separator of the input")]
    separator: Option<char>,

    #[arg(long = "enclosure", help = "Quote character of the input")]
    enclosure: Option<char>,

    #[arg(
        long = "escape",
        help = "Escape character of the input. Pass an empty string to disable"
    )]
    escape: Option<String>,

    #[arg(
        long = "header",
        help = "Whether the input has a header row [default: true]"
    )]
    header: Option<bool>,

    #[arg(
        long = "option",
        short = 'O',
        value_parser = parse_key_value,
        help = "Formatter option as key=value, e.g. -O column_separator=';'. Repeatable."
    )]
    option: Vec<(String, String)>,

    #[arg(
        long = "column-order",
        value_parser = parse_selector,
        help = "Column(s) to move to the front. Header names, or 0-based column numbers. Repeatable."
    )]
    column_order: Vec<ColumnSelector>,

    #[arg(
        long = "only-columns",
        value_parser = parse_selector,
        help = "Column(s) to keep, in output order. Repeatable."
    )]
    only_columns: Vec<ColumnSelector>,

    #[arg(
        long = "without-columns",
        value_parser = parse_selector,
        help = "Column(s) to drop. Repeatable."
    )]
    without_columns: Vec<ColumnSelector>,
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid option `{s}`: expected key=value"))
}

fn parse_selector(s: &str) -> std::result::Result<ColumnSelector, Infallible> {
    s.parse()
}

fn read_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        return Err(anyhow!(
            "no input provided; pass a file or pipe data into csvtable"
        ));
    }
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

pub fn main() -> Result<()> {
    // Reset SIGPIPE to default so writing to a broken pipe exits cleanly
    // instead of panicking.
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "csvtable=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting csvtable");
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let mut parse_config = config.parse_config();
    if let Some(separator) = cli.separator {
        parse_config.separator = separator;
    }
    if let Some(enclosure) = cli.enclosure {
        parse_config.enclosure = enclosure;
    }
    if let Some(escape) = &cli.escape {
        parse_config.escape = escape.chars().next();
    }
    if let Some(header) = cli.header {
        parse_config.has_header = header;
    }

    let source = match &cli.input {
        Some(path) => read_file(path)?,
        None => read_stdin().context("Error reading input")?,
    };

    let mut pipeline = Pipeline::with_config(source, parse_config);
    info!(
        "Parsed table: {} rows, {} columns",
        pipeline.rows().len(),
        pipeline.table().num_columns()
    );

    pipeline
        .without_columns(cli.without_columns)
        .only_columns(cli.only_columns)
        .column_order(cli.column_order);

    let mut options: FormatOptions = cli.option.into_iter().collect();
    options.merge_defaults(&config.format_options());

    let format = cli.format.or(config.format);
    info!("Using formatter {:?}", format.as_deref().unwrap_or("csv"));

    let output = pipeline
        .format(format, &options)
        .context("Error formatting table")?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
