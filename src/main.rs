use anyhow::{Context, Result};
use clap::Parser;
use colored::{ColoredString, Colorize};
use logsieve::colors::TextColor;
use logsieve::columns::{Column, Columns};
use logsieve::config::{self, ViewConfig};
use logsieve::filter::FilterSet;
use logsieve::highlight::char_slice;
use logsieve::log_view::{LogView, RowData};
use logsieve::reader::memory_log::MemoryLog;
use logsieve::{logging, persist};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

/// Approximate pixel width of one terminal cell, for column widths.
const PIXELS_PER_CELL: u32 = 8;

#[derive(Parser, Debug)]
#[command(name = "logsieve")]
#[command(about = "Filter, color and highlight a live debug-log stream", long_about = None)]
struct Args {
    /// Input with `pid<TAB>process<TAB>message` lines (stdin if omitted or -)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// View config file (default: discovered logsieve.yaml and global config)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Load the filter set from a saved JSON file instead of the config
    #[arg(long, value_name = "FILE")]
    filters: Option<PathBuf>,

    /// Save the filter set as JSON after the input ends
    #[arg(long = "save-filters", value_name = "FILE")]
    save_filters: Option<PathBuf>,

    /// Show wall-clock time instead of seconds since start
    #[arg(long)]
    clock: bool,

    /// Lines ingested per update batch
    #[arg(long, default_value_t = 100, value_name = "N")]
    batch: usize,

    /// Print a header line with the visible column titles
    #[arg(long)]
    header: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: Option<&Path>) -> ViewConfig {
    let result = match path {
        Some(path) => config::load_single_file(path),
        None => config::load(&config::discover()),
    };
    match result {
        Ok(config) => config,
        Err(e) => {
            // Cargo-style formatting from ConfigError
            eprint!("{}", e);
            std::process::exit(1);
        }
    }
}

fn load_filters(args: &Args, view_config: &ViewConfig) -> Result<FilterSet> {
    let (filters, rejected) = match &args.filters {
        Some(path) => persist::load_filter_set(path)
            .with_context(|| format!("Failed to load filters from {}", path.display()))?,
        None => FilterSet::from_config(&view_config.filters),
    };
    for error in rejected {
        eprintln!("{} {}", "warning:".yellow().bold(), error);
    }
    Ok(filters)
}

fn open_input(file: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn paint(text: &str, colors: Option<TextColor>) -> ColoredString {
    match colors {
        Some(c) => text
            .truecolor(c.fore.r(), c.fore.g(), c.fore.b())
            .on_truecolor(c.back.r(), c.back.g(), c.back.b()),
        None => text.normal(),
    }
}

/// Pad `text` to the column width, right- or left-aligned.
fn pad(text: &str, column: Column, columns: &Columns) -> String {
    let cells = (columns.info(column).width / PIXELS_PER_CELL) as usize;
    let fill = " ".repeat(cells.saturating_sub(text.width()));
    if column.right_aligned() {
        format!("{fill}{text}")
    } else {
        format!("{text}{fill}")
    }
}

/// Paint the message in runs; span offsets count characters.
fn render_message(text: &str, row: &RowData, row_colors: Option<TextColor>) -> String {
    let mut out = String::new();
    let mut pos = 0;
    for span in &row.highlights {
        out.push_str(&paint(char_slice(text, pos, span.begin), row_colors).to_string());
        out.push_str(&paint(char_slice(text, span.begin, span.end), Some(span.colors)).to_string());
        pos = span.end;
    }
    out.push_str(&paint(char_slice(text, pos, usize::MAX), row_colors).to_string());
    out
}

fn render_row(row: &RowData, columns: &Columns) -> String {
    // Rows in window colors print in the terminal's own colors
    let row_colors = (row.colors != TextColor::window()).then_some(row.colors);

    let cells: Vec<String> = row
        .column_texts
        .iter()
        .map(|(column, text)| match column {
            Column::Bookmark => (if row.bookmarked { "*" } else { " " }).to_string(),
            Column::Message => render_message(text, row, row_colors),
            _ => paint(&pad(text, *column, columns), row_colors).to_string(),
        })
        .collect();
    cells.join(" ")
}

fn render_header(columns: &Columns) -> String {
    let cells: Vec<String> = columns
        .visible()
        .into_iter()
        .map(|column| match column {
            Column::Bookmark => " ".to_string(),
            Column::Message => column.title().to_string(),
            _ => pad(column.title(), column, columns),
        })
        .collect();
    cells.join(" ").bold().to_string()
}

fn print_rows(view: &LogView<MemoryLog>, from: usize, out: &mut impl Write) -> Result<usize> {
    for index in from..view.len() {
        if let Some(row) = view.row(index) {
            writeln!(out, "{}", render_row(&row, view.columns()))?;
        }
    }
    out.flush()?;
    Ok(view.len())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    if args.no_color {
        colored::control::set_override(false);
    }

    let view_config = load_config(args.config.as_deref());
    let filters = load_filters(&args, &view_config)?;

    let mut view = LogView::new(MemoryLog::new(), filters);
    view.set_clock_time(view_config.clock_time || args.clock);
    view.set_columns(view_config.columns.clone());

    let input = open_input(args.file.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let batch = args.batch.max(1);
    let mut printed = 0;
    let mut pending = 0;

    if args.header {
        writeln!(out, "{}", render_header(view.columns()))?;
    }

    view.begin_update();
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let index = view.source_mut().push_line(&line);
        view.add(index);
        pending += 1;

        if pending == batch {
            view.end_update();
            printed = print_rows(&view, printed, &mut out)?;
            pending = 0;
            view.begin_update();
        }
    }
    view.end_update();
    print_rows(&view, printed, &mut out)?;

    if let Some(path) = &args.save_filters {
        persist::save_filter_set(path, view.filters())
            .with_context(|| format!("Failed to save filters to {}", path.display()))?;
    }

    Ok(())
}
