//! xlsx2docx CLI
//!
//! Converts every `.xlsx` file in a directory into one `.docx` per worksheet.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::*;
use log::{Level, Log, Metadata, Record};
use xlsx2docx::{ConversionReport, ConverterBuilder, SheetSelector, XlsxToDocxError};

/// Convert Excel worksheets into Word three-line tables
#[derive(Parser)]
#[command(
    name = "xlsx2docx",
    version,
    about = "Convert Excel worksheets into Word tables",
    long_about = "xlsx2docx - converts every .xlsx file in a directory into one .docx per worksheet.\n\n\
                  Output files are named <file>_<sheet>.docx."
)]
struct Cli {
    /// Directory containing .xlsx files
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Output directory (default: same as input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Convert only the named sheet(s); workbooks without a given sheet skip it
    #[arg(long = "sheet", value_name = "NAME")]
    sheets: Vec<String>,

    /// Print the conversion report as JSON
    #[arg(long)]
    json: bool,

    /// Log progress details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pause: bool,
}

/// Minimal stderr logger for the `log` facade
struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logger(verbose: bool) {
    let level = if verbose { Level::Info } else { Level::Warn };
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level.to_level_filter());
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = run(&cli);
    if let Err(ref e) = result {
        handle_error(e);
    }

    if cli.pause {
        pause();
    }

    if result.is_err() {
        process::exit(1);
    }
}

fn converter_builder(cli: &Cli) -> ConverterBuilder {
    let mut builder = ConverterBuilder::new();
    if !cli.sheets.is_empty() {
        builder = builder
            .with_sheet_selector(SheetSelector::Names(cli.sheets.clone()))
            .with_skip_missing_sheets(true);
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.with_output_dir(dir.clone());
    }
    builder
}

fn report_json(report: &ConversionReport) -> Result<String, XlsxToDocxError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| XlsxToDocxError::Config(format!("JSON serialization error: {}", e)))
}

fn run(cli: &Cli) -> Result<(), XlsxToDocxError> {
    let converter = converter_builder(cli).build()?;

    if cli.json {
        let report = converter.convert_directory(&cli.dir, |_| {})?;
        println!("{}", report_json(&report)?);
        return Ok(());
    }

    println!("{}", "Excel to Word转换开始...".bold());
    converter.convert_directory(&cli.dir, |out| {
        let source = out
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output = out
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("Converted {} in {} to {}", out.sheet, source, output.green());
    })?;
    println!("{}", "Excel to Word转换完成！".bold());

    Ok(())
}

fn pause() {
    print!("Press Enter to continue...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn handle_error(error: &XlsxToDocxError) {
    match error {
        XlsxToDocxError::Io(io_err) => {
            eprintln!("{} {}", "I/O Error:".red().bold(), io_err);
            eprintln!("Please check that the files exist and you have permission to write the output.");
        }
        XlsxToDocxError::Parse(parse_err) => {
            eprintln!("{} {}", "Parse Error:".red().bold(), parse_err);
            eprintln!("The file may not be a valid Excel file or may be corrupted.");
        }
        XlsxToDocxError::Xml(xml_err) => {
            eprintln!("{} {}", "XML Error:".red().bold(), xml_err);
        }
        XlsxToDocxError::Zip(msg) => {
            eprintln!("{} {}", "ZIP Archive Error:".red().bold(), msg);
        }
        XlsxToDocxError::Config(msg) => {
            eprintln!("{} {}", "Configuration Error:".red().bold(), msg);
            eprintln!("Please check your sheet selection.");
        }
        XlsxToDocxError::SecurityViolation(msg) => {
            eprintln!("{} {}", "Security Violation:".red().bold(), msg);
        }
    }
}
