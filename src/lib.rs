//! xlsx2docx - Pure-Rust converter from Excel worksheets to Word tables
//!
//! This crate reads Excel workbooks (XLSX) and writes one Word document (DOCX) per
//! worksheet. Each document contains a single table replicating the worksheet grid,
//! formatted as a three-line table: a heavy rule above the first row, a light rule
//! below it, and a heavy rule below the last row.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsx2docx::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // data.xlsx (Sheet1, Sheet2) -> data_Sheet1.docx, data_Sheet2.docx
//!     converter.convert_directory(".", |out| {
//!         println!("Converted {} to {}", out.sheet, out.output.display());
//!     })?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Single Worksheet
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlsx2docx::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let sheets = converter.read_worksheets(File::open("data.xlsx")?)?;
//!
//!     for sheet in &sheets {
//!         converter.convert_sheet_to_file(sheet, format!("data_{}.docx", sheet.name))?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use xlsx2docx::{ConverterBuilder, DateFormat, SheetSelector, TableStyle};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Index(0))
//!         .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
//!         .with_table_style(TableStyle {
//!             east_asian_font: "SimSun".to_string(),
//!             ..TableStyle::default()
//!         })
//!         .with_output_dir("out")
//!         .build()?;
//!
//!     converter.convert_directory("input", |_| {})?;
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
pub mod docx;
mod error;
mod formatter;
mod parser;
mod security;
mod types;

// 公開API
pub use api::{DateFormat, SheetSelector};
pub use builder::{
    output_file_name, ConversionReport, Converter, ConverterBuilder, SheetOutput, TableStyle,
    DOCUMENT_EXTENSION, SPREADSHEET_EXTENSION,
};
pub use error::XlsxToDocxError;
pub use types::{CellValue, WorksheetGrid};
