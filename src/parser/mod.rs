//! Parser Module
//!
//! Excelファイルの解析を担当するモジュール群。

mod workbook;

pub(crate) use workbook::WorkbookParser;
