//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。
//! `Converter`はシート→Word文書の変換と、ディレクトリ単位の一括変換を担当します。

use std::fs::{self, File};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::Serialize;

use crate::api::{DateFormat, SheetSelector};
use crate::docx::{
    set_cell_border, write_package, Alignment, BorderSpec, Document, Edge, EdgeStyle, LineRule,
    LineSpacing, Spacing,
};
use crate::error::XlsxToDocxError;
use crate::formatter::{CellFormatter, FontScript};
use crate::parser::WorkbookParser;
use crate::security::validate_output_file_name;
use crate::types::WorksheetGrid;

/// 入力ファイルの拡張子（大文字小文字を区別）
pub const SPREADSHEET_EXTENSION: &str = ".xlsx";

/// 出力ファイルの拡張子
pub const DOCUMENT_EXTENSION: &str = ".docx";

/// 表の書式設定
///
/// デフォルト値は三線表の標準書式です。
///
/// - 欧文フォント: Times New Roman
/// - 東アジアフォント: 宋体
/// - フォントサイズ: 10.5pt
/// - 行間: 固定値12pt
/// - 上罫線: 12（1.5pt）、見出し下罫線: 8（1pt）、下罫線: 12（1.5pt）、黒の一重線
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStyle {
    /// ASCII文字のみの文字列に使用するフォント
    pub western_font: String,

    /// それ以外の値に使用するフォント（`w:eastAsia`にも設定）
    pub east_asian_font: String,

    /// フォントサイズ（半ポイント単位）
    pub font_size_half_points: u32,

    /// 行間（twip単位の固定値）
    pub line_spacing: u32,

    /// 先頭行の上罫線の太さ（1/8ポイント単位）
    pub top_rule_size: u32,

    /// 2行目の上罫線（見出し下の罫線）の太さ
    pub header_rule_size: u32,

    /// 最終行の下罫線の太さ
    pub bottom_rule_size: u32,

    /// 罫線の色（16進RGB）
    pub rule_color: String,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            western_font: "Times New Roman".to_string(),
            east_asian_font: "宋体".to_string(),
            font_size_half_points: 21,
            line_spacing: 240,
            top_rule_size: 12,
            header_rule_size: 8,
            bottom_rule_size: 12,
            rule_color: "000000".to_string(),
        }
    }
}

impl TableStyle {
    /// 行位置に応じた罫線の更新内容
    ///
    /// 先頭行は上罫線（太）、2行目は上罫線（細）、最終行は下罫線（太）。
    /// 1行だけの表では先頭行に上下両方の罫線が付きます。
    /// それ以外の行は空の更新内容（変更なし）になります。
    pub fn border_spec(&self, row: usize, row_count: usize) -> BorderSpec {
        let mut spec = BorderSpec::new();

        if row == 0 {
            spec = spec.with(Edge::Top, EdgeStyle::single(self.top_rule_size, &self.rule_color));
        }
        if row == 1 {
            spec = spec.with(
                Edge::Top,
                EdgeStyle::single(self.header_rule_size, &self.rule_color),
            );
        }
        if row + 1 == row_count {
            spec = spec.with(
                Edge::Bottom,
                EdgeStyle::single(self.bottom_rule_size, &self.rule_color),
            );
        }

        spec
    }
}

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 名前指定のシートがワークブックに存在しない場合にスキップするか
    pub skip_missing_sheets: bool,

    /// 日付形式
    pub date_format: DateFormat,

    /// 出力ディレクトリ（Noneの場合は入力ディレクトリ）
    pub output_dir: Option<PathBuf>,

    /// 表の書式
    pub table_style: TableStyle,
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsx2docx::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), xlsx2docx::XlsxToDocxError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Index(0))
///     .with_output_dir("out")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: すべてのシート
    /// - 日付形式: `YYYY-MM-DD HH:MM:SS`
    /// - 出力ディレクトリ: 入力ディレクトリと同じ
    /// - 表の書式: `TableStyle::default()`
    pub fn new() -> Self {
        Self::default()
    }

    /// 変換対象のシートを選択する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 名前で選択したシートが存在しないワークブックをエラーにせずスキップする
    ///
    /// 複数のワークブックを一括変換する際、一部のファイルにしか存在しないシート名を
    /// 指定する場合に使用します。デフォルトは`false`（`Config`エラー）です。
    pub fn with_skip_missing_sheets(mut self, skip: bool) -> Self {
        self.config.skip_missing_sheets = skip;
        self
    }

    /// 日付の出力形式を指定する
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// 出力ディレクトリを指定する
    ///
    /// 指定しない場合、.docxファイルは入力ファイルと同じディレクトリに書き出されます。
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    /// 表の書式を指定する
    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.config.table_style = style;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `XlsxToDocxError::Config(String)`: 設定の検証に失敗した場合
    ///   * カスタム日付形式が空、または不正な書式指定子を含む
    ///   * フォント名が空
    ///   * フォントサイズまたは行間が0
    ///   * 罫線の色が6桁の16進数でも`auto`でもない
    pub fn build(self) -> Result<Converter, XlsxToDocxError> {
        // 1. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            if format_str.is_empty()
                || StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
            {
                return Err(XlsxToDocxError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        // 2. 表の書式の検証
        let style = &self.config.table_style;
        if style.western_font.trim().is_empty() || style.east_asian_font.trim().is_empty() {
            return Err(XlsxToDocxError::Config(
                "Font name must not be empty".to_string(),
            ));
        }
        if style.font_size_half_points == 0 {
            return Err(XlsxToDocxError::Config(
                "Font size must be greater than 0".to_string(),
            ));
        }
        if style.line_spacing == 0 {
            return Err(XlsxToDocxError::Config(
                "Line spacing must be greater than 0".to_string(),
            ));
        }
        let color = &style.rule_color;
        let is_hex = color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex && color != "auto" {
            return Err(XlsxToDocxError::Config(format!(
                "Invalid rule color: '{}'",
                color
            )));
        }

        // 3. Converterインスタンス生成
        Ok(Converter::new(self.config))
    }
}

/// 変換済みシートの情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetOutput {
    /// 入力Excelファイル
    pub source: PathBuf,

    /// シート名
    pub sheet: String,

    /// 出力.docxファイル
    pub output: PathBuf,

    /// 表の行数
    pub rows: usize,

    /// 表の列数
    pub columns: usize,
}

/// ディレクトリ一括変換の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// 処理したExcelファイル数
    pub files: usize,

    /// 変換したシート（処理順）
    pub outputs: Vec<SheetOutput>,
}

/// 変換処理のファサード
///
/// ExcelのシートをWord文書（三線表）に変換するためのメインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsx2docx::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsx2docx::XlsxToDocxError> {
/// let converter = ConverterBuilder::new().build()?;
/// let report = converter.convert_directory(".", |out| {
///     println!("{} -> {}", out.sheet, out.output.display());
/// })?;
/// println!("{} documents", report.outputs.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            config,
        }
    }

    /// 表の書式
    pub fn table_style(&self) -> &TableStyle {
        &self.config.table_style
    }

    /// Excelファイルから選択されたシートを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<WorksheetGrid>)` - シートのグリッド（ファイル内の順序）
    /// * `Err(XlsxToDocxError)` - 解析エラー、またはシート選択が不正な場合
    pub fn read_worksheets<R: Read + Seek>(
        &self,
        input: R,
    ) -> Result<Vec<WorksheetGrid>, XlsxToDocxError> {
        let mut parser = WorkbookParser::open(input)?;
        let sheet_names = parser.select_sheets(
            &self.config.sheet_selector,
            self.config.skip_missing_sheets,
        )?;

        sheet_names
            .iter()
            .map(|name| parser.read_grid(name))
            .collect()
    }

    /// シートのグリッドからWord文書を構築する
    ///
    /// # 処理フロー
    ///
    /// 1. `max_row`×`max_column`の表を持つ文書を生成
    /// 2. 各セルの表示文字列を先頭段落に1つのランとして追加し、フォント・サイズを設定
    /// 3. 全段落を中央揃え、段落前後の間隔0、行間固定に設定
    /// 4. 全セルの書き込み後、行位置に応じて罫線を適用
    pub fn build_document(&self, grid: &WorksheetGrid) -> Document {
        let style = &self.config.table_style;
        let row_count = grid.max_row();

        let mut document = Document::new();
        document.title = Some(grid.name.clone());
        let table = document.add_table(row_count, grid.max_column());

        for (source_row, table_row) in grid.rows().zip(table.rows.iter_mut()) {
            for (value, cell) in source_row.iter().zip(table_row.cells.iter_mut()) {
                let formatted = self.formatter.format_cell(value);
                let paragraph = cell.first_paragraph_mut();

                let run = paragraph.add_run(formatted.text);
                run.set_size(style.font_size_half_points);
                match formatted.script {
                    FontScript::Western => run.set_font_name(&style.western_font),
                    FontScript::EastAsian => {
                        run.set_font_name(&style.east_asian_font);
                        run.set_east_asia_font(&style.east_asian_font);
                    }
                }

                paragraph.properties.alignment = Some(Alignment::Center);
                paragraph.properties.spacing = Some(Spacing {
                    before: Some(0),
                    after: Some(0),
                    line: Some(LineSpacing {
                        value: style.line_spacing,
                        rule: LineRule::Exact,
                    }),
                });
            }
        }

        for (row_idx, row) in table.rows.iter_mut().enumerate() {
            let spec = style.border_spec(row_idx, row_count);
            for cell in &mut row.cells {
                set_cell_border(cell, &spec);
            }
        }

        document
    }

    /// シートを.docxパッケージとして任意の出力先に書き出す
    pub fn convert_sheet<W: Write + Seek>(
        &self,
        grid: &WorksheetGrid,
        output: W,
    ) -> Result<W, XlsxToDocxError> {
        let document = self.build_document(grid);
        write_package(&document, output)
    }

    /// シートを.docxファイルとして保存する（既存ファイルは上書き）
    pub fn convert_sheet_to_file<P: AsRef<Path>>(
        &self,
        grid: &WorksheetGrid,
        path: P,
    ) -> Result<(), XlsxToDocxError> {
        let file = File::create(path.as_ref())?;
        let mut file = self.convert_sheet(grid, file)?;
        file.flush()?;
        Ok(())
    }

    /// Excelファイル1つを変換する
    ///
    /// 選択された各シートを`<output_dir>/<stem>_<シート名>.docx`に保存します。
    /// シートを1つ保存するたびに`on_sheet`が呼ばれます。
    ///
    /// # 引数
    ///
    /// * `input` - Excelファイルを読み込むためのリーダー
    /// * `source` - 入力ファイルのパス（レポート用）
    /// * `stem` - 出力ファイル名の接頭辞（通常は拡張子を除いた入力ファイル名）
    /// * `output_dir` - 出力ディレクトリ
    /// * `on_sheet` - シートごとの完了通知
    pub fn convert_workbook<R, F>(
        &self,
        input: R,
        source: &Path,
        stem: &str,
        output_dir: &Path,
        mut on_sheet: F,
    ) -> Result<Vec<SheetOutput>, XlsxToDocxError>
    where
        R: Read + Seek,
        F: FnMut(&SheetOutput),
    {
        let mut parser = WorkbookParser::open(input)?;
        let sheet_names = parser.select_sheets(
            &self.config.sheet_selector,
            self.config.skip_missing_sheets,
        )?;
        log::debug!(
            "{}: {} sheet(s) selected",
            source.display(),
            sheet_names.len()
        );

        let mut outputs = Vec::with_capacity(sheet_names.len());
        for sheet_name in &sheet_names {
            let file_name = output_file_name(stem, sheet_name);
            validate_output_file_name(&file_name).map_err(XlsxToDocxError::SecurityViolation)?;
            let output_path = output_dir.join(&file_name);

            let grid = parser.read_grid(sheet_name)?;
            self.convert_sheet_to_file(&grid, &output_path)?;
            log::info!(
                "wrote {} ({}x{})",
                output_path.display(),
                grid.max_row(),
                grid.max_column()
            );

            let output = SheetOutput {
                source: source.to_path_buf(),
                sheet: sheet_name.clone(),
                output: output_path,
                rows: grid.max_row(),
                columns: grid.max_column(),
            };
            on_sheet(&output);
            outputs.push(output);
        }

        Ok(outputs)
    }

    /// ディレクトリ内のExcelファイルを一括変換する
    ///
    /// ディレクトリ直下（再帰なし）の、名前が`.xlsx`で終わる通常ファイルを
    /// ファイル名順に処理します。最初のエラーで処理を中断します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionReport)` - すべての変換に成功した場合
    /// * `Err(XlsxToDocxError)` - いずれかのファイルの処理に失敗した場合
    pub fn convert_directory<P, F>(
        &self,
        input_dir: P,
        mut on_sheet: F,
    ) -> Result<ConversionReport, XlsxToDocxError>
    where
        P: AsRef<Path>,
        F: FnMut(&SheetOutput),
    {
        let input_dir = input_dir.as_ref();
        let output_dir = self
            .config
            .output_dir
            .clone()
            .unwrap_or_else(|| input_dir.to_path_buf());
        fs::create_dir_all(&output_dir)?;

        let mut report = ConversionReport::default();
        for (path, stem) in find_spreadsheets(input_dir)? {
            log::debug!("opening {}", path.display());
            let input = File::open(&path)?;
            let outputs = self.convert_workbook(input, &path, &stem, &output_dir, &mut on_sheet)?;
            report.files += 1;
            report.outputs.extend(outputs);
        }

        Ok(report)
    }
}

/// 出力ファイル名（`<stem>_<シート名>.docx`）
pub fn output_file_name(stem: &str, sheet_name: &str) -> String {
    format!("{}_{}{}", stem, sheet_name, DOCUMENT_EXTENSION)
}

/// ディレクトリ直下のExcelファイルを列挙（パスと拡張子を除いたファイル名のペア）
fn find_spreadsheets(dir: &Path) -> Result<Vec<(PathBuf, String)>, XlsxToDocxError> {
    let mut found = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            log::debug!("skipping non UTF-8 file name {:?}", file_name);
            continue;
        };
        if let Some(stem) = name.strip_suffix(SPREADSHEET_EXTENSION) {
            found.push((path.clone(), stem.to_string()));
        }
    }

    found.sort();
    Ok(found)
}
