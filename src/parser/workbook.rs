//! Parser Module
//!
//! calamineを使用したExcelファイル解析の基礎実装。
//! シートをA1セル起点の矩形グリッド（`WorksheetGrid`）として抽出します。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets, Xlsx, XlsxError};
use std::io::{Cursor, Read, Seek};

use crate::api::SheetSelector;
use crate::error::XlsxToDocxError;
use crate::formatter::parse_iso_datetime;
use crate::security::SecurityConfig;
use crate::types::{CellValue, WorksheetGrid};

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// 入力全体をメモリに読み込んでから解析します。
    ///
    /// # 引数
    ///
    /// * `reader` - Excelファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(XlsxToDocxError::SecurityViolation)` - 入力サイズが上限を超えた場合
    /// * `Err(XlsxToDocxError::Parse)` - 解析に失敗した場合
    /// * `Err(XlsxToDocxError::Config)` - XLSX以外の形式だった場合
    pub fn open<R: Read + Seek>(mut reader: R) -> Result<Self, XlsxToDocxError> {
        let security_config = SecurityConfig::default();

        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;

        if bytes_read as u64 > security_config.max_input_file_size {
            return Err(XlsxToDocxError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, security_config.max_input_file_size
            )));
        }

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer))
            .map_err(XlsxToDocxError::Parse)?;
        match sheets {
            Sheets::Xlsx(workbook) => Ok(Self { workbook }),
            _ => Err(XlsxToDocxError::Config(
                "Only XLSX format is supported".to_string(),
            )),
        }
    }

    /// すべてのシート名を取得（ファイル内の順序）
    pub fn get_sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// # 引数
    ///
    /// * `selector` - シート選択方式
    /// * `skip_missing` - `true`の場合、名前指定で存在しないシートをエラーにせず除外する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 選択されたシート名のリスト
    /// * `Err(XlsxToDocxError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheets(
        &self,
        selector: &SheetSelector,
        skip_missing: bool,
    ) -> Result<Vec<String>, XlsxToDocxError> {
        let all_sheet_names = self.get_sheet_names();

        let by_index = |index: usize| -> Result<String, XlsxToDocxError> {
            all_sheet_names.get(index).cloned().ok_or_else(|| {
                XlsxToDocxError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    all_sheet_names.len()
                ))
            })
        };
        let by_names = |names: &[String]| -> Result<Vec<String>, XlsxToDocxError> {
            let mut selected = Vec::with_capacity(names.len());
            for name in names {
                if all_sheet_names.contains(name) {
                    selected.push(name.clone());
                } else if skip_missing {
                    log::debug!("sheet '{}' not present, skipped", name);
                } else {
                    return Err(XlsxToDocxError::Config(format!(
                        "Sheet '{}' not found",
                        name
                    )));
                }
            }
            Ok(selected)
        };

        match selector {
            SheetSelector::All => Ok(all_sheet_names.clone()),
            SheetSelector::Index(index) => Ok(vec![by_index(*index)?]),
            SheetSelector::Name(name) => by_names(std::slice::from_ref(name)),
            SheetSelector::Indices(indices) => indices.iter().map(|i| by_index(*i)).collect(),
            SheetSelector::Names(names) => by_names(names),
        }
    }

    /// シートを読み込み、A1から最終使用セルまでのグリッドを構築
    ///
    /// 範囲はシートXMLに現れるすべてのセル（値を持たない書式のみのセルを含む）から
    /// 求めるため、行数・列数はExcelの`max_row`/`max_column`に一致します。
    /// 数式セルはキャッシュされた計算結果ではなく`=`付きの数式文字列になります。
    pub fn read_grid(&mut self, sheet_name: &str) -> Result<WorksheetGrid, XlsxToDocxError> {
        let cells = self.read_cells(sheet_name)?;

        let Some((max_row, max_col)) = cells
            .iter()
            .map(|&((row, col), _)| (row as usize + 1, col as usize + 1))
            .reduce(|(r1, c1), (r2, c2)| (r1.max(r2), c1.max(c2)))
        else {
            return Ok(WorksheetGrid::new(sheet_name, Vec::new()));
        };

        let mut rows = vec![vec![CellValue::Empty; max_col]; max_row];
        for ((row, col), value) in cells {
            rows[row as usize][col as usize] = convert_cell(&value);
        }

        let formulas = self
            .workbook
            .worksheet_formula(sheet_name)
            .map_err(|e| XlsxToDocxError::Parse(e.into()))?;
        if let Some((start_row, start_col)) = formulas.start() {
            for (row, col, formula) in formulas.used_cells() {
                let row = start_row as usize + row;
                let col = start_col as usize + col;
                if let Some(cell) = rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *cell = CellValue::Text(format!("={}", formula));
                }
            }
        }

        Ok(WorksheetGrid::new(sheet_name, rows))
    }

    /// シートXMLに現れるすべてのセルを位置付きで読み込む
    ///
    /// ワークシート以外のシート（グラフシートなど）はセルなしとして扱います。
    fn read_cells(&mut self, sheet_name: &str) -> Result<Vec<((u32, u32), Data)>, XlsxToDocxError> {
        let mut reader = match self.workbook.worksheet_cells_reader(sheet_name) {
            Ok(reader) => reader,
            Err(XlsxError::NotAWorksheet(typ)) => {
                log::warn!("'{}' is not a worksheet ({})", sheet_name, typ);
                return Ok(Vec::new());
            }
            Err(e) => return Err(XlsxToDocxError::Parse(e.into())),
        };

        let mut cells = Vec::new();
        while let Some(cell) = reader
            .next_cell()
            .map_err(|e| XlsxToDocxError::Parse(e.into()))?
        {
            cells.push((cell.get_position(), Data::from(cell.get_value().clone())));
        }

        Ok(cells)
    }
}

/// calamineのセル値を`CellValue`に変換
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                match dt.as_duration() {
                    Some(duration) => CellValue::Duration(duration),
                    None => CellValue::Number(dt.as_f64()),
                }
            } else {
                let serial = dt.as_f64();
                match dt.as_datetime() {
                    Some(datetime) if (0.0..1.0).contains(&serial) => {
                        CellValue::Time(datetime.time())
                    }
                    Some(datetime) => CellValue::DateTime(datetime),
                    None => CellValue::Number(serial),
                }
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Format, Formula, Workbook};

    #[test]
    fn test_convert_cell_scalars() {
        assert_eq!(convert_cell(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(convert_cell(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(
            convert_cell(&Data::String("名称".to_string())),
            CellValue::Text("名称".to_string())
        );
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_convert_cell_error() {
        let value = convert_cell(&Data::Error(calamine::CellErrorType::Div0));
        assert_eq!(value, CellValue::Error("#DIV/0!".to_string()));
    }

    #[test]
    fn test_convert_cell_iso_strings() {
        assert!(matches!(
            convert_cell(&Data::DateTimeIso("2024-03-01T12:00:00".to_string())),
            CellValue::DateTime(_)
        ));
        assert_eq!(
            convert_cell(&Data::DurationIso("PT1H".to_string())),
            CellValue::Text("PT1H".to_string())
        );
    }

    fn open_generated(build: impl FnOnce(&mut Workbook)) -> WorkbookParser {
        let mut workbook = Workbook::new();
        build(&mut workbook);
        let data = workbook.save_to_buffer().unwrap();
        WorkbookParser::open(Cursor::new(data)).unwrap()
    }

    #[test]
    fn test_read_grid_includes_formatted_blank_cells() {
        let mut parser = open_generated(|wb| {
            let sheet = wb.add_worksheet();
            sheet.write_string(0, 0, "A").unwrap();
            sheet.write_blank(4, 3, &Format::new().set_bold()).unwrap();
        });

        let grid = parser.read_grid("Sheet1").unwrap();
        assert_eq!((grid.max_row(), grid.max_column()), (5, 4));
        assert_eq!(grid.get(0, 0), Some(&CellValue::Text("A".to_string())));
        assert_eq!(grid.get(4, 3), Some(&CellValue::Empty));
    }

    #[test]
    fn test_read_grid_formula_text() {
        let mut parser = open_generated(|wb| {
            let sheet = wb.add_worksheet();
            sheet.write_number(0, 0, 1.0).unwrap();
            sheet
                .write_formula(0, 1, Formula::new("=A1+1").set_result("2"))
                .unwrap();
        });

        let grid = parser.read_grid("Sheet1").unwrap();
        assert_eq!(grid.get(0, 0), Some(&CellValue::Number(1.0)));
        assert_eq!(grid.get(0, 1), Some(&CellValue::Text("=A1+1".to_string())));
    }

    #[test]
    fn test_select_sheets_missing_name() {
        let parser = open_generated(|wb| {
            wb.add_worksheet().set_name("Data").unwrap();
        });
        let selector = SheetSelector::Names(vec!["Summary".to_string(), "Data".to_string()]);

        let err = parser.select_sheets(&selector, false).unwrap_err();
        assert!(matches!(err, XlsxToDocxError::Config(ref msg) if msg.contains("Summary")));

        let selected = parser.select_sheets(&selector, true).unwrap();
        assert_eq!(selected, vec!["Data".to_string()]);

        let selected = parser
            .select_sheets(&SheetSelector::Name("Summary".to_string()), true)
            .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_select_sheets_index_ignores_skip_missing() {
        let parser = open_generated(|wb| {
            wb.add_worksheet();
        });
        assert!(parser.select_sheets(&SheetSelector::Index(3), true).is_err());
    }

    #[test]
    fn test_open_rejects_non_xlsx() {
        let result = WorkbookParser::open(Cursor::new(b"not a workbook".to_vec()));
        assert!(result.is_err());
    }
}
