//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 文字列
    Text(String),

    /// 数値（f64）
    Number(f64),

    /// 論理値
    Bool(bool),

    /// 日付時刻
    DateTime(NaiveDateTime),

    /// 時刻のみ（日付部分が0のシリアル値）
    Time(NaiveTime),

    /// 経過時間（`[h]:mm:ss`書式のセル）
    Duration(TimeDelta),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// 1シート分のセル値グリッド
///
/// A1セルを原点とし、最後の使用セルまでの矩形範囲を保持します。
/// すべての行は同じ列数を持ちます。
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetGrid {
    /// シート名
    pub name: String,

    /// 行優先のセル値
    rows: Vec<Vec<CellValue>>,

    /// 列数
    cols: usize,
}

impl WorksheetGrid {
    /// 行データからグリッドを生成
    ///
    /// 短い行は`CellValue::Empty`で右詰めされます。セルが1つもない場合は
    /// 1×1の空グリッドになります（Excelの空シートの`max_row`/`max_column`は1）。
    pub fn new(name: impl Into<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let mut cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        if rows.is_empty() || cols == 0 {
            rows = vec![vec![CellValue::Empty]];
            cols = 1;
        }

        for row in &mut rows {
            row.resize(cols, CellValue::Empty);
        }

        Self {
            name: name.into(),
            rows,
            cols,
        }
    }

    /// 行数（Excelの`max_row`）
    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    /// 列数（Excelの`max_column`）
    pub fn max_column(&self) -> usize {
        self.cols
    }

    /// 行のイテレータ
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// 座標（0始まり）でセル値を取得
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Text(String::new()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_grid_pads_ragged_rows() {
        let grid = WorksheetGrid::new(
            "Sheet1",
            vec![
                vec![CellValue::Text("a".into())],
                vec![CellValue::Number(1.0), CellValue::Number(2.0), CellValue::Empty],
            ],
        );

        assert_eq!(grid.max_row(), 2);
        assert_eq!(grid.max_column(), 3);
        assert_eq!(grid.get(0, 2), Some(&CellValue::Empty));
        assert!(grid.rows().all(|row| row.len() == 3));
    }

    #[test]
    fn test_grid_empty_sheet_is_one_by_one() {
        let grid = WorksheetGrid::new("Empty", Vec::new());
        assert_eq!(grid.max_row(), 1);
        assert_eq!(grid.max_column(), 1);
        assert_eq!(grid.get(0, 0), Some(&CellValue::Empty));

        let grid = WorksheetGrid::new("Empty", vec![Vec::new(), Vec::new()]);
        assert_eq!((grid.max_row(), grid.max_column()), (1, 1));
    }

    #[test]
    fn test_grid_get_out_of_range() {
        let grid = WorksheetGrid::new("S", vec![vec![CellValue::Bool(true)]]);
        assert_eq!(grid.get(1, 0), None);
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.name, "S");
    }
}
