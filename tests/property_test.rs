//! Property Tests
//!
//! 任意のグリッドに対して、生成される文書の表構造・フォント・罫線が
//! 常に規則どおりであることを検証します。

use proptest::prelude::*;
use xlsx2docx::docx::{Alignment, Edge, LineRule};
use xlsx2docx::{CellValue, ConverterBuilder, WorksheetGrid};

fn cell_value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        "[ -~]{0,12}".prop_map(CellValue::Text),
        "\\PC{1,6}".prop_map(CellValue::Text),
        (-1.0e9f64..1.0e9f64).prop_map(CellValue::Number),
        any::<bool>().prop_map(CellValue::Bool),
        Just(CellValue::Empty),
    ]
}

fn grid() -> impl Strategy<Value = WorksheetGrid> {
    (1usize..8, 1usize..6).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(proptest::collection::vec(cell_value(), cols), rows)
            .prop_map(|rows| WorksheetGrid::new("Sheet1", rows))
    })
}

proptest! {
    #[test]
    fn prop_table_matches_grid_dimensions(grid in grid()) {
        let converter = ConverterBuilder::new().build().unwrap();
        let document = converter.build_document(&grid);

        prop_assert_eq!(document.tables.len(), 1);
        let table = &document.tables[0];
        prop_assert_eq!(table.row_count(), grid.max_row());
        prop_assert_eq!(table.column_count(), grid.max_column());
    }

    #[test]
    fn prop_every_cell_has_one_formatted_run(grid in grid()) {
        let converter = ConverterBuilder::new().build().unwrap();
        let document = converter.build_document(&grid);
        let table = &document.tables[0];

        for (r, row) in grid.rows().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let paragraph = &table.cell(r, c).unwrap().paragraphs[0];
                prop_assert_eq!(paragraph.runs.len(), 1);
                prop_assert_eq!(paragraph.properties.alignment, Some(Alignment::Center));

                let spacing = paragraph.properties.spacing.unwrap();
                prop_assert_eq!(spacing.before, Some(0));
                prop_assert_eq!(spacing.after, Some(0));
                prop_assert_eq!(spacing.line.map(|l| l.rule), Some(LineRule::Exact));

                let run = &paragraph.runs[0];
                prop_assert_eq!(run.properties.size, Some(21));
                let fonts = run.properties.fonts.as_ref().unwrap();
                let western = matches!(value, CellValue::Text(s) if s.is_ascii());
                if western {
                    prop_assert_eq!(fonts.ascii.as_deref(), Some("Times New Roman"));
                    prop_assert_eq!(fonts.east_asia.as_deref(), None);
                } else {
                    prop_assert_eq!(fonts.ascii.as_deref(), Some("宋体"));
                    prop_assert_eq!(fonts.east_asia.as_deref(), Some("宋体"));
                }
            }
        }
    }

    #[test]
    fn prop_borders_follow_row_position(grid in grid()) {
        let converter = ConverterBuilder::new().build().unwrap();
        let document = converter.build_document(&grid);
        let table = &document.tables[0];
        let last = table.row_count() - 1;

        for (r, row) in table.rows.iter().enumerate() {
            for cell in &row.cells {
                let edge_size = |edge: Edge| {
                    cell.properties
                        .borders
                        .as_ref()
                        .and_then(|b| b.edge(edge))
                        .and_then(|e| e.size)
                };

                let expected_top = match r {
                    0 => Some(12),
                    1 => Some(8),
                    _ => None,
                };
                let expected_bottom = if r == last { Some(12) } else { None };

                prop_assert_eq!(edge_size(Edge::Top), expected_top);
                prop_assert_eq!(edge_size(Edge::Bottom), expected_bottom);
                prop_assert_eq!(edge_size(Edge::Start), None);
                prop_assert_eq!(edge_size(Edge::End), None);
            }
        }
    }
}
