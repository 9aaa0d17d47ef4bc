//! Docx Module
//!
//! Word文書（WordprocessingML）のインメモリモデルを提供するモジュール。
//! 表・行・セル・段落・ランと、それぞれの書式プロパティを保持します。
//! シリアライズは`writer`、セル罫線の部分更新は`border`が担当します。

mod border;
mod writer;

pub use border::{set_cell_border, BorderSpec, Edge, EdgeStyle};
pub use writer::{write_document_xml, write_package};

/// ページ設定（twip単位、1twip = 1/20pt）
///
/// デフォルトはLetterサイズ、左右余白1.25インチ、上下余白1インチ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub header: u32,
    pub footer: u32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 12_240,
            height: 15_840,
            margin_top: 1_440,
            margin_right: 1_800,
            margin_bottom: 1_440,
            margin_left: 1_800,
            header: 720,
            footer: 720,
        }
    }
}

impl PageLayout {
    /// 本文領域の幅
    pub fn block_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margin_left)
            .saturating_sub(self.margin_right)
    }
}

/// Word文書
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// 文書タイトル（docProps/core.xmlの`dc:title`）
    pub title: Option<String>,

    /// ページ設定
    pub layout: PageLayout,

    /// 本文の表（出現順）
    pub tables: Vec<Table>,
}

impl Document {
    /// 空の文書を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 本文末尾に`rows`×`cols`の表を追加
    ///
    /// 各列幅は本文領域の幅を均等に分割した値になります。
    /// 各セルは空の段落を1つ持ちます。
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Table {
        let col_width = if cols == 0 {
            0
        } else {
            self.layout.block_width() / cols as u32
        };
        self.tables.push(Table::new(rows, cols, col_width));
        let last = self.tables.len() - 1;
        &mut self.tables[last]
    }
}

/// 表
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// 列幅（`w:tblGrid`）
    pub grid: Vec<u32>,

    /// 行
    pub rows: Vec<TableRow>,
}

impl Table {
    fn new(rows: usize, cols: usize, col_width: u32) -> Self {
        let row = TableRow {
            cells: vec![TableCell::new(col_width); cols],
        };
        Self {
            grid: vec![col_width; cols],
            rows: vec![row; rows],
        }
    }

    /// 行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 列数
    pub fn column_count(&self) -> usize {
        self.grid.len()
    }

    /// 座標（0始まり）でセルを取得
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// 座標（0始まり）でセルを可変参照で取得
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row).and_then(|r| r.cells.get_mut(col))
    }
}

/// 表の行
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// 表のセル
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// セルプロパティ（`w:tcPr`）
    pub properties: CellProperties,

    /// 段落（少なくとも1つ）
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    fn new(width: u32) -> Self {
        Self {
            properties: CellProperties {
                width,
                borders: None,
            },
            paragraphs: vec![Paragraph::default()],
        }
    }

    /// 先頭の段落
    pub fn first_paragraph_mut(&mut self) -> &mut Paragraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::default());
        }
        &mut self.paragraphs[0]
    }

    /// セル内の全テキスト（段落は改行で連結）
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// セルプロパティ
#[derive(Debug, Clone, PartialEq)]
pub struct CellProperties {
    /// セル幅（twip、`w:tcW`）
    pub width: u32,

    /// 罫線（`w:tcBorders`）。罫線が一度も設定されていなければ`None`
    pub borders: Option<CellBorders>,
}

/// セル罫線（4辺）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellBorders {
    pub top: Option<EdgeStyle>,
    pub start: Option<EdgeStyle>,
    pub bottom: Option<EdgeStyle>,
    pub end: Option<EdgeStyle>,
}

impl CellBorders {
    /// 指定辺の罫線
    pub fn edge(&self, edge: Edge) -> Option<&EdgeStyle> {
        match edge {
            Edge::Top => self.top.as_ref(),
            Edge::Start => self.start.as_ref(),
            Edge::Bottom => self.bottom.as_ref(),
            Edge::End => self.end.as_ref(),
        }
    }

    pub(crate) fn edge_slot(&mut self, edge: Edge) -> &mut Option<EdgeStyle> {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Start => &mut self.start,
            Edge::Bottom => &mut self.bottom,
            Edge::End => &mut self.end,
        }
    }
}

/// 段落の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Both,
}

impl Alignment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Both => "both",
        }
    }
}

/// 行間の解釈（`w:lineRule`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    /// 240分率の倍数
    Auto,
    /// 固定値（twip）
    Exact,
    /// 最小値（twip）
    AtLeast,
}

impl LineRule {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            LineRule::Auto => "auto",
            LineRule::Exact => "exact",
            LineRule::AtLeast => "atLeast",
        }
    }
}

/// 行間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpacing {
    pub value: u32,
    pub rule: LineRule,
}

/// 段落の間隔（twip）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
    pub line: Option<LineSpacing>,
}

/// 段落プロパティ（`w:pPr`）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    pub alignment: Option<Alignment>,
    pub spacing: Option<Spacing>,
}

/// 段落
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub properties: ParagraphProperties,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// 段落末尾にランを追加
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.runs.push(Run {
            text: text.into(),
            properties: RunProperties::default(),
        });
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    /// 段落内の全テキスト
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// ランのフォント指定（`w:rFonts`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFonts {
    pub ascii: Option<String>,
    pub h_ansi: Option<String>,
    pub east_asia: Option<String>,
}

/// ランプロパティ（`w:rPr`）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    pub fonts: Option<RunFonts>,

    /// フォントサイズ（半ポイント単位、`w:sz`）
    pub size: Option<u32>,
}

/// ラン
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// テキスト。改行は`w:br`、タブは`w:tab`として書き出される
    pub text: String,
    pub properties: RunProperties,
}

impl Run {
    /// 基本フォント名を設定（`w:ascii`と`w:hAnsi`）
    pub fn set_font_name(&mut self, name: &str) {
        let fonts = self.properties.fonts.get_or_insert_with(RunFonts::default);
        fonts.ascii = Some(name.to_string());
        fonts.h_ansi = Some(name.to_string());
    }

    /// 東アジア文字用フォント名を設定（`w:eastAsia`）
    pub fn set_east_asia_font(&mut self, name: &str) {
        let fonts = self.properties.fonts.get_or_insert_with(RunFonts::default);
        fonts.east_asia = Some(name.to_string());
    }

    /// フォントサイズを半ポイント単位で設定
    pub fn set_size(&mut self, half_points: u32) {
        self.properties.size = Some(half_points);
    }
}
