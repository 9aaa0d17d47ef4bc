//! セル罫線の部分更新
//!
//! 指定された辺・属性だけを上書きし、それ以外の既存設定は保持します。

use super::{CellBorders, TableCell};

/// セルの辺
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// 上辺
    Top,
    /// 開始辺（左から右への文書では左辺）
    Start,
    /// 下辺
    Bottom,
    /// 終了辺（左から右への文書では右辺）
    End,
}

impl Edge {
    /// `w:tcBorders`内での出現順
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Start, Edge::Bottom, Edge::End];

    /// 要素名（`w:`プレフィックス付き）
    pub fn tag(&self) -> &'static str {
        match self {
            Edge::Top => "w:top",
            Edge::Start => "w:start",
            Edge::Bottom => "w:bottom",
            Edge::End => "w:end",
        }
    }
}

/// 1辺の罫線スタイル
///
/// 各属性は省略可能で、`None`の属性は更新時に既存値を保持します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeStyle {
    /// 線の太さ（1/8ポイント単位、`w:sz`）
    pub size: Option<u32>,
    /// 線種（`w:val`、例: `single`）
    pub val: Option<String>,
    /// 色（16進RGB、`w:color`）
    pub color: Option<String>,
    /// 文字との間隔（ポイント、`w:space`）
    pub space: Option<u32>,
    /// 影（`w:shadow`）
    pub shadow: Option<bool>,
}

impl EdgeStyle {
    /// 一重線
    pub fn single(size: u32, color: &str) -> Self {
        Self {
            size: Some(size),
            val: Some("single".to_string()),
            color: Some(color.to_string()),
            space: None,
            shadow: None,
        }
    }

    /// `other`で指定された属性だけを上書き
    fn merge_from(&mut self, other: &EdgeStyle) {
        if let Some(size) = other.size {
            self.size = Some(size);
        }
        if let Some(ref val) = other.val {
            self.val = Some(val.clone());
        }
        if let Some(ref color) = other.color {
            self.color = Some(color.clone());
        }
        if let Some(space) = other.space {
            self.space = Some(space);
        }
        if let Some(shadow) = other.shadow {
            self.shadow = Some(shadow);
        }
    }
}

/// 罫線の更新内容（辺 → スタイル）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderSpec {
    top: Option<EdgeStyle>,
    start: Option<EdgeStyle>,
    bottom: Option<EdgeStyle>,
    end: Option<EdgeStyle>,
}

impl BorderSpec {
    /// 空の更新内容を生成（どの辺も変更しない）
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定辺のスタイルを設定
    pub fn with(mut self, edge: Edge, style: EdgeStyle) -> Self {
        match edge {
            Edge::Top => self.top = Some(style),
            Edge::Start => self.start = Some(style),
            Edge::Bottom => self.bottom = Some(style),
            Edge::End => self.end = Some(style),
        }
        self
    }

    /// 指定辺のスタイル
    pub fn get(&self, edge: Edge) -> Option<&EdgeStyle> {
        match edge {
            Edge::Top => self.top.as_ref(),
            Edge::Start => self.start.as_ref(),
            Edge::Bottom => self.bottom.as_ref(),
            Edge::End => self.end.as_ref(),
        }
    }

    /// どの辺も指定されていないか
    pub fn is_empty(&self) -> bool {
        Edge::ALL.iter().all(|edge| self.get(*edge).is_none())
    }
}

/// セルに罫線を適用
///
/// `spec`でスタイルが指定された辺についてのみ、罫線要素を取得（なければ作成）し、
/// 指定された属性を設定します。指定のない辺は変更されません（消去もされません）。
/// 罫線コンテナ（`w:tcBorders`）が存在しなければ作成します。
pub fn set_cell_border(cell: &mut TableCell, spec: &BorderSpec) {
    if spec.is_empty() {
        return;
    }

    let borders = cell
        .properties
        .borders
        .get_or_insert_with(CellBorders::default);

    for edge in Edge::ALL {
        if let Some(style) = spec.get(edge) {
            borders
                .edge_slot(edge)
                .get_or_insert_with(EdgeStyle::default)
                .merge_from(style);
        }
    }
}
