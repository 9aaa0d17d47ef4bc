//! Docx Writer
//!
//! インメモリモデルを`word/document.xml`にシリアライズし、
//! .docxパッケージ（OPC / ZIPアーカイブ）として書き出す。

use std::io::{Seek, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{
    CellBorders, CellProperties, Document, Edge, EdgeStyle, Paragraph, ParagraphProperties, Run,
    RunProperties, Table, TableCell,
};
use crate::error::XlsxToDocxError;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

type XmlWriter = Writer<Vec<u8>>;

/// 文書全体を.docxパッケージとして書き出す
///
/// # 引数
///
/// * `document` - 書き出す文書
/// * `sink` - 出力先（`Write + Seek`、例: `File`、`Cursor<Vec<u8>>`）
///
/// # 戻り値
///
/// * `Ok(W)` - 書き込み完了後の出力先
/// * `Err(XlsxToDocxError)` - XML生成またはZIP書き込みに失敗した場合
pub fn write_package<W: Write + Seek>(
    document: &Document,
    sink: W,
) -> Result<W, XlsxToDocxError> {
    let document_xml = write_document_xml(document)?;
    let core_xml = core_properties_xml(document)?;

    let mut zip = ZipWriter::new(sink);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 8] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        ("docProps/app.xml", APP_XML.as_bytes()),
        ("docProps/core.xml", core_xml.as_slice()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/document.xml", document_xml.as_slice()),
        ("word/settings.xml", SETTINGS_XML.as_bytes()),
        ("word/styles.xml", STYLES_XML.as_bytes()),
    ];

    for (name, data) in parts {
        zip.start_file(name, options)?;
        zip.write_all(data)?;
    }

    Ok(zip.finish()?)
}

/// `word/document.xml`を生成
pub fn write_document_xml(document: &Document) -> Result<Vec<u8>, XlsxToDocxError> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    start(
        &mut writer,
        "w:document",
        &[("xmlns:w", NS_W), ("xmlns:r", NS_R)],
    )?;
    start(&mut writer, "w:body", &[])?;

    for (idx, table) in document.tables.iter().enumerate() {
        // 連続する表が結合されないよう空段落で区切る
        if idx > 0 {
            empty(&mut writer, "w:p", &[])?;
        }
        write_table(&mut writer, table)?;
    }

    write_section(&mut writer, document)?;

    end(&mut writer, "w:body")?;
    end(&mut writer, "w:document")?;

    Ok(writer.into_inner())
}

fn write_table(writer: &mut XmlWriter, table: &Table) -> Result<(), XlsxToDocxError> {
    start(writer, "w:tbl", &[])?;

    start(writer, "w:tblPr", &[])?;
    empty(writer, "w:tblW", &[("w:type", "auto"), ("w:w", "0")])?;
    empty(
        writer,
        "w:tblLook",
        &[
            ("w:val", "04A0"),
            ("w:firstRow", "1"),
            ("w:lastRow", "0"),
            ("w:firstColumn", "1"),
            ("w:lastColumn", "0"),
            ("w:noHBand", "0"),
            ("w:noVBand", "1"),
        ],
    )?;
    end(writer, "w:tblPr")?;

    start(writer, "w:tblGrid", &[])?;
    for width in &table.grid {
        empty(writer, "w:gridCol", &[("w:w", &width.to_string())])?;
    }
    end(writer, "w:tblGrid")?;

    for row in &table.rows {
        start(writer, "w:tr", &[])?;
        for cell in &row.cells {
            write_cell(writer, cell)?;
        }
        end(writer, "w:tr")?;
    }

    end(writer, "w:tbl")
}

fn write_cell(writer: &mut XmlWriter, cell: &TableCell) -> Result<(), XlsxToDocxError> {
    start(writer, "w:tc", &[])?;
    write_cell_properties(writer, &cell.properties)?;

    if cell.paragraphs.is_empty() {
        // セルには段落が最低1つ必要
        empty(writer, "w:p", &[])?;
    }
    for paragraph in &cell.paragraphs {
        write_paragraph(writer, paragraph)?;
    }

    end(writer, "w:tc")
}

fn write_cell_properties(
    writer: &mut XmlWriter,
    properties: &CellProperties,
) -> Result<(), XlsxToDocxError> {
    start(writer, "w:tcPr", &[])?;
    empty(
        writer,
        "w:tcW",
        &[("w:type", "dxa"), ("w:w", &properties.width.to_string())],
    )?;
    if let Some(ref borders) = properties.borders {
        write_borders(writer, borders)?;
    }
    end(writer, "w:tcPr")
}

fn write_borders(writer: &mut XmlWriter, borders: &CellBorders) -> Result<(), XlsxToDocxError> {
    start(writer, "w:tcBorders", &[])?;
    for edge in Edge::ALL {
        if let Some(style) = borders.edge(edge) {
            write_edge(writer, edge, style)?;
        }
    }
    end(writer, "w:tcBorders")
}

fn write_edge(writer: &mut XmlWriter, edge: Edge, style: &EdgeStyle) -> Result<(), XlsxToDocxError> {
    let size = style.size.map(|v| v.to_string());
    let space = style.space.map(|v| v.to_string());
    let shadow = style.shadow.map(|v| if v { "1" } else { "0" });

    let mut attrs: Vec<(&str, &str)> = Vec::new();
    if let Some(ref size) = size {
        attrs.push(("w:sz", size));
    }
    if let Some(ref val) = style.val {
        attrs.push(("w:val", val));
    }
    if let Some(ref color) = style.color {
        attrs.push(("w:color", color));
    }
    if let Some(ref space) = space {
        attrs.push(("w:space", space));
    }
    if let Some(shadow) = shadow {
        attrs.push(("w:shadow", shadow));
    }

    empty(writer, edge.tag(), &attrs)
}

fn write_paragraph(writer: &mut XmlWriter, paragraph: &Paragraph) -> Result<(), XlsxToDocxError> {
    start(writer, "w:p", &[])?;
    write_paragraph_properties(writer, &paragraph.properties)?;
    for run in &paragraph.runs {
        write_run(writer, run)?;
    }
    end(writer, "w:p")
}

fn write_paragraph_properties(
    writer: &mut XmlWriter,
    properties: &ParagraphProperties,
) -> Result<(), XlsxToDocxError> {
    if properties.alignment.is_none() && properties.spacing.is_none() {
        return Ok(());
    }

    start(writer, "w:pPr", &[])?;

    if let Some(spacing) = properties.spacing {
        let before = spacing.before.map(|v| v.to_string());
        let after = spacing.after.map(|v| v.to_string());
        let line = spacing
            .line
            .map(|l| (l.value.to_string(), l.rule.as_str()));

        let mut attrs: Vec<(&str, &str)> = Vec::new();
        if let Some(ref before) = before {
            attrs.push(("w:before", before));
        }
        if let Some(ref after) = after {
            attrs.push(("w:after", after));
        }
        if let Some((ref value, rule)) = line {
            attrs.push(("w:line", value));
            attrs.push(("w:lineRule", rule));
        }
        empty(writer, "w:spacing", &attrs)?;
    }

    if let Some(alignment) = properties.alignment {
        empty(writer, "w:jc", &[("w:val", alignment.as_str())])?;
    }

    end(writer, "w:pPr")
}

fn write_run(writer: &mut XmlWriter, run: &Run) -> Result<(), XlsxToDocxError> {
    start(writer, "w:r", &[])?;
    write_run_properties(writer, &run.properties)?;

    let mut buffer = String::new();
    let mut chars = run.text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                flush_text(writer, &mut buffer)?;
                empty(writer, "w:br", &[])?;
            }
            '\t' => {
                flush_text(writer, &mut buffer)?;
                empty(writer, "w:tab", &[])?;
            }
            _ => buffer.push(c),
        }
    }
    flush_text(writer, &mut buffer)?;

    end(writer, "w:r")
}

fn flush_text(writer: &mut XmlWriter, buffer: &mut String) -> Result<(), XlsxToDocxError> {
    if buffer.is_empty() {
        return Ok(());
    }
    start(writer, "w:t", &[("xml:space", "preserve")])?;
    writer.write_event(Event::Text(BytesText::new(buffer.as_str())))?;
    end(writer, "w:t")?;
    buffer.clear();
    Ok(())
}

fn write_run_properties(
    writer: &mut XmlWriter,
    properties: &RunProperties,
) -> Result<(), XlsxToDocxError> {
    if properties.fonts.is_none() && properties.size.is_none() {
        return Ok(());
    }

    start(writer, "w:rPr", &[])?;

    if let Some(ref fonts) = properties.fonts {
        let mut attrs: Vec<(&str, &str)> = Vec::new();
        if let Some(ref ascii) = fonts.ascii {
            attrs.push(("w:ascii", ascii));
        }
        if let Some(ref h_ansi) = fonts.h_ansi {
            attrs.push(("w:hAnsi", h_ansi));
        }
        if let Some(ref east_asia) = fonts.east_asia {
            attrs.push(("w:eastAsia", east_asia));
        }
        empty(writer, "w:rFonts", &attrs)?;
    }

    if let Some(size) = properties.size {
        empty(writer, "w:sz", &[("w:val", &size.to_string())])?;
    }

    end(writer, "w:rPr")
}

fn write_section(writer: &mut XmlWriter, document: &Document) -> Result<(), XlsxToDocxError> {
    let layout = &document.layout;
    start(writer, "w:sectPr", &[])?;
    empty(
        writer,
        "w:pgSz",
        &[
            ("w:w", &layout.width.to_string()),
            ("w:h", &layout.height.to_string()),
        ],
    )?;
    empty(
        writer,
        "w:pgMar",
        &[
            ("w:top", &layout.margin_top.to_string()),
            ("w:right", &layout.margin_right.to_string()),
            ("w:bottom", &layout.margin_bottom.to_string()),
            ("w:left", &layout.margin_left.to_string()),
            ("w:header", &layout.header.to_string()),
            ("w:footer", &layout.footer.to_string()),
            ("w:gutter", "0"),
        ],
    )?;
    end(writer, "w:sectPr")
}

/// `docProps/core.xml`を生成
fn core_properties_xml(document: &Document) -> Result<Vec<u8>, XlsxToDocxError> {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    start(
        &mut writer,
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;

    text_element(
        &mut writer,
        "dc:title",
        &[],
        document.title.as_deref().unwrap_or(""),
    )?;
    text_element(&mut writer, "dc:creator", &[], env!("CARGO_PKG_NAME"))?;
    text_element(
        &mut writer,
        "dcterms:created",
        &[("xsi:type", "dcterms:W3CDTF")],
        &now,
    )?;
    text_element(
        &mut writer,
        "dcterms:modified",
        &[("xsi:type", "dcterms:W3CDTF")],
        &now,
    )?;

    end(&mut writer, "cp:coreProperties")?;
    Ok(writer.into_inner())
}

fn start(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<(), XlsxToDocxError> {
    let mut element = BytesStart::new(tag);
    element.extend_attributes(attrs.iter().copied());
    writer.write_event(Event::Start(element))?;
    Ok(())
}

fn empty(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<(), XlsxToDocxError> {
    let mut element = BytesStart::new(tag);
    element.extend_attributes(attrs.iter().copied());
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

fn end(writer: &mut XmlWriter, tag: &str) -> Result<(), XlsxToDocxError> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn text_element(
    writer: &mut XmlWriter,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<(), XlsxToDocxError> {
    start(writer, tag, attrs)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, tag)
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>
</Relationships>"#;

const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
  <Application>xlsx2docx</Application>
</Properties>"#;

const SETTINGS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:defaultTabStop w:val="720"/>
  <w:compat>
    <w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="14"/>
  </w:compat>
</w:settings>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault>
      <w:rPr>
        <w:sz w:val="24"/>
        <w:szCs w:val="24"/>
        <w:lang w:val="en-US" w:eastAsia="zh-CN"/>
      </w:rPr>
    </w:rPrDefault>
    <w:pPrDefault/>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="table" w:default="1" w:styleId="TableNormal">
    <w:name w:val="Normal Table"/>
    <w:uiPriority w:val="99"/>
    <w:semiHidden/>
    <w:unhideWhenUsed/>
    <w:tblPr>
      <w:tblInd w:w="0" w:type="dxa"/>
      <w:tblCellMar>
        <w:top w:w="0" w:type="dxa"/>
        <w:left w:w="108" w:type="dxa"/>
        <w:bottom w:w="0" w:type="dxa"/>
        <w:right w:w="108" w:type="dxa"/>
      </w:tblCellMar>
    </w:tblPr>
  </w:style>
</w:styles>"#;
