//! Shared helpers for reading generated .docx files back in tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One table cell as found in word/document.xml
#[derive(Debug, Default, Clone)]
pub struct DocxCell {
    pub text: String,
    pub run_count: usize,
    pub ascii_font: Option<String>,
    pub h_ansi_font: Option<String>,
    pub east_asia_font: Option<String>,
    pub size: Option<String>,
    pub alignment: Option<String>,
    pub spacing_before: Option<String>,
    pub spacing_after: Option<String>,
    pub line: Option<String>,
    pub line_rule: Option<String>,
    pub has_borders: bool,
    /// edge name ("top", "bottom", ...) -> attribute name ("sz", "val", ...) -> value
    pub borders: HashMap<String, HashMap<String, String>>,
}

impl DocxCell {
    pub fn border(&self, edge: &str, attr: &str) -> Option<&str> {
        self.borders
            .get(edge)
            .and_then(|attrs| attrs.get(attr))
            .map(String::as_str)
    }
}

/// Parsed first table of a document
#[derive(Debug, Default)]
pub struct DocxTable {
    pub grid_cols: usize,
    pub rows: Vec<Vec<DocxCell>>,
}

impl DocxTable {
    pub fn cell(&self, row: usize, col: usize) -> &DocxCell {
        &self.rows[row][col]
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }
}

pub fn read_part<R: Read + Seek>(docx: R, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(docx).expect("valid zip archive");
    let mut part = archive.by_name(name).expect("part present");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("utf-8 part");
    xml
}

pub fn read_document_xml(path: &Path) -> String {
    let file = std::fs::File::open(path).expect("docx exists");
    read_part(file, "word/document.xml")
}

pub fn read_table_from_bytes(bytes: Vec<u8>) -> DocxTable {
    parse_table(&read_part(Cursor::new(bytes), "word/document.xml"))
}

pub fn read_table(path: &Path) -> DocxTable {
    parse_table(&read_document_xml(path))
}

fn attr<B>(reader: &Reader<B>, e: &BytesStart, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .expect("well-formed attribute")
        .map(|a| {
            a.decode_and_unescape_value(reader)
                .expect("escaped value")
                .into_owned()
        })
}

/// Parse the first `w:tbl` of a document.xml string.
pub fn parse_table(xml: &str) -> DocxTable {
    let mut reader = Reader::from_str(xml);
    let mut table = DocxTable::default();

    let mut in_table = false;
    let mut in_borders = false;
    let mut in_text = false;
    let mut cell: Option<DocxCell> = None;

    loop {
        let event = reader.read_event().expect("well-formed XML");
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    "w:tbl" => in_table = true,
                    "w:gridCol" if in_table => table.grid_cols += 1,
                    "w:tr" if in_table => table.rows.push(Vec::new()),
                    "w:tc" if in_table => cell = Some(DocxCell::default()),
                    "w:tcBorders" => {
                        if let Some(c) = cell.as_mut() {
                            c.has_borders = true;
                        }
                        in_borders = is_start;
                    }
                    "w:top" | "w:start" | "w:bottom" | "w:end" if in_borders => {
                        if let Some(c) = cell.as_mut() {
                            let edge = name.trim_start_matches("w:").to_string();
                            let mut attrs = HashMap::new();
                            for a in e.attributes() {
                                let a = a.expect("attribute");
                                let key = String::from_utf8_lossy(a.key.as_ref())
                                    .trim_start_matches("w:")
                                    .to_string();
                                let value = a
                                    .decode_and_unescape_value(&reader)
                                    .expect("value")
                                    .into_owned();
                                attrs.insert(key, value);
                            }
                            c.borders.insert(edge, attrs);
                        }
                    }
                    "w:r" => {
                        if let Some(c) = cell.as_mut() {
                            c.run_count += 1;
                        }
                    }
                    "w:rFonts" => {
                        if let Some(c) = cell.as_mut() {
                            c.ascii_font = attr(&reader, e, "w:ascii");
                            c.h_ansi_font = attr(&reader, e, "w:hAnsi");
                            c.east_asia_font = attr(&reader, e, "w:eastAsia");
                        }
                    }
                    "w:sz" => {
                        if let Some(c) = cell.as_mut() {
                            c.size = attr(&reader, e, "w:val");
                        }
                    }
                    "w:jc" => {
                        if let Some(c) = cell.as_mut() {
                            c.alignment = attr(&reader, e, "w:val");
                        }
                    }
                    "w:spacing" => {
                        if let Some(c) = cell.as_mut() {
                            c.spacing_before = attr(&reader, e, "w:before");
                            c.spacing_after = attr(&reader, e, "w:after");
                            c.line = attr(&reader, e, "w:line");
                            c.line_rule = attr(&reader, e, "w:lineRule");
                        }
                    }
                    "w:t" => in_text = is_start,
                    "w:br" => {
                        if let Some(c) = cell.as_mut() {
                            c.text.push('\n');
                        }
                    }
                    "w:tab" => {
                        if let Some(c) = cell.as_mut() {
                            c.text.push('\t');
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref t) if in_text => {
                if let Some(c) = cell.as_mut() {
                    c.text.push_str(&t.unescape().expect("escaped text"));
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:tcBorders" => in_borders = false,
                b"w:tc" => {
                    if let (Some(c), Some(row)) = (cell.take(), table.rows.last_mut()) {
                        row.push(c);
                    }
                }
                b"w:tbl" => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    table
}
