//! xlsx のハイパーリンク読み込み
//!
//! calamine はセルのハイパーリンクを返さないため、xlsx（zip）内の
//! シートXMLとリレーションを直接読んで (行, 列) → リンク先 を作る。
//!
//! - xl/workbook.xml: シート順とアクティブシート（activeTab）
//! - xl/_rels/workbook.xml.rels: シートの r:id → XMLパス
//! - xl/worksheets/sheetN.xml: `<hyperlink ref="D2" r:id="rId1"/>`
//! - xl/worksheets/_rels/sheetN.xml.rels: r:id → Target

use crate::error::{QaInsightsError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

lazy_static::lazy_static! {
    static ref ACTIVE_TAB: Regex = Regex::new(r#"<workbookView\b[^>]*\sactiveTab="(\d+)""#).unwrap();
    static ref SHEET_ELEMENT: Regex = Regex::new(r"<sheet\b[^>]*>").unwrap();
    static ref RELATIONSHIP_ELEMENT: Regex = Regex::new(r"<Relationship\b[^>]*>").unwrap();
    static ref HYPERLINK_ELEMENT: Regex = Regex::new(r"<hyperlink\b[^>]*>").unwrap();
    static ref REL_ID_ATTR: Regex = Regex::new(r#"\s\w+:id="([^"]*)""#).unwrap();
    static ref ID_ATTR: Regex = Regex::new(r#"\sId="([^"]*)""#).unwrap();
    static ref TARGET_ATTR: Regex = Regex::new(r#"\sTarget="([^"]*)""#).unwrap();
    static ref REF_ATTR: Regex = Regex::new(r#"\sref="([^"]*)""#).unwrap();
    static ref CELL_REF: Regex = Regex::new(r"^\$?([A-Za-z]{1,3})\$?(\d+)$").unwrap();
}

/// `<hyperlink ref="A1:B2">` 1件分。座標は0始まり
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRange {
    pub first: (u32, u32),
    pub last: (u32, u32),
    pub target: String,
}

impl LinkRange {
    fn is_single_cell(&self) -> bool {
        self.first == self.last
    }

    fn contains(&self, row: u32, col: u32) -> bool {
        (self.first.0..=self.last.0).contains(&row) && (self.first.1..=self.last.1).contains(&col)
    }
}

/// アクティブシートのハイパーリンク
///
/// 複数セルにまたがるリンクは展開せず範囲のまま保持する
/// （`A1:XFD1048576` のような参照でもメモリを消費しない）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetHyperlinks {
    /// ブック内のシート番号（0始まり）
    pub sheet_index: usize,
    /// 単一セルのリンク: (行, 列) → リンク先
    pub links: HashMap<(u32, u32), String>,
    /// 複数セルにまたがるリンク（宣言順）
    pub ranges: Vec<LinkRange>,
}

impl SheetHyperlinks {
    fn new(sheet_index: usize, link_ranges: Vec<LinkRange>) -> Self {
        let mut links = HashMap::new();
        let mut ranges = Vec::new();
        for range in link_ranges {
            if range.is_single_cell() {
                links.insert(range.first, range.target);
            } else {
                ranges.push(range);
            }
        }
        Self {
            sheet_index,
            links,
            ranges,
        }
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&str> {
        if let Some(target) = self.links.get(&(row, col)) {
            return Some(target.as_str());
        }
        self.ranges
            .iter()
            .rev()
            .find(|r| r.contains(row, col))
            .map(|r| r.target.as_str())
    }

    /// リンク宣言の件数
    pub fn count(&self) -> usize {
        self.links.len() + self.ranges.len()
    }
}

/// アクティブシートのハイパーリンクを読み込む
pub fn read_active_sheet_hyperlinks(path: &Path) -> Result<SheetHyperlinks> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| QaInsightsError::Hyperlink(e.to_string()))?;

    let workbook_xml = read_entry(&mut archive, "xl/workbook.xml")?
        .ok_or_else(|| QaInsightsError::Hyperlink("xl/workbook.xml がありません".into()))?;
    let sheet_index = active_tab(&workbook_xml);

    let sheet_rel_ids: Vec<String> = SHEET_ELEMENT
        .find_iter(&workbook_xml)
        .filter_map(|m| attribute(&REL_ID_ATTR, m.as_str()))
        .collect();
    let Some(rel_id) = sheet_rel_ids.get(sheet_index) else {
        return Ok(SheetHyperlinks {
            sheet_index,
            ..Default::default()
        });
    };

    let workbook_rels = match read_entry(&mut archive, "xl/_rels/workbook.xml.rels")? {
        Some(xml) => parse_relationships(&xml),
        None => HashMap::new(),
    };
    let Some(target) = workbook_rels.get(rel_id) else {
        return Ok(SheetHyperlinks {
            sheet_index,
            ..Default::default()
        });
    };

    let sheet_path = resolve_part_path("xl", target);
    let Some(sheet_xml) = read_entry(&mut archive, &sheet_path)? else {
        return Ok(SheetHyperlinks {
            sheet_index,
            ..Default::default()
        });
    };

    let sheet_rels = match read_entry(&mut archive, &rels_path_for(&sheet_path))? {
        Some(xml) => parse_relationships(&xml),
        None => HashMap::new(),
    };

    Ok(SheetHyperlinks::new(
        sheet_index,
        parse_sheet_hyperlinks(&sheet_xml, &sheet_rels),
    ))
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(QaInsightsError::Hyperlink(format!("{}: {}", name, e))),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}

fn attribute(pattern: &Regex, element: &str) -> Option<String> {
    pattern.captures(element).map(|cap| unescape_xml(&cap[1]))
}

/// activeTab（省略時は0）
pub fn active_tab(workbook_xml: &str) -> usize {
    ACTIVE_TAB
        .captures(workbook_xml)
        .and_then(|cap| cap[1].parse().ok())
        .unwrap_or(0)
}

/// .rels の Id → Target
pub fn parse_relationships(rels_xml: &str) -> HashMap<String, String> {
    RELATIONSHIP_ELEMENT
        .find_iter(rels_xml)
        .filter_map(|m| {
            let id = attribute(&ID_ATTR, m.as_str())?;
            let target = attribute(&TARGET_ATTR, m.as_str())?;
            Some((id, target))
        })
        .collect()
}

/// シートXMLの `<hyperlink>` をリンク範囲の列にする
///
/// r:id を持たない内部リンク（location のみ）は対象外。
pub fn parse_sheet_hyperlinks(
    sheet_xml: &str,
    relationships: &HashMap<String, String>,
) -> Vec<LinkRange> {
    let mut links = Vec::new();

    for element in HYPERLINK_ELEMENT.find_iter(sheet_xml) {
        let element = element.as_str();
        let (Some(range), Some(rel_id)) = (
            attribute(&REF_ATTR, element),
            attribute(&REL_ID_ATTR, element),
        ) else {
            continue;
        };
        let Some(target) = relationships.get(&rel_id) else {
            tracing::warn!(rel_id = %rel_id, "ハイパーリンクのリレーションが見つかりません");
            continue;
        };

        match parse_range(&range) {
            Some((first, last)) => links.push(LinkRange {
                first,
                last,
                target: target.clone(),
            }),
            None => tracing::warn!(cell_ref = %range, "ハイパーリンクのセル参照を解釈できません"),
        }
    }

    links
}

/// "B3" → (2, 1)
pub fn parse_cell_ref(cell: &str) -> Option<(u32, u32)> {
    let cap = CELL_REF.captures(cell.trim())?;
    let col = cap[1]
        .to_ascii_uppercase()
        .bytes()
        .fold(0u32, |acc, b| acc * 26 + u32::from(b - b'A' + 1));
    let row: u32 = cap[2].parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

/// "B2:A1" → ((0, 0), (1, 1))。単一セルは同じ座標の組
fn parse_range(range: &str) -> Option<((u32, u32), (u32, u32))> {
    let mut parts = range.split(':');
    let start = parts.next().and_then(parse_cell_ref)?;
    let end = match parts.next() {
        Some(cell) => parse_cell_ref(cell)?,
        None => start,
    };

    Some((
        (start.0.min(end.0), start.1.min(end.1)),
        (start.0.max(end.0), start.1.max(end.1)),
    ))
}

/// リレーションの Target をzip内パスに解決
fn resolve_part_path(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// "xl/worksheets/sheet1.xml" → "xl/worksheets/_rels/sheet1.xml.rels"
fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
