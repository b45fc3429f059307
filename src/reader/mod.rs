pub mod hyperlinks;

use crate::error::{QaInsightsError, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use qa_insights_common::{RawCell, RawRow};
use std::path::Path;

/// シートから読み込んだヘッダーと行
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub sheet_name: String,
    /// 1行目（ヘッダー行）
    pub headers: Vec<String>,
    /// 2行目以降
    pub rows: Vec<RawRow>,
}

/// Excelブックのアクティブシートを読み込む
///
/// 1行目をヘッダー、2行目以降をデータ行とする。
/// 各行はヘッダー行と同じ列数（シートの最大列まで）を持つ。
pub fn read_workbook(path: &Path) -> Result<SheetData> {
    if !path.exists() {
        return Err(QaInsightsError::FileNotFound(path.display().to_string()));
    }

    let links = match hyperlinks::read_active_sheet_hyperlinks(path) {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!(error = %e, "ハイパーリンクを読み込めませんでした。セルの表示値を使用します");
            hyperlinks::SheetHyperlinks::default()
        }
    };

    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e: calamine::XlsxError| QaInsightsError::Spreadsheet(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .get(links.sheet_index)
        .or_else(|| sheet_names.first())
        .cloned()
        .ok_or_else(|| QaInsightsError::Spreadsheet("シートがありません".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| QaInsightsError::Spreadsheet(format!("{}: {}", sheet_name, e)))?;

    tracing::debug!(
        sheet = %sheet_name,
        hyperlinks = links.count(),
        "シートを読み込みました"
    );

    let (headers, rows) = sheet_rows(&range, &links);
    Ok(SheetData {
        sheet_name,
        headers,
        rows,
    })
}

/// 絶対座標（A1 = (0, 0)）でヘッダーと行を組み立てる
fn sheet_rows(range: &Range<Data>, links: &hyperlinks::SheetHyperlinks) -> (Vec<String>, Vec<RawRow>) {
    let Some((max_row, max_col)) = range.end() else {
        return (Vec::new(), Vec::new());
    };

    let headers = (0..=max_col)
        .map(|col| range.get_value((0, col)).map(cell_to_string).unwrap_or_default())
        .collect();

    let rows = (1..=max_row)
        .map(|row| {
            let cells = (0..=max_col)
                .map(|col| {
                    let value = range.get_value((row, col)).map(cell_to_string).unwrap_or_default();
                    match links.get(row, col) {
                        Some(target) => RawCell::link(value, target),
                        None => RawCell::text(value),
                    }
                })
                .collect();
            RawRow::new(cells)
        })
        .collect();

    (headers, rows)
}

/// セル値を文字列化
///
/// 整数値の浮動小数は "5"、日時は "YYYY-MM-DD HH:MM:SS"、真偽値は "True"/"False"。
/// 日付部分のない時刻（シリアル値 1.0 未満）は "HH:MM:SS"。
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => {
            let pattern = if dt.is_datetime() && dt.as_f64() < 1.0 {
                "%H:%M:%S"
            } else {
                "%Y-%m-%d %H:%M:%S"
            };
            dt.as_datetime()
                .map(|d| d.format(pattern).to_string())
                .unwrap_or_else(|| format_float(dt.as_f64()))
        }
        Data::Error(e) => e.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
