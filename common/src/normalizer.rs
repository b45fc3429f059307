//! 行の正規化
//!
//! スプレッドシートの生データ行を ObservationRecord に変換する。
//!
//! ## 処理フロー
//! 1. 空行（全セルが空白）はスキップ
//! 2. ヘッダー名が空でない列の値をトリムしてコピー（Links列はハイパーリンク優先）
//! 3. エラー分類・影響度が空なら自動分類で補完（既存値は上書きしない）
//! 4. Date Range から `_month` を算出（常に上書き）

use crate::classifier::Classifier;
use crate::month::extract_month_label;
use crate::types::{
    ObservationRecord, RawRow, CATEGORY_COLUMN, DATE_RANGE_COLUMN, IMPACT_COLUMN, MONTH_KEY,
    OBSERVATIONS_COLUMN,
};
use std::collections::BTreeSet;

/// ヘッダー行の解析結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderLayout {
    headers: Vec<String>,
    links_column: Option<usize>,
    category_column: Option<usize>,
    impact_column: Option<usize>,
}

impl HeaderLayout {
    pub fn new(headers: Vec<String>) -> Self {
        let links_column = headers
            .iter()
            .position(|h| h.trim().to_lowercase() == "links");
        let category_column = headers
            .iter()
            .position(|h| h.to_lowercase().contains("category"));
        let impact_column = headers
            .iter()
            .position(|h| h.to_lowercase().contains("impact"));

        Self {
            headers,
            links_column,
            category_column,
            impact_column,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn links_column(&self) -> Option<usize> {
        self.links_column
    }

    /// シートに分類列が既に存在するか
    pub fn has_classification_columns(&self) -> bool {
        self.category_column.is_some() && self.impact_column.is_some()
    }
}

/// 1行分の正規化結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub record: ObservationRecord,
    /// 自動分類を実行したか
    pub auto_classified: bool,
}

/// 1行を正規化する。空行なら None
pub fn normalize_row(
    row: &RawRow,
    layout: &HeaderLayout,
    classifier: &Classifier,
) -> Option<NormalizedRow> {
    if row.is_blank() {
        return None;
    }

    let mut record = ObservationRecord::new();
    for (i, header) in layout.headers().iter().enumerate() {
        if header.is_empty() {
            continue;
        }

        let cell = row.cells.get(i);
        let value = match cell {
            Some(c) if Some(i) == layout.links_column() => match c.hyperlink.as_deref() {
                Some(target) if !target.is_empty() => target.trim().to_string(),
                _ => c.value.trim().to_string(),
            },
            Some(c) => c.value.trim().to_string(),
            None => String::new(),
        };
        record.insert(header.as_str(), value);
    }

    let existing_category = record.value(CATEGORY_COLUMN).trim().to_string();
    let existing_impact = record.value(IMPACT_COLUMN).trim().to_string();

    let auto_classified = existing_category.is_empty() || existing_impact.is_empty();
    if auto_classified {
        let classification = classifier.classify(record.observation());
        if existing_category.is_empty() {
            record.insert(CATEGORY_COLUMN, classification.category.label());
        }
        if existing_impact.is_empty() {
            record.insert(IMPACT_COLUMN, classification.impact.label());
        }
    }

    let month = extract_month_label(record.value(DATE_RANGE_COLUMN));
    record.insert(MONTH_KEY, month);

    Some(NormalizedRow {
        record,
        auto_classified,
    })
}

/// 正規化済みデータセット
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDataset {
    /// ヘッダー（シート上の順序）
    pub headers: Vec<String>,
    pub records: Vec<ObservationRecord>,
    /// 自動分類した行数
    pub auto_classified: usize,
    /// スキップした空行数
    pub skipped_blank: usize,
    /// シートに分類列（Category / Impact）が既にあったか
    pub has_classification_columns: bool,
}

impl NormalizedDataset {
    /// 月ラベル一覧（重複除去・ソート済み）
    pub fn months(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.month().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// 全行を正規化する
pub fn normalize_rows(
    headers: Vec<String>,
    rows: &[RawRow],
    classifier: &Classifier,
) -> NormalizedDataset {
    let layout = HeaderLayout::new(headers);
    let mut records = Vec::with_capacity(rows.len());
    let mut auto_classified = 0;
    let mut skipped_blank = 0;

    for row in rows {
        match normalize_row(row, &layout, classifier) {
            Some(normalized) => {
                if normalized.auto_classified {
                    auto_classified += 1;
                }
                records.push(normalized.record);
            }
            None => skipped_blank += 1,
        }
    }

    NormalizedDataset {
        has_classification_columns: layout.has_classification_columns(),
        headers: layout.headers,
        records,
        auto_classified,
        skipped_blank,
    }
}

/// 観察テキスト列が存在するか（ヘッダー確認用）
pub fn has_observation_column(headers: &[String]) -> bool {
    headers.iter().any(|h| h == OBSERVATIONS_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawCell;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(values: &[&str]) -> RawRow {
        RawRow::new(values.iter().map(|v| RawCell::text(*v)).collect())
    }

    fn classifier() -> Classifier {
        Classifier::standard().unwrap()
    }

    #[test]
    fn test_header_layout_detection() {
        let layout = HeaderLayout::new(headers(&["Sn", " LINKS ", "Error Category", "Error Impact"]));
        assert_eq!(layout.links_column(), Some(1));
        assert!(layout.has_classification_columns());

        let layout = HeaderLayout::new(headers(&["Sn", "Link list", "Observations"]));
        assert_eq!(layout.links_column(), None);
        assert!(!layout.has_classification_columns());
    }

    #[test]
    fn test_blank_row_skipped() {
        let layout = HeaderLayout::new(headers(&["Observations", "Date Range"]));
        assert!(normalize_row(&row(&["", "   "]), &layout, &classifier()).is_none());
        assert!(normalize_row(&RawRow::default(), &layout, &classifier()).is_none());
    }

    #[test]
    fn test_example_row() {
        let layout = HeaderLayout::new(headers(&["Observations", "Date Range"]));
        let normalized =
            normalize_row(&row(&["App crash after login", "1st Mar 2026"]), &layout, &classifier())
                .unwrap();

        assert!(normalized.auto_classified);
        let r = &normalized.record;
        assert_eq!(r.value("Error Category"), "Performance");
        assert_eq!(r.value("Error Impact"), "S1 – Critical");
        assert_eq!(r.value("_month"), "Mar 2026");

        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(
            keys,
            vec!["Observations", "Date Range", "Error Category", "Error Impact", "_month"]
        );
    }

    #[test]
    fn test_values_trimmed() {
        let layout = HeaderLayout::new(headers(&["Modules", "Observations"]));
        let normalized =
            normalize_row(&row(&["  Heat  ", " Logo blurry\n"]), &layout, &classifier()).unwrap();
        assert_eq!(normalized.record.value("Modules"), "Heat");
        assert_eq!(normalized.record.value("Observations"), "Logo blurry");
    }

    #[test]
    fn test_existing_classification_not_overwritten() {
        let layout = HeaderLayout::new(headers(&[
            "Observations",
            "Error Category",
            "Error Impact",
            "Date Range",
        ]));
        let normalized = normalize_row(
            &row(&["App crash after login", " UI ", "S4 – Low/Cosmetic", "Feb 2026"]),
            &layout,
            &classifier(),
        )
        .unwrap();

        assert!(!normalized.auto_classified);
        assert_eq!(normalized.record.value("Error Category"), "UI");
        assert_eq!(normalized.record.value("Error Impact"), "S4 – Low/Cosmetic");
    }

    #[test]
    fn test_only_blank_classification_filled() {
        let layout = HeaderLayout::new(headers(&["Observations", "Error Category", "Error Impact"]));
        let normalized = normalize_row(
            &row(&["App crash after login", "UX", ""]),
            &layout,
            &classifier(),
        )
        .unwrap();

        assert!(normalized.auto_classified);
        assert_eq!(normalized.record.value("Error Category"), "UX");
        assert_eq!(normalized.record.value("Error Impact"), "S1 – Critical");

        // 既存列の位置は保持
        let keys: Vec<&str> = normalized.record.keys().collect();
        assert_eq!(keys, vec!["Observations", "Error Category", "Error Impact", "_month"]);
    }

    #[test]
    fn test_links_column_prefers_hyperlink() {
        let layout = HeaderLayout::new(headers(&["Observations", "Links"]));
        let raw = RawRow::new(vec![
            RawCell::text("Logo blurry"),
            RawCell::link("Screenshot", " https://example.com/shot/1 "),
        ]);
        let normalized = normalize_row(&raw, &layout, &classifier()).unwrap();
        assert_eq!(normalized.record.value("Links"), "https://example.com/shot/1");

        let raw = RawRow::new(vec![RawCell::text("Logo blurry"), RawCell::text(" see drive ")]);
        let normalized = normalize_row(&raw, &layout, &classifier()).unwrap();
        assert_eq!(normalized.record.value("Links"), "see drive");
    }

    #[test]
    fn test_hyperlink_ignored_outside_links_column() {
        let layout = HeaderLayout::new(headers(&["Observations", "Links"]));
        let raw = RawRow::new(vec![
            RawCell::link("Logo blurry", "https://example.com/other"),
            RawCell::text(""),
        ]);
        let normalized = normalize_row(&raw, &layout, &classifier()).unwrap();
        assert_eq!(normalized.record.value("Observations"), "Logo blurry");
    }

    #[test]
    fn test_month_always_recomputed() {
        let layout = HeaderLayout::new(headers(&["_month", "Date Range", "Observations"]));
        let normalized =
            normalize_row(&row(&["Jan 1999", "2nd Apr 2026", "x"]), &layout, &classifier()).unwrap();
        assert_eq!(normalized.record.value("_month"), "Apr 2026");
        assert_eq!(normalized.record.keys().next(), Some("_month"));
    }

    #[test]
    fn test_missing_date_range_is_unknown_month() {
        let layout = HeaderLayout::new(headers(&["Observations"]));
        let normalized = normalize_row(&row(&["x"]), &layout, &classifier()).unwrap();
        assert_eq!(normalized.record.value("_month"), "Unknown");
    }

    #[test]
    fn test_empty_headers_skipped_and_short_rows_padded() {
        let layout = HeaderLayout::new(headers(&["Observations", "", "Status"]));
        let normalized = normalize_row(&row(&["x", "orphan"]), &layout, &classifier()).unwrap();
        let keys: Vec<&str> = normalized.record.keys().collect();
        assert_eq!(
            keys,
            vec!["Observations", "Status", "Error Category", "Error Impact", "_month"]
        );
        assert_eq!(normalized.record.value("Status"), "");
    }

    #[test]
    fn test_normalize_rows_counts() {
        let rows = vec![
            row(&["App crash after login", "1st Mar 2026"]),
            row(&["", ""]),
            row(&["Logo blurry", "16th - 21th Feb 2026"]),
            row(&["  ", ""]),
        ];
        let dataset = normalize_rows(headers(&["Observations", "Date Range"]), &rows, &classifier());

        assert_eq!(dataset.records.len(), rows.len() - 2);
        assert_eq!(dataset.skipped_blank, 2);
        assert_eq!(dataset.auto_classified, 2);
        assert!(!dataset.has_classification_columns);
        assert_eq!(dataset.months(), vec!["Feb 2026".to_string(), "Mar 2026".to_string()]);
    }

    #[test]
    fn test_empty_observation_still_classified() {
        // 観察が空でも空欄の分類はデフォルト値で埋め、自動分類として数える
        let layout = HeaderLayout::new(headers(&["Sn", "Observations", "Error Category", "Error Impact"]));
        let normalized = normalize_row(&row(&["7", "", "", ""]), &layout, &classifier()).unwrap();

        assert!(normalized.auto_classified);
        assert_eq!(normalized.record.value("Error Category"), "Functionality");
        assert_eq!(normalized.record.value("Error Impact"), "S3 – Minor");

        let dataset = normalize_rows(
            headers(&["Sn", "Observations", "Error Category", "Error Impact"]),
            &[row(&["7", "", "", ""])],
            &classifier(),
        );
        assert_eq!(dataset.auto_classified, 1);
        assert!(dataset.has_classification_columns);
    }

    #[test]
    fn test_normalize_rows_is_pure() {
        let rows = vec![
            row(&["App crash after login", "1st Mar 2026"]),
            row(&["Typo in header", "Feb 2026"]),
        ];
        let h = headers(&["Observations", "Date Range"]);
        let first = normalize_rows(h.clone(), &rows, &classifier());
        let second = normalize_rows(h, &rows, &classifier());
        assert_eq!(
            serde_json::to_string(&first.records).unwrap(),
            serde_json::to_string(&second.records).unwrap()
        );
    }

    #[test]
    fn test_has_observation_column() {
        assert!(has_observation_column(&headers(&["Sn", "Observations"])));
        assert!(!has_observation_column(&headers(&["Sn", "observations"])));
    }
}
