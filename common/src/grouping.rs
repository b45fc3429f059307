//! 期間・モジュール別のグルーピング
//!
//! (月, 期間) → モジュール → レコード列。挿入順（元のレコード順）を保持する。

use crate::types::{ObservationRecord, MODULE_COLUMN};
use indexmap::IndexMap;

/// モジュール名が空の場合のラベル
pub const UNKNOWN_MODULE: &str = "Unknown";

/// 期間キー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeriodKey {
    pub month: String,
    pub date_range: String,
}

impl PeriodKey {
    /// 表示ラベル（期間が空なら月）
    pub fn label(&self) -> &str {
        if self.date_range.is_empty() {
            &self.month
        } else {
            &self.date_range
        }
    }
}

/// 1期間分のグループ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodGroup<'a> {
    pub key: PeriodKey,
    pub modules: IndexMap<String, Vec<&'a ObservationRecord>>,
}

impl PeriodGroup<'_> {
    pub fn label(&self) -> &str {
        self.key.label()
    }

    pub fn record_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }
}

/// レコードを期間・モジュール別にまとめる
pub fn group_by_period(records: &[ObservationRecord]) -> Vec<PeriodGroup<'_>> {
    let mut periods: IndexMap<PeriodKey, IndexMap<String, Vec<&ObservationRecord>>> =
        IndexMap::new();

    for record in records {
        let key = PeriodKey {
            month: record.month().to_string(),
            date_range: record.date_range().to_string(),
        };
        // 列が無い場合だけでなく空欄も "Unknown" にまとめる（空の見出しを作らない）
        let module = record.value_or(MODULE_COLUMN, UNKNOWN_MODULE).to_string();

        periods
            .entry(key)
            .or_default()
            .entry(module)
            .or_default()
            .push(record);
    }

    periods
        .into_iter()
        .map(|(key, modules)| PeriodGroup { key, modules })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: &str, date_range: &str, module: Option<&str>, obs: &str) -> ObservationRecord {
        let mut r = ObservationRecord::new();
        if let Some(m) = module {
            r.insert("Modules", m);
        }
        r.insert("Observations", obs);
        r.insert("Date Range", date_range);
        r.insert("_month", month);
        r
    }

    #[test]
    fn test_group_by_period_preserves_order() {
        let records = vec![
            record("Feb 2026", "16th - 21th Feb 2026", Some("Heat"), "a"),
            record("Feb 2026", "23rd - 28th Feb 2026", Some("Heat"), "b"),
            record("Feb 2026", "16th - 21th Feb 2026", Some("Production"), "c"),
            record("Feb 2026", "16th - 21th Feb 2026", Some("Heat"), "d"),
        ];
        let groups = group_by_period(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label(), "16th - 21th Feb 2026");
        assert_eq!(groups[0].record_count(), 3);

        let modules: Vec<&str> = groups[0].modules.keys().map(String::as_str).collect();
        assert_eq!(modules, vec!["Heat", "Production"]);

        let heat: Vec<&str> = groups[0].modules["Heat"].iter().map(|r| r.observation()).collect();
        assert_eq!(heat, vec!["a", "d"]);

        assert_eq!(groups[1].label(), "23rd - 28th Feb 2026");
    }

    #[test]
    fn test_missing_module_is_unknown() {
        let records = vec![
            record("Mar 2026", "Mar 2026", None, "a"),
            record("Mar 2026", "Mar 2026", Some(""), "b"),
        ];
        let groups = group_by_period(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].modules.len(), 1);
        assert_eq!(groups[0].modules[UNKNOWN_MODULE].len(), 2);
    }

    #[test]
    fn test_label_falls_back_to_month() {
        let records = vec![record("Unknown", "", Some("Heat"), "a")];
        let groups = group_by_period(&records);
        assert_eq!(groups[0].label(), "Unknown");
    }

    #[test]
    fn test_same_range_different_month_is_separate_period() {
        let records = vec![
            record("Feb 2026", "", Some("Heat"), "a"),
            record("Mar 2026", "", Some("Heat"), "b"),
        ];
        let groups = group_by_period(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label(), "Feb 2026");
        assert_eq!(groups[1].label(), "Mar 2026");
    }
}
