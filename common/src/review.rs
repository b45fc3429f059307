//! レビュー集計
//!
//! 正規化済みレコードの絞り込みと、モジュール／サブモジュール単位の
//! 横断レビュー（複数期間にまたがる再発の検出）。

use crate::grouping::UNKNOWN_MODULE;
use crate::types::{
    ObservationRecord, CATEGORY_COLUMN, IMPACT_COLUMN, MODULE_COLUMN, SUB_MODULE_COLUMN,
};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashSet};

/// サブモジュールが空の場合のラベル
pub const GENERAL_SUB_MODULE: &str = "General";

/// 月ラベル一覧（重複除去・ソート済み）
pub fn months(records: &[ObservationRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.month().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 指定月の期間一覧（空を除外・ソート済み）
pub fn date_ranges_for_month(records: &[ObservationRecord], month: &str) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.month() == month)
        .map(|r| r.date_range())
        .filter(|dr| !dr.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 絞り込み条件（未指定は無条件）
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub month: Option<String>,
    pub date_range: Option<String>,
    pub module: Option<String>,
    pub category: Option<String>,
    /// 影響度の前方一致（例: "S1"）
    pub impact: Option<String>,
    /// 全フィールドに対する部分一致（大文字小文字無視）
    pub search: Option<String>,
}

impl ReviewFilter {
    pub fn matches(&self, record: &ObservationRecord) -> bool {
        if let Some(month) = &self.month {
            if record.month() != month {
                return false;
            }
        }
        if let Some(date_range) = &self.date_range {
            if record.date_range() != date_range {
                return false;
            }
        }
        if let Some(module) = &self.module {
            if record.value(MODULE_COLUMN) != module {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if record.value(CATEGORY_COLUMN) != category {
                return false;
            }
        }
        if let Some(impact) = &self.impact {
            if !record.value(IMPACT_COLUMN).starts_with(impact.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let query = search.to_lowercase();
            return record.iter().any(|(_, v)| v.to_lowercase().contains(&query));
        }
        true
    }

    pub fn apply<'a>(&self, records: &'a [ObservationRecord]) -> Vec<&'a ObservationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// モジュール／サブモジュール単位のレビューグループ
#[derive(Debug, Clone)]
pub struct ReviewGroup<'a> {
    pub module: String,
    pub sub_module: String,
    pub items: Vec<&'a ObservationRecord>,
}

impl ReviewGroup<'_> {
    /// 出現した期間（出現順）
    pub fn periods(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|r| r.date_range())
            .filter(|dr| seen.insert(*dr))
            .collect()
    }

    /// 複数期間にまたがって再発しているか
    pub fn is_recurring(&self) -> bool {
        self.periods().len() > 1
    }
}

/// 横断レビュー結果
#[derive(Debug, Clone)]
pub struct Review<'a> {
    pub groups: Vec<ReviewGroup<'a>>,
    pub observation_count: usize,
}

impl Review<'_> {
    pub fn recurring_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_recurring()).count()
    }
}

/// 横断レビューを構築
///
/// 期間数の多い順、同数なら件数の多い順に並べる（同順位は出現順）。
pub fn build_review<'a>(records: &[&'a ObservationRecord]) -> Review<'a> {
    let mut groups: IndexMap<(String, String), Vec<&'a ObservationRecord>> = IndexMap::new();

    for &record in records {
        let module = record.value_or(MODULE_COLUMN, UNKNOWN_MODULE).to_string();
        let sub_module = record.value_or(SUB_MODULE_COLUMN, GENERAL_SUB_MODULE).to_string();
        groups.entry((module, sub_module)).or_default().push(record);
    }

    let mut groups: Vec<ReviewGroup<'a>> = groups
        .into_iter()
        .map(|((module, sub_module), items)| ReviewGroup {
            module,
            sub_module,
            items,
        })
        .collect();

    groups.sort_by(|a, b| {
        b.periods()
            .len()
            .cmp(&a.periods().len())
            .then_with(|| b.items.len().cmp(&a.items.len()))
    });

    Review {
        groups,
        observation_count: records.len(),
    }
}
