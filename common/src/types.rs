//! 型定義
//!
//! CLIと共有ライブラリで共有される型:
//! - Category / Impact: 分類タクソノミー
//! - RawRow: スプレッドシートの1行（セル値＋ハイパーリンク）
//! - ObservationRecord: 正規化済みレコード
//! - InsightsDocument: insights.json の構造

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 観察内容の列名
pub const OBSERVATIONS_COLUMN: &str = "Observations";
/// 期間の列名
pub const DATE_RANGE_COLUMN: &str = "Date Range";
/// エラー分類の列名
pub const CATEGORY_COLUMN: &str = "Error Category";
/// エラー影響度の列名
pub const IMPACT_COLUMN: &str = "Error Impact";
/// モジュールの列名
pub const MODULE_COLUMN: &str = "Modules";
/// サブモジュールの列名
pub const SUB_MODULE_COLUMN: &str = "Sub-Modules";
/// ステータスの列名
pub const STATUS_COLUMN: &str = "Status";
/// 連番の列名
pub const SERIAL_COLUMN: &str = "Sn";
/// 算出した月ラベルのキー
pub const MONTH_KEY: &str = "_month";
/// 月が特定できない場合のラベル
pub const UNKNOWN_MONTH: &str = "Unknown";

/// エラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "UI")]
    Ui,
    #[serde(rename = "UX")]
    Ux,
    Functionality,
    #[serde(rename = "Logical/Business Logic")]
    BusinessLogic,
    Performance,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Ui,
        Category::Ux,
        Category::Functionality,
        Category::BusinessLogic,
        Category::Performance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Ui => "UI",
            Category::Ux => "UX",
            Category::Functionality => "Functionality",
            Category::BusinessLogic => "Logical/Business Logic",
            Category::Performance => "Performance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// エラー影響度（S1が最も重い）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Impact {
    #[serde(rename = "S1 – Critical")]
    Critical,
    #[serde(rename = "S2 – Major")]
    Major,
    #[serde(rename = "S3 – Minor")]
    Minor,
    #[serde(rename = "S4 – Low/Cosmetic")]
    Cosmetic,
}

impl Impact {
    pub const ALL: [Impact; 4] = [Impact::Critical, Impact::Major, Impact::Minor, Impact::Cosmetic];

    pub fn label(&self) -> &'static str {
        match self {
            Impact::Critical => "S1 – Critical",
            Impact::Major => "S2 – Major",
            Impact::Minor => "S3 – Minor",
            Impact::Cosmetic => "S4 – Low/Cosmetic",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 分類結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub impact: Impact,
}

/// スプレッドシートの1セル
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// 表示値（未トリム）
    pub value: String,
    /// 埋め込みハイパーリンクのターゲット
    pub hyperlink: Option<String>,
}

impl RawCell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            hyperlink: None,
        }
    }

    pub fn link(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            hyperlink: Some(target.into()),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// ヘッダー行の下の1行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self { cells }
    }

    /// すべてのセルが空または空白のみか
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(RawCell::is_blank)
    }
}

/// 正規化済みの観察レコード
///
/// ヘッダー順を保持したまま、列名 → 値 のマップとして保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationRecord {
    fields: IndexMap<String, String>,
}

impl ObservationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// 値を取得（存在しない場合は空文字）
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// 値を取得し、空ならデフォルトを返す
    pub fn value_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key).map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => default,
        }
    }

    /// 値を設定（既存キーは位置を保ったまま上書き）
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn observation(&self) -> &str {
        self.value(OBSERVATIONS_COLUMN)
    }

    pub fn date_range(&self) -> &str {
        self.value(DATE_RANGE_COLUMN)
    }

    pub fn month(&self) -> &str {
        self.value(MONTH_KEY)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ObservationRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// 期間ごとのサマリ生成結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodInsight {
    pub month: String,
    pub date_range: String,
    #[serde(flatten)]
    pub outcome: InsightOutcome,
}

/// サマリ本文またはエラーメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightOutcome {
    Text(String),
    Error(String),
}

/// insights.json の構造
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsDocument {
    /// 生成日時（"YYYY-MM-DD HH:MM"）
    pub generated_at: String,
    /// 期間ラベル → 結果
    pub periods: IndexMap<String, PeriodInsight>,
}
