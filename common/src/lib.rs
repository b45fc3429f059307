//! QA Insights Common Library
//!
//! CLIから利用される純粋ロジック（I/Oなし）:
//! 分類タクソノミー、分類器、月ラベル抽出、行正規化、期間グルーピング、
//! プロンプト生成、データセットスクリプトのパース、レビュー集計

pub mod types;
pub mod error;
pub mod month;
pub mod rules;
pub mod classifier;
pub mod normalizer;
pub mod grouping;
pub mod prompts;
pub mod parser;
pub mod review;

pub use types::{
    Category, Classification, Impact, InsightOutcome, InsightsDocument, ObservationRecord,
    PeriodInsight, RawCell, RawRow,
};
pub use error::{Error, Result};
pub use month::extract_month_label;
pub use rules::{ClassificationRules, Matcher, Rule, RuleSet};
pub use classifier::Classifier;
pub use normalizer::{normalize_row, normalize_rows, HeaderLayout, NormalizedDataset, NormalizedRow};
pub use grouping::{group_by_period, PeriodGroup, PeriodKey};
pub use prompts::build_insight_prompt;
pub use parser::{parse_constant, parse_report_data};
pub use review::{build_review, Review, ReviewFilter, ReviewGroup};
