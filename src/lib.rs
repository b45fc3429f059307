//! QA Insights
//!
//! QA観察スプレッドシート（.xlsx）を data.js に変換し、
//! 期間ごとのAIサマリを insights.json に生成する。
//! 分類・正規化などの純粋ロジックは `qa_insights_common` にある。

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod insights;
pub mod logging;
pub mod reader;
pub mod report;
