//! プロンプト生成モジュール
//!
//! 期間ごとのQA観察サマリ依頼文を組み立てる。

use crate::grouping::PeriodGroup;
use crate::types::{STATUS_COLUMN, SUB_MODULE_COLUMN};

/// ステータスが空の場合の表示
pub const DEFAULT_STATUS: &str = "Open";

/// 期間サマリ用プロンプト生成
///
/// # Arguments
/// * `group` - 期間グループ（モジュール → レコード）
///
/// # Returns
/// モジュール名を太字見出しにした、要約＋改善提案の依頼文
pub fn build_insight_prompt(group: &PeriodGroup<'_>) -> String {
    let mut prompt = format!(
        "You are a senior QA analyst. Below are software testing observations \
         grouped by module for the period \"{period}\". For each module, write:\n\
         1. A short summary paragraph of the issues found.\n\
         2. Specific, actionable fix suggestions for the development team.\n\n\
         Keep the tone professional but concise. \
         Format with module names as bold headings (**Module Name**).\n\n",
        period = group.label()
    );

    for (module, records) in &group.modules {
        prompt.push_str(&format!("**Module: {}**\n", module));
        for record in records {
            let sub_module = record.value(SUB_MODULE_COLUMN);
            let status = record.value_or(STATUS_COLUMN, DEFAULT_STATUS);
            prompt.push_str(&format!(
                "- [{}] {} (Status: {})\n",
                sub_module,
                record.observation(),
                status
            ));
        }
        prompt.push('\n');
    }

    prompt
}
