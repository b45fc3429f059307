//! コンソール出力

use qa_insights_common::types::{CATEGORY_COLUMN, IMPACT_COLUMN, SERIAL_COLUMN};
use qa_insights_common::{Classification, InsightOutcome, InsightsDocument, NormalizedDataset, Review};
use std::path::Path;

const PREVIEW_OBSERVATION_CHARS: usize = 50;
const MISSING: &str = "—";

/// 変換結果のサマリ
pub fn print_convert_summary(dataset: &NormalizedDataset, output: &Path) {
    println!("✔ {}件を出力: {}", dataset.records.len(), output.display());
    if !dataset.has_classification_columns {
        println!("  シートに Error Category / Error Impact 列がないため、全行を自動分類します");
    }
    if dataset.auto_classified > 0 {
        println!(
            "  🤖 {}件を自動分類（Error Category / Error Impact）",
            dataset.auto_classified
        );
    }
    if dataset.skipped_blank > 0 {
        println!("  空行をスキップ: {}件", dataset.skipped_blank);
    }
    println!("  月: {}", dataset.months().join(", "));
}

/// 分類プレビュー表
pub fn print_classification_preview(dataset: &NormalizedDataset) {
    println!();
    println!("{:<4} {:<25} {:<18} Observation[:50]", "#", "Category", "Impact");
    println!("{}", "─".repeat(90));
    for line in preview_lines(dataset) {
        println!("{}", line);
    }
}

/// プレビュー表の各行
pub fn preview_lines(dataset: &NormalizedDataset) -> Vec<String> {
    dataset
        .records
        .iter()
        .map(|record| {
            let observation: String = record
                .observation()
                .replace(['\r', '\n'], " ")
                .chars()
                .take(PREVIEW_OBSERVATION_CHARS)
                .collect();
            format!(
                "{:<4} {:<25} {:<18} {}",
                record.value(SERIAL_COLUMN),
                record.value_or(CATEGORY_COLUMN, MISSING),
                record.value_or(IMPACT_COLUMN, MISSING),
                observation
            )
        })
        .collect()
}

/// insights.json 保存後のサマリ
pub fn print_insights_summary(document: &InsightsDocument, output: &Path) {
    let failed = document
        .periods
        .values()
        .filter(|p| matches!(p.outcome, InsightOutcome::Error(_)))
        .count();

    println!("✔ 保存: {}", output.display());
    println!(
        "  期間: {}",
        document.periods.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
    );
    if failed > 0 {
        println!("  ⚠ {}期間でサマリ生成に失敗しました", failed);
    }
}

/// 横断レビュー
pub fn print_review(review: &Review<'_>) {
    println!(
        "グループ: {}  観察: {}  再発: {}",
        review.groups.len(),
        review.observation_count,
        review.recurring_count()
    );

    for group in &review.groups {
        let periods = group.periods();
        let marker = if group.is_recurring() { "🔁" } else { "  " };
        println!();
        println!(
            "{} {} / {}  ({}件, {}期間)",
            marker,
            group.module,
            group.sub_module,
            group.items.len(),
            periods.len()
        );
        for item in &group.items {
            println!(
                "    - [{}] [{}] {}",
                item.date_range(),
                item.value_or(IMPACT_COLUMN, MISSING),
                item.observation().replace(['\r', '\n'], " ")
            );
        }
    }
}

/// 単発分類の結果
pub fn print_classification(text: &str, classification: &Classification) {
    println!("観察: {}", text);
    println!("  Error Category: {}", classification.category);
    println!("  Error Impact:   {}", classification.impact);
}
