//! 期間ごとのAIサマリ生成
//!
//! data.js のレコードを期間・モジュール別にまとめ、期間ごとに1回ずつ
//! サマライザーを順番に呼び出す。リトライはしない。
//! 呼び出しの失敗はその期間のエラーとして記録し、次の期間へ進む。

pub mod gemini;

pub use gemini::{GeminiClient, GenerateContentRequest, GenerateContentResponse};

use crate::error::{QaInsightsError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use qa_insights_common::{
    build_insight_prompt, group_by_period, parse_report_data, InsightOutcome, InsightsDocument,
    ObservationRecord, PeriodInsight,
};
use std::future::Future;
use std::path::Path;

/// コンソールに表示する応答プレビューの文字数
pub const PREVIEW_CHARS: usize = 120;

/// プロンプトを受け取り、本文またはエラーを返す外部サマライザー
pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> impl Future<Output = Result<String>>;
}

/// data.js から REPORT_DATA を読み込む
pub fn load_dataset(path: &Path) -> Result<Vec<ObservationRecord>> {
    if !path.exists() {
        return Err(QaInsightsError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(parse_report_data(&content)?)
}

/// 全期間のサマリを生成する
///
/// 期間の順序はレコードの出現順。同じラベルの期間が複数あれば後勝ち。
pub async fn generate_insights<S: Summarizer>(
    records: &[ObservationRecord],
    summarizer: &S,
    generated_at: String,
) -> InsightsDocument {
    let groups = group_by_period(records);
    let mut document = InsightsDocument {
        generated_at,
        ..Default::default()
    };

    let pb = ProgressBar::new(groups.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("期間サマリ");

    for group in &groups {
        let label = group.label().to_string();
        pb.println(format!("- {} ({}件)", label, group.record_count()));
        tracing::debug!(period = %label, modules = group.modules.len(), "サマリを要求");

        let prompt = build_insight_prompt(group);
        let outcome = match summarizer.summarize(&prompt).await {
            Ok(text) => {
                pb.println(format!("  ✅ {}", preview(&text, PREVIEW_CHARS)));
                InsightOutcome::Text(text)
            }
            Err(e) => {
                let message = failure_message(&e);
                pb.println(format!("  ❌ {}", message));
                tracing::warn!(period = %label, error = %message, "サマリ生成に失敗");
                InsightOutcome::Error(message)
            }
        };

        document.periods.insert(
            label,
            PeriodInsight {
                month: group.key.month.clone(),
                date_range: group.key.date_range.clone(),
                outcome,
            },
        );
        pb.inc(1);
    }

    pb.finish_and_clear();
    document
}

/// insights.json に保存するエラーメッセージ
///
/// API呼び出しエラーは "Gemini API error {status}: {body}" をそのまま残す。
fn failure_message(error: &QaInsightsError) -> String {
    match error {
        QaInsightsError::ApiCall(message) | QaInsightsError::ApiParse(message) => message.clone(),
        other => other.to_string(),
    }
}

/// 先頭 `max_chars` 文字（改行は空白に置換）
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace(['\r', '\n'], " ");
    let mut chars = flat.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
