//! 期間サマリ生成の結合テスト
//!
//! 外部APIの代わりにフェイクのサマライザーを使う

use qa_insights::config::Config;
use qa_insights::error::{QaInsightsError, Result};
use qa_insights::export::{write_dataset_script, write_insights};
use qa_insights::insights::{generate_insights, load_dataset, GeminiClient, Summarizer};
use qa_insights_common::{InsightOutcome, ObservationRecord};
use std::sync::Mutex;
use tempfile::tempdir;

/// 指定文字列を含むプロンプトだけ失敗させる
struct FakeSummarizer {
    fail_on: &'static str,
    prompts: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    fn new(fail_on: &'static str) -> Self {
        Self {
            fail_on,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl Summarizer for FakeSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.contains(self.fail_on) {
            return Err(QaInsightsError::ApiCall(
                "Gemini API error 503: overloaded".to_string(),
            ));
        }
        Ok(format!("summary #{}", self.prompts.lock().unwrap().len()))
    }
}

fn record(month: &str, date_range: &str, module: &str, obs: &str) -> ObservationRecord {
    [
        ("Sn", "1"),
        ("Modules", module),
        ("Sub-Modules", "Entry"),
        ("Observations", obs),
        ("Date Range", date_range),
        ("Status", ""),
        ("_month", month),
    ]
    .into_iter()
    .collect()
}

fn sample() -> Vec<ObservationRecord> {
    vec![
        record("Feb 2026", "16th - 21th Feb 2026", "Heat", "Logo blurry"),
        record("Mar 2026", "2nd - 7th Mar 2026", "Production", "App crash"),
        record("Feb 2026", "16th - 21th Feb 2026", "", "Font too small"),
    ]
}

#[tokio::test]
async fn test_generate_insights_per_period() {
    let records = sample();
    let summarizer = FakeSummarizer::new("no-such-text");

    let document = generate_insights(&records, &summarizer, "2026-03-08 10:15".into()).await;

    assert_eq!(document.generated_at, "2026-03-08 10:15");
    let labels: Vec<&str> = document.periods.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["16th - 21th Feb 2026", "2nd - 7th Mar 2026"]);

    let feb = &document.periods["16th - 21th Feb 2026"];
    assert_eq!(feb.month, "Feb 2026");
    assert_eq!(feb.outcome, InsightOutcome::Text("summary #1".into()));

    // 期間ごとに1回ずつ呼ばれる
    let prompts = summarizer.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("**Module: Heat**"));
    assert!(prompts[0].contains("**Module: Unknown**"));
    assert!(prompts[0].contains("- [Entry] Font too small (Status: Open)"));
    assert!(!prompts[0].contains("App crash"));
}

#[tokio::test]
async fn test_failed_period_is_recorded_and_processing_continues() {
    let records = sample();
    let summarizer = FakeSummarizer::new("Feb 2026");

    let document = generate_insights(&records, &summarizer, "2026-03-08 10:15".into()).await;

    assert_eq!(document.periods.len(), 2, "失敗しても全期間を処理するべき");
    assert_eq!(
        document.periods["16th - 21th Feb 2026"].outcome,
        InsightOutcome::Error("Gemini API error 503: overloaded".into())
    );
    assert!(matches!(
        document.periods["2nd - 7th Mar 2026"].outcome,
        InsightOutcome::Text(_)
    ));

    let json = serde_json::to_value(&document).unwrap();
    let feb = &json["periods"]["16th - 21th Feb 2026"];
    assert_eq!(feb["date_range"], "16th - 21th Feb 2026");
    assert_eq!(feb["error"], "Gemini API error 503: overloaded");
    assert!(feb.get("text").is_none());
}

#[tokio::test]
async fn test_month_label_used_when_date_range_blank() {
    let records = vec![record("Unknown", "", "Heat", "Something odd")];
    let summarizer = FakeSummarizer::new("no-such-text");

    let document = generate_insights(&records, &summarizer, "2026-03-08 10:15".into()).await;

    let period = &document.periods["Unknown"];
    assert_eq!(period.month, "Unknown");
    assert_eq!(period.date_range, "");
}

#[tokio::test]
async fn test_dataset_file_to_insights_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let data_path = dir.path().join("data.js");
    let insights_path = dir.path().join("insights.json");

    let headers: Vec<String> = ["Sn", "Modules", "Sub-Modules", "Observations", "Date Range", "Status"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    write_dataset_script(&data_path, &headers, &sample()).unwrap();

    let records = load_dataset(&data_path).unwrap();
    assert_eq!(records, sample());

    let summarizer = FakeSummarizer::new("no-such-text");
    let document = generate_insights(&records, &summarizer, "2026-03-08 10:15".into()).await;
    write_insights(&insights_path, &document).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&insights_path).unwrap()).unwrap();
    assert_eq!(saved["generated_at"], "2026-03-08 10:15");
    assert_eq!(saved["periods"]["2nd - 7th Mar 2026"]["text"], "summary #2");
}

#[test]
fn test_load_dataset_without_report_data() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data.js");
    std::fs::write(&path, "const SOMETHING_ELSE = [];\n").unwrap();

    let result = load_dataset(&path);
    assert!(matches!(result, Err(QaInsightsError::Common(_))));
}

/// 通信エラーでも insights.json にAPIキーを残さない
#[tokio::test]
async fn test_transport_error_does_not_store_api_key() {
    let config = Config {
        api_base_url: "http://127.0.0.1:9/v1beta/models".into(),
        ..Default::default()
    };
    let client = GeminiClient::new(&config, "SECRET_KEY_123".to_string());
    let records = vec![record("Mar 2026", "1st Mar 2026", "Heat", "App crash")];

    let document = generate_insights(&records, &client, "2026-03-08 10:15".into()).await;

    let period = &document.periods["1st Mar 2026"];
    assert!(matches!(period.outcome, InsightOutcome::Error(_)), "接続できないポートは失敗するべき");

    let json = serde_json::to_string(&document).unwrap();
    assert!(!json.contains("SECRET_KEY_123"), "APIキーが保存されている: {}", json);
}
