//! データセットスクリプト（data.js）の出力
//!
//! ダッシュボードが `<script>` で読み込めるよう、ヘッダーとレコードを
//! 2つの定数として書き出す。

use super::write_with_parent;
use crate::error::Result;
use qa_insights_common::parser::{DATA_CONST, HEADERS_CONST};
use qa_insights_common::ObservationRecord;
use std::path::Path;

const BANNER: &str = "// AUTO-GENERATED by qa-insights convert - do not edit manually.\n\
// Re-run `qa-insights convert` after updating the spreadsheet.\n";

/// data.js の内容を組み立てる
pub fn render_dataset_script(headers: &[String], records: &[ObservationRecord]) -> Result<String> {
    let headers_json = serde_json::to_string_pretty(headers)?;
    let data_json = serde_json::to_string_pretty(records)?;

    Ok(format!(
        "{}const {} = {};\n\nconst {} = {};\n",
        BANNER, HEADERS_CONST, headers_json, DATA_CONST, data_json
    ))
}

/// data.js を書き出す（既存ファイルは上書き）
pub fn write_dataset_script(
    path: &Path,
    headers: &[String],
    records: &[ObservationRecord],
) -> Result<()> {
    let script = render_dataset_script(headers, records)?;
    write_with_parent(path, &script)?;
    tracing::debug!(path = %path.display(), records = records.len(), "データセットを書き出しました");
    Ok(())
}
