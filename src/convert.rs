//! Excel → data.js 変換

use crate::error::Result;
use crate::export;
use crate::reader;
use qa_insights_common::normalizer::has_observation_column;
use qa_insights_common::{normalize_rows, Classifier, NormalizedDataset};
use std::path::Path;

/// ブックを読み込み、正規化したデータセットを data.js に書き出す
pub fn convert_workbook(
    input: &Path,
    output: &Path,
    classifier: &Classifier,
) -> Result<NormalizedDataset> {
    let sheet = reader::read_workbook(input)?;
    tracing::debug!(
        sheet = %sheet.sheet_name,
        columns = sheet.headers.len(),
        rows = sheet.rows.len(),
        "ワークシートを読み込みました"
    );

    if !has_observation_column(&sheet.headers) {
        tracing::warn!("Observations 列がありません。分類はすべてデフォルト値になります");
    }

    let dataset = normalize_rows(sheet.headers, &sheet.rows, classifier);
    export::write_dataset_script(output, &dataset.headers, &dataset.records)?;
    Ok(dataset)
}
