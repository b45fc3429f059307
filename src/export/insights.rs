use super::write_with_parent;
use crate::error::Result;
use qa_insights_common::InsightsDocument;
use std::path::Path;

/// insights.json を書き出す
pub fn write_insights(path: &Path, document: &InsightsDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    write_with_parent(path, &json)
}
