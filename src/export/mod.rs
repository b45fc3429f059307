pub mod dataset;
pub mod insights;

pub use dataset::{render_dataset_script, write_dataset_script};
pub use insights::write_insights;

use crate::error::Result;
use std::path::Path;

/// 親ディレクトリを作成してから書き込む
fn write_with_parent(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}
