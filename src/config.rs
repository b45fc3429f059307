use crate::error::{QaInsightsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIキーの環境変数名
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub input_workbook: PathBuf,
    pub dataset_script: PathBuf,
    pub insights_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".into(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            input_workbook: PathBuf::from("reports.xlsx"),
            dataset_script: PathBuf::from("data.js"),
            insights_file: PathBuf::from("insights.json"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| QaInsightsError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("qa-insights").join("config.json"))
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    /// 引数 → 環境変数 → 設定ファイル の順にAPIキーを解決
    ///
    /// 空白のみの値は未設定として扱う。
    pub fn resolve_api_key(&self, cli_key: Option<&str>) -> Option<String> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        first_non_blank([cli_key, env_key.as_deref(), self.api_key.as_deref()])
    }

    /// generateContent エンドポイント
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model
        )
    }
}

fn first_non_blank<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty())
        .map(str::to_string)
}
