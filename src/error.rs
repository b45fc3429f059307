use thiserror::Error;

#[derive(Error, Debug)]
pub enum QaInsightsError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが指定されていません。--key、GEMINI_API_KEY、または `qa-insights config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("ハイパーリンク読み込みエラー: {0}")]
    Hyperlink(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] qa_insights_common::Error),
}

pub type Result<T> = std::result::Result<T, QaInsightsError>;
