use super::Summarizer;
use crate::config::Config;
use crate::error::{QaInsightsError, Result};
use serde::{Deserialize, Serialize};

/// generateContent リクエスト
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// generateContent レスポンス（必要な部分のみ）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// candidates[0].content.parts[0].text
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .first()
            .map(|p| p.text.as_str())
    }
}

/// APIキーはURLではなくヘッダーで送る
const API_KEY_HEADER: &str = "x-goog-api-key";

/// 通信エラー。エラーメッセージにURLを含めない
fn transport_error(error: reqwest::Error) -> QaInsightsError {
    QaInsightsError::ApiCall(error.without_url().to_string())
}

/// Gemini API クライアント
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.generate_content_url(),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, prompt: &str) -> reqwest::RequestBuilder {
        self.http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
    }
}

impl Summarizer for GeminiClient {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        let response = self.request(prompt).send().await.map_err(transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(transport_error)?;

        if !status.is_success() {
            return Err(QaInsightsError::ApiCall(format!(
                "Gemini API error {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| QaInsightsError::ApiParse(e.to_string()))?;
        parsed
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| QaInsightsError::ApiParse("応答にテキストがありません".into()))
    }
}
