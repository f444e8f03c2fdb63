use crate::domain::model::NumerologyResult;
use crate::domain::ports::NarrativeGenerator;
use crate::utils::error::{LuckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

/// 固定四句結構的提示詞
pub fn build_prompt(result: &NumerologyResult) -> String {
    format!(
        r#"你是一位數理顧問，用生命靈數分析數字。回應用繁體中文，總長60-90字，嚴格固定結構：

1. "你的生命靈數是 {lp}，代表 [單詞或短語特質，例如創意、內省]。"
2. "今日個人日數是 {pd}，影響 [單詞或短語能量，例如和諧、行動]。"
3. "推薦今日幸運尾號：兩碼 {codes}，單碼 {digit}。"
4. "這些尾號對應今日能量強度最高的三組組合。"

嚴格禁止：額外說明、負面、保證中獎、免責、過長、超出結構。"#,
        lp = result.life_path,
        pd = result.personal_day,
        codes = result.lucky_codes.join(", "),
        digit = result.lucky_digit,
    )
}

#[derive(Debug, Clone)]
pub struct NarratorConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl NarratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client. Owns its HTTP client; construct once and share.
pub struct ChatCompletionNarrator {
    config: NarratorConfig,
    client: Client,
}

impl ChatCompletionNarrator {
    pub fn new(config: NarratorConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl NarrativeGenerator for ChatCompletionNarrator {
    async fn explain(&self, result: &NumerologyResult) -> Result<String> {
        let prompt = build_prompt(result);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = self.completions_url();
        tracing::debug!("Requesting narrative from: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Narrative response status: {}", status);

        if !status.is_success() {
            return Err(LuckError::NarrativeError {
                message: format!("API request failed with status: {}", status),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LuckError::NarrativeError {
                message: "response contained no text".to_string(),
            });
        }

        Ok(text)
    }
}
