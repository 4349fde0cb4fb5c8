//! Assistant - AI dish advisor for guests and floor assistant for staff
//!
//! Quick intents (greetings, help, clear) are answered locally. Everything
//! else goes to a [`TextGenerator`] with a snapshot of the menu (and, for
//! staff, the floor) as context. A remote failure never reaches the caller:
//! after one retry the reply degrades to a fixed fallback sentence.

use crate::core::Config;
use crate::orders::FloorManager;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Reply used whenever the generator is missing, slow or failing
pub const FALLBACK_REPLY: &str = "Hệ thống tư vấn đang bận, bạn vui lòng tự chọn món nhé!";

const MAX_ATTEMPTS: usize = 2;
const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 300;

const GREETINGS: &[&str] = &["hi", "hello", "chào", "alo", "ê", "hey"];
const HELP: &[&str] = &["help", "trợ giúp", "hdsd"];
const CLEAR: &[&str] = &["clear", "xóa", "reset"];

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Assistant is not configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
}

/// Remote text generation
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AssistantError>;
}

/// Gemini `generateContent` over plain REST
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, AssistantError> {
        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            },
        });

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value = resp.json().await?;
        extract_text(&data).ok_or(AssistantError::EmptyResponse)
    }
}

/// `candidates[0].content.parts[0].text`
fn extract_text(data: &serde_json::Value) -> Option<String> {
    data["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// Who is asking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    Guest,
    Staff,
}

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Local,
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub reply: String,
    pub source: ReplySource,
}

impl AssistantReply {
    fn local(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            source: ReplySource::Local,
        }
    }

    fn fallback() -> Self {
        Self {
            reply: FALLBACK_REPLY.to_string(),
            source: ReplySource::Fallback,
        }
    }
}

pub struct AssistantService {
    manager: Arc<FloorManager>,
    generator: Option<Arc<dyn TextGenerator>>,
    attempt_timeout: Duration,
}

impl std::fmt::Debug for AssistantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantService")
            .field("configured", &self.generator.is_some())
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}

impl AssistantService {
    pub fn new(
        manager: Arc<FloorManager>,
        generator: Option<Arc<dyn TextGenerator>>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            manager,
            generator,
            attempt_timeout,
        }
    }

    /// Build from configuration; no API key means fallback-only
    pub fn from_config(config: &Config, manager: Arc<FloorManager>) -> Self {
        let timeout = Duration::from_millis(config.ai_timeout_ms);
        let generator = match config.ai_api_key.as_deref() {
            Some(key) => {
                match GeminiClient::new(&config.ai_base_url, key, &config.ai_model, timeout) {
                    Ok(client) => Some(Arc::new(client) as Arc<dyn TextGenerator>),
                    Err(e) => {
                        tracing::warn!(error = %e, "Assistant client could not be built, fallback only");
                        None
                    }
                }
            }
            None => {
                tracing::info!("AI_API_KEY not set, assistant answers with fallback only");
                None
            }
        };
        Self::new(manager, generator, timeout)
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Answer a chat message; never fails
    pub async fn reply(&self, audience: Audience, message: &str) -> AssistantReply {
        if let Some(local) = local_reply(audience, message) {
            return local;
        }
        let Some(generator) = &self.generator else {
            return AssistantReply::fallback();
        };

        let system = self.system_instruction(audience);
        let prompt = format!("Khách hỏi: \"{}\"", message.trim());

        for attempt in 1..=MAX_ATTEMPTS {
            match tokio::time::timeout(self.attempt_timeout, generator.generate(&system, &prompt))
                .await
            {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    tracing::debug!(attempt, audience = ?audience, "Assistant replied");
                    return AssistantReply {
                        reply: text,
                        source: ReplySource::Model,
                    };
                }
                Ok(Ok(_)) => {
                    tracing::warn!(attempt, error = %AssistantError::EmptyResponse, "Assistant call failed");
                }
                Ok(Err(e)) => {
                    tracing::warn!(attempt, error = %e, "Assistant call failed");
                }
                Err(_) => {
                    let e = AssistantError::Timeout(self.attempt_timeout);
                    tracing::warn!(attempt, error = %e, "Assistant call failed");
                }
            }
        }
        AssistantReply::fallback()
    }

    fn system_instruction(&self, audience: Audience) -> String {
        let menu = self.menu_context();
        match audience {
            Audience::Guest => format!(
                "Bạn là một nhân viên phục vụ bàn thông minh, thân thiện tại một nhà hàng Việt Nam.\n\
                 Nhiệm vụ của bạn là tư vấn món ăn cho khách dựa trên Menu được cung cấp bên dưới.\n\n\
                 Quy tắc:\n\
                 1. Chỉ gợi ý các món có trong Menu.\n\
                 2. Trả lời ngắn gọn, hấp dẫn, giọng điệu vui vẻ.\n\
                 3. Nếu khách hỏi món không có, hãy khéo léo gợi ý món tương tự trong Menu.\n\
                 4. Trả lời bằng tiếng Việt.\n\n\
                 Menu Hiện Tại:\n{menu}"
            ),
            Audience::Staff => format!(
                "Bạn là trợ lý quản lý nhà hàng. Trả lời ngắn gọn bằng tiếng Việt dựa trên dữ liệu bên dưới.\n\n\
                 Menu:\n{menu}\n\n\
                 Tình trạng bàn:\n{}",
                self.floor_context()
            ),
        }
    }

    fn menu_context(&self) -> String {
        self.manager
            .catalog()
            .list()
            .iter()
            .filter(|d| d.is_available)
            .map(|d| format!("{} ({}) - {}đ: {}", d.name, d.category, d.unit_price, d.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn floor_context(&self) -> String {
        let tables = match self.manager.list_tables() {
            Ok(tables) => tables,
            Err(e) => {
                tracing::warn!(error = %e, "Floor snapshot unavailable for assistant");
                return "(không có dữ liệu)".to_string();
            }
        };
        tables
            .iter()
            .map(|t| {
                let bill = crate::pricing::compute_bill(t);
                let dishes: Vec<String> = t
                    .open_orders()
                    .flat_map(|o| o.items.iter())
                    .map(|i| format!("{} x{}", i.name, i.quantity))
                    .collect();
                format!(
                    "{} [{}] {}: {} đơn mở, tạm tính {}đ{}",
                    t.name,
                    t.area,
                    t.status,
                    t.open_orders().count(),
                    bill.final_total,
                    if dishes.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", dishes.join(", "))
                    }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Quick intents answered without a remote call
fn local_reply(audience: Audience, message: &str) -> Option<AssistantReply> {
    let text = message.trim().to_lowercase();
    if text.is_empty() {
        return Some(AssistantReply::local(help_text(audience)));
    }
    if GREETINGS.contains(&text.as_str()) {
        let greeting = match audience {
            Audience::Guest => "Xin chào! 👋 Hôm nay bạn muốn em gợi ý món gì ạ?",
            Audience::Staff => {
                "Chào Sếp! 👋 Hôm nay Sếp muốn kiểm tra doanh thu hay soi tình trạng bàn nào ạ?"
            }
        };
        return Some(AssistantReply::local(greeting));
    }
    if HELP.contains(&text.as_str()) {
        return Some(AssistantReply::local(help_text(audience)));
    }
    if CLEAR.contains(&text.as_str()) {
        return Some(AssistantReply::local(
            "🧹 Đã dọn dẹp bộ nhớ đệm. Em đã quên hết chuyện cũ rồi ạ!",
        ));
    }
    None
}

fn help_text(audience: Audience) -> &'static str {
    match audience {
        Audience::Guest => {
            "🤖 Em có thể giúp bạn:\n- \"Món nào ít cay?\"\n- \"Gợi ý món cho 4 người\"\n- \"Có đồ uống gì?\""
        }
        Audience::Staff => {
            "🤖 Em có thể giúp Sếp:\n- \"Bàn 2 đang gọi món gì?\"\n- \"Món nào bán chạy nhất?\"\n- \"Viết status quảng cáo...\""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::MemoryTableStore;
    use crate::pricing::PromotionEngine;
    use crate::services::MenuCatalog;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manager() -> Arc<FloorManager> {
        Arc::new(
            FloorManager::new(
                Arc::new(MemoryTableStore::new()),
                Arc::new(MenuCatalog::default()),
                PromotionEngine::for_tables(60),
            )
            .unwrap(),
        )
    }

    /// Answers from a script, one entry per call
    struct Scripted {
        calls: AtomicUsize,
        script: Vec<Result<String, ()>>,
        last_system: Mutex<String>,
    }

    impl Scripted {
        fn new(script: Vec<Result<String, ()>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script,
                last_system: Mutex::new(String::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, system: &str, _prompt: &str) -> Result<String, AssistantError> {
            *self.last_system.lock() = system.to_string();
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.get(n) {
                Some(Ok(text)) => Ok(text.clone()),
                _ => Err(AssistantError::EmptyResponse),
            }
        }
    }

    struct Slow;

    #[async_trait]
    impl TextGenerator for Slow {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, AssistantError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok("too late".to_string())
        }
    }

    fn service(generator: Arc<dyn TextGenerator>) -> AssistantService {
        AssistantService::new(manager(), Some(generator), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_local_intents_skip_remote() {
        let generator = Scripted::new(vec![]);
        let svc = service(generator.clone());

        let hi = svc.reply(Audience::Staff, "  Chào ").await;
        assert_eq!(hi.source, ReplySource::Local);
        assert!(hi.reply.starts_with("Chào Sếp"));

        assert_eq!(svc.reply(Audience::Guest, "HELP").await.source, ReplySource::Local);
        assert_eq!(svc.reply(Audience::Guest, "reset").await.source, ReplySource::Local);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_model_reply_with_menu_context() {
        let generator = Scripted::new(vec![Ok("Bạn thử Phở Anh Hai nhé!".into())]);
        let svc = service(generator.clone());

        let reply = svc.reply(Audience::Guest, "Món nào ngon?").await;
        assert_eq!(reply.source, ReplySource::Model);
        assert_eq!(reply.reply, "Bạn thử Phở Anh Hai nhé!");
        assert!(generator.last_system.lock().contains("Phở Anh Hai (Món chính) - 45000đ"));
    }

    #[tokio::test]
    async fn test_staff_context_includes_floor() {
        let generator = Scripted::new(vec![Ok("ok".into())]);
        let svc = service(generator.clone());

        svc.reply(Audience::Staff, "Bàn 2 đang gọi món gì?").await;
        let system = generator.last_system.lock().clone();
        assert!(system.contains("Bàn 02 [Tầng 1] occupied: 1 đơn mở, tạm tính 325000đ"));
        assert!(system.contains("Lẩu Thái Hải Sản x1"));
    }

    #[tokio::test]
    async fn test_one_retry_then_success() {
        let generator = Scripted::new(vec![Err(()), Ok("lần hai".into())]);
        let svc = service(generator.clone());

        let reply = svc.reply(Audience::Guest, "gợi ý đồ uống").await;
        assert_eq!(reply.source, ReplySource::Model);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fallback_after_retries() {
        let generator = Scripted::new(vec![Err(()), Err(()), Ok("never".into())]);
        let svc = service(generator.clone());

        let reply = svc.reply(Audience::Guest, "gợi ý đồ uống").await;
        assert_eq!(reply, AssistantReply::fallback());
        assert_eq!(generator.calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let svc = service(Arc::new(Slow));
        let reply = svc.reply(Audience::Guest, "gợi ý đồ uống").await;
        assert_eq!(reply.reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_unconfigured_falls_back() {
        let svc = AssistantService::new(manager(), None, Duration::from_millis(50));
        assert!(!svc.is_configured());
        assert_eq!(
            svc.reply(Audience::Guest, "gợi ý đồ uống").await.source,
            ReplySource::Fallback
        );
    }

    #[test]
    fn test_extract_text() {
        let data = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": " Xin chào " }] } }]
        });
        assert_eq!(extract_text(&data).as_deref(), Some("Xin chào"));
        assert_eq!(extract_text(&serde_json::json!({ "candidates": [] })), None);
    }
}
