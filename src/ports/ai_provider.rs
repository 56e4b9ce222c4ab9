//! Completion port used by the LLM-backed reasoner.
//!
//! Prompt wording and answer parsing live in the reasoning adapter. A provider
//! receives one finished request per collaborator call (classify, assess,
//! extract, and so on) and returns the raw completion text.
//!
//! ```ignore
//! // Answers every extraction prompt with an empty profile.
//! struct BlankProvider;
//!
//! #[async_trait]
//! impl AIProvider for BlankProvider {
//!     async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse {
//!             content: "{}".to_string(),
//!             usage: TokenUsage::default(),
//!             model: "blank".to_string(),
//!             finish_reason: FinishReason::Stop,
//!         })
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("blank", "blank")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ConversationId;

/// A chat-completion backend.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Sends one prompt and waits for the whole answer. Retries are the
    /// implementation's business; callers see only the final result.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Name and default model, recorded in logs.
    fn provider_info(&self) -> ProviderInfo;
}

/// One collaborator prompt, ready to send.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// User-side messages; the turn text or a rendered summary of it.
    pub messages: Vec<Message>,
    /// Role instructions for the collaborator being asked.
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    /// Sampling temperature. Extraction and judging prompts use 0.0.
    pub temperature: Option<f32>,
    /// Overrides the provider's default model for this request.
    pub model: Option<String>,
    /// Requested shape of the answer.
    pub response_format: ResponseFormat,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Starts an empty text request tagged with its conversation.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            model: None,
            response_format: ResponseFormat::Text,
            metadata,
        }
    }

    /// Appends a message after any already added.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message::new(role, content));
        self
    }

    /// Replaces the role instructions.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Caps the answer length.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Sets the model for this request only.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Asks for a single JSON object. Structured roles (classifier, assessor,
    /// extractor, reflector) always set this.
    pub fn expecting_json(mut self) -> Self {
        self.response_format = ResponseFormat::JsonObject;
        self
    }
}

/// One chat message sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Chat role as the provider names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Shape of the completion the caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Free text.
    #[default]
    Text,
    /// A single JSON object.
    JsonObject,
}

/// Identifies which conversation and turn a request serves.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Conversation the request belongs to.
    pub conversation_id: ConversationId,
    /// Per-turn id shared by every collaborator call of one invocation.
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(conversation_id: ConversationId, trace_id: impl Into<String>) -> Self {
        Self {
            conversation_id,
            trace_id: trace_id.into(),
        }
    }
}

/// Raw completion text and bookkeeping.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Free text or a JSON object, depending on the requested format.
    pub content: String,
    pub usage: TokenUsage,
    /// Model the provider actually used.
    pub model: String,
    pub finish_reason: FinishReason,
}

/// Token counts reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Why a completion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model finished its answer.
    Stop,
    /// Cut off by `max_tokens`; a JSON answer is likely truncated.
    Length,
    /// Withheld by the provider's moderation.
    ContentFilter,
}

/// Identity of a provider for logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Short provider name such as `openai` or `mock`.
    pub name: String,
    /// Model used when a request does not override it.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Provider failures. The reasoner wraps these as collaborator errors, which
/// abort the turn without touching the conversation.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// HTTP 429.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Wait hint from the provider, or 30 when it gave none.
        retry_after_secs: u32,
    },

    /// Prompt exceeds the model's context window.
    #[error("context too long: {0}")]
    ContextTooLong(String),

    /// The provider refused to answer this turn.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        reason: String,
    },

    /// 5xx from the provider.
    #[error("provider unavailable: {message}")]
    Unavailable {
        message: String,
    },

    /// Key rejected (401 or 403).
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Connection-level failure before any status came back.
    #[error("network error: {0}")]
    Network(String),

    /// Response envelope was not a usable completion.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request shape (unknown model, bad field).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No answer within the configured HTTP timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        timeout_secs: u32,
    },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Whether sending the same prompt again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
