//! Entity types shared by the bundle loader and the exporter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A project grouping conversations imported from AI chat providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier for the project.
    pub id: Uuid,
    /// Project name. Must be non-empty.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ProjectStatus,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project last saw activity.
    pub last_activity_at: DateTime<Utc>,
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
    Completed,
}

/// A single imported conversation and its ordered messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique identifier for the conversation.
    pub id: Uuid,
    /// The project this conversation belongs to. Exported artifacts omit
    /// this field; loaders backfill it from the enclosing project.
    #[serde(default)]
    pub project_id: Uuid,
    /// Conversation title.
    pub title: String,
    /// The provider the conversation was imported from.
    pub ai_provider: AiProvider,
    /// Model version string, if known (e.g. "gpt-4", "claude-3-opus").
    pub model_version: Option<String>,
    /// Previously computed summary, if a summarization pass has run.
    #[serde(default)]
    pub context_summary: Option<String>,
    /// Number of messages. Kept equal to `messages.len()`.
    #[serde(default)]
    pub message_count: usize,
    /// Conversation status.
    #[serde(default)]
    pub status: ConversationStatus,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation was last updated.
    pub updated_at: DateTime<Utc>,
    /// Ordered messages, ascending by sequence order.
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Conversation status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Active,
    Archived,
}

/// The AI provider a conversation was imported from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Google,
    Mistral,
    #[serde(other)]
    Other,
}

impl AiProvider {
    /// The provider's wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Anthropic => "anthropic",
            AiProvider::Google => "google",
            AiProvider::Mistral => "mistral",
            AiProvider::Other => "other",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier for the message.
    pub id: Uuid,
    /// The conversation this message belongs to. Exported artifacts omit
    /// this field; loaders backfill it from the enclosing conversation.
    #[serde(default)]
    pub conversation_id: Uuid,
    /// Who sent the message.
    pub role: Role,
    /// Normalized message text.
    pub content: String,
    /// Original pre-normalization content, if it differed.
    pub raw_content: Option<String>,
    /// Free-form metadata captured at import time.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Strictly increasing position within the conversation.
    pub sequence_order: u32,
    /// Token-count estimate, if one was computed.
    #[serde(default)]
    pub token_count: Option<u32>,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Capitalized label used in rendered documents.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
        }
    }
}

impl Project {
    /// Create a new project with the given name and timestamps.
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            tags: Vec::new(),
            status: ProjectStatus::Active,
            created_at,
            last_activity_at: created_at,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl Conversation {
    /// Create a new conversation under the given project.
    pub fn new(
        project_id: Uuid,
        title: impl Into<String>,
        ai_provider: AiProvider,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: title.into(),
            ai_provider,
            model_version: None,
            context_summary: None,
            message_count: 0,
            status: ConversationStatus::Active,
            created_at,
            updated_at: created_at,
            messages: Vec::new(),
        }
    }

    /// Set the model version.
    pub fn with_model_version(mut self, model_version: impl Into<String>) -> Self {
        self.model_version = Some(model_version.into());
        self
    }

    /// Attach a previously computed summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.context_summary = Some(summary.into());
        self
    }

    /// Append a message, keeping `message_count` in sync.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.message_count = self.messages.len();
    }

    /// Whether messages are in strictly ascending sequence order.
    pub fn messages_ordered(&self) -> bool {
        self.messages
            .windows(2)
            .all(|pair| pair[0].sequence_order < pair[1].sequence_order)
    }
}

impl Message {
    /// Create a new message at the given position.
    pub fn new(
        conversation_id: Uuid,
        role: Role,
        content: impl Into<String>,
        sequence_order: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            role,
            content: content.into(),
            raw_content: None,
            metadata: Map::new(),
            sequence_order,
            token_count: None,
            created_at,
        }
    }

    /// Set the raw pre-normalization content.
    pub fn with_raw_content(mut self, raw: impl Into<String>) -> Self {
        self.raw_content = Some(raw.into());
        self
    }

    /// Set the metadata map.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the token-count estimate.
    pub fn with_token_count(mut self, token_count: u32) -> Self {
        self.token_count = Some(token_count);
        self
    }
}
