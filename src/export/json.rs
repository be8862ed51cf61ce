//! JSON export rendering.
//!
//! Emits the structured artifact whose field set is a compatibility
//! contract: re-parsing the output reproduces the same structure
//! field-for-field, and bundles in this shape can be re-imported.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::model::{AiProvider, Conversation, Message, Project, ProjectStatus, Role};

use super::ExportOptions;

/// Schema version stamped into `exportMetadata.version`.
pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    project: ProjectDoc<'a>,
    conversations: Vec<ConversationDoc<'a>>,
    export_metadata: ExportMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDoc<'a> {
    id: Uuid,
    name: &'a str,
    description: Option<&'a str>,
    tags: &'a [String],
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversationDoc<'a> {
    id: Uuid,
    title: &'a str,
    ai_provider: AiProvider,
    model_version: Option<&'a str>,
    message_count: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    messages: Vec<MessageDoc<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageDoc<'a> {
    id: Uuid,
    role: Role,
    content: &'a str,
    raw_content: Option<&'a str>,
    metadata: Map<String, Value>,
    sequence_order: u32,
    created_at: DateTime<Utc>,
}

/// Render the JSON artifact.
///
/// `exported_at` is injected by the caller so the renderer stays
/// deterministic for fixed inputs.
pub(super) fn render(
    project: &Project,
    conversations: &[Conversation],
    options: &ExportOptions,
    exported_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    let document = ExportDocument {
        project: ProjectDoc {
            id: project.id,
            name: &project.name,
            description: project.description.as_deref(),
            tags: &project.tags,
            status: project.status,
            created_at: project.created_at,
            last_activity_at: project.last_activity_at,
        },
        conversations: conversations
            .iter()
            .map(|conversation| ConversationDoc {
                id: conversation.id,
                title: &conversation.title,
                ai_provider: conversation.ai_provider,
                model_version: conversation.model_version.as_deref(),
                message_count: conversation.message_count,
                created_at: conversation.created_at,
                updated_at: conversation.updated_at,
                messages: conversation
                    .messages
                    .iter()
                    .map(|message| message_doc(message, options))
                    .collect(),
            })
            .collect(),
        export_metadata: ExportMetadata {
            exported_at,
            format: "json",
            version: SCHEMA_VERSION,
        },
    };

    serde_json::to_string_pretty(&document)
}

fn message_doc<'a>(message: &'a Message, options: &ExportOptions) -> MessageDoc<'a> {
    let metadata = if options.include_metadata {
        message.metadata.clone()
    } else {
        Map::new()
    };

    MessageDoc {
        id: message.id,
        role: message.role,
        content: &message.content,
        raw_content: message.raw_content.as_deref(),
        metadata,
        sequence_order: message.sequence_order,
        created_at: message.created_at,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportMetadata {
    exported_at: DateTime<Utc>,
    format: &'static str,
    version: &'static str,
}
