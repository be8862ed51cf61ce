//! Domain entities for imported AI chat history.
//!
//! A [`Project`] groups [`Conversation`]s imported from various AI chat
//! providers; each conversation carries its ordered [`Message`]s. The
//! exporter treats all of these as read-only inputs.

mod types;

pub use types::{
    AiProvider, Conversation, ConversationStatus, Message, Project, ProjectStatus, Role,
};
