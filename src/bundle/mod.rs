//! Project bundle loading.
//!
//! A bundle file carries a project and its conversations in the same JSON
//! shape the exporter emits, so previously exported artifacts can be fed
//! straight back in. An `exportMetadata` key left over from a prior export
//! is ignored.

mod error;

pub use error::BundleError;

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{Conversation, Project};

/// A project together with its ordered conversations, as loaded from disk.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBundle {
    /// The project the conversations belong to.
    pub project: Project,
    /// Conversations in creation order, each with its ordered messages.
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

impl ProjectBundle {
    /// Parse a bundle from JSON text and validate its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Json`] for malformed JSON and
    /// [`BundleError::Invalid`] when the content violates a model
    /// invariant (empty project name, out-of-order messages).
    pub fn from_json(contents: &str) -> Result<Self, BundleError> {
        let mut bundle: ProjectBundle =
            serde_json::from_str(contents).map_err(BundleError::Json)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Total number of messages across all conversations.
    pub fn message_count(&self) -> usize {
        self.conversations
            .iter()
            .map(|conversation| conversation.messages.len())
            .sum()
    }

    fn validate(&mut self) -> Result<(), BundleError> {
        if self.project.name.trim().is_empty() {
            return Err(BundleError::invalid("project name must not be empty"));
        }

        for conversation in &mut self.conversations {
            // Exported artifacts drop parent-id fields; restore them from
            // the enclosing record so re-imported bundles stay coherent.
            if conversation.project_id.is_nil() {
                conversation.project_id = self.project.id;
            }
            for message in &mut conversation.messages {
                if message.conversation_id.is_nil() {
                    message.conversation_id = conversation.id;
                }
            }

            if !conversation.messages_ordered() {
                return Err(BundleError::invalid(format!(
                    "messages out of sequence order in conversation \"{}\"",
                    conversation.title
                )));
            }

            // Stored counters can drift from the actual message list;
            // reconcile rather than reject.
            if conversation.message_count != conversation.messages.len() {
                warn!(
                    conversation = %conversation.title,
                    stored = conversation.message_count,
                    actual = conversation.messages.len(),
                    "message count mismatch, using actual message count"
                );
                conversation.message_count = conversation.messages.len();
            }
        }

        Ok(())
    }
}

/// Load and validate a project bundle from a JSON file.
///
/// # Errors
///
/// Returns [`BundleError::Io`] if the file cannot be read, plus the parse
/// and validation errors of [`ProjectBundle::from_json`].
pub fn load_bundle(path: &Path) -> Result<ProjectBundle, BundleError> {
    let contents = fs::read_to_string(path).map_err(|source| BundleError::io(path, source))?;
    let bundle = ProjectBundle::from_json(&contents)?;

    debug!(
        path = %path.display(),
        conversations = bundle.conversations.len(),
        messages = bundle.message_count(),
        "loaded project bundle"
    );

    Ok(bundle)
}
