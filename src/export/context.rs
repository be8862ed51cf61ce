//! Context-prompt rendering for provider handoff.
//!
//! Produces a prompt that primes a different AI provider with condensed
//! history from prior conversations: provider-specific framing prose
//! around per-conversation transcripts, reduced according to the
//! compression level. A conversation with a previously computed summary is
//! collapsed to that summary at high compression.

use crate::model::{Conversation, Message, Project};

use super::{CompressionLevel, ExportOptions, TargetProvider};

/// Render the context-prompt artifact.
pub(super) fn render(
    project: &Project,
    conversations: &[Conversation],
    options: &ExportOptions,
) -> String {
    let mut prompt = String::from(provider_prefix(options.target_provider));

    prompt.push_str(&format!("# Context from {}\n\n", project.name));

    if let Some(ref description) = project.description {
        prompt.push_str(&format!("Project Description: {}\n\n", description));
    }

    prompt.push_str(&format!(
        "This context contains {} conversation(s) from previous AI interactions:\n\n",
        conversations.len()
    ));

    for conversation in conversations {
        prompt.push_str(&format!("## Conversation: {}\n", conversation.title));
        match conversation.model_version {
            Some(ref model_version) => prompt.push_str(&format!(
                "From: {} ({})\n\n",
                conversation.ai_provider, model_version
            )),
            None => prompt.push_str(&format!("From: {}\n\n", conversation.ai_provider)),
        }

        let summarized = conversation.context_summary.as_ref().filter(|_| {
            options.compression_level == CompressionLevel::High
        });

        if let Some(summary) = summarized {
            prompt.push_str(&format!("Summary: {}\n\n", summary));
        } else {
            for message in
                filter_messages_by_compression(&conversation.messages, options.compression_level)
            {
                prompt.push_str(&format!(
                    "**{}:** {}\n\n",
                    message.role.label(),
                    message.content
                ));
            }
        }

        prompt.push_str("---\n\n");
    }

    prompt.push_str(provider_suffix(options.target_provider));
    prompt
}

/// Reduce a transcript according to the compression level.
///
/// - `Low`: all messages, in order.
/// - `Medium`: every other message, starting with the first.
/// - `High`: the first message, the last message, and every message whose
///   zero-based index is a multiple of 10, deduplicated, in original
///   relative order.
///
/// The high-compression sampling is a compatibility contract for existing
/// consumers of previously generated exports.
pub fn filter_messages_by_compression(
    messages: &[Message],
    level: CompressionLevel,
) -> Vec<&Message> {
    match level {
        CompressionLevel::Low => messages.iter().collect(),
        CompressionLevel::Medium => messages.iter().step_by(2).collect(),
        CompressionLevel::High => {
            let last = messages.len().saturating_sub(1);
            messages
                .iter()
                .enumerate()
                .filter(|(index, _)| *index == 0 || *index == last || index % 10 == 0)
                .map(|(_, message)| message)
                .collect()
        }
    }
}

/// Opening sentence instructing the target provider that context follows.
fn provider_prefix(provider: TargetProvider) -> &'static str {
    match provider {
        TargetProvider::OpenAi => {
            "Please continue our conversation using the following context from previous sessions:\n\n"
        }
        TargetProvider::Anthropic => {
            "Here is the context from our previous conversations. Please use this information to continue our discussion:\n\n"
        }
        TargetProvider::Google => "Context from previous conversations:\n\n",
        TargetProvider::Mistral => "Previous conversation context:\n\n",
        TargetProvider::Generic => "Here is the context from previous AI conversations:\n\n",
    }
}

/// Closing sentence requesting acknowledgment before continuing.
fn provider_suffix(provider: TargetProvider) -> &'static str {
    match provider {
        TargetProvider::OpenAi => {
            "\n\nPlease acknowledge that you've reviewed this context and are ready to continue our conversation."
        }
        TargetProvider::Anthropic => {
            "\n\nI've provided this context so we can continue our discussion seamlessly. Please let me know you understand the background."
        }
        TargetProvider::Google => "\n\nPlease confirm you understand this context before we proceed.",
        TargetProvider::Mistral => "\n\nPlease acknowledge the context and let's continue.",
        TargetProvider::Generic => "\n\nPlease acknowledge this context and continue our conversation.",
    }
}
