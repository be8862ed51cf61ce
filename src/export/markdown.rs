//! Markdown export rendering.
//!
//! Produces a human-readable document: project header, one H2 section per
//! conversation, one H3 subsection per message, with message metadata in a
//! collapsible block.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::{Conversation, Message, Project};

use super::ExportOptions;

/// Render the markdown artifact.
pub(super) fn render(
    project: &Project,
    conversations: &[Conversation],
    options: &ExportOptions,
) -> Result<String, serde_json::Error> {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", project.name));

    if let Some(ref description) = project.description {
        output.push_str(&format!("{}\n\n", description));
    }

    if !project.tags.is_empty() {
        output.push_str(&format!("**Tags:** {}\n\n", project.tags.join(", ")));
    }

    output.push_str(&format!("**Created:** {}\n", format_date(project.created_at)));
    output.push_str(&format!(
        "**Last Activity:** {}\n\n",
        format_date(project.last_activity_at)
    ));

    output.push_str("---\n\n");

    for conversation in conversations {
        output.push_str(&format!("## {}\n\n", conversation.title));
        output.push_str(&format!("**AI Provider:** {}\n", conversation.ai_provider));
        if let Some(ref model_version) = conversation.model_version {
            output.push_str(&format!("**Model:** {}\n", model_version));
        }
        output.push_str(&format!("**Messages:** {}\n", conversation.message_count));
        output.push_str(&format!(
            "**Created:** {}\n\n",
            format_date(conversation.created_at)
        ));

        for message in &conversation.messages {
            render_message(&mut output, message, options)?;
        }

        output.push_str("---\n\n");
    }

    Ok(output)
}

fn render_message(
    output: &mut String,
    message: &Message,
    options: &ExportOptions,
) -> Result<(), serde_json::Error> {
    output.push_str(&format!("### {}\n\n", message.role.label()));
    output.push_str(&format!("{}\n\n", message.content));

    if options.include_metadata && !message.metadata.is_empty() {
        let pretty = serde_json::to_string_pretty(&Value::Object(message.metadata.clone()))?;
        output.push_str(&format!(
            "<details>\n<summary>Metadata</summary>\n\n```json\n{}\n```\n</details>\n\n",
            pretty
        ));
    }

    Ok(())
}

/// Human-readable date, e.g. "March 1, 2024".
fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y").to_string()
}
