//! Conversation export in multiple formats.
//!
//! This module turns a project and its ordered conversations into a single
//! textual artifact: a machine-readable JSON document, a human-readable
//! markdown document, or a context prompt for handing the history off to
//! another AI provider. The renderers are pure functions of their inputs;
//! they perform no I/O and never mutate the entities they read.

mod context;
mod json;
mod markdown;

pub use context::filter_messages_by_compression;
pub use json::SCHEMA_VERSION;

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Conversation, Project};

/// Errors that can occur when producing an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested format is not recognized. Never falls back to a
    /// default format.
    #[error("unsupported export format: {0}. Use: json, markdown, context_prompt")]
    UnsupportedFormat(String),

    /// The input entities fail validation before any text is generated.
    #[error("invalid project: {reason}")]
    InvalidProject { reason: String },

    /// The artifact could not be serialized.
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The output format of an export artifact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Markdown,
    ContextPrompt,
}

impl ExportFormat {
    /// The format's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
            ExportFormat::ContextPrompt => "context_prompt",
        }
    }

    /// File extension for artifacts in this format.
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::ContextPrompt => "txt",
        }
    }

    /// MIME type for artifacts in this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::ContextPrompt => "text/plain",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    /// Strict parse: anything outside the recognized set is an error that
    /// echoes the rejected value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" => Ok(ExportFormat::Markdown),
            "context_prompt" => Ok(ExportFormat::ContextPrompt),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The provider a context prompt is aimed at. Selects the framing prose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Google,
    Mistral,
    #[default]
    Generic,
}

impl TargetProvider {
    /// The provider's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetProvider::OpenAi => "openai",
            TargetProvider::Anthropic => "anthropic",
            TargetProvider::Google => "google",
            TargetProvider::Mistral => "mistral",
            TargetProvider::Generic => "generic",
        }
    }

    /// Permissive parse: unrecognized values fall back to
    /// [`TargetProvider::Generic`]. The provider is a presentation-only
    /// knob, so an unknown value is not a hard failure.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "openai" => TargetProvider::OpenAi,
            "anthropic" => TargetProvider::Anthropic,
            "google" => TargetProvider::Google,
            "mistral" => TargetProvider::Mistral,
            _ => TargetProvider::Generic,
        }
    }
}

impl std::fmt::Display for TargetProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How aggressively a context prompt drops historical messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl CompressionLevel {
    /// The level's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::Low => "low",
            CompressionLevel::Medium => "medium",
            CompressionLevel::High => "high",
        }
    }

    /// Permissive parse: unrecognized values fall back to
    /// [`CompressionLevel::Medium`].
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "low" => CompressionLevel::Low,
            "medium" => CompressionLevel::Medium,
            "high" => CompressionLevel::High,
            _ => CompressionLevel::Medium,
        }
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling export output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Provider whose framing prose a context prompt uses.
    pub target_provider: TargetProvider,
    /// Message-volume reduction for context prompts.
    pub compression_level: CompressionLevel,
    /// When false, message metadata is emitted as empty in every format.
    pub include_metadata: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            target_provider: TargetProvider::Generic,
            compression_level: CompressionLevel::Medium,
            include_metadata: true,
        }
    }
}

/// Produce an export artifact for a project and its conversations.
///
/// Conversations are emitted in input order; messages within each
/// conversation in their given (ascending sequence) order. An empty
/// conversation list is valid and yields a well-formed, content-light
/// document.
///
/// # Errors
///
/// Returns [`ExportError::InvalidProject`] if the project name is empty;
/// nothing is generated in that case.
pub fn export(
    project: &Project,
    conversations: &[Conversation],
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    if project.name.trim().is_empty() {
        return Err(ExportError::InvalidProject {
            reason: "project name must not be empty".to_string(),
        });
    }

    match format {
        ExportFormat::Json => Ok(json::render(project, conversations, options, Utc::now())?),
        ExportFormat::Markdown => Ok(markdown::render(project, conversations, options)?),
        ExportFormat::ContextPrompt => Ok(context::render(project, conversations, options)),
    }
}

/// UTF-8 byte length of a produced artifact, as persisted alongside it.
pub fn export_size(content: &str) -> usize {
    content.len()
}

/// Suggested artifact filename for a project, in the given format.
///
/// Non-alphanumeric characters in the project name are replaced with
/// underscores; context prompts carry a `_context` suffix.
pub fn suggested_filename(project_name: &str, format: ExportFormat) -> String {
    let stem: String = project_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    match format {
        ExportFormat::ContextPrompt => format!("{}_export_context.txt", stem),
        _ => format!("{}_export.{}", stem, format.file_extension()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn test_timestamp() -> chrono::DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(
            "MARKDOWN".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "context_prompt".parse::<ExportFormat>().unwrap(),
            ExportFormat::ContextPrompt
        );
    }

    #[test]
    fn test_format_from_str_rejects_unknown() {
        let err = "xml".parse::<ExportFormat>().unwrap_err();
        match err {
            ExportError::UnsupportedFormat(value) => assert_eq!(value, "xml"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_format_from_str_echoes_original_casing() {
        let err = "XML".parse::<ExportFormat>().unwrap_err();
        match err {
            ExportError::UnsupportedFormat(value) => assert_eq!(value, "XML"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
        assert_eq!(ExportFormat::Markdown.file_extension(), "md");
        assert_eq!(ExportFormat::ContextPrompt.as_str(), "context_prompt");
    }

    #[test]
    fn test_target_provider_parse_lossy() {
        assert_eq!(TargetProvider::parse_lossy("openai"), TargetProvider::OpenAi);
        assert_eq!(
            TargetProvider::parse_lossy("Anthropic"),
            TargetProvider::Anthropic
        );
        // Unknown providers fall back rather than failing.
        assert_eq!(TargetProvider::parse_lossy("grok"), TargetProvider::Generic);
        assert_eq!(TargetProvider::parse_lossy(""), TargetProvider::Generic);
    }

    #[test]
    fn test_compression_parse_lossy() {
        assert_eq!(CompressionLevel::parse_lossy("low"), CompressionLevel::Low);
        assert_eq!(CompressionLevel::parse_lossy("HIGH"), CompressionLevel::High);
        assert_eq!(
            CompressionLevel::parse_lossy("maximum"),
            CompressionLevel::Medium
        );
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.target_provider, TargetProvider::Generic);
        assert_eq!(options.compression_level, CompressionLevel::Medium);
        assert!(options.include_metadata);
    }

    #[test]
    fn test_export_rejects_empty_project_name() {
        let ts = test_timestamp();
        let mut project = Project::new("x", ts);
        project.name = "   ".to_string();

        let result = export(&project, &[], ExportFormat::Json, &ExportOptions::default());
        assert!(matches!(result, Err(ExportError::InvalidProject { .. })));
    }

    #[test]
    fn test_export_empty_conversations_is_valid() {
        let ts = test_timestamp();
        let project = Project::new("Research", ts);

        for format in [
            ExportFormat::Json,
            ExportFormat::Markdown,
            ExportFormat::ContextPrompt,
        ] {
            let content = export(&project, &[], format, &ExportOptions::default()).unwrap();
            assert!(!content.is_empty());
        }
    }

    #[test]
    fn test_export_size_counts_bytes() {
        assert_eq!(export_size("abc"), 3);
        // Multibyte characters are measured in UTF-8 bytes, not chars.
        assert_eq!(export_size("héllo"), 6);
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(
            suggested_filename("My Research!", ExportFormat::Json),
            "My_Research__export.json"
        );
        assert_eq!(
            suggested_filename("notes", ExportFormat::Markdown),
            "notes_export.md"
        );
        assert_eq!(
            suggested_filename("notes", ExportFormat::ContextPrompt),
            "notes_export_context.txt"
        );
    }
}
