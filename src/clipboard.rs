//! Copy export artifacts to the system clipboard.

use thiserror::Error;
use tracing::debug;

/// Upper bound on clipboard payloads, matching common platform limits.
const MAX_CLIPBOARD_BYTES: usize = 10 * 1024 * 1024;

/// Errors that can occur when copying an artifact to the clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The artifact is empty; nothing to copy.
    #[error("refusing to copy an empty artifact to the clipboard")]
    Empty,

    /// The artifact exceeds the clipboard size bound.
    #[error("artifact too large for clipboard ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },

    /// The system clipboard is unavailable or rejected the write.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Destination for clipboard writes. Abstracted so tests can substitute
/// an in-memory sink.
trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

struct SystemClipboard(arboard::Clipboard);

impl SystemClipboard {
    fn new() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new()
            .map(SystemClipboard)
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0
            .set_text(text)
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

fn validate(content: &str) -> Result<(), ClipboardError> {
    if content.is_empty() {
        return Err(ClipboardError::Empty);
    }
    if content.len() > MAX_CLIPBOARD_BYTES {
        return Err(ClipboardError::TooLarge {
            size: content.len(),
            max: MAX_CLIPBOARD_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
fn copy_with_sink(content: &str, sink: &mut dyn ClipboardSink) -> Result<(), ClipboardError> {
    validate(content)?;
    sink.set_text(content)
}

/// Copy an artifact to the system clipboard.
///
/// Validation runs before the clipboard is touched so size and emptiness
/// errors surface even in headless environments.
///
/// # Errors
///
/// Returns [`ClipboardError::Empty`] or [`ClipboardError::TooLarge`] for
/// invalid payloads, and [`ClipboardError::Unavailable`] when the system
/// clipboard cannot be reached (e.g. no display server).
pub fn copy_to_clipboard(content: &str) -> Result<(), ClipboardError> {
    validate(content)?;

    let mut clipboard = SystemClipboard::new()?;
    clipboard.set_text(content)?;
    debug!(bytes = content.len(), "copied artifact to clipboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemorySink {
        text: Option<String>,
        fail: bool,
    }

    impl ClipboardSink for MemorySink {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("mock failure".to_string()));
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_valid_content() {
        let mut sink = MemorySink::default();
        copy_with_sink("# Research\n", &mut sink).unwrap();
        assert_eq!(sink.text.as_deref(), Some("# Research\n"));
    }

    #[test]
    fn test_copy_empty_rejected() {
        let mut sink = MemorySink::default();
        let err = copy_with_sink("", &mut sink).unwrap_err();
        assert!(matches!(err, ClipboardError::Empty));
        assert!(sink.text.is_none());
    }

    #[test]
    fn test_copy_oversized_rejected() {
        let mut sink = MemorySink::default();
        let big = "a".repeat(MAX_CLIPBOARD_BYTES + 1);
        let err = copy_with_sink(&big, &mut sink).unwrap_err();
        match err {
            ClipboardError::TooLarge { size, max } => {
                assert_eq!(size, MAX_CLIPBOARD_BYTES + 1);
                assert_eq!(max, MAX_CLIPBOARD_BYTES);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_copy_at_limit_accepted() {
        let mut sink = MemorySink::default();
        let at_limit = "a".repeat(MAX_CLIPBOARD_BYTES);
        copy_with_sink(&at_limit, &mut sink).unwrap();
        assert_eq!(sink.text.map(|t| t.len()), Some(MAX_CLIPBOARD_BYTES));
    }

    #[test]
    fn test_sink_failure_propagates() {
        let mut sink = MemorySink {
            fail: true,
            ..Default::default()
        };
        let err = copy_with_sink("content", &mut sink).unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable(_)));
    }
}
