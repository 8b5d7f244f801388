//! Per-object diagnostics collected during translation.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Warning,
    Error,
}

/// One diagnostic, tagged with the source object it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationMessage {
    pub level: MessageLevel,
    /// `"<type> '<name>'"` of the source object, if there is one.
    pub object: Option<String>,
    pub text: String,
}

impl fmt::Display for TranslationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        };
        match &self.object {
            Some(object) => write!(f, "{level}: {object}: {}", self.text),
            None => write!(f, "{level}: {}", self.text),
        }
    }
}

/// Message log shared by both translators. Every entry is also sent to
/// `tracing`.
#[derive(Debug, Clone, Default)]
pub(crate) struct MessageLog {
    messages: Vec<TranslationMessage>,
}

impl MessageLog {
    pub(crate) fn warn(&mut self, object: Option<String>, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!(object = object.as_deref().unwrap_or(""), "{text}");
        self.messages.push(TranslationMessage {
            level: MessageLevel::Warning,
            object,
            text,
        });
    }

    pub(crate) fn error(&mut self, object: Option<String>, text: impl Into<String>) {
        let text = text.into();
        tracing::error!(object = object.as_deref().unwrap_or(""), "{text}");
        self.messages.push(TranslationMessage {
            level: MessageLevel::Error,
            object,
            text,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
    }

    pub(crate) fn of_level(&self, level: MessageLevel) -> Vec<TranslationMessage> {
        self.messages
            .iter()
            .filter(|m| m.level == level)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_kept_apart() {
        let mut log = MessageLog::default();
        log.warn(Some("Zone 'A'".into()), "first");
        log.error(None, "second");
        log.warn(None, "third");

        let warnings = log.of_level(MessageLevel::Warning);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].to_string(), "warning: Zone 'A': first");
        assert_eq!(log.of_level(MessageLevel::Error)[0].to_string(), "error: second");

        log.clear();
        assert!(log.of_level(MessageLevel::Warning).is_empty());
    }
}
