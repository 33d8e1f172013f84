//! Clipboard sink.

use std::sync::Mutex;

/// Fire-and-forget destination for copied text.
pub trait ClipboardSink: Send + Sync {
    fn copy(&self, text: &str);
}

/// Keeps the last copied value in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn copy(&self, text: &str) {
        *self.contents.lock().unwrap_or_else(|p| p.into_inner()) = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_copy_wins() {
        let clipboard = MemoryClipboard::default();
        assert!(clipboard.contents().is_none());
        clipboard.copy("first");
        clipboard.copy("second");
        assert_eq!(clipboard.contents().as_deref(), Some("second"));
    }
}
