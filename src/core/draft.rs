//! Text being composed before submission.

/// Editable input buffer.
///
/// Independent of the transcript and the request slot. Cleared only after a
/// confirmed successful submission; failures leave it intact for retry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDraft {
    text: String,
}

impl InputDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_char(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn insert_newline(&mut self) {
        self.text.push('\n');
    }

    /// Removes the last character, if any.
    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::InputDraft;

    #[test]
    fn edits_accumulate_and_clear_resets() {
        let mut draft = InputDraft::new();
        draft.push_str("first line");
        draft.insert_newline();
        draft.push_char('x');
        draft.push_char('y');
        draft.backspace();

        assert_eq!(draft.text(), "first line\nx");
        assert!(!draft.is_blank());

        draft.clear();
        assert_eq!(draft.text(), "");
        assert!(draft.is_blank());
    }

    #[test]
    fn whitespace_only_draft_is_blank() {
        let mut draft = InputDraft::new();
        draft.replace(" \n\t ");
        assert!(draft.is_blank());
    }
}
