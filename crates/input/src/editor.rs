//! Single-line input editor for the operator console.

use crate::map::EditorKey;

/// Editable command line with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    text: String,
    /// Cursor position in chars, `0..=text.chars().count()`.
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Apply a key. Returns the line on submit; the text is kept until the
    /// consumer clears it.
    pub fn apply(&mut self, key: EditorKey) -> Option<String> {
        match key {
            EditorKey::Insert(c) => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
            }
            EditorKey::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
            }
            EditorKey::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
            }
            EditorKey::Left => self.cursor = self.cursor.saturating_sub(1),
            EditorKey::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            EditorKey::Home => self.cursor = 0,
            EditorKey::End => self.cursor = self.char_len(),
            EditorKey::Discard => self.clear(),
            EditorKey::Submit => return Some(self.text.clone()),
        }
        None
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(e: &mut LineEditor, s: &str) {
        for c in s.chars() {
            e.apply(EditorKey::Insert(c));
        }
    }

    #[test]
    fn typing_and_submit() {
        let mut e = LineEditor::new();
        type_str(&mut e, "port 80");
        assert_eq!(e.text(), "port 80");
        assert_eq!(e.cursor(), 7);
        assert_eq!(e.apply(EditorKey::Submit), Some("port 80".to_string()));
        // Submit does not clear by itself.
        assert_eq!(e.text(), "port 80");
    }

    #[test]
    fn insert_in_the_middle() {
        let mut e = LineEditor::new();
        type_str(&mut e, "prt");
        e.apply(EditorKey::Home);
        e.apply(EditorKey::Right);
        e.apply(EditorKey::Insert('o'));
        assert_eq!(e.text(), "port");
        assert_eq!(e.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete() {
        let mut e = LineEditor::new();
        type_str(&mut e, "exitt");
        e.apply(EditorKey::Backspace);
        assert_eq!(e.text(), "exit");
        e.apply(EditorKey::Home);
        e.apply(EditorKey::Delete);
        assert_eq!(e.text(), "xit");
        e.apply(EditorKey::Home);
        e.apply(EditorKey::Backspace);
        assert_eq!(e.text(), "xit");
        e.apply(EditorKey::End);
        e.apply(EditorKey::Delete);
        assert_eq!(e.text(), "xit");
    }

    #[test]
    fn multibyte_characters() {
        let mut e = LineEditor::new();
        type_str(&mut e, "héllo");
        e.apply(EditorKey::Left);
        e.apply(EditorKey::Left);
        e.apply(EditorKey::Left);
        e.apply(EditorKey::Backspace);
        assert_eq!(e.text(), "hllo");
        assert_eq!(e.cursor(), 1);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut e = LineEditor::new();
        e.apply(EditorKey::Left);
        e.apply(EditorKey::Right);
        assert_eq!(e.cursor(), 0);
        type_str(&mut e, "ab");
        e.apply(EditorKey::Right);
        assert_eq!(e.cursor(), 2);
    }

    #[test]
    fn discard_clears() {
        let mut e = LineEditor::new();
        type_str(&mut e, "halt");
        e.apply(EditorKey::Discard);
        assert!(e.is_empty());
        assert_eq!(e.cursor(), 0);
    }
}
