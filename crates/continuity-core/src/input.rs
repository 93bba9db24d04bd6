/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line editable text with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize, // in chars, not bytes
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut buffer = Self::new();
        buffer.set(text);
        buffer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// True when there is nothing but whitespace to submit
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replace the contents and put the cursor at the end
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut input = InputBuffer::new();
        for c in "café ☕".chars() {
            input.insert(c);
        }
        assert_eq!(input.text(), "café ☕");
        assert_eq!(input.cursor(), 6);

        input.backspace();
        input.backspace();
        assert_eq!(input.text(), "café");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = InputBuffer::with_text("vpn dwn");
        input.move_left();
        input.move_left();
        input.insert('o');
        assert_eq!(input.text(), "vpn down");
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut input = InputBuffer::with_text("ab");
        input.delete();
        assert_eq!(input.text(), "ab");

        input.move_home();
        input.delete();
        assert_eq!(input.text(), "b");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut input = InputBuffer::with_text("é");
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor(), 1);
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor(), 0);
        input.backspace();
        assert_eq!(input.text(), "é");
        input.move_end();
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_blank_detection_and_clear() {
        assert!(InputBuffer::with_text("   ").is_blank());
        assert!(InputBuffer::new().is_blank());

        let mut input = InputBuffer::with_text(" x ");
        assert!(!input.is_blank());
        input.clear();
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
    }
}
