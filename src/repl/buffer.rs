//! The not-yet-submitted input line.

/// Ordered characters typed since the last submission.
///
/// Never holds control characters: [`InputBuffer::push_str`] refuses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text`. Returns `false` and leaves the buffer unchanged when
    /// `text` contains a control character.
    pub fn push_str(&mut self, text: &str) -> bool {
        if text.chars().any(char::is_control) {
            return false;
        }
        self.text.push_str(text);
        true
    }

    /// Remove and return the last character.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop_work_on_characters() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.push_str("2"));
        assert!(buffer.push_str("π"));
        assert_eq!(buffer.char_len(), 2);
        assert_eq!(buffer.pop(), Some('π'));
        assert_eq!(buffer.as_str(), "2");
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut buffer = InputBuffer::new();
        assert_eq!(buffer.pop(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut buffer = InputBuffer::new();
        buffer.push_str("ab");
        assert!(!buffer.push_str("\n"));
        assert!(!buffer.push_str("x\u{8}"));
        assert_eq!(buffer.as_str(), "ab");
    }

    #[test]
    fn clear_empties_the_line() {
        let mut buffer = InputBuffer::new();
        buffer.push_str("1+1");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.char_len(), 0);
    }
}
