//! Progressive reveal of scene text.
//!
//! The host's timer calls [`TextReveal::tick`]; a skip jumps straight to the
//! completed state. Choices stay locked until the reveal completes.

/// Reveal progress over one scene's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReveal {
    text: String,
    /// Byte offset of the end of the revealed prefix; always a char boundary.
    shown: usize,
}

impl TextReveal {
    /// Starts revealing `text` from the beginning.
    #[must_use]
    pub fn start(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown: 0,
        }
    }

    /// A reveal that is already complete.
    #[must_use]
    pub fn completed(text: impl Into<String>) -> Self {
        let text = text.into();
        let shown = text.len();
        Self { text, shown }
    }

    /// Reveals one more character. Returns `false` once nothing is left.
    pub fn tick(&mut self) -> bool {
        match self.text[self.shown..].chars().next() {
            Some(c) => {
                self.shown += c.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Jumps to the completed state.
    pub fn skip(&mut self) {
        self.shown = self.text.len();
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shown == self.text.len()
    }

    /// Text revealed so far.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        &self.text[..self.shown]
    }

    #[must_use]
    pub fn full_text(&self) -> &str {
        &self.text
    }
}
