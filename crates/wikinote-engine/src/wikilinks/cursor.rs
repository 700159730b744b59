/// A byte cursor over document text.
///
/// Only ASCII delimiters are ever matched, so every position the scanner
/// slices at is a char boundary even when the cursor steps through the middle
/// of a multi-byte character.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Current byte offset into the text.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.text
            .as_bytes()
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    /// Offset of the next occurrence of `byte` at or after `from`.
    pub fn find_from(&self, from: usize, byte: u8) -> Option<usize> {
        let rest = self.text.as_bytes().get(from..)?;
        rest.iter().position(|&b| b == byte).map(|i| from + i)
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.text.as_bytes().get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    /// Moves to `pos`, clamped to the end of the text.
    pub fn jump_to(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
    }
}
