use crate::encoder::Word;
use std::fmt;

/// Header line of the memory image format.
pub const HEADER: &str = "v2.0 raw";

/// Encoded words in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: Word) {
        self.words.push(word);
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Renders the memory image: header, then one word per line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        for word in &self.words {
            writeln!(f, "{word}")?;
        }
        Ok(())
    }
}
