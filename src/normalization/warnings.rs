use std::fmt;

/// Append-only collection of advisory messages for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    text: String,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message, terminated by a newline
    pub fn push(&mut self, message: &str) {
        self.text.push_str(message);
        if !message.ends_with('\n') {
            self.text.push('\n');
        }
    }

    /// Append every message of `other`
    pub fn extend(&mut self, other: &Warnings) {
        self.text.push_str(&other.text);
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of recorded messages
    pub fn len(&self) -> usize {
        self.text.lines().count()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Iterate the recorded messages
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
