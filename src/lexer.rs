//! Splitting an input line into a command and its arguments.
//!
//! There are no quotes, escapes or substitutions: a token is any maximal run of
//! non-whitespace characters. Tokens are slices of the line they came from, so a
//! [`Tokens`] value can never outlive that line.

use std::ops::Index;

/// Ordered list of tokens borrowed from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'line> {
    items: Vec<&'line str>,
}

impl<'line> Tokens<'line> {
    /// The first token, i.e. the command name. `None` for an empty command.
    pub fn command(&self) -> Option<&'line str> {
        self.items.first().copied()
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[&'line str] {
        self.items.get(1..).unwrap_or(&[])
    }

    /// Token at `index`; `None` past the end plays the role of the list terminator.
    pub fn get(&self, index: usize) -> Option<&'line str> {
        self.items.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[&'line str] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &'line str> + '_ {
        self.items.iter().copied()
    }
}

impl<'line> Index<usize> for Tokens<'line> {
    type Output = &'line str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

/// Splits `line` on whitespace. Runs of delimiters never produce empty tokens.
pub fn tokenize(line: &str) -> Tokens<'_> {
    // A line can't hold more tokens than half its length, rounded up.
    let mut items = Vec::with_capacity(line.len().div_ceil(2));
    items.extend(line.split_ascii_whitespace());
    Tokens { items }
}
