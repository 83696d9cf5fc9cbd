//! Acquiring one line of user input at a time.

use anyhow::Result;
use log::warn;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// What a single read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A line with at least one non-whitespace character, terminator stripped.
    Line(String),
    /// Nothing worth dispatching (blank line, interrupted edit); prompt again.
    Blank,
    /// A line that is not valid UTF-8; reported and skipped.
    Invalid,
    /// The input stream is exhausted.
    Eof,
}

impl Input {
    fn from_raw(mut raw: String) -> Self {
        if raw.ends_with('\n') {
            raw.pop();
            if raw.ends_with('\r') {
                raw.pop();
            }
        }
        if raw.trim().is_empty() {
            Input::Blank
        } else {
            Input::Line(raw)
        }
    }
}

/// Source of interactive command lines.
pub trait LineSource {
    /// Show `prompt` and block until a full line or end of input is available.
    fn read_line(&mut self, prompt: &str) -> Result<Input>;
}

/// Line editor with history, used when standard input is a terminal.
pub struct Editor {
    inner: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: DefaultEditor::new()?,
        })
    }

    /// History is a convenience; failing to record a line never ends the session.
    fn remember(&mut self, line: &str) {
        if let Err(e) = self.inner.add_history_entry(line) {
            warn!("history not updated: {e}");
        }
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.inner.readline(prompt) {
            Ok(line) => {
                let input = Input::from_raw(line);
                if let Input::Line(line) = &input {
                    self.remember(line);
                }
                Ok(input)
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Blank),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(err.into()),
        }
    }
}

/// Plain buffered reader, for piped input and tests.
///
/// The prompt goes to `prompt_out`, which is flushed before every read.
pub struct Buffered<R, W> {
    input: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> Buffered<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Self { input, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for Buffered<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        write!(self.prompt_out, "{prompt}")?;
        self.prompt_out.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(Input::Eof);
        }
        match String::from_utf8(raw) {
            Ok(raw) => Ok(Input::from_raw(raw)),
            Err(_) => Ok(Input::Invalid),
        }
    }
}
