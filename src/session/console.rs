//! Line-based user interaction used by the session modes.

use crate::model::tree::truncate_label;
use crate::session::session_error::SessionError;
use std::io::{self, BufRead, Write};

/// Source of answers and sink of phrases for a session.
pub trait Console {
    /// Reads one line, trimmed and cut to at most `max_len` bytes.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self, max_len: usize) -> io::Result<Option<String>>;

    /// Asks a question expecting a positive or negative confirmation.
    /// End of input counts as negative.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;

    /// Shows a phrase to the user.
    fn say(&mut self, phrase: &str) -> io::Result<()>;
}

/// Longest answer to a yes/no question that is read.
const MAX_ANSWER_LEN: usize = 32;

/// [Console] on top of any buffered reader and writer,
/// e.g. stdin/stdout or in-memory buffers.
#[derive(Debug)]
pub struct IoConsole<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl IoConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns the writer, e.g. to inspect what was said.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn read_line(&mut self, max_len: usize) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(truncate_label(line.trim(), max_len).to_string()))
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{question} (1 - Yes): ")?;
        self.output.flush()?;
        Ok(match self.read_line(MAX_ANSWER_LEN)? {
            Some(answer) => is_positive(&answer),
            None => false,
        })
    }

    fn say(&mut self, phrase: &str) -> io::Result<()> {
        writeln!(self.output, "{phrase}")?;
        self.output.flush()
    }
}

fn is_positive(answer: &str) -> bool {
    answer == "1" || answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y")
}

/// Asks `question` until answered with `yes` or `no` (case-insensitive).
///
/// After any other answer the user is asked whether to continue.
///
/// # Errors
/// [SessionError::UserQuit] if the user declines to continue or input ends.
pub fn ask_yes_no<C: Console + ?Sized>(console: &mut C, question: &str) -> Result<bool, SessionError> {
    loop {
        console.say(question)?;
        let Some(answer) = console.read_line(MAX_ANSWER_LEN)? else {
            return Err(SessionError::UserQuit);
        };

        if answer.eq_ignore_ascii_case("yes") {
            return Ok(true);
        }
        if answer.eq_ignore_ascii_case("no") {
            return Ok(false);
        }

        console.say(&format!("Unknown answer \"{answer}\""))?;
        if !console.confirm("Do you want to continue?")? {
            return Err(SessionError::UserQuit);
        }
    }
}

/// Asks `prompt` until answered with a non-empty label without `"`.
///
/// # Errors
/// [SessionError::UserQuit] if input ends.
pub fn ask_label<C: Console + ?Sized>(
    console: &mut C,
    prompt: &str,
    max_len: usize,
) -> Result<String, SessionError> {
    loop {
        console.say(prompt)?;
        let Some(label) = console.read_line(max_len)? else {
            return Err(SessionError::UserQuit);
        };

        if label.is_empty() {
            continue;
        }
        if label.contains('"') {
            console.say("Answers must not contain '\"'")?;
            continue;
        }
        return Ok(label);
    }
}
