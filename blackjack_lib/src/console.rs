//! Terminal input and output for the table. The round engine only talks to a `Terminal`, so the
//! same game can be played from stdin or from a script.
use crate::error::BlackjackGameError;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;
use tracing::warn;

pub trait Terminal {
    /// Shows `text` and blocks until a line of input is available. The line is returned without
    /// its trailing newline.
    fn prompt(&mut self, text: &str) -> Result<String, BlackjackGameError>;

    fn display(&mut self, text: &str);
}

/// Terminal over any reader and writer, stdin and stdout for a real table.
/// `pace` is slept after every displayed line so the game can be followed.
pub struct StdTerminal<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    pace: Duration,
}

impl<R: BufRead, W: Write> StdTerminal<R, W> {
    pub fn new(reader: R, writer: W, pace: Duration) -> Self {
        StdTerminal {
            reader,
            writer,
            pace,
        }
    }
}

impl<R: BufRead, W: Write> Terminal for StdTerminal<R, W> {
    fn prompt(&mut self, text: &str) -> Result<String, BlackjackGameError> {
        write!(self.writer, "{}", text)?;
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(BlackjackGameError::InputClosed);
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn display(&mut self, text: &str) {
        if let Err(e) = writeln!(self.writer, "{}", text) {
            warn!("failed to write to terminal: {}", e);
        }
        if !self.pace.is_zero() {
            thread::sleep(self.pace);
        }
    }
}

/// Terminal that answers prompts from a fixed list and remembers everything it was asked to show.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedTerminal {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Answers that were never asked for.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Returns true if any displayed line contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

impl Terminal for ScriptedTerminal {
    fn prompt(&mut self, text: &str) -> Result<String, BlackjackGameError> {
        self.prompts.push(text.to_string());
        self.answers
            .pop_front()
            .ok_or(BlackjackGameError::InputClosed)
    }

    fn display(&mut self, text: &str) {
        self.output.push(text.to_string());
    }
}

/// Asks until the answer parses as a whole number.
pub fn prompt_amount<T: Terminal + ?Sized>(
    terminal: &mut T,
    text: &str,
) -> Result<i64, BlackjackGameError> {
    loop {
        let answer = terminal.prompt(text)?;
        match answer.trim().parse::<i64>() {
            Ok(n) => return Ok(n),
            Err(_) => terminal.display("Please enter a whole number."),
        }
    }
}

/// Asks until the answer is `y` or `n`, in either case.
pub fn prompt_yes_no<T: Terminal + ?Sized>(
    terminal: &mut T,
    text: &str,
) -> Result<bool, BlackjackGameError> {
    loop {
        let answer = terminal.prompt(text)?;
        match answer.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => terminal.display("Please answer y or n."),
        }
    }
}
