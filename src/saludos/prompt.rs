//! Interactive input sources used when a parameter declares a prompt.

use console::Term;
use std::collections::VecDeque;
use std::io::{self, Write};

pub trait InputSource {
    /// Shows `text` and reads one line. Hidden reads must not echo.
    fn read(&mut self, text: &str, hidden: bool) -> io::Result<String>;
}

/// Prompts on stderr and reads from the controlling terminal.
pub struct TerminalInput {
    term: Term,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl TerminalInput {
    /// Whether prompts can be shown and answered on this terminal. console
    /// returns empty lines without reading when it is not one.
    pub fn is_term(&self) -> bool {
        self.term.is_term()
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for TerminalInput {
    fn read(&mut self, text: &str, hidden: bool) -> io::Result<String> {
        self.term.write_str(text)?;
        self.term.flush()?;
        if hidden {
            self.term.read_secure_line()
        } else {
            self.term.read_line()
        }
    }
}

/// Reads lines from stdin without a terminal, e.g. when input is piped.
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read(&mut self, text: &str, _hidden: bool) -> io::Result<String> {
        let mut stderr = io::stderr();
        stderr.write_all(text.as_bytes())?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Answers prompts from a fixed list and records what was asked.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    asked: Vec<(String, bool)>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// No answers: any prompt reads end-of-input.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Prompt texts shown so far, with whether each was hidden.
    pub fn asked(&self) -> &[(String, bool)] {
        &self.asked
    }
}

impl InputSource for ScriptedInput {
    fn read(&mut self, text: &str, hidden: bool) -> io::Result<String> {
        self.asked.push((text.to_string(), hidden));
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_answers_in_order() {
        let mut input = ScriptedInput::new(["one", "two"]);
        assert_eq!(input.read("First: ", false).unwrap(), "one");
        assert_eq!(input.read("Second: ", true).unwrap(), "two");
        assert!(input.read("Third: ", false).is_err());
        assert_eq!(input.asked().len(), 3);
        assert!(input.asked()[1].1);
    }
}
