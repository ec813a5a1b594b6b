//! Line-oriented terminal prompts.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, ErrorKind, Write};
use workout_core::{Error, Result};

static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern is valid"));

/// Reads answers from `input` after writing prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Where menu text and results are written
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Read one line; end of input is reported as `UnexpectedEof`
    ///
    /// Bytes that are not UTF-8 become U+FFFD, so they fail integer
    /// validation instead of aborting the session.
    fn read_line(&mut self) -> Result<String> {
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(Error::Io(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask for free text; surrounding whitespace is dropped
    pub fn text(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        Ok(self.read_line()?.trim().to_string())
    }

    /// Ask until the answer is an integer that fits in `i32`
    pub fn int(&mut self, prompt: &str) -> Result<i32> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;
            let answer = self.read_line()?;
            let answer = answer.trim();

            if !INTEGER.is_match(answer) {
                writeln!(self.output, "Invalid input. Please enter a valid integer.")?;
                continue;
            }
            match answer.parse::<i32>() {
                Ok(value) => return Ok(value),
                Err(_) => {
                    writeln!(self.output, "Error: Number out of range. Please try again.")?;
                }
            }
        }
    }
}

/// True when `err` means the input stream ended
pub fn is_end_of_input(err: &Error) -> bool {
    matches!(err, Error::Io(e) if e.kind() == ErrorKind::UnexpectedEof)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_int_retries_until_valid() {
        let mut p = prompter("abc\n1.5\n99999999999\n -7 \n");
        assert_eq!(p.int("n? ").unwrap(), -7);

        let shown = String::from_utf8(p.out().clone()).unwrap();
        assert_eq!(shown.matches("n? ").count(), 4);
        assert_eq!(shown.matches("valid integer").count(), 2);
        assert!(shown.contains("out of range"));
    }

    #[test]
    fn test_text_keeps_empty_answer() {
        let mut p = prompter("\r\n  2024-01-01  \n");
        assert_eq!(p.text("date? ").unwrap(), "");
        assert_eq!(p.text("date? ").unwrap(), "2024-01-01");
    }

    #[test]
    fn test_int_reprompts_on_invalid_utf8() {
        let mut p: Prompter<&[u8], Vec<u8>> =
            Prompter::new(&b"\xff\n\xff\xfe7\n5\n"[..], Vec::new());
        assert_eq!(p.int("n? ").unwrap(), 5);

        let shown = String::from_utf8(p.out().clone()).unwrap();
        assert_eq!(shown.matches("valid integer").count(), 2);
    }

    #[test]
    fn test_text_replaces_invalid_utf8() {
        let mut p: Prompter<&[u8], Vec<u8>> = Prompter::new(&b"2024\xff01\n"[..], Vec::new());
        assert_eq!(p.text("date? ").unwrap(), "2024\u{FFFD}01");
    }

    #[test]
    fn test_end_of_input() {
        let mut p = prompter("");
        let err = p.int("n? ").unwrap_err();
        assert!(is_end_of_input(&err));

        let err = p.text("t? ").unwrap_err();
        assert!(is_end_of_input(&err));
    }
}
