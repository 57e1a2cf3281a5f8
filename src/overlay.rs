//! Stream-overlay text sinks
//!
//! The question and answer currently being spoken are mirrored into small
//! text files that an overlay source (e.g. OBS) reads, word-wrapped to a
//! fixed column width. Queue depth is published the same way.

use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// Column width the overlay source renders
pub const WRAP_WIDTH: usize = 45;

const QUESTION_FILE: &str = "question.txt";
const ANSWER_FILE: &str = "response.txt";
const STATUS_FILE: &str = "queue.txt";

/// Writes question/answer text for the overlay
pub struct OverlayWriter {
    dir: PathBuf,
}

impl OverlayWriter {
    /// Create a writer rooted at `dir`
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Publish the question being answered
    ///
    /// Overlay renderers choke on non-ASCII glyphs, so question text is
    /// reduced to ASCII before wrapping.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn write_question(&self, text: &str) -> Result<()> {
        let ascii: String = text.chars().filter(char::is_ascii).collect();
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(QUESTION_FILE), wrap_text(&ascii, WRAP_WIDTH))?;
        Ok(())
    }

    /// Publish the generated answer
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn write_answer(&self, text: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(ANSWER_FILE), wrap_text(text, WRAP_WIDTH))?;
        Ok(())
    }

    /// Remove any question/answer text left from a prior cycle
    ///
    /// # Errors
    ///
    /// Returns error if an existing file cannot be removed
    pub fn clear(&self) -> Result<()> {
        for name in [QUESTION_FILE, ANSWER_FILE] {
            let path = self.dir.join(name);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Publishes the current queue depth for the overlay
pub struct QueueStatusWriter {
    path: PathBuf,
}

impl QueueStatusWriter {
    /// Create a status writer rooted at `dir`
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STATUS_FILE),
        }
    }

    /// Overwrite the status file with the current queue size
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn write(&self, size: usize) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, size.to_string())?;
        Ok(())
    }
}

/// Greedily wrap `text` to `width` columns
///
/// A token longer than the width lands on its own line rather than being
/// split, so wrapping always terminates.
fn wrap_text(text: &str, width: usize) -> String {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() <= width {
            current.push_str(word);
            current.push(' ');
        } else {
            if !current.is_empty() {
                lines.push(current.trim_end().to_string());
            }
            current = format!("{word} ");
        }
    }
    if !current.is_empty() {
        lines.push(current.trim_end().to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let wrapped = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        for line in wrapped.lines() {
            assert!(line.len() <= 16, "line too long: {line:?}");
        }
        assert_eq!(
            wrapped.split_whitespace().collect::<Vec<_>>().join(" "),
            "the quick brown fox jumps over the lazy dog"
        );
    }

    #[test]
    fn wrap_terminates_on_oversized_token() {
        let token = "a".repeat(120);
        let wrapped = wrap_text(&format!("short {token} tail"), WRAP_WIDTH);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert!(lines.iter().any(|l| l.contains(&token)));
        assert!(lines.len() >= 2);
    }

    #[test]
    fn wrap_empty_input() {
        assert_eq!(wrap_text("", WRAP_WIDTH), "");
        assert_eq!(wrap_text("   ", WRAP_WIDTH), "");
    }

    #[test]
    fn question_text_is_ascii_stripped() {
        let dir = std::env::temp_dir().join("askbox-overlay-test");
        let overlay = OverlayWriter::new(dir.clone());
        overlay.write_question("caf\u{e9} r\u{e9}sum\u{e9} ok").unwrap();

        let written = fs::read_to_string(dir.join(QUESTION_FILE)).unwrap();
        assert!(written.is_ascii());
        assert!(written.contains("caf rsum ok"));

        overlay.clear().unwrap();
        assert!(!dir.join(QUESTION_FILE).exists());
    }

    #[test]
    fn answer_text_keeps_non_ascii() {
        let dir = std::env::temp_dir().join("askbox-overlay-test-answer");
        let overlay = OverlayWriter::new(dir.clone());
        overlay.write_answer("caf\u{e9} is coffee").unwrap();

        let written = fs::read_to_string(dir.join(ANSWER_FILE)).unwrap();
        assert!(written.contains("caf\u{e9}"));

        overlay.clear().unwrap();
    }
}
