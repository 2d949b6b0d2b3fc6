//! Shared word list the board is drawn from.

use std::collections::HashSet;

use crate::domain::board::BOARD_SIZE;
use crate::error::AppError;

const DEFAULT_WORDLIST: &str = include_str!("../../data/wordlist.txt");

/// Deduplicated, non-empty words. Guaranteed to hold at least one full
/// board's worth, so board generation can always sample without
/// replacement.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Load from a newline-delimited file.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("failed to read word list {path}: {e}")))?;
        Self::from_lines(&raw)
    }

    /// The word list bundled with the binary.
    pub fn embedded() -> Result<Self, AppError> {
        Self::from_lines(DEFAULT_WORDLIST)
    }

    pub(crate) fn from_lines(raw: &str) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        let mut words = Vec::new();
        for line in raw.lines() {
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            if seen.insert(word.to_string()) {
                words.push(word.to_string());
            }
        }
        if words.len() < BOARD_SIZE {
            return Err(AppError::config(format!(
                "word list has {} distinct words, need at least {BOARD_SIZE}",
                words.len()
            )));
        }
        Ok(Self { words })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
