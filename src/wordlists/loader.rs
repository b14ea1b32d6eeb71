//! Word list loading utilities
//!
//! Resolves the `-w` flag into the guess pool and secret list used by the
//! in-process collaborators.

use super::{ALLOWED, ANSWERS};
use crate::core::Word;
use std::fs;
use std::io;
use std::path::Path;

/// Guess pool and secret list for one process
#[derive(Debug, Clone)]
pub struct WordLists {
    /// Words the suggestion engine may guess
    pub guess_pool: Vec<Word>,
    /// Words a secret may be drawn from
    pub answers: Vec<Word>,
}

impl WordLists {
    /// Resolve a word list selector
    ///
    /// - `"all"`: guess from every allowed word, secrets from the answer list
    /// - `"answers"`: guess and draw secrets from the answer list only
    /// - anything else: a path to a custom guess list, secrets from the answer list
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a custom list cannot be read.
    pub fn resolve(selector: &str) -> io::Result<Self> {
        let answers = words_from_slice(ANSWERS);
        let guess_pool = match selector {
            "all" => words_from_slice(ALLOWED),
            "answers" => answers.clone(),
            path => load_from_file(path)?,
        };

        Ok(Self {
            guess_pool,
            answers,
        })
    }

    /// Embedded lists with the full guess pool
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            guess_pool: words_from_slice(ALLOWED),
            answers: words_from_slice(ANSWERS),
        }
    }
}

/// Load words from a file
///
/// Returns a vector of valid Word instances, skipping blank or invalid lines.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read or opened.
///
/// # Examples
/// ```no_run
/// use wordle_race::wordlists::loader::load_from_file;
///
/// let words = load_from_file("data/answers.txt").unwrap();
/// println!("Loaded {} words", words.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Word>> {
    let content = fs::read_to_string(path)?;

    let words = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| Word::new(line).ok())
        .collect();

    Ok(words)
}

/// Convert embedded string slice to Word vector
///
/// # Examples
/// ```
/// use wordle_race::wordlists::loader::words_from_slice;
/// use wordle_race::wordlists::ANSWERS;
///
/// let words = words_from_slice(ANSWERS);
/// assert_eq!(words.len(), ANSWERS.len());
/// ```
#[must_use]
pub fn words_from_slice(slice: &[&str]) -> Vec<Word> {
    slice.iter().filter_map(|&s| Word::new(s).ok()).collect()
}
