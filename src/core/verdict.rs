//! Per-letter verdicts for a scored guess
//!
//! A verdict sequence is the feedback for one guess against one secret:
//! - `Hit` = letter in the correct position (G)
//! - `Present` = letter in the word, wrong position (Y)
//! - `Miss` = letter not in the word, or all copies already accounted for (B)
//!
//! The remote services exchange sequences as five-letter `G`/`Y`/`B` strings.

use super::word::{WORD_LENGTH, Word};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Outcome for a single letter of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Hit,
    Present,
    Miss,
}

impl Verdict {
    /// Wire symbol for this verdict
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Hit => 'G',
            Self::Present => 'Y',
            Self::Miss => 'B',
        }
    }

    /// Parse a wire or display symbol
    ///
    /// Accepts `G`/`Y`/`B` in either case, the `-`/`_` gray aliases and the
    /// square emojis.
    #[must_use]
    pub const fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            'G' | 'g' | '🟩' => Some(Self::Hit),
            'Y' | 'y' | '🟨' => Some(Self::Present),
            'B' | 'b' | '-' | '_' | '⬜' => Some(Self::Miss),
            _ => None,
        }
    }

    #[must_use]
    pub const fn emoji(self) -> char {
        match self {
            Self::Hit => '🟩',
            Self::Present => '🟨',
            Self::Miss => '⬜',
        }
    }
}

/// Error parsing a verdict string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerdictError {
    #[error("verdict must have exactly 5 symbols, got {0}")]
    InvalidLength(usize),
    #[error("invalid verdict symbol {0:?}")]
    InvalidSymbol(char),
}

/// The five verdicts for one guess, in letter order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerdictSequence([Verdict; WORD_LENGTH]);

impl VerdictSequence {
    /// All hits (solved)
    pub const SOLVED: Self = Self([Verdict::Hit; WORD_LENGTH]);

    #[must_use]
    pub const fn new(verdicts: [Verdict; WORD_LENGTH]) -> Self {
        Self(verdicts)
    }

    #[must_use]
    pub const fn verdicts(&self) -> &[Verdict; WORD_LENGTH] {
        &self.0
    }

    /// A sequence of all hits marks a solved round
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.0.iter().all(|&v| v == Verdict::Hit)
    }

    #[must_use]
    pub fn hits(&self) -> usize {
        self.0.iter().filter(|&&v| v == Verdict::Hit).count()
    }

    #[must_use]
    pub fn presents(&self) -> usize {
        self.0.iter().filter(|&&v| v == Verdict::Present).count()
    }

    /// Score `guess` against `secret`
    ///
    /// Implements Wordle's feedback rules including duplicate letters.
    ///
    /// # Algorithm
    /// 1. First pass: mark exact matches and tally the secret's unmatched letters
    /// 2. Second pass: mark Present from the unmatched pool, left to right
    ///
    /// # Examples
    /// ```
    /// use wordle_race::core::{VerdictSequence, Word};
    ///
    /// let guess = Word::new("slate").unwrap();
    /// let secret = Word::new("crane").unwrap();
    /// let verdict = VerdictSequence::score(&guess, &secret);
    ///
    /// assert_eq!(verdict.to_string(), "BBGBG");
    /// ```
    #[must_use]
    pub fn score(guess: &Word, secret: &Word) -> Self {
        let mut result = [Verdict::Miss; WORD_LENGTH];
        let mut unmatched = [0u8; 26];

        let guess = guess.chars();
        let secret = secret.chars();

        // Index needed to read both words and write result[i]
        #[allow(clippy::needless_range_loop)]
        for i in 0..WORD_LENGTH {
            if guess[i] == secret[i] {
                result[i] = Verdict::Hit;
            } else {
                unmatched[usize::from(secret[i] - b'a')] += 1;
            }
        }

        #[allow(clippy::needless_range_loop)]
        for i in 0..WORD_LENGTH {
            if result[i] == Verdict::Hit {
                continue;
            }
            let slot = &mut unmatched[usize::from(guess[i] - b'a')];
            if *slot > 0 {
                result[i] = Verdict::Present;
                *slot -= 1;
            }
        }

        Self(result)
    }

    /// Render as a row of colored squares
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|v| v.emoji()).collect()
    }
}

impl FromStr for VerdictSequence {
    type Err = VerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.trim().chars().collect();
        if symbols.len() != WORD_LENGTH {
            return Err(VerdictError::InvalidLength(symbols.len()));
        }

        let mut verdicts = [Verdict::Miss; WORD_LENGTH];
        for (slot, ch) in verdicts.iter_mut().zip(symbols) {
            *slot = Verdict::from_symbol(ch).ok_or(VerdictError::InvalidSymbol(ch))?;
        }

        Ok(Self(verdicts))
    }
}

impl fmt::Display for VerdictSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.0 {
            write!(f, "{}", v.symbol())?;
        }
        Ok(())
    }
}
