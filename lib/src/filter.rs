use crate::codec::WORD_LEN;
use crate::results::{parse_history, ClueRow, LetterResult, SolverError};
use std::sync::Arc;

const ALPHABET: usize = 26;
const ALL_LETTERS: u32 = (1 << ALPHABET) - 1;

/// Letter constraints distilled from an accumulated clue history: a fixed
/// letter and a forbidden-letter set per position, the set of letters known
/// to be present somewhere, and per-letter occurrence bounds.
///
/// A `ConstraintSet` is rebuilt from the whole history whenever the history
/// changes; the history is small, so nothing is kept incremental here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    fixed: [Option<u8>; WORD_LEN],
    forbidden: [u32; WORD_LEN],
    present: u32,
    min_count: [u8; ALPHABET],
    max_count: [u8; ALPHABET],
}

impl ConstraintSet {
    /// A constraint set that every word of the right shape satisfies.
    pub fn unconstrained() -> ConstraintSet {
        ConstraintSet {
            fixed: [None; WORD_LEN],
            forbidden: [0; WORD_LEN],
            present: 0,
            min_count: [0; ALPHABET],
            max_count: [u8::MAX; ALPHABET],
        }
    }

    /// Parses a clue-history string and builds its constraints.
    pub fn from_history(history: &str) -> Result<ConstraintSet, SolverError> {
        Ok(ConstraintSet::from_rows(&parse_history(history)?))
    }

    /// Builds constraints from already-parsed clue rows, merging row by row.
    pub fn from_rows(rows: &[ClueRow]) -> ConstraintSet {
        let mut constraints = ConstraintSet::unconstrained();
        let mut marked_wrong = [false; ALPHABET];
        for row in rows {
            // Confirmed occurrences of each letter within this row. A `wrong`
            // mark on a letter with a confirmed occurrence means "no
            // additional occurrence", not "absent".
            let mut row_min = [0u8; ALPHABET];
            for (letter, result) in row.letters.iter().zip(row.results.iter()) {
                if *result != LetterResult::NotPresent {
                    row_min[letter_index(*letter)] += 1;
                }
            }
            for (location, (letter, result)) in
                row.letters.iter().zip(row.results.iter()).enumerate()
            {
                let letter = letter_index(*letter);
                let bit = 1u32 << letter;
                match result {
                    LetterResult::Correct => {
                        if let Some(other) = constraints.fixed[location] {
                            if other != letter as u8 {
                                // Contradictory history: no word can satisfy
                                // this position, so the filter result is
                                // legitimately empty.
                                constraints.forbidden[location] = ALL_LETTERS;
                            }
                        }
                        constraints.fixed[location] = Some(letter as u8);
                        constraints.forbidden[location] &= !bit;
                        constraints.present |= bit;
                    }
                    LetterResult::PresentNotHere => {
                        constraints.forbidden[location] |= bit;
                        constraints.present |= bit;
                    }
                    LetterResult::NotPresent => {
                        marked_wrong[letter] = true;
                        let known_present =
                            row_min[letter] > 0 || constraints.present & bit != 0;
                        if known_present {
                            constraints.forbidden[location] |= bit;
                        } else {
                            for position in 0..WORD_LEN {
                                if constraints.fixed[position] != Some(letter as u8) {
                                    constraints.forbidden[position] |= bit;
                                }
                            }
                        }
                    }
                }
            }
            for letter in 0..ALPHABET {
                if row_min[letter] > constraints.min_count[letter] {
                    constraints.min_count[letter] = row_min[letter];
                }
            }
        }
        // A letter marked wrong anywhere with a confirmed minimum occurs
        // exactly that many times.
        for letter in 0..ALPHABET {
            if marked_wrong[letter] && constraints.min_count[letter] > 0 {
                constraints.max_count[letter] = constraints.min_count[letter];
            }
        }
        constraints
    }

    /// Returns `true` iff the given word is consistent with every clue.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        if word.len() != WORD_LEN {
            return false;
        }
        let mut counts = [0u8; ALPHABET];
        for (location, byte) in word.bytes().enumerate() {
            if !byte.is_ascii_lowercase() {
                return false;
            }
            let letter = letter_index(byte);
            if let Some(fixed) = self.fixed[location] {
                if fixed != letter as u8 {
                    return false;
                }
            }
            if self.forbidden[location] & (1 << letter) != 0 {
                return false;
            }
            counts[letter] += 1;
        }
        for letter in 0..ALPHABET {
            if self.present & (1 << letter) != 0 && counts[letter] == 0 {
                return false;
            }
            if counts[letter] < self.min_count[letter] || counts[letter] > self.max_count[letter] {
                return false;
            }
        }
        true
    }

    /// The indices of the words consistent with these constraints,
    /// order-preserving relative to the input list.
    pub fn matching_indices<S: AsRef<str>>(&self, words: &[S]) -> Vec<usize> {
        words
            .iter()
            .enumerate()
            .filter_map(|(index, word)| {
                if self.is_satisfied_by(word.as_ref()) {
                    return Some(index);
                }
                None
            })
            .collect()
    }
}

fn letter_index(letter: u8) -> usize {
    (letter - b'a') as usize
}

/// Filters a word list down to those consistent with the given clue history.
/// An empty result is a normal value: it signals that the clues contradict
/// every word in the list.
pub fn filter_words(history: &str, words: &[Arc<str>]) -> Result<Vec<Arc<str>>, SolverError> {
    let constraints = ConstraintSet::from_history(history)?;
    Ok(words
        .iter()
        .filter_map(|word| {
            if constraints.is_satisfied_by(word) {
                return Some(Arc::clone(word));
            }
            None
        })
        .collect())
}
