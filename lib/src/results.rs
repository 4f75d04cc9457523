use crate::codec::{self, WordCode, WORD_LEN};
use std::fmt;

/// The verdict for a single letter of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LetterResult {
    /// The letter is in the word, at this location.
    Correct,
    /// The letter is in the word, but somewhere else.
    PresentNotHere,
    /// There is no unclaimed occurrence of the letter in the word.
    NotPresent,
}

/// Indicates that an error occurred while answering a query.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SolverError {
    /// A word had the wrong length, or a character outside the supported set.
    InvalidWord,
    /// A clue-history row had the wrong length or an unrecognized state marker.
    MalformedClueRow,
    /// Partition data is still being built. The caller can retry once
    /// [`Engine::progress`](crate::Engine::progress) reaches 1.
    UninitializedEngine,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidWord => {
                write!(f, "word must be exactly {} letters from a-z", WORD_LEN)
            }
            SolverError::MalformedClueRow => write!(
                f,
                "each clue row must be {} letter/state pairs with states '=', '?' or '-'",
                WORD_LEN
            ),
            SolverError::UninitializedEngine => {
                write!(f, "the clue table is still being built; retry once progress reaches 1")
            }
        }
    }
}

impl std::error::Error for SolverError {}

const STATE_BITS: u32 = 2;
const STATE_MASK: u16 = (1 << STATE_BITS) - 1;

const fn state_code(result: LetterResult) -> u16 {
    match result {
        LetterResult::NotPresent => 0,
        LetterResult::PresentNotHere => 1,
        LetterResult::Correct => 2,
    }
}

/// The per-letter verdicts of one guess against one answer, packed two bits
/// per location with the first location in the most significant position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CluePattern(u16);

impl CluePattern {
    /// The pattern where every letter is [`LetterResult::Correct`].
    pub const ALL_CORRECT: CluePattern = {
        let mut value = 0u16;
        let mut index = 0;
        while index < WORD_LEN {
            value = (value << STATE_BITS) | state_code(LetterResult::Correct);
            index += 1;
        }
        CluePattern(value)
    };

    /// One more than the largest packed value, so patterns can index arrays.
    pub const NUM_VALUES: usize = Self::ALL_CORRECT.0 as usize + 1;

    /// Packs a slice of per-letter verdicts. Fails with
    /// [`SolverError::MalformedClueRow`] unless exactly [`WORD_LEN`] results
    /// are given.
    pub fn from_results(results: &[LetterResult]) -> Result<CluePattern, SolverError> {
        if results.len() != WORD_LEN {
            return Err(SolverError::MalformedClueRow);
        }
        let mut value = 0u16;
        for result in results {
            value = (value << STATE_BITS) | state_code(*result);
        }
        Ok(CluePattern(value))
    }

    /// Unpacks the per-letter verdicts, first location first.
    pub fn results(self) -> [LetterResult; WORD_LEN] {
        let mut results = [LetterResult::NotPresent; WORD_LEN];
        let mut rest = self.0;
        for slot in results.iter_mut().rev() {
            *slot = match rest & STATE_MASK {
                0 => LetterResult::NotPresent,
                1 => LetterResult::PresentNotHere,
                _ => LetterResult::Correct,
            };
            rest >>= STATE_BITS;
        }
        results
    }

    /// The packed value as an array index in `0..NUM_VALUES`.
    pub fn as_index(self) -> usize {
        self.0 as usize
    }

    pub fn is_all_correct(self) -> bool {
        self == Self::ALL_CORRECT
    }
}

impl fmt::Display for CluePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in self.results() {
            f.write_str(match result {
                LetterResult::Correct => "=",
                LetterResult::PresentNotHere => "?",
                LetterResult::NotPresent => "-",
            })?;
        }
        Ok(())
    }
}

impl Default for CluePattern {
    fn default() -> CluePattern {
        CluePattern(0)
    }
}

/// Determines the clue pattern a real game would show for `guess` against
/// `answer`.
///
/// Two passes keep duplicate letters honest: exact matches claim their answer
/// letter first, then each remaining guess letter greedily claims the first
/// unclaimed occurrence of itself, left to right. An answer letter satisfies
/// at most one claim.
pub fn clue_of(guess: WordCode, answer: WordCode) -> CluePattern {
    let guess_letters = codec::letter_digits(guess);
    let mut unclaimed = codec::letter_digits(answer);
    let mut results = [LetterResult::NotPresent; WORD_LEN];
    for index in 0..WORD_LEN {
        if guess_letters[index] == unclaimed[index] {
            results[index] = LetterResult::Correct;
            unclaimed[index] = 0;
        }
    }
    for index in 0..WORD_LEN {
        if results[index] == LetterResult::Correct {
            continue;
        }
        if let Some(claimed) = unclaimed
            .iter()
            .position(|digit| *digit == guess_letters[index])
        {
            results[index] = LetterResult::PresentNotHere;
            unclaimed[claimed] = 0;
        }
    }
    match CluePattern::from_results(&results) {
        Ok(pattern) => pattern,
        // results always has WORD_LEN entries.
        Err(_) => unreachable!(),
    }
}

/// One guessed row of the clue history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueRow {
    /// The guessed letters as lowercase ASCII bytes.
    pub letters: [u8; WORD_LEN],
    /// The verdict for each letter, in the same order.
    pub results: [LetterResult; WORD_LEN],
}

impl ClueRow {
    pub fn pattern(&self) -> CluePattern {
        match CluePattern::from_results(&self.results) {
            Ok(pattern) => pattern,
            Err(_) => unreachable!(),
        }
    }
}

impl fmt::Display for ClueRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, result) in self.letters.iter().zip(self.results.iter()) {
            write!(f, "{}", *letter as char)?;
            f.write_str(match result {
                LetterResult::Correct => "=",
                LetterResult::PresentNotHere => "?",
                LetterResult::NotPresent => "-",
            })?;
        }
        Ok(())
    }
}

/// Parses an accumulated clue history into rows.
///
/// The history is a sequence of letter/state pairs, where the state marker is
/// `=` for correct, `?` for present-somewhere-else, and `-` for not present.
/// Rows may be separated with `_`; without separators the pairs are chunked
/// into rows of [`WORD_LEN`]. Letters are case-insensitive. Any row that is
/// not exactly [`WORD_LEN`] pairs, or that uses an unknown marker, fails with
/// [`SolverError::MalformedClueRow`].
pub fn parse_history(history: &str) -> Result<Vec<ClueRow>, SolverError> {
    let mut rows = Vec::new();
    for segment in history.split('_') {
        let chars: Vec<char> = segment.chars().collect();
        if chars.is_empty() {
            continue;
        }
        if chars.len() % (2 * WORD_LEN) != 0 {
            return Err(SolverError::MalformedClueRow);
        }
        for row_chars in chars.chunks(2 * WORD_LEN) {
            let mut letters = [0u8; WORD_LEN];
            let mut results = [LetterResult::NotPresent; WORD_LEN];
            for (index, pair) in row_chars.chunks(2).enumerate() {
                let letter = pair[0].to_ascii_lowercase();
                if !letter.is_ascii_lowercase() {
                    return Err(SolverError::MalformedClueRow);
                }
                letters[index] = letter as u8;
                results[index] = match pair[1] {
                    '=' => LetterResult::Correct,
                    '?' => LetterResult::PresentNotHere,
                    '-' => LetterResult::NotPresent,
                    _ => return Err(SolverError::MalformedClueRow),
                };
            }
            rows.push(ClueRow { letters, results });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use assert_matches::assert_matches;

    fn clue(guess: &str, answer: &str) -> String {
        clue_of(encode(guess).unwrap(), encode(answer).unwrap()).to_string()
    }

    #[test]
    fn clue_of_self_is_all_correct() {
        for word in ["crane", "rocky", "aaaaa", "zzzzz"] {
            let code = encode(word).unwrap();
            assert!(clue_of(code, code).is_all_correct());
        }
    }

    #[test]
    fn clue_of_no_overlap_is_all_not_present() {
        assert_eq!(clue("abcde", "fghij"), "-----");
    }

    #[test]
    fn clue_of_mixed() {
        assert_eq!(clue("crane", "slate"), "--=-=");
        assert_eq!(clue("amino", "piano"), "?-?==");
    }

    #[test]
    fn clue_of_duplicate_guess_letter_single_answer_occurrence() {
        // "abide" has one 'e'; only the first unclaimed 'e' in "speed" may
        // claim it.
        assert_eq!(clue("speed", "abide"), "--?-?");
    }

    #[test]
    fn clue_of_duplicate_letters_exact_match_claims_first() {
        assert_eq!(clue("robot", "floor"), "??-=-");
        assert_eq!(clue("geese", "those"), "---==");
    }

    #[test]
    fn pattern_round_trip() {
        let results = [
            LetterResult::Correct,
            LetterResult::NotPresent,
            LetterResult::PresentNotHere,
            LetterResult::NotPresent,
            LetterResult::Correct,
        ];
        let pattern = CluePattern::from_results(&results).unwrap();
        assert_eq!(pattern.results(), results);
        assert_eq!(pattern.to_string(), "=-?-=");
        assert!(pattern.as_index() < CluePattern::NUM_VALUES);
    }

    #[test]
    fn pattern_wrong_length_is_malformed() {
        assert_matches!(
            CluePattern::from_results(&[LetterResult::Correct; 4]),
            Err(SolverError::MalformedClueRow)
        );
    }

    #[test]
    fn parse_history_single_row() {
        let rows = parse_history("A?L?T=E=R=").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0].letters, b"alter");
        assert_eq!(
            rows[0].results,
            [
                LetterResult::PresentNotHere,
                LetterResult::PresentNotHere,
                LetterResult::Correct,
                LetterResult::Correct,
                LetterResult::Correct,
            ]
        );
    }

    #[test]
    fn parse_history_multiple_rows_with_separator() {
        let rows = parse_history("L-A-T-E-R?_G-I-R?L-Y=").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0].letters, b"later");
        assert_eq!(&rows[1].letters, b"girly");
        assert_eq!(rows[1].pattern().to_string(), "--?-=");
    }

    #[test]
    fn parse_history_chunks_unseparated_rows() {
        let rows = parse_history("L-A-T-E-R?G-I-R?L-Y=").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1].letters, b"girly");
    }

    #[test]
    fn parse_history_empty_is_no_rows() {
        assert_eq!(parse_history("").unwrap(), Vec::new());
        assert_eq!(parse_history("__").unwrap(), Vec::new());
    }

    #[test]
    fn parse_history_rejects_partial_row() {
        assert_matches!(parse_history("A?L?"), Err(SolverError::MalformedClueRow));
        assert_matches!(
            parse_history("A?L?T=E=R=_B-"),
            Err(SolverError::MalformedClueRow)
        );
    }

    #[test]
    fn parse_history_rejects_unknown_marker() {
        assert_matches!(parse_history("A?L?T=E=R!"), Err(SolverError::MalformedClueRow));
    }

    #[test]
    fn parse_history_rejects_non_letter() {
        assert_matches!(parse_history("1?L?T=E=R="), Err(SolverError::MalformedClueRow));
    }

    #[test]
    fn clue_row_display_round_trips() {
        let history = "l-a-t-e-r?";
        let rows = parse_history(history).unwrap();
        assert_eq!(rows[0].to_string(), history);
    }
}
