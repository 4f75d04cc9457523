use crate::results::SolverError;

/// The number of letters in every supported word.
pub const WORD_LEN: usize = 5;

/// Bits used per letter. 26 letters are encoded as 1..=26, so zero never
/// appears as a letter digit in a valid code.
const LETTER_BITS: u32 = 5;
const LETTER_MASK: u32 = (1 << LETTER_BITS) - 1;

/// A word packed into a dense unsigned integer.
///
/// The code is seeded with a high-order sentinel digit of 1, then each letter
/// (left to right) is shifted in below it. This keeps the mapping canonical
/// and collision-free: every valid five-letter word maps to a distinct
/// integer, and string order is preserved among codes.
pub type WordCode = u32;

/// Encodes a lowercase ASCII word of exactly [`WORD_LEN`] letters.
///
/// Fails with [`SolverError::InvalidWord`] if the word has the wrong length or
/// contains a character outside `a..=z`.
pub fn encode(word: &str) -> Result<WordCode, SolverError> {
    if word.len() != WORD_LEN {
        return Err(SolverError::InvalidWord);
    }
    let mut code: WordCode = 1;
    for letter in word.bytes() {
        if !letter.is_ascii_lowercase() {
            return Err(SolverError::InvalidWord);
        }
        code = (code << LETTER_BITS) | (letter - b'a' + 1) as WordCode;
    }
    Ok(code)
}

/// Decodes a [`WordCode`] back into its word.
///
/// Fails with [`SolverError::InvalidWord`] if the code was not produced by
/// [`encode`] (a zero or out-of-range letter digit, or a missing sentinel).
pub fn decode(code: WordCode) -> Result<String, SolverError> {
    let mut letters = [0u8; WORD_LEN];
    let mut rest = code;
    for slot in letters.iter_mut().rev() {
        let digit = rest & LETTER_MASK;
        if digit == 0 || digit > 26 {
            return Err(SolverError::InvalidWord);
        }
        *slot = b'a' + (digit as u8 - 1);
        rest >>= LETTER_BITS;
    }
    if rest != 1 {
        return Err(SolverError::InvalidWord);
    }
    Ok(letters.iter().map(|byte| *byte as char).collect())
}

/// Unpacks the letter digits (1..=26) of a valid code, left to right.
pub(crate) fn letter_digits(code: WordCode) -> [u8; WORD_LEN] {
    let mut digits = [0u8; WORD_LEN];
    let mut rest = code;
    for slot in digits.iter_mut().rev() {
        *slot = (rest & LETTER_MASK) as u8;
        rest >>= LETTER_BITS;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn encode_decode_round_trip() -> Result<(), SolverError> {
        for word in ["aaaaa", "abcde", "rocky", "zzzzz", "later"] {
            assert_eq!(decode(encode(word)?)?, word);
        }
        Ok(())
    }

    #[test]
    fn encode_preserves_order() -> Result<(), SolverError> {
        assert!(encode("aaaaa")? < encode("aaaab")?);
        assert!(encode("abcde")? < encode("abcdf")?);
        assert!(encode("azzzz")? < encode("baaaa")?);
        Ok(())
    }

    #[test]
    fn encode_rejects_wrong_length() {
        assert_matches!(encode(""), Err(SolverError::InvalidWord));
        assert_matches!(encode("abcd"), Err(SolverError::InvalidWord));
        assert_matches!(encode("abcdef"), Err(SolverError::InvalidWord));
    }

    #[test]
    fn encode_rejects_unsupported_characters() {
        assert_matches!(encode("abcd1"), Err(SolverError::InvalidWord));
        assert_matches!(encode("ABCDE"), Err(SolverError::InvalidWord));
        assert_matches!(encode("ab de"), Err(SolverError::InvalidWord));
    }

    #[test]
    fn decode_rejects_invalid_codes() {
        assert_matches!(decode(0), Err(SolverError::InvalidWord));
        // Valid digits but no sentinel.
        assert_matches!(decode(0b00001_00001_00001_00001_00001), Err(SolverError::InvalidWord));
        // Sentinel present but a zero letter digit.
        assert_matches!(
            decode(1 << (5 * LETTER_BITS) | 0b00001_00001_00001_00001_00000),
            Err(SolverError::InvalidWord)
        );
    }

    #[test]
    fn letter_digits_match_encoding() -> Result<(), SolverError> {
        assert_eq!(letter_digits(encode("abcde")?), [1, 2, 3, 4, 5]);
        assert_eq!(letter_digits(encode("zzzzz")?), [26, 26, 26, 26, 26]);
        Ok(())
    }
}
