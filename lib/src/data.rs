use crate::codec::{self, WordCode};
use crate::results::SolverError;
use std::collections::HashMap;
use std::io;
use std::io::BufRead;
use std::sync::Arc;

/// Reads a word list with one word per line, converting to lower case and
/// skipping blank lines.
pub fn read_word_list<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    Ok(reader
        .lines()
        .collect::<io::Result<Vec<String>>>()?
        .into_iter()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect())
}

/// The words for one word-set selection.
///
/// Words are split by role: *picks* can be the secret answer, while *decoys*
/// are guessable but never the answer. Picks are stored first, so a pick's
/// index into the pick list equals its index into the full guess list. Every
/// word also carries its [`WordCode`], and everything downstream works with
/// indices and codes instead of strings.
///
/// Switching word sets means constructing a new `Dictionary` (and a new
/// [`Engine`](crate::Engine) around it); nothing here is mutated after
/// construction.
#[derive(Debug)]
pub struct Dictionary {
    words: Vec<Arc<str>>,
    codes: Vec<WordCode>,
    index_by_code: HashMap<WordCode, usize>,
    num_picks: usize,
}

impl Dictionary {
    /// Constructs a dictionary from pick and decoy word lists.
    ///
    /// Duplicates within a list, and decoys that already appear among the
    /// picks, are dropped so that the two roles stay disjoint. Fails with
    /// [`SolverError::InvalidWord`] if any word has the wrong length or an
    /// unsupported character.
    pub fn new<S: AsRef<str>>(picks: &[S], decoys: &[S]) -> Result<Dictionary, SolverError> {
        let mut words: Vec<Arc<str>> = Vec::with_capacity(picks.len() + decoys.len());
        let mut codes: Vec<WordCode> = Vec::with_capacity(picks.len() + decoys.len());
        let mut index_by_code: HashMap<WordCode, usize> = HashMap::new();
        for word in picks {
            let code = codec::encode(word.as_ref())?;
            if index_by_code.contains_key(&code) {
                continue;
            }
            index_by_code.insert(code, words.len());
            words.push(Arc::from(word.as_ref()));
            codes.push(code);
        }
        let num_picks = words.len();
        for word in decoys {
            let code = codec::encode(word.as_ref())?;
            if index_by_code.contains_key(&code) {
                continue;
            }
            index_by_code.insert(code, words.len());
            words.push(Arc::from(word.as_ref()));
            codes.push(code);
        }
        Ok(Dictionary {
            words,
            codes,
            index_by_code,
            num_picks,
        })
    }

    /// Constructs a dictionary whose every word is a possible answer.
    pub fn from_picks<S: AsRef<str>>(picks: &[S]) -> Result<Dictionary, SolverError> {
        Dictionary::new(picks, &[])
    }

    /// The number of possible answers.
    pub fn num_picks(&self) -> usize {
        self.num_picks
    }

    /// The number of guessable words, picks included.
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The possible answers, in load order.
    pub fn picks(&self) -> &[Arc<str>] {
        &self.words[..self.num_picks]
    }

    /// All guessable words: picks first, then decoys.
    pub fn words(&self) -> &[Arc<str>] {
        &self.words
    }

    /// The word at a guess index.
    pub fn word(&self, index: usize) -> &Arc<str> {
        &self.words[index]
    }

    pub fn code(&self, index: usize) -> WordCode {
        self.codes[index]
    }

    pub fn codes(&self) -> &[WordCode] {
        &self.codes
    }

    pub fn pick_codes(&self) -> &[WordCode] {
        &self.codes[..self.num_picks]
    }

    /// Looks up a word's guess index. Indices below
    /// [`num_picks`](Dictionary::num_picks) are picks.
    pub fn index_of(&self, word: &str) -> Option<usize> {
        let code = codec::encode(word).ok()?;
        self.index_by_code.get(&code).copied()
    }

    /// Whether the guess index refers to a possible answer.
    pub fn is_pick(&self, index: usize) -> bool {
        index < self.num_picks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    #[test]
    fn read_word_list_lowercases_and_skips_blanks() -> io::Result<()> {
        let words = read_word_list(Cursor::new("Later\n\nROCKY\n"))?;
        assert_eq!(words, vec!["later".to_string(), "rocky".to_string()]);
        Ok(())
    }

    #[test]
    fn dictionary_orders_picks_before_decoys() -> Result<(), SolverError> {
        let dictionary = Dictionary::new(&["later", "rocky"], &["aahed", "zymic"])?;

        assert_eq!(dictionary.num_picks(), 2);
        assert_eq!(dictionary.num_words(), 4);
        assert_eq!(dictionary.picks().len(), 2);
        assert_eq!(dictionary.word(0).as_ref(), "later");
        assert_eq!(dictionary.word(2).as_ref(), "aahed");
        assert!(dictionary.is_pick(1));
        assert!(!dictionary.is_pick(2));
        Ok(())
    }

    #[test]
    fn dictionary_drops_decoys_that_are_picks() -> Result<(), SolverError> {
        let dictionary = Dictionary::new(&["later", "rocky"], &["rocky", "aahed"])?;

        assert_eq!(dictionary.num_picks(), 2);
        assert_eq!(dictionary.num_words(), 3);
        assert_eq!(dictionary.index_of("rocky"), Some(1));
        Ok(())
    }

    #[test]
    fn dictionary_drops_duplicates_within_a_list() -> Result<(), SolverError> {
        let dictionary = Dictionary::new(&["later", "later", "rocky"], &[])?;

        assert_eq!(dictionary.num_picks(), 2);
        Ok(())
    }

    #[test]
    fn dictionary_rejects_invalid_words() {
        assert_matches!(
            Dictionary::new(&["abc"], &[]),
            Err(SolverError::InvalidWord)
        );
        assert_matches!(
            Dictionary::new(&["later"], &["not-a"]),
            Err(SolverError::InvalidWord)
        );
    }

    #[test]
    fn dictionary_index_of() -> Result<(), SolverError> {
        let dictionary = Dictionary::new(&["later"], &["aahed"])?;

        assert_eq!(dictionary.index_of("later"), Some(0));
        assert_eq!(dictionary.index_of("aahed"), Some(1));
        assert_eq!(dictionary.index_of("rocky"), None);
        assert_eq!(dictionary.index_of("bad!!"), None);
        Ok(())
    }
}
