use crate::data::Dictionary;
use crate::partitions::BoardPartitions;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// A sortable statistic of a ranked guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortKey {
    /// `active answers / group count`: the expected size of the group the
    /// true answer lands in. Lower is a more informative guess.
    AvgGroupSize,
    /// The worst-case group size. Lower bounds the damage of an unlucky clue.
    MaxGroupSize,
    /// The word text itself.
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// An ordered list of sort keys with a direction per key. The first key is
/// the primary sort; later keys break ties, and the dictionary index breaks
/// any remaining tie so that output order is always deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortSpec {
    keys: Vec<(SortKey, SortDirection)>,
}

impl SortSpec {
    pub fn new(keys: Vec<(SortKey, SortDirection)>) -> SortSpec {
        SortSpec { keys }
    }

    /// Moves the given key to the front, keeping the relative order of the
    /// rest. A key that was not configured is added ascending.
    pub fn with_primary(mut self, key: SortKey) -> SortSpec {
        let direction = match self.keys.iter().position(|(other, _)| *other == key) {
            Some(index) => self.keys.remove(index).1,
            None => SortDirection::Ascending,
        };
        self.keys.insert(0, (key, direction));
        self
    }

    pub fn compare(&self, a: &GuessRanking, b: &GuessRanking) -> Ordering {
        for (key, direction) in &self.keys {
            let ordering = match key {
                SortKey::AvgGroupSize => a.avg_group_size.total_cmp(&b.avg_group_size),
                SortKey::MaxGroupSize => a.max_group_size.cmp(&b.max_group_size),
                SortKey::Word => a.word.cmp(&b.word),
            };
            let ordering = match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.word_index.cmp(&b.word_index)
    }
}

impl Default for SortSpec {
    fn default() -> SortSpec {
        SortSpec::new(vec![
            (SortKey::AvgGroupSize, SortDirection::Ascending),
            (SortKey::MaxGroupSize, SortDirection::Ascending),
        ])
    }
}

/// One row of the ranked output, ready for direct rendering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuessRanking {
    pub word: Arc<str>,
    /// The word's dictionary guess index.
    pub word_index: usize,
    /// `active answers / group count`; infinite when the guess produces no
    /// groups at all (an empty active set).
    pub avg_group_size: f64,
    pub max_group_size: u32,
    pub group_count: u32,
    /// In simultaneous-board mode, the ascending comma-joined board numbers
    /// that produced this word. Empty for a single board.
    pub boards: String,
}

/// Options for ranking guesses.
#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    pub sort: SortSpec,
    /// The most non-candidate words the fallback may add when no candidate
    /// partitions the active answers perfectly. Zero disables the fallback.
    pub extra_word_cap: usize,
}

impl Default for RankOptions {
    fn default() -> RankOptions {
        RankOptions {
            sort: SortSpec::default(),
            extra_word_cap: 10,
        }
    }
}

fn ranking_for(
    dictionary: &Dictionary,
    partitions: &BoardPartitions,
    guess: usize,
) -> GuessRanking {
    let stats = partitions.stats(guess);
    let avg_group_size = if stats.group_count() == 0 {
        f64::INFINITY
    } else {
        partitions.num_active() as f64 / stats.group_count() as f64
    };
    GuessRanking {
        word: Arc::clone(dictionary.word(guess)),
        word_index: guess,
        avg_group_size,
        max_group_size: stats.max_group_size(),
        group_count: stats.group_count(),
        boards: String::new(),
    }
}

/// Ranks one board's candidate guesses, applying the non-candidate fallback
/// when no candidate achieves a perfect one-answer-per-group partition.
pub(crate) fn rank_board(
    dictionary: &Dictionary,
    partitions: &BoardPartitions,
    candidates: &[usize],
    options: &RankOptions,
) -> Vec<GuessRanking> {
    let mut rankings: Vec<GuessRanking> = candidates
        .iter()
        .map(|pick| ranking_for(dictionary, partitions, *pick))
        .collect();

    let any_perfect = rankings.iter().any(|ranking| ranking.max_group_size <= 1);
    if !any_perfect && partitions.num_active() > 1 && options.extra_word_cap > 0 {
        let best_group_count = rankings
            .iter()
            .map(|ranking| ranking.group_count)
            .max()
            .unwrap_or(0);
        let best_max_group = rankings
            .iter()
            .map(|ranking| ranking.max_group_size)
            .min()
            .unwrap_or(u32::MAX);
        let mut is_candidate = vec![false; dictionary.num_words()];
        for pick in candidates {
            is_candidate[*pick] = true;
        }
        let mut extras: Vec<usize> = (0..dictionary.num_words())
            .filter(|guess| !is_candidate[*guess])
            .filter(|guess| {
                let stats = partitions.stats(*guess);
                stats.group_count() > best_group_count || stats.max_group_size() < best_max_group
            })
            .collect();
        // Unlikely-but-possible answers make better fallback guesses than
        // pure decoys; within each role, dictionary order keeps ties stable.
        extras.sort_by_key(|guess| (!dictionary.is_pick(*guess), *guess));
        extras.truncate(options.extra_word_cap);
        rankings.extend(
            extras
                .iter()
                .map(|guess| ranking_for(dictionary, partitions, *guess)),
        );
    }

    rankings.sort_by(|a, b| options.sort.compare(a, b));
    rankings
}

/// Merges per-board rankings for simultaneous-board mode. A word produced by
/// several boards appears once, keeps its best statistics under the sort
/// spec, and is tagged with every producing board number (1-based,
/// ascending, comma-joined).
pub(crate) fn merge_boards(
    per_board: Vec<Vec<GuessRanking>>,
    sort: &SortSpec,
) -> Vec<GuessRanking> {
    let mut merged: Vec<GuessRanking> = Vec::new();
    let mut boards_of: Vec<Vec<usize>> = Vec::new();
    let mut slot_by_word: HashMap<Arc<str>, usize> = HashMap::new();
    for (board, rankings) in per_board.into_iter().enumerate() {
        let board_number = board + 1;
        for ranking in rankings {
            match slot_by_word.entry(Arc::clone(&ranking.word)) {
                Entry::Occupied(entry) => {
                    let slot = *entry.get();
                    if !boards_of[slot].contains(&board_number) {
                        boards_of[slot].push(board_number);
                    }
                    if sort.compare(&ranking, &merged[slot]) == Ordering::Less {
                        merged[slot] = ranking;
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(merged.len());
                    boards_of.push(vec![board_number]);
                    merged.push(ranking);
                }
            }
        }
    }
    for (ranking, mut boards) in merged.iter_mut().zip(boards_of.into_iter()) {
        boards.sort_unstable();
        ranking.boards = boards
            .iter()
            .map(|number| number.to_string())
            .collect::<Vec<String>>()
            .join(",");
    }
    merged.sort_by(|a, b| sort.compare(a, b));
    merged
}
