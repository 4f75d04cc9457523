use crate::data::Dictionary;
use crate::results::{clue_of, CluePattern, SolverError};
use rayon::prelude::*;

/// How the currently-active answers split into clue-equivalence groups for
/// one guess: a histogram of answers by clue pattern, plus the two derived
/// scalars the ranker consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionStats {
    buckets: Vec<u32>,
    group_count: u32,
    max_group_size: u32,
}

impl PartitionStats {
    fn empty() -> PartitionStats {
        PartitionStats {
            buckets: vec![0; CluePattern::NUM_VALUES],
            group_count: 0,
            max_group_size: 0,
        }
    }

    fn from_row(row: &[CluePattern]) -> PartitionStats {
        let mut stats = PartitionStats::empty();
        for pattern in row {
            let bucket = &mut stats.buckets[pattern.as_index()];
            if *bucket == 0 {
                stats.group_count += 1;
            }
            *bucket += 1;
            if *bucket > stats.max_group_size {
                stats.max_group_size = *bucket;
            }
        }
        stats
    }

    /// The number of non-empty clue groups.
    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    /// The number of active answers in the largest clue group.
    pub fn max_group_size(&self) -> u32 {
        self.max_group_size
    }

    /// The number of active answers that would produce the given pattern.
    pub fn count_for(&self, pattern: CluePattern) -> u32 {
        self.buckets[pattern.as_index()]
    }
}

/// The precomputed clue pattern of every guessable word against every pick,
/// with per-guess seed statistics over the full pick set.
///
/// Construction is O(words × picks) clue computations, so it is chunked:
/// each [`advance`](ClueTable::advance) call fills a bounded number of guess
/// rows and reports fractional progress, and the caller re-invokes from
/// whatever scheduling mechanism it has until progress reaches 1. Within a
/// chunk the rows are filled in parallel; the chunk boundary is the only
/// suspension point. The table is immutable once complete.
#[derive(Debug)]
pub struct ClueTable {
    patterns: Vec<CluePattern>,
    seed_stats: Vec<PartitionStats>,
    num_picks: usize,
    num_rows: usize,
    rows_done: usize,
}

impl ClueTable {
    /// Creates an unbuilt table for the given dictionary. A dictionary with
    /// no picks has nothing to compute and starts complete.
    pub fn new(dictionary: &Dictionary) -> ClueTable {
        let num_picks = dictionary.num_picks();
        let num_rows = dictionary.num_words();
        if num_picks == 0 {
            return ClueTable {
                patterns: Vec::new(),
                seed_stats: vec![PartitionStats::empty(); num_rows],
                num_picks,
                num_rows,
                rows_done: num_rows,
            };
        }
        ClueTable {
            patterns: vec![CluePattern::default(); num_rows * num_picks],
            seed_stats: Vec::with_capacity(num_rows),
            num_picks,
            num_rows,
            rows_done: 0,
        }
    }

    /// A chunk size that splits construction into roughly ten steps.
    pub fn default_row_budget(&self) -> usize {
        (self.num_rows / 10).max(1)
    }

    /// Fills up to `row_budget` more guess rows and returns the new progress
    /// fraction. Calling after completion is a no-op returning 1.0. The
    /// dictionary must be the one the table was created for.
    pub fn advance(&mut self, dictionary: &Dictionary, row_budget: usize) -> f64 {
        if self.is_complete() {
            return 1.0;
        }
        let end = (self.rows_done + row_budget.max(1)).min(self.num_rows);
        let pick_codes = dictionary.pick_codes();
        let chunk_stats: Vec<PartitionStats> = self.patterns
            [self.rows_done * self.num_picks..end * self.num_picks]
            .par_chunks_mut(self.num_picks)
            .zip(dictionary.codes()[self.rows_done..end].par_iter())
            .map(|(row, guess_code)| {
                for (cell, pick_code) in row.iter_mut().zip(pick_codes.iter()) {
                    *cell = clue_of(*guess_code, *pick_code);
                }
                PartitionStats::from_row(row)
            })
            .collect();
        self.seed_stats.extend(chunk_stats);
        self.rows_done = end;
        self.progress()
    }

    /// The fraction of guess rows computed so far, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.num_rows == 0 {
            return 1.0;
        }
        self.rows_done as f64 / self.num_rows as f64
    }

    pub fn is_complete(&self) -> bool {
        self.rows_done == self.num_rows
    }

    pub fn num_picks(&self) -> usize {
        self.num_picks
    }

    pub fn num_guesses(&self) -> usize {
        self.num_rows
    }

    /// The cached clue pattern for a guess/pick index pair. The guess row
    /// must already be built.
    pub fn pattern(&self, guess: usize, pick: usize) -> CluePattern {
        self.patterns[guess * self.num_picks + pick]
    }

    fn row(&self, guess: usize) -> &[CluePattern] {
        &self.patterns[guess * self.num_picks..(guess + 1) * self.num_picks]
    }

    fn seed_stats(&self) -> &[PartitionStats] {
        &self.seed_stats
    }
}

/// Per-guess partition statistics for one evaluation context (one board),
/// kept in step with that board's active answer set.
///
/// Membership flags over the pick index space are double-buffered, so each
/// [`apply_active_set`](BoardPartitions::apply_active_set) only touches the
/// picks whose membership actually changed. The expensive clue computations
/// are never repeated; only bucket bookkeeping remains.
#[derive(Debug)]
pub struct BoardPartitions {
    stats: Vec<PartitionStats>,
    current: Vec<bool>,
    previous: Vec<bool>,
    num_active: usize,
}

impl BoardPartitions {
    /// Creates statistics seeded with every pick active. Fails with
    /// [`SolverError::UninitializedEngine`] while the table is still being
    /// built.
    pub fn new(table: &ClueTable) -> Result<BoardPartitions, SolverError> {
        if !table.is_complete() {
            return Err(SolverError::UninitializedEngine);
        }
        Ok(BoardPartitions {
            stats: table.seed_stats().to_vec(),
            current: vec![true; table.num_picks()],
            previous: vec![false; table.num_picks()],
            num_active: table.num_picks(),
        })
    }

    /// Replaces the active answer set and adjusts every guess's statistics by
    /// the membership delta. Equivalent to rebuilding the histograms from
    /// scratch over `active`, and a no-op when `active` matches the current
    /// set. Pick indices outside the table are ignored.
    pub fn apply_active_set(&mut self, table: &ClueTable, active: &[usize]) {
        std::mem::swap(&mut self.current, &mut self.previous);
        self.current.fill(false);
        for pick in active {
            if let Some(flag) = self.current.get_mut(*pick) {
                *flag = true;
            }
        }
        self.num_active = self.current.iter().filter(|flag| **flag).count();

        let changed: Vec<(usize, i32)> = self
            .current
            .iter()
            .zip(self.previous.iter())
            .enumerate()
            .filter_map(|(pick, (now, before))| match (now, before) {
                (true, false) => Some((pick, 1)),
                (false, true) => Some((pick, -1)),
                _ => None,
            })
            .collect();
        if changed.is_empty() {
            return;
        }

        let current = &self.current;
        self.stats
            .par_iter_mut()
            .enumerate()
            .for_each(|(guess, stats)| {
                let row = table.row(guess);
                for (pick, delta) in &changed {
                    let bucket = &mut stats.buckets[row[*pick].as_index()];
                    if *delta > 0 {
                        if *bucket == 0 {
                            stats.group_count += 1;
                        }
                        *bucket += 1;
                    } else {
                        *bucket -= 1;
                        if *bucket == 0 {
                            stats.group_count -= 1;
                        }
                    }
                }
                let mut max_group_size = 0;
                for (pick, flag) in current.iter().enumerate() {
                    if *flag {
                        let count = stats.buckets[row[pick].as_index()];
                        if count > max_group_size {
                            max_group_size = count;
                        }
                    }
                }
                stats.max_group_size = max_group_size;
            });
    }

    /// The statistics for a guess index.
    pub fn stats(&self, guess: usize) -> &PartitionStats {
        &self.stats[guess]
    }

    /// The number of currently-active answers.
    pub fn num_active(&self) -> usize {
        self.num_active
    }

    pub fn is_active(&self, pick: usize) -> bool {
        self.current.get(pick).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn build_table(picks: &[&str], decoys: &[&str]) -> (Dictionary, ClueTable) {
        let dictionary = Dictionary::new(picks, decoys).unwrap();
        let mut table = ClueTable::new(&dictionary);
        while !table.is_complete() {
            table.advance(&dictionary, 1);
        }
        (dictionary, table)
    }

    #[test]
    fn advance_reports_fractional_progress() {
        let dictionary = Dictionary::new(&["crane", "slate", "rocky", "later"], &[]).unwrap();
        let mut table = ClueTable::new(&dictionary);

        assert_eq!(table.progress(), 0.0);
        assert_eq!(table.advance(&dictionary, 1), 0.25);
        assert_eq!(table.advance(&dictionary, 2), 0.75);
        assert_eq!(table.advance(&dictionary, 2), 1.0);
        assert!(table.is_complete());
    }

    #[test]
    fn advance_after_completion_is_a_no_op() {
        let (dictionary, mut table) = build_table(&["crane", "slate"], &[]);

        assert_eq!(table.advance(&dictionary, 1), 1.0);
        assert_eq!(table.advance(&dictionary, 100), 1.0);
    }

    #[test]
    fn empty_dictionary_is_immediately_complete() {
        let dictionary = Dictionary::new::<&str>(&[], &[]).unwrap();
        let table = ClueTable::new(&dictionary);

        assert_eq!(table.progress(), 1.0);
        assert!(table.is_complete());
    }

    #[test]
    fn table_patterns_match_direct_clue_computation() {
        let (dictionary, table) = build_table(&["crane", "slate", "rocky"], &["aahed"]);

        for guess in 0..dictionary.num_words() {
            for pick in 0..dictionary.num_picks() {
                assert_eq!(
                    table.pattern(guess, pick),
                    clue_of(dictionary.code(guess), dictionary.code(pick)),
                );
            }
        }
    }

    #[test]
    fn seed_stats_cover_the_full_pick_set() {
        let (dictionary, table) = build_table(&["crane", "crate", "slate"], &[]);
        let partitions = BoardPartitions::new(&table).unwrap();

        assert_eq!(partitions.num_active(), 3);
        // Guessing "crane" splits {crane, crate, slate} into three distinct
        // patterns.
        let crane = dictionary.index_of("crane").unwrap();
        assert_eq!(partitions.stats(crane).group_count(), 3);
        assert_eq!(partitions.stats(crane).max_group_size(), 1);
    }

    #[test]
    fn board_partitions_requires_a_complete_table() {
        let dictionary = Dictionary::new(&["crane", "slate"], &[]).unwrap();
        let mut table = ClueTable::new(&dictionary);
        table.advance(&dictionary, 1);

        assert_matches!(
            BoardPartitions::new(&table),
            Err(SolverError::UninitializedEngine)
        );
    }

    #[test]
    fn apply_active_set_matches_scratch_rebuild() {
        let (dictionary, table) = build_table(
            &["crane", "crate", "slate", "rocky", "later", "spade"],
            &["aahed", "zymic"],
        );
        let mut partitions = BoardPartitions::new(&table).unwrap();

        for active in [
            vec![0, 1, 2, 3, 4, 5],
            vec![1, 2, 4],
            vec![2],
            vec![0, 3, 5],
            vec![],
            vec![0, 1, 2, 3, 4, 5],
        ] {
            partitions.apply_active_set(&table, &active);
            for guess in 0..dictionary.num_words() {
                let expected = scratch_stats(&table, guess, &active);
                assert_eq!(partitions.stats(guess), &expected, "guess {}", guess);
            }
        }
    }

    #[test]
    fn apply_active_set_twice_is_idempotent() {
        let (_, table) = build_table(&["crane", "crate", "slate", "rocky"], &[]);
        let mut partitions = BoardPartitions::new(&table).unwrap();

        partitions.apply_active_set(&table, &[0, 2]);
        let stats_after_first: Vec<PartitionStats> =
            (0..table.num_guesses()).map(|g| partitions.stats(g).clone()).collect();

        partitions.apply_active_set(&table, &[0, 2]);
        for (guess, expected) in stats_after_first.iter().enumerate() {
            assert_eq!(partitions.stats(guess), expected);
        }
        assert_eq!(partitions.num_active(), 2);
    }

    #[test]
    fn apply_active_set_ignores_out_of_range_picks() {
        let (_, table) = build_table(&["crane", "slate"], &[]);
        let mut partitions = BoardPartitions::new(&table).unwrap();

        partitions.apply_active_set(&table, &[0, 17]);
        assert_eq!(partitions.num_active(), 1);
        assert!(partitions.is_active(0));
        assert!(!partitions.is_active(1));
    }

    fn scratch_stats(table: &ClueTable, guess: usize, active: &[usize]) -> PartitionStats {
        let mut stats = PartitionStats::empty();
        for pick in active {
            let bucket = &mut stats.buckets[table.pattern(guess, *pick).as_index()];
            if *bucket == 0 {
                stats.group_count += 1;
            }
            *bucket += 1;
            if *bucket > stats.max_group_size {
                stats.max_group_size = *bucket;
            }
        }
        stats
    }
}
