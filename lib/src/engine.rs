use crate::data::Dictionary;
use crate::filter::ConstraintSet;
use crate::partitions::{BoardPartitions, ClueTable};
use crate::ranker::{self, GuessRanking, RankOptions};
use crate::results::SolverError;
use std::sync::Arc;

/// One evaluation context: a dictionary, the precomputed clue table, and one
/// board's clue history distilled into an active candidate set.
///
/// All state lives here; there is no process-wide context, so independent
/// engines coexist freely. The clue table is the expensive part, and it is
/// built in steps: call [`advance`](Engine::advance) from whatever scheduling
/// mechanism the caller has (or [`build_all`](Engine::build_all) to block
/// through it), then [`share`](Engine::share) to open further boards over the
/// same table for free.
#[derive(Debug)]
pub struct Engine {
    dictionary: Arc<Dictionary>,
    table: Arc<ClueTable>,
    board: Option<BoardPartitions>,
    candidates: Vec<usize>,
}

impl Engine {
    /// Creates an engine with an unbuilt clue table. Queries are unavailable
    /// until construction finishes.
    pub fn new(dictionary: Arc<Dictionary>) -> Engine {
        let table = ClueTable::new(&dictionary);
        let board = BoardPartitions::new(&table).ok();
        let candidates = (0..dictionary.num_picks()).collect();
        Engine {
            dictionary,
            table: Arc::new(table),
            board,
            candidates,
        }
    }

    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// Builds up to `row_budget` more clue-table rows and returns the new
    /// progress fraction. A no-op returning 1.0 once the table is complete.
    pub fn advance(&mut self, row_budget: usize) -> f64 {
        // The table is only ever shared once complete, so exclusive access
        // can fail only when there is nothing left to build.
        let Some(table) = Arc::get_mut(&mut self.table) else {
            return self.table.progress();
        };
        let progress = table.advance(&self.dictionary, row_budget);
        if table.is_complete() && self.board.is_none() {
            self.board = BoardPartitions::new(table).ok();
        }
        progress
    }

    /// The clue-table row budget that splits construction into roughly ten
    /// steps; the chunk size [`build_all`](Engine::build_all) uses.
    pub fn default_row_budget(&self) -> usize {
        self.table.default_row_budget()
    }

    /// Builds the clue table to completion in default-sized steps.
    pub fn build_all(&mut self) {
        let row_budget = self.default_row_budget();
        while !self.is_ready() {
            self.advance(row_budget);
        }
    }

    /// The clue-table build progress, in [0, 1].
    pub fn progress(&self) -> f64 {
        self.table.progress()
    }

    /// Whether the engine is ready to rank guesses.
    pub fn is_ready(&self) -> bool {
        self.board.is_some()
    }

    /// Replaces this board's clue history and returns the number of answers
    /// still possible. The history is applied as a whole, so earlier calls
    /// don't accumulate. Contradictory clues leave zero candidates; that is a
    /// normal outcome, not an error. Fails with
    /// [`SolverError::UninitializedEngine`] while the clue table is still
    /// being built.
    pub fn apply_history(&mut self, history: &str) -> Result<usize, SolverError> {
        let board = self.board.as_mut().ok_or(SolverError::UninitializedEngine)?;
        let constraints = ConstraintSet::from_history(history)?;
        self.candidates = constraints.matching_indices(self.dictionary.picks());
        board.apply_active_set(&self.table, &self.candidates);
        Ok(self.candidates.len())
    }

    /// The answers consistent with the applied history, in dictionary order.
    pub fn candidates(&self) -> Vec<Arc<str>> {
        self.candidates
            .iter()
            .map(|pick| Arc::clone(self.dictionary.word(*pick)))
            .collect()
    }

    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Ranks guesses for this board. Fails with
    /// [`SolverError::UninitializedEngine`] while the clue table is still
    /// being built.
    pub fn rank(&self, options: &RankOptions) -> Result<Vec<GuessRanking>, SolverError> {
        let board = self.board.as_ref().ok_or(SolverError::UninitializedEngine)?;
        Ok(ranker::rank_board(
            &self.dictionary,
            board,
            &self.candidates,
            options,
        ))
    }

    /// Opens another board over the same dictionary and clue table, with an
    /// empty history. Fails with [`SolverError::UninitializedEngine`] while
    /// the table is still being built.
    pub fn share(&self) -> Result<Engine, SolverError> {
        let board = BoardPartitions::new(&self.table)?;
        Ok(Engine {
            dictionary: Arc::clone(&self.dictionary),
            table: Arc::clone(&self.table),
            board: Some(board),
            candidates: (0..self.dictionary.num_picks()).collect(),
        })
    }
}

/// Ranks guesses across several simultaneous boards. Each board contributes
/// its own ranking; a word suggested by several boards appears once with its
/// best statistics and a comma-joined list of board numbers.
///
/// The boards are expected to share a dictionary (use
/// [`share`](Engine::share)); words are merged by text, so engines over
/// different dictionaries merge on whatever words they have in common.
pub fn rank_boards(
    engines: &[&Engine],
    options: &RankOptions,
) -> Result<Vec<GuessRanking>, SolverError> {
    let per_board = engines
        .iter()
        .map(|engine| engine.rank(options))
        .collect::<Result<Vec<Vec<GuessRanking>>, SolverError>>()?;
    Ok(ranker::merge_boards(per_board, &options.sort))
}
