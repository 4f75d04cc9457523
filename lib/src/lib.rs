//! Evaluates and ranks guesses for Wordle-style games.
//!
//! Words are parsed from simple line-based lists into a [`Dictionary`], clue
//! feedback is expressed as compact history strings (`"S-L-A-T-E-"` for one
//! all-wrong guess of "slate"), and an [`Engine`] turns a history into the
//! set of still-possible answers plus a ranking of every guess by how finely
//! it partitions that set.
//!
//! ```
//! use rs_clue_rank::{Dictionary, Engine, RankOptions};
//! use std::sync::Arc;
//!
//! let dictionary = Arc::new(Dictionary::from_picks(&["later", "rocky", "corny"]).unwrap());
//! let mut engine = Engine::new(dictionary);
//! engine.build_all();
//!
//! engine.apply_history("S-L-A-T-E-").unwrap();
//! let rankings = engine.rank(&RankOptions::default()).unwrap();
//! assert_eq!(rankings.len(), 2);
//! assert_eq!(rankings[0].word.as_ref(), "rocky");
//! ```
//!
//! The clue table behind the ranking is the only expensive piece. It builds
//! in bounded steps ([`Engine::advance`]) so interactive callers can show
//! progress, and completed engines [`share`](Engine::share) it when solving
//! several boards at once.

mod codec;
mod data;
mod engine;
mod filter;
mod partitions;
mod ranker;
mod results;

pub use codec::{decode, encode, WordCode, WORD_LEN};
pub use data::{read_word_list, Dictionary};
pub use engine::{rank_boards, Engine};
pub use filter::{filter_words, ConstraintSet};
pub use partitions::{BoardPartitions, ClueTable, PartitionStats};
pub use ranker::{GuessRanking, RankOptions, SortDirection, SortKey, SortSpec};
pub use results::{
    clue_of, parse_history, ClueRow, CluePattern, LetterResult, SolverError,
};
