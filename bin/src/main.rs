use clap::{Parser, Subcommand};
use rs_clue_rank::*;
use std::fs::File;
use std::io;
use std::sync::Arc;
use std::time::Instant;

/// Ranks Wordle guesses against a word list, given the clues seen so far.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to a file of possible answers, with one word on each line.
    #[clap(short = 'f', long)]
    picks_file: String,

    /// Path to an optional file of words that are guessable but can never be
    /// the answer.
    #[clap(short = 'd', long)]
    decoys_file: Option<String>,

    /// The most guesses to print per ranking.
    #[clap(short = 'n', long, default_value_t = 10)]
    limit: usize,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank guesses for one clue history, e.g. "L-A-T-E-R?_G-I-R?L-Y=".
    Suggest { history: String },
    /// Enter clue rows one guess at a time, with suggestions after each.
    Interactive,
}

fn main() -> io::Result<()> {
    let start_time = Instant::now();
    let args = Args::parse();

    let picks = read_word_list(io::BufReader::new(File::open(&args.picks_file)?))?;
    let decoys = match &args.decoys_file {
        Some(path) => read_word_list(io::BufReader::new(File::open(path)?))?,
        None => Vec::new(),
    };
    let dictionary = Dictionary::new(&picks, &decoys).map_err(invalid_input)?;
    println!(
        "{} possible answers, {} guessable words.",
        dictionary.num_picks(),
        dictionary.num_words()
    );

    let mut engine = Engine::new(Arc::new(dictionary));
    while !engine.is_ready() {
        let progress = engine.advance(engine.default_row_budget());
        println!("Building the clue table: {:3.0}%", progress * 100.0);
    }

    match args.command {
        Command::Suggest { history } => {
            suggest(&mut engine, &history, args.limit).map_err(invalid_input)?
        }
        Command::Interactive => play_interactive(&mut engine, args.limit)?,
    }

    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn invalid_input(error: SolverError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error.to_string())
}

fn suggest(engine: &mut Engine, history: &str, limit: usize) -> Result<(), SolverError> {
    let remaining = engine.apply_history(history)?;
    println!("{} answers remain possible.", remaining);
    print_rankings(&engine.rank(&RankOptions::default())?, limit);
    Ok(())
}

fn play_interactive(engine: &mut Engine, limit: usize) -> io::Result<()> {
    println!(
        "Enter one clue row after each guess, as letter/marker pairs:\n\n\
           * '-' = this letter is not in the word\n\
           * '?' = this letter is in the word, but not in this location\n\
           * '=' = this letter is in the word and in the right location.\n\n\
         For example, if the answer was \"rocky\" and you guessed \"slate\", you would\n\
         enter \"S-L-A-T-E-\". Press enter on an empty line to stop."
    );

    let mut history = String::new();
    loop {
        print_rankings(
            &engine.rank(&RankOptions::default()).map_err(invalid_input)?,
            limit,
        );

        let mut buffer = String::new();
        io::stdin().read_line(&mut buffer)?;
        let row = buffer.trim();
        if row.is_empty() {
            return Ok(());
        }

        let previous_len = history.len();
        if !history.is_empty() {
            history.push('_');
        }
        history.push_str(row);
        match engine.apply_history(&history) {
            Ok(0) => {
                println!("No answers remain; one of the entered clue rows must be wrong.");
                return Ok(());
            }
            Ok(1) => {
                println!("The answer is \"{}\".", engine.candidates()[0]);
                return Ok(());
            }
            Ok(remaining) => println!("{} answers remain possible.", remaining),
            Err(error) => {
                println!("{}. Try again.", error);
                history.truncate(previous_len);
            }
        }
    }
}

fn print_rankings(rankings: &[GuessRanking], limit: usize) {
    if rankings.is_empty() {
        println!("No guesses to suggest.");
        return;
    }
    println!("|Guess|Avg group|Max group|Groups|");
    println!("|-----|---------|---------|------|");
    for ranking in rankings.iter().take(limit) {
        println!(
            "|{}|{:.2}|{}|{}|",
            ranking.word, ranking.avg_group_size, ranking.max_group_size, ranking.group_count
        );
    }
}
