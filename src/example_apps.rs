use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::config::{PoolConfig, QuizConfig, SamplingStrategy};
use crate::constants::quiz::DEFAULT_ITEM_COUNT;
use crate::data::QuestionBank;
use crate::frequency::TopicFrequencyTable;
use crate::quiz::{QuizBuilder, TrueFalseQuiz};
use crate::source::QuestionBankSource;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Retry,
    Redraw,
    Reservoir,
}

impl From<StrategyArg> for SamplingStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Retry => SamplingStrategy::RetryWithFallback,
            StrategyArg::Redraw => SamplingStrategy::RetryWithRedraw,
            StrategyArg::Reservoir => SamplingStrategy::WeightedReservoir,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "quiz_demo",
    disable_help_subcommand = true,
    about = "Build a topic-weighted true/false quiz",
    long_about = "Derive true/false statements from a multiple-choice question bank, weight them by historical topic frequency, and print a sampled quiz.",
    after_help = "Question banks are JSON arrays of questions; frequency tables are JSON objects mapping topic to appearance count."
)]
/// CLI for `quiz_demo`.
///
/// Common usage:
/// - `--bank demos/data/sample_bank.json --frequencies demos/data/topic_frequencies.json`
/// - Add `--seed 7` for a reproducible quiz, `--show-answers` to print the key
struct QuizDemoCli {
    #[arg(long, value_name = "PATH", help = "Question bank JSON file")]
    bank: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        help = "Optional topic frequency JSON file (all topics weigh the same without it)"
    )]
    frequencies: Option<PathBuf>,
    #[arg(long, help = "Category to quiz on (defaults to the first category in the bank)")]
    category: Option<String>,
    #[arg(
        long,
        default_value_t = DEFAULT_ITEM_COUNT,
        value_parser = parse_positive_usize,
        help = "Number of true/false items"
    )]
    count: usize,
    #[arg(long, help = "Optional deterministic seed")]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value = "retry", help = "Sampling algorithm")]
    strategy: StrategyArg,
    #[arg(long = "list-categories", help = "Print bank categories and exit")]
    list_categories: bool,
    #[arg(long = "show-answers", help = "Print the answer key with each item")]
    show_answers: bool,
}

/// Run the quiz demo with CLI-style arguments (program name excluded).
pub fn run_quiz_demo<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<QuizDemoCli, _>(std::iter::once("quiz_demo".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let bank = QuestionBank::from_path(&cli.bank)?;
    let frequencies = match &cli.frequencies {
        Some(path) => TopicFrequencyTable::from_path(path)?,
        None => TopicFrequencyTable::new(),
    };
    let source = QuestionBankSource::new("bank", bank, frequencies, PoolConfig::default())?;

    let mut config = QuizConfig {
        seed: cli.seed,
        item_count: cli.count,
        ..QuizConfig::default()
    };
    config.sampler.strategy = cli.strategy.into();
    let mut builder = QuizBuilder::new(config)?;
    builder.register_source(Box::new(source));

    let categories = builder.categories();
    if cli.list_categories {
        println!("=== categories ===");
        for category in &categories {
            let pool = builder.candidate_pool(category)?;
            println!("{category}\t{} statements", pool.len());
        }
        return Ok(());
    }

    let Some(category) = cli.category.or_else(|| categories.first().cloned()) else {
        println!("Question bank is empty; nothing to quiz on.");
        return Ok(());
    };
    let quiz = builder.build(&category)?;
    print_quiz(&quiz, cli.show_answers);
    Ok(())
}

fn print_quiz(quiz: &TrueFalseQuiz, show_answers: bool) {
    println!("=== {} ({} items) ===", quiz.category, quiz.len());
    if quiz.is_empty() {
        println!("Not enough question data for this category.");
        return;
    }
    for (idx, item) in quiz.items.iter().enumerate() {
        if show_answers {
            let mark = if item.answer { "○" } else { "×" };
            println!("[{}] {} {}", idx + 1, mark, item.statement);
            println!("    topic: {} | weight: {:.2}", item.topic, item.topic_weight);
        } else {
            println!("[{}] {}", idx + 1, item.statement);
        }
    }
    if let Some(skew) = quiz.topic_skew() {
        println!("--- topic mix ---");
        for entry in &skew.per_topic {
            println!(
                "{}: {} ({:.0}%)",
                entry.topic,
                entry.count,
                entry.share * 100.0
            );
        }
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --count value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--count must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
