use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use kana_core::model::{Category, CategoryError};
use services::{Clock, PracticeSession, SessionScores};
use storage::CsvHistoryStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidSeed { raw: String },
    InvalidCount { raw: String },
    InvalidCategory(CategoryError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid seed value: {raw}"),
            ArgsError::InvalidCount { raw } => {
                write!(f, "invalid --count value (expected a positive number): {raw}")
            }
            ArgsError::InvalidCategory(err) => write!(f, "invalid --category value: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  kana-drill [practice] [--data <csv>] [--template <csv>] [--seed <n>]");
    eprintln!("                        [--category <hiragana|katakana>] [--count <n>]");
    eprintln!("  kana-drill report     [--data <csv>] [--template <csv>] [--category <name>]");
    eprintln!("  kana-drill export     [--data <csv>] [--out <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data practice-data.csv");
    eprintln!("  --template data/practice-template.csv");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  KANA_DATA_FILE, KANA_TEMPLATE_FILE, KANA_SEED, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Practice,
    Report,
    Export,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "practice" => Some(Self::Practice),
            "report" => Some(Self::Report),
            "export" => Some(Self::Export),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Args {
    data: PathBuf,
    template: PathBuf,
    seed: Option<u64>,
    category: Option<Category>,
    count: Option<usize>,
    out: Option<PathBuf>,
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut data = std::env::var("KANA_DATA_FILE")
            .map_or_else(|_| PathBuf::from("practice-data.csv"), PathBuf::from);
        let mut template = std::env::var("KANA_TEMPLATE_FILE")
            .map_or_else(|_| PathBuf::from("data/practice-template.csv"), PathBuf::from);
        let mut seed = std::env::var("KANA_SEED").ok().map(parse_seed).transpose()?;
        let mut category = None;
        let mut count = None;
        let mut out = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => data = PathBuf::from(require_value(args, "--data")?),
                "--template" => template = PathBuf::from(require_value(args, "--template")?),
                "--seed" => seed = Some(parse_seed(require_value(args, "--seed")?)?),
                "--category" => {
                    let value = require_value(args, "--category")?;
                    category = Some(
                        value
                            .parse::<Category>()
                            .map_err(ArgsError::InvalidCategory)?,
                    );
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    let parsed = value
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ArgsError::InvalidCount { raw: value.clone() })?;
                    count = Some(parsed);
                }
                "--out" => out = Some(PathBuf::from(require_value(args, "--out")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            data,
            template,
            seed,
            category,
            count,
            out,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1).peekable();

    // Practice is the default when no subcommand is given.
    let first = argv.peek().cloned();
    let cmd = match first.as_deref() {
        None => Command::Practice,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(flag) if flag.starts_with("--") => Command::Practice,
        Some(name) => {
            let cmd = Command::from_arg(name).ok_or_else(|| {
                print_usage();
                ArgsError::UnknownCommand(name.to_string())
            })?;
            argv.next();
            cmd
        }
    };

    let args = Args::parse(&mut argv).inspect_err(|_| print_usage())?;
    init_tracing();

    let store = Arc::new(CsvHistoryStore::new(&args.data).with_template(&args.template));
    match cmd {
        Command::Practice => practice(&args, store),
        Command::Report => report(&args, store),
        Command::Export => export(&args, &store),
    }
}

//
// ─── PRACTICE ──────────────────────────────────────────────────────────────────
//

fn start_session(
    args: &Args,
    store: Arc<CsvHistoryStore>,
) -> Result<PracticeSession, Box<dyn std::error::Error>> {
    let clock = Clock::default_clock();
    let session = match args.seed {
        Some(seed) => PracticeSession::start_seeded(clock, store, seed)?,
        None => PracticeSession::start(clock, store)?,
    };
    Ok(session)
}

/// Next input line, trimmed, or `None` at end of input.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_quit(line: &str) -> bool {
    line.is_empty() || line.eq_ignore_ascii_case("q")
}

fn choose_category(input: &mut impl BufRead) -> io::Result<Option<Category>> {
    loop {
        print!("Practice which set? [hiragana/katakana] ");
        io::stdout().flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if is_quit(&line) {
            return Ok(None);
        }
        match line.parse::<Category>() {
            Ok(category) => return Ok(Some(category)),
            Err(err) => println!("{}", err.to_string().red()),
        }
    }
}

fn practice(args: &Args, store: Arc<CsvHistoryStore>) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = start_session(args, store)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let category = match args.category {
        Some(category) => category,
        None => match choose_category(&mut input)? {
            Some(category) => category,
            None => {
                session.finalize()?;
                return Ok(());
            }
        },
    };

    println!(
        "{}",
        format!("Type the romaji for each {category} character. Empty line or q to stop.")
            .dimmed()
    );

    let mut answered = 0usize;
    while args.count.is_none_or(|max| answered < max) {
        let prompt = session.draw(category)?;
        print!("{}  ", prompt.item.bold());
        io::stdout().flush()?;

        let Some(line) = read_line(&mut input)? else {
            println!();
            break;
        };
        if is_quit(&line) {
            break;
        }

        let outcome = session.answer(&line)?;
        answered += 1;
        if outcome.correct {
            println!("{}", "✔ Correct!".green());
        } else {
            println!(
                "{}",
                format!(
                    "✖ Incorrect! The correct answer is {}.",
                    outcome.prompt.answer
                )
                .red()
            );
        }
        let score = outcome.session_score;
        println!(
            "   {}",
            format!("{}/{} ({:.1}%)", score.correct, score.seen, score.percentage).dimmed()
        );
    }

    let written = session.finalize()?;
    info!(answered, rows = written, "session saved");
    print_scores(&session.session_scores(category));
    Ok(())
}

fn print_scores(scores: &SessionScores) {
    println!();
    println!("{}", format!("{} results", scores.category).bold());
    for (label, score) in scores.labeled() {
        println!(
            "  {label} score: {}/{} ({:.2}%)",
            score.correct, score.seen, score.percentage
        );
    }
}

//
// ─── REPORT / EXPORT ───────────────────────────────────────────────────────────
//

fn report(args: &Args, store: Arc<CsvHistoryStore>) -> Result<(), Box<dyn std::error::Error>> {
    let session = start_session(args, store)?;
    let categories = args
        .category
        .map_or_else(|| Category::ALL.to_vec(), |category| vec![category]);

    for category in categories {
        println!("{}", category.to_string().bold());
        println!(
            "  {:<4} {:<6} {:>6} {:>8} {:>9} {:>8}",
            "Kana", "Romaji", "Seen", "Correct", "Accuracy", "Rate"
        );
        for row in session.item_report(category) {
            let line = format!(
                "  {:<4} {:<6} {:>6} {:>8} {:>8.1}% {:>8.4}",
                row.item,
                row.romaji,
                row.seen,
                row.correct,
                row.accuracy * 100.0,
                row.rate
            );
            if row.seen > 0 && row.accuracy < 0.5 {
                println!("{}", line.yellow());
            } else {
                println!("{line}");
            }
        }
        println!();
    }
    Ok(())
}

fn export(args: &Args, store: &CsvHistoryStore) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = match &args.out {
        Some(path) => {
            let mut file = File::create(path)?;
            let bytes = store.export(&mut file)?;
            info!(path = %path.display(), bytes, "exported practice data");
            bytes
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            store.export(&mut lock)?
        }
    };
    if bytes == 0 {
        info!(path = %store.path().display(), "practice data file is empty");
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
