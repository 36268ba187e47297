use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use kana_core::model::{Category, CounterRecord, kana};
use storage::{CsvHistoryStore, HistoryStore, PracticeRecord};

#[derive(Debug, Clone)]
struct Args {
    out: PathBuf,
    date: NaiveDate,
    force: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDate { raw: String },
    AlreadyExists { path: PathBuf },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDate { raw } => {
                write!(f, "invalid --date value (expected YYYY-MM-DD): {raw}")
            }
            ArgsError::AlreadyExists { path } => {
                write!(f, "{} already exists (pass --force to overwrite)", path.display())
            }
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

const DEFAULT_DATE: (i32, u32, u32) = (2023, 1, 1);

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut out = std::env::var("KANA_TEMPLATE_FILE")
            .map_or_else(|_| PathBuf::from("data/practice-template.csv"), PathBuf::from);
        let (y, m, d) = DEFAULT_DATE;
        let mut date = NaiveDate::from_ymd_opt(y, m, d).ok_or(ArgsError::InvalidDate {
            raw: format!("{y}-{m}-{d}"),
        })?;
        let mut force = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" => out = PathBuf::from(require_value(&mut args, "--out")?),
                "--date" => {
                    let value = require_value(&mut args, "--date")?;
                    date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                        .map_err(|_| ArgsError::InvalidDate { raw: value.clone() })?;
                }
                "--force" => force = true,
                "--help" | "-h" => {
                    eprintln!("Usage: seed [--out <path>] [--date YYYY-MM-DD] [--force]");
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { out, date, force })
    }
}

/// Writes a baseline file with a zero row for every kana, so fresh installs
/// start with the full character set in every category.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse()?;

    if args.out.exists() {
        if !args.force {
            return Err(ArgsError::AlreadyExists { path: args.out }.into());
        }
        std::fs::remove_file(&args.out)?;
    }

    let records: Vec<PracticeRecord> = Category::ALL
        .into_iter()
        .flat_map(|category| {
            kana::items(category).map(move |item| {
                PracticeRecord::new(args.date, category, item, CounterRecord::zero())
            })
        })
        .collect();

    let store = CsvHistoryStore::new(&args.out);
    store.append_records(&records)?;

    println!(
        "Wrote {} baseline rows to {}",
        records.len(),
        args.out.display()
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
