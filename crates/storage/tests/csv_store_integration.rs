use std::fs;

use chrono::NaiveDate;
use kana_core::model::{Aggregate, Category, CounterRecord};
use kana_core::time::fixed_clock;
use storage::{CsvHistoryStore, HistoryStore, PracticeRecord, StorageError};

const HEADER_LINE: &str = "Date,Kana Type,Kana,Seen,Correct,Accuracy";

fn counter(seen: u32, correct: u32) -> CounterRecord {
    CounterRecord::new(seen, correct).unwrap()
}

fn session(answers: &[(Category, &str, bool)]) -> Aggregate {
    let mut aggregate = Aggregate::new();
    for (category, item, correct) in answers {
        aggregate.record_answer(*category, item, *correct);
    }
    aggregate
}

#[test]
fn load_creates_missing_store_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("practice.csv");
    let store = CsvHistoryStore::new(&path);

    let aggregate = store.load().expect("load");

    assert!(aggregate.is_untouched());
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim_end(), HEADER_LINE);
}

#[test]
fn save_then_fresh_load_sums_counters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practice.csv");
    let date = fixed_clock().today();

    let store = CsvHistoryStore::new(&path);
    store
        .append_records(&[PracticeRecord::new(
            date,
            Category::Hiragana,
            "あ",
            counter(4, 3),
        )])
        .unwrap();
    let before = store.load().unwrap();

    let answers = session(&[
        (Category::Hiragana, "あ", true),
        (Category::Hiragana, "あ", false),
        (Category::Katakana, "ン", true),
    ]);
    let written = store.save(&answers, date).unwrap();
    assert_eq!(written, 2);

    let after = CsvHistoryStore::new(&path).load().unwrap();

    assert_eq!(after, before.combined(&answers));
    assert_eq!(after.get(Category::Hiragana, "あ"), Some(counter(6, 4)));
    assert_eq!(after.get(Category::Katakana, "ン"), Some(counter(1, 1)));
}

#[test]
fn saved_rows_use_date_and_two_decimal_accuracy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practice.csv");
    let store = CsvHistoryStore::new(&path);
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

    let answers = session(&[
        (Category::Katakana, "シ", true),
        (Category::Katakana, "シ", false),
        (Category::Katakana, "シ", false),
    ]);
    store.save(&answers, date).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec![HEADER_LINE, "2024-03-09,Katakana,シ,3,1,0.33"]);
}

#[test]
fn finalizing_nothing_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practice.csv");
    let store = CsvHistoryStore::new(&path);
    store
        .save(
            &session(&[(Category::Hiragana, "か", true)]),
            fixed_clock().today(),
        )
        .unwrap();
    let before = fs::read(&path).unwrap();

    let mut untouched = Aggregate::new();
    untouched.seed_items(Category::Hiragana, ["か", "き"]);
    let written = store.save(&untouched, fixed_clock().today()).unwrap();

    assert_eq!(written, 0);
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn template_rows_are_merged_into_every_load() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.csv");
    fs::write(
        &template,
        format!("{HEADER_LINE}\n2023-01-01,Hiragana,あ,0,0,0.00\n2023-01-01,Hiragana,い,2,2,1.00\n"),
    )
    .unwrap();
    let path = dir.path().join("practice.csv");
    let store = CsvHistoryStore::new(&path).with_template(&template);

    store
        .save(
            &session(&[(Category::Hiragana, "い", false)]),
            fixed_clock().today(),
        )
        .unwrap();
    let aggregate = store.load().unwrap();

    assert_eq!(aggregate.get(Category::Hiragana, "あ"), Some(counter(0, 0)));
    assert_eq!(aggregate.get(Category::Hiragana, "い"), Some(counter(3, 2)));
    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("2023-01-01"), "template rows must not be copied");
}

#[test]
fn missing_template_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvHistoryStore::new(dir.path().join("practice.csv"))
        .with_template(dir.path().join("absent.csv"));
    assert!(store.load().unwrap().is_untouched());
}

#[test]
fn corrupt_rows_surface_as_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practice.csv");

    fs::write(&path, format!("{HEADER_LINE}\n2024-01-01,Hiragana,あ,1\n")).unwrap();
    let err = CsvHistoryStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StorageError::Csv(_)), "{err:?}");

    fs::write(&path, format!("{HEADER_LINE}\n2024-01-01,Kanji,日,1,1,1.00\n")).unwrap();
    let err = CsvHistoryStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { line: 2, .. }), "{err:?}");

    fs::write(&path, format!("{HEADER_LINE}\n2024-01-01,Hiragana,あ,1,5,5.00\n")).unwrap();
    let err = CsvHistoryStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { line: 2, .. }), "{err:?}");
}

#[test]
fn empty_data_file_gets_header_before_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practice.csv");
    fs::write(&path, "").unwrap();
    let store = CsvHistoryStore::new(&path);

    assert!(store.load().unwrap().is_untouched());
    let written = store
        .save(
            &session(&[
                (Category::Hiragana, "あ", true),
                (Category::Hiragana, "い", false),
            ]),
            fixed_clock().today(),
        )
        .unwrap();
    assert_eq!(written, 2);

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().next(), Some(HEADER_LINE));
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.get(Category::Hiragana, "あ"), Some(counter(1, 1)));
    assert_eq!(reloaded.get(Category::Hiragana, "い"), Some(counter(1, 0)));
}

#[test]
fn saving_into_empty_file_writes_header_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practice.csv");
    fs::write(&path, "").unwrap();
    let store = CsvHistoryStore::new(&path);

    store
        .save(
            &session(&[(Category::Katakana, "ア", true)]),
            fixed_clock().today(),
        )
        .unwrap();

    assert!(!store.ensure_created().unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap().lines().next(), Some(HEADER_LINE));
    assert_eq!(
        store.load().unwrap().get(Category::Katakana, "ア"),
        Some(counter(1, 1))
    );
}

#[test]
fn headerless_file_is_reported_as_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practice.csv");
    fs::write(&path, "2023-11-14,Hiragana,あ,1,1,1.00
").unwrap();

    let err = CsvHistoryStore::new(&path).load().unwrap_err();

    assert!(matches!(err, StorageError::Corrupt { line: 1, .. }), "{err:?}");
}

#[test]
fn export_copies_raw_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("practice.csv");
    let store = CsvHistoryStore::new(&path);

    let mut out = Vec::new();
    assert!(matches!(store.export(&mut out), Err(StorageError::NotFound)));

    store
        .save(
            &session(&[(Category::Hiragana, "ん", true)]),
            fixed_clock().today(),
        )
        .unwrap();
    let copied = store.export(&mut out).unwrap();

    assert_eq!(out, fs::read(&path).unwrap());
    assert_eq!(copied, out.len() as u64);
}
