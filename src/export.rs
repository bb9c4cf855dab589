//! CSV output: one file per data stream, `subject` as the first column.
//!
//! A session is written only when every row of every stream carries its
//! outcome, so the output directory never holds half an export.

use crate::config::validate_subject;
use crate::error::{invalid, WagerResult};
use crate::sequencer::{GuessRow, ItemType, RecognitionRow, SourceRow, StudyRow, Trial};
use crate::session::SessionPlan;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct StudyRecord<'a> {
    subject: &'a str,
    trial: usize,
    block: usize,
    source: String,
    word: String,
    stimulus: String,
    response: String,
    rt: f64,
}

#[derive(Debug, Serialize)]
struct GuessRecord<'a> {
    subject: &'a str,
    trial: usize,
    safe: ItemType,
    correct_answer: ItemType,
    response: ItemType,
    rt: f64,
    correct: bool,
    points: i32,
}

#[derive(Debug, Serialize)]
struct RecognitionRecord<'a> {
    subject: &'a str,
    trial: usize,
    word: String,
    item_type: ItemType,
    safe: ItemType,
    study_block: Option<usize>,
    source: Option<String>,
    response: ItemType,
    rt: f64,
    correct: bool,
    points: i32,
}

#[derive(Debug, Serialize)]
struct SourceRecord<'a> {
    subject: &'a str,
    trial: usize,
    word: String,
    study_block: usize,
    source: String,
    response: String,
    rt: f64,
    correct: bool,
}

fn ensure_complete<T: Trial>(path: &Path, rows: &[T]) -> WagerResult<()> {
    match rows.iter().find(|r| !r.is_complete()) {
        Some(row) => invalid(format!(
            "trial {} has no recorded outcome; refusing to write {}",
            row.trial(),
            path.display()
        )),
        None => Ok(()),
    }
}

fn write_stream<T, R, F>(path: &Path, rows: &[T], to_record: F) -> WagerResult<()>
where
    T: Trial,
    R: Serialize,
    F: Fn(&T, &T::Outcome) -> R,
{
    ensure_complete(path, rows)?;

    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        if let Some(outcome) = row.outcome() {
            wtr.serialize(to_record(row, outcome))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_study(path: &Path, subject: &str, rows: &[StudyRow]) -> WagerResult<()> {
    write_stream(path, rows, |r, o| StudyRecord {
        subject,
        trial: r.trial,
        block: r.block,
        source: r.source.clone(),
        word: r.word.clone(),
        stimulus: r.stimulus.display().to_string(),
        response: o.choice.clone(),
        rt: o.rt_secs,
    })
}

pub fn write_guess(path: &Path, subject: &str, rows: &[GuessRow]) -> WagerResult<()> {
    write_stream(path, rows, |r, o| GuessRecord {
        subject,
        trial: r.trial,
        safe: r.safe,
        correct_answer: r.correct,
        response: o.choice,
        rt: o.rt_secs,
        correct: o.correct,
        points: o.points,
    })
}

pub fn write_recognition(path: &Path, subject: &str, rows: &[RecognitionRow]) -> WagerResult<()> {
    write_stream(path, rows, |r, o| RecognitionRecord {
        subject,
        trial: r.trial,
        word: r.word.clone(),
        item_type: r.item_type,
        safe: r.safe,
        study_block: r.study_block,
        source: r.source.clone(),
        response: o.choice,
        rt: o.rt_secs,
        correct: o.correct,
        points: o.points,
    })
}

pub fn write_source(path: &Path, subject: &str, rows: &[SourceRow]) -> WagerResult<()> {
    write_stream(path, rows, |r, o| SourceRecord {
        subject,
        trial: r.trial,
        word: r.word.clone(),
        study_block: r.study_block,
        source: r.source.clone(),
        response: o.choice.clone(),
        rt: o.rt_secs,
        correct: o.correct,
    })
}

/// Writes `<subject>_study.csv`, `_guess`, `_recognition` and `_source` into
/// `dir`. Returns the paths in that order.
pub fn write_session(dir: &Path, plan: &SessionPlan) -> WagerResult<Vec<PathBuf>> {
    let subject = plan.subject.as_str();
    validate_subject(subject)?;
    let path = |stream: &str| dir.join(format!("{}_{}.csv", subject, stream));

    let paths = vec![
        path("study"),
        path("guess"),
        path("recognition"),
        path("source"),
    ];
    // Every stream is checked before the first file is created.
    ensure_complete(&paths[0], &plan.study)?;
    ensure_complete(&paths[1], &plan.guess)?;
    ensure_complete(&paths[2], &plan.recognition)?;
    ensure_complete(&paths[3], &plan.source)?;

    fs::create_dir_all(dir)?;
    write_study(&paths[0], subject, &plan.study)?;
    write_guess(&paths[1], subject, &plan.guess)?;
    write_recognition(&paths[2], subject, &plan.recognition)?;
    write_source(&paths[3], subject, &plan.source)?;

    info!("Wrote {} data files to {}", paths.len(), dir.display());
    Ok(paths)
}
