use crate::config::SessionArgs;
use crate::error::WagerResult;
use crate::pool::{load_word_list, ItemPool};
use crate::sequencer::{
    GuessRow, RecognitionRow, SafeAssignment, Sequencer, SourceRow, StudyRow,
};
use crate::stimuli::{load_sources, SourceStimuli};
use fastrand::Rng;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Every ordered trial list of one participant's session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPlan {
    pub subject: String,
    #[serde(skip)]
    pub assignment: SafeAssignment,
    pub source_labels: Vec<String>,
    pub practice_study: Vec<StudyRow>,
    pub guess: Vec<GuessRow>,
    pub study: Vec<StudyRow>,
    pub recognition: Vec<RecognitionRow>,
    pub source: Vec<SourceRow>,
}

/// Validates `args`, loads the word list and stimuli, and sequences a plan.
pub fn build_plan(args: &SessionArgs, subject: String, rng: &mut Rng) -> WagerResult<SessionPlan> {
    args.validate()?;

    let words = load_word_list(&args.words)?;
    let specs = args.stimuli.parse_sources()?;
    let stimuli = load_sources(
        Path::new(&args.stimuli.stimuli_dir),
        &specs,
        &args.stimuli.stimulus_ext,
        rng,
    )?;
    build_plan_from(args, subject, words, stimuli, rng)
}

/// Sequencing half of [`build_plan`], for callers that already hold the
/// word list and stimulus sets.
pub fn build_plan_from(
    args: &SessionArgs,
    subject: String,
    words: Vec<String>,
    stimuli: Vec<SourceStimuli>,
    rng: &mut Rng,
) -> WagerResult<SessionPlan> {
    args.validate()?;

    let pool = ItemPool::partition(words, args.n_items, args.design.practice_items, rng)?;
    let assignment = SafeAssignment::from_mode(args.bias, rng);

    let mut seq = Sequencer::from_params(rng, &args.design);
    let practice_study = if pool.practice_targets().is_empty() {
        Vec::new()
    } else {
        seq.study_list(pool.practice_targets(), &stimuli)?
    };
    let guess = seq.guess_list(args.design.guess_replications)?;
    let study = seq.study_list(pool.main_targets(), &stimuli)?;
    let recognition = seq.recognition_list(&study, pool.lures(), assignment)?;
    let source = seq.source_list(&study)?;

    info!(
        "Plan for {}: {} practice, {} guess, {} study, {} recognition, {} source trials ({:?})",
        subject,
        practice_study.len(),
        guess.len(),
        study.len(),
        recognition.len(),
        source.len(),
        assignment
    );

    Ok(SessionPlan {
        subject,
        assignment,
        source_labels: stimuli.iter().map(|s| s.label.clone()).collect(),
        practice_study,
        guess,
        study,
        recognition,
        source,
    })
}
