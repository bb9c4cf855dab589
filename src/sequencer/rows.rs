use crate::error::{invalid, WagerResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum_macros::{Display, EnumString};

/// Ground-truth status of a test item, and the label on each response option.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Studied,
    Unstudied,
}

impl ItemType {
    pub const BOTH: [ItemType; 2] = [ItemType::Studied, ItemType::Unstudied];
}

/// A keypress or click with its reaction time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<R> {
    pub choice: R,
    pub rt_secs: f64,
}

/// A response checked against ground truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgedResponse<R> {
    pub choice: R,
    pub rt_secs: f64,
    pub correct: bool,
}

/// A safe/risky decision with the points it earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResponse<R> {
    pub choice: R,
    pub rt_secs: f64,
    pub correct: bool,
    pub points: i32,
}

/// A row whose outcome starts unset and is written exactly once.
pub trait Trial {
    type Outcome;

    fn outcome(&self) -> Option<&Self::Outcome>;
    fn outcome_slot(&mut self) -> &mut Option<Self::Outcome>;
    fn trial(&self) -> usize;

    fn is_complete(&self) -> bool {
        self.outcome().is_some()
    }

    fn record(&mut self, outcome: Self::Outcome) -> WagerResult<()> {
        let trial = self.trial();
        let slot = self.outcome_slot();
        if slot.is_some() {
            return invalid(format!("outcome for trial {} already recorded", trial));
        }
        *slot = Some(outcome);
        Ok(())
    }
}

macro_rules! impl_trial {
    ($row:ty, $outcome:ty) => {
        impl Trial for $row {
            type Outcome = $outcome;

            fn outcome(&self) -> Option<&Self::Outcome> {
                self.outcome.as_ref()
            }

            fn outcome_slot(&mut self) -> &mut Option<Self::Outcome> {
                &mut self.outcome
            }

            fn trial(&self) -> usize {
                self.trial
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyRow {
    pub trial: usize,
    pub block: usize,
    pub source: String,
    pub word: String,
    pub stimulus: PathBuf,
    pub outcome: Option<Response<String>>,
}

/// Word-free guess trial used to teach the payoff structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessRow {
    pub trial: usize,
    pub safe: ItemType,
    pub correct: ItemType,
    pub outcome: Option<ScoredResponse<ItemType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionRow {
    pub trial: usize,
    pub word: String,
    pub item_type: ItemType,
    pub safe: ItemType,
    /// Study block and source for targets; `None` for lures.
    pub study_block: Option<usize>,
    pub source: Option<String>,
    pub outcome: Option<ScoredResponse<ItemType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRow {
    pub trial: usize,
    pub word: String,
    pub study_block: usize,
    pub source: String,
    pub outcome: Option<JudgedResponse<String>>,
}

impl_trial!(StudyRow, Response<String>);
impl_trial!(GuessRow, ScoredResponse<ItemType>);
impl_trial!(RecognitionRow, ScoredResponse<ItemType>);
impl_trial!(SourceRow, JudgedResponse<String>);

/// Rewrites `trial` as the 1-based position in the finalized order.
pub(crate) fn number_trials<T, F>(rows: &mut [T], mut set: F)
where
    F: FnMut(&mut T, usize),
{
    for (i, row) in rows.iter_mut().enumerate() {
        set(row, i + 1);
    }
}
