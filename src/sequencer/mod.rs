//! Builds the study, guess, recognition and source-memory lists.

pub mod rows;

pub use self::rows::{
    GuessRow, ItemType, JudgedResponse, RecognitionRow, Response, ScoredResponse, SourceRow,
    StudyRow, Trial,
};

use self::rows::number_trials;
use crate::config::{BiasMode, DesignParams};
use crate::design::{
    assign_stratified, expand_grid, permute, replicate, replicate_to, shuffle_after_prefix,
    shuffle_within_blocks, BlockOrder, FactorSet,
};
use crate::error::{invalid, WagerResult};
use crate::stimuli::SourceStimuli;
use fastrand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// How safe labels are laid onto recognition rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeAssignment {
    /// Same safe label on every row.
    Fixed(ItemType),
    /// Balanced within studied and within unstudied rows.
    Balanced,
}

impl SafeAssignment {
    /// `Between` draws the participant's fixed mapping from `rng`.
    pub fn from_mode(mode: BiasMode, rng: &mut Rng) -> Self {
        match mode {
            BiasMode::Studied => SafeAssignment::Fixed(ItemType::Studied),
            BiasMode::Unstudied => SafeAssignment::Fixed(ItemType::Unstudied),
            BiasMode::Within => SafeAssignment::Balanced,
            BiasMode::Between => {
                let pick = if rng.bool() {
                    ItemType::Studied
                } else {
                    ItemType::Unstudied
                };
                SafeAssignment::Fixed(pick)
            }
        }
    }
}

pub struct Sequencer<'r> {
    rng: &'r mut Rng,
    block_size: usize,
    edge_blocks: usize,
}

impl<'r> Sequencer<'r> {
    pub fn new(rng: &'r mut Rng, block_size: usize, edge_blocks: usize) -> Self {
        Self {
            rng,
            block_size,
            edge_blocks,
        }
    }

    pub fn from_params(rng: &'r mut Rng, params: &DesignParams) -> Self {
        Self::new(rng, params.block_size, params.edge_blocks)
    }

    /// Study list: one block per `block_size` words, every source equally
    /// often inside each block, source order shuffled per block. Words are
    /// taken in pool order; each source cycles through its own stimulus files.
    pub fn study_list(
        &mut self,
        words: &[String],
        sources: &[SourceStimuli],
    ) -> WagerResult<Vec<StudyRow>> {
        if words.is_empty() {
            return invalid("study list needs at least one word");
        }
        if self.block_size == 0 || words.len() % self.block_size != 0 {
            return invalid(format!(
                "{} words do not fill whole blocks of {}",
                words.len(),
                self.block_size
            ));
        }
        if sources.is_empty() || self.block_size % sources.len() != 0 {
            return invalid(format!(
                "block size {} cannot be split evenly over {} sources",
                self.block_size,
                sources.len()
            ));
        }
        if let Some(s) = sources.iter().find(|s| s.files.is_empty()) {
            return invalid(format!("source '{}' has no stimulus files", s.label));
        }

        let labels = FactorSet::new().factor("source", sources.iter().map(|s| &s.label));
        let per_block = replicate_to(&expand_grid(&labels)?, self.block_size)?;
        let n_blocks = words.len() / self.block_size;

        let mut cells: Vec<(usize, String)> = Vec::with_capacity(words.len());
        for block in 1..=n_blocks {
            for row in per_block.rows() {
                cells.push((block, row[0].clone()));
            }
        }
        let cells = shuffle_within_blocks(self.rng, cells, |c| c.0, BlockOrder::Preserve);

        let by_label: HashMap<&str, &SourceStimuli> =
            sources.iter().map(|s| (s.label.as_str(), s)).collect();
        let mut used: HashMap<&str, usize> = HashMap::new();

        let mut rows = Vec::with_capacity(words.len());
        for ((block, source), word) in cells.into_iter().zip(words) {
            let stim = by_label[source.as_str()];
            let k = used.entry(stim.label.as_str()).or_insert(0);
            let stimulus = stim.pick(*k).to_path_buf();
            *k += 1;

            rows.push(StudyRow {
                trial: 0,
                block,
                source,
                word: word.clone(),
                stimulus,
                outcome: None,
            });
        }
        number_trials(&mut rows, |r, t| r.trial = t);

        debug!("Study list: {} rows in {} blocks", rows.len(), n_blocks);
        Ok(rows)
    }

    /// The safe x correct guess grid, replicated and shuffled.
    pub fn guess_list(&mut self, replications: usize) -> WagerResult<Vec<GuessRow>> {
        let grid = expand_grid(
            &FactorSet::new()
                .factor("safe", ItemType::BOTH)
                .factor("correct", ItemType::BOTH),
        )?;
        let table = replicate(&grid, replications)?;

        let mut rows = (0..table.len())
            .map(|i| -> WagerResult<GuessRow> {
                Ok(GuessRow {
                    trial: 0,
                    safe: table.parse(i, "safe")?,
                    correct: table.parse(i, "correct")?,
                    outcome: None,
                })
            })
            .collect::<WagerResult<Vec<_>>>()?;

        permute(self.rng, &mut rows);
        number_trials(&mut rows, |r, t| r.trial = t);
        Ok(rows)
    }

    /// Recognition test: eligible targets followed by as many lures, safe
    /// labels assigned, then reordered so the lead block comes first and the
    /// rest is shuffled.
    pub fn recognition_list(
        &mut self,
        study: &[StudyRow],
        lures: &[String],
        assignment: SafeAssignment,
    ) -> WagerResult<Vec<RecognitionRow>> {
        let eligible = self.eligible(study)?;
        if lures.len() < eligible.len() {
            return invalid(format!(
                "{} lures available, {} needed",
                lures.len(),
                eligible.len()
            ));
        }

        let mut rows: Vec<RecognitionRow> = eligible
            .iter()
            .map(|s| RecognitionRow {
                trial: 0,
                word: s.word.clone(),
                item_type: ItemType::Studied,
                safe: ItemType::Studied,
                study_block: Some(s.block),
                source: Some(s.source.clone()),
                outcome: None,
            })
            .chain(lures[..eligible.len()].iter().map(|w| RecognitionRow {
                trial: 0,
                word: w.clone(),
                item_type: ItemType::Unstudied,
                safe: ItemType::Studied,
                study_block: None,
                source: None,
                outcome: None,
            }))
            .collect();

        match assignment {
            SafeAssignment::Fixed(label) => rows.iter_mut().for_each(|r| r.safe = label),
            SafeAssignment::Balanced => {
                let labels = assign_stratified(self.rng, &rows, |r| r.item_type, &ItemType::BOTH)?;
                for (row, label) in rows.iter_mut().zip(labels) {
                    row.safe = label;
                }
            }
        }

        let lead = self.lead_block();
        let mut rows = lead_first(rows, |r| r.study_block == Some(lead));
        let fixed = rows.iter().filter(|r| r.study_block == Some(lead)).count();
        shuffle_after_prefix(self.rng, &mut rows, fixed);
        number_trials(&mut rows, |r, t| r.trial = t);

        debug!(
            "Recognition list: {} targets + {} lures, lead block {} fixed",
            eligible.len(),
            eligible.len(),
            lead
        );
        Ok(rows)
    }

    /// Source-memory test over the same eligible study rows, same ordering rule.
    pub fn source_list(&mut self, study: &[StudyRow]) -> WagerResult<Vec<SourceRow>> {
        let eligible = self.eligible(study)?;
        let rows: Vec<SourceRow> = eligible
            .iter()
            .map(|s| SourceRow {
                trial: 0,
                word: s.word.clone(),
                study_block: s.block,
                source: s.source.clone(),
                outcome: None,
            })
            .collect();

        let lead = self.lead_block();
        let mut rows = lead_first(rows, |r| r.study_block == lead);
        let fixed = rows.iter().filter(|r| r.study_block == lead).count();
        shuffle_after_prefix(self.rng, &mut rows, fixed);
        number_trials(&mut rows, |r, t| r.trial = t);
        Ok(rows)
    }

    /// First block after the excluded leading edge, kept in study order at test onset.
    pub fn lead_block(&self) -> usize {
        self.edge_blocks + 1
    }

    /// Study rows outside the leading and trailing edge blocks, in study order.
    fn eligible<'s>(&self, study: &'s [StudyRow]) -> WagerResult<Vec<&'s StudyRow>> {
        let n_blocks = study.iter().map(|r| r.block).max().unwrap_or(0);
        let first = self.edge_blocks + 1;
        let last = n_blocks.saturating_sub(self.edge_blocks);
        if first > last {
            return invalid(format!(
                "excluding {} edge blocks from each end of {} leaves nothing to test",
                self.edge_blocks, n_blocks
            ));
        }
        Ok(study
            .iter()
            .filter(|r| (first..=last).contains(&r.block))
            .collect())
    }
}

/// Stable partition: rows matching `is_lead` first, both halves in input order.
fn lead_first<T, F: Fn(&T) -> bool>(rows: Vec<T>, is_lead: F) -> Vec<T> {
    let (mut lead, rest): (Vec<T>, Vec<T>) = rows.into_iter().partition(|r| is_lead(r));
    lead.extend(rest);
    lead
}
