//! Drives a session plan through a display and an input source.
//!
//! Presentation and input devices stay behind [`DisplaySurface`] and
//! [`InputSource`]; the runner only decides what to show, waits for a
//! discrete choice, scores it and writes the outcome back into the row.

pub mod console;
pub mod scripted;

use crate::config::TimingParams;
use crate::error::{WagerError, WagerResult};
use crate::scoring::{Scorer, SessionTally};
use crate::sequencer::{
    GuessRow, ItemType, JudgedResponse, RecognitionRow, Response, ScoredResponse, SourceRow,
    StudyRow, Trial,
};
use crate::session::SessionPlan;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub use self::console::{ConsoleDisplay, ConsoleInput};
pub use self::scripted::{NullDisplay, RandomInput, ScriptedInput};

pub const ADVANCE_ID: &str = "next";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ButtonState {
    Active,
    Disabled,
}

/// Colour coding of an option: safe is drawn green, risky red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Safe,
    Risky,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseOption {
    pub id: String,
    pub text: String,
    pub key: char,
    pub tone: Tone,
    pub state: ButtonState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame<'a> {
    Instructions(&'a str),
    Fixation,
    Study {
        word: &'a str,
        stimulus: &'a Path,
    },
    Decision {
        prompt: Option<&'a str>,
        options: &'a [ResponseOption],
    },
    Feedback {
        points: i32,
        total: i64,
    },
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Choice { id: String, rt_secs: f64 },
    Quit,
}

pub trait DisplaySurface {
    fn show(&mut self, frame: &Frame<'_>) -> WagerResult<()>;
    fn pause(&mut self, duration: Duration) -> WagerResult<()>;
}

pub trait InputSource {
    /// Blocks until one active option is chosen or the participant quits.
    fn next_event(&mut self, options: &[ResponseOption]) -> WagerResult<InputEvent>;
}

/// Keys for `n` options: the two designated keys for a binary choice,
/// digits otherwise.
fn keys_for(n: usize) -> Vec<char> {
    if n == 2 {
        vec!['f', 'j']
    } else {
        (0..n)
            .map(|i| char::from_digit((i as u32 + 1) % 10, 10).unwrap_or('0'))
            .collect()
    }
}

fn studied_options(safe: ItemType) -> Vec<ResponseOption> {
    let keys = keys_for(2);
    ItemType::BOTH
        .iter()
        .zip(keys)
        .map(|(&label, key)| ResponseOption {
            id: label.to_string(),
            text: match label {
                ItemType::Studied => "Studied".to_string(),
                ItemType::Unstudied => "Not Studied".to_string(),
            },
            key,
            tone: if label == safe { Tone::Safe } else { Tone::Risky },
            state: ButtonState::Active,
        })
        .collect()
}

fn source_options(labels: &[String]) -> Vec<ResponseOption> {
    labels
        .iter()
        .zip(keys_for(labels.len()))
        .map(|(label, key)| ResponseOption {
            id: label.clone(),
            text: label.clone(),
            key,
            tone: Tone::Neutral,
            state: ButtonState::Active,
        })
        .collect()
}

/// Copy of `options` with everything except `chosen` disabled.
fn lock_in(options: &[ResponseOption], chosen: &str) -> Vec<ResponseOption> {
    options
        .iter()
        .map(|o| ResponseOption {
            state: if o.id == chosen {
                ButtonState::Active
            } else {
                ButtonState::Disabled
            },
            ..o.clone()
        })
        .collect()
}

pub struct TrialRunner<'a, D, I> {
    display: &'a mut D,
    input: &'a mut I,
    scorer: Scorer,
    timing: TimingParams,
    tally: SessionTally,
}

impl<'a, D: DisplaySurface, I: InputSource> TrialRunner<'a, D, I> {
    pub fn new(display: &'a mut D, input: &'a mut I, scorer: Scorer, timing: TimingParams) -> Self {
        Self {
            display,
            input,
            scorer,
            timing,
            tally: SessionTally::default(),
        }
    }

    pub fn tally(&self) -> SessionTally {
        self.tally
    }

    /// Practice study, guess task, main study, recognition test, source test.
    pub fn run_plan(&mut self, plan: &mut SessionPlan) -> WagerResult<SessionTally> {
        info!("Running session for subject {}", plan.subject);

        self.instructions("Practice: remember each word and who showed it.")?;
        self.run_study(&mut plan.practice_study)?;

        let payoffs = self.payoff_hint();
        self.instructions(&format!("Guess which answer is correct. {}", payoffs))?;
        self.run_guess(&mut plan.guess)?;

        self.instructions("Study: remember each word and who showed it.")?;
        self.run_study(&mut plan.study)?;

        self.instructions(&format!("Was this word studied? {}", payoffs))?;
        self.run_recognition(&mut plan.recognition)?;

        self.instructions("Who showed you this word?")?;
        self.run_source(&mut plan.source, &plan.source_labels)?;

        info!(
            "Session complete: {} points over {} decisions ({:.0}% correct)",
            self.tally.total,
            self.tally.decisions,
            self.tally.accuracy() * 100.0
        );
        Ok(self.tally)
    }

    pub fn run_study(&mut self, rows: &mut [StudyRow]) -> WagerResult<()> {
        let advance = vec![ResponseOption {
            id: ADVANCE_ID.to_string(),
            text: "Next".to_string(),
            key: ' ',
            tone: Tone::Neutral,
            state: ButtonState::Active,
        }];

        for row in rows.iter_mut() {
            self.fixation()?;
            self.display.show(&Frame::Study {
                word: &row.word,
                stimulus: &row.stimulus,
            })?;
            self.display.pause(self.timing.study())?;

            let (choice, rt_secs) = self.await_choice(None, &advance)?;
            row.record(Response { choice, rt_secs })?;
        }
        Ok(())
    }

    pub fn run_guess(&mut self, rows: &mut [GuessRow]) -> WagerResult<()> {
        for row in rows.iter_mut() {
            let outcome = self.decide(None, row.correct, row.safe)?;
            row.record(outcome)?;
        }
        Ok(())
    }

    pub fn run_recognition(&mut self, rows: &mut [RecognitionRow]) -> WagerResult<()> {
        for row in rows.iter_mut() {
            self.fixation()?;
            let outcome = self.decide(Some(&row.word), row.item_type, row.safe)?;
            row.record(outcome)?;
        }
        Ok(())
    }

    pub fn run_source(&mut self, rows: &mut [SourceRow], labels: &[String]) -> WagerResult<()> {
        let options = source_options(labels);
        for row in rows.iter_mut() {
            self.fixation()?;
            let (choice, rt_secs) = self.await_choice(Some(&row.word), &options)?;
            let correct = choice == row.source;
            row.record(JudgedResponse {
                choice,
                rt_secs,
                correct,
            })?;
        }
        Ok(())
    }

    /// One scored safe/risky decision followed by points feedback.
    fn decide(
        &mut self,
        prompt: Option<&str>,
        correct: ItemType,
        safe: ItemType,
    ) -> WagerResult<ScoredResponse<ItemType>> {
        let options = studied_options(safe);
        let (id, rt_secs) = self.await_choice(prompt, &options)?;
        let choice: ItemType = id.parse().map_err(|_| {
            WagerError::InvalidInput(format!("'{}' is not a studied/unstudied response", id))
        })?;

        let points = self.scorer.score(&choice, &correct, &safe);
        let hit = choice == correct;
        self.tally.add(points, hit, choice == safe);
        debug!(
            "choice={} correct={} safe={} points={}",
            choice, correct, safe, points
        );

        let locked = lock_in(&options, &id);
        self.display.show(&Frame::Decision {
            prompt,
            options: &locked,
        })?;
        self.display.show(&Frame::Feedback {
            points,
            total: self.tally.total,
        })?;
        self.display.pause(self.timing.feedback())?;

        Ok(ScoredResponse {
            choice,
            rt_secs,
            correct: hit,
            points,
        })
    }

    fn await_choice(
        &mut self,
        prompt: Option<&str>,
        options: &[ResponseOption],
    ) -> WagerResult<(String, f64)> {
        self.display.show(&Frame::Decision { prompt, options })?;
        loop {
            match self.input.next_event(options)? {
                InputEvent::Quit => return Err(WagerError::Aborted),
                InputEvent::Choice { id, rt_secs } => {
                    let active = options
                        .iter()
                        .any(|o| o.id == id && o.state == ButtonState::Active);
                    if active {
                        return Ok((id, rt_secs));
                    }
                    debug!("Ignoring response '{}' outside the active options", id);
                }
            }
        }
    }

    fn payoff_hint(&self) -> String {
        let p = &self.scorer.payoffs;
        format!(
            "Green pays {:+}/{:+}, red pays {:+}/{:+}.",
            p.payoff_safe_hit, p.payoff_safe_miss, p.payoff_risky_hit, p.payoff_risky_miss
        )
    }

    fn fixation(&mut self) -> WagerResult<()> {
        self.display.show(&Frame::Blank)?;
        self.display.pause(self.timing.isi())?;
        self.display.show(&Frame::Fixation)
    }

    fn instructions(&mut self, text: &str) -> WagerResult<()> {
        self.display.show(&Frame::Instructions(text))?;
        let advance = [ResponseOption {
            id: ADVANCE_ID.to_string(),
            text: "Start".to_string(),
            key: ' ',
            tone: Tone::Neutral,
            state: ButtonState::Active,
        }];
        self.await_choice(None, &advance).map(|_| ())
    }
}
