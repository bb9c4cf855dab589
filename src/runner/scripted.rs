use super::{ButtonState, DisplaySurface, Frame, InputEvent, InputSource, ResponseOption};
use crate::error::WagerResult;
use fastrand::Rng;
use std::collections::VecDeque;
use std::time::Duration;

/// Discards frames; counts them for assertions.
#[derive(Debug, Default)]
pub struct NullDisplay {
    pub frames: usize,
}

impl DisplaySurface for NullDisplay {
    fn show(&mut self, _frame: &Frame<'_>) -> WagerResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn pause(&mut self, _duration: Duration) -> WagerResult<()> {
        Ok(())
    }
}

/// Replays a fixed queue of events, then quits.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: ids
                .into_iter()
                .map(|id| InputEvent::Choice {
                    id: id.into(),
                    rt_secs: 0.5,
                })
                .collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self, _options: &[ResponseOption]) -> WagerResult<InputEvent> {
        Ok(self.queue.pop_front().unwrap_or(InputEvent::Quit))
    }
}

/// Picks a random active option with a random reaction time.
pub struct RandomInput {
    rng: Rng,
}

impl RandomInput {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }
}

impl InputSource for RandomInput {
    fn next_event(&mut self, options: &[ResponseOption]) -> WagerResult<InputEvent> {
        let active: Vec<&ResponseOption> = options
            .iter()
            .filter(|o| o.state == ButtonState::Active)
            .collect();
        let Some(pick) = self.rng.choice(active) else {
            return Ok(InputEvent::Quit);
        };
        Ok(InputEvent::Choice {
            id: pick.id.clone(),
            rt_secs: 0.3 + self.rng.f64() * 1.2,
        })
    }
}
