use crate::config::PayoffTable;
use serde::Serialize;

/// Stateless payoff rule for the safe/risky decision.
///
/// Choosing the safe label carries the low-variance payoff (+3 / -1 with the
/// default table), the risky label the high-variance one (+1 / -3).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scorer {
    pub payoffs: PayoffTable,
}

impl Scorer {
    pub fn new(payoffs: PayoffTable) -> Self {
        Self { payoffs }
    }

    pub fn score<L: PartialEq>(&self, chosen: &L, correct: &L, safe: &L) -> i32 {
        let p = &self.payoffs;
        match (chosen == correct, chosen == safe) {
            (true, true) => p.payoff_safe_hit,
            (true, false) => p.payoff_risky_hit,
            (false, true) => p.payoff_safe_miss,
            (false, false) => p.payoff_risky_miss,
        }
    }
}

/// Scores with the default payoff table.
pub fn score<L: PartialEq>(chosen: &L, correct: &L, safe: &L) -> i32 {
    Scorer::default().score(chosen, correct, safe)
}

/// Running total over every scored decision of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTally {
    pub total: i64,
    pub decisions: usize,
    pub hits: usize,
    pub safe_choices: usize,
}

impl SessionTally {
    pub fn add(&mut self, points: i32, correct: bool, chose_safe: bool) {
        self.total += i64::from(points);
        self.decisions += 1;
        if correct {
            self.hits += 1;
        }
        if chose_safe {
            self.safe_choices += 1;
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.decisions == 0 {
            return 0.0;
        }
        self.hits as f64 / self.decisions as f64
    }
}
