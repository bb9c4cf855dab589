use crate::error::{invalid, WagerResult};
use clap::{parser::ValueSource, ArgMatches, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use strum_macros::{Display, EnumString};

pub const N_ITEMS_MIN: usize = 16;
pub const N_ITEMS_MAX: usize = 548;
pub const N_ITEMS_MULTIPLE: usize = 4;
pub const GUESS_REPLICATIONS_MAX: usize = 64;
/// One digit key per source on the test screen.
pub const SOURCES_MAX: usize = 10;

/// How the "safe" response is mapped onto studied/unstudied.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BiasMode {
    /// One fixed mapping per participant, drawn at random.
    Between,
    /// Balanced trial-by-trial mapping within each item type.
    Within,
    /// "Studied" is always safe.
    Studied,
    /// "Unstudied" is always safe.
    Unstudied,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct SessionArgs {
    /// Participant identifier (generated when omitted)
    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long, value_enum, default_value_t = BiasMode::Within)]
    pub bias: BiasMode,

    /// Main-phase study items; a multiple of 4 in [16, 548]
    #[arg(long = "n-items", alias = "n_items", default_value_t = 48)]
    pub n_items: usize,

    #[arg(long, default_value = "data/words.txt")]
    pub words: String,

    #[arg(long, default_value_t = false)]
    pub fullscreen: bool,

    /// Fixed RNG seed for a reproducible session
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "data")]
    pub out_dir: String,

    /// JSON file with payoff values (explicit --payoff-* flags win)
    #[arg(long = "payoffs")]
    pub payoffs_file: Option<String>,

    #[command(flatten)]
    pub design: DesignParams,
    #[command(flatten)]
    pub stimuli: StimulusParams,
    #[command(flatten)]
    pub payoffs: PayoffTable,
    #[command(flatten)]
    pub timing: TimingParams,
}

impl Default for SessionArgs {
    fn default() -> Self {
        Self {
            subject: None,
            bias: BiasMode::Within,
            n_items: 48,
            words: "data/words.txt".to_string(),
            fullscreen: false,
            seed: None,
            out_dir: "data".to_string(),
            payoffs_file: None,
            design: DesignParams::default(),
            stimuli: StimulusParams::default(),
            payoffs: PayoffTable::default(),
            timing: TimingParams::default(),
        }
    }
}

impl SessionArgs {
    /// Fail-fast checks on counts; runs before any file is touched.
    pub fn validate(&self) -> WagerResult<()> {
        let n = self.n_items;
        if n % N_ITEMS_MULTIPLE != 0 {
            return invalid(format!(
                "--n-items must be a multiple of {}, got {}",
                N_ITEMS_MULTIPLE, n
            ));
        }
        if !(N_ITEMS_MIN..=N_ITEMS_MAX).contains(&n) {
            return invalid(format!(
                "--n-items must be between {} and {}, got {}",
                N_ITEMS_MIN, N_ITEMS_MAX, n
            ));
        }
        if let Some(subject) = &self.subject {
            validate_subject(subject)?;
        }
        self.design.validate(n)?;
        let sources = self.stimuli.parse_sources()?;
        if self.design.block_size % sources.len() != 0 {
            return invalid(format!(
                "--block-size {} cannot hold an equal number of rows for {} sources",
                self.design.block_size,
                sources.len()
            ));
        }
        Ok(())
    }

    pub fn subject_id(&self) -> String {
        match &self.subject {
            Some(s) => s.clone(),
            None => generate_subject_id(),
        }
    }

    /// The payoff table after applying the optional JSON file and CLI overrides.
    pub fn resolve_payoffs(&self, matches: Option<&ArgMatches>) -> WagerResult<PayoffTable> {
        let Some(path) = &self.payoffs_file else {
            return Ok(self.payoffs.clone());
        };
        let mut table = PayoffTable::load_from_file(path)?;
        if let Some(m) = matches {
            table.merge_from_cli(&self.payoffs, m);
        }
        Ok(table)
    }
}

/// Subject ids name the output files, so they must be a single plain path
/// component.
pub fn validate_subject(subject: &str) -> WagerResult<()> {
    let bad = subject.is_empty()
        || subject == "."
        || subject == ".."
        || subject.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        return invalid(format!(
            "subject id '{}' cannot be used as a file name",
            subject.escape_debug()
        ));
    }
    Ok(())
}

/// Time-based id with a random suffix, e.g. `67a3f1c2-4b1e`.
pub fn generate_subject_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{:x}-{:04x}", secs, fastrand::u16(..))
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct DesignParams {
    #[arg(long, default_value_t = 4)]
    pub block_size: usize,
    /// Target words reserved for the practice study list
    #[arg(long, default_value_t = 8)]
    pub practice_items: usize,
    /// Study blocks dropped from testing at each end of the list
    #[arg(long, default_value_t = 1)]
    pub edge_blocks: usize,
    /// Copies of the safe x correct guess grid
    #[arg(long, default_value_t = 2)]
    pub guess_replications: usize,
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            block_size: 4,
            practice_items: 8,
            edge_blocks: 1,
            guess_replications: 2,
        }
    }
}

impl DesignParams {
    pub fn validate(&self, n_items: usize) -> WagerResult<()> {
        if self.block_size == 0 {
            return invalid("--block-size must be at least 1");
        }
        if n_items % self.block_size != 0 {
            return invalid(format!(
                "--n-items {} is not a whole number of {}-item blocks",
                n_items, self.block_size
            ));
        }
        if self.practice_items % self.block_size != 0 {
            return invalid(format!(
                "--practice-items {} is not a whole number of {}-item blocks",
                self.practice_items, self.block_size
            ));
        }
        let blocks = n_items / self.block_size;
        let trimmed = self.edge_blocks.checked_mul(2);
        if trimmed.map_or(true, |t| t >= blocks) {
            return invalid(format!(
                "--edge-blocks {} leaves no testable block out of {}",
                self.edge_blocks, blocks
            ));
        }
        if !(1..=GUESS_REPLICATIONS_MAX).contains(&self.guess_replications) {
            return invalid(format!(
                "--guess-replications must be between 1 and {}, got {}",
                GUESS_REPLICATIONS_MAX, self.guess_replications
            ));
        }
        Ok(())
    }
}

/// Fixed delays handed to the display surface.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct TimingParams {
    #[arg(long, default_value_t = 1000)]
    pub isi_ms: u64,
    #[arg(long, default_value_t = 2000)]
    pub study_ms: u64,
    #[arg(long, default_value_t = 1000)]
    pub feedback_ms: u64,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            isi_ms: 1000,
            study_ms: 2000,
            feedback_ms: 1000,
        }
    }
}

impl TimingParams {
    pub fn isi(&self) -> Duration {
        Duration::from_millis(self.isi_ms)
    }

    pub fn study(&self) -> Duration {
        Duration::from_millis(self.study_ms)
    }

    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct StimulusParams {
    #[arg(long, default_value = "stimuli")]
    pub stimuli_dir: String,
    /// Source categories as `label:prefix` pairs
    #[arg(long, default_value = "A:a,B:b")]
    pub sources: String,
    #[arg(long, default_value = ".jpg")]
    pub stimulus_ext: String,
}

impl Default for StimulusParams {
    fn default() -> Self {
        Self {
            stimuli_dir: "stimuli".to_string(),
            sources: "A:a,B:b".to_string(),
            stimulus_ext: ".jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub label: String,
    pub prefix: String,
}

impl StimulusParams {
    pub fn parse_sources(&self) -> WagerResult<Vec<SourceSpec>> {
        let mut out: Vec<SourceSpec> = Vec::new();
        for part in self.sources.split(',') {
            let part = part.trim();
            let Some((label, prefix)) = part.split_once(':') else {
                return invalid(format!("source '{}' is not in label:prefix form", part));
            };
            let (label, prefix) = (label.trim(), prefix.trim());
            if label.is_empty() || prefix.is_empty() {
                return invalid(format!("source '{}' has an empty label or prefix", part));
            }
            if out.iter().any(|s| s.label == label) {
                return invalid(format!("source label '{}' listed twice", label));
            }
            out.push(SourceSpec {
                label: label.to_string(),
                prefix: prefix.to_string(),
            });
        }
        if out.len() < 2 {
            return invalid("--sources needs at least two categories");
        }
        if out.len() > SOURCES_MAX {
            return invalid(format!(
                "--sources lists {} categories, at most {} have response keys",
                out.len(),
                SOURCES_MAX
            ));
        }
        Ok(out)
    }
}

/// Points for each (correct?, safe?) outcome of a decision.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffTable {
    #[arg(long, default_value_t = 3, allow_hyphen_values = true)]
    pub payoff_safe_hit: i32,
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    pub payoff_risky_hit: i32,
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub payoff_safe_miss: i32,
    #[arg(long, default_value_t = -3, allow_hyphen_values = true)]
    pub payoff_risky_miss: i32,
}

impl Default for PayoffTable {
    fn default() -> Self {
        Self {
            payoff_safe_hit: 3,
            payoff_risky_hit: 1,
            payoff_safe_miss: -1,
            payoff_risky_miss: -3,
        }
    }
}

impl PayoffTable {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> WagerResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn merge_from_cli(&mut self, cli: &PayoffTable, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field;
                }
            };
        }

        update_if_present!(payoff_safe_hit, "payoff_safe_hit");
        update_if_present!(payoff_risky_hit, "payoff_risky_hit");
        update_if_present!(payoff_safe_miss, "payoff_safe_miss");
        update_if_present!(payoff_risky_miss, "payoff_risky_miss");
    }
}
