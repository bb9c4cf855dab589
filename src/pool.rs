use crate::error::{WagerError, WagerResult};
use fastrand::Rng;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Reads a word list, one item per line. Blank lines are skipped and
/// surrounding whitespace is trimmed.
pub fn read_word_list<R: BufRead>(reader: R) -> WagerResult<Vec<String>> {
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let w = line.trim();
        if !w.is_empty() {
            words.push(w.to_string());
        }
    }
    Ok(words)
}

pub fn load_word_list<P: AsRef<Path>>(path: P) -> WagerResult<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        WagerError::ResourceMissing(format!(
            "could not open word list '{}': {}",
            path.display(),
            e
        ))
    })?;
    let words = read_word_list(BufReader::new(file))?;
    debug!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Disjoint target and lure sub-pools cut from one shuffled word list.
///
/// Targets hold the practice words first, then the main-phase words. The
/// main-phase part is reshuffled after the practice words are set aside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPool {
    targets: Vec<String>,
    lures: Vec<String>,
    practice: usize,
}

impl ItemPool {
    /// Partition by fixed offsets: `practice + n_items` targets followed by
    /// `n_items` lures. Duplicate words are dropped before cutting so the two
    /// pools can never share an item.
    pub fn partition(
        words: Vec<String>,
        n_items: usize,
        practice: usize,
        rng: &mut Rng,
    ) -> WagerResult<Self> {
        let mut seen = HashSet::new();
        let before = words.len();
        let mut words: Vec<String> = words.into_iter().filter(|w| seen.insert(w.clone())).collect();
        if words.len() < before {
            debug!("Dropped {} duplicate words", before - words.len());
        }

        let n_targets = practice + n_items;
        let needed = n_targets + n_items;
        if words.len() < needed {
            return Err(WagerError::ResourceMissing(format!(
                "word list has {} unique words, {} needed ({} practice + {} targets + {} lures)",
                words.len(),
                needed,
                practice,
                n_items,
                n_items
            )));
        }

        rng.shuffle(&mut words);
        words.truncate(needed);
        let lures = words.split_off(n_targets);
        let mut targets = words;
        rng.shuffle(&mut targets[practice..]);

        Ok(Self {
            targets,
            lures,
            practice,
        })
    }

    /// Every target word, practice words included.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn lures(&self) -> &[String] {
        &self.lures
    }

    pub fn practice_targets(&self) -> &[String] {
        &self.targets[..self.practice]
    }

    pub fn main_targets(&self) -> &[String] {
        &self.targets[self.practice..]
    }
}
