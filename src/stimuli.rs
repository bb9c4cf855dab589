use crate::config::SourceSpec;
use crate::error::{WagerError, WagerResult};
use fastrand::Rng;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stimulus files for one source category, permuted once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStimuli {
    pub label: String,
    pub files: Vec<PathBuf>,
}

impl SourceStimuli {
    /// File for the k-th study row of this source. Cycles through the
    /// session's permutation so the pairing is fixed for the whole list.
    pub fn pick(&self, k: usize) -> &Path {
        &self.files[k % self.files.len()]
    }
}

/// Files in `dir` named `prefix` + one digit + `ext`, sorted by name.
pub fn find_stimuli(dir: &Path, prefix: &str, ext: &str) -> WagerResult<Vec<PathBuf>> {
    let pattern = Regex::new(&format!(
        r"^{}\d{}$",
        regex::escape(prefix),
        regex::escape(ext)
    ))?;

    let entries = fs::read_dir(dir).map_err(|e| {
        WagerError::ResourceMissing(format!(
            "could not read stimulus directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if pattern.is_match(&name.to_string_lossy()) && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Discovers and shuffles the stimulus set of every source.
pub fn load_sources(
    dir: &Path,
    sources: &[SourceSpec],
    ext: &str,
    rng: &mut Rng,
) -> WagerResult<Vec<SourceStimuli>> {
    sources
        .iter()
        .map(|spec| {
            let mut files = find_stimuli(dir, &spec.prefix, ext)?;
            if files.is_empty() {
                return Err(WagerError::ResourceMissing(format!(
                    "no stimuli matching '{}<digit>{}' for source '{}' in {}",
                    spec.prefix,
                    ext,
                    spec.label,
                    dir.display()
                )));
            }
            rng.shuffle(&mut files);
            debug!("Source {}: {} stimulus files", spec.label, files.len());
            Ok(SourceStimuli {
                label: spec.label.clone(),
                files,
            })
        })
        .collect()
}
