//! Output rendering and the all-or-nothing commit.
//!
//! Artifacts are rendered fully in memory first. [`commit_all`] writes each
//! one to a temporary file beside its destination and only then renames them
//! into place, so a failure before the first rename leaves nothing behind and
//! a failed later rename removes the files already placed.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use walletscore_core::types::{WalletFeatures, WalletScore};

use crate::error::PipelineError;

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// `userWallet,credit_score`, one row per wallet in the given order.
pub fn scores_csv(scores: &[WalletScore]) -> String {
    let mut out = String::from("userWallet,credit_score\n");
    for s in scores {
        out.push_str(&format!("{},{}\n", csv_field(&s.wallet), s.score));
    }
    out
}

/// Feature table with each wallet's pseudo-label, for auditing the heuristic.
pub fn features_csv(table: &[WalletFeatures], labels: &[f64]) -> String {
    let mut out = String::from(
        "userWallet,tx_frequency,total_deposit,total_borrow,liquidation_count,repayment_ratio,pseudo_score\n",
    );
    for (f, label) in table.iter().zip(labels) {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_field(&f.wallet),
            f.tx_frequency,
            f.total_deposit,
            f.total_borrow,
            f.liquidation_count,
            f.repayment_ratio,
            label
        ));
    }
    out
}

/// A rendered file waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn stage(artifact: &Artifact) -> Result<NamedTempFile, PipelineError> {
    let mut tmp = NamedTempFile::new_in(staging_dir(&artifact.path))
        .map_err(|e| PipelineError::io(&artifact.path, e))?;
    tmp.write_all(artifact.contents.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| PipelineError::io(&artifact.path, e))?;
    Ok(tmp)
}

/// Write every artifact or none of them.
pub fn commit_all(artifacts: &[Artifact]) -> Result<(), PipelineError> {
    // Temporaries are deleted on drop if anything below fails.
    let staged = artifacts
        .iter()
        .map(stage)
        .collect::<Result<Vec<_>, _>>()?;

    let mut placed: Vec<&Path> = Vec::with_capacity(artifacts.len());
    for (tmp, artifact) in staged.into_iter().zip(artifacts) {
        if let Err(e) = tmp.persist(&artifact.path) {
            for path in placed {
                if let Err(rm) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %rm, "sink: rollback failed");
                }
            }
            return Err(PipelineError::io(&artifact.path, e.error));
        }
        placed.push(&artifact.path);
    }

    for artifact in artifacts {
        info!(
            path = %artifact.path.display(),
            bytes = artifact.contents.len(),
            "sink: artifact written"
        );
    }
    Ok(())
}
