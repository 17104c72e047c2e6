use anyhow::{Context, Result};
use kernel::{Kernel, Snapshot};
use serde::Serialize;

use crate::control::RunSummary;

/// Final state of a run, as printed by `hypo --json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub summary: &'a RunSummary,
    pub snapshot: Snapshot,
}

impl<'a> Report<'a> {
    pub fn capture(kernel: &Kernel, summary: &'a RunSummary) -> Result<Self> {
        let snapshot = kernel.snapshot().context("capturing kernel snapshot")?;
        Ok(Self { summary, snapshot })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing report")
    }
}
