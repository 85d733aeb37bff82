//! Resume command: execute a previously written hand-off plan

use std::path::Path;

use anyhow::Result;

use nightshift::handoff::{self, HandoffPlan};

/// Load the hand-off plan at `config` and run it to completion.
pub fn resume_command(config: &Path) -> Result<()> {
    let plan = HandoffPlan::read(config)?;
    handoff::resume(&plan)
}
