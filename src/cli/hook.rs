//! Stop-hook entry point invoked by the host tools

use anyhow::Result;

use nightshift::domain::{HookPayload, ToolKind};
use nightshift::handoff;

/// Handle a stop event for `tool`. The host writes a JSON payload to stdin;
/// a missing or malformed payload still results in a best-effort hand-off.
pub fn hook_command(tool: ToolKind, direct: bool) -> Result<()> {
    let payload = HookPayload::from_reader(std::io::stdin().lock());
    handoff::handle_stop(tool, &payload, direct)
}
