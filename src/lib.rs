//! Nightshift - hands a coding session from one AI CLI to the next.
//!
//! When a supported CLI (Claude Code, Codex, Gemini) finishes a work session,
//! a stop hook installed in that tool's own configuration invokes
//! `nightshift hook <tool>`. Nightshift decides which tool should continue,
//! builds a prompt from the project's TODO.md/PLAN.md, and spawns the next
//! CLI in a fresh terminal window. A small session-state file tracks the
//! launched process so a stale session can be terminated before the next one
//! starts.
//!
//! ## Entry points
//!
//! 1. **Hooks (primary)**: the host CLIs call `nightshift hook <tool>` when a
//!    session ends; see [`handoff`] for the protocol.
//!
//! 2. **Direct launches**: `nightshift run <tool>` starts any of the
//!    supported CLIs with continuation-friendly defaults; see [`launcher`].

pub mod domain;
pub mod handoff;
pub mod hooks;
pub mod hostcfg;
pub mod launcher;
pub mod release;
pub mod rules;
pub mod session;
pub mod settings;
pub mod summary;
pub mod terminal;
pub mod update;

pub use domain::*;
