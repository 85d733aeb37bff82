//! Tool identifiers for the supported AI CLIs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three interchangeable CLI tools nightshift can chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Claude Code (Anthropic)
    Claude,
    /// Codex CLI (OpenAI)
    Codex,
    /// Gemini CLI (Google)
    Gemini,
}

impl ToolKind {
    /// All supported tools, in display order.
    pub fn all() -> [ToolKind; 3] {
        [ToolKind::Claude, ToolKind::Codex, ToolKind::Gemini]
    }

    /// Lower-case identifier used in settings files and CLI arguments.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Claude => "claude",
            ToolKind::Codex => "codex",
            ToolKind::Gemini => "gemini",
        }
    }

    /// Binary name the tool is installed as.
    pub fn binary(&self) -> &'static str {
        self.name()
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude" => Ok(ToolKind::Claude),
            "codex" => Ok(ToolKind::Codex),
            "gemini" => Ok(ToolKind::Gemini),
            other => anyhow::bail!(
                "unknown tool '{}': expected one of claude, codex, gemini",
                other
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Claude".parse::<ToolKind>().unwrap(), ToolKind::Claude);
        assert_eq!("CODEX".parse::<ToolKind>().unwrap(), ToolKind::Codex);
        assert_eq!("gemini".parse::<ToolKind>().unwrap(), ToolKind::Gemini);
    }

    #[test]
    fn rejects_unknown_tools() {
        let err = "copilot".parse::<ToolKind>().unwrap_err().to_string();
        assert!(err.contains("claude, codex, gemini"), "got: {}", err);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ToolKind::Claude).unwrap(),
            "\"claude\""
        );
    }
}
