//! Prompt construction from project documentation files.

use std::path::Path;

use crate::domain::ToolKind;
use crate::settings::Settings;

const MAX_TODO_LINES: usize = 5;
const MAX_PLAN_LINES: usize = 5;

/// First unchecked TODO entries from `<project>/TODO.md`, at most five.
/// A missing or unreadable file yields an empty list.
pub fn collect_todo_lines(project_dir: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(project_dir.join("TODO.md")) else {
        return Vec::new();
    };
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("- [ ]"))
        .take(MAX_TODO_LINES)
        .map(String::from)
        .collect()
}

/// A short snippet from `<project>/PLAN.md`: the first five non-empty lines.
pub fn collect_plan_hint(project_dir: &Path) -> String {
    let Ok(content) = std::fs::read_to_string(project_dir.join("PLAN.md")) else {
        return String::new();
    };
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_PLAN_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the text passed to the continuation CLI.
///
/// The template comes from the source tool's configured prompt; `{todo}`,
/// `{plan}`, `{target}`, and `{source}` are substituted. Unknown
/// placeholders pass through verbatim, so substitution cannot fail.
pub fn build_prompt(
    settings: &Settings,
    source: ToolKind,
    target: ToolKind,
    project_dir: &Path,
) -> String {
    let template = settings.prompt_for(source);

    let todo_lines = collect_todo_lines(project_dir);
    let todo = if todo_lines.is_empty() {
        "No open TODO items.".to_string()
    } else {
        todo_lines.join("\n")
    };

    let plan_hint = collect_plan_hint(project_dir);
    let plan = if plan_hint.is_empty() {
        "No plan summary available.".to_string()
    } else {
        plan_hint
    };

    template
        .replace("{todo}", &todo)
        .replace("{plan}", &plan)
        .replace("{target}", target.name())
        .replace("{source}", source.name())
}
