//! Legacy data-summarisation helper kept for backward compatibility.
//!
//! The first release of this project shipped a small demo that summarises a
//! collection of records. Downstream scripts still call it, so it stays,
//! exposed as the hidden `nightshift summarize` command and as a library
//! function.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use anyhow::{Result, bail};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Configuration whose metadata is surfaced in the summary.
#[derive(Debug, Clone, Default)]
pub struct SummaryConfig {
    pub name: String,
    pub value: String,
    pub options: BTreeMap<String, Value>,
}

/// Structured result of [`summarize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub unique_count: usize,
    /// Sorted JSON type names present in the input.
    pub types: Vec<String>,
    pub config_name: Option<String>,
    pub first_item: String,
    pub options: BTreeMap<String, Value>,
}

/// JSON type label used in summaries.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Summarise `items` into counts, uniqueness, and type distribution.
/// Uniqueness is judged on the serialised representation.
pub fn summarize(
    items: &[Value],
    config: Option<&SummaryConfig>,
    debug_mode: bool,
) -> Result<Summary> {
    if items.is_empty() {
        bail!("input data cannot be empty");
    }
    if debug_mode {
        debug!("debug mode enabled");
    }

    let unique: HashSet<String> = items.iter().map(|item| item.to_string()).collect();
    let types: Vec<String> = items
        .iter()
        .map(|item| type_name(item).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let summary = Summary {
        count: items.len(),
        unique_count: unique.len(),
        types,
        config_name: config.map(|config| config.name.clone()),
        first_item: items[0].to_string(),
        options: config.map(|config| config.options.clone()).unwrap_or_default(),
    };

    if debug_mode {
        debug!("summary generated: {:?}", summary);
    }
    Ok(summary)
}
