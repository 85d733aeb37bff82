//! Legacy summarize demo command

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::json;

use nightshift::summary::{self, SummaryConfig};

/// Run the legacy summarisation helper on its demo input.
pub fn summarize_command() -> Result<()> {
    let sample = vec![json!(1), json!(2), json!(3)];
    let config = SummaryConfig {
        name: "default".to_string(),
        value: "demo".to_string(),
        options: BTreeMap::from([("label".to_string(), json!("sample"))]),
    };
    let summary = summary::summarize(&sample, Some(&config), false)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
