//! Rules command implementation

use anyhow::Result;

use nightshift::rules::RulesManager;

/// Perform instruction file operations.
pub fn rules_command(
    sync: bool,
    append: Option<String>,
    search: Option<String>,
    replace: Option<Vec<String>>,
    global_mode: bool,
) -> Result<()> {
    let manager = RulesManager::new(global_mode);
    let mut performed = false;

    if sync {
        manager.sync_files()?;
        println!("Instruction files synchronized");
        performed = true;
    }

    if let Some(text) = append {
        manager.append_to_files(&text)?;
        println!("Text appended to instruction files");
        performed = true;
    }

    if let Some(pattern) = search {
        let results = manager.search_files(&pattern);
        if results.is_empty() {
            println!("No matches found");
        } else {
            for (name, matches) in &results {
                println!("{}: {} match(es)", name, matches.len());
            }
        }
        performed = true;
    }

    if let Some(pair) = replace {
        // clap guarantees exactly two values.
        manager.replace_in_files(&pair[0], &pair[1])?;
        println!("Text replaced in instruction files");
        performed = true;
    }

    if !performed {
        println!("No rules action performed");
    }
    Ok(())
}
