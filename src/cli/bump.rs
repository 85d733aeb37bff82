//! Bump command implementation

use anyhow::{Context, Result};

use nightshift::release;

/// Tag the current git HEAD with the next patch version and push.
pub fn bump_command(verbose: bool) -> Result<()> {
    let dir = std::env::current_dir().context("Failed to resolve current directory")?;
    let version = release::bump(&dir, verbose)?;
    println!("Successfully created and pushed {version}");
    Ok(())
}
