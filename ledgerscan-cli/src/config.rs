use anyhow::{Context, Result};
use ledgerscan_ingest::StatementLayout;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_ledgerscan_home, ledgerscan_home};

pub fn layout_path() -> Result<PathBuf> {
    Ok(ledgerscan_home()?.join("layout.toml"))
}

/// `--layout FILE`, else ~/.ledgerscan/layout.toml if present, else the built-in sample layout.
pub fn load_layout(explicit: Option<&Path>) -> Result<StatementLayout> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = layout_path()?;
            if !p.exists() {
                tracing::debug!("no layout file, using built-in sample layout");
                return Ok(StatementLayout::default());
            }
            p
        }
    };
    tracing::info!(path = %p.display(), "loading layout");
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn layout_toml(layout: &StatementLayout) -> Result<String> {
    toml::to_string_pretty(layout).context("serialize layout")
}

pub fn init_layout() -> Result<()> {
    let p = ensure_ledgerscan_home()?.join("layout.toml");
    if p.exists() {
        println!("Layout already exists: {}", p.display());
        return Ok(());
    }
    let s = layout_toml(&StatementLayout::default())?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    println!("Wrote {}", p.display());
    Ok(())
}
