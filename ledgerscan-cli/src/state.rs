use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn ledgerscan_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ledgerscan"))
}

pub fn ensure_ledgerscan_home() -> Result<PathBuf> {
    let dir = ledgerscan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read an input file, or stdin for `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::Read::read_to_end(&mut std::io::stdin(), &mut buf).context("read stdin")?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("read {}", path.display()))
}
