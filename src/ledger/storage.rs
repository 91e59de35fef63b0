use super::types::LedgerData;
use crate::error::{LedgerError, Result};
use anyhow::Context;
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default ledger file path (~/.config/holdem-ledger/data.json)
pub fn get_data_path() -> PathBuf {
    crate::config::get_config_dir().join("data.json")
}

/// Load the ledger document from a JSON file
///
/// If the file doesn't exist, returns the default document (no games, default rules).
/// A file that exists but cannot be read or decoded is an error.
pub fn load_ledger(path: &Path) -> Result<LedgerData> {
    if !path.exists() {
        log::info!(
            "No ledger at {}; starting from an empty ledger",
            path.display()
        );
        return Ok(LedgerData::default());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open ledger file at {}", path.display()))
        .map_err(|e| LedgerError::store(path, e))?;

    let data: LedgerData = serde_json::from_reader(std::io::BufReader::new(file))
        .context("Failed to decode ledger document")
        .map_err(|e| LedgerError::store(path, e))?;

    log::info!(
        "Loaded {} games and {} point adjustments from {}",
        data.games.len(),
        data.point_adjustments.len(),
        path.display()
    );

    Ok(data)
}

/// Save the ledger document to a JSON file atomically
///
/// The whole document is rewritten; the last writer wins. Creates the parent
/// directory if it doesn't exist.
pub fn save_ledger(path: &Path, data: &LedgerData) -> Result<()> {
    write_atomic(path, data).map_err(|e| LedgerError::store(path, e))?;
    log::info!("Saved ledger to {}", path.display());
    Ok(())
}

fn write_atomic(path: &Path, data: &LedgerData) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, data).context("Failed to serialize ledger")?;

    file.commit().context("Failed to save ledger")?;

    Ok(())
}
