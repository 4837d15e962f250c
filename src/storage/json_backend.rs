use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    core::utils::{app_data_dir, data_file_in, ensure_dir},
    errors::LedgerError,
    ledger::{Ledger, MAX_INSTALLMENTS},
};

use super::{Result, StorageBackend};

const TMP_SUFFIX: &str = "tmp";

/// Keeps the whole ledger in one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage at `products.json` under the application data directory.
    pub fn new_default() -> Self {
        Self::new(data_file_in(&app_data_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no data file yet, starting empty");
            return Ok(Ledger::default());
        }
        load_ledger_from_path(&self.path)
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        save_ledger_to_path(ledger, &self.path)
    }
}

/// Writes `ledger` next to `path` first and renames it into place.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(ledger)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), products = ledger.product_count(), "ledger saved");
    Ok(())
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Err(LedgerError::InvalidOperation(format!(
            "data file `{}` is empty",
            path.display()
        )));
    }
    let mut ledger: Ledger = serde_json::from_str(&data)?;
    ledger.normalize();
    if let Some((idx, product)) = ledger
        .products
        .iter()
        .enumerate()
        .find(|(_, product)| product.installments > MAX_INSTALLMENTS)
    {
        return Err(LedgerError::Validation(format!(
            "product #{} `{}` has {} installments, the limit is {MAX_INSTALLMENTS}",
            idx + 1,
            product.name,
            product.installments
        )));
    }
    debug!(path = %path.display(), products = ledger.product_count(), "ledger loaded");
    Ok(ledger)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
