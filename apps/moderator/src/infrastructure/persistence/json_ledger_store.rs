use crate::domain::{
    errors::LedgerError,
    ledger::{Ledger, LedgerStore},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const LEDGER_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    comments: Ledger,
}

fn default_version() -> u32 {
    LEDGER_FORMAT_VERSION
}

/// Ledger persisted as a single JSON document on the local filesystem.
pub struct JsonLedgerStore {
    path: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LedgerStore for JsonLedgerStore {
    async fn load(&self) -> Result<Ledger, LedgerError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No ledger at {}, starting empty", self.path.display());
                return Ok(Ledger::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        if raw.trim().is_empty() {
            return Ok(Ledger::new());
        }

        let file: LedgerFile = serde_json::from_str(&raw).map_err(|source| LedgerError::Format {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(file.comments)
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let file = LedgerFile {
            version: LEDGER_FORMAT_VERSION,
            updated_at: Some(Utc::now()),
            comments: ledger.clone(),
        };
        let json = serde_json::to_vec_pretty(&file).map_err(|source| LedgerError::Format {
            path: self.path.display().to_string(),
            source,
        })?;

        // Write-then-rename so an interrupted save never truncates the ledger.
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(
            "Saved ledger with {} entries to {}",
            ledger.len(),
            self.path.display()
        );
        Ok(())
    }
}
