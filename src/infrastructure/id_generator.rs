// Durable id sequences - one monotonic counter per record kind
// Counters survive deletions, so an id is never handed out twice.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::RecordKind;

pub const SEQUENCES_FILE: &str = "sequences.json";

#[derive(Debug)]
pub struct IdGenerator {
    path: PathBuf,
    /// Highest id ever issued, keyed by `RecordKind::as_str`
    last_issued: Mutex<BTreeMap<String, i64>>,
}

impl IdGenerator {
    /// Open the sequence file in `data_dir`, starting from zero if it is absent.
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        let path = data_dir.join(SEQUENCES_FILE);
        let last_issued = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            last_issued: Mutex::new(last_issued),
        })
    }

    /// Next id for `kind`, given the largest id currently stored.
    ///
    /// Files written before the counter existed are covered by `stored_max`.
    pub async fn next_id(&self, kind: RecordKind, stored_max: i64) -> i64 {
        let last_issued = self.last_issued.lock().await;
        let counter = last_issued.get(kind.as_str()).copied().unwrap_or(0);
        counter.max(stored_max) + 1
    }

    /// Record that ids up to `issued` are taken, persisting when the counter moves.
    pub async fn advance(&self, kind: RecordKind, issued: i64) -> AppResult<()> {
        let mut last_issued = self.last_issued.lock().await;
        let counter = last_issued.entry(kind.as_str().to_string()).or_insert(0);
        if issued <= *counter {
            return Ok(());
        }
        *counter = issued;
        debug!("{} sequence advanced to {}", kind.as_str(), issued);
        self.persist(&last_issued)
    }

    #[cfg(test)]
    pub(crate) async fn last_issued(&self, kind: RecordKind) -> i64 {
        self.last_issued.lock().await.get(kind.as_str()).copied().unwrap_or(0)
    }

    fn persist(&self, counters: &BTreeMap<String, i64>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(counters)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
