// CSV-backed collection storage
// Each record kind lives in one file that is always rewritten whole.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::Record;

/// Reads and writes whole collections under a data directory.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    data_dir: PathBuf,
}

impl CsvStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for<T: Record>(&self) -> PathBuf {
        self.data_dir.join(T::FILE_NAME)
    }

    /// Load every record of `T`.
    ///
    /// A missing file is an empty collection. A single malformed row discards
    /// the whole collection for this call; the file itself is left as is.
    pub fn load<T: Record>(&self) -> AppResult<Vec<T>> {
        let path = self.path_for::<T>();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist, starting with an empty collection", path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to open {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<T>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        collection = T::KIND.as_str(),
                        row = row + 1,
                        "Malformed row in {}, loading empty collection: {}",
                        path.display(),
                        e
                    );
                    return Ok(Vec::new());
                }
            }
        }

        debug!("Loaded {} {} records", records.len(), T::KIND.as_str());
        Ok(records)
    }

    /// Replace the stored collection with `records`.
    ///
    /// Rows go to a temp file in the data directory which is then renamed over
    /// the target, so readers see either the old or the new collection.
    pub fn save<T: Record>(&self, records: &[T]) -> AppResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            AppError::Storage(format!(
                "Failed to create data directory {}: {}",
                self.data_dir.display(),
                e
            ))
        })?;

        let path = self.path_for::<T>();
        let tmp_path = self.data_dir.join(format!(".{}.tmp", T::FILE_NAME));

        let file = File::create(&tmp_path).map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", tmp_path.display(), e))
        })?;
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&file);
            writer.write_record(T::HEADERS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &path).map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        debug!("Saved {} {} records", records.len(), T::KIND.as_str());
        Ok(())
    }
}
