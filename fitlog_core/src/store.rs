//! Record persistence with file locking.
//!
//! Daily records live in a single JSON object keyed by `YYYY-MM-DD`.
//! Each day is decoded on its own, so one malformed day never hides the
//! rest. Writers hold an exclusive lock on a `<file>.lock` sidecar for the
//! whole read-modify-write, then replace the file with a synced temp file.
//! Readers take a shared lock on the data file.

use crate::calendar::{date_key, parse_date_key};
use crate::{Catalog, DailyRecord, Error, Records, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Date-keyed store of daily records
pub trait RecordStore {
    fn get(&self, date: NaiveDate) -> Result<Option<DailyRecord>>;
    fn get_all(&self) -> Result<Records>;
    fn put(&mut self, date: NaiveDate, record: DailyRecord) -> Result<()>;

    /// Read-modify-write one day's record, returning the stored result
    ///
    /// Stores shared between processes override this to make the three
    /// steps atomic.
    fn update(
        &mut self,
        date: NaiveDate,
        f: &mut dyn FnMut(&mut DailyRecord),
    ) -> Result<DailyRecord> {
        let mut record = self.get(date)?.unwrap_or_default();
        f(&mut record);
        self.put(date, record.clone())?;
        Ok(record)
    }
}

/// In-memory store, used by tests and embedders
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Records,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        Ok(self.records.get(&date).cloned())
    }

    fn get_all(&self) -> Result<Records> {
        Ok(self.records.clone())
    }

    fn put(&mut self, date: NaiveDate, record: DailyRecord) -> Result<()> {
        self.records.insert(date, record);
        Ok(())
    }
}

/// Raw file contents, one JSON value per date key
type RawRecords = BTreeMap<String, Value>;

/// What was found on disk
enum RawState {
    Missing,
    Parsed(RawRecords),
    /// Not a JSON object; moved aside before the next write
    Corrupt,
    /// Exists but could not be read; writes refuse to touch it
    Unreadable(std::io::Error),
}

/// JSON file store
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<file><suffix>` next to the data file
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("records.json"));
        name.push(suffix);
        self.path.with_file_name(name)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    fn read_raw(&self) -> RawState {
        if !self.path.exists() {
            tracing::debug!("No record file at {:?}", self.path);
            return RawState::Missing;
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => return RawState::Unreadable(e),
        };

        if let Err(e) = file.lock_shared() {
            return RawState::Unreadable(e);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read = reader.read_to_string(&mut contents);
        let _ = file.unlock();

        if let Err(e) = read {
            return RawState::Unreadable(e);
        }

        match serde_json::from_str::<RawRecords>(&contents) {
            Ok(raw) => RawState::Parsed(raw),
            Err(e) => {
                tracing::warn!("Failed to parse record file {:?}: {}", self.path, e);
                RawState::Corrupt
            }
        }
    }

    /// Decode every well-formed day, skipping bad keys and bad values
    fn decode(raw: &RawRecords) -> Records {
        let mut records = Records::new();
        for (key, value) in raw {
            let date = match parse_date_key(key) {
                Ok(date) => date,
                Err(e) => {
                    tracing::warn!("Skipping record with bad key: {}", e);
                    continue;
                }
            };
            match DailyRecord::deserialize(value) {
                Ok(record) => {
                    records.insert(date, record);
                }
                Err(e) => tracing::warn!("Skipping malformed record for {}: {}", key, e),
            }
        }
        records
    }

    fn load(&self) -> Records {
        match self.read_raw() {
            RawState::Parsed(raw) => {
                let records = Self::decode(&raw);
                tracing::debug!("Loaded {} daily records from {:?}", records.len(), self.path);
                records
            }
            RawState::Missing => Records::new(),
            RawState::Corrupt => {
                tracing::warn!("Record file {:?} is corrupted. Treating as empty.", self.path);
                Records::new()
            }
            RawState::Unreadable(e) => {
                tracing::warn!("Unable to read record file {:?}: {}. Treating as empty.", self.path, e);
                Records::new()
            }
        }
    }

    /// Move a corrupted file aside so its contents survive the next write
    fn quarantine(&self) -> Result<PathBuf> {
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S%.f");
        let target = self.sibling(&format!(".corrupt-{}", stamp));
        std::fs::rename(&self.path, &target)?;
        tracing::warn!("Moved corrupted record file to {:?}", target);
        Ok(target)
    }

    fn save_raw(&self, raw: &RawRecords) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Other("record path missing parent".into()))?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, raw)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} daily records to {:?}", raw.len(), self.path);
        Ok(())
    }

    /// Run `f` on the raw day map while holding the writer lock
    fn modify<T>(&self, f: impl FnOnce(&mut RawRecords) -> Result<T>) -> Result<T> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Other("record path missing parent".into()))?;
        std::fs::create_dir_all(parent)?;

        let lock = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = (|| {
            let mut raw = match self.read_raw() {
                RawState::Missing => RawRecords::new(),
                RawState::Parsed(raw) => raw,
                RawState::Corrupt => {
                    self.quarantine()?;
                    RawRecords::new()
                }
                RawState::Unreadable(e) => return Err(Error::Io(e)),
            };
            let value = f(&mut raw)?;
            self.save_raw(&raw)?;
            Ok(value)
        })();

        let _ = lock.unlock();
        result
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        Ok(self.load().remove(&date))
    }

    fn get_all(&self) -> Result<Records> {
        Ok(self.load())
    }

    fn put(&mut self, date: NaiveDate, record: DailyRecord) -> Result<()> {
        self.modify(|raw| {
            raw.insert(date_key(date), serde_json::to_value(&record)?);
            Ok(())
        })
    }

    fn update(
        &mut self,
        date: NaiveDate,
        f: &mut dyn FnMut(&mut DailyRecord),
    ) -> Result<DailyRecord> {
        self.modify(|raw| {
            let key = date_key(date);
            let mut record = match raw.get(&key).map(|value| DailyRecord::deserialize(value)) {
                Some(Ok(record)) => record,
                Some(Err(e)) => {
                    tracing::warn!("Replacing malformed record for {}: {}", key, e);
                    DailyRecord::default()
                }
                None => DailyRecord::default(),
            };
            f(&mut record);
            raw.insert(key, serde_json::to_value(&record)?);
            Ok(record)
        })
    }
}

/// Check a quantity entered for an exercise
pub fn validate_quantity(exercise: &str, quantity: f64) -> Result<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(Error::InvalidQuantity(format!(
            "{} for '{}' must be a non-negative number",
            quantity, exercise
        )));
    }
    Ok(())
}

/// Log a quantity for one exercise on one day, replacing any earlier value
///
/// Returns the day's updated record.
pub fn set_quantity<S: RecordStore + ?Sized>(
    store: &mut S,
    catalog: &Catalog,
    date: NaiveDate,
    exercise: &str,
    quantity: f64,
) -> Result<DailyRecord> {
    if catalog.get(exercise).is_none() {
        return Err(Error::UnknownExercise(exercise.to_string()));
    }
    validate_quantity(exercise, quantity)?;

    let record = store.update(date, &mut |record: &mut DailyRecord| {
        record.set(exercise, quantity)
    })?;

    tracing::info!("Logged {} {} on {}", quantity, exercise, date);
    Ok(record)
}
