//! User profile persistence with file locking.

use crate::{Error, Result, UserProfile};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl UserProfile {
    /// Check that weight and height are positive, finite numbers
    pub fn validate(&self) -> Result<()> {
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(Error::InvalidProfile(format!(
                "weight {} kg must be positive",
                self.weight_kg
            )));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(Error::InvalidProfile(format!(
                "height {} cm must be positive",
                self.height_cm
            )));
        }
        Ok(())
    }

    /// Load the profile from a file with shared locking
    ///
    /// Returns the default profile if the file doesn't exist, is corrupted,
    /// or holds measurements the energy model can't use.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No profile file found, using default profile");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open profile {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock profile {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read profile {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        let profile = match serde_json::from_str::<UserProfile>(&contents) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Failed to parse profile {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = profile.validate() {
            tracing::warn!("Stored profile {:?} rejected: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        tracing::debug!("Loaded profile from {:?}", path);
        Ok(profile)
    }

    /// Save the profile atomically (temp file, fsync, rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let parent = path
            .parent()
            .ok_or_else(|| Error::Other("profile path missing parent".into()))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }

    /// Load the profile, modify it, and save it back
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut UserProfile) -> Result<()>,
    {
        let mut profile = Self::load(path)?;
        f(&mut profile)?;
        profile.save(path)?;
        Ok(profile)
    }
}
