//! # JSON File Storage
//!
//! Keeps the whole application state in a single file inside the data
//! directory:
//!
//! ```text
//! <data_directory>/
//! ├── config.yaml
//! └── kidsTasksData.json
//! ```
//!
//! Writes go to a temp file first and are renamed over the real one, so a
//! crash mid-write leaves the previous document intact.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::StateStorage;

/// File name of the stored document
pub const STATE_FILE_NAME: &str = "kidsTasksData.json";

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    base_directory: PathBuf,
}

impl JsonFileStorage {
    /// Create storage rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory).with_context(|| {
                format!("Failed to create data directory {:?}", base_directory)
            })?;
            info!("Created data directory: {:?}", base_directory);
        }
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn state_path(&self) -> PathBuf {
        self.base_directory.join(STATE_FILE_NAME)
    }
}

impl StateStorage for JsonFileStorage {
    fn load_document(&self) -> Result<Option<String>> {
        let path = self.state_path();
        if !path.exists() {
            debug!("No state document at {:?}", path);
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state document {:?}", path))?;
        debug!("Read {} bytes from {:?}", content.len(), path);
        Ok(Some(content))
    }

    fn save_document(&self, document: &str) -> Result<()> {
        let path = self.state_path();
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
        }

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, document)
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to move {:?} into place", temp_path))?;

        debug!("Saved state document to {:?}", path);
        Ok(())
    }

    fn location(&self) -> String {
        self.state_path().display().to_string()
    }
}
