//! Storage Backend for Experiment Tracking
//!
//! Provides storage backends for persisting runs.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::tracker::Run;
use crate::error::Result;

/// Storage backend trait
pub trait StorageBackend {
    /// Persist a run, returning where it was written
    fn save_run(&self, run: &Run) -> Result<PathBuf>;

    /// Load a previously saved run
    fn load_run(&self, run_id: &str) -> Result<Run>;

    /// Ids of all saved runs
    fn list_runs(&self) -> Result<Vec<String>>;
}

/// Local file system storage backend, one JSON file per run
pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn run_file(&self, run_id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", run_id))
    }
}

impl StorageBackend for LocalStorage {
    fn save_run(&self, run: &Run) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_dir)?;

        let path = self.run_file(&run.run_id);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, run)?;

        debug!("Wrote run file {}", path.display());
        Ok(path)
    }

    fn load_run(&self, run_id: &str) -> Result<Run> {
        let contents = fs::read_to_string(self.run_file(run_id))?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn list_runs(&self) -> Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<String> = fs::read_dir(&self.base_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        ids.sort();
        Ok(ids)
    }
}
