use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelcutError, ReelcutResult};

/// Project-scoped local backup of the serialized project.
pub trait BackupStore {
    fn write(&mut self, project_id: &str, payload: &str) -> ReelcutResult<()>;
    fn read(&self, project_id: &str) -> ReelcutResult<Option<String>>;
    fn clear(&mut self, project_id: &str) -> ReelcutResult<()>;
}

/// `timeline-backup-<project_id>.json`, with anything outside `[A-Za-z0-9_-]` replaced.
pub fn backup_file_name(project_id: &str) -> String {
    let safe: String = project_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("timeline-backup-{safe}.json")
}

/// Backups as files in one directory. Writes go to a temp file and are renamed into
/// place so a crash never leaves a half-written backup.
#[derive(Clone, Debug)]
pub struct FileBackup {
    dir: PathBuf,
}

impl FileBackup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, project_id: &str) -> PathBuf {
        self.dir.join(backup_file_name(project_id))
    }
}

impl BackupStore for FileBackup {
    fn write(&mut self, project_id: &str, payload: &str) -> ReelcutResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(project_id);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, payload)?;
        if let Err(err) = std::fs::rename(&temp_path, &path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(ReelcutError::persistence(format!(
                "failed to move backup into place at {}: {err}",
                path.display()
            )));
        }
        tracing::debug!(path = %path.display(), bytes = payload.len(), "backup written");
        Ok(())
    }

    fn read(&self, project_id: &str) -> ReelcutResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(project_id)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&mut self, project_id: &str) -> ReelcutResult<()> {
        match std::fs::remove_file(self.path_for(project_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Backups kept in memory.
#[derive(Debug, Default)]
pub struct MemoryBackup {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryBackup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BackupStore for MemoryBackup {
    fn write(&mut self, project_id: &str, payload: &str) -> ReelcutResult<()> {
        self.entries
            .insert(project_id.to_string(), payload.to_string());
        self.writes += 1;
        Ok(())
    }

    fn read(&self, project_id: &str) -> ReelcutResult<Option<String>> {
        Ok(self.entries.get(project_id).cloned())
    }

    fn clear(&mut self, project_id: &str) -> ReelcutResult<()> {
        self.entries.remove(project_id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/backup.rs"]
mod tests;
