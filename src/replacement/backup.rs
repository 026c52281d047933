//! Collision-free, verified backups of the word-list file.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::ReplacementConfig;
use crate::error::{Result, WordbookError};

/// Upper bound on numbered backup names tried before giving up.
const MAX_BACKUP_SLOTS: u32 = 10_000;

/// Directory holding `path`, treating a bare file name as the current directory.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Backup name for slot `slot`: `<file><suffix>` for slot 0, then
/// `<file><suffix>.1`, `<file><suffix>.2`, ...
fn slot_path(path: &Path, config: &ReplacementConfig, slot: u32) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        WordbookError::invalid_argument(format!("{} has no file name", path.display()))
    })?;
    let dir = config
        .backup_dir
        .as_deref()
        .unwrap_or_else(|| parent_dir(path));

    let mut name = file_name.to_os_string();
    name.push(&config.backup_suffix);
    if slot > 0 {
        name.push(format!(".{slot}"));
    }
    Ok(dir.join(name))
}

/// First backup path for `path` that does not exist yet.
pub fn backup_path_for(path: &Path, config: &ReplacementConfig) -> Result<PathBuf> {
    for slot in 0..MAX_BACKUP_SLOTS {
        let candidate = slot_path(path, config, slot)?;
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(WordbookError::backup(
        slot_path(path, config, 0)?,
        io::Error::new(ErrorKind::AlreadyExists, "no free backup name"),
    ))
}

/// Write `contents` as a new backup of `path` and verify it by reading it back.
///
/// Existing files are never overwritten: a name taken between the existence
/// check and the create moves on to the next slot.
pub fn write_backup(path: &Path, contents: &[u8], config: &ReplacementConfig) -> Result<PathBuf> {
    let mut slot_hint = 0;
    loop {
        let backup_path = backup_path_for(path, config)?;
        let opened = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&backup_path);

        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists && slot_hint < MAX_BACKUP_SLOTS => {
                slot_hint += 1;
                continue;
            }
            Err(e) => return Err(WordbookError::backup(backup_path, e)),
        };

        file.write_all(contents)
            .and_then(|_| file.sync_all())
            .map_err(|e| WordbookError::backup(&backup_path, e))?;
        drop(file);

        let written = fs::read(&backup_path).map_err(|e| WordbookError::backup(&backup_path, e))?;
        if written != contents {
            return Err(WordbookError::backup(
                backup_path,
                io::Error::new(ErrorKind::InvalidData, "backup content does not match the original"),
            ));
        }

        debug!("backup of {} written to {}", path.display(), backup_path.display());
        return Ok(backup_path);
    }
}
