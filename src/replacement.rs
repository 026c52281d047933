//! Rewriting the word list with verified replacements.
//!
//! [`ReplacementApplier::apply`] is the pure, in-memory half: it substitutes
//! lines, drops unresolved entries and deduplicates. [`ReplacementApplier::apply_to_file`]
//! adds the file handling. The original is first copied to a verified backup,
//! then the new list replaces it through a temp file and an atomic rename. If
//! the backup cannot be written, the list is left untouched.

pub mod backup;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::ReplacementConfig;
use crate::error::Result;
use crate::report::ChangeRecord;
use crate::vocabulary::normalize_key;

pub use backup::{backup_path_for, write_backup};

/// Result of applying changes to a list in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedList {
    pub lines: Vec<String>,
    /// Lines whose text was substituted.
    pub replaced: usize,
    /// Lines removed as unresolved.
    pub dropped: usize,
    /// Lines removed as duplicates after substitution.
    pub deduplicated: usize,
}

/// What happened to a file that was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub backup_path: PathBuf,
    pub applied: AppliedList,
}

/// Applies change records to word lists.
#[derive(Debug, Clone, Default)]
pub struct ReplacementApplier {
    config: ReplacementConfig,
}

impl ReplacementApplier {
    pub fn new(config: ReplacementConfig) -> Self {
        ReplacementApplier { config }
    }

    pub fn config(&self) -> &ReplacementConfig {
        &self.config
    }

    /// Substitute, drop and deduplicate `lines`.
    ///
    /// A line is replaced when its trimmed text equals a change's `original`
    /// exactly; its leading and trailing whitespace is kept. Other spellings
    /// of a corrected original (case variants) are removed as duplicates of
    /// the replaced line. Lines whose normalized text is in `drop` are removed
    /// unless they were replaced. Blank lines are kept as they are.
    ///
    /// ```
    /// use wordbook::replacement::ReplacementApplier;
    /// use wordbook::report::{ChangeReason, ChangeRecord};
    ///
    /// let lines = vec!["Hapy".to_string(), "dog".to_string(), "wordd".to_string()];
    /// let changes = vec![ChangeRecord::new("Hapy", "happy", ChangeReason::FirstPassCorrection)];
    ///
    /// let applied = ReplacementApplier::default().apply(&lines, &changes, &["wordd".to_string()]);
    /// assert_eq!(applied.lines, vec!["happy", "dog"]);
    /// ```
    pub fn apply(&self, lines: &[String], changes: &[ChangeRecord], drop: &[String]) -> AppliedList {
        let replacements: HashMap<&str, &str> = changes
            .iter()
            .map(|c| (c.original.as_str(), c.replacement.as_str()))
            .collect();
        let corrected: HashSet<String> = changes
            .iter()
            .map(|c| normalize_key(&c.original))
            .collect();
        let drop: HashSet<String> = drop.iter().map(|d| normalize_key(d)).collect();

        let mut applied = AppliedList::default();
        let mut seen = HashSet::new();

        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                applied.lines.push(line.clone());
                continue;
            }

            let (text, replaced) = match replacements.get(trimmed) {
                Some(replacement) => {
                    let leading = &line[..line.len() - line.trim_start().len()];
                    let trailing = &line[line.trim_end().len()..];
                    (format!("{leading}{replacement}{trailing}"), true)
                }
                None => (line.clone(), false),
            };

            if !replaced {
                let key = normalize_key(trimmed);
                if corrected.contains(&key) {
                    applied.deduplicated += 1;
                    continue;
                }
                if drop.contains(&key) {
                    applied.dropped += 1;
                    continue;
                }
            }
            if !seen.insert(normalize_key(&text)) {
                applied.deduplicated += 1;
                continue;
            }
            if replaced {
                applied.replaced += 1;
            }
            applied.lines.push(text);
        }

        applied
    }

    /// Apply changes to the list at `path`, backing it up first.
    ///
    /// Returns `Ok(None)` when the list would not change; in that case the
    /// file is not touched and no backup is made. The rewritten file keeps the
    /// original's line endings and its trailing newline, or lack of one.
    pub fn apply_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        changes: &[ChangeRecord],
        drop: &[String],
    ) -> Result<Option<ApplyOutcome>> {
        let path = path.as_ref();
        let original = fs::read_to_string(path)?;
        let lines: Vec<String> = original.lines().map(str::to_string).collect();

        let applied = self.apply(&lines, changes, drop);
        if applied.lines == lines {
            info!("{} is already up to date", path.display());
            return Ok(None);
        }

        let backup_path = write_backup(path, original.as_bytes(), &self.config)?;

        let line_ending = if original.contains("\r\n") { "\r\n" } else { "\n" };
        let mut contents = applied.lines.join(line_ending);
        if original.ends_with('\n') && !contents.is_empty() {
            contents.push_str(line_ending);
        }

        let mut temp_file = NamedTempFile::new_in(backup::parent_dir(path))?;
        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(path).map_err(|e| {
            warn!("could not replace {}: {}", path.display(), e.error);
            e.error
        })?;

        info!(
            "rewrote {}: {} replaced, {} dropped, {} duplicates removed (backup {})",
            path.display(),
            applied.replaced,
            applied.dropped,
            applied.deduplicated,
            backup_path.display()
        );

        Ok(Some(ApplyOutcome {
            backup_path,
            applied,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WordbookError;
    use crate::report::ChangeReason;
    use tempfile::TempDir;

    fn lines(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn change(original: &str, replacement: &str) -> ChangeRecord {
        ChangeRecord::new(original, replacement, ChangeReason::FirstPassCorrection)
    }

    #[test]
    fn test_apply_preserves_whitespace() {
        let applier = ReplacementApplier::default();
        let applied = applier.apply(&lines(&["  Hapy\t", "dog"]), &[change("Hapy", "happy")], &[]);
        assert_eq!(applied.lines, lines(&["  happy\t", "dog"]));
        assert_eq!(applied.replaced, 1);
    }

    #[test]
    fn test_apply_is_exact_match() {
        let applier = ReplacementApplier::default();
        let applied = applier.apply(&lines(&["Hapyness", "unHapy"]), &[change("Hapy", "happy")], &[]);
        assert_eq!(applied.lines, lines(&["Hapyness", "unHapy"]));
        assert_eq!(applied.replaced, 0);
    }

    #[test]
    fn test_apply_collapses_case_variants_of_corrected_words() {
        let applier = ReplacementApplier::default();
        let applied = applier.apply(
            &lines(&["Hapy", "dog", "hapy", " HAPY "]),
            &[change("Hapy", "happy")],
            &[],
        );
        assert_eq!(applied.lines, lines(&["happy", "dog"]));
        assert_eq!(applied.replaced, 1);
        assert_eq!(applied.deduplicated, 2);
    }

    #[test]
    fn test_case_variant_before_exact_original_is_collapsed() {
        let applier = ReplacementApplier::default();
        let applied = applier.apply(&lines(&["hapy", "Hapy"]), &[change("Hapy", "happy")], &[]);
        assert_eq!(applied.lines, lines(&["happy"]));
        assert_eq!(applied.deduplicated, 1);
    }

    #[test]
    fn test_apply_deduplicates_after_substitution() {
        let applier = ReplacementApplier::default();
        let applied = applier.apply(
            &lines(&["happy", "Hapy", "", "dog", "Dog"]),
            &[change("Hapy", "happy")],
            &[],
        );
        assert_eq!(applied.lines, lines(&["happy", "", "dog"]));
        assert_eq!(applied.deduplicated, 2);
    }

    #[test]
    fn test_apply_drops_unresolved() {
        let applier = ReplacementApplier::default();
        let applied = applier.apply(&lines(&["dog", "wordd"]), &[], &lines(&["Wordd"]));
        assert_eq!(applied.lines, lines(&["dog"]));
        assert_eq!(applied.dropped, 1);
    }

    #[test]
    fn test_apply_to_file_writes_backup_then_list() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("words.txt");
        fs::write(&list, "Hapy\ndog\nwordd\n").unwrap();

        let outcome = ReplacementApplier::default()
            .apply_to_file(&list, &[change("Hapy", "happy")], &lines(&["wordd"]))
            .unwrap()
            .unwrap();

        assert_eq!(fs::read_to_string(&list).unwrap(), "happy\ndog\n");
        assert_eq!(outcome.backup_path, dir.path().join("words.txt.backup"));
        assert_eq!(
            fs::read_to_string(&outcome.backup_path).unwrap(),
            "Hapy\ndog\nwordd\n"
        );
    }

    #[test]
    fn test_apply_to_file_drops_case_variants() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("words.txt");
        fs::write(&list, "Hapy\ndog\nhapy\n").unwrap();

        let outcome = ReplacementApplier::default()
            .apply_to_file(&list, &[change("Hapy", "happy")], &[])
            .unwrap()
            .unwrap();

        assert_eq!(fs::read_to_string(&list).unwrap(), "happy\ndog\n");
        assert_eq!(outcome.applied.deduplicated, 1);
    }

    #[test]
    fn test_apply_to_file_keeps_crlf_line_endings() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("words.txt");
        fs::write(&list, "Hapy\r\ndog\r\nwordd\r\n").unwrap();

        ReplacementApplier::default()
            .apply_to_file(&list, &[change("Hapy", "happy")], &lines(&["wordd"]))
            .unwrap()
            .unwrap();

        assert_eq!(fs::read_to_string(&list).unwrap(), "happy\r\ndog\r\n");
    }

    #[test]
    fn test_apply_to_file_without_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("words.txt");
        fs::write(&list, "Hapy\ndog").unwrap();

        ReplacementApplier::default()
            .apply_to_file(&list, &[change("Hapy", "happy")], &[])
            .unwrap()
            .unwrap();

        assert_eq!(fs::read_to_string(&list).unwrap(), "happy\ndog");
    }

    #[test]
    fn test_unchanged_list_is_not_touched() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("words.txt");
        fs::write(&list, "dog\ncat\n").unwrap();

        let outcome = ReplacementApplier::default()
            .apply_to_file(&list, &[], &[])
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(fs::read_to_string(&list).unwrap(), "dog\ncat\n");
        assert!(!dir.path().join("words.txt.backup").exists());
    }

    #[test]
    fn test_backup_failure_leaves_list_unchanged() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("words.txt");
        fs::write(&list, "Hapy\ndog\n").unwrap();
        let applier = ReplacementApplier::new(ReplacementConfig {
            backup_dir: Some(dir.path().join("no-such-dir")),
            ..Default::default()
        });

        let err = applier
            .apply_to_file(&list, &[change("Hapy", "happy")], &[])
            .unwrap_err();

        assert!(matches!(err, WordbookError::Backup { .. }));
        assert_eq!(fs::read(&list).unwrap(), b"Hapy\ndog\n");
    }

    #[test]
    fn test_missing_list_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ReplacementApplier::default()
            .apply_to_file(dir.path().join("absent.txt"), &[], &[])
            .unwrap_err();
        assert!(matches!(err, WordbookError::Io(_)));
    }
}
