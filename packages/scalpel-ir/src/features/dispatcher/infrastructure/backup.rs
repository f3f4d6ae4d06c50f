//! Backup discipline for mutating tools (spec.md §4.9, §6:
//! `{original}.bak-{timestamp}`).

use std::path::{Path, PathBuf};

use crate::errors::{Result, ScalpelError};

/// `timestamp` is caller-supplied (an ISO-8601 string) rather than read
/// from the clock here, so backup naming stays deterministic and testable.
pub fn write_backup(original: &Path, content: &str, timestamp: &str) -> Result<PathBuf> {
    let backup_path = backup_path_for(original, timestamp);
    std::fs::write(&backup_path, content).map_err(ScalpelError::from)?;
    Ok(backup_path)
}

pub fn restore_backup(original: &Path, backup_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(backup_path).map_err(ScalpelError::from)?;
    std::fs::write(original, content).map_err(ScalpelError::from)?;
    Ok(())
}

pub fn backup_path_for(original: &Path, timestamp: &str) -> PathBuf {
    let mut name = original.as_os_str().to_owned();
    name.push(format!(".bak-{timestamp}"));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_path_appends_the_timestamp_suffix() {
        let path = backup_path_for(Path::new("m.py"), "2026-07-28T00-00-00Z");
        assert_eq!(path, PathBuf::from("m.py.bak-2026-07-28T00-00-00Z"));
    }

    #[test]
    fn write_then_restore_round_trips_original_content() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("m.py");
        std::fs::write(&original, "before").unwrap();
        let backup = write_backup(&original, "before", "2026-07-28T00-00-00Z").unwrap();
        std::fs::write(&original, "after").unwrap();
        restore_backup(&original, &backup).unwrap();
        assert_eq!(std::fs::read_to_string(&original).unwrap(), "before");
    }
}
