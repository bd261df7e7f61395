//! Change debouncing
//!
//! Editors often write a file more than once for a single save. Comparing
//! modification times truncated to whole seconds collapses those writes into
//! one logical change.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::debug;

/// Modification time truncated to whole seconds
pub fn normalize(modified: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(modified).trunc_subsecs(0)
}

/// Per-source record of the last forwarded change
#[derive(Debug, Clone, Default)]
pub struct ChangeDebouncer {
    last: Option<(PathBuf, DateTime<Utc>)>,
}

impl ChangeDebouncer {
    /// Create a debouncer with no prior change
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notification, returning true if it is a new logical change
    pub fn observe(&mut self, path: &Path, modified: SystemTime) -> bool {
        let stamp = normalize(modified);
        let duplicate = self
            .last
            .as_ref()
            .is_some_and(|(last_path, last_stamp)| last_path == path && *last_stamp == stamp);
        if duplicate {
            debug!(?path, %stamp, "ChangeDebouncer::observe: duplicate, discarding");
            return false;
        }

        debug!(?path, %stamp, "ChangeDebouncer::observe: new change");
        self.last = Some((path.to_path_buf(), stamp));
        true
    }

    /// Record a notification using the file's current modification time
    pub fn observe_file(&mut self, path: &Path) -> io::Result<bool> {
        let modified = std::fs::metadata(path)?.modified()?;
        Ok(self.observe(path, modified))
    }

    /// Forget the last change so the next one is always forwarded
    pub fn reset(&mut self) {
        debug!("ChangeDebouncer::reset: called");
        self.last = None;
    }

    /// The last forwarded change, if any
    pub fn last_change(&self) -> Option<(&Path, DateTime<Utc>)> {
        self.last.as_ref().map(|(path, stamp)| (path.as_path(), *stamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[test]
    fn test_normalize_truncates_subseconds() {
        let early = base() + Duration::from_millis(10);
        let late = base() + Duration::from_millis(990);
        assert_eq!(normalize(early), normalize(late));
        assert_ne!(normalize(late), normalize(base() + Duration::from_secs(1)));
    }

    #[test]
    fn test_identical_stamps_forward_once() {
        let mut debouncer = ChangeDebouncer::new();
        let path = Path::new("CSharp/AboutAsserts.cs");

        assert!(debouncer.observe(path, base() + Duration::from_millis(100)));
        assert!(!debouncer.observe(path, base() + Duration::from_millis(400)));
    }

    #[test]
    fn test_differing_stamps_forward_twice() {
        let mut debouncer = ChangeDebouncer::new();
        let path = Path::new("CSharp/AboutAsserts.cs");

        assert!(debouncer.observe(path, base()));
        assert!(debouncer.observe(path, base() + Duration::from_secs(2)));
    }

    #[test]
    fn test_different_path_same_stamp_is_forwarded() {
        let mut debouncer = ChangeDebouncer::new();

        assert!(debouncer.observe(Path::new("CSharp/AboutAsserts.cs"), base()));
        assert!(debouncer.observe(Path::new("CSharp/AboutArrays.cs"), base()));
    }

    #[test]
    fn test_reset_forwards_next_change() {
        let mut debouncer = ChangeDebouncer::new();
        let path = Path::new("VBNet/AboutAsserts.vb");

        assert!(debouncer.observe(path, base()));
        debouncer.reset();
        assert!(debouncer.last_change().is_none());
        assert!(debouncer.observe(path, base()));
    }

    #[test]
    fn test_observe_file_reads_mtime() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("AboutAsserts.cs");
        std::fs::write(&path, "// koan").unwrap();

        let mut debouncer = ChangeDebouncer::new();
        assert!(debouncer.observe_file(&path).unwrap());
        assert!(!debouncer.observe_file(&path).unwrap());

        let (last_path, _) = debouncer.last_change().unwrap();
        assert_eq!(last_path, path.as_path());
    }

    #[test]
    fn test_observe_missing_file_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut debouncer = ChangeDebouncer::new();
        assert!(debouncer.observe_file(&temp.path().join("gone.cs")).is_err());
        assert!(debouncer.last_change().is_none());
    }
}
