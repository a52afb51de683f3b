use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::{CLEANUP_TARGET, CleanupReport};

/// Deletes every direct entry of `base_dir` whose name starts with `prefix`.
///
/// Matching directories are emptied depth-first before they are removed.
/// Symbolic links are removed as links and never followed. A missing or
/// unreadable `base_dir` is treated as having nothing to delete, and an empty
/// prefix deletes nothing.
pub fn delete_matching(base_dir: &Path, prefix: &str) -> CleanupReport {
    let mut report = CleanupReport::default();
    if prefix.is_empty() {
        warn!(
            target: CLEANUP_TARGET,
            dir = %base_dir.display(),
            "refusing to match every entry with an empty prefix"
        );
        return report;
    }

    let Ok(entries) = fs::read_dir(base_dir) else {
        debug!(
            target: CLEANUP_TARGET,
            dir = %base_dir.display(),
            "directory not readable; nothing to delete"
        );
        return report;
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        if name.as_encoded_bytes().starts_with(prefix.as_bytes()) {
            report.absorb(remove_tree(&entry.path()));
        }
    }
    report
}

fn remove_tree(path: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) => {
            record(&mut report, path, Err(error));
            return report;
        }
    };

    if metadata.is_dir() {
        if let Ok(children) = fs::read_dir(path) {
            for child in children.flatten() {
                report.absorb(remove_tree(&child.path()));
            }
        }
        record(&mut report, path, fs::remove_dir(path));
    } else {
        record(&mut report, path, fs::remove_file(path));
    }
    report
}

fn record(report: &mut CleanupReport, path: &Path, outcome: io::Result<()>) {
    match outcome {
        Ok(()) => report.removed += 1,
        // Removed concurrently; nothing left to do.
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            warn!(target: CLEANUP_TARGET, path = %path.display(), %error, "failed to delete entry");
            report.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, b"x").expect("write file");
    }

    #[rstest]
    fn removes_only_prefixed_entries(dir: TempDir) {
        for name in ["foo.log", "foo.data", "bar.log"] {
            touch(&dir.path().join(name));
        }

        let report = delete_matching(dir.path(), "foo");

        assert_eq!(report, CleanupReport { removed: 2, failed: 0 });
        assert!(!dir.path().join("foo.log").exists());
        assert!(!dir.path().join("foo.data").exists());
        assert!(dir.path().join("bar.log").exists());
    }

    #[rstest]
    fn removes_nested_directories_depth_first(dir: TempDir) {
        touch(&dir.path().join("foo/a.txt"));
        touch(&dir.path().join("foo/sub/b.txt"));
        touch(&dir.path().join("foo/sub/deeper/c.txt"));
        touch(&dir.path().join("keep/foo.txt"));

        let report = delete_matching(dir.path(), "foo");

        assert!(!dir.path().join("foo").exists(), "tree should be gone");
        assert!(dir.path().join("keep/foo.txt").exists(), "only direct entries match");
        // Three files plus foo, foo/sub and foo/sub/deeper.
        assert_eq!(report.removed, 6);
        assert!(report.is_clean());
    }

    #[rstest]
    fn missing_directory_is_a_no_op(dir: TempDir) {
        let report = delete_matching(&dir.path().join("absent"), "foo");
        assert_eq!(report, CleanupReport::default());
    }

    #[rstest]
    fn empty_prefix_deletes_nothing(dir: TempDir) {
        touch(&dir.path().join("foo.log"));
        let report = delete_matching(dir.path(), "");
        assert_eq!(report, CleanupReport::default());
        assert!(dir.path().join("foo.log").exists());
    }

    #[rstest]
    fn path_like_prefix_never_matches_a_direct_entry(dir: TempDir) {
        touch(&dir.path().join("data/testdb.log"));
        let report = delete_matching(dir.path(), "data/testdb");
        assert_eq!(report, CleanupReport::default());
        assert!(dir.path().join("data/testdb.log").exists());
    }

    #[cfg(unix)]
    #[rstest]
    fn symlinked_directories_are_not_followed(dir: TempDir) {
        let outside = TempDir::new().expect("create outside dir");
        touch(&outside.path().join("precious.txt"));
        std::os::unix::fs::symlink(outside.path(), dir.path().join("foo-link"))
            .expect("create symlink");

        let report = delete_matching(dir.path(), "foo");

        assert_eq!(report.removed, 1);
        assert!(!dir.path().join("foo-link").exists());
        assert!(outside.path().join("precious.txt").exists());
    }

    #[cfg(unix)]
    #[rstest]
    fn undeletable_entries_are_counted_and_the_scan_continues(dir: TempDir) {
        use std::os::unix::fs::PermissionsExt;

        if nix::unistd::Uid::effective().is_root() {
            // Permission bits do not stop root.
            return;
        }
        let locked = dir.path().join("testdb.tmp");
        touch(&locked.join("held.txt"));
        touch(&dir.path().join("testdb.log"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).expect("lock directory");

        let report = delete_matching(dir.path(), "testdb");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("unlock directory");
        // The held file and its non-empty parent.
        assert_eq!(report, CleanupReport { removed: 1, failed: 2 });
        assert!(!report.is_clean());
        assert!(!dir.path().join("testdb.log").exists());
        assert!(locked.join("held.txt").exists());
    }
}
