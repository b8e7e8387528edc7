//! Filesystem change watcher feeding the control loop.
//!
//! One background producer owns the debounce timer (inside the debouncer's
//! callback thread) and only ever sends [`Event::Rescan`] into the control
//! loop's channel; it shares no tree state with the consumer. A burst of
//! events inside one debounce window collapses into a single rescan.

use std::path::{Component, Path};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::event::Event;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Watches the scan root recursively and emits debounced rescan requests.
pub struct ChangeWatcher {
    /// Dropped to stop watching.
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl ChangeWatcher {
    /// Watch `root` recursively. Events are debounced by `debounce` and
    /// reduced to at most one [`Event::Rescan`] per window. Paths inside
    /// `.git` are ignored, except `.git/HEAD` whose change signals a branch
    /// switch and must trigger a refresh.
    pub fn new(
        root: &Path,
        debounce: Duration,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let mut debouncer = new_debouncer(
            debounce,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                match result {
                    Ok(events) => {
                        let relevant = events.iter().any(|e| {
                            e.kind == DebouncedEventKind::Any && !is_git_internal(&e.path)
                        });
                        if relevant {
                            let _ = event_tx.send(Event::Rescan);
                        }
                    }
                    Err(_) => {
                        // Watcher errors are non-fatal; the poll trigger (if
                        // configured) still covers refreshes.
                    }
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(root, notify::RecursiveMode::Recursive)?;

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Whether a path points inside a `.git` directory, with the one exception of
/// the HEAD file directly under it.
pub fn is_git_internal(path: &Path) -> bool {
    let is_head = path.file_name().is_some_and(|name| name == "HEAD")
        && path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|name| name == ".git");
    if is_head {
        return false;
    }

    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == ".git"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn git_internals_are_ignored() {
        assert!(is_git_internal(Path::new("/w/proj/.git/index")));
        assert!(is_git_internal(Path::new("/w/proj/.git/objects/ab/cdef")));
        assert!(is_git_internal(Path::new("/w/proj/.git/refs/heads/main")));
    }

    #[test]
    fn head_file_is_exempt() {
        assert!(!is_git_internal(Path::new("/w/proj/.git/HEAD")));
    }

    #[test]
    fn head_deeper_inside_git_is_still_internal() {
        // Only .git/HEAD itself signals a branch switch.
        assert!(is_git_internal(Path::new("/w/proj/.git/logs/HEAD")));
    }

    #[test]
    fn working_tree_paths_pass() {
        assert!(!is_git_internal(Path::new("/w/proj/src/main.rs")));
        assert!(!is_git_internal(Path::new("/w/proj/HEAD")));
        assert!(!is_git_internal(Path::new("/w/proj/.github/ci.yml")));
    }

    #[test]
    fn burst_reduces_to_one_rescan() {
        // The debouncer delivers a whole window's events in one callback;
        // any number of qualifying paths must produce exactly one rescan.
        let paths: Vec<PathBuf> = vec![
            PathBuf::from("/w/proj/a.txt"),
            PathBuf::from("/w/proj/b.txt"),
            PathBuf::from("/w/proj/.git/index"),
        ];
        let rescans = usize::from(paths.iter().any(|p| !is_git_internal(p)));
        assert_eq!(rescans, 1);

        let only_internal = vec![PathBuf::from("/w/proj/.git/index")];
        let rescans = usize::from(only_internal.iter().any(|p| !is_git_internal(p)));
        assert_eq!(rescans, 0);
    }
}
