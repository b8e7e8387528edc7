//! Repository discovery.
//!
//! Walks the scan root breadth-first down to a configured depth, collecting
//! every directory that directly contains a `.git` directory. Each pass
//! produces a fresh, immutable snapshot; nothing here mutates prior results.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{AppError, Result};
use crate::git::status::{status_files, FileChange};

/// One discovered working tree, with its change list.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Absolute path to the working tree.
    pub path: PathBuf,
    /// Path relative to the scan root; the root itself displays as its
    /// absolute path.
    pub display_path: String,
    pub branch: String,
    /// Ordered as the status parser emitted them; never re-sorted.
    pub files: Vec<FileChange>,
}

/// Scan `root` for git repositories down to `max_depth` levels of
/// subdirectories (depth 1 = immediate children).
///
/// Best-effort: unreadable directories are skipped, a repository whose status
/// command fails is reported with zero changes. The returned list places the
/// root first (if it qualifies), then the rest sorted by display path.
pub fn scan_repos(root: &Path, max_depth: usize) -> Vec<Repository> {
    let mut repos = Vec::new();

    if is_repo(root) {
        repos.push(build_repo(root, root));
    }

    let mut level = vec![root.to_path_buf()];
    for _ in 0..max_depth.max(1) {
        let mut next = Vec::new();
        for dir in &level {
            let entries = match list_subdirs(dir) {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for sub in entries {
                if is_repo(&sub) {
                    repos.push(build_repo(root, &sub));
                }
                next.push(sub);
            }
        }
        level = next;
    }

    let root_display = root.display().to_string();
    repos.sort_by(|a, b| {
        let a_is_root = a.display_path == root_display;
        let b_is_root = b.display_path == root_display;
        b_is_root
            .cmp(&a_is_root)
            .then_with(|| a.display_path.cmp(&b.display_path))
    });

    repos
}

/// List the non-hidden subdirectories of `dir`.
fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).map_err(|_| AppError::DirectoryUnreadable(dir.display().to_string()))?;

    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    Ok(subdirs)
}

/// A directory is a repository iff it directly contains a `.git` directory.
fn is_repo(path: &Path) -> bool {
    path.join(".git").is_dir()
}

fn build_repo(root: &Path, repo_path: &Path) -> Repository {
    let display_path = if repo_path == root {
        root.display().to_string()
    } else {
        repo_path
            .strip_prefix(root)
            .map(|rel| rel.display().to_string())
            .unwrap_or_else(|_| repo_path.display().to_string())
    };

    let branch = resolve_branch(repo_path).unwrap_or_else(|_| "unknown".to_string());
    let files = status_files(repo_path).unwrap_or_default();

    Repository {
        path: repo_path.to_path_buf(),
        display_path,
        branch,
        files,
    }
}

/// Resolve the current branch name.
///
/// Tries `git rev-parse --abbrev-ref HEAD` first; on failure (no commits yet,
/// no git binary) falls back to reading `.git/HEAD` and stripping the
/// symbolic-ref prefix.
pub fn resolve_branch(repo: &Path) -> Result<String> {
    if let Ok(output) = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
    {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return Ok(name);
            }
        }
    }

    let head = fs::read_to_string(repo.join(".git").join("HEAD"))
        .map_err(|_| AppError::BranchUnresolved(repo.display().to_string()))?;
    let head = head.trim();
    Ok(head
        .strip_prefix("ref: refs/heads/")
        .unwrap_or(head)
        .to_string())
}
