//! Porcelain v2 status parsing.
//!
//! `git status --porcelain=v2` is a loose, line-oriented protocol. Three line
//! shapes matter here: ordinary entries (`1 `), rename/copy entries (`2 `,
//! carrying an `orig\tnew` path pair), and untracked entries (`? `). Branch
//! headers (`# ...`) and anything else are noise, not errors. A malformed
//! entry drops that one line, never the whole pass.

use std::path::Path;
use std::process::Command;

use crate::error::{AppError, Result};

/// The kind of change a file has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    Untracked,
}

impl StatusKind {
    /// The single-letter marker shown in the tree.
    pub fn letter(&self) -> char {
        match self {
            StatusKind::Modified => 'M',
            StatusKind::Added => 'A',
            StatusKind::Deleted => 'D',
            StatusKind::Renamed => 'R',
            StatusKind::Copied => 'C',
            StatusKind::Untracked => '?',
        }
    }
}

/// One file's status within a repository.
///
/// At most one record exists per path per snapshot: when a path has both a
/// staged and an unstaged change, the unstaged one is reported and the staged
/// one suppressed (working-tree state wins for display).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Repository-relative path, forward-slash separated.
    pub path: String,
    pub kind: StatusKind,
    /// True when the change is recorded in the index, not the working tree.
    pub staged: bool,
}

/// Run `git status` for a repository and parse its output.
///
/// Fails with [`AppError::StatusUnavailable`] when the command itself cannot
/// run (missing binary, corrupt repository); callers treat that repository as
/// having zero changes rather than aborting the scan.
pub fn status_files(repo: &Path) -> Result<Vec<FileChange>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["status", "--porcelain=v2", "--branch", "--untracked-files=all"])
        .output()
        .map_err(|e| AppError::StatusUnavailable {
            repo: repo.display().to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(AppError::StatusUnavailable {
            repo: repo.display().to_string(),
            reason: format!("exit status {}", output.status),
        });
    }

    Ok(parse_porcelain(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse porcelain v2 output into an ordered list of file changes.
///
/// Emission order is line order; the tree builder relies on it.
pub fn parse_porcelain(raw: &str) -> Vec<FileChange> {
    let mut files = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("1 ") || line.starts_with("2 ") {
            if let Some(change) = parse_ordinary_entry(line) {
                files.push(change);
            }
        } else if let Some(path) = line.strip_prefix("? ") {
            files.push(FileChange {
                path: path.to_string(),
                kind: StatusKind::Untracked,
                staged: false,
            });
        }
    }

    files
}

/// Parse a `1 ` or `2 ` entry.
///
/// Format: `1 XY sub mH mI mW hH hI path`
/// or:     `2 XY sub mH mI mW hH hI X### origPath\tnewPath`
///
/// Only the post-rename path of a `2 ` entry is kept. Returns `None` for
/// entries with too few fields or with neither marker set.
fn parse_ordinary_entry(line: &str) -> Option<FileChange> {
    let is_rename = line.starts_with("2 ");
    // Eight fixed fields before the path; rename entries carry one more
    // (the similarity score). Splitting on spaces only keeps the tab inside
    // the rename pair intact and leaves spaces in paths untouched.
    let fixed_fields = if is_rename { 9 } else { 8 };
    let mut fields = line.splitn(fixed_fields + 1, ' ');

    let _tag = fields.next()?;
    let xy = fields.next()?;
    let mut markers = xy.chars();
    let staged_marker = markers.next()?;
    let unstaged_marker = markers.next()?;

    for _ in 2..fixed_fields {
        fields.next()?;
    }
    let tail = fields.next()?;

    let path = if is_rename {
        match tail.split_once('\t') {
            Some((_orig, new)) => new.to_string(),
            None => tail.to_string(),
        }
    } else {
        tail.to_string()
    };

    // Prefer showing the unstaged change; fall back to the staged one.
    if unstaged_marker != '.' {
        return Some(FileChange {
            path,
            kind: map_marker(unstaged_marker),
            staged: false,
        });
    }
    if staged_marker != '.' {
        return Some(FileChange {
            path,
            kind: map_marker(staged_marker),
            staged: true,
        });
    }

    None
}

/// Closed marker table; anything unrecognized is treated as a modification.
fn map_marker(marker: char) -> StatusKind {
    match marker {
        'M' => StatusKind::Modified,
        'A' => StatusKind::Added,
        'D' => StatusKind::Deleted,
        'R' => StatusKind::Renamed,
        'C' => StatusKind::Copied,
        _ => StatusKind::Modified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstaged_modification() {
        let files = parse_porcelain("1 .M N... 100644 100644 100644 abc def src/main.rs\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/main.rs");
        assert_eq!(files[0].kind, StatusKind::Modified);
        assert!(!files[0].staged);
    }

    #[test]
    fn staged_only_addition() {
        let files = parse_porcelain("1 A. N... 000000 100644 100644 000 abc new.txt\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, StatusKind::Added);
        assert!(files[0].staged);
    }

    #[test]
    fn unstaged_wins_over_staged() {
        // Staged 'A' and unstaged 'M': the unstaged marker determines the record.
        let files = parse_porcelain("1 AM N... 000000 100644 100644 000 abc new.txt\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, StatusKind::Modified);
        assert!(!files[0].staged);
    }

    #[test]
    fn neither_marker_emits_nothing() {
        let files = parse_porcelain("1 .. N... 100644 100644 100644 abc abc file.txt\n");
        assert!(files.is_empty());
    }

    #[test]
    fn rename_keeps_new_path() {
        let files =
            parse_porcelain("2 R. N... 100644 100644 100644 abc def R100 old.rs\tnew.rs\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "new.rs");
        assert_eq!(files[0].kind, StatusKind::Renamed);
        assert!(files[0].staged);
    }

    #[test]
    fn untracked_entry() {
        let files = parse_porcelain("? notes.md\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "notes.md");
        assert_eq!(files[0].kind, StatusKind::Untracked);
        assert!(!files[0].staged);
    }

    #[test]
    fn headers_and_blanks_skipped() {
        let raw = "# branch.oid abc123\n# branch.head main\n\n? a.txt\n";
        let files = parse_porcelain(raw);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "a.txt");
    }

    #[test]
    fn malformed_line_dropped() {
        // Too few fields for an ordinary entry; must not panic or emit.
        let files = parse_porcelain("1 .M N...\n? ok.txt\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "ok.txt");
    }

    #[test]
    fn unknown_marker_maps_to_modified() {
        let files = parse_porcelain("1 .T N... 100644 100644 100644 abc def typechange\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, StatusKind::Modified);
    }

    #[test]
    fn emission_order_is_line_order() {
        let raw = "? z.txt\n1 .M N... 100644 100644 100644 abc def a.txt\n? b.txt\n";
        let files = parse_porcelain(raw);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["z.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn deleted_and_copied_markers() {
        let raw = "1 .D N... 100644 100644 000000 abc 000 gone.rs\n\
                   2 C. N... 100644 100644 100644 abc def C100 src.rs\tcopy.rs\n";
        let files = parse_porcelain(raw);
        assert_eq!(files[0].kind, StatusKind::Deleted);
        assert_eq!(files[1].kind, StatusKind::Copied);
        assert_eq!(files[1].path, "copy.rs");
    }

    #[test]
    fn path_with_spaces_survives() {
        let files = parse_porcelain("1 .M N... 100644 100644 100644 abc def my notes file.txt\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "my notes file.txt");
    }

    #[test]
    fn status_letters() {
        assert_eq!(StatusKind::Modified.letter(), 'M');
        assert_eq!(StatusKind::Untracked.letter(), '?');
        assert_eq!(StatusKind::Renamed.letter(), 'R');
    }
}
