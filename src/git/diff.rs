//! Diff retrieval, change discarding, and the external-editor command.
//!
//! All of these shell out to `git` (or `$EDITOR`) and are run off the control
//! loop; their results come back as events or are applied while the TUI is
//! suspended.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{AppError, Result};

/// Load the diff for one file of a repository, as plain (uncolored) text.
///
/// Untracked files are diffed against `/dev/null`; a tracked file with an
/// empty working-tree diff is retried against the index (`--cached`). The
/// placeholder strings stand in for genuinely empty diffs.
pub fn load_diff(repo: &Path, file: &str) -> Result<String> {
    if !is_tracked(repo, file) {
        let abs = repo.join(file);
        let out = git_output(
            repo,
            &["diff", "--no-index", "--", "/dev/null", &abs.to_string_lossy()],
        )
        // --no-index exits non-zero when the files differ; stdout still
        // carries the diff, so only a spawn failure is an error here.
        .unwrap_or_default();
        if out.is_empty() {
            return Ok("(new untracked file)".to_string());
        }
        return Ok(out);
    }

    let out = git_output(repo, &["diff", "--", file])?;
    if !out.is_empty() {
        return Ok(out);
    }

    let cached = git_output(repo, &["diff", "--cached", "--", file])?;
    if cached.is_empty() {
        return Ok("(no changes)".to_string());
    }
    Ok(cached)
}

/// Discard all changes to one file: delete it when untracked, otherwise reset
/// index and working tree to HEAD.
pub fn discard_changes(repo: &Path, file: &str, untracked: bool) -> Result<()> {
    if untracked {
        std::fs::remove_file(repo.join(file))?;
        return Ok(());
    }

    let status = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["checkout", "HEAD", "--", file])
        .status()
        .map_err(|e| AppError::DiffUnavailable(e.to_string()))?;
    if !status.success() {
        return Err(AppError::DiffUnavailable(format!(
            "git checkout failed with {}",
            status
        )));
    }
    Ok(())
}

/// Build the editor invocation for a file: `$EDITOR` (default `vi`), split on
/// whitespace so values like `"code -w"` work, with the absolute path appended.
pub fn editor_command(repo: &Path, file: &str) -> Result<Command> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| AppError::EditorLaunchFailed("$EDITOR is empty".to_string()))?;

    let mut cmd = Command::new(program);
    cmd.args(parts);
    cmd.arg(abs_path(repo, file));
    Ok(cmd)
}

fn abs_path(repo: &Path, file: &str) -> PathBuf {
    repo.join(file)
}

/// Whether git knows the file (untracked files need a different diff form).
fn is_tracked(repo: &Path, file: &str) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["ls-files", "--error-unmatch", "--", file])
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn git_output(repo: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|e| AppError::DiffUnavailable(e.to_string()))?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test body: EDITOR is process-global and tests run in parallel.
    #[test]
    fn editor_command_from_env() {
        std::env::set_var("EDITOR", "code -w");
        let cmd = editor_command(Path::new("/repo"), "src/main.rs").unwrap();
        assert_eq!(cmd.get_program(), "code");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
        assert_eq!(args, vec!["-w", "/repo/src/main.rs"]);

        std::env::remove_var("EDITOR");
        let cmd = editor_command(Path::new("/repo"), "a.txt").unwrap();
        assert_eq!(cmd.get_program(), "vi");
    }

    #[test]
    fn discard_untracked_removes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("scratch.txt"), "x").unwrap();

        discard_changes(dir.path(), "scratch.txt", true).unwrap();
        assert!(!dir.path().join("scratch.txt").exists());
    }

    #[test]
    fn discard_untracked_missing_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(discard_changes(dir.path(), "absent.txt", true).is_err());
    }
}
