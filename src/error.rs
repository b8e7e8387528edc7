use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// Everything inside the scan/parse/build pipeline degrades to a placeholder
/// value instead of aborting the pass; these variants exist so each partial
/// failure has a name at the point where it is swallowed.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid root path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// `git status` could not run for one repository.
    /// The repository is shown with zero changes; the scan continues.
    #[error("git status unavailable for {repo}: {reason}")]
    StatusUnavailable { repo: String, reason: String },

    /// A candidate subdirectory could not be listed during discovery.
    /// The directory is skipped; the scan continues.
    #[error("cannot list directory {0}")]
    DirectoryUnreadable(String),

    /// Both branch resolution strategies failed; displayed as "unknown".
    #[error("cannot resolve branch for {0}")]
    BranchUnresolved(String),

    /// Diff retrieval failed; shown as inline text in the diff panel.
    #[error("diff unavailable: {0}")]
    DiffUnavailable(String),

    /// The external editor could not be launched.
    #[error("editor launch failed: {0}")]
    EditorLaunchFailed(String),
}
