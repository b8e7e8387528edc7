use std::path::PathBuf;

use crate::config::{AppConfig, DiffPosition};
use crate::git::scan::Repository;
use crate::git::status::StatusKind;
use crate::theme::{resolve_theme, ThemeColors};
use crate::tree::{ChangeTree, NodeKind};

/// Which panel has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Tree,
    Diff,
}

/// A file row resolved to something the git collaborators can act on.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub repo_path: PathBuf,
    pub file_path: String,
    pub untracked: bool,
}

/// What a confirmed menu entry does.
#[derive(Debug, Clone)]
pub enum MenuAction {
    Discard(SelectedFile),
    Cancel,
}

#[derive(Debug)]
pub struct MenuOption {
    /// Shortcut key shown next to the label, if any.
    pub key: Option<char>,
    pub label: String,
    pub action: MenuAction,
}

/// A centered modal menu; only the discard confirmation uses it.
#[derive(Debug)]
pub struct MenuState {
    pub title: String,
    pub options: Vec<MenuOption>,
    pub cursor: usize,
}

/// Main application state, owned exclusively by the control loop.
pub struct App {
    pub config: AppConfig,
    pub theme: ThemeColors,
    /// Absolute scan root.
    pub root: PathBuf,
    /// Current immutable repositories snapshot; replaced wholesale per pass.
    pub repos: Vec<Repository>,
    pub tree: ChangeTree,

    pub diff_open: bool,
    pub diff_file: String,
    pub diff_lines: Vec<String>,
    pub diff_scroll: usize,
    pub diff_position: DiffPosition,

    pub focus: Panel,
    pub menu: Option<MenuState>,
    /// Set by the key handler; the control loop suspends the TUI and runs the
    /// editor, then clears it.
    pub pending_editor: Option<SelectedFile>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, root: PathBuf) -> Self {
        let theme = resolve_theme(&config.theme);
        let diff_position = config.diff_position();
        Self {
            config,
            theme,
            root,
            repos: Vec::new(),
            tree: ChangeTree::new(),
            diff_open: false,
            diff_file: String::new(),
            diff_lines: Vec::new(),
            diff_scroll: 0,
            diff_position,
            focus: Panel::Tree,
            menu: None,
            pending_editor: None,
            status_message: None,
            should_quit: false,
        }
    }

    /// Replace the repositories snapshot and rebuild the tree, carrying
    /// collapse state over by semantic path and clamping the cursor.
    pub fn apply_snapshot(&mut self, repos: Vec<Repository>) {
        let prev = self.tree.collapse_state(&self.repos);
        self.tree.rebuild(&repos, &prev);
        self.repos = repos;
    }

    /// The selected row resolved to a file, if a file row is selected.
    pub fn selected_file(&self) -> Option<SelectedFile> {
        let node = self.tree.selected_node()?;
        let NodeKind::File { repo, file } = &node.kind else {
            return None;
        };
        let repository = self.repos.get(*repo)?;
        let change = repository.files.get(*file)?;
        Some(SelectedFile {
            repo_path: repository.path.clone(),
            file_path: change.path.clone(),
            untracked: change.kind == StatusKind::Untracked,
        })
    }

    pub fn open_diff(&mut self, file: String, content: String) {
        self.diff_file = file;
        self.diff_lines = content.lines().map(str::to_string).collect();
        self.diff_scroll = 0;
        self.diff_open = true;
    }

    pub fn close_diff(&mut self) {
        self.diff_open = false;
        self.diff_lines.clear();
        self.diff_scroll = 0;
        self.focus = Panel::Tree;
    }

    pub fn diff_scroll_down(&mut self) {
        if self.diff_scroll + 1 < self.diff_lines.len() {
            self.diff_scroll += 1;
        }
    }

    pub fn diff_scroll_up(&mut self) {
        self.diff_scroll = self.diff_scroll.saturating_sub(1);
    }

    /// Open the discard confirmation menu for the selected file.
    pub fn open_discard_menu(&mut self) {
        let Some(selected) = self.selected_file() else {
            return;
        };
        self.menu = Some(MenuState {
            title: "Discard changes".to_string(),
            options: vec![
                MenuOption {
                    key: Some('x'),
                    label: "Discard all changes".to_string(),
                    action: MenuAction::Discard(selected),
                },
                MenuOption {
                    key: None,
                    label: "Cancel".to_string(),
                    action: MenuAction::Cancel,
                },
            ],
            cursor: 0,
        });
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    pub fn total_files(&self) -> usize {
        self.repos.iter().map(|r| r.files.len()).sum()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
