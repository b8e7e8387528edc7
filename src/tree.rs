//! The change tree: a flat node arena over one repositories snapshot.
//!
//! The whole node set is rebuilt from scratch on every discovery pass; nothing
//! is patched incrementally. The only state carried across rebuilds is the
//! collapse flag of each repository/directory, matched by semantic path, plus
//! the cursor offset (clamped, not repositioned). Parent/child links are
//! indices into one append-only `Vec`, so "is any ancestor collapsed" is a
//! plain upward index walk with no reference cycles.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::git::scan::Repository;

/// Semantic identity of a collapsible node: repository display path, plus the
/// directory path for directory nodes.
pub type CollapseKey = (String, Option<String>);

/// Collapse flags of a previous tree, keyed by semantic identity.
pub type CollapseMap = HashMap<CollapseKey, bool>;

/// What a tree row represents. Indices point into the repositories snapshot
/// (`repo`) and into that repository's file list (`file`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Repo {
        repo: usize,
    },
    Dir {
        repo: usize,
        /// Last path segment, for display.
        name: String,
        /// Full repository-relative directory path, for identity.
        path: String,
    },
    File {
        repo: usize,
        file: usize,
    },
}

/// One row in the hierarchy.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    /// Indentation level: 0 for a repository, +1 per nesting level.
    pub depth: usize,
    /// Index of the owning node; `None` only for repository roots.
    pub parent: Option<usize>,
    /// Only meaningful for Repo/Dir nodes.
    pub collapsed: bool,
}

impl TreeNode {
    /// Repo and Dir nodes can be collapsed; File nodes cannot.
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, NodeKind::Repo { .. } | NodeKind::Dir { .. })
    }
}

/// The node arena plus its derived visibility list and cursor.
#[derive(Debug, Default)]
pub struct ChangeTree {
    pub nodes: Vec<TreeNode>,
    /// Node indices currently eligible for display, in emission order.
    pub visible: Vec<usize>,
    /// Offset into `visible`; meaningless while `visible` is empty.
    pub cursor: usize,
    pub scroll_offset: usize,
}

impl ChangeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the collapse flags of the current nodes, keyed by semantic
    /// identity, for carry-over into the next build. `repos` must be the
    /// snapshot this tree was built from.
    pub fn collapse_state(&self, repos: &[Repository]) -> CollapseMap {
        let mut map = CollapseMap::new();
        for node in &self.nodes {
            match &node.kind {
                NodeKind::Repo { repo } => {
                    map.insert((repos[*repo].display_path.clone(), None), node.collapsed);
                }
                NodeKind::Dir { repo, path, .. } => {
                    map.insert(
                        (repos[*repo].display_path.clone(), Some(path.clone())),
                        node.collapsed,
                    );
                }
                NodeKind::File { .. } => {}
            }
        }
        map
    }

    /// Replace the node set with one built from `repos`, consulting `prev`
    /// for collapse flags (nodes with no prior match default to expanded).
    /// The cursor offset survives, clamped to the new visibility list.
    pub fn rebuild(&mut self, repos: &[Repository], prev: &CollapseMap) {
        self.nodes.clear();

        for (ri, repo) in repos.iter().enumerate() {
            let repo_node = self.nodes.len();
            self.nodes.push(TreeNode {
                kind: NodeKind::Repo { repo: ri },
                depth: 0,
                parent: None,
                collapsed: carried(prev, &repo.display_path, None),
            });

            // Bucket file indices by containing directory; "" is the repo root.
            let mut dir_files: BTreeMap<String, Vec<usize>> = BTreeMap::new();
            for (fi, file) in repo.files.iter().enumerate() {
                let dir = match file.path.rsplit_once('/') {
                    Some((dir, _)) => dir.to_string(),
                    None => String::new(),
                };
                dir_files.entry(dir).or_default().push(fi);
            }

            // Closed set of directory paths: every proper prefix of every
            // owning directory, so a file at a/b/c.txt forces nodes for both
            // "a" and "a/b".
            let mut all_dirs: BTreeSet<String> = BTreeSet::new();
            for dir in dir_files.keys().filter(|d| !d.is_empty()) {
                let mut prefix = String::new();
                for segment in dir.split('/') {
                    if !prefix.is_empty() {
                        prefix.push('/');
                    }
                    prefix.push_str(segment);
                    all_dirs.insert(prefix.clone());
                }
            }

            let mut dir_nodes: HashMap<String, usize> = HashMap::new();
            for dir in &all_dirs {
                ensure_dir(
                    dir,
                    ri,
                    repo_node,
                    &repo.display_path,
                    &mut self.nodes,
                    &mut dir_nodes,
                    &dir_files,
                    prev,
                );
            }

            // Root-level files come after all subdirectories.
            if let Some(files) = dir_files.get("") {
                for &fi in files {
                    self.nodes.push(TreeNode {
                        kind: NodeKind::File { repo: ri, file: fi },
                        depth: 1,
                        parent: Some(repo_node),
                        collapsed: false,
                    });
                }
            }
        }

        self.recompute_visible();
    }

    /// Recompute the visibility list: a node is visible iff no ancestor is
    /// collapsed. Clamps the cursor afterwards.
    pub fn recompute_visible(&mut self) {
        self.visible.clear();
        for idx in 0..self.nodes.len() {
            if self.ancestors_expanded(idx) {
                self.visible.push(idx);
            }
        }
        if !self.visible.is_empty() && self.cursor >= self.visible.len() {
            self.cursor = self.visible.len() - 1;
        }
        if self.visible.is_empty() {
            self.cursor = 0;
        }
    }

    fn ancestors_expanded(&self, idx: usize) -> bool {
        let mut current = self.nodes[idx].parent;
        while let Some(parent) = current {
            if self.nodes[parent].collapsed {
                return false;
            }
            current = self.nodes[parent].parent;
        }
        true
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The node under the cursor, or `None` when the list is empty.
    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.visible.get(self.cursor).map(|&idx| &self.nodes[idx])
    }

    /// Move selection up one row; clamps at the top, no wraparound.
    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move selection down one row; clamps at the bottom, no wraparound.
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    /// Flip the collapse flag of the selected Repo/Dir node and recompute
    /// visibility. A File selection is a no-op. The cursor offset stays put
    /// (clamped), even though rows may vanish or reappear under it.
    pub fn toggle_collapse(&mut self) {
        let Some(&idx) = self.visible.get(self.cursor) else {
            return;
        };
        if !self.nodes[idx].is_branch() {
            return;
        }
        self.nodes[idx].collapsed = !self.nodes[idx].collapsed;
        self.recompute_visible();
    }

    /// Keep the selected row inside a viewport of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor - visible_height + 1;
        }
    }
}

fn carried(prev: &CollapseMap, repo_display: &str, dir: Option<&str>) -> bool {
    prev.get(&(repo_display.to_string(), dir.map(str::to_string)))
        .copied()
        .unwrap_or(false)
}

/// Create the node for `dir` (and recursively its parents first), then the
/// file nodes bucketed directly under it. Idempotent per directory.
#[allow(clippy::too_many_arguments)]
fn ensure_dir(
    dir: &str,
    repo: usize,
    repo_node: usize,
    repo_display: &str,
    nodes: &mut Vec<TreeNode>,
    dir_nodes: &mut HashMap<String, usize>,
    dir_files: &BTreeMap<String, Vec<usize>>,
    prev: &CollapseMap,
) -> usize {
    if let Some(&idx) = dir_nodes.get(dir) {
        return idx;
    }

    let (parent, name) = match dir.rsplit_once('/') {
        Some((parent_dir, name)) => {
            let parent_idx = ensure_dir(
                parent_dir,
                repo,
                repo_node,
                repo_display,
                nodes,
                dir_nodes,
                dir_files,
                prev,
            );
            (parent_idx, name)
        }
        None => (repo_node, dir),
    };

    let depth = nodes[parent].depth + 1;
    let idx = nodes.len();
    dir_nodes.insert(dir.to_string(), idx);
    nodes.push(TreeNode {
        kind: NodeKind::Dir {
            repo,
            name: name.to_string(),
            path: dir.to_string(),
        },
        depth,
        parent: Some(parent),
        collapsed: carried(prev, repo_display, Some(dir)),
    });

    if let Some(files) = dir_files.get(dir) {
        for &fi in files {
            nodes.push(TreeNode {
                kind: NodeKind::File { repo, file: fi },
                depth: depth + 1,
                parent: Some(idx),
                collapsed: false,
            });
        }
    }

    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::status::{FileChange, StatusKind};
    use std::path::PathBuf;

    fn repo(display: &str, files: &[(&str, StatusKind, bool)]) -> Repository {
        Repository {
            path: PathBuf::from(format!("/tmp/{display}")),
            display_path: display.to_string(),
            branch: "main".to_string(),
            files: files
                .iter()
                .map(|(path, kind, staged)| FileChange {
                    path: path.to_string(),
                    kind: *kind,
                    staged: *staged,
                })
                .collect(),
        }
    }

    fn build(repos: &[Repository]) -> ChangeTree {
        let mut tree = ChangeTree::new();
        tree.rebuild(repos, &CollapseMap::new());
        tree
    }

    fn kinds(tree: &ChangeTree) -> Vec<String> {
        tree.nodes
            .iter()
            .map(|n| match &n.kind {
                NodeKind::Repo { repo } => format!("repo:{repo}"),
                NodeKind::Dir { path, .. } => format!("dir:{path}"),
                NodeKind::File { repo, file } => format!("file:{repo}:{file}"),
            })
            .collect()
    }

    #[test]
    fn single_repo_scenario() {
        // proj: README.md (unstaged M) and src/main.go (unstaged A)
        let repos = vec![repo(
            "proj",
            &[
                ("README.md", StatusKind::Modified, false),
                ("src/main.go", StatusKind::Added, false),
            ],
        )];
        let tree = build(&repos);

        assert_eq!(
            kinds(&tree),
            vec!["repo:0", "dir:src", "file:0:1", "file:0:0"]
        );
        // Nothing collapsed: all four rows visible.
        assert_eq!(tree.visible, vec![0, 1, 2, 3]);

        assert_eq!(tree.nodes[0].depth, 0);
        assert_eq!(tree.nodes[1].depth, 1);
        assert_eq!(tree.nodes[2].depth, 2);
        assert_eq!(tree.nodes[3].depth, 1);
    }

    #[test]
    fn intermediate_directories_are_synthesized() {
        let repos = vec![repo("proj", &[("a/b/c.txt", StatusKind::Modified, false)])];
        let tree = build(&repos);

        assert_eq!(
            kinds(&tree),
            vec!["repo:0", "dir:a", "dir:a/b", "file:0:0"]
        );
        // a/b's parent is a, whose parent is the repo node.
        assert_eq!(tree.nodes[2].parent, Some(1));
        assert_eq!(tree.nodes[1].parent, Some(0));
        assert_eq!(tree.nodes[0].parent, None);
    }

    #[test]
    fn directories_lexicographic_files_in_parser_order() {
        let repos = vec![repo(
            "proj",
            &[
                ("zeta/z.txt", StatusKind::Modified, false),
                ("alpha/second.txt", StatusKind::Modified, false),
                ("alpha/first.txt", StatusKind::Added, false),
                ("top.txt", StatusKind::Untracked, false),
            ],
        )];
        let tree = build(&repos);

        // Dirs in lexicographic order, each followed by its files in parser
        // emission order, root files after all subdirectories.
        assert_eq!(
            kinds(&tree),
            vec![
                "repo:0", "dir:alpha", "file:0:1", "file:0:2", "dir:zeta", "file:0:0", "file:0:3"
            ]
        );
    }

    #[test]
    fn parent_chains_terminate_at_repo_roots() {
        let repos = vec![
            repo("a", &[("x/y/z.txt", StatusKind::Modified, false)]),
            repo("b", &[("f.txt", StatusKind::Added, true)]),
        ];
        let tree = build(&repos);

        for (idx, node) in tree.nodes.iter().enumerate() {
            let mut current = idx;
            let mut hops = 0;
            while let Some(parent) = tree.nodes[current].parent {
                assert!(parent < current, "parents precede children in the arena");
                current = parent;
                hops += 1;
                assert!(hops <= tree.nodes.len(), "no cycles");
            }
            assert!(matches!(tree.nodes[current].kind, NodeKind::Repo { .. }));
        }
    }

    #[test]
    fn build_is_idempotent() {
        let repos = vec![
            repo("a", &[("src/lib.rs", StatusKind::Modified, false)]),
            repo("b", &[("doc/x.md", StatusKind::Deleted, false)]),
        ];
        let first = build(&repos);

        let mut second = ChangeTree::new();
        second.rebuild(&repos, &first.collapse_state(&repos));

        assert_eq!(kinds(&first), kinds(&second));
        assert_eq!(first.visible, second.visible);
        let flags_first: Vec<bool> = first.nodes.iter().map(|n| n.collapsed).collect();
        let flags_second: Vec<bool> = second.nodes.iter().map(|n| n.collapsed).collect();
        assert_eq!(flags_first, flags_second);
    }

    #[test]
    fn collapse_survives_rebuild() {
        let repos = vec![repo(
            "proj",
            &[
                ("src/main.rs", StatusKind::Modified, false),
                ("README.md", StatusKind::Modified, false),
            ],
        )];
        let mut tree = build(&repos);

        // Select the src directory (row 1) and collapse it.
        tree.cursor = 1;
        tree.toggle_collapse();
        assert_eq!(tree.visible, vec![0, 1, 3]);

        // Rebuild with unchanged data: src stays collapsed.
        let prev = tree.collapse_state(&repos);
        let mut rebuilt = ChangeTree::new();
        rebuilt.rebuild(&repos, &prev);
        assert!(rebuilt.nodes[1].collapsed);
        assert_eq!(rebuilt.visible, vec![0, 1, 3]);
    }

    #[test]
    fn collapsed_repo_hides_descendants_but_stays_visible() {
        let repos = vec![
            repo("a", &[("src/x.rs", StatusKind::Modified, false)]),
            repo("b", &[("y.txt", StatusKind::Added, false)]),
        ];
        let mut tree = build(&repos);

        tree.cursor = 0;
        tree.toggle_collapse();

        // Repo a row remains, its dir and file vanish; repo b untouched.
        let visible_kinds: Vec<String> = tree
            .visible
            .iter()
            .map(|&i| kinds(&tree)[i].clone())
            .collect();
        assert_eq!(visible_kinds, vec!["repo:0", "repo:1", "file:1:0"]);
    }

    #[test]
    fn new_directory_defaults_to_expanded() {
        let before = vec![repo("proj", &[("old/a.txt", StatusKind::Modified, false)])];
        let mut tree = build(&before);
        tree.cursor = 1;
        tree.toggle_collapse(); // collapse "old"

        let after = vec![repo(
            "proj",
            &[
                ("old/a.txt", StatusKind::Modified, false),
                ("fresh/b.txt", StatusKind::Added, false),
            ],
        )];
        let prev = tree.collapse_state(&before);
        tree.rebuild(&after, &prev);

        let old_node = tree
            .nodes
            .iter()
            .find(|n| matches!(&n.kind, NodeKind::Dir { path, .. } if path == "old"))
            .unwrap();
        let fresh_node = tree
            .nodes
            .iter()
            .find(|n| matches!(&n.kind, NodeKind::Dir { path, .. } if path == "fresh"))
            .unwrap();
        assert!(old_node.collapsed);
        assert!(!fresh_node.collapsed);
    }

    #[test]
    fn cursor_clamps_when_list_shrinks() {
        let big = vec![repo(
            "proj",
            &[
                ("a.txt", StatusKind::Modified, false),
                ("b.txt", StatusKind::Modified, false),
                ("c.txt", StatusKind::Modified, false),
            ],
        )];
        let mut tree = build(&big);
        tree.cursor = tree.len() - 1; // last of 4 rows

        let small = vec![repo("proj", &[("a.txt", StatusKind::Modified, false)])];
        let prev = tree.collapse_state(&big);
        tree.rebuild(&small, &prev);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.cursor, 1);
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut tree = build(&[repo("proj", &[("a.txt", StatusKind::Modified, false)])]);
        tree.cursor = 1;

        tree.rebuild(&[], &CollapseMap::new());
        assert!(tree.is_empty());
        assert!(tree.selected_node().is_none());
    }

    #[test]
    fn movement_clamps_at_boundaries() {
        let mut tree = build(&[repo("proj", &[("a.txt", StatusKind::Modified, false)])]);
        assert_eq!(tree.len(), 2);

        tree.move_up();
        assert_eq!(tree.cursor, 0);
        tree.move_down();
        tree.move_down();
        tree.move_down();
        assert_eq!(tree.cursor, 1);
    }

    #[test]
    fn toggle_on_file_is_noop() {
        let mut tree = build(&[repo("proj", &[("a.txt", StatusKind::Modified, false)])]);
        tree.cursor = 1; // the file row
        let visible_before = tree.visible.clone();
        tree.toggle_collapse();
        assert_eq!(tree.visible, visible_before);
    }

    #[test]
    fn scroll_follows_cursor() {
        let files: Vec<(String, StatusKind, bool)> = (0..20)
            .map(|i| (format!("f{i:02}.txt"), StatusKind::Modified, false))
            .collect();
        let files_ref: Vec<(&str, StatusKind, bool)> = files
            .iter()
            .map(|(p, k, s)| (p.as_str(), *k, *s))
            .collect();
        let mut tree = build(&[repo("proj", &files_ref)]);

        tree.cursor = 15;
        tree.update_scroll(10);
        assert_eq!(tree.scroll_offset, 6);

        tree.cursor = 2;
        tree.update_scroll(10);
        assert_eq!(tree.scroll_offset, 2);
    }
}
