use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::git::scan::Repository;
use crate::theme::ThemeColors;
use crate::tree::{ChangeTree, NodeKind, TreeNode};

/// Tree panel widget: one row per visible node, scrolled so the selected row
/// stays inside the viewport.
pub struct TreeWidget<'a> {
    tree: &'a ChangeTree,
    repos: &'a [Repository],
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree: &'a ChangeTree, repos: &'a [Repository], theme: &'a ThemeColors) -> Self {
        Self {
            tree,
            repos,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn node_line(&self, node: &TreeNode) -> Line<'a> {
        let indent = "  ".repeat(node.depth);
        let arrow = if node.collapsed { "▸" } else { "▾" };

        match &node.kind {
            NodeKind::Repo { repo } => {
                let repo = &self.repos[*repo];
                Line::from(vec![
                    Span::raw(format!("{arrow} ")),
                    Span::styled(
                        repo.display_path.clone(),
                        Style::default()
                            .fg(self.theme.repo_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" [{}]", repo.branch),
                        Style::default().fg(self.theme.branch_fg),
                    ),
                    Span::styled(
                        format!(" ({})", repo.files.len()),
                        Style::default().fg(self.theme.dim_fg),
                    ),
                ])
            }
            NodeKind::Dir { name, .. } => Line::from(vec![
                Span::raw(format!("{indent}{arrow} ")),
                Span::styled(
                    format!("{name}/"),
                    Style::default()
                        .fg(self.theme.dir_fg)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            NodeKind::File { repo, file } => {
                let change = &self.repos[*repo].files[*file];
                let name = change
                    .path
                    .rsplit('/')
                    .next()
                    .unwrap_or(change.path.as_str());
                let mut letter_style =
                    Style::default().fg(self.theme.status_fg(change.kind, change.staged));
                if change.staged {
                    letter_style = letter_style.add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled(change.kind.letter().to_string(), letter_style),
                    Span::styled(
                        format!(" {name}"),
                        Style::default().fg(self.theme.file_fg),
                    ),
                ])
            }
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block.take() {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.tree.is_empty() {
            let msg = "No git repositories found";
            let y = inner.y + inner.height / 2;
            let x = inner.x + inner.width.saturating_sub(msg.len() as u16) / 2;
            buf.set_string(x, y, msg, Style::default().fg(self.theme.dim_fg));
            return;
        }

        let height = inner.height as usize;
        let start = self.tree.scroll_offset.min(self.tree.len().saturating_sub(1));

        for (row, vis_idx) in (start..self.tree.len()).take(height).enumerate() {
            let node = &self.tree.nodes[self.tree.visible[vis_idx]];
            let y = inner.y + row as u16;
            let line = self.node_line(node);
            buf.set_line(inner.x, y, &line, inner.width);

            if vis_idx == self.tree.cursor {
                buf.set_style(
                    Rect::new(inner.x, y, inner.width, 1),
                    Style::default().bg(self.theme.selected_bg),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::git::status::{FileChange, StatusKind};
    use crate::theme::resolve_theme;
    use crate::tree::CollapseMap;
    use std::path::PathBuf;

    fn fixture() -> (ChangeTree, Vec<Repository>) {
        let repos = vec![Repository {
            path: PathBuf::from("/w/proj"),
            display_path: "proj".to_string(),
            branch: "main".to_string(),
            files: vec![FileChange {
                path: "src/lib.rs".to_string(),
                kind: StatusKind::Modified,
                staged: false,
            }],
        }];
        let mut tree = ChangeTree::new();
        tree.rebuild(&repos, &CollapseMap::new());
        (tree, repos)
    }

    fn render_to_strings(tree: &ChangeTree, repos: &[Repository]) -> Vec<String> {
        let theme = resolve_theme(&AppConfig::default().theme);
        let widget = TreeWidget::new(tree, repos, &theme);
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn renders_repo_dir_and_file_rows() {
        let (tree, repos) = fixture();
        let rows = render_to_strings(&tree, &repos);
        assert_eq!(rows[0], "▾ proj [main] (1)");
        assert_eq!(rows[1], "  ▾ src/");
        assert_eq!(rows[2], "    M lib.rs");
    }

    #[test]
    fn collapsed_repo_renders_single_row() {
        let (mut tree, repos) = fixture();
        tree.toggle_collapse();
        let rows = render_to_strings(&tree, &repos);
        assert_eq!(rows[0], "▸ proj [main] (1)");
        assert_eq!(rows[1], "");
    }

    #[test]
    fn empty_tree_shows_placeholder() {
        let tree = ChangeTree::new();
        let rows = render_to_strings(&tree, &[]);
        assert!(rows.iter().any(|r| r.contains("No git repositories found")));
    }
}
