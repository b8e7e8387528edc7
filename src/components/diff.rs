use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;

/// Diff panel widget: plain `git diff` text with line-prefix styling.
pub struct DiffWidget<'a> {
    lines: &'a [String],
    scroll: usize,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> DiffWidget<'a> {
    pub fn new(lines: &'a [String], scroll: usize, theme: &'a ThemeColors) -> Self {
        Self {
            lines,
            scroll,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Style for one diff line. File headers stay dim so hunks stand out.
    fn line_style(&self, line: &str) -> Style {
        if line.starts_with("+++") || line.starts_with("---") {
            Style::default().fg(self.theme.dim_fg)
        } else if line.starts_with("diff --git") || line.starts_with("index ") {
            Style::default().fg(self.theme.dim_fg)
        } else if line.starts_with("@@") {
            Style::default().fg(self.theme.diff_hunk_fg)
        } else if line.starts_with('+') {
            Style::default().fg(self.theme.diff_add_fg)
        } else if line.starts_with('-') {
            Style::default().fg(self.theme.diff_del_fg)
        } else {
            Style::default()
        }
    }
}

impl<'a> Widget for DiffWidget<'a> {
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

        for (row, line) in self
            .lines
            .iter()
            .skip(self.scroll)
            .take(inner.height as usize)
            .enumerate()
        {
            let styled = Line::styled(line.clone(), self.line_style(line));
            buf.set_line(inner.x, inner.y + row as u16, &styled, inner.width);
        }
    }
}
