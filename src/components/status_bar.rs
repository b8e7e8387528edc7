use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str =
    "(q) quit  (↵) diff  (esc) close  (⇥) switch  (c) fold  (o) open  (d) discard  (p) layout  (r) refresh";

/// One-line status bar: repository/file counts on the left, key hints on the
/// right, transient messages replacing both.
pub struct StatusBarWidget<'a> {
    repo_count: usize,
    file_count: usize,
    theme: &'a ThemeColors,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(repo_count: usize, file_count: usize, theme: &'a ThemeColors) -> Self {
        Self {
            repo_count,
            file_count,
            theme,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let style = Style::default().fg(self.theme.status_bar_fg);

        if let Some(message) = self.message {
            let line = Line::from(Span::styled(message.to_string(), style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let counts = format!(
            " {} repo(s) | {} file(s)",
            self.repo_count, self.file_count
        );
        let width = area.width as usize;
        let gap = width
            .saturating_sub(counts.chars().count())
            .saturating_sub(KEY_HINTS.chars().count() + 1);

        let text = if gap > 0 {
            format!("{counts}{}{KEY_HINTS} ", " ".repeat(gap))
        } else {
            counts
        };

        let line = Line::from(Span::styled(text, style));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
