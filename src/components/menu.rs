use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::app::MenuState;
use crate::theme::ThemeColors;

/// Modal menu rendered as a centered overlay on top of the panels.
pub struct MenuWidget<'a> {
    menu: &'a MenuState,
    theme: &'a ThemeColors,
}

impl<'a> MenuWidget<'a> {
    pub fn new(menu: &'a MenuState, theme: &'a ThemeColors) -> Self {
        Self { menu, theme }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }
}

impl<'a> Widget for MenuWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 40.min(area.width.saturating_sub(4));
        let height = self.menu.options.len() as u16 + 2;
        let rect = Self::centered_rect(width, height, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(format!(" {} ", self.menu.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .title_style(
                Style::default()
                    .fg(self.theme.title_fg)
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(rect);
        block.render(rect, buf);

        for (i, option) in self.menu.options.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let y = inner.y + i as u16;

            let mut spans = Vec::new();
            match option.key {
                Some(key) => {
                    spans.push(Span::styled(
                        format!(" {key} "),
                        Style::default().fg(self.theme.title_fg),
                    ));
                }
                None => spans.push(Span::raw("   ")),
            }
            spans.push(Span::raw(option.label.clone()));

            let line = Line::from(spans);
            buf.set_line(inner.x, y, &line, inner.width);

            if i == self.menu.cursor {
                buf.set_style(
                    Rect::new(inner.x, y, inner.width, 1),
                    Style::default().bg(self.theme.selected_bg),
                );
            }
        }
    }
}
