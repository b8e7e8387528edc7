use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, Panel};
use crate::components::diff::DiffWidget;
use crate::components::menu::MenuWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::config::DiffPosition;

/// Render one frame: panels, status bar, and the modal menu when open.
pub fn render(app: &mut App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());
    let content = chunks[0];
    let status = chunks[1];

    let (tree_area, diff_area) = if app.diff_open {
        split_content(content, app.diff_position)
    } else {
        (content, None)
    };

    // Keep the selected row inside the bordered viewport.
    app.tree
        .update_scroll(tree_area.height.saturating_sub(2) as usize);

    let tree_widget = TreeWidget::new(&app.tree, &app.repos, &app.theme)
        .block(panel_block(app, " Changes ", Panel::Tree));
    frame.render_widget(tree_widget, tree_area);

    if let Some(diff_area) = diff_area {
        let title = format!(" Diff: {} ", app.diff_file);
        let diff_widget = DiffWidget::new(&app.diff_lines, app.diff_scroll, &app.theme)
            .block(panel_block(app, &title, Panel::Diff));
        frame.render_widget(diff_widget, diff_area);
    }

    let status_bar = StatusBarWidget::new(app.repos.len(), app.total_files(), &app.theme)
        .message(app.status_message.as_deref());
    frame.render_widget(status_bar, status);

    if let Some(menu) = &app.menu {
        frame.render_widget(MenuWidget::new(menu, &app.theme), frame.area());
    }
}

fn split_content(area: Rect, position: DiffPosition) -> (Rect, Option<Rect>) {
    match position {
        DiffPosition::Right => {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(area);
            (halves[0], Some(halves[1]))
        }
        DiffPosition::Bottom => {
            let halves = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            (halves[0], Some(halves[1]))
        }
    }
}

fn panel_block<'a>(app: &App, title: &'a str, panel: Panel) -> Block<'a> {
    let border_fg = if app.focus == panel {
        app.theme.border_focused_fg
    } else {
        app.theme.border_fg
    };
    Block::default()
        .title(title.to_string())
        .title_style(
            Style::default()
                .fg(app.theme.title_fg)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_fg))
}
