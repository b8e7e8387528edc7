use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, MenuAction, Panel, SelectedFile};
use crate::event::Event;
use crate::git::diff;

/// Handle a key event. Background work (diff loads, discards) is dispatched
/// to the blocking pool; results come back as events.
pub fn handle_key_event(app: &mut App, key: KeyEvent, event_tx: &UnboundedSender<Event>) {
    if app.menu.is_some() {
        handle_menu_key(app, key, event_tx);
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('q') => app.quit(),

        KeyCode::Up | KeyCode::Char('k') => match app.focus {
            Panel::Tree => app.tree.move_up(),
            Panel::Diff => app.diff_scroll_up(),
        },
        KeyCode::Down | KeyCode::Char('j') => match app.focus {
            Panel::Tree => app.tree.move_down(),
            Panel::Diff => app.diff_scroll_down(),
        },

        KeyCode::Enter => {
            if app.focus == Panel::Tree {
                if let Some(selected) = app.selected_file() {
                    spawn_diff_load(selected, event_tx.clone());
                }
            }
        }

        KeyCode::Esc => app.close_diff(),

        KeyCode::Tab => {
            if app.diff_open {
                app.focus = match app.focus {
                    Panel::Tree => Panel::Diff,
                    Panel::Diff => Panel::Tree,
                };
            }
        }

        KeyCode::Char('c') | KeyCode::Char('e') => {
            if app.focus == Panel::Tree {
                app.tree.toggle_collapse();
            }
        }

        KeyCode::Char('o') => {
            if app.focus == Panel::Tree {
                // The control loop runs the editor; it needs the terminal.
                app.pending_editor = app.selected_file();
            }
        }

        KeyCode::Char('d') => {
            if app.focus == Panel::Tree {
                app.open_discard_menu();
            }
        }

        KeyCode::Char('p') => {
            app.diff_position = app.diff_position.toggled();
        }

        KeyCode::Char('r') => {
            let _ = event_tx.send(Event::Rescan);
        }

        _ => {}
    }
}

/// Keys while the modal menu is open; everything else is swallowed.
fn handle_menu_key(app: &mut App, key: KeyEvent, event_tx: &UnboundedSender<Event>) {
    let Some(menu) = app.menu.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if menu.cursor > 0 {
                menu.cursor -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if menu.cursor + 1 < menu.options.len() {
                menu.cursor += 1;
            }
        }
        KeyCode::Enter => {
            let action = menu.options[menu.cursor].action.clone();
            app.close_menu();
            run_menu_action(action, event_tx);
        }
        KeyCode::Esc => app.close_menu(),
        KeyCode::Char(c) => {
            let hit = menu
                .options
                .iter()
                .find(|opt| opt.key == Some(c))
                .map(|opt| opt.action.clone());
            if let Some(action) = hit {
                app.close_menu();
                run_menu_action(action, event_tx);
            }
        }
        _ => {}
    }
}

fn run_menu_action(action: MenuAction, event_tx: &UnboundedSender<Event>) {
    match action {
        MenuAction::Discard(selected) => {
            let tx = event_tx.clone();
            tokio::task::spawn_blocking(move || {
                let _ = diff::discard_changes(
                    &selected.repo_path,
                    &selected.file_path,
                    selected.untracked,
                );
                let _ = tx.send(Event::Rescan);
            });
        }
        MenuAction::Cancel => {}
    }
}

/// Load a file's diff off the control loop and report back as an event.
pub fn spawn_diff_load(selected: SelectedFile, event_tx: UnboundedSender<Event>) {
    tokio::task::spawn_blocking(move || {
        let content = diff::load_diff(&selected.repo_path, &selected.file_path)
            .unwrap_or_else(|e| format!("Error loading diff: {e}"));
        let _ = event_tx.send(Event::DiffLoaded {
            file: selected.file_path,
            content,
        });
    });
}
