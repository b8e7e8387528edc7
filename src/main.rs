mod app;
mod components;
mod config;
mod error;
mod event;
mod git;
mod handler;
mod theme;
mod tree;
mod tui;
mod ui;
mod watcher;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, SelectedFile};
use crate::config::AppConfig;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};
use crate::watcher::ChangeWatcher;

/// A terminal UI showing uncommitted changes across many git repositories.
#[derive(Parser, Debug)]
#[command(name = "gst", version, about)]
struct Cli {
    /// Root directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Scan depth in directory levels (overrides config)
    #[arg(long)]
    depth: Option<usize>,

    /// Poll interval in seconds; 0 disables polling (overrides config)
    #[arg(long)]
    poll: Option<u64>,

    /// Disable the filesystem watcher (auto-refresh)
    #[arg(long)]
    no_watcher: bool,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Partial config carrying only the flags that were actually given.
    fn overrides(&self) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.general.scan_depth = self.depth;
        cfg.general.poll_interval_secs = self.poll;
        if self.no_watcher {
            cfg.watcher.enabled = Some(false);
        }
        cfg
    }
}

/// Run one full discovery pass on the blocking pool; the snapshot comes back
/// as an event. Passes are independent and idempotent, so overlapping ones
/// are harmless and the latest received snapshot wins.
fn spawn_scan(root: PathBuf, depth: usize, event_tx: UnboundedSender<Event>) {
    tokio::task::spawn_blocking(move || {
        let repos = git::scan::scan_repos(&root, depth);
        let _ = event_tx.send(Event::ReposScanned(repos));
    });
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    let root = cli.path.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", cli.path.display()))
    })?;
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(config, root.clone());
    let mut events = EventHandler::new(Duration::from_millis(50));
    let event_tx = events.sender();

    let _watcher = if app.config.watcher_enabled() {
        match ChangeWatcher::new(
            &root,
            Duration::from_millis(app.config.debounce_ms()),
            event_tx.clone(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                app.status_message = Some(format!("watcher unavailable: {e}"));
                None
            }
        }
    } else {
        None
    };

    // Poll trigger, independent of and in addition to the watcher.
    let poll_secs = app.config.poll_interval_secs();
    if poll_secs > 0 {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(poll_secs));
            // The first tick fires immediately; the startup scan covers it.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Event::Rescan).is_err() {
                    break;
                }
            }
        });
    }

    spawn_scan(root.clone(), app.config.scan_depth(), event_tx.clone());

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key, &event_tx),
            Event::Tick => {}
            Event::Resize(_, _) => {}
            Event::ReposScanned(repos) => app.apply_snapshot(repos),
            Event::DiffLoaded { file, content } => app.open_diff(file, content),
            Event::Rescan => spawn_scan(root.clone(), app.config.scan_depth(), event_tx.clone()),
        }

        // Editor requests need the terminal; run them between frames.
        if let Some(selected) = app.pending_editor.take() {
            run_editor(&mut tui, &mut app, &selected);
            let _ = event_tx.send(Event::Rescan);
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}

/// Hand the terminal to `$EDITOR` for one file, then reclaim it. A launch
/// failure becomes a status-bar message, never a crash.
fn run_editor(tui: &mut Tui, app: &mut App, selected: &SelectedFile) {
    app.status_message = None;

    let result = (|| -> error::Result<()> {
        let mut cmd = git::diff::editor_command(&selected.repo_path, &selected.file_path)?;
        tui.suspend()?;
        // The editor owns the terminal until it exits; a non-zero exit code
        // is the user's business, only a spawn failure is ours.
        let status = cmd
            .status()
            .map_err(|e| error::AppError::EditorLaunchFailed(e.to_string()));
        tui.resume()?;
        status?;
        Ok(())
    })();

    if let Err(e) = result {
        app.status_message = Some(e.to_string());
    }
}
