//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--depth`, `--poll`, `--no-watcher`)
//! 2. `$GST_CONFIG` environment variable (path to config file)
//! 3. Project-local `.gst.toml` in the current working directory
//! 4. Global `~/.config/gst/config.toml`
//! 5. Built-in defaults
//!
//! The merged result is an immutable value computed once at startup and
//! passed down; nothing reloads it at runtime.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// How many levels of subdirectories to scan for repositories.
    pub scan_depth: Option<usize>,
    /// Rescan period in seconds; 0 disables polling.
    pub poll_interval_secs: Option<u64>,
    /// Where the diff panel opens: "right" or "bottom".
    pub diff_position: Option<String>,
}

/// Filesystem watcher settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    /// Enable the filesystem watcher for auto-refresh.
    pub enabled: Option<bool>,
    /// Debounce window in milliseconds.
    pub debounce_ms: Option<u64>,
}

/// Color settings, all optional hex strings like "#89b4fa".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub selected_bg: Option<String>,
    pub border_fg: Option<String>,
    pub border_focused_fg: Option<String>,
    pub title_fg: Option<String>,
    pub status_bar_fg: Option<String>,
    pub repo_fg: Option<String>,
    pub branch_fg: Option<String>,
    pub dir_fg: Option<String>,
    pub file_fg: Option<String>,
    pub staged_fg: Option<String>,
    pub added_fg: Option<String>,
    pub deleted_fg: Option<String>,
    pub modified_fg: Option<String>,
    pub untracked_fg: Option<String>,
    pub diff_add_fg: Option<String>,
    pub diff_del_fg: Option<String>,
    pub diff_hunk_fg: Option<String>,
    pub dim_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub watcher: WatcherConfig,
    pub theme: ThemeConfig,
}

/// Default scan depth (immediate subdirectories plus one more level).
pub const DEFAULT_SCAN_DEPTH: usize = 2;

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("GST_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".gst.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("gst").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr;
/// this runs before the terminal enters raw mode).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                scan_depth: other.general.scan_depth.or(self.general.scan_depth),
                poll_interval_secs: other
                    .general
                    .poll_interval_secs
                    .or(self.general.poll_interval_secs),
                diff_position: other
                    .general
                    .diff_position
                    .clone()
                    .or(self.general.diff_position),
            },
            watcher: WatcherConfig {
                enabled: other.watcher.enabled.or(self.watcher.enabled),
                debounce_ms: other.watcher.debounce_ms.or(self.watcher.debounce_ms),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Candidate files, lowest priority first so higher overwrites.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults and clamps ───────────────

    /// Scan depth, clamped to at least 1.
    pub fn scan_depth(&self) -> usize {
        self.general.scan_depth.unwrap_or(DEFAULT_SCAN_DEPTH).max(1)
    }

    /// Poll interval in seconds; 0 disables the poll trigger.
    pub fn poll_interval_secs(&self) -> u64 {
        self.general.poll_interval_secs.unwrap_or(0)
    }

    /// Diff panel position: "right" unless explicitly "bottom".
    pub fn diff_position(&self) -> DiffPosition {
        match self.general.diff_position.as_deref() {
            Some("bottom") => DiffPosition::Bottom,
            _ => DiffPosition::Right,
        }
    }

    /// Whether the watcher is enabled.
    pub fn watcher_enabled(&self) -> bool {
        self.watcher.enabled.unwrap_or(true)
    }

    /// Watcher debounce window in milliseconds.
    pub fn debounce_ms(&self) -> u64 {
        self.watcher
            .debounce_ms
            .unwrap_or(crate::watcher::DEFAULT_DEBOUNCE_MS)
    }
}

/// Where the diff panel sits relative to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffPosition {
    Right,
    Bottom,
}

impl DiffPosition {
    pub fn toggled(self) -> Self {
        match self {
            DiffPosition::Right => DiffPosition::Bottom,
            DiffPosition::Bottom => DiffPosition::Right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.scan_depth(), DEFAULT_SCAN_DEPTH);
        assert_eq!(cfg.poll_interval_secs(), 0);
        assert_eq!(cfg.diff_position(), DiffPosition::Right);
        assert!(cfg.watcher_enabled());
        assert_eq!(cfg.debounce_ms(), 100);
    }

    #[test]
    fn toml_parsing_full() {
        let toml = r#"
[general]
scan_depth = 3
poll_interval_secs = 30
diff_position = "bottom"

[watcher]
enabled = false
debounce_ms = 250

[theme]
scheme = "light"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.scan_depth(), 3);
        assert_eq!(cfg.poll_interval_secs(), 30);
        assert_eq!(cfg.diff_position(), DiffPosition::Bottom);
        assert!(!cfg.watcher_enabled());
        assert_eq!(cfg.debounce_ms(), 250);
        assert_eq!(cfg.theme.scheme.as_deref(), Some("light"));
    }

    #[test]
    fn toml_parsing_partial_keeps_defaults() {
        let toml = r#"
[general]
scan_depth = 4
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.scan_depth(), 4);
        assert_eq!(cfg.poll_interval_secs(), 0);
        assert!(cfg.watcher_enabled());
    }

    #[test]
    fn scan_depth_clamped_to_one() {
        let cfg: AppConfig = toml::from_str("[general]\nscan_depth = 0\n").unwrap();
        assert_eq!(cfg.scan_depth(), 1);
    }

    #[test]
    fn unknown_diff_position_falls_back_to_right() {
        let cfg: AppConfig = toml::from_str("[general]\ndiff_position = \"left\"\n").unwrap();
        assert_eq!(cfg.diff_position(), DiffPosition::Right);
    }

    #[test]
    fn merge_other_wins() {
        let base: AppConfig =
            toml::from_str("[general]\nscan_depth = 2\npoll_interval_secs = 10\n").unwrap();
        let over: AppConfig = toml::from_str("[general]\nscan_depth = 5\n").unwrap();

        let merged = base.merge(&over);
        assert_eq!(merged.scan_depth(), 5);
        // Untouched fields keep the base value.
        assert_eq!(merged.poll_interval_secs(), 10);
    }

    #[test]
    fn diff_position_toggles() {
        assert_eq!(DiffPosition::Right.toggled(), DiffPosition::Bottom);
        assert_eq!(DiffPosition::Bottom.toggled(), DiffPosition::Right);
    }
}
