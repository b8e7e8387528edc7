//! Theme data model: built-in palettes and resolution from config.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};
use crate::git::status::StatusKind;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub selected_bg: Color,
    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub title_fg: Color,
    pub status_bar_fg: Color,

    // Tree rows
    pub repo_fg: Color,
    pub branch_fg: Color,
    pub dir_fg: Color,
    pub file_fg: Color,

    // Status letters
    pub staged_fg: Color,
    pub added_fg: Color,
    pub deleted_fg: Color,
    pub modified_fg: Color,
    pub untracked_fg: Color,

    // Diff panel
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_hunk_fg: Color,

    pub dim_fg: Color,
}

impl ThemeColors {
    /// Color for a file's status letter.
    pub fn status_fg(&self, kind: StatusKind, staged: bool) -> Color {
        if staged {
            return self.staged_fg;
        }
        match kind {
            StatusKind::Added | StatusKind::Copied => self.added_fg,
            StatusKind::Deleted => self.deleted_fg,
            StatusKind::Modified | StatusKind::Renamed => self.modified_fg,
            StatusKind::Untracked => self.untracked_fg,
        }
    }
}

/// Dark theme using the Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        selected_bg: Color::Rgb(69, 71, 90),          // #45475a (surface1)
        border_fg: Color::Rgb(88, 91, 112),           // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)
        title_fg: Color::Rgb(137, 220, 235),          // #89dceb (sky)
        status_bar_fg: Color::Rgb(108, 112, 134),     // #6c7086 (overlay0)

        repo_fg: Color::Rgb(137, 180, 250),   // #89b4fa (blue)
        branch_fg: Color::Rgb(203, 166, 247), // #cba6f7 (mauve)
        dir_fg: Color::Rgb(186, 194, 222),    // #bac2de (subtext1)
        file_fg: Color::Rgb(205, 214, 244),   // #cdd6f4 (text)

        staged_fg: Color::Rgb(166, 227, 161),    // #a6e3a1 (green)
        added_fg: Color::Rgb(166, 227, 161),     // #a6e3a1 (green)
        deleted_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        modified_fg: Color::Rgb(249, 226, 175),  // #f9e2af (yellow)
        untracked_fg: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)

        diff_add_fg: Color::Rgb(166, 227, 161),  // #a6e3a1
        diff_del_fg: Color::Rgb(243, 139, 168),  // #f38ba8
        diff_hunk_fg: Color::Rgb(137, 220, 235), // #89dceb

        dim_fg: Color::Rgb(108, 112, 134), // #6c7086
    }
}

/// Light theme using the Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        selected_bg: Color::Rgb(204, 208, 218),      // #ccd0da (surface1)
        border_fg: Color::Rgb(172, 176, 190),        // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245), // #1e66f5 (blue)
        title_fg: Color::Rgb(4, 165, 229),           // #04a5e5 (sky)
        status_bar_fg: Color::Rgb(156, 160, 176),    // #9ca0b0 (overlay0)

        repo_fg: Color::Rgb(30, 102, 245),   // #1e66f5 (blue)
        branch_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)
        dir_fg: Color::Rgb(92, 95, 119),     // #5c5f77 (subtext1)
        file_fg: Color::Rgb(76, 79, 105),    // #4c4f69 (text)

        staged_fg: Color::Rgb(64, 160, 43),      // #40a02b (green)
        added_fg: Color::Rgb(64, 160, 43),       // #40a02b (green)
        deleted_fg: Color::Rgb(210, 15, 57),     // #d20f39 (red)
        modified_fg: Color::Rgb(223, 142, 29),   // #df8e1d (yellow)
        untracked_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)

        diff_add_fg: Color::Rgb(64, 160, 43),  // #40a02b
        diff_del_fg: Color::Rgb(210, 15, 57),  // #d20f39
        diff_hunk_fg: Color::Rgb(4, 165, 229), // #04a5e5

        dim_fg: Color::Rgb(156, 160, 176), // #9ca0b0
    }
}

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    let scheme = config.scheme.as_deref().unwrap_or("dark");
    match scheme {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(), // "dark" or any unrecognized value
    }
}

/// Apply custom hex color overrides on top of an existing theme.
/// Malformed hex values keep the palette default.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let mut set = |target: &mut Color, value: &Option<String>| {
        if let Some(color) = value.as_deref().and_then(parse_hex_color) {
            *target = color;
        }
    };

    set(&mut theme.selected_bg, &custom.selected_bg);
    set(&mut theme.border_fg, &custom.border_fg);
    set(&mut theme.border_focused_fg, &custom.border_focused_fg);
    set(&mut theme.title_fg, &custom.title_fg);
    set(&mut theme.status_bar_fg, &custom.status_bar_fg);
    set(&mut theme.repo_fg, &custom.repo_fg);
    set(&mut theme.branch_fg, &custom.branch_fg);
    set(&mut theme.dir_fg, &custom.dir_fg);
    set(&mut theme.file_fg, &custom.file_fg);
    set(&mut theme.staged_fg, &custom.staged_fg);
    set(&mut theme.added_fg, &custom.added_fg);
    set(&mut theme.deleted_fg, &custom.deleted_fg);
    set(&mut theme.modified_fg, &custom.modified_fg);
    set(&mut theme.untracked_fg, &custom.untracked_fg);
    set(&mut theme.diff_add_fg, &custom.diff_add_fg);
    set(&mut theme.diff_del_fg, &custom.diff_del_fg);
    set(&mut theme.diff_hunk_fg, &custom.diff_hunk_fg);
    set(&mut theme.dim_fg, &custom.dim_fg);
}
