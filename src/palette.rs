use tui::style::{Color, Modifier, Style};
use once_cell::sync::OnceCell;

use easel::config::ColorConfig;

/*──────────────────────── Configured colors ───────────────────────────────*/
/// Set once at startup from whichever config file was loaded.
static THEME: OnceCell<ColorConfig> = OnceCell::new();

/// Installs the theme; later calls are ignored.
pub fn set_theme(colors: ColorConfig) {
    install(&THEME, colors);
}

/// Active colors, defaults if no theme was installed before first use.
pub fn config_colors() -> &'static ColorConfig {
    THEME.get_or_init(ColorConfig::default)
}

fn install(cell: &OnceCell<ColorConfig>, colors: ColorConfig) -> bool {
    cell.set(colors).is_ok()
}

// Helper to convert RGB array to Color
#[inline]
pub fn rgb(arr: [u8; 3]) -> Color {
    Color::Rgb(arr[0], arr[1], arr[2])
}

/*──────────────────────── Style shortcuts used throughout the UI ──────────*/
/// Central place to theme every widget.
#[allow(non_snake_case)]
pub mod STYLE {
    use super::{Modifier, Style};
    const EMPTY: Modifier = Modifier::empty();

    fn fg(arr: [u8; 3]) -> Style {
        Style { fg: Some(super::rgb(arr)), bg: None, add_modifier: EMPTY, sub_modifier: EMPTY }
    }

    pub fn default_bg() -> Style {
        Style { fg: None, bg: Some(super::rgb(super::config_colors().default_bg)), add_modifier: EMPTY, sub_modifier: EMPTY }
    }

    /* ─── table ─── */
    pub fn text() -> Style { fg(super::config_colors().text) }
    pub fn header_row() -> Style { fg(super::config_colors().header_row).add_modifier(Modifier::BOLD) }
    pub fn checked() -> Style { fg(super::config_colors().checked) }
    pub fn cursor_row() -> Style {
        Style { fg: Some(super::rgb(super::config_colors().cursor_fg)), bg: Some(super::rgb(super::config_colors().cursor_bg)), add_modifier: EMPTY, sub_modifier: EMPTY }
    }
    pub fn border() -> Style { fg(super::config_colors().border) }
    pub fn border_focus() -> Style { fg(super::config_colors().border_focus) }

    /* ─── popover ─── */
    pub fn popover_bg() -> Style {
        Style { fg: None, bg: Some(super::rgb(super::config_colors().popover_bg)), add_modifier: EMPTY, sub_modifier: EMPTY }
    }

    /* ─── status ─── */
    pub fn status_fg() -> Style { fg(super::config_colors().status_fg) }
    pub fn error_fg() -> Style { fg(super::config_colors().error_fg) }
    pub fn info_fg() -> Style { fg(super::config_colors().info_fg) }
}
