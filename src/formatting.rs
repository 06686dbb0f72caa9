use terminal_size::{Width, terminal_size};
use yansi::Paint;

use crate::chart::NICE;

/// Color palette for the progress lines.
pub struct ColorPalette {
    pub count: (u8, u8, u8),  // post counts
    pub offset: (u8, u8, u8), // day offsets
    pub nice: (u8, u8, u8),   // happy mood
    pub alarm: (u8, u8, u8),  // stale mood, sentinel titles
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        count: (148, 226, 213),  // Teal
        offset: (137, 180, 250), // Blue
        nice: (166, 227, 161),   // Green
        alarm: (243, 139, 168),  // Pink
    };
}

/// Formatting context passed through the console output path.
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            palette: ColorPalette::CATPPUCCIN,
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("NO_COLOR").is_err())
    }

    pub fn format_count(&self, n: usize) -> String {
        let text = n.to_string();
        if self.use_color {
            let (r, g, b) = self.palette.count;
            Paint::rgb(&text, r, g, b).bold().to_string()
        } else {
            text
        }
    }

    pub fn format_offset(&self, offset: i64) -> String {
        let text = format!("{offset:>4}");
        if self.use_color {
            let (r, g, b) = self.palette.offset;
            Paint::rgb(&text, r, g, b).to_string()
        } else {
            text
        }
    }

    /// Title for a post line, truncated so the line never wraps. The
    /// sentinel title is highlighted since it marks a post worth fixing.
    pub fn format_title(&self, title: &str, max_width: usize) -> String {
        let text = truncate_with_ellipsis(title, max_width);
        if self.use_color && title == crate::post::TITLE_SENTINEL {
            let (r, g, b) = self.palette.alarm;
            return Paint::rgb(&text, r, g, b).to_string();
        }
        text
    }

    pub fn format_mood(&self, mood: &str) -> String {
        if self.use_color {
            let (r, g, b) = if mood == NICE {
                self.palette.nice
            } else {
                self.palette.alarm
            };
            Paint::rgb(mood, r, g, b).bold().to_string()
        } else {
            mood.to_string()
        }
    }
}

/// Columns available for a post line; 80 when not attached to a terminal.
pub fn terminal_columns() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => w as usize,
        None => 80,
    }
}

/// Truncate text to a width, appending an ellipsis when needed.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let len = text.chars().count();
    if len <= max_width {
        return text.to_string();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let mut out = text
        .chars()
        .take(max_width.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("exactly ten", 11), "exactly ten");
        assert_eq!(truncate_with_ellipsis("much too long", 8), "much to…");
        assert_eq!(truncate_with_ellipsis("anything", 0), "");
        assert_eq!(truncate_with_ellipsis("anything", 1), "…");
    }

    #[test]
    fn test_plain_formatting_passes_through() {
        let fmt = FormatContext::new(false);
        assert_eq!(fmt.format_count(3), "3");
        assert_eq!(fmt.format_offset(-4), "  -4");
        assert_eq!(fmt.format_title("My Post", 40), "My Post");
        assert_eq!(fmt.format_mood("Nice!"), "Nice!");
    }

    #[test]
    fn test_colored_output_wraps_ansi() {
        let fmt = FormatContext::new(true);
        assert!(fmt.format_count(3).contains('\x1b'));
        assert!(fmt.format_mood("UH OH!").contains('\x1b'));
    }
}
