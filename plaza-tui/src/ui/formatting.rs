use ratatui::{
    style::Style,
    text::{Line, Span},
};

use super::theme::ThemeColors;

// Layout constants
pub const BORDER_PADDING: u16 = 4; // Total horizontal padding from borders (2 per side)

/// Format timestamp for display
pub fn format_timestamp(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// The first page is only a window on the feed, so counts read as "N+"
pub fn format_page_count(count: usize) -> String {
    format!("{}+", count)
}

/// Password fields show one bullet per character unless revealed
pub fn mask_secret(value: &str, reveal: bool) -> String {
    if reveal {
        value.to_string()
    } else {
        "•".repeat(value.chars().count())
    }
}

/// Wrap post content to `max_width`, indenting each line
pub fn format_post_content_with_width(
    content: &str,
    theme: &ThemeColors,
    max_width: usize,
) -> Vec<Line<'static>> {
    let wrap_width = max_width.saturating_sub(BORDER_PADDING as usize).max(1);

    content
        .lines()
        .flat_map(|line| {
            textwrap::wrap(line, wrap_width)
                .into_iter()
                .map(|wrapped| wrapped.into_owned())
                .collect::<Vec<_>>()
        })
        .map(|wrapped| {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(wrapped, Style::default().fg(theme.text)),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn theme() -> ThemeColors {
        ThemeColors {
            primary: Color::Blue,
            accent: Color::Magenta,
            text: Color::White,
            text_dim: Color::Gray,
            background: Color::Black,
            border: Color::Gray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            highlight_bg: Color::DarkGray,
        }
    }

    #[test]
    fn test_mask_secret_counts_characters() {
        assert_eq!(mask_secret("pässword", false), "••••••••");
        assert_eq!(mask_secret("pässword", true), "pässword");
        assert_eq!(mask_secret("", false), "");
    }

    #[test]
    fn test_page_count_has_plus() {
        assert_eq!(format_page_count(20), "20+");
    }

    #[test]
    fn test_content_wraps_to_width() {
        let lines = format_post_content_with_width(
            "one two three four five six seven eight",
            &theme(),
            14,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width() <= 14, "line too wide: {:?}", line);
        }
    }
}
