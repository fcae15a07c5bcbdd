use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::formatting::{format_page_count, format_post_content_with_width, format_timestamp};
use super::theme::ThemeColors;
use crate::app::App;
use crate::feed::FeedLoadState;
use plaza_types::{FeedStats, Post};

const STATS_PANEL_WIDTH: u16 = 32;

pub fn render_feed_screen(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let state = app
        .feed
        .as_ref()
        .map(|feed| feed.state())
        .unwrap_or(FeedLoadState::Loading);

    match &state {
        FeedLoadState::Loading => render_centered(
            frame,
            area,
            vec![
                styled_title("Loading your feed", theme),
                dim("Fetching the latest posts...", theme),
            ],
        ),
        FeedLoadState::Error(message) => render_centered(
            frame,
            area,
            vec![
                Line::from(Span::styled("⚠", Style::default().fg(theme.error))),
                styled_title("Something went wrong", theme),
                dim(message, theme),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to Try Again",
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
                )),
            ],
        ),
        FeedLoadState::Empty => render_centered(
            frame,
            area,
            vec![
                styled_title("Your Feed", theme),
                dim("Discover and share amazing content", theme),
                Line::from(""),
                styled_title("No posts yet!", theme),
                dim("Be the first to share something amazing with the community.", theme),
                Line::from(""),
                Line::from(Span::styled(
                    "Create Your First Post (n)",
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                )),
            ],
        ),
        FeedLoadState::Loaded(posts) => render_loaded(frame, area, posts, &state.stats(), theme),
    }
}

fn styled_title(text: &str, theme: &ThemeColors) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ))
}

fn dim(text: &str, theme: &ThemeColors) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(theme.text_dim)))
}

fn render_centered(frame: &mut Frame, area: Rect, mut lines: Vec<Line<'static>>) {
    let top_padding = area.height.saturating_sub(lines.len() as u16) / 2;
    let mut padded = vec![Line::from(""); top_padding as usize];
    padded.append(&mut lines);

    let paragraph = Paragraph::new(padded)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_loaded(frame: &mut Frame, area: Rect, posts: &[Post], stats: &FeedStats, theme: &ThemeColors) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    // Header
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Feed  ", Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{} posts", format_page_count(stats.post_count)),
            Style::default().fg(theme.text_dim),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(theme.border)));
    frame.render_widget(header, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(STATS_PANEL_WIDTH)])
        .split(rows[1]);

    let width = columns[0].width as usize;
    let mut lines = Vec::new();
    for post in posts {
        lines.extend(post_lines(post, width, theme));
        lines.push(Line::from(""));
    }
    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(list, columns[0]);

    let side = Paragraph::new(vec![
        styled_title("Community Stats", theme),
        Line::from(""),
        stat_line(format_page_count(stats.post_count), "Total Posts", theme),
        stat_line(stats.total_likes.to_string(), "Total Likes", theme),
        stat_line(stats.total_comments.to_string(), "Total Comments", theme),
        Line::from(""),
        styled_title("Quick Actions", theme),
        dim("r  Refresh Feed", theme),
        dim("n  Create New Post", theme),
        dim("b  Back to sign-up", theme),
        dim("q  Quit", theme),
    ])
    .block(Block::default().borders(Borders::NONE));
    frame.render_widget(side, columns[1]);
}

fn stat_line(value: String, label: &str, theme: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {:>6} ", value),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(label.to_string(), Style::default().fg(theme.text_dim)),
    ])
}

/// Minimal preview of an opaque post: author and time when present,
/// the content, then the two counters
fn post_lines(post: &Post, width: usize, theme: &ThemeColors) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let author = post
        .text_field("author_name")
        .or_else(|| post.text_field("username"))
        .unwrap_or("anonymous");
    let mut meta = vec![Span::styled(
        author.to_string(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )];
    if let Some(created_at) = post.created_at() {
        meta.push(Span::styled(
            format!("  {}", format_timestamp(&created_at)),
            Style::default().fg(theme.text_dim),
        ));
    }
    lines.push(Line::from(meta));

    let content = post
        .text_field("content")
        .or_else(|| post.text_field("title"))
        .unwrap_or("");
    lines.extend(format_post_content_with_width(content, theme, width));

    lines.push(Line::from(Span::styled(
        format!("  ♥ {}   ✎ {}", post.likes(), post.comments()),
        Style::default().fg(theme.text_dim),
    )));
    lines
}
