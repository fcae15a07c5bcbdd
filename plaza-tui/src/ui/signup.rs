use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::formatting::mask_secret;
use super::theme::ThemeColors;
use crate::app::App;
use crate::signup::{FormField, SignUpView};

const LABEL_WIDTH: usize = 18;

pub fn render_signup_screen(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let view = app.signup.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    // Header
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Create your account",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Join thousands of users sharing amazing content",
            Style::default().fg(theme.text_dim),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(theme.border)));
    frame.render_widget(header, chunks[0]);

    let form = Paragraph::new(form_lines(app, &view, theme))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(form, chunks[1]);

    let footer = Paragraph::new(
        "Tab/↑↓ move · Space toggle demo · Ctrl+R show password · Enter submit · Ctrl+F feed · Esc quit",
    )
    .style(Style::default().fg(theme.text_dim))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(theme.border)));
    frame.render_widget(footer, chunks[2]);
}

fn form_lines(app: &App, view: &SignUpView, theme: &ThemeColors) -> Vec<Line<'static>> {
    let focus = app.signup_state.focus;
    let mut lines = vec![Line::from("")];

    for field in FormField::ALL {
        let Some(value) = view.form.text(field) else {
            continue;
        };
        let focused = field == focus;
        let shown = if field.is_secret() {
            mask_secret(value, app.signup_state.show_password)
        } else {
            value.to_string()
        };

        let label_style = if focused {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let input_style = if view.errors.contains(field) {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.text)
        };

        lines.push(Line::from(vec![
            Span::styled(if focused { "> " } else { "  " }, label_style),
            Span::styled(format!("{:<width$}", field.label(), width = LABEL_WIDTH), label_style),
            Span::styled(shown, input_style.bg(theme.highlight_bg)),
            Span::styled(if focused { "▏" } else { "" }, label_style),
        ]));

        if let Some(error) = view.errors.get(field) {
            lines.push(Line::from(Span::styled(
                format!("{:indent$}{}", "", error, indent = LABEL_WIDTH + 2),
                Style::default().fg(theme.error),
            )));
        }
    }

    // Demo user checkbox
    lines.push(Line::from(""));
    let demo_focused = focus == FormField::DemoUser;
    let checkbox = if view.form.demo_user { "[x] " } else { "[ ] " };
    let demo_style = if demo_focused {
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    lines.push(Line::from(vec![
        Span::styled(if demo_focused { "> " } else { "  " }, demo_style),
        Span::styled(checkbox, demo_style),
        Span::styled(FormField::DemoUser.label(), demo_style),
    ]));
    lines.push(Line::from(Span::styled(
        "      Demo users have limited features and can explore the platform with sample data.",
        Style::default().fg(theme.text_dim),
    )));
    if let Some(notice) = view.demo_notice() {
        lines.push(Line::from(Span::styled(
            format!("      i {}", notice),
            Style::default().fg(theme.primary),
        )));
    }

    // Submission-level error
    if let Some(submit) = view.errors.submit() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  ! {}", submit),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    let button_style = if view.is_loading {
        Style::default().fg(theme.text_dim)
    } else {
        Style::default()
            .fg(theme.text)
            .bg(theme.primary)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("[ {} ]", view.button_label()), button_style),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Already have an account? ", Style::default().fg(theme.text_dim)),
        Span::styled(
            "Sign in here (Ctrl+L)",
            Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
        ),
    ]));

    lines
}
