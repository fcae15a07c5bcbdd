// UI module - one submodule per screen
pub mod theme;
mod feed;
mod formatting;
mod signup;

// Re-export main render function
pub use self::render_main::render;

// Main render logic
mod render_main {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph},
        Frame,
    };

    use super::feed::render_feed_screen;
    use super::signup::render_signup_screen;
    use super::theme::get_theme_colors;
    use crate::app::{App, Screen};
    use crate::log_rendering;

    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 20;

    /// Render the UI
    pub fn render(app: &App, frame: &mut Frame) {
        let area = frame.area();
        let theme = get_theme_colors(app);

        frame.render_widget(Clear, area);
        let background = Block::default().style(Style::default().bg(theme.background));
        frame.render_widget(background, area);

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let warning = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Terminal Too Small",
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Minimum size: {}x{}", MIN_WIDTH, MIN_HEIGHT),
                    Style::default().fg(theme.text),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(warning, area);
            return;
        }

        log_rendering!(app.log_config, "render {:?}", app.current_screen);

        // Notice banner on top of whichever screen is active
        let body = if let Some(message) = &app.message {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area);
            let banner = Paragraph::new(message.as_str())
                .style(Style::default().fg(theme.success).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme.border)),
                );
            frame.render_widget(banner, chunks[0]);
            chunks[1]
        } else {
            area
        };

        match app.current_screen {
            Screen::SignUp => render_signup_screen(frame, app, body, &theme),
            Screen::Feed => render_feed_screen(frame, app, body, &theme),
        }
    }
}
