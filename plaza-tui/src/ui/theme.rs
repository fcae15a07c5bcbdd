use ratatui::style::Color;

use crate::app::{App, Screen};

pub struct ThemeColors {
    pub primary: Color,
    pub accent: Color,
    pub text: Color,
    pub text_dim: Color,
    pub background: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight_bg: Color,
}

/// Theme colors for the current screen. Selecting a demo account on the
/// sign-up screen switches to the lighter demo accent.
pub fn get_theme_colors(app: &App) -> ThemeColors {
    let demo = app.current_screen == Screen::SignUp && app.signup.snapshot().form.demo_user;

    ThemeColors {
        primary: if demo {
            Color::Rgb(96, 165, 250) // Light blue
        } else {
            Color::Rgb(37, 99, 235) // Blue
        },
        accent: Color::Rgb(147, 51, 234), // Purple
        text: Color::Rgb(229, 231, 235),
        text_dim: Color::Rgb(156, 163, 175),
        background: Color::Rgb(17, 24, 39),
        border: Color::Rgb(75, 85, 99),
        success: Color::Rgb(34, 197, 94),
        warning: Color::Rgb(250, 204, 21),
        error: Color::Rgb(239, 68, 68),
        highlight_bg: Color::Rgb(31, 41, 55),
    }
}
