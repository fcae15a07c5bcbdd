use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use plaza_types::Route;

use crate::app::state::{App, AppCommand, Screen};
use crate::signup::{FieldUpdate, FormField};
use crate::{log_form_state, log_key_event};

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<Option<AppCommand>> {
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }

    log_key_event!(app.log_config, "{:?} on {:?}", key.code, app.current_screen);

    // Ctrl+C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Ok(None);
    }

    match app.current_screen {
        Screen::SignUp => handle_signup_keys(app, key),
        Screen::Feed => handle_feed_keys(app, key),
    }
}

fn handle_signup_keys(app: &mut App, key: KeyEvent) -> Result<Option<AppCommand>> {
    let focus = app.signup_state.focus;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => {
                app.signup_state.show_password = !app.signup_state.show_password;
            }
            KeyCode::Char('f') => return Ok(app.navigate(Route::Feed)),
            KeyCode::Char('l') => return Ok(app.navigate(Route::SignIn)),
            _ => {}
        }
        return Ok(None);
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab | KeyCode::Down => {
            app.signup_state.focus = focus.next();
            log_form_state!(app.log_config, "Focus -> {}", app.signup_state.focus.as_str());
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.signup_state.focus = focus.previous();
            log_form_state!(app.log_config, "Focus -> {}", app.signup_state.focus.as_str());
        }
        KeyCode::Enter => {
            if app.signup.is_loading() {
                return Ok(None);
            }
            app.message = None;
            return Ok(Some(AppCommand::Submit(app.signup.clone())));
        }
        KeyCode::Char(' ') if focus == FormField::DemoUser => {
            let demo_user = !app.signup.snapshot().form.demo_user;
            app.signup.update_field(FieldUpdate::DemoUser(demo_user));
        }
        KeyCode::Char(c) => edit_focused(app, |value| value.push(c)),
        KeyCode::Backspace => edit_focused(app, |value| {
            value.pop();
        }),
        _ => {}
    }

    Ok(None)
}

/// Apply `edit` to the text of the focused field and push the result
/// through the controller so its error is cleared
fn edit_focused(app: &mut App, edit: impl FnOnce(&mut String)) {
    let focus = app.signup_state.focus;
    let view = app.signup.snapshot();
    let Some(current) = view.form.text(focus) else {
        return;
    };

    let mut value = current.to_string();
    edit(&mut value);
    if let Some(update) = FieldUpdate::text(focus, value) {
        app.signup.update_field(update);
    }
}

fn handle_feed_keys(app: &mut App, key: KeyEvent) -> Result<Option<AppCommand>> {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc | KeyCode::Char('b') => {
            app.navigate(Route::SignUp);
        }
        // "Try Again" and "Refresh Feed" both remount the feed
        KeyCode::Char('r') => {
            if let Some(feed) = &app.feed {
                app.message = None;
                return Ok(Some(AppCommand::ReloadFeed(feed.clone())));
            }
        }
        KeyCode::Char('n') => {
            app.navigate(Route::CreatePost);
        }
        _ => {}
    }
    Ok(None)
}
