use plaza_types::Route;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::feed::{FeedLoadController, PostSource};
use crate::logging::LogConfig;
use crate::signup::{FormField, SignUpFormController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignUp,
    Feed,
}

/// View-only state of the sign-up screen (never sent anywhere)
#[derive(Debug, Clone)]
pub struct SignUpScreenState {
    pub focus: FormField,
    pub show_password: bool,
}

impl Default for SignUpScreenState {
    fn default() -> Self {
        Self {
            focus: FormField::FirstName,
            show_password: false,
        }
    }
}

/// Async work requested by a key press; the event loop spawns it so the
/// screen keeps rendering snapshots while it runs
pub enum AppCommand {
    Submit(SignUpFormController),
    LoadFeed(FeedLoadController),
    ReloadFeed(FeedLoadController),
}

impl std::fmt::Debug for AppCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppCommand::Submit(_) => f.write_str("Submit"),
            AppCommand::LoadFeed(_) => f.write_str("LoadFeed"),
            AppCommand::ReloadFeed(_) => f.write_str("ReloadFeed"),
        }
    }
}

/// Main application state
pub struct App {
    pub running: bool,
    pub current_screen: Screen,
    pub signup: SignUpFormController,
    pub signup_state: SignUpScreenState,
    /// Mounted feed; `None` while the feed screen is not shown
    pub feed: Option<FeedLoadController>,
    pub posts: Arc<dyn PostSource>,
    /// One-line notice shown above the current screen
    pub message: Option<String>,
    pub log_config: LogConfig,
    pub(super) routes: UnboundedReceiver<Route>,
}
