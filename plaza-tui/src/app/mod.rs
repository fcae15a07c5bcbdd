mod handlers;
mod state;


pub use state::*;

use plaza_types::Route;
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::feed::{FeedLoadController, PostSource};
use crate::log_debug;
use crate::logging::LogConfig;
use crate::signup::{SignUpFormController, SIGNUP_SUCCESS};

impl App {
    pub fn new(
        signup: SignUpFormController,
        posts: Arc<dyn PostSource>,
        routes: UnboundedReceiver<Route>,
    ) -> Self {
        Self {
            running: true,
            current_screen: Screen::SignUp,
            signup,
            signup_state: SignUpScreenState::default(),
            feed: None,
            posts,
            message: None,
            log_config: LogConfig::default(),
            routes,
        }
    }

    pub fn handle_key_event(
        &mut self,
        key: crossterm::event::KeyEvent,
    ) -> anyhow::Result<Option<AppCommand>> {
        handlers::handle_key_event(self, key)
    }

    /// Mount a fresh feed and switch to it. Any previously mounted feed is
    /// torn down so its late results are ignored.
    pub fn open_feed(&mut self) -> AppCommand {
        self.close_feed();
        let feed = FeedLoadController::new(Arc::clone(&self.posts));
        self.feed = Some(feed.clone());
        self.current_screen = Screen::Feed;
        log_debug!(self.log_config, "Feed mounted");
        AppCommand::LoadFeed(feed)
    }

    pub fn close_feed(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.teardown();
            log_debug!(self.log_config, "Feed torn down");
        }
    }

    pub fn show_signup(&mut self) {
        self.close_feed();
        self.current_screen = Screen::SignUp;
    }

    /// Apply navigation requested by the controllers since the last tick
    pub fn apply_pending_routes(&mut self) -> Vec<AppCommand> {
        let mut commands = Vec::new();
        loop {
            match self.routes.try_recv() {
                Ok(route) => commands.extend(self.navigate(route)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        commands
    }

    pub fn navigate(&mut self, route: Route) -> Option<AppCommand> {
        log::info!("Route {} requested", route.as_path());
        match route {
            Route::Dashboard => {
                self.message = Some(SIGNUP_SUCCESS.to_string());
                Some(self.open_feed())
            }
            Route::Feed => {
                self.message = None;
                Some(self.open_feed())
            }
            Route::SignUp => {
                self.message = None;
                self.show_signup();
                None
            }
            Route::SignIn | Route::CreatePost => {
                self.message = Some(format!(
                    "{} is not available in the terminal client",
                    route.as_path()
                ));
                None
            }
        }
    }

    pub fn quit(&mut self) {
        self.close_feed();
        self.running = false;
    }
}
