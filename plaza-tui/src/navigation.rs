use plaza_types::Route;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Capability to move the user to another screen.
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
}

/// Navigator used by the terminal front end: routes are queued and picked up
/// by the event loop on its next tick.
#[derive(Clone)]
pub struct ScreenNavigator {
    tx: UnboundedSender<Route>,
}

impl ScreenNavigator {
    pub fn channel() -> (Self, UnboundedReceiver<Route>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ScreenNavigator {
    fn push(&self, route: Route) {
        log::info!("Navigating to {}", route.as_path());
        if self.tx.send(route).is_err() {
            log::warn!("Navigation to {} dropped: event loop has shut down", route.as_path());
        }
    }
}
