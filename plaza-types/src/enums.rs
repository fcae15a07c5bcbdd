use serde::{Deserialize, Serialize};

/// Client-side destinations the controllers can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    SignUp,
    SignIn,
    Dashboard,
    Feed,
    CreatePost,
}

impl Route {
    pub fn as_path(&self) -> &'static str {
        match self {
            Route::SignUp => "/auth/sign-up",
            Route::SignIn => "/auth/sign-in",
            Route::Dashboard => "/auth/dashboard",
            Route::Feed => "/feed",
            Route::CreatePost => "/posts/create",
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/auth/sign-up" => Some(Route::SignUp),
            "/auth/sign-in" => Some(Route::SignIn),
            "/auth/dashboard" => Some(Route::Dashboard),
            "/feed" => Some(Route::Feed),
            "/posts/create" => Some(Route::CreatePost),
            _ => None,
        }
    }
}
