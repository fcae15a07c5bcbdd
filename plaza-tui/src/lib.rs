// Library interface for the plaza client (the binary and the tests build on it)
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod feed;

#[macro_use]
pub mod logging;

pub mod navigation;
pub mod signup;
pub mod terminal;
pub mod ui;
