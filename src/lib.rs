pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod efficiency;
pub mod error;
pub mod event;
pub mod fetch;
pub mod format;
pub mod hit;
pub mod layout;
pub mod nav;
pub mod theme;
pub mod tree;
pub mod ui;
