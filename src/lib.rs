pub mod actions;
pub mod app;
pub mod config;
pub mod events;
pub mod input;
pub mod logging;
pub mod models;
pub mod repository;
pub mod runtime;
pub mod session;
pub mod slack;
pub mod ui;
