pub mod app;
pub mod config;
pub mod feeds;
pub mod input;
pub mod telemetry;
pub mod ui;
