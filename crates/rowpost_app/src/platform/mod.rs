//! Terminal shell around the rowpost engine.
mod app;
mod args;
mod config;
mod effects;
mod files;
mod logging;
mod ui;

pub use app::run_app;
pub use args::Args;
