//! Terminal front end: wires the core state machine to stdin, stdout and the engine.
mod app;
mod config;
mod effects;
mod heading;
mod logging;
mod page;
mod render;

pub use app::run_app;
