//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger initialization (console on web, env_logger natively)
//! - A self-contained headless adventure exported to JavaScript

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Install the platform logger. Fails if a logger is already installed.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
}

/// Install the platform logger. Honours `RUST_LOG`, defaulting to `info`.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()
}
