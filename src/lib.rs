pub mod gui;
pub mod hooks;
pub mod hotkey;
pub mod logging;
pub mod panel;
pub mod state;
pub mod tick;

/// Version string exposed on the public control surface.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
