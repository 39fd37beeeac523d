//! Adaptive frame-budget control for the animated backdrop.
//!
//! Everything here is platform-agnostic and driven by timestamps supplied by
//! the host's frame callback; the web front-end only provides probes, timers
//! and event wiring. No type in this crate draws anything.

pub mod clock;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod manager;
pub mod monitor;
pub mod platform;
pub mod resize;
pub mod scaler;
pub mod settings;
pub mod transition;
pub mod viewport;

pub use clock::*;
pub use config::*;
pub use device::*;
pub use error::*;
pub use manager::*;
pub use monitor::*;
pub use platform::*;
pub use resize::*;
pub use scaler::*;
pub use settings::*;
pub use transition::*;
pub use viewport::*;
