//! # etvr - Eye-gaze tracking driver for EyeTrackVR OSC telemetry
//!
//! Listens for EyeTrackVR's per-axis eye position messages (OSC floats over
//! UDP), fuses them into a unit gaze direction vector, and exposes the latest
//! vector behind a staleness-gated polling API. Provides:
//! - A UDP/OSC transport listener with cooperative shutdown
//! - The `EyeTracker` capability trait shared by pluggable backends
//! - C FFI for integration with C/C++ hosts (e.g. OpenXR API layers)
//!
//! ## Quick Start
//! ```no_run
//! use etvr::{EtvrTracker, EyeTracker};
//! use std::time::Duration;
//!
//! let mut tracker = EtvrTracker::bind().unwrap();
//! tracker.start().unwrap();
//!
//! loop {
//!     if let Some(gaze) = tracker.gaze() {
//!         println!("gaze: [{:+.3}, {:+.3}, {:+.3}]", gaze.x, gaze.y, gaze.z);
//!     }
//!     std::thread::sleep(Duration::from_millis(16));
//! }
//! ```

pub mod error;
pub mod types;
pub mod protocol;
pub mod gaze;
pub mod tracker;
pub mod etvr;
pub mod ffi;

pub use error::EtvrError;
pub use types::*;
pub use tracker::{EyeTracker, SimulatedTracker};
pub use etvr::EtvrTracker;

/// Result type alias for etvr operations.
pub type Result<T> = std::result::Result<T, EtvrError>;
