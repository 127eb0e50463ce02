//! The capability surface hosts program against, shared by every tracker
//! backend.

use crate::types::{GazeVector, TrackerKind};
use crate::Result;

/// A pluggable eye-tracker backend.
///
/// The host selects one variant at startup, drives its lifecycle with
/// `start`/`stop`, and polls at its own cadence (typically once per rendered
/// frame). Polling never blocks: stale or missing data surfaces as
/// `is_gaze_available() == false` / `gaze() == None`, never as an error.
pub trait EyeTracker: Send {
    /// Begin producing gaze data. Single start per instance; the host
    /// lifecycle is responsible for not calling this twice.
    fn start(&mut self) -> Result<()>;

    /// Stop producing gaze data. Returns only once no backend code will run
    /// anymore.
    fn stop(&mut self);

    /// Whether a sufficiently fresh gaze vector exists right now.
    fn is_gaze_available(&self) -> bool;

    /// Copy of the latest gaze vector, or `None` when unavailable.
    fn gaze(&self) -> Option<GazeVector>;

    /// Which backend variant this is.
    fn kind(&self) -> TrackerKind;
}

/// Backend that always reports a fixed gaze. Stands in for real hardware in
/// host integration tests and demos.
pub struct SimulatedTracker {
    gaze: GazeVector,
}

impl SimulatedTracker {
    pub fn new(gaze: GazeVector) -> Self {
        Self { gaze }
    }

    /// Simulated tracker staring straight ahead.
    pub fn forward() -> Self {
        Self::new(GazeVector::FORWARD)
    }
}

impl EyeTracker for SimulatedTracker {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_gaze_available(&self) -> bool {
        true
    }

    fn gaze(&self) -> Option<GazeVector> {
        Some(self.gaze)
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Simulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_tracker_is_always_available() {
        let mut tracker = SimulatedTracker::forward();
        tracker.start().unwrap();
        assert!(tracker.is_gaze_available());
        assert_eq!(tracker.gaze(), Some(GazeVector::FORWARD));
        assert_eq!(tracker.kind(), TrackerKind::Simulated);
        tracker.stop();
    }
}
