//! Gaze aggregation: the latest-value cache shared between the listener
//! thread and the polling caller.

use crate::types::{Channel, GazeVector};
use std::f32::consts::FRAC_PI_4;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Age beyond which the last produced gaze vector stops being reported.
pub const STALE_AFTER: Duration = Duration::from_secs(1);

/// Map the three signed normalized axis values to a unit direction.
///
/// Each horizontal half-measurement spans ±45°; the two are averaged. The
/// vertical measurement spans ±45° on its own. Right-handed frame with
/// forward = -z, so centered input yields `(0, 0, -1)`. The result is a unit
/// vector by construction and is not renormalized.
pub fn combine(left: f32, right: f32, vertical: f32) -> GazeVector {
    let horizontal = -(right * FRAC_PI_4 + left * FRAC_PI_4) / 2.0;
    let vertical = vertical * FRAC_PI_4;

    GazeVector {
        x: horizontal.sin() * vertical.cos(),
        y: vertical.sin(),
        z: -horizontal.cos() * vertical.cos(),
    }
}

struct Inner {
    left: Option<f32>,
    right: Option<f32>,
    vertical: Option<f32>,
    gaze: Option<GazeVector>,
    produced_at: Option<Instant>,
}

/// Shared aggregation state: pending per-axis samples plus the last combined
/// vector and its freshness timestamp, all behind one lock.
///
/// The raw fields are never exposed; producers go through [`record`] and
/// consumers through [`is_available`]/[`latest`], so there is exactly one
/// locking discipline and no nested acquisition anywhere.
///
/// [`record`]: GazeState::record
/// [`is_available`]: GazeState::is_available
/// [`latest`]: GazeState::latest
pub struct GazeState {
    inner: Mutex<Inner>,
}

impl GazeState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                left: None,
                right: None,
                vertical: None,
                gaze: None,
                produced_at: None,
            }),
        }
    }

    /// Store one axis sample. If this completes the triple, combine,
    /// timestamp, and clear all three pending samples in the same critical
    /// section, returning the newly produced vector.
    ///
    /// A pending axis value never expires on its own; only a completed
    /// triple refreshes the availability clock.
    pub fn record(&self, channel: Channel, value: f32) -> Option<GazeVector> {
        let mut inner = self.lock();

        match channel {
            Channel::LeftHorizontal => inner.left = Some(value),
            Channel::RightHorizontal => inner.right = Some(value),
            Channel::Vertical => inner.vertical = Some(value),
        }

        let (Some(left), Some(right), Some(vertical)) =
            (inner.left, inner.right, inner.vertical)
        else {
            return None;
        };

        let gaze = combine(left, right, vertical);
        inner.gaze = Some(gaze);
        inner.produced_at = Some(Instant::now());
        inner.left = None;
        inner.right = None;
        inner.vertical = None;

        Some(gaze)
    }

    /// True iff a vector has ever been produced and is younger than
    /// [`STALE_AFTER`].
    pub fn is_available(&self) -> bool {
        self.lock()
            .produced_at
            .is_some_and(|t| t.elapsed() < STALE_AFTER)
    }

    /// Copy of the last combined vector, or `None` when stale or never
    /// produced. Freshness check and read happen under one lock acquisition,
    /// so the caller can never observe a partially written vector.
    pub fn latest(&self) -> Option<GazeVector> {
        let inner = self.lock();
        match inner.produced_at {
            Some(t) if t.elapsed() < STALE_AFTER => inner.gaze,
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // No critical section here can panic; treat poisoning as recoverable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GazeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_combine_centered() {
        assert_eq!(combine(0.0, 0.0, 0.0), GazeVector::FORWARD);
    }

    #[test]
    fn test_combine_both_eyes_full_left() {
        // L = R = 1 averages to a -45° horizontal angle.
        let gaze = combine(1.0, 1.0, 0.0);
        assert!((gaze.x + 0.70710678).abs() < 1e-6);
        assert!(gaze.y.abs() < 1e-6);
        assert!((gaze.z + 0.70710678).abs() < 1e-6);
    }

    #[test]
    fn test_combine_is_unit_length_over_input_range() {
        let levels = [-1.0f32, -0.5, 0.0, 0.5, 1.0];
        for &l in &levels {
            for &r in &levels {
                for &v in &levels {
                    let gaze = combine(l, r, v);
                    assert!(
                        (gaze.magnitude() - 1.0).abs() < 1e-6,
                        "|combine({}, {}, {})| = {}",
                        l,
                        r,
                        v,
                        gaze.magnitude()
                    );
                }
            }
        }
    }

    #[test]
    fn test_triple_completes_in_any_order() {
        let orders = [
            [Channel::LeftHorizontal, Channel::RightHorizontal, Channel::Vertical],
            [Channel::LeftHorizontal, Channel::Vertical, Channel::RightHorizontal],
            [Channel::RightHorizontal, Channel::LeftHorizontal, Channel::Vertical],
            [Channel::RightHorizontal, Channel::Vertical, Channel::LeftHorizontal],
            [Channel::Vertical, Channel::LeftHorizontal, Channel::RightHorizontal],
            [Channel::Vertical, Channel::RightHorizontal, Channel::LeftHorizontal],
        ];

        for order in orders {
            let state = GazeState::new();
            assert_eq!(state.record(order[0], 0.5), None);
            assert_eq!(state.record(order[1], 0.5), None);
            let produced = state.record(order[2], 0.5);
            assert_eq!(produced, Some(combine(0.5, 0.5, 0.5)));
        }
    }

    #[test]
    fn test_channels_clear_after_combination() {
        let state = GazeState::new();
        state.record(Channel::LeftHorizontal, 0.1);
        state.record(Channel::RightHorizontal, 0.2);
        let first = state.record(Channel::Vertical, 0.3);
        assert!(first.is_some());

        // A single follow-up sample must not re-trigger...
        assert_eq!(state.record(Channel::Vertical, 0.9), None);
        // ...and the previous vector stays cached.
        assert_eq!(state.latest(), first);

        // A fresh full triple combines again.
        state.record(Channel::LeftHorizontal, 0.4);
        let second = state.record(Channel::RightHorizontal, 0.5);
        assert_eq!(second, Some(combine(0.4, 0.5, 0.9)));
    }

    #[test]
    fn test_later_sample_overwrites_pending_value() {
        let state = GazeState::new();
        state.record(Channel::LeftHorizontal, 0.1);
        state.record(Channel::LeftHorizontal, 0.9);
        state.record(Channel::RightHorizontal, 0.0);
        let produced = state.record(Channel::Vertical, 0.0);
        assert_eq!(produced, Some(combine(0.9, 0.0, 0.0)));
    }

    #[test]
    fn test_unavailable_until_first_triple() {
        let state = GazeState::new();
        assert!(!state.is_available());
        assert_eq!(state.latest(), None);

        state.record(Channel::LeftHorizontal, 0.0);
        state.record(Channel::RightHorizontal, 0.0);
        assert!(!state.is_available());

        state.record(Channel::Vertical, 0.0);
        assert!(state.is_available());
        assert_eq!(state.latest(), Some(GazeVector::FORWARD));
    }

    #[test]
    fn test_gaze_goes_stale() {
        let state = GazeState::new();
        state.record(Channel::LeftHorizontal, 0.0);
        state.record(Channel::RightHorizontal, 0.0);
        state.record(Channel::Vertical, 0.0);
        assert!(state.is_available());

        std::thread::sleep(STALE_AFTER + Duration::from_millis(100));
        assert!(!state.is_available());
        assert_eq!(state.latest(), None);
    }

    #[test]
    fn test_concurrent_produce_and_poll_never_tears() {
        let state = Arc::new(GazeState::new());
        let levels = [-1.0f32, -0.5, 0.0, 0.5, 1.0];
        let valid: Vec<GazeVector> = levels.iter().map(|&t| combine(t, t, t)).collect();

        let producer = {
            let state = state.clone();
            std::thread::spawn(move || {
                for i in 0..5000 {
                    let t = levels[i % levels.len()];
                    state.record(Channel::LeftHorizontal, t);
                    state.record(Channel::RightHorizontal, t);
                    state.record(Channel::Vertical, t);
                }
            })
        };

        // Every observed vector must exactly match one the producer made;
        // a torn read would mix fields from two different triples.
        let mut seen = 0u32;
        while !producer.is_finished() || seen == 0 {
            if let Some(gaze) = state.latest() {
                seen += 1;
                assert!(valid.contains(&gaze), "torn vector: {:?}", gaze);
            }
        }
        producer.join().unwrap();
    }
}
