/// Unit gaze direction in the consuming runtime's coordinate space.
///
/// Right-handed, forward = -z. Produced analytically by the combination
/// step, so the magnitude is 1 by construction and is never renormalized.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GazeVector {
    /// Straight-ahead gaze.
    pub const FORWARD: GazeVector = GazeVector {
        x: 0.0,
        y: 0.0,
        z: -1.0,
    };

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One of the three independent telemetry axes tracked by the aggregator.
///
/// EyeTrackVR reports a signed normalized value per axis, each in its own
/// datagram, in no guaranteed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    LeftHorizontal,
    RightHorizontal,
    Vertical,
}

/// Identifies which backend variant a tracker is, for hosts that select
/// among several at startup.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Simulated = 0,
    Etvr = 1,
}

/// Diagnostics event emitted by the listener thread.
///
/// Subscription is optional; the tracker behaves identically with no
/// subscriber, and events are dropped rather than blocking the listener
/// when the channel is full.
#[derive(Debug, Clone)]
pub enum TrackerEvent {
    /// A recognized message updated one axis.
    ChannelUpdate { channel: Channel, value: f32 },
    /// All three axes were present and a new gaze vector was produced.
    GazeProduced(GazeVector),
    /// A malformed datagram was discarded.
    DecodeError(String),
}
