use std::fmt;

/// Errors that can occur when binding the listener or decoding OSC traffic.
///
/// Decode variants never cross the listener boundary: the receive loop
/// discards the offending datagram and keeps going. The polling caller only
/// ever sees "gaze unavailable".
#[derive(Debug, thiserror::Error)]
pub enum EtvrError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tracker socket already consumed by a previous start/stop cycle")]
    Stopped,

    #[error("datagram too short for an OSC message")]
    Truncated,

    #[error("unterminated or unpadded OSC string")]
    BadString,

    #[error("OSC address pattern must start with '/'")]
    BadAddress,

    #[error("missing OSC type tag string")]
    MissingTypeTags,

    #[error("expected a single float argument, got type tags `{0}`")]
    UnexpectedArguments(String),
}

/// Thread-safe last-error storage for the C FFI layer.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &EtvrError) {
        if let Ok(mut msg) = self.message.lock() {
            *msg = fmt::format(format_args!("{}\0", err));
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}
