//! C FFI layer for etvr.
//!
//! Provides an opaque handle-based API for C/C++ hosts (e.g. an OpenXR API
//! layer selecting tracker backends). The generated C header is written to
//! `include/etvr.h` by cbindgen.

use crate::error::LastError;
use crate::etvr::EtvrTracker;
use crate::tracker::EyeTracker;
use crate::types::GazeVector;
use std::ffi::{c_char, c_int};
use std::net::Ipv4Addr;

/// Last error message for C consumers.
static LAST_ERROR: LastError = LastError::new();

/// Opaque tracker handle for C consumers.
pub struct EtTracker(EtvrTracker);

/// Bind an ETVR tracker. `port` 0 selects the well-known default (9000).
/// Returns NULL on error (check et_last_error()).
#[no_mangle]
pub extern "C" fn et_tracker_open(port: u16) -> *mut EtTracker {
    let port = if port == 0 {
        crate::protocol::DEFAULT_PORT
    } else {
        port
    };

    match EtvrTracker::bind_to((Ipv4Addr::UNSPECIFIED, port)) {
        Ok(tracker) => Box::into_raw(Box::new(EtTracker(tracker))),
        Err(e) => {
            LAST_ERROR.set(&e);
            std::ptr::null_mut()
        }
    }
}

/// Stop the tracker, close its socket, and free the handle.
///
/// # Safety
/// `tracker` must be a pointer returned by `et_tracker_open`, or null.
#[no_mangle]
pub unsafe extern "C" fn et_tracker_close(tracker: *mut EtTracker) {
    if !tracker.is_null() {
        drop(Box::from_raw(tracker));
    }
}

/// Start the background listener. Returns 0 on success, -1 on error.
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn et_tracker_start(tracker: *mut EtTracker) -> c_int {
    if tracker.is_null() {
        return -1;
    }
    let tracker = &mut *tracker;

    match tracker.0.start() {
        Ok(()) => 0,
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Stop the background listener. No tracker code runs after this returns.
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn et_tracker_stop(tracker: *mut EtTracker) {
    if !tracker.is_null() {
        let tracker = &mut *tracker;
        tracker.0.stop();
    }
}

/// Whether a sufficiently fresh gaze vector exists right now.
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn et_tracker_is_gaze_available(tracker: *const EtTracker) -> bool {
    if tracker.is_null() {
        return false;
    }
    let tracker = &*tracker;
    tracker.0.is_gaze_available()
}

/// Copy the latest gaze vector into `out`. Returns false when no fresh
/// vector is available; `out` is left untouched in that case.
///
/// # Safety
/// `tracker` and `out` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn et_tracker_get_gaze(
    tracker: *const EtTracker,
    out: *mut GazeVector,
) -> bool {
    if tracker.is_null() || out.is_null() {
        return false;
    }
    let tracker = &*tracker;

    match tracker.0.gaze() {
        Some(gaze) => {
            out.write(gaze);
            true
        }
        None => false,
    }
}

/// The backend variant of this tracker (see TrackerKind). Returns -1 for a
/// null handle.
///
/// # Safety
/// `tracker` must be a valid tracker pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn et_tracker_kind(tracker: *const EtTracker) -> c_int {
    if tracker.is_null() {
        return -1;
    }
    let tracker = &*tracker;
    tracker.0.kind() as c_int
}

/// Get the last error message. Returns NULL if no error.
/// The returned pointer is valid until the next etvr API call.
#[no_mangle]
pub extern "C" fn et_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}
