//! EyeTrackVR backend: UDP transport listener feeding the gaze aggregator.

use crate::gaze::GazeState;
use crate::protocol;
use crate::tracker::EyeTracker;
use crate::types::{GazeVector, TrackerEvent, TrackerKind};
use crate::{EtvrError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// How long recv_from blocks before the loop re-checks the stop flag.
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Diagnostics channel capacity; events are dropped beyond it.
const EVENT_CAPACITY: usize = 64;

/// ETVR messages are a few dozen bytes; one MTU of buffer is plenty.
const MAX_DATAGRAM: usize = 1536;

/// Eye tracker fed by EyeTrackVR OSC datagrams.
///
/// Binding reserves the port up front, so construction fails outright when
/// the transport is unusable. `start` spawns a single background thread
/// that receives, decodes, and aggregates; the caller polls through the
/// [`EyeTracker`] surface from its own thread.
pub struct EtvrTracker {
    /// Moved into the listener thread on start.
    socket: Option<UdpSocket>,
    local_addr: SocketAddr,
    state: Arc<GazeState>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    events: Option<Sender<TrackerEvent>>,
}

impl EtvrTracker {
    /// Bind to the well-known ETVR OSC port on all interfaces.
    pub fn bind() -> Result<Self> {
        Self::bind_to((Ipv4Addr::UNSPECIFIED, protocol::DEFAULT_PORT))
    }

    /// Bind to an explicit address, e.g. an ephemeral port for tests or a
    /// host-chosen endpoint.
    pub fn bind_to<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(RECV_TIMEOUT))?;
        let local_addr = socket.local_addr()?;

        log::info!("ETVR OSC listener bound to {}", local_addr);

        Ok(Self {
            socket: Some(socket),
            local_addr,
            state: Arc::new(GazeState::new()),
            stop_flag: Arc::new(AtomicBool::new(false)),
            thread: None,
            events: None,
        })
    }

    /// The bound socket address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Subscribe to decode/aggregation diagnostics.
    ///
    /// Call before `start`; a subscription made afterwards is not seen by
    /// the running listener. Events are dropped when the receiver falls
    /// behind, so a slow subscriber never stalls the listener.
    pub fn events(&mut self) -> Receiver<TrackerEvent> {
        let (tx, rx) = crossbeam_channel::bounded(EVENT_CAPACITY);
        self.events = Some(tx);
        rx
    }

    fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            wake(self.local_addr);
            let _ = thread.join();
            log::info!("ETVR tracker stopped");
        }
    }
}

impl EyeTracker for EtvrTracker {
    fn start(&mut self) -> Result<()> {
        if self.thread.is_some() {
            log::warn!("ETVR tracker already started");
            return Ok(());
        }
        let socket = self.socket.take().ok_or(EtvrError::Stopped)?;

        let state = Arc::clone(&self.state);
        let stop_flag = Arc::clone(&self.stop_flag);
        let events = self.events.clone();

        let thread = std::thread::Builder::new()
            .name("etvr-osc".into())
            .spawn(move || listen_loop(socket, state, stop_flag, events))?;
        self.thread = Some(thread);
        Ok(())
    }

    fn stop(&mut self) {
        self.shutdown();
    }

    fn is_gaze_available(&self) -> bool {
        self.state.is_available()
    }

    fn gaze(&self) -> Option<GazeVector> {
        self.state.latest()
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Etvr
    }
}

impl Drop for EtvrTracker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The receive loop runs in a dedicated thread.
///
/// One datagram is fully decoded and, if it completes a triple, combined
/// before the next receive. The timed recv_from keeps cancellation
/// cooperative without closing the socket from another thread.
fn listen_loop(
    socket: UdpSocket,
    state: Arc<GazeState>,
    stop_flag: Arc<AtomicBool>,
    events: Option<Sender<TrackerEvent>>,
) {
    let mut buf = [0u8; MAX_DATAGRAM];

    log::info!("OSC listener started");

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            log::info!("OSC listener stopping (stop flag set)");
            break;
        }

        let len = match socket.recv_from(&mut buf) {
            Ok((n, _)) => n,
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                continue;
            }
            Err(e) => {
                log::warn!("OSC recv error: {}", e);
                continue;
            }
        };

        // The wake datagram from shutdown() lands here.
        if stop_flag.load(Ordering::Relaxed) {
            log::info!("OSC listener stopping (stop flag set)");
            break;
        }

        match protocol::decode_datagram(&buf[..len]) {
            Ok(Some((channel, value))) => {
                log::trace!("OSC {:?} = {}", channel, value);
                emit(&events, TrackerEvent::ChannelUpdate { channel, value });
                if let Some(gaze) = state.record(channel, value) {
                    log::trace!("gaze combined: {:?}", gaze);
                    emit(&events, TrackerEvent::GazeProduced(gaze));
                }
            }
            Ok(None) => {
                // Port 9000 carries plenty of unrelated avatar traffic.
            }
            Err(e) => {
                log::debug!("dropping malformed OSC datagram: {}", e);
                emit(&events, TrackerEvent::DecodeError(e.to_string()));
            }
        }
    }
}

fn emit(events: &Option<Sender<TrackerEvent>>, event: TrackerEvent) {
    if let Some(tx) = events {
        if tx.try_send(event).is_err() {
            log::trace!("event channel full, dropping event");
        }
    }
}

/// Best-effort datagram to our own port so a pending recv_from returns
/// immediately instead of waiting out the read timeout.
fn wake(addr: SocketAddr) {
    let ip = if addr.ip().is_unspecified() {
        match addr.ip() {
            IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
        }
    } else {
        addr.ip()
    };
    let bind_ip = match ip {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };

    if let Ok(socket) = UdpSocket::bind((bind_ip, 0)) {
        let _ = socket.send_to(&[], (ip, addr.port()));
    }
}
